use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::app::codec;

pub type TodoId = u64;

// A single task as it is kept in memory and persisted under `todos_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoEntry {
    pub id: TodoId,
    pub text: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::optional_date"
    )]
    pub due_date: Option<NaiveDate>,
    pub success: bool,
    #[serde(with = "codec::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TodoEntry {
    // Not done and due before today
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.success && self.due_date.map_or(false, |due| due < today)
    }

    pub fn created_on_local_day(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }
}

// Events emitted by the store so the presentation layer can acknowledge them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Completed { text: String },
    Reopened { text: String },
    Deleted { text: String },
}

impl Notification {
    pub fn text(&self) -> &str {
        match self {
            Notification::Completed { text }
            | Notification::Reopened { text }
            | Notification::Deleted { text } => text,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Completed { text } => write!(f, "{text} marked done"),
            Notification::Reopened { text } => write!(f, "{text} marked undone"),
            Notification::Deleted { text } => write!(f, "{text} deleted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry() -> TodoEntry {
        TodoEntry {
            id: 7,
            text: "Buy milk".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            success: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let value = serde_json::to_value(entry()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "text": "Buy milk",
                "dueDate": "2024-03-05",
                "success": false,
                "createdAt": "2024-03-01T09:30:00.000Z",
            })
        );
    }

    #[test]
    fn missing_due_date_is_omitted_and_read_back_as_none() {
        let mut task = entry();
        task.due_date = None;

        let encoded = serde_json::to_string(&task).unwrap();
        assert!(!encoded.contains("dueDate"));

        let decoded: TodoEntry = serde_json::from_str(
            r#"{"id":7,"text":"Buy milk","success":false,"createdAt":"2024-03-01T09:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(decoded, task);
    }

    #[test]
    fn malformed_created_at_is_a_decode_error() {
        let decoded = serde_json::from_str::<TodoEntry>(
            r#"{"id":7,"text":"Buy milk","success":false,"createdAt":"soon"}"#,
        );
        assert!(decoded.is_err());
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let mut task = entry();
        assert!(task.is_overdue(today));

        task.success = true;
        assert!(!task.is_overdue(today));

        task.success = false;
        assert!(!task.is_overdue(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));

        task.due_date = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn notifications_read_as_messages() {
        let done = Notification::Completed { text: "Buy milk".into() };
        assert_eq!(done.to_string(), "Buy milk marked done");
        assert_eq!(done.text(), "Buy milk");
        assert_eq!(
            Notification::Reopened { text: "Buy milk".into() }.to_string(),
            "Buy milk marked undone"
        );
        assert_eq!(
            Notification::Deleted { text: "Buy milk".into() }.to_string(),
            "Buy milk deleted"
        );
    }
}
