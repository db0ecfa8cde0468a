// Explicit ISO-8601 codec for the date fields of a persisted task.
// Timestamps are written as RFC 3339 UTC with millisecond precision ("2024-03-01T09:30:00.000Z"),
// due dates as calendar dates ("2024-03-05").
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::app::error::{StoreError, StoreResult};

const ISO_DATE: &str = "%Y-%m-%d";
const DOTTED_DATE: &str = "%d.%m.%Y";

pub fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub fn encode_date(value: &NaiveDate) -> String {
    value.format(ISO_DATE).to_string()
}

// A stored due date is either a plain date or, when written by an older client,
// a full timestamp of which only the date part counts.
pub fn decode_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE)
        .ok()
        .or_else(|| decode_timestamp(value).map(|timestamp| timestamp.date_naive()))
}

// Parse a due date typed by the user.
// Blank input means "no due date"; anything else must be a valid date.
pub fn parse_due_date(input: &str) -> StoreResult<Option<NaiveDate>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, ISO_DATE)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DOTTED_DATE))
        .map(Some)
        .map_err(|_| StoreError::InvalidDueDate(trimmed.to_string()))
}

pub mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        decode_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp '{raw}'")))
    }
}

pub mod optional_date {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_some(&encode_date(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => decode_date(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 date '{raw}'"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn timestamps_use_millisecond_utc_form() {
        let value = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(encode_timestamp(&value), "2024-03-01T09:30:00.000Z");
        assert_eq!(decode_timestamp("2024-03-01T09:30:00.000Z"), Some(value));
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let decoded = decode_timestamp("2024-03-01T11:30:00+02:00").unwrap();
        assert_eq!(decoded, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
    }

    #[rstest]
    #[case("2024-03-05")]
    #[case("2024-03-05T00:00:00.000Z")]
    #[case("2024-03-05T23:10:00Z")]
    fn stored_due_dates_decode_to_the_calendar_day(#[case] raw: &str) {
        assert_eq!(decode_date(raw), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn garbage_dates_do_not_decode() {
        assert_eq!(decode_date("yesterday"), None);
        assert_eq!(decode_timestamp("2024-13-01T00:00:00Z"), None);
    }

    #[rstest]
    #[case("2023-11-23")]
    #[case("23.11.2023")]
    #[case("  2023-11-23 ")]
    fn user_due_dates_accept_both_formats(#[case] input: &str) {
        assert_eq!(
            parse_due_date(input).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 23)
        );
    }

    #[test]
    fn blank_due_date_means_none() {
        assert_eq!(parse_due_date("").unwrap(), None);
        assert_eq!(parse_due_date("   ").unwrap(), None);
    }

    #[rstest]
    #[case("2023-02-30")]
    #[case("31.04.2023")]
    #[case("next friday")]
    fn invalid_due_dates_are_rejected(#[case] input: &str) {
        assert!(matches!(
            parse_due_date(input),
            Err(StoreError::InvalidDueDate(_))
        ));
    }
}
