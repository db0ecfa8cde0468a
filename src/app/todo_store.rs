// Owner of the task list and the id counter.
// Every mutation writes the full state to storage before it touches memory,
// so a failed write leaves the store as it was.
use std::collections::VecDeque;

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::app::codec::parse_due_date;
use crate::app::error::{StoreError, StoreResult};
use crate::app::models::{Notification, TodoEntry, TodoId};
use crate::app::search;
use crate::app::storage::KeyValueStorage;

pub const TODOS_KEY: &str = "todos_list";
pub const NEXT_ID_KEY: &str = "todo_next_id";

pub struct TodoStore<S: KeyValueStorage> {
    storage: S,
    entries: Vec<TodoEntry>,
    next_id: TodoId,
    notifications: VecDeque<Notification>,
}

impl<S: KeyValueStorage> TodoStore<S> {
    // An empty store; nothing is read from storage yet
    pub fn new(storage: S) -> Self {
        TodoStore {
            storage,
            entries: Vec::new(),
            next_id: 0,
            notifications: VecDeque::new(),
        }
    }

    // An empty store hydrated from whatever the storage holds
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    // Load the persisted list and counter. Absent or malformed slots keep the current value.
    pub fn hydrate(&mut self) {
        match self.read_entries() {
            Ok(Some(entries)) => self.entries = entries,
            Ok(None) => {}
            Err(err) => warn!(key = TODOS_KEY, error = %err, "Ignoring unreadable task list"),
        }

        match self.read_next_id() {
            Ok(Some(next_id)) => self.next_id = next_id,
            Ok(None) => {}
            Err(err) => warn!(key = NEXT_ID_KEY, error = %err, "Ignoring unreadable id counter"),
        }

        // Ids must never be handed out twice, even if the counter slot was lost
        if let Some(highest) = self.entries.iter().map(|entry| entry.id).max() {
            if highest > self.next_id {
                warn!(highest, next_id = self.next_id, "Id counter behind stored tasks");
                self.next_id = highest;
            }
        }

        info!(
            entries = self.entries.len(),
            next_id = self.next_id,
            "Hydrated todo store"
        );
    }

    fn read_entries(&self) -> StoreResult<Option<Vec<TodoEntry>>> {
        match self.storage.get(TODOS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn read_next_id(&self) -> StoreResult<Option<TodoId>> {
        match self.storage.get(NEXT_ID_KEY)? {
            Some(raw) => raw
                .trim()
                .parse::<TodoId>()
                .map(Some)
                .map_err(|e| StoreError::Serialization(format!("{NEXT_ID_KEY}: {e}"))),
            None => Ok(None),
        }
    }

    // CREATE
    pub fn create(&mut self, text: &str, due_date: Option<&str>) -> StoreResult<TodoEntry> {
        let text = validate_text(text)?;
        let due_date = match due_date {
            Some(raw) => parse_due_date(raw)?,
            None => None,
        };

        let entry = TodoEntry {
            id: self.allocate_id()?,
            text,
            due_date,
            success: false,
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        self.commit(entries)?;

        debug!(id = entry.id, "Created task");
        Ok(entry)
    }

    // The counter is persisted on its own before the list, so an id is burnt
    // even if the list write fails afterwards
    fn allocate_id(&mut self) -> StoreResult<TodoId> {
        let id = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(self.next_id))?;
        self.storage.set(NEXT_ID_KEY, &id.to_string())?;
        self.next_id = id;
        Ok(id)
    }

    // UPDATE
    // `due_date` of None keeps the current date, a blank string clears it
    pub fn update(
        &mut self,
        id: TodoId,
        text: &str,
        due_date: Option<&str>,
    ) -> StoreResult<Option<TodoEntry>> {
        let text = validate_text(text)?;
        let due_date = due_date.map(parse_due_date).transpose()?;

        self.apply_to(id, |entry| {
            entry.text = text;
            if let Some(due_date) = due_date {
                entry.due_date = due_date;
            }
        })
    }

    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> StoreResult<Option<TodoEntry>> {
        let updated = self.apply_to(id, |entry| entry.success = completed)?;

        if let Some(entry) = &updated {
            let text = entry.text.clone();
            self.notifications.push_back(if completed {
                Notification::Completed { text }
            } else {
                Notification::Reopened { text }
            });
        }
        Ok(updated)
    }

    // Change the state of the task to completed/to do
    pub fn toggle_completed(&mut self, id: TodoId) -> StoreResult<Option<TodoEntry>> {
        match self.get(id).map(|entry| entry.success) {
            Some(success) => self.set_completed(id, !success),
            None => Ok(None),
        }
    }

    // DELETE
    pub fn delete(&mut self, id: TodoId) -> StoreResult<Option<TodoEntry>> {
        let Some(position) = self.position(id) else {
            debug!(id, "Delete of unknown task ignored");
            return Ok(None);
        };

        let mut entries = self.entries.clone();
        let removed = entries.remove(position);
        self.commit(entries)?;

        debug!(id, "Deleted task");
        self.notifications.push_back(Notification::Deleted {
            text: removed.text.clone(),
        });
        Ok(Some(removed))
    }

    // READ
    pub fn entries(&self) -> &[TodoEntry] {
        &self.entries
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    // The last id handed out; the next task gets this plus one
    pub fn next_id(&self) -> TodoId {
        self.next_id
    }

    pub fn search(&self, query: &str) -> Vec<&TodoEntry> {
        search::filter(&self.entries, query)
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    // Perform a change on a copy of the task with the given id and commit it
    fn apply_to(
        &mut self,
        id: TodoId,
        change: impl FnOnce(&mut TodoEntry),
    ) -> StoreResult<Option<TodoEntry>> {
        let Some(position) = self.position(id) else {
            debug!(id, "Change to unknown task ignored");
            return Ok(None);
        };

        let mut entries = self.entries.clone();
        change(&mut entries[position]);
        let updated = entries[position].clone();
        self.commit(entries)?;

        debug!(id, "Updated task");
        Ok(Some(updated))
    }

    fn commit(&mut self, entries: Vec<TodoEntry>) -> StoreResult<()> {
        let payload = serde_json::to_string(&entries)?;
        self.storage.set(TODOS_KEY, &payload)?;
        self.entries = entries;
        Ok(())
    }
}

fn validate_text(text: &str) -> StoreResult<String> {
    if text.is_empty() {
        return Err(StoreError::EmptyText);
    }
    Ok(text.to_string())
}
