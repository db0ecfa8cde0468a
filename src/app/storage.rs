// Durable key-value slots the todo store persists into.
// The SQLite backend keeps one row per key; the in-memory backend is used by tests.
// SQLite access based on https://github.com/rusqlite/rusqlite/blob/master/examples/persons/main.rs
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::app::error::StoreResult;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

pub struct SqliteStorage {
    db_con: Connection,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        info!(db_path = %path.display(), "Opening storage");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(db_con: Connection) -> StoreResult<Self> {
        let storage = SqliteStorage { db_con };
        storage.create_table_if_not_exists()?;
        Ok(storage)
    }

    fn create_table_if_not_exists(&self) -> StoreResult<()> {
        self.db_con.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                Key TEXT PRIMARY KEY,
                Value TEXT NOT NULL
            );",
            (),
        )?;
        Ok(())
    }
}

impl KeyValueStorage for SqliteStorage {
    // READ
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .db_con
            .query_row("SELECT Value FROM kv_store WHERE Key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    // CREATE or UPDATE
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.db_con.execute(
            "INSERT INTO kv_store (Key, Value) VALUES (?1, ?2)
             ON CONFLICT(Key) DO UPDATE SET Value = excluded.Value;",
            (key, value),
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots<K, V>(slots: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStorage {
            slots: RefCell::new(
                slots
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
