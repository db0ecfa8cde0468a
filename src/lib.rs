//! A todo list kept in a durable key-value slot, with a terminal front end.
//!
//! [`TodoStore`] owns the tasks and the id counter and persists every change through a
//! [`KeyValueStorage`]. [`search::filter`](app::search::filter) derives the view shown to the user.

pub mod app;

pub use app::error::{StoreError, StoreResult};
pub use app::models::{Notification, TodoEntry, TodoId};
pub use app::search::filter;
pub use app::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
pub use app::todo_store::{TodoStore, NEXT_ID_KEY, TODOS_KEY};
