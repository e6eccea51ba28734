// tasklist - To-do list manager over local key-value storage

pub mod app;
pub mod config;
pub mod event;
pub mod filter;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod render;
pub mod storage;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use app::App;
pub use config::Config;
pub use event::{Command, Event};
pub use filter::{SortOrder, StatusFilter};
pub use mutation::{Rejection, TaskList};
pub use notify::Notifications;
pub use query::{QueryResult, ViewState};
pub use render::{PageView, TerminalRenderer};
pub use storage::{Backend, FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage};
pub use store::TaskStore;
pub use task::{Clock, SystemClock, Task, TaskId, now_ms};
