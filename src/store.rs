// Task collection persisted under a single storage key

use eyre::{Context, Result};
use tracing::{debug, warn};

use crate::storage::{KeyValueStorage, validate_key};
use crate::task::Task;

/// Default key holding the serialized task array
pub const DEFAULT_KEY: &str = "tasks";

/// Reads and writes the whole task collection as one JSON array
pub struct TaskStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> TaskStore<S> {
    /// Wrap `storage`, keeping tasks under [`DEFAULT_KEY`]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_KEY.to_string(),
        }
    }

    /// Wrap `storage`, keeping tasks under `key`
    pub fn with_key(storage: S, key: &str) -> Result<Self> {
        validate_key(key)?;
        Ok(Self {
            storage,
            key: key.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the full collection
    ///
    /// An absent key, a stored `null`, or data that does not parse as a task
    /// array all load as an empty collection. Only storage failures are errors.
    pub fn load(&self) -> Result<Vec<Task>> {
        let raw = match self.storage.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str::<Option<Vec<Task>>>(&raw) {
            Ok(tasks) => {
                let tasks = tasks.unwrap_or_default();
                debug!(key = %self.key, count = tasks.len(), "Loaded tasks");
                Ok(tasks)
            }
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = ?e,
                    "Stored tasks are malformed, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the stored collection with `tasks`
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, count = tasks.len(), "Saved tasks");
        Ok(())
    }
}
