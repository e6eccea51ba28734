// Create, delete and toggle tasks over the store

use eyre::Result;
use tracing::{debug, info};

use crate::storage::KeyValueStorage;
use crate::store::TaskStore;
use crate::task::{Clock, Task, TaskId, next_id, title_key};

/// Why an add was refused. Nothing is written when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyTitle,
    DuplicateTitle,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyTitle => write!(f, "Please enter a task title"),
            Rejection::DuplicateTitle => write!(f, "A task with this title already exists"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Result of an add: the stored task, or the validation failure
pub type AddOutcome = std::result::Result<Task, Rejection>;

/// Mutation API over a [`TaskStore`]
///
/// Every operation reloads the collection, applies one change and writes the
/// whole collection back.
pub struct TaskList<S, C> {
    store: TaskStore<S>,
    clock: C,
}

impl<S: KeyValueStorage, C: Clock> TaskList<S, C> {
    pub fn new(store: TaskStore<S>, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// All stored tasks in insertion order
    pub fn list(&self) -> Result<Vec<Task>> {
        self.store.load()
    }

    pub fn get(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.store.load()?.into_iter().find(|t| t.id == id))
    }

    /// Validate and append a new task
    ///
    /// The outer `Result` carries storage failures; the inner one carries
    /// validation failures.
    pub fn add_task(&mut self, title: &str, description: &str) -> Result<AddOutcome> {
        if title.trim().is_empty() {
            debug!("add_task: rejected empty title");
            return Ok(Err(Rejection::EmptyTitle));
        }

        let mut tasks = self.store.load()?;
        let key = title_key(title);
        if tasks.iter().any(|t| t.title_key() == key) {
            debug!(title, "add_task: rejected duplicate title");
            return Ok(Err(Rejection::DuplicateTitle));
        }

        let now = self.clock.now();
        let id = next_id(&tasks, now.timestamp_millis());
        let task = Task::new(id, title, description, now);
        tasks.push(task.clone());
        self.store.save(&tasks)?;

        info!(id, title = %task.title, "Added task");
        Ok(Ok(task))
    }

    /// Remove the task with `id`. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let mut tasks = self.store.load()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        let removed = tasks.len() != before;

        self.store.save(&tasks)?;

        if removed {
            info!(id, "Deleted task");
        } else {
            debug!(id, "delete_task: no such task");
        }
        Ok(removed)
    }

    /// Flip completion on the task with `id`
    ///
    /// Returns the new completion state, or `None` (without writing) if no
    /// task has that id.
    pub fn toggle_task_completion(&mut self, id: TaskId) -> Result<Option<bool>> {
        let mut tasks = self.store.load()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "toggle_task_completion: no such task");
            return Ok(None);
        };
        task.completed = !task.completed;
        let completed = task.completed;

        self.store.save(&tasks)?;
        info!(id, completed, "Toggled task");
        Ok(Some(completed))
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let mut tasks = self.store.load()?;
        let before = tasks.len();
        tasks.retain(|t| !t.completed);
        let removed = before - tasks.len();
        if removed > 0 {
            self.store.save(&tasks)?;
            info!(count = removed, "Cleared completed tasks");
        }
        Ok(removed)
    }
}
