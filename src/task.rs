// Task data model

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Task identifier, derived from the creation time in milliseconds
pub type TaskId = i64;

/// A titled, optionally described, completable unit of work
///
/// Field names match the persisted layout (`createdAt` in camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh, incomplete task. Title and description are trimmed.
    pub fn new(id: TaskId, title: &str, description: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            completed: false,
            created_at,
        }
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// Title comparison key used for the uniqueness check
    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }
}

/// Normalize a title for case-insensitive duplicate detection
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Pick the id for a task created at `now_ms`.
///
/// Ids stay timestamp-shaped but never repeat: if another task already holds
/// an id at or after `now_ms`, the next integer after the largest one is used.
/// When that would overflow, the closest free id at or below `now_ms` is taken.
pub fn next_id<'a, I>(existing: I, now_ms: i64) -> TaskId
where
    I: IntoIterator<Item = &'a Task>,
{
    let ids: HashSet<TaskId> = existing.into_iter().map(|t| t.id).collect();
    match ids.iter().max() {
        Some(&max) if max >= now_ms => match max.checked_add(1) {
            Some(id) => id,
            None => {
                warn!(max, "Task ids exhausted upward, reusing a free id below the clock");
                (i64::MIN..=now_ms).rev().find(|id| !ids.contains(id)).unwrap_or(now_ms)
            }
        },
        _ => now_ms,
    }
}

/// Source of the current time, so mutation and notification code can be
/// driven with a fixed clock in tests
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, advanced manually
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::cell::Cell<i64>,
}

#[cfg(test)]
impl FixedClock {
    pub fn at_ms(ms: i64) -> Self {
        Self {
            now: std::cell::Cell::new(ms),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        use chrono::TimeZone;
        Utc.timestamp_millis_opt(self.now.get())
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: TaskId, title: &str) -> Task {
        Task::new(id, title, "", Utc.timestamp_millis_opt(id).unwrap())
    }

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        assert!(ts > 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_new_task_trims_and_starts_incomplete() {
        let t = Task::new(1, "  Buy milk ", "  two litres ", Utc::now());
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.description, "two litres");
        assert!(!t.completed);
        assert!(t.has_description());
    }

    #[test]
    fn test_title_key_is_case_insensitive() {
        assert_eq!(title_key("  My Task "), "my task");
        assert_eq!(task(1, "MY TASK").title_key(), title_key("my task"));
    }

    #[test]
    fn test_next_id_uses_timestamp_when_free() {
        let tasks = vec![task(100, "a"), task(200, "b")];
        assert_eq!(next_id(&tasks, 1_000), 1_000);
        assert_eq!(next_id(&[] as &[Task], 42), 42);
    }

    #[test]
    fn test_next_id_never_collides_within_same_millisecond() {
        let mut tasks = vec![task(1_000, "a")];
        let id = next_id(&tasks, 1_000);
        assert_eq!(id, 1_001);
        tasks.push(task(id, "b"));
        assert_eq!(next_id(&tasks, 1_000), 1_002);
    }

    #[test]
    fn test_next_id_does_not_overflow() {
        let last = Task::new(i64::MAX, "a", "", Utc::now());
        let tasks = vec![last.clone()];
        assert_eq!(next_id(&tasks, 1_000), 1_000);

        let tasks = vec![last, task(1_000, "b"), task(999, "c")];
        assert_eq!(next_id(&tasks, 1_000), 998);
    }

    #[test]
    fn test_task_serialization_layout() {
        let t = Task::new(1_700_000_000_000, "Write docs", "", Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"createdAt\":\"2023-11-14T22:13:20Z\""));
        assert!(json.contains("\"completed\":false"));
    }

    #[test]
    fn test_task_deserializes_browser_layout() {
        let json = r#"{"id":1700000000000,"title":"My Task","completed":true,"createdAt":"2023-11-14T22:13:20.000Z"}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, 1_700_000_000_000);
        assert!(t.completed);
        assert_eq!(t.description, "");
        assert_eq!(t.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::at_ms(5_000);
        assert_eq!(clock.now_ms(), 5_000);
        clock.advance_ms(250);
        assert_eq!(clock.now_ms(), 5_250);
    }
}
