//! Task record stored by the garden calendar.
//!
//! A task is a single dated to-do ("Sow carrots", 2025-03-17). Tasks are kept
//! in insertion order and addressed by their `id`, which is assigned once at
//! creation and never reused while the record exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated garden chore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier. Records written before ids existed load as 0 and
    /// are renumbered by the store.
    #[serde(default)]
    pub id: u64,
    /// Free-form user text. Escape before embedding in markup.
    pub text: String,
    /// Scheduled day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Create a new, not yet completed task.
    pub fn new(id: u64, text: impl Into<String>, date: NaiveDate) -> Self {
        Task {
            id,
            text: text.into(),
            date,
            done: false,
        }
    }

    /// Calendar key used to match a task against a calendar cell.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Next free id for `tasks`.
pub fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

/// Give every record without an id (or with a duplicate one) a fresh id,
/// preserving order.
pub fn assign_missing_ids(tasks: &mut [Task]) -> bool {
    let mut seen = std::collections::HashSet::new();
    let mut next = next_id(tasks);
    let mut changed = false;
    for task in tasks.iter_mut() {
        if task.id == 0 || !seen.insert(task.id) {
            task.id = next;
            seen.insert(next);
            next += 1;
            changed = true;
        }
    }
    changed
}
