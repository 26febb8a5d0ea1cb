//! Task list view model: one row per stored task.

use crate::html::escape_html;
use crate::task::Task;

/// A display row: checkbox, label, date and a delete handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Handle for the toggle and delete controls.
    pub id: u64,
    pub checked: bool,
    /// Raw text, safe for terminal widgets only.
    pub text: String,
    /// Markup-escaped text for HTML output.
    pub label: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl TaskRow {
    pub fn checkbox(&self) -> &'static str {
        if self.checked { "[x]" } else { "[ ]" }
    }
}

/// Build the rows for `tasks`, keeping store order. Always a full rebuild.
pub fn render_task_list(tasks: &[Task]) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|t| TaskRow {
            id: t.id,
            checked: t.done,
            text: t.text.clone(),
            label: escape_html(&t.text),
            date: t.date_key(),
        })
        .collect()
}

/// Print rows as a table on stdout.
pub fn print_rows(rows: &[TaskRow]) {
    if rows.is_empty() {
        println!("No tasks yet. Add one with `garden add <text> --date <date>`.");
        return;
    }
    println!("{:<5} {:<4} {:<11} {}", "ID", "Done", "Date", "Task");
    for row in rows {
        println!("{:<5} {:<4} {:<11} {}", row.id, row.checkbox(), row.date, row.text);
    }
}
