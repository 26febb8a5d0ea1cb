//! Task mutations: add, toggle, delete and clear.
//!
//! Every action reloads the full list from the store, applies one change,
//! writes the list back and re-renders both views. The store is the only
//! source of truth; views are always rebuilt from it.

use chrono::NaiveDate;

use crate::calendar::{render_calendar, CalendarView, DaySummary};
use crate::error::{GardenError, Rejection, Result};
use crate::listing::{render_task_list, TaskRow};
use crate::speech::Speaker;
use crate::store::{KeyValueStore, TaskStore};
use crate::task::Task;

/// Both derived views of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Views {
    pub list: Vec<TaskRow>,
    pub calendar: CalendarView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store was written.
    Changed,
    /// Nothing matched or the user declined; the store was left alone.
    Unchanged,
}

/// Result of one action: what happened and the fresh views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub outcome: Outcome,
    pub views: Views,
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub const CLEAR_PROMPT: &str = "Clear all tasks?";

/// Applies user actions to a [`TaskStore`] and re-renders after each one.
pub struct TaskMutator<S> {
    store: TaskStore<S>,
    year: i32,
    month: u32,
}

impl<S: KeyValueStore> TaskMutator<S> {
    /// Mutator whose calendar view shows `year`/`month`.
    pub fn new(store: TaskStore<S>, year: i32, month: u32) -> Self {
        TaskMutator { store, year, month }
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn month(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Point the calendar at another month.
    pub fn show_month(&mut self, year: i32, month: u32) -> Views {
        self.year = year;
        self.month = month;
        self.render()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.store.load()
    }

    /// Rebuild both views from the current store contents.
    pub fn render(&self) -> Views {
        let tasks = self.store.load();
        Views {
            list: render_task_list(&tasks),
            calendar: render_calendar(self.year, self.month, &tasks),
        }
    }

    fn finish(&self, outcome: Outcome) -> Update {
        Update {
            outcome,
            views: self.render(),
        }
    }

    /// Append a task. Blank text or a missing date is rejected without touching the store.
    pub fn add(&mut self, text: &str, date: Option<NaiveDate>) -> Result<Update> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::EmptyText.into());
        }
        let Some(date) = date else {
            return Err(Rejection::MissingDate.into());
        };
        let mut tasks = self.store.load();
        let id = self.store.allocate_id(&tasks)?;
        tasks.push(Task::new(id, text, date));
        self.store.save(&tasks)?;
        log::info!("added task {id} for {date}");
        Ok(self.finish(Outcome::Changed))
    }

    /// Set the done flag of task `id`. Unknown ids are a no-op.
    pub fn set_done(&mut self, id: u64, done: bool) -> Result<Update> {
        let mut tasks = self.store.load();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            log::debug!("set_done: no task {id}");
            return Ok(self.finish(Outcome::Unchanged));
        };
        task.done = done;
        self.store.save(&tasks)?;
        Ok(self.finish(Outcome::Changed))
    }

    /// Flip the done flag of task `id`. Unknown ids are a no-op.
    pub fn toggle(&mut self, id: u64) -> Result<Update> {
        let current = self.store.load().iter().find(|t| t.id == id).map(|t| t.done);
        match current {
            Some(done) => self.set_done(id, !done),
            None => Ok(self.finish(Outcome::Unchanged)),
        }
    }

    /// Remove task `id`. Unknown ids are a no-op.
    pub fn delete(&mut self, id: u64) -> Result<Update> {
        let mut tasks = self.store.load();
        let Some(pos) = tasks.iter().position(|t| t.id == id) else {
            log::debug!("delete: no task {id}");
            return Ok(self.finish(Outcome::Unchanged));
        };
        tasks.remove(pos);
        self.store.save(&tasks)?;
        log::info!("deleted task {id}");
        Ok(self.finish(Outcome::Changed))
    }

    /// Empty the store once the user confirms.
    pub fn clear_all(&mut self, confirm: &mut dyn Confirm) -> Result<Update> {
        if !confirm.confirm(CLEAR_PROMPT) {
            return Ok(self.finish(Outcome::Unchanged));
        }
        self.store.clear()?;
        log::info!("cleared all tasks");
        Ok(self.finish(Outcome::Changed))
    }

    /// Report what is scheduled on `date` and announce it.
    pub fn activate_day(&self, date: NaiveDate, speaker: &dyn Speaker) -> DaySummary {
        let summary = DaySummary::for_date(date, &self.store.load());
        speaker.speak(summary.utterance());
        summary
    }
}

/// True when `err` is an add rejection the user should simply be shown.
pub fn is_rejection(err: &GardenError) -> bool {
    matches!(err, GardenError::Rejected(_))
}
