//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Main,
    AddTask,
    DayDetail,
    Help,
    Confirm,
}

/// Which panel of the main screen receives navigation keys.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    Tasks,
    Calendar,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Tasks => Focus::Calendar,
            Focus::Calendar => Focus::Tasks,
        }
    }
}

/// Fields of the add-task form, in tab order.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    Text,
    Date,
}
