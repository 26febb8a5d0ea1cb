//! Add-task form for the terminal user interface.

use chrono::NaiveDate;

use crate::dates::parse_date_input;
use crate::tui::{enums::FormField, input::InputField};

/// Text and date inputs for a new task.
pub struct TaskForm {
    pub text: InputField,
    pub date: InputField,
    pub current_field: FormField,
}

impl TaskForm {
    pub fn new() -> Self {
        let mut form = TaskForm {
            text: InputField::new(),
            date: InputField::new(),
            current_field: FormField::Text,
        };
        form.update_active_field();
        form
    }

    /// Blank form with the date field prefilled.
    pub fn for_date(date: NaiveDate) -> Self {
        let mut form = Self::new();
        form.date = InputField::with_value(&date.format("%Y-%m-%d").to_string());
        form.update_active_field();
        form
    }

    pub fn update_active_field(&mut self) {
        self.text.active = self.current_field == FormField::Text;
        self.date.active = self.current_field == FormField::Date;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Text => FormField::Date,
            FormField::Date => FormField::Text,
        };
        self.update_active_field();
    }

    pub fn current_input(&mut self) -> &mut InputField {
        match self.current_field {
            FormField::Text => &mut self.text,
            FormField::Date => &mut self.date,
        }
    }

    /// Task text and the parsed date. A blank date is `None`; text the date
    /// parser does not understand is an error message for the status bar.
    pub fn submission(&self, today: NaiveDate) -> Result<(String, Option<NaiveDate>), String> {
        let raw = self.date.value.trim();
        if raw.is_empty() {
            return Ok((self.text.value.clone(), None));
        }
        match parse_date_input(raw, today) {
            Some(date) => Ok((self.text.value.clone(), Some(date))),
            None => Err(format!("Could not understand the date '{raw}'")),
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    #[test]
    fn tab_cycles_fields() {
        let mut form = TaskForm::new();
        assert!(form.text.active && !form.date.active);
        form.next_field();
        assert_eq!(form.current_field, FormField::Date);
        assert!(form.date.active && !form.text.active);
        form.next_field();
        assert_eq!(form.current_field, FormField::Text);
    }

    #[test]
    fn submission_parses_dates() {
        let mut form = TaskForm::new();
        for c in "Sow beans".chars() {
            form.current_input().handle_char(c);
        }
        assert_eq!(form.submission(today()), Ok(("Sow beans".to_string(), None)));

        form.next_field();
        for c in "tomorrow".chars() {
            form.current_input().handle_char(c);
        }
        let (_, date) = form.submission(today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 18));

        form.date = InputField::with_value("someday");
        assert!(form.submission(today()).is_err());
    }

    #[test]
    fn prefilled_date() {
        let form = TaskForm::for_date(today());
        assert_eq!(form.date.value, "2025-03-17");
        assert_eq!(form.date.cursor, 10);
    }
}
