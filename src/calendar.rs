//! Month grid view model.
//!
//! [`render_calendar`] turns a month and a task snapshot into rows of seven
//! cells, Sunday first. Leading blanks pad up to the weekday of the 1st and
//! trailing blanks fill out the last row. Cells for days that have tasks carry
//! the task texts, which is what activating a day reports.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};

use crate::dates::{days_in_month, month_name};
use crate::speech::{Utterance, Voice};
use crate::task::Task;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One in-month day of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    /// Texts of the tasks scheduled on `date`, in store order.
    pub task_texts: Vec<String>,
}

impl DayCell {
    pub fn has_tasks(&self) -> bool {
        !self.task_texts.is_empty()
    }

    /// `YYYY-MM-DD` key of this cell.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn summary(&self) -> DaySummary {
        DaySummary {
            date: self.date,
            task_texts: self.task_texts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

impl CalendarCell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            CalendarCell::Day(cell) => Some(cell),
            CalendarCell::Blank => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    /// Rows of exactly seven cells.
    pub weeks: Vec<Vec<CalendarCell>>,
}

impl CalendarView {
    /// "March 2025".
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten()
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.cells().filter_map(CalendarCell::as_day).find(|c| c.day == day)
    }

    /// Report what is scheduled on `day`, or `None` when the day is not in this month.
    pub fn activate(&self, day: u32) -> Option<DaySummary> {
        self.day(day).map(DayCell::summary)
    }

    /// Plain-text grid for terminal output. Days with tasks are marked with `*`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:^28}", self.title());
        let header: Vec<String> = WEEKDAY_HEADERS.iter().map(|h| format!("{:>3} ", h)).collect();
        let _ = writeln!(out, "{}", header.concat().trim_end());
        for week in &self.weeks {
            let line: String = week
                .iter()
                .map(|cell| match cell {
                    CalendarCell::Blank => "    ".to_string(),
                    CalendarCell::Day(c) => {
                        format!("{:>3}{}", c.day, if c.has_tasks() { '*' } else { ' ' })
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", line.trim_end());
        }
        out
    }
}

/// Build the grid for `year`/`month` from a task snapshot.
///
/// An invalid month yields a view with no weeks.
pub fn render_calendar(year: i32, month: u32, tasks: &[Task]) -> CalendarView {
    let mut weeks = Vec::new();
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return CalendarView { year, month, weeks };
    };

    let mut by_date: HashMap<NaiveDate, Vec<String>> = HashMap::new();
    for task in tasks {
        by_date.entry(task.date).or_default().push(task.text.clone());
    }

    let first_weekday = first.weekday().num_days_from_sunday();
    let days = days_in_month(year, month);
    let mut day = 1u32;

    // A month never spans more than six rows.
    for row in 0..6 {
        let mut week = Vec::with_capacity(7);
        for col in 0..7 {
            if (row == 0 && col < first_weekday) || day > days {
                week.push(CalendarCell::Blank);
                continue;
            }
            let date = first.with_day(day).unwrap_or(first);
            week.push(CalendarCell::Day(DayCell {
                day,
                date,
                task_texts: by_date.get(&date).cloned().unwrap_or_default(),
            }));
            day += 1;
        }
        weeks.push(week);
        if day > days {
            break;
        }
    }

    CalendarView { year, month, weeks }
}

/// What is scheduled on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Empty means nothing is scheduled.
    pub task_texts: Vec<String>,
}

impl DaySummary {
    pub fn for_date(date: NaiveDate, tasks: &[Task]) -> Self {
        DaySummary {
            date,
            task_texts: tasks
                .iter()
                .filter(|t| t.date == date)
                .map(|t| t.text.clone())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.task_texts.is_empty()
    }

    /// Announcement read out when the day is activated.
    pub fn message(&self) -> String {
        let date = self.date.format("%Y-%m-%d");
        match self.task_texts.len() {
            0 => format!("No tasks for {date}"),
            n => format!(
                "You have {n} task{} for {date}: {}",
                if n > 1 { "s" } else { "" },
                self.task_texts.join(", ")
            ),
        }
    }

    pub fn utterance(&self) -> Utterance {
        let voice = if self.is_empty() { Voice::Neutral } else { Voice::Male };
        Utterance::new(self.message()).with_voice(voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn day_numbers(week: &[CalendarCell]) -> Vec<Option<u32>> {
        week.iter().map(|c| c.as_day().map(|d| d.day)).collect()
    }

    #[test]
    fn thirty_day_month_starting_wednesday() {
        // April 2026 starts on a Wednesday.
        let view = render_calendar(2026, 4, &[]);
        assert_eq!(view.weeks.len(), 5);
        assert_eq!(
            day_numbers(&view.weeks[0]),
            vec![None, None, None, Some(1), Some(2), Some(3), Some(4)]
        );
        assert_eq!(
            day_numbers(&view.weeks[4]),
            vec![Some(26), Some(27), Some(28), Some(29), Some(30), None, None]
        );
    }

    #[test]
    fn month_that_fills_whole_rows_has_no_trailing_row() {
        // February 2026 starts on a Sunday and has 28 days.
        let view = render_calendar(2026, 2, &[]);
        assert_eq!(view.weeks.len(), 4);
        assert!(view.cells().all(|c| c.as_day().is_some()));
    }

    #[test]
    fn six_row_month() {
        // March 2025 starts on a Saturday.
        let view = render_calendar(2025, 3, &[]);
        assert_eq!(view.weeks.len(), 6);
        assert_eq!(day_numbers(&view.weeks[0])[6], Some(1));
        assert_eq!(
            day_numbers(&view.weeks[5]),
            vec![Some(30), Some(31), None, None, None, None, None]
        );
    }

    #[test]
    fn only_the_task_day_is_marked() {
        let tasks = vec![
            Task::new(1, "Sow carrots", d(2025, 3, 17)),
            Task::new(2, "Other month", d(2025, 4, 17)),
        ];
        let view = render_calendar(2025, 3, &tasks);
        for cell in view.cells().filter_map(CalendarCell::as_day) {
            assert_eq!(cell.has_tasks(), cell.day == 17, "day {}", cell.day);
        }
        assert_eq!(view.day(17).unwrap().date_key(), "2025-03-17");
    }

    #[test]
    fn activation_reports_texts_or_none() {
        let tasks = vec![
            Task::new(1, "Sow carrots", d(2025, 3, 17)),
            Task::new(2, "Water beans", d(2025, 3, 17)),
        ];
        let view = render_calendar(2025, 3, &tasks);

        let busy = view.activate(17).unwrap();
        assert_eq!(busy.task_texts, vec!["Sow carrots", "Water beans"]);
        assert_eq!(
            busy.message(),
            "You have 2 tasks for 2025-03-17: Sow carrots, Water beans"
        );
        assert_eq!(busy.utterance().voice, Voice::Male);

        let free = view.activate(18).unwrap();
        assert!(free.is_empty());
        assert_eq!(free.message(), "No tasks for 2025-03-18");
        assert_eq!(free.utterance().voice, Voice::Neutral);

        assert!(view.activate(32).is_none());
    }

    #[test]
    fn single_task_message_is_singular() {
        let tasks = vec![Task::new(1, "Weed", d(2025, 3, 2))];
        let summary = DaySummary::for_date(d(2025, 3, 2), &tasks);
        assert_eq!(summary.message(), "You have 1 task for 2025-03-02: Weed");
    }

    #[test]
    fn rendering_is_idempotent() {
        let tasks = vec![Task::new(1, "Sow carrots", d(2025, 3, 17))];
        assert_eq!(render_calendar(2025, 3, &tasks), render_calendar(2025, 3, &tasks));
    }

    #[test]
    fn invalid_month_is_empty() {
        assert!(render_calendar(2025, 13, &[]).weeks.is_empty());
    }

    #[test]
    fn text_grid_marks_task_days() {
        let tasks = vec![Task::new(1, "Sow carrots", d(2025, 3, 17))];
        let text = render_calendar(2025, 3, &tasks).to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].trim(), "March 2025");
        assert_eq!(lines[1], "Sun Mon Tue Wed Thu Fri Sat");
        assert_eq!(lines[2], "                          1");
        assert!(lines[5].contains(" 17*"));
        assert!(!lines[5].contains(" 18*"));
    }

    proptest! {
        #[test]
        fn grid_shape_matches_month(year in 1900i32..2100, month in 1u32..=12) {
            let view = render_calendar(year, month, &[]);
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let leading = first.weekday().num_days_from_sunday() as usize;
            let cells: Vec<&CalendarCell> = view.cells().collect();

            prop_assert!(view.weeks.iter().all(|w| w.len() == 7));
            prop_assert!(cells[..leading].iter().all(|c| c.as_day().is_none()));
            prop_assert!(cells[leading].as_day().map(|c| c.day) == Some(1));

            let numbered: Vec<u32> = cells.iter().filter_map(|c| c.as_day()).map(|c| c.day).collect();
            let expected: Vec<u32> = (1..=days_in_month(year, month)).collect();
            prop_assert_eq!(numbered, expected);

            let trailing = cells.len() - leading - days_in_month(year, month) as usize;
            prop_assert!(trailing < 7);
        }
    }
}
