//! Main application logic for the terminal user interface.
//!
//! The `App` owns a [`TaskMutator`] and the latest [`Views`] it produced.
//! Every key that changes tasks goes through the mutator, and the views it
//! hands back replace the ones on screen.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::calendar::{CalendarCell, DaySummary, WEEKDAY_HEADERS};
use crate::dates::{days_in_month, format_relative, shift_month};
use crate::error::Result;
use crate::mutator::{Outcome, TaskMutator, Update, Views, CLEAR_PROMPT};
use crate::speech::Speaker;
use crate::store::KeyValueStore;
use crate::tips::daily_tip;
use crate::tui::{
    colors::{CLAY_RED, FOREST, LEAF_GREEN, SPROUT_GREEN, STONE},
    enums::{AppState, Focus, FormField},
    input::InputField,
    task_form::TaskForm,
    utils::centered_rect,
};

pub struct App<S> {
    state: AppState,
    focus: Focus,
    mutator: TaskMutator<S>,
    views: Views,
    speaker: Box<dyn Speaker>,
    task_list_state: TableState,
    selected_day: u32,
    today: NaiveDate,
    form: TaskForm,
    day_summary: Option<DaySummary>,
    user_name: String,
    tip: String,
    status_message: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(mutator: TaskMutator<S>, speaker: Box<dyn Speaker>, today: NaiveDate) -> Self {
        let views = mutator.render();
        let (year, month) = mutator.month();
        let selected_day = if (year, month) == (today.year(), today.month()) {
            today.day()
        } else {
            1
        };
        let mut app = App {
            state: AppState::Main,
            focus: Focus::Tasks,
            mutator,
            views,
            speaker,
            task_list_state: TableState::default(),
            selected_day,
            today,
            form: TaskForm::new(),
            day_summary: None,
            user_name: String::new(),
            tip: String::new(),
            status_message: String::new(),
        };
        app.refresh();
        app
    }

    /// Re-read everything from the store.
    fn refresh(&mut self) {
        self.views = self.mutator.render();
        let store = self.mutator.store();
        self.user_name = store.user_name();
        self.tip = daily_tip(self.today, store.override_tip().as_deref());
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.views.list.len();
        match self.task_list_state.selected() {
            _ if len == 0 => self.task_list_state.select(None),
            Some(i) if i >= len => self.task_list_state.select(Some(len - 1)),
            None => self.task_list_state.select(Some(0)),
            _ => {}
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Take the views from a mutation and report how it went.
    fn apply(&mut self, result: Result<Update>, success: &str) {
        match result {
            Ok(update) => {
                let outcome = update.outcome;
                self.views = update.views;
                self.clamp_selection();
                match outcome {
                    Outcome::Changed => self.set_status_message(success),
                    Outcome::Unchanged => self.set_status_message("Nothing changed"),
                }
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn selected_task_id(&self) -> Option<u64> {
        self.task_list_state
            .selected()
            .and_then(|i| self.views.list.get(i))
            .map(|row| row.id)
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        let (year, month) = self.mutator.month();
        NaiveDate::from_ymd_opt(year, month, self.selected_day)
    }

    fn move_day(&mut self, delta: i64) {
        let (year, month) = self.mutator.month();
        let last = days_in_month(year, month).max(1) as i64;
        self.selected_day = (self.selected_day as i64 + delta).clamp(1, last) as u32;
    }

    fn show_month(&mut self, year: i32, month: u32) {
        self.views = self.mutator.show_month(year, month);
        self.selected_day = self.selected_day.min(days_in_month(year, month).max(1));
        self.clamp_selection();
    }

    fn page_month(&mut self, delta: i32) {
        let (year, month) = self.mutator.month();
        let (year, month) = shift_month(year, month, delta);
        self.show_month(year, month);
    }

    fn activate_selected_day(&mut self) {
        if let Some(date) = self.selected_date() {
            self.day_summary = Some(self.mutator.activate_day(date, self.speaker.as_ref()));
            self.state = AppState::DayDetail;
        }
    }

    fn open_add_form(&mut self) {
        self.form = match (self.focus, self.selected_date()) {
            (Focus::Calendar, Some(date)) => TaskForm::for_date(date),
            _ => TaskForm::new(),
        };
        self.state = AppState::AddTask;
    }

    fn handle_main_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.focus = self.focus.toggle(),
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            KeyCode::Char('C') => {
                if self.views.list.is_empty() {
                    self.set_status_message("No tasks to clear");
                } else {
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('[') => self.page_month(-1),
            KeyCode::Char(']') => self.page_month(1),
            KeyCode::Char('t') => {
                self.selected_day = self.today.day();
                self.show_month(self.today.year(), self.today.month());
            }
            KeyCode::Char('r') => {
                self.refresh();
                self.set_status_message("Refreshed");
            }
            _ => match self.focus {
                Focus::Tasks => self.handle_task_keys(key),
                Focus::Calendar => self.handle_calendar_keys(key),
            },
        }
        false
    }

    fn handle_task_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    self.task_list_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.views.list.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    let result = self.mutator.toggle(id);
                    self.apply(result, "Task updated");
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_task_id() {
                    let result = self.mutator.delete(id);
                    self.apply(result, "Task deleted");
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => self.move_day(-1),
            KeyCode::Right => self.move_day(1),
            KeyCode::Up => self.move_day(-7),
            KeyCode::Down => self.move_day(7),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected_day(),
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.state = AppState::Main,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.form.next_field(),
            KeyCode::Left => self.form.current_input().move_cursor_left(),
            KeyCode::Right => self.form.current_input().move_cursor_right(),
            KeyCode::Backspace => self.form.current_input().handle_backspace(),
            KeyCode::Delete => self.form.current_input().handle_delete(),
            KeyCode::Enter => {
                let (text, date) = match self.form.submission(self.today) {
                    Ok(parts) => parts,
                    Err(msg) => {
                        self.set_status_message(msg);
                        return;
                    }
                };
                match self.mutator.add(&text, date) {
                    Ok(update) => {
                        self.views = update.views;
                        let last = self.views.list.len().checked_sub(1);
                        self.task_list_state.select(last);
                        self.state = AppState::Main;
                        self.set_status_message("Task added");
                    }
                    Err(e) => self.set_status_message(e.to_string()),
                }
            }
            KeyCode::Char(c) => self.form.current_input().handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let answer = match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        let result = self.mutator.clear_all(&mut |_: &str| answer);
        self.apply(result, "All tasks cleared");
        self.state = AppState::Main;
    }

    /// Dispatch one key press. Returns true when the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status_message.clear();
        match self.state {
            AppState::Main => return self.handle_main_input(key, modifiers),
            AppState::AddTask => self.handle_form_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::DayDetail | AppState::Help => {
                self.day_summary = None;
                self.state = AppState::Main;
            }
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    fn panel_block(&self, title: String, focus: Focus) -> Block<'static> {
        let border = if self.focus == focus {
            Style::default().fg(LEAF_GREEN)
        } else {
            Style::default()
        };
        Block::default().borders(Borders::ALL).border_style(border).title(title)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("GARDEN ASSISTANT", Style::default().fg(LEAF_GREEN).add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(
                    format!("Hello, {}!", self.user_name),
                    Style::default().add_modifier(Modifier::ITALIC),
                ),
            ]),
            Line::from(Span::styled(self.tip.clone(), Style::default().fg(STONE))),
        ];
        let header = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(["", "Date", "When", "Task"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(FOREST).fg(Color::White));

        let rows: Vec<Row> = self
            .views
            .list
            .iter()
            .map(|row| {
                let when = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                    .map(|d| format_relative(d, self.today))
                    .unwrap_or_default();
                let style = if row.checked {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(row.checkbox()),
                    Cell::from(row.date.clone()),
                    Cell::from(when),
                    Cell::from(row.text.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Min(20),
        ];
        let title = format!("Tasks ({})", self.views.list.len());
        let table = Table::new(rows, widths)
            .header(header)
            .block(self.panel_block(title, Focus::Tasks))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn render_calendar(&self, f: &mut Frame, area: Rect) {
        let view = &self.views.calendar;
        let mut lines = vec![Line::from(
            WEEKDAY_HEADERS
                .iter()
                .map(|h| Span::styled(format!("{h:>3} "), Style::default().fg(LEAF_GREEN)))
                .collect::<Vec<_>>(),
        )];
        for week in &view.weeks {
            let spans: Vec<Span> = week
                .iter()
                .map(|cell| match cell {
                    CalendarCell::Blank => Span::raw("    "),
                    CalendarCell::Day(day) => {
                        let marker = if day.has_tasks() { '*' } else { ' ' };
                        let mut style = if day.has_tasks() {
                            Style::default().fg(SPROUT_GREEN).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        if day.date == self.today {
                            style = style.add_modifier(Modifier::UNDERLINED);
                        }
                        if day.day == self.selected_day {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Span::styled(format!("{:>3}{marker}", day.day), style)
                    }
                })
                .collect();
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
        if let Some(summary) = view.activate(self.selected_day) {
            lines.push(Line::from(Span::styled(
                summary.message(),
                Style::default().fg(STONE),
            )));
        }

        let title = format!("[ {} ]", view.title());
        let paragraph = Paragraph::new(lines)
            .block(self.panel_block(title, Focus::Calendar))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.render_header(f, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(32)])
            .split(chunks[1]);
        self.render_task_list(f, body[0]);
        self.render_calendar(f, body[1]);
    }

    fn render_input(f: &mut Frame, area: Rect, label: &str, field: &InputField) {
        let style = if field.active {
            Style::default().fg(LEAF_GREEN)
        } else {
            Style::default()
        };
        let input = Paragraph::new(field.value.as_str())
            .block(Block::default().borders(Borders::ALL).border_style(style).title(label.to_string()));
        f.render_widget(input, area);
        if field.active {
            f.set_cursor_position((area.x + 1 + field.cursor as u16, area.y + 1));
        }
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 50, area);
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(LEAF_GREEN))
            .title("Add Task");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
            .split(inner);
        Self::render_input(f, chunks[0], "Task", &self.form.text);
        Self::render_input(f, chunks[1], "Date (YYYY-MM-DD, today, tomorrow, in 3d, friday)", &self.form.date);

        let hint = match self.form.current_field {
            FormField::Text => "Tab: date field  Enter: save  Esc: cancel",
            FormField::Date => "Tab: task field  Enter: save  Esc: cancel",
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(STONE)).alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_day_detail(&self, f: &mut Frame, area: Rect) {
        let Some(summary) = &self.day_summary else {
            return;
        };
        let area = centered_rect(60, 40, area);
        f.render_widget(Clear, area);

        let mut lines = vec![Line::from(Span::styled(
            summary.message(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(""));
        for text in &summary.task_texts {
            lines.push(Line::from(format!("  • {text}")));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Press any key to close", Style::default().fg(STONE))));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(LEAF_GREEN))
                    .title(summary.date.format("%A %-d %B %Y").to_string()),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Garden Assistant Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Everywhere:", bold)),
            Line::from("  Tab          Switch between tasks and calendar"),
            Line::from("  a            Add a task (date prefilled from the calendar)"),
            Line::from("  [ / ]        Previous / next month"),
            Line::from("  t            Jump to today"),
            Line::from("  C            Clear all tasks"),
            Line::from("  r            Reload from disk"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            Line::from(Span::styled("Tasks panel:", bold)),
            Line::from("  ↑/↓ or k/j   Select task"),
            Line::from("  Space/x      Toggle done"),
            Line::from("  d/Delete     Delete task"),
            Line::from(""),
            Line::from(Span::styled("Calendar panel:", bold)),
            Line::from("  ←/→          Previous / next day"),
            Line::from("  ↑/↓          Previous / next week"),
            Line::from("  Enter/Space  Announce the day's tasks"),
        ];
        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(CLAY_RED));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(CLEAR_PROMPT, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("{} task(s) will be removed.", self.views.list.len())),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Main => {
                    let panel = match self.focus {
                        Focus::Tasks => "tasks",
                        Focus::Calendar => "calendar",
                    };
                    format!(
                        "Tasks: {} | Panel: {panel} (Tab to switch) | a add | h help",
                        self.views.list.len()
                    )
                }
                AppState::AddTask => "Add New Task".to_string(),
                AppState::DayDetail => "Day Details".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(LEAF_GREEN).fg(Color::Black))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Main => self.render_main(f, chunks[0]),
            AppState::AddTask => {
                self.render_main(f, chunks[0]);
                self.render_task_form(f, chunks[0]);
            }
            AppState::DayDetail => {
                self.render_main(f, chunks[0]);
                self.render_day_detail(f, chunks[0]);
            }
            AppState::Confirm => {
                self.render_main(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }
        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop. Runs until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;
            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{RecordingSpeaker, Utterance};
    use crate::store::{MemoryStore, TaskStore};
    use ratatui::backend::TestBackend;
    use std::rc::Rc;

    struct Shared(Rc<RecordingSpeaker>);

    impl Speaker for Shared {
        fn speak(&self, utterance: Utterance) {
            self.0.speak(utterance);
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    fn app() -> (App<MemoryStore>, Rc<RecordingSpeaker>) {
        let speaker = Rc::new(RecordingSpeaker::default());
        let mutator = TaskMutator::new(TaskStore::new(MemoryStore::new()), 2025, 3);
        (App::new(mutator, Box::new(Shared(speaker.clone())), today()), speaker)
    }

    fn press(app: &mut App<MemoryStore>, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App<MemoryStore>, text: &str, date: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, text);
        press(app, KeyCode::Tab);
        type_text(app, date);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn add_through_the_form() {
        let (mut app, _) = app();
        add(&mut app, "Sow carrots", "2025-03-17");
        assert_eq!(app.state, AppState::Main);
        assert_eq!(app.status_message, "Task added");
        assert_eq!(app.views.list.len(), 1);
        assert!(app.views.calendar.day(17).unwrap().has_tasks());
        assert_eq!(app.task_list_state.selected(), Some(0));
    }

    #[test]
    fn form_rejects_missing_date() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Water");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert_eq!(app.status_message, "Please enter a task and choose a date.");
        assert!(app.views.list.is_empty());
    }

    #[test]
    fn toggle_and_delete_selected() {
        let (mut app, _) = app();
        add(&mut app, "A", "2025-03-01");
        add(&mut app, "B", "2025-03-02");
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.views.list[0].checked);
        assert!(!app.views.list[1].checked);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.views.list.len(), 1);
        assert_eq!(app.views.list[0].text, "B");
        assert_eq!(app.task_list_state.selected(), Some(0));
    }

    #[test]
    fn calendar_day_is_announced() {
        let (mut app, speaker) = app();
        add(&mut app, "Sow carrots", "2025-03-17");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::DayDetail);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state, AppState::Main);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            speaker.texts(),
            vec!["You have 1 task for 2025-03-17: Sow carrots", "No tasks for 2025-03-18"]
        );
    }

    #[test]
    fn calendar_prefills_the_form_date() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.date.value, "2025-03-24");
    }

    #[test]
    fn month_paging_clamps_the_day() {
        let (mut app, _) = app();
        press(&mut app, KeyCode::Tab);
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected_day, 31);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.views.calendar.month, 4);
        assert_eq!(app.selected_day, 30);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!((app.views.calendar.month, app.selected_day), (3, 17));
    }

    #[test]
    fn clear_needs_confirmation() {
        let (mut app, _) = app();
        add(&mut app, "A", "today");
        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.views.list.len(), 1);

        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.views.list.is_empty());
        assert_eq!(app.status_message, "All tasks cleared");
    }

    #[test]
    fn quit_keys() {
        let (mut app, _) = app();
        assert!(!press(&mut app, KeyCode::Char('h')));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn renders_tasks_and_calendar() {
        let (mut app, _) = app();
        add(&mut app, "Sow carrots", "2025-03-17");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("Sow carrots"));
        assert!(screen.contains("March 2025"));
        assert!(screen.contains(" 17*"));
        assert!(screen.contains("Hello, friend!"));
    }
}
