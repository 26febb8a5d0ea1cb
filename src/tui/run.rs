//! TUI entry point and terminal setup.

use std::io;

use chrono::Datelike;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::dates::today;
use crate::mutator::TaskMutator;
use crate::store::{FileStore, TaskStore};
use crate::tui::app::App;

/// Initialise the terminal, run the app until the user quits, then restore it.
pub fn run_tui(config: &Config) -> io::Result<()> {
    let today = today();
    let store = TaskStore::new(FileStore::open(&config.store_path()));
    let mutator = TaskMutator::new(store, today.year(), today.month());
    let mut app = App::new(mutator, config.tui_speaker(), today);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
