//! # garden - terminal gardening assistant
//!
//! A single-user gardening helper with a task calendar at its core, plus
//! daily tips, calculators, a watering planner, weather advice and a small
//! rule-based chatbot. Messages can be read aloud through a local
//! text-to-speech program.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! garden ui
//!
//! # Add a task and see it on the calendar
//! garden add "Sow carrots" --date friday
//! garden calendar
//!
//! # Ask a question
//! garden chat "how to prevent pests"
//! ```
//!
//! ## Data
//!
//! Tasks, the display name and a pinned tip live in `storage.json` inside the
//! data directory (`--data-dir`, `$GARDEN_HOME` or `~/.garden`). An optional
//! `config.json` next to it selects the speech program and API keys.
//!
//! Logging goes to stderr through `env_logger`; set `RUST_LOG=debug` for detail.

use chrono::Datelike;
use clap::Parser;

pub mod calculator;
pub mod calendar;
pub mod chatbot;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod error;
pub mod html;
pub mod listing;
pub mod mutator;
pub mod speech;
pub mod store;
pub mod task;
pub mod tips;
pub mod watering;
pub mod weather;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use mutator::TaskMutator;
use speech::StdinListener;
use store::{FileStore, TaskStore};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir.clone());
    log::debug!("data directory: {}", config.data_dir.display());

    match cli.command {
        Commands::Ui => {
            cmd_ui(&config);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return;
        }
        Commands::Spacing { width, spacing } => {
            cmd_spacing(config.speaker().as_ref(), width, spacing);
            return;
        }
        Commands::Fertilizer { area, rate } => {
            cmd_fertilizer(area, rate);
            return;
        }
        _ => {}
    }

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        eprintln!("Failed to create data directory {}: {}", config.data_dir.display(), e);
        std::process::exit(1);
    }

    let today = dates::today();
    let store = TaskStore::new(FileStore::open(&config.store_path()));
    let mut mutator = TaskMutator::new(store, today.year(), today.month());
    let speaker = config.speaker();
    let mut listener = StdinListener;

    match cli.command {
        Commands::Ui
        | Commands::Completions { .. }
        | Commands::Spacing { .. }
        | Commands::Fertilizer { .. } => unreachable!("handled above"),

        Commands::Add { text, date } => cmd_add(&mut mutator, text, date),
        Commands::List => cmd_list(&mutator),
        Commands::Done { id, undo } => cmd_done(&mut mutator, id, !undo),
        Commands::Toggle { id } => cmd_toggle(&mut mutator, id),
        Commands::Delete { id } => cmd_delete(&mut mutator, id),
        Commands::Clear { yes } => cmd_clear(&mut mutator, yes),
        Commands::Calendar { month } => cmd_calendar(&mut mutator, month),
        Commands::Day { date } => cmd_day(&mutator, speaker.as_ref(), date),
        Commands::Tip { set, reset } => cmd_tip(&mut mutator, set, reset),
        Commands::Water { every } => cmd_water(&mutator, speaker.as_ref(), every),
        Commands::Weather { city } => {
            cmd_weather(&mutator, &config, speaker.as_ref(), &mut listener, city)
        }
        Commands::Chat { question, voice } => {
            cmd_chat(&config, speaker.as_ref(), &mut listener, question, voice)
        }
        Commands::Name { name } => cmd_name(&mut mutator, name),
        Commands::Export { output } => cmd_export(&mutator, output),
    }
}
