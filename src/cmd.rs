//! Command implementations for the CLI interface.
//!
//! Each handler prints its result and exits with status 1 on failure, the
//! same way for every subcommand. Task commands go through the
//! [`TaskMutator`] so the store is reloaded and rewritten on every change.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::calculator::{fertilizer, seed_spacing, SPACING_INPUT_QUIP};
use crate::chatbot::{voice_command, Chatbot, EMPTY_QUESTION};
use crate::config::Config;
use crate::dates::{parse_date_input, parse_month, today};
use crate::error::{GardenError, Result};
use crate::html;
use crate::listing::print_rows;
use crate::mutator::{is_rejection, Outcome, TaskMutator, Update};
use crate::speech::{Listener, Speaker, Utterance, Voice};
use crate::store::FileStore;
use crate::tips::{daily_motivation, daily_tip};
use crate::tui::run::run_tui;
use crate::watering::{pick_quip, schedule};
use crate::weather::garden_advice;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a task for a date.
    Add {
        /// What needs doing.
        text: String,
        /// Date: YYYY-MM-DD, "today", "tomorrow", "in Nd", "in Nw" or a weekday.
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List all tasks.
    List,

    /// Mark a task done (or not done with --undo).
    Done {
        id: u64,
        #[arg(long)]
        undo: bool,
    },

    /// Flip a task between done and not done.
    Toggle { id: u64 },

    /// Delete a task.
    Delete { id: u64 },

    /// Delete every task.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Show a month calendar with task days marked.
    Calendar {
        /// Month to show as YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },

    /// Announce the tasks scheduled on a day.
    Day {
        /// Date in any form `add --date` accepts.
        date: String,
    },

    /// Show today's tip and motivation, or pin a tip of your own.
    Tip {
        /// Replace the rotating tip with this text.
        #[arg(long, conflicts_with = "reset")]
        set: Option<String>,
        /// Go back to the rotating tips.
        #[arg(long)]
        reset: bool,
    },

    /// How many plants fit across a bed.
    Spacing {
        /// Bed width in cm.
        #[arg(long)]
        width: f64,
        /// Spacing between plants in cm.
        #[arg(long)]
        spacing: f64,
    },

    /// Fertilizer needed for a bed.
    Fertilizer {
        /// Bed area in square metres.
        #[arg(long)]
        area: f64,
        /// Application rate in grams per square metre.
        #[arg(long)]
        rate: f64,
    },

    /// Plan this week's watering.
    Water {
        /// Water every N days.
        #[arg(long, default_value_t = 0)]
        every: u32,
    },

    /// Weather and gardening advice for a town.
    Weather {
        /// Town name, optionally with a country code ("Durban" or "London,GB").
        city: Option<String>,
    },

    /// Ask the gardening chatbot. Starts a conversation when no question is given.
    Chat {
        question: Option<String>,
        /// Read spoken transcripts that start with the wake word.
        #[arg(long)]
        voice: bool,
    },

    /// Show or set the name the assistant calls you.
    Name { name: Option<String> },

    /// Write the task list and calendar to an HTML page.
    Export {
        /// Output file path.
        #[arg(long, short, default_value = "garden.html")]
        output: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config) {
    if let Err(e) = run_tui(config) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

fn parse_date_or_exit(input: &str) -> NaiveDate {
    match parse_date_input(input, today()) {
        Some(date) => date,
        None => {
            eprintln!("Could not understand the date '{input}'.");
            std::process::exit(1);
        }
    }
}

/// Add a new task.
pub fn cmd_add(mutator: &mut TaskMutator<FileStore>, text: String, date: Option<String>) {
    let date = date.as_deref().map(parse_date_or_exit);
    match mutator.add(&text, date) {
        Ok(update) => {
            let added = update.views.list.last().map(|row| row.id).unwrap_or_default();
            println!("Added task {added}");
        }
        Err(e) if is_rejection(&e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_list(mutator: &TaskMutator<FileStore>) {
    print_rows(&mutator.render().list);
}

/// Set the done flag of a task.
pub fn cmd_done(mutator: &mut TaskMutator<FileStore>, id: u64, done: bool) {
    report_change(mutator.set_done(id, done), id, if done { "Marked done." } else { "Reopened." });
}

pub fn cmd_toggle(mutator: &mut TaskMutator<FileStore>, id: u64) {
    report_change(mutator.toggle(id), id, "Toggled.");
}

pub fn cmd_delete(mutator: &mut TaskMutator<FileStore>, id: u64) {
    report_change(mutator.delete(id), id, "Deleted.");
}

fn report_change(result: Result<Update>, id: u64, done_msg: &str) {
    match result {
        Ok(update) if update.outcome == Outcome::Changed => println!("{done_msg}"),
        Ok(_) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// True for answers that mean yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt_yes_no(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => is_yes(&line),
        Err(_) => false,
    }
}

/// Remove every task after confirmation.
pub fn cmd_clear(mutator: &mut TaskMutator<FileStore>, yes: bool) {
    let result = if yes {
        mutator.clear_all(&mut |_: &str| true)
    } else {
        mutator.clear_all(&mut prompt_yes_no)
    };
    match result {
        Ok(update) if update.outcome == Outcome::Changed => println!("All tasks cleared."),
        Ok(_) => println!("Nothing cleared."),
        Err(e) => {
            eprintln!("Failed to clear tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Print a month grid followed by the tasks on marked days.
pub fn cmd_calendar(mutator: &mut TaskMutator<FileStore>, month: Option<String>) {
    if let Some(m) = month {
        let Some((year, month)) = parse_month(&m) else {
            eprintln!("Month must look like YYYY-MM, got '{m}'.");
            std::process::exit(1);
        };
        mutator.show_month(year, month);
    }
    let view = mutator.render().calendar;
    print!("{}", view.to_text());
    let busy: Vec<_> = view.cells().filter_map(|c| c.as_day()).filter(|d| d.has_tasks()).collect();
    if !busy.is_empty() {
        println!();
        for day in busy {
            println!("{:>2}: {}", day.day, day.task_texts.join(", "));
        }
    }
}

pub fn cmd_day(mutator: &TaskMutator<FileStore>, speaker: &dyn Speaker, date: String) {
    let date = parse_date_or_exit(&date);
    let summary = mutator.activate_day(date, speaker);
    println!("{}", summary.message());
}

pub fn cmd_tip(mutator: &mut TaskMutator<FileStore>, set: Option<String>, reset: bool) {
    let store = mutator.store_mut();
    let changed = if let Some(tip) = set.as_deref() {
        store.set_override_tip(Some(tip))
    } else if reset {
        store.set_override_tip(None)
    } else {
        Ok(())
    };
    if let Err(e) = changed {
        eprintln!("Failed to save tip: {e}");
        std::process::exit(1);
    }
    let date = today();
    println!("🌱 Tip: {}", daily_tip(date, store.override_tip().as_deref()));
    println!("✨ {}", daily_motivation(date));
}

pub fn cmd_spacing(speaker: &dyn Speaker, width: f64, spacing: f64) {
    match seed_spacing(width, spacing) {
        Ok(result) => {
            println!("{}", result.message());
            println!("{}", result.quip());
            speaker.speak(Utterance::new(format!("{} {}", result.message(), result.quip())).playful());
        }
        Err(e) => {
            speaker.speak(Utterance::new(SPACING_INPUT_QUIP).playful());
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_fertilizer(area: f64, rate: f64) {
    match fertilizer(area, rate) {
        Ok(result) => println!("{}", result.message(area, rate)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_water(mutator: &TaskMutator<FileStore>, speaker: &dyn Speaker, every: u32) {
    let plan = schedule(today(), every);
    println!("{}", plan.summary());
    let name = mutator.store().user_name();
    let quip = pick_quip(&mut rand::rng());
    let reminder = plan.reminder(&name, Local::now().time(), quip);
    speaker.speak(Utterance::new(reminder).with_voice(Voice::Male));
}

pub fn cmd_weather(
    mutator: &TaskMutator<FileStore>,
    config: &Config,
    speaker: &dyn Speaker,
    listener: &mut dyn Listener,
    city: Option<String>,
) {
    let name = mutator.store().user_name();
    let city = match city.filter(|c| !c.trim().is_empty()) {
        Some(city) => city,
        None => {
            speaker.speak(Utterance::new(format!("Hey {name}, please say your town now.")).with_voice(Voice::Male));
            match listener.listen("Town:") {
                Some(city) => city,
                None => {
                    speaker.speak(Utterance::new("Sorry, I didn't catch that, try typing your town."));
                    eprintln!("No town given.");
                    std::process::exit(1);
                }
            }
        }
    };

    let mut source = config.weather_source();
    match source.fetch(&city) {
        Ok(report) => {
            let sentence = report.sentence(&name);
            let advice = garden_advice(&report.description, &name);
            println!("{sentence}");
            println!("{advice}");
            if report.canned {
                println!("(offline estimate, set weather_api_key for live data)");
            }
            speaker.speak(Utterance::new(format!("{sentence} {advice}")).with_voice(Voice::Male));
        }
        Err(GardenError::CityNotFound(_)) => {
            eprintln!("Sorry, I couldn't find that town. Try another.");
            speaker.speak(
                Utterance::new(format!("Oops {name}, I couldn't find {city}. Try another town."))
                    .with_voice(Voice::Male),
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Weather lookup failed: {e}");
            std::process::exit(1);
        }
    }
}

fn answer(bot: &Chatbot, speaker: &dyn Speaker, question: &str) {
    let reply = bot.reply(question);
    println!("{reply}");
    speaker.speak(Utterance::new(reply));
}

pub fn cmd_chat(
    config: &Config,
    speaker: &dyn Speaker,
    listener: &mut dyn Listener,
    question: Option<String>,
    voice: bool,
) {
    let bot = config.chatbot();
    if let Some(q) = question {
        answer(&bot, speaker, &q);
        return;
    }

    let prompt = if voice {
        format!("Say \"{}\" and your question:", config.assistant_name)
    } else {
        "You:".to_string()
    };
    println!("Ask me about soil, pests, watering or sums. An empty line or 'quit' ends the chat.");
    while let Some(line) = listener.listen(&prompt) {
        if matches!(line.trim().to_lowercase().as_str(), "quit" | "exit" | "bye") {
            break;
        }
        if voice {
            match voice_command(&line) {
                Ok(command) if command.is_empty() => answer(&bot, speaker, EMPTY_QUESTION),
                Ok(command) => answer(&bot, speaker, &command),
                Err(prompt) => {
                    println!("{prompt}");
                    speaker.speak(Utterance::new(prompt));
                }
            }
        } else {
            answer(&bot, speaker, &line);
        }
    }
}

pub fn cmd_name(mutator: &mut TaskMutator<FileStore>, name: Option<String>) {
    let store = mutator.store_mut();
    if let Some(name) = name {
        if let Err(e) = store.set_user_name(&name) {
            eprintln!("Failed to save name: {e}");
            std::process::exit(1);
        }
    }
    println!("Hello, {}!", store.user_name());
}

/// Write the current views to a standalone HTML page.
pub fn cmd_export(mutator: &TaskMutator<FileStore>, output: PathBuf) {
    let views = mutator.render();
    let tip = daily_tip(today(), mutator.store().override_tip().as_deref());
    let title = format!("{}'s garden", mutator.store().user_name());
    let page = html::page(&title, &tip, &views.list, &views.calendar);
    match std::fs::write(&output, page) {
        Ok(_) => println!("Exported {} task(s) to {}", views.list.len(), output.display()),
        Err(e) => {
            eprintln!("Failed to write {}: {e}", output.display());
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn parses_add_with_date() {
        let cli = Cli::try_parse_from(["garden", "add", "Sow carrots", "--date", "tomorrow"]).unwrap();
        match cli.command {
            Commands::Add { text, date } => {
                assert_eq!(text, "Sow carrots");
                assert_eq!(date.as_deref(), Some("tomorrow"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn tip_set_and_reset_conflict() {
        assert!(Cli::try_parse_from(["garden", "tip", "--set", "x", "--reset"]).is_err());
    }

    #[test]
    fn global_data_dir() {
        let cli = Cli::try_parse_from(["garden", "list", "--data-dir", "/tmp/g"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/g")));
    }
}
