//! Weekly watering schedule and its spoken reminder.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use rand::seq::IndexedRandom;
use rand::Rng;

pub const INVALID_FREQUENCY: &str = "Please select a valid watering frequency.";

pub const QUIPS: [&str; 4] = [
    "Don't let your spinach faint — it's screaming for water!",
    "Your plants are giving you the side-eye... better grab that watering can!",
    "C'mon gardener, time to hydrate your green babies before they gossip about you!",
    "Your spinach just tweeted: ‘Bro, we’re dry out here!’ 😂",
];

/// Watering days over the week starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WateringSchedule {
    pub every_days: u32,
    pub days: Vec<NaiveDate>,
}

impl WateringSchedule {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Weekday names, e.g. `["Monday", "Wednesday"]`.
    pub fn weekday_names(&self) -> Vec<String> {
        self.days.iter().map(|d| d.format("%A").to_string()).collect()
    }

    /// Line shown on screen.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            INVALID_FREQUENCY.to_string()
        } else {
            format!("💧 Water on: {}", self.weekday_names().join(", "))
        }
    }

    /// Spoken reminder addressed to `name` at `now`, ending with `quip`.
    pub fn reminder(&self, name: &str, now: NaiveTime, quip: &str) -> String {
        let mut message = format!("Hey {name}! It's {}. ", clock_12h(now));
        if self.is_empty() {
            message.push_str(&format!(
                "Oops, {name}, you forgot to choose your watering frequency! "
            ));
        } else {
            let n = self.every_days;
            message.push_str(&format!(
                "You should water every {n} day{}. ",
                if n > 1 { "s" } else { "" }
            ));
            message.push_str(&format!(
                "This week, remember to water on {}. ",
                self.weekday_names().join(", ")
            ));
        }
        message.push_str(quip);
        message
    }
}

/// Days `i` in `0..7` from `start` with `i % every_days == 0`. Zero yields nothing.
pub fn schedule(start: NaiveDate, every_days: u32) -> WateringSchedule {
    let days = if every_days == 0 {
        Vec::new()
    } else {
        (0..7u32)
            .filter(|i| i % every_days == 0)
            .map(|i| start + Duration::days(i as i64))
            .collect()
    };
    WateringSchedule { every_days, days }
}

/// A random closing line for the reminder.
pub fn pick_quip<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    QUIPS.choose(rng).copied().unwrap_or(QUIPS[0])
}

/// "7:05 AM", "12:30 PM".
pub fn clock_12h(time: NaiveTime) -> String {
    let hour = time.hour();
    let display_hour = if hour % 12 == 0 { 12 } else { hour % 12 };
    let ampm = if hour >= 12 { "PM" } else { "AM" };
    format!("{}:{:02} {}", display_hour, time.minute(), ampm)
}
