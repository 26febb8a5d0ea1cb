//! Daily tip and motivation.

use chrono::{Datelike, NaiveDate};

pub const TIPS: [&str; 5] = [
    "💧 Water early in the morning to reduce evaporation.",
    "🌱 Mulch keeps soil cool and reduces water loss.",
    "🔄 Rotate crops yearly to prevent soil pests.",
    "🐞 Encourage ladybugs to control aphids naturally.",
    "🕶 Shade young seedlings during hot noon sun.",
];

pub const MOTIVATIONS: [&str; 3] = [
    "Like a plant, you grow stronger every day you learn.",
    "Small seeds, big dreams — keep tending your ideas.",
    "A healthy garden grows a healthy mind.",
];

/// Tip for `date`, unless an override has been stored.
pub fn daily_tip(date: NaiveDate, override_tip: Option<&str>) -> String {
    match override_tip {
        Some(tip) => tip.to_string(),
        None => TIPS[date.day() as usize % TIPS.len()].to_string(),
    }
}

pub fn daily_motivation(date: NaiveDate) -> &'static str {
    MOTIVATIONS[date.day() as usize % MOTIVATIONS.len()]
}
