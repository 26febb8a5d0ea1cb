//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Panel borders, headers and the status bar.
pub const LEAF_GREEN: Color = Color::Rgb(22, 163, 74);
/// Days with tasks and completed rows.
pub const SPROUT_GREEN: Color = Color::Rgb(34, 197, 94);
pub const FOREST: Color = Color::Rgb(20, 83, 45);
/// Muted text such as the tip line.
pub const STONE: Color = Color::Rgb(156, 163, 175);
/// Destructive confirmations.
pub const CLAY_RED: Color = Color::Rgb(127, 29, 29);
