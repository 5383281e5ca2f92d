//! Color palette for the terminal rendering.

use cairn_core::style::Color;

pub const BG: Color = Color::DEFAULT;
pub const FG: Color = Color::DEFAULT;
/// Dimmed foreground for hints and unrevealed values.
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

pub const ABYSS_BG: Color = Color::from_rgb(12, 12, 18);
pub const FLOOR_FG: Color = Color::from_rgb(110, 115, 125);
pub const FLOOR_BG: Color = Color::from_rgb(30, 31, 38);
/// Background of every other tile when the grid overlay is on.
pub const GRID_BG: Color = Color::from_rgb(36, 37, 46);

pub const RED: Color = Color::from_rgb(255, 85, 85);
pub const DARK_RED: Color = Color::from_rgb(170, 40, 40);
pub const GREEN: Color = Color::from_rgb(80, 200, 80);
pub const DARK_GREEN: Color = Color::from_rgb(40, 130, 60);
pub const YELLOW: Color = Color::from_rgb(241, 250, 140);
pub const GOLD: Color = Color::from_rgb(255, 200, 60);
pub const ORANGE: Color = Color::from_rgb(255, 150, 60);
pub const BLUE: Color = Color::from_rgb(100, 140, 255);
pub const CYAN: Color = Color::from_rgb(110, 220, 230);
pub const MAGENTA: Color = Color::from_rgb(200, 120, 220);

/// Modal box frame.
pub const BOX_FG: Color = Color::from_rgb(189, 147, 249);
pub const BOX_BG: Color = Color::from_rgb(24, 24, 32);
