//! Drawables and sounds looked up by string key.
//!
//! The terminal build draws every sprite as a [`Glyph`] and routes sounds
//! through an [`AudioSink`]. The table is filled before any map is built.

use std::collections::HashMap;

use cairn_core::style::Color;

use crate::colors;

/// A sprite rendered as one character with colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

/// Opaque handle to a sound effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoundHandle(String);

impl SoundHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Somewhere sounds can be played.
pub trait AudioSink {
    /// Play `sound` at `volume` in `0.0..=1.0`.
    fn play(&mut self, sound: &SoundHandle, volume: f32);
}

/// Writes sound requests to the log instead of a mixer.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, sound: &SoundHandle, volume: f32) {
        if volume > 0.0 {
            log::debug!("sound `{}` at {:.0}%", sound.name(), volume * 100.0);
        }
    }
}

/// Glyph shown for a missing sprite key.
const MISSING: Glyph = Glyph::new('?', colors::MAGENTA, colors::BG);

const GLYPHS: &[(&str, Glyph)] = &[
    ("abyss", Glyph::new(' ', colors::FG, colors::ABYSS_BG)),
    ("floor", Glyph::new('·', colors::FLOOR_FG, colors::FLOOR_BG)),
    ("entrance", Glyph::new('<', colors::GREEN, colors::FLOOR_BG)),
    ("exit", Glyph::new('>', colors::BLUE, colors::FLOOR_BG)),
    ("trap", Glyph::new('·', colors::FLOOR_FG, colors::FLOOR_BG)),
    ("trap_sprung", Glyph::new('^', colors::MAGENTA, colors::FLOOR_BG)),
    ("fountain", Glyph::new('~', colors::CYAN, colors::FLOOR_BG)),
    ("fountain_dry", Glyph::new('~', colors::FG_DIM, colors::FLOOR_BG)),
    ("merchant", Glyph::new('M', colors::DARK_GREEN, colors::FLOOR_BG)),
    ("chest", Glyph::new('=', colors::ORANGE, colors::FLOOR_BG)),
    ("chest_open", Glyph::new('_', colors::ORANGE, colors::FLOOR_BG)),
    ("gold", Glyph::new('$', colors::GOLD, colors::FLOOR_BG)),
    ("enemy", Glyph::new('g', colors::RED, colors::FLOOR_BG)),
    ("boss", Glyph::new('D', colors::DARK_RED, colors::FLOOR_BG)),
    ("player", Glyph::new('@', colors::YELLOW, colors::FLOOR_BG)),
];

const SOUNDS: &[&str] = &[
    "step", "bump", "win", "tie", "lose", "coin", "unlock", "jam", "trap", "heal", "trade",
    "victory", "defeat", "descend",
];

/// Sprite and sound lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    glyphs: HashMap<String, Glyph>,
    sounds: HashMap<String, SoundHandle>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in terminal tileset and sound names.
    pub fn with_defaults() -> Self {
        let mut assets = Self::new();
        for &(key, glyph) in GLYPHS {
            assets.insert_glyph(key, glyph);
        }
        for &key in SOUNDS {
            assets.insert_sound(key);
        }
        log::debug!(
            "assets ready: {} glyphs, {} sounds",
            assets.glyphs.len(),
            assets.sounds.len()
        );
        assets
    }

    pub fn insert_glyph(&mut self, key: &str, glyph: Glyph) {
        self.glyphs.insert(key.to_string(), glyph);
    }

    pub fn insert_sound(&mut self, key: &str) {
        self.sounds
            .insert(key.to_string(), SoundHandle(key.to_string()));
    }

    pub fn glyph(&self, key: &str) -> Option<Glyph> {
        self.glyphs.get(key).copied()
    }

    /// The glyph for `key`, or a visible placeholder.
    pub fn glyph_or_missing(&self, key: &str) -> Glyph {
        self.glyph(key).unwrap_or(MISSING)
    }

    pub fn sound(&self, key: &str) -> Option<&SoundHandle> {
        self.sounds.get(key)
    }
}
