//! Input and timing messages: [`Msg`], [`Key`], [`ModMask`].

use std::fmt;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,
    /// A printable character.
    Char(char),
}

impl Key {
    /// Parse a key name as written in configuration files.
    ///
    /// Names are case-insensitive except for single characters, which are
    /// taken literally (`"Q"` and `"q"` are different keys).
    pub fn from_name(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(if c == ' ' { Key::Space } else { Key::Char(c) });
        }
        let key = match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "esc" | "escape" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "space" => Key::Space,
            "backspace" => Key::Backspace,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowUp => f.write_str("Up"),
            Key::ArrowDown => f.write_str("Down"),
            Key::ArrowLeft => f.write_str("Left"),
            Key::ArrowRight => f.write_str("Right"),
            Key::Escape => f.write_str("Esc"),
            Key::Enter => f.write_str("Enter"),
            Key::Tab => f.write_str("Tab"),
            Key::Space => f.write_str("Space"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::PageUp => f.write_str("PageUp"),
            Key::PageDown => f.write_str("PageDown"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ModMask
// ---------------------------------------------------------------------------

/// Bitmask of modifier keys held during an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ModMask(pub u8);

impl ModMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for ModMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Msg
// ---------------------------------------------------------------------------

/// A message delivered to the application model.
#[derive(Clone, Debug)]
pub enum Msg {
    /// A key was pressed.
    KeyDown {
        key: Key,
        modifiers: ModMask,
        time: Instant,
    },
    /// One frame elapsed; `dt` is the time since the previous tick.
    Tick { dt: Duration },
    /// The terminal was resized.
    Screen { width: i32, height: i32 },
    /// Sent once when the application starts.
    Init,
    /// The driver requests shutdown (e.g. Ctrl+C).
    Quit,
}

impl Msg {
    /// Convenience: a `KeyDown` with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            modifiers: ModMask::NONE,
            time: Instant::now(),
        }
    }

    /// Convenience: a tick of `secs` seconds.
    pub fn tick(secs: f32) -> Self {
        Self::Tick {
            dt: Duration::from_secs_f32(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_round_trip() {
        for key in [
            Key::ArrowUp,
            Key::Escape,
            Key::Enter,
            Key::Space,
            Key::PageDown,
            Key::Char('w'),
            Key::Char('Q'),
        ] {
            assert_eq!(Key::from_name(&key.to_string()), Some(key));
        }
    }

    #[test]
    fn key_names_are_case_insensitive_for_words() {
        assert_eq!(Key::from_name("ESC"), Some(Key::Escape));
        assert_eq!(Key::from_name("left"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("nonsense"), None);
        assert_eq!(Key::from_name(""), None);
    }
}
