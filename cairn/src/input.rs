//! Player actions and the key bindings that produce them.

use std::collections::{BTreeMap, HashMap};

use cairn_core::{Direction, Key};

/// Something the player asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Direction),
    Inspect,
    Pause,
    Confirm,
    Rock,
    Paper,
    Scissors,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::Move(Direction::North),
        Action::Move(Direction::South),
        Action::Move(Direction::West),
        Action::Move(Direction::East),
        Action::Move(Direction::NorthWest),
        Action::Move(Direction::NorthEast),
        Action::Move(Direction::SouthWest),
        Action::Move(Direction::SouthEast),
        Action::Inspect,
        Action::Pause,
        Action::Confirm,
        Action::Rock,
        Action::Paper,
        Action::Scissors,
    ];

    /// Name used in the `[controls]` table of the settings file.
    pub fn name(self) -> &'static str {
        match self {
            Action::Move(Direction::North) => "move_north",
            Action::Move(Direction::South) => "move_south",
            Action::Move(Direction::West) => "move_west",
            Action::Move(Direction::East) => "move_east",
            Action::Move(Direction::NorthWest) => "move_north_west",
            Action::Move(Direction::NorthEast) => "move_north_east",
            Action::Move(Direction::SouthWest) => "move_south_west",
            Action::Move(Direction::SouthEast) => "move_south_east",
            Action::Inspect => "inspect",
            Action::Pause => "pause",
            Action::Confirm => "confirm",
            Action::Rock => "rock",
            Action::Paper => "paper",
            Action::Scissors => "scissors",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Default key names for the action.
    pub fn default_keys(self) -> &'static [&'static str] {
        match self {
            Action::Move(Direction::North) => &["Up", "k", "w"],
            Action::Move(Direction::South) => &["Down", "j"],
            Action::Move(Direction::West) => &["Left", "h", "a"],
            Action::Move(Direction::East) => &["Right", "l", "d"],
            Action::Move(Direction::NorthWest) => &["y"],
            Action::Move(Direction::NorthEast) => &["u"],
            Action::Move(Direction::SouthWest) => &["b"],
            Action::Move(Direction::SouthEast) => &["n"],
            Action::Inspect => &["x", "Tab"],
            Action::Pause => &["Esc"],
            Action::Confirm => &["Enter", "Space"],
            Action::Rock => &["1", "r"],
            Action::Paper => &["2", "p"],
            Action::Scissors => &["3", "s"],
        }
    }

    /// The vertical step of a move, used for menu navigation.
    pub fn menu_step(self) -> Option<i32> {
        match self {
            Action::Move(Direction::North) => Some(-1),
            Action::Move(Direction::South) => Some(1),
            _ => None,
        }
    }
}

/// The default `[controls]` table.
pub fn default_controls() -> BTreeMap<String, Vec<String>> {
    Action::ALL
        .into_iter()
        .map(|a| {
            let keys = a.default_keys().iter().map(|k| k.to_string()).collect();
            (a.name().to_string(), keys)
        })
        .collect()
}

/// Key → action lookup built from the controls table.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<Key, Action>,
}

impl Keymap {
    /// Build from a controls table. Unknown action or key names are skipped
    /// with a warning; the first action bound to a key keeps it. Actions
    /// missing from the table fall back to their default keys.
    pub fn from_controls(controls: &BTreeMap<String, Vec<String>>) -> Self {
        let mut map = Self::default();
        for (name, keys) in controls {
            let Some(action) = Action::from_name(name) else {
                log::warn!("unknown action `{name}` in controls");
                continue;
            };
            for key_name in keys {
                map.bind_name(key_name, action);
            }
        }
        for action in Action::ALL {
            if !controls.contains_key(action.name()) {
                for key_name in action.default_keys() {
                    map.bind_name(key_name, action);
                }
            }
        }
        map
    }

    fn bind_name(&mut self, key_name: &str, action: Action) {
        let Some(key) = Key::from_name(key_name) else {
            log::warn!("unknown key `{key_name}` for action `{}`", action.name());
            return;
        };
        if let Some(prev) = self.bindings.get(&key) {
            if *prev != action {
                log::warn!(
                    "key `{key}` already bound to `{}`, not rebinding to `{}`",
                    prev.name(),
                    action.name()
                );
            }
            return;
        }
        self.bindings.insert(key, action);
    }

    pub fn action(&self, key: Key) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    /// Keys bound to `action`, for help text.
    pub fn keys_for(&self, action: Action) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|&(_, a)| *a == action)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip() {
        for a in Action::ALL {
            assert_eq!(Action::from_name(a.name()), Some(a));
        }
        assert_eq!(Action::from_name("jump"), None);
    }

    #[test]
    fn default_controls_bind_every_action() {
        let map = Keymap::from_controls(&default_controls());
        for a in Action::ALL {
            assert!(!map.keys_for(a).is_empty(), "{a:?}");
        }
        assert_eq!(map.action(Key::ArrowUp), Some(Action::Move(Direction::North)));
        assert_eq!(map.action(Key::Space), Some(Action::Confirm));
        assert_eq!(map.action(Key::Char('2')), Some(Action::Paper));
    }

    #[test]
    fn bad_entries_are_skipped() {
        let mut controls = BTreeMap::new();
        controls.insert("fly".to_string(), vec!["f".to_string()]);
        controls.insert(
            "inspect".to_string(),
            vec!["NotAKey".to_string(), "q".to_string()],
        );
        let map = Keymap::from_controls(&controls);
        assert_eq!(map.action(Key::Char('f')), None);
        assert_eq!(map.action(Key::Char('q')), Some(Action::Inspect));
        // Not overridden, so still on the defaults.
        assert_eq!(map.action(Key::Escape), Some(Action::Pause));
        assert_eq!(map.action(Key::Char('x')), None);
    }
}
