//! The savefile record and its JSON store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entity::{Creature, StatKind};
use crate::error::SaveError;

pub const SAVE_FILE: &str = "savefile.json";

/// Everything needed to rebuild a run: player, counters, map size and the
/// entity-kind ids stacked on every tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveFile {
    pub player_stats: BTreeMap<String, i64>,
    pub dungeon_stats: BTreeMap<String, i64>,
    pub map_settings: BTreeMap<String, i64>,
    pub map_layout: Vec<Vec<i32>>,
}

impl SaveFile {
    /// An empty record carries no run.
    pub fn is_empty(&self) -> bool {
        self.map_layout.is_empty()
    }

    pub fn dungeon_stat(&self, key: &str) -> Option<i64> {
        self.dungeon_stats.get(key).copied()
    }

    pub fn map_setting(&self, key: &str) -> Option<i64> {
        self.map_settings.get(key).copied()
    }
}

fn stat_key(prefix: &str, kind: StatKind) -> String {
    format!("{prefix}_{}", kind.name())
}

/// Flatten a player's persistent state.
pub fn player_stats(player: &Creature) -> BTreeMap<String, i64> {
    let mut stats = BTreeMap::new();
    stats.insert("hp".to_string(), player.hp() as i64);
    stats.insert("max_hp".to_string(), player.max_hp() as i64);
    stats.insert("money".to_string(), player.money() as i64);
    for kind in StatKind::ALL {
        stats.insert(stat_key("offense", kind), player.offense.get(kind) as i64);
        stats.insert(stat_key("defense", kind), player.defense.get(kind) as i64);
    }
    stats
}

/// Apply saved values onto a player. Missing keys keep the current value.
pub fn restore_player(player: &mut Creature, stats: &BTreeMap<String, i64>) {
    let get = |key: &str| stats.get(key).map(|&v| v.clamp(0, i32::MAX as i64) as i32);
    if let Some(max_hp) = get("max_hp") {
        player.set_max_hp(max_hp);
    }
    if let Some(hp) = get("hp") {
        player.set_hp(hp);
    }
    if let Some(money) = get("money") {
        player.set_money(money as u32);
    }
    for kind in StatKind::ALL {
        if let Some(v) = get(&stat_key("offense", kind)) {
            player.offense.set(kind, v);
        }
        if let Some(v) = get(&stat_key("defense", kind)) {
            player.defense.set(kind, v);
        }
    }
}

/// Reads and writes the savefile on disk.
#[derive(Debug)]
pub struct SaveStore {
    path: PathBuf,
    current: Option<SaveFile>,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
        }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SAVE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&SaveFile> {
        self.current.as_ref()
    }

    fn read(&self) -> Result<SaveFile, SaveError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load the savefile. Any failure, or an empty record, leaves the store
    /// with no savefile.
    pub fn load(&mut self) -> Option<&SaveFile> {
        self.current = match self.read() {
            Ok(save) if save.is_empty() => None,
            Ok(save) => {
                log::info!("savefile loaded from {}", self.path.display());
                Some(save)
            }
            Err(SaveError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("ignoring savefile {}: {e}", self.path.display());
                None
            }
        };
        self.current.as_ref()
    }

    fn write(&self, save: &SaveFile) -> Result<(), SaveError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(save)?)?;
        Ok(())
    }

    pub fn save(&mut self, save: SaveFile) -> Result<(), SaveError> {
        self.write(&save)?;
        log::info!("savefile written to {}", self.path.display());
        self.current = Some(save);
        Ok(())
    }

    /// Forget the in-memory savefile and overwrite the file with an empty
    /// record.
    pub fn reset(&mut self) -> Result<(), SaveError> {
        self.current = None;
        self.write(&SaveFile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MapObject;

    fn sample() -> SaveFile {
        let mut s = SaveFile::default();
        s.dungeon_stats.insert("level".to_string(), 3);
        s.map_settings.insert("width".to_string(), 2);
        s.map_settings.insert("height".to_string(), 1);
        s.map_layout = vec![vec![1, 11], vec![3]];
        s
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::in_dir(dir.path());
        assert!(store.load().is_none());
        store.save(sample()).unwrap();
        let mut fresh = SaveStore::in_dir(dir.path());
        assert_eq!(fresh.load(), Some(&sample()));
    }

    #[test]
    fn bad_files_mean_no_savefile() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::in_dir(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_none());
        fs::write(store.path(), r#"{"map_layout": "wrong type"}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn reset_writes_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::in_dir(dir.path());
        store.save(sample()).unwrap();
        store.reset().unwrap();
        assert!(store.current().is_none());
        let text = fs::read_to_string(store.path()).unwrap();
        let on_disk: SaveFile = serde_json::from_str(&text).unwrap();
        assert!(on_disk.is_empty());
        assert!(store.load().is_none());
    }

    #[test]
    fn player_stats_round_trip() {
        let mut player = MapObject::player();
        let p = player.creature_mut().unwrap();
        p.increase_max_hp(7);
        p.damage(20, StatKind::Physical);
        p.add_money(42);
        p.increase_offense(StatKind::Magical, 4);
        let stats = player_stats(p);

        let mut other = MapObject::player();
        let q = other.creature_mut().unwrap();
        restore_player(q, &stats);
        assert_eq!(q, p);
    }
}
