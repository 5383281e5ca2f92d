//! User settings persisted as TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::input::{Keymap, default_controls};

pub const SETTINGS_FILE: &str = "settings.toml";

/// Display, audio and control preferences. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub show_grid: bool,
    pub show_fps: bool,
    pub fullscreen: bool,
    /// At 2 or more each tile is drawn two columns wide.
    pub camera_zoom: f32,
    pub master_volume: u8,
    pub music_volume: u8,
    pub sfx_volume: u8,
    /// Allow 8-way movement instead of 4-way.
    pub diagonal_movement: bool,
    /// Action name → key names.
    pub controls: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_grid: false,
            show_fps: false,
            fullscreen: true,
            camera_zoom: 2.0,
            master_volume: 80,
            music_volume: 60,
            sfx_volume: 80,
            diagonal_movement: false,
            controls: default_controls(),
        }
    }
}

impl Settings {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        let mut settings: Settings = toml::from_str(&text)?;
        settings.clamp();
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error. A missing file
    /// is created with the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(s) => {
                log::info!("settings loaded from {}", path.display());
                s
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no settings at {}, writing defaults", path.display());
                let settings = Self::default();
                if let Err(e) = settings.save(path) {
                    log::warn!("cannot write default settings: {e}");
                }
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn clamp(&mut self) {
        self.master_volume = self.master_volume.min(100);
        self.music_volume = self.music_volume.min(100);
        self.sfx_volume = self.sfx_volume.min(100);
        if !self.camera_zoom.is_finite() || self.camera_zoom <= 0.0 {
            self.camera_zoom = 1.0;
        }
    }

    /// Columns per map tile on screen.
    pub fn tile_columns(&self) -> i32 {
        if self.camera_zoom >= 2.0 { 2 } else { 1 }
    }

    /// Effective sound-effect volume in `0.0..=1.0`.
    pub fn sfx_gain(&self) -> f32 {
        (self.master_volume as f32 / 100.0) * (self.sfx_volume as f32 / 100.0)
    }

    pub fn keymap(&self) -> Keymap {
        Keymap::from_controls(&self.controls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(dir.path());
        let mut s = Settings::default();
        s.show_grid = true;
        s.sfx_volume = 35;
        s.controls
            .insert("inspect".to_string(), vec!["i".to_string()]);
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let s: Settings = toml::from_str("show_fps = true\n[controls]\npause = [\"q\"]\n").unwrap();
        assert!(s.show_fps);
        assert_eq!(s.master_volume, Settings::default().master_volume);
        assert_eq!(s.controls.len(), 1);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "show_grid = \"maybe\"").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Settings::path_in(&dir.path().join("data"));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert!(path.exists());
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn volumes_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "master_volume = 250\ncamera_zoom = 1.0").unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.master_volume, 100);
        assert_eq!(s.tile_columns(), 1);
    }
}
