//! Long-lived collaborators shared by every scene.
//!
//! One [`AppContext`] is created at startup and handed by reference to
//! whatever needs settings, assets, audio, the save store or the map source.

use std::env;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::assets::{Assets, AudioSink, LogAudio};
use crate::error::{MapError, MapSourceError};
use crate::input::Keymap;
use crate::map_source::{MAP_EXTENSION, MapSource};
use crate::save::SaveStore;
use crate::settings::Settings;

/// Pixels per tile of the map images.
pub const TILE_SIZE: i32 = 16;

/// Why a level could not be started.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no maps available in {0}")]
    NoMaps(PathBuf),
    #[error(transparent)]
    Source(#[from] MapSourceError),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Where the game reads and writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub map_dir: PathBuf,
}

impl Paths {
    /// `CAIRN_DATA_DIR` (default `./data`) and `CAIRN_MAP_DIR` (default
    /// `./maps`).
    pub fn from_env() -> Self {
        let dir = |var: &str, default: &str| {
            env::var_os(var)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            data_dir: dir("CAIRN_DATA_DIR", "data"),
            map_dir: dir("CAIRN_MAP_DIR", "maps"),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        Settings::path_in(&self.data_dir)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("cairn.log")
    }
}

pub struct AppContext {
    pub paths: Paths,
    pub settings: Settings,
    pub keymap: Keymap,
    pub assets: Assets,
    pub audio: Box<dyn AudioSink>,
    pub saves: SaveStore,
    pub maps: Option<MapSource>,
    pub rng: StdRng,
}

impl AppContext {
    /// Load settings, build assets and scan for maps. Nothing here is fatal;
    /// a missing map set surfaces when a level is requested.
    pub fn new(paths: Paths, audio: Box<dyn AudioSink>) -> Self {
        let settings = Settings::load_or_default(&paths.settings_file());
        let keymap = settings.keymap();
        let maps = match MapSource::scan(&paths.map_dir, MAP_EXTENSION) {
            Ok(maps) => Some(maps),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        };
        Self {
            saves: SaveStore::in_dir(&paths.data_dir),
            paths,
            settings,
            keymap,
            assets: Assets::with_defaults(),
            audio,
            maps,
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    /// A context rooted at `dir` with a silent audio sink.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(
            Paths {
                data_dir: dir.join("data"),
                map_dir: dir.join("maps"),
            },
            Box::new(LogAudio),
        )
    }

    /// Play a sound effect by key at the configured volume.
    pub fn play_sound(&mut self, key: &str) {
        match self.assets.sound(key) {
            Some(sound) => self.audio.play(sound, self.settings.sfx_gain()),
            None => log::warn!("no sound `{key}`"),
        }
    }

    /// The next map from the shuffled bag.
    pub fn random_map(&mut self) -> Result<RgbaImage, LevelError> {
        let maps = self
            .maps
            .as_mut()
            .ok_or_else(|| LevelError::NoMaps(self.paths.map_dir.clone()))?;
        Ok(maps.load_random(&mut self.rng)?)
    }
}
