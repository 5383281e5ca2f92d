//! Error types for map construction and the persistence collaborators.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration-fatal failures while building a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has neither a player marker nor an entrance tile")]
    NoPlayerStart,
    #[error("map layout is empty")]
    EmptyLayout,
    #[error("layout has {found} tiles but a {width}x{height} map needs {expected}")]
    LayoutSize {
        width: i32,
        height: i32,
        expected: u64,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum MapSourceError {
    #[error("cannot read map directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode map image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no map files with extension .{ext} in {dir}")]
    Empty { dir: PathBuf, ext: String },
    #[error("map index {index} out of range ({len} maps)")]
    BadIndex { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("savefile I/O: {0}")]
    Io(#[from] io::Error),
    #[error("savefile is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O: {0}")]
    Io(#[from] io::Error),
    #[error("settings are not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
