//! Cairn: a turn-based dungeon crawler where every fight, lock and trap is
//! settled with rock-paper-scissors.
//!
//! The game runs on the `cairn-core` Elm-style loop. [`model::CairnModel`]
//! owns the [`context::AppContext`] and the current [`level::Level`].

pub mod assets;
pub mod colors;
pub mod context;
pub mod entity;
pub mod error;
pub mod input;
pub mod journal;
pub mod level;
pub mod map;
pub mod map_source;
pub mod mapgen;
pub mod minigame;
pub mod model;
pub mod save;
pub mod screens;
pub mod settings;

pub use context::{AppContext, Paths};
pub use level::{Carry, Level, LevelConfig, LevelSignal};
pub use model::CairnModel;
