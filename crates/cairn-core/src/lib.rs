//! **cairn-core**: frame-driven terminal game loop and drawing primitives.
//!
//! Geometry, a styled cell canvas with relative sub-views, input messages
//! (including the per-frame [`Msg::Tick`]), and the [`App`] loop that drives
//! a [`Model`] through a back-end [`Driver`].

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Direction, Point, Range};
pub use grid::{Frame, FrameCell, Grid};
pub use messages::{Key, ModMask, Msg};
pub use style::{AttrMask, Color, Style};
