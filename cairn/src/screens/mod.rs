//! Modal screens that resolve scheduled events.
//!
//! The level owns at most one [`Screen`]. While it is current the screen gets
//! every frame's input and time, mutates the map through a [`ScreenCtx`],
//! and reports [`ScreenState::Done`] with a [`Resolution`] once finished.
//! The level then drops the screen and applies the resolution. Screens never
//! close themselves and cannot be cancelled.

mod battle;
mod lockpick;
mod notice;
mod pause;

pub use battle::{Battle, BattlePhase, RoundReport};
pub use lockpick::Lockpick;
pub use notice::Notice;
pub use pause::{PauseChoice, PauseMenu};

use cairn_core::{Color, Grid, Point, Style};
use rand::rngs::StdRng;

use crate::colors;
use crate::entity::EntityId;
use crate::input::Action;
use crate::journal::Journal;
use crate::map::GameMap;
use crate::minigame::Throw;

/// What the level must do once a screen is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Closed,
    Reward {
        amount: u32,
    },
    EnemyDefeated {
        enemy: EntityId,
        tile: usize,
        bounty: u32,
        boss: bool,
    },
    PlayerDefeated,
    LevelComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Running,
    Done(Resolution),
}

/// Level state lent to the current screen for one update.
pub struct ScreenCtx<'a> {
    pub map: &'a mut GameMap,
    pub rng: &'a mut StdRng,
    pub journal: &'a mut Journal,
    pub sounds: &'a mut Vec<&'static str>,
    pub know_everything: &'a mut bool,
}

/// Level state lent to the current screen for drawing.
pub struct ScreenView<'a> {
    pub map: &'a GameMap,
    pub know_everything: bool,
}

/// The event screen currently owning input.
#[derive(Debug, Clone)]
pub enum Screen {
    Battle(Battle),
    Lockpick(Lockpick),
    Notice(Notice),
}

impl Screen {
    pub fn update(&mut self, dt: f32, actions: &[Action], ctx: &mut ScreenCtx) -> ScreenState {
        match self {
            Screen::Battle(b) => b.update(dt, actions, ctx),
            Screen::Lockpick(l) => l.update(dt, actions, ctx),
            Screen::Notice(n) => n.update(dt, actions),
        }
    }

    /// Make `mine` against a known opponent throw. False when the screen is
    /// not waiting for a throw.
    pub fn play(&mut self, ctx: &mut ScreenCtx, mine: Throw, theirs: Throw) -> bool {
        match self {
            Screen::Battle(b) => b.play(ctx, mine, theirs),
            Screen::Lockpick(l) => l.play(ctx, mine, theirs),
            Screen::Notice(_) => false,
        }
    }

    pub fn draw(&self, grid: &Grid, view: &ScreenView) {
        match self {
            Screen::Battle(b) => b.draw(grid, view),
            Screen::Lockpick(l) => l.draw(grid),
            Screen::Notice(n) => n.draw(grid),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Battle(_) => "battle",
            Screen::Lockpick(_) => "lockpick",
            Screen::Notice(_) => "notice",
        }
    }
}

/// The throw chosen this frame, if any.
pub(crate) fn chosen_throw(actions: &[Action]) -> Option<Throw> {
    actions.iter().find_map(|a| match a {
        Action::Rock => Some(Throw::Rock),
        Action::Paper => Some(Throw::Paper),
        Action::Scissors => Some(Throw::Scissors),
        _ => None,
    })
}

pub(crate) fn confirmed(actions: &[Action]) -> bool {
    actions.contains(&Action::Confirm)
}

pub(crate) fn box_style() -> Style {
    Style::default()
        .with_fg(colors::BOX_FG)
        .with_bg(colors::BOX_BG)
}

/// Draw a titled modal box of `size` centered in `grid`; returns its inner
/// view.
pub(crate) fn modal(grid: &Grid, size: Point, title: &str) -> Grid {
    let size = Point::new(size.x.min(grid.width()), size.y.min(grid.height()));
    let area = grid.area().centered(size);
    grid.slice(area).draw_box(title, box_style())
}

pub(crate) const THROW_HINT: &str = "[1] rock  [2] paper  [3] scissors";

pub(crate) fn text_style(fg: Color) -> Style {
    box_style().with_fg(fg)
}
