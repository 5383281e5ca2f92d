//! Single-message screens: event notifications and level completion.

use cairn_core::{Color, Grid, Point};

use super::{Resolution, ScreenState, confirmed, modal, text_style};
use crate::colors;
use crate::input::Action;

/// Seconds before a confirm is accepted.
const MIN_SHOWN: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct Notice {
    title: String,
    lines: Vec<String>,
    accent: Color,
    resolution: Resolution,
    age: f32,
}

impl Notice {
    pub fn new(title: impl Into<String>, lines: Vec<String>, resolution: Resolution) -> Self {
        Self {
            title: title.into(),
            lines,
            accent: colors::FG_EMPH,
            resolution,
            age: 0.0,
        }
    }

    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    /// The end-of-level summary. Confirming it completes the level.
    pub fn completion(level: i32, turns: u32, money: u32, kills: u32) -> Self {
        Self::new(
            "Level complete",
            vec![
                format!("You descend from dungeon level {level}."),
                String::new(),
                format!("Turns taken:     {turns}"),
                format!("Gold collected:  {money}"),
                format!("Enemies slain:   {kills}"),
            ],
            Resolution::LevelComplete,
        )
        .with_accent(colors::GREEN)
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub(super) fn update(&mut self, dt: f32, actions: &[Action]) -> ScreenState {
        self.age += dt;
        if self.age >= MIN_SHOWN && confirmed(actions) {
            ScreenState::Done(self.resolution)
        } else {
            ScreenState::Running
        }
    }

    pub(super) fn draw(&self, grid: &Grid) {
        let width = self
            .lines
            .iter()
            .map(|l| l.chars().count())
            .chain([self.title.chars().count() + 4, 20])
            .max()
            .unwrap_or(20) as i32
            + 4;
        let height = self.lines.len() as i32 + 5;
        let inner = modal(grid, Point::new(width, height), &self.title);
        for (i, line) in self.lines.iter().enumerate() {
            inner.print(Point::new(1, i as i32), line, text_style(self.accent));
        }
        inner.print_centered(inner.height() - 1, "[Enter]", text_style(colors::FG_DIM));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_is_ignored_until_shown() {
        let mut n = Notice::new("Trap", vec!["Ouch.".into()], Resolution::Closed);
        assert_eq!(n.update(0.1, &[Action::Confirm]), ScreenState::Running);
        assert_eq!(n.update(0.2, &[]), ScreenState::Running);
        assert_eq!(
            n.update(0.0, &[Action::Confirm]),
            ScreenState::Done(Resolution::Closed)
        );
    }

    #[test]
    fn completion_completes_level() {
        let n = Notice::completion(2, 40, 100, 3);
        assert_eq!(n.resolution(), Resolution::LevelComplete);
        assert!(n.lines()[0].contains("level 2"));
    }
}
