//! The pause overlay.

use cairn_core::{Cell, Grid, Point, Range};

use super::{box_style, modal, text_style};
use crate::colors;
use crate::input::Action;

/// What the player picked from the pause menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChoice {
    Resume,
    Restart,
    SaveAndExit,
}

const ITEMS: [(PauseChoice, &str); 3] = [
    (PauseChoice::Resume, "Resume"),
    (PauseChoice::Restart, "Restart level"),
    (PauseChoice::SaveAndExit, "Save and exit"),
];

#[derive(Debug, Clone, Default)]
pub struct PauseMenu {
    selected: usize,
}

impl PauseMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> PauseChoice {
        ITEMS[self.selected].0
    }

    /// Navigate and pick. Pressing pause again resumes.
    pub fn update(&mut self, actions: &[Action]) -> Option<PauseChoice> {
        for &action in actions {
            if action == Action::Pause {
                return Some(PauseChoice::Resume);
            }
            if action == Action::Confirm {
                return Some(self.selected());
            }
            if let Some(step) = action.menu_step() {
                let n = ITEMS.len() as i32;
                self.selected = (self.selected as i32 + step).rem_euclid(n) as usize;
            }
        }
        None
    }

    pub fn draw(&self, grid: &Grid) {
        let inner = modal(grid, Point::new(28, ITEMS.len() as i32 + 4), "Paused");
        for (i, (_, label)) in ITEMS.iter().enumerate() {
            let y = i as i32 + 1;
            if i == self.selected {
                let style = box_style().with_fg(colors::BOX_BG).with_bg(colors::BOX_FG);
                let row = inner.slice(Range::new(1, y, inner.width() - 1, y + 1));
                row.fill(Cell::new(' ', style));
                row.print_centered(0, label, style);
            } else {
                inner.print_centered(y, label, text_style(colors::FG_EMPH));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::Direction;

    #[test]
    fn navigation_wraps() {
        let mut m = PauseMenu::new();
        assert_eq!(m.update(&[Action::Move(Direction::North)]), None);
        assert_eq!(m.selected(), PauseChoice::SaveAndExit);
        assert_eq!(m.update(&[Action::Move(Direction::South)]), None);
        assert_eq!(m.selected(), PauseChoice::Resume);
    }

    #[test]
    fn confirm_and_pause() {
        let mut m = PauseMenu::new();
        m.update(&[Action::Move(Direction::South)]);
        assert_eq!(m.update(&[Action::Confirm]), Some(PauseChoice::Restart));
        assert_eq!(m.update(&[Action::Pause]), Some(PauseChoice::Resume));
        // Throws mean nothing here.
        assert_eq!(m.update(&[Action::Rock]), None);
    }
}
