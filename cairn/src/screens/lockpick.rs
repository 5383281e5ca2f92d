//! Picking a locked chest with one round of rock-paper-scissors.

use cairn_core::{Grid, Point};

use super::{
    Resolution, ScreenCtx, ScreenState, THROW_HINT, chosen_throw, confirmed, modal, text_style,
};
use crate::colors;
use crate::entity::EntityId;
use crate::input::Action;
use crate::journal::Tone;
use crate::map::GameMap;
use crate::minigame::{self, Outcome, Throw, resolve_against};

/// Seconds before the result accepts a confirm.
const RESULT_DELAY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Choosing,
    Result {
        mine: Throw,
        theirs: Throw,
        outcome: Outcome,
        amount: u32,
    },
}

#[derive(Debug, Clone)]
pub struct Lockpick {
    treasure: EntityId,
    state: State,
    /// Time since the result was shown.
    timer: f32,
}

impl Lockpick {
    pub fn new(treasure: EntityId) -> Self {
        Self {
            treasure,
            state: State::Choosing,
            timer: 0.0,
        }
    }

    /// Apply an attempt to the treasure and return the money won.
    ///
    /// A win opens the lock and yields the whole reward. A tie opens it but
    /// half the reward (integer floor) is spilled. A loss jams the pick: the
    /// chest stays locked and can be tried again.
    pub fn settle(map: &mut GameMap, treasure: EntityId, outcome: Outcome) -> u32 {
        let Some(obj) = map.get_mut(treasure) else {
            return 0;
        };
        match outcome {
            Outcome::Win => {
                obj.unlock();
                obj.take_reward()
            }
            Outcome::Tie => {
                obj.unlock();
                obj.take_reward() / 2
            }
            Outcome::Lose => 0,
        }
    }

    pub(super) fn play(&mut self, ctx: &mut ScreenCtx, mine: Throw, theirs: Throw) -> bool {
        self.pick(ctx, mine, Some(theirs))
    }

    fn pick(&mut self, ctx: &mut ScreenCtx, mine: Throw, theirs: Option<Throw>) -> bool {
        if self.state != State::Choosing {
            return false;
        }
        let (outcome, theirs) = match theirs {
            Some(theirs) => (resolve_against(mine, theirs), theirs),
            None => minigame::resolve(mine, &mut *ctx.rng),
        };
        let amount = Self::settle(ctx.map, self.treasure, outcome);
        log::debug!(
            "lockpick {} vs {}: {outcome:?}, {amount} gold",
            mine.name(),
            theirs.name()
        );
        let (text, tone, sound) = match outcome {
            Outcome::Win => (format!("the lock clicks open: {amount} gold"), Tone::Good, "unlock"),
            Outcome::Tie => (
                format!("the lock gives, spilling half the coins: {amount} gold"),
                Tone::Good,
                "unlock",
            ),
            Outcome::Lose => ("your pick jams".to_string(), Tone::Bad, "jam"),
        };
        ctx.journal.write(&text, tone);
        ctx.sounds.push(sound);
        self.state = State::Result {
            mine,
            theirs,
            outcome,
            amount,
        };
        self.timer = 0.0;
        true
    }

    pub(super) fn update(&mut self, dt: f32, actions: &[Action], ctx: &mut ScreenCtx) -> ScreenState {
        match self.state {
            State::Choosing => {
                if let Some(mine) = chosen_throw(actions) {
                    self.pick(ctx, mine, None);
                }
                ScreenState::Running
            }
            State::Result { amount, .. } => {
                self.timer += dt;
                if self.timer >= RESULT_DELAY && confirmed(actions) {
                    let res = if amount > 0 {
                        Resolution::Reward { amount }
                    } else {
                        Resolution::Closed
                    };
                    return ScreenState::Done(res);
                }
                ScreenState::Running
            }
        }
    }

    pub(super) fn draw(&self, grid: &Grid) {
        let inner = modal(grid, Point::new(44, 9), "Locked chest");
        let normal = text_style(colors::FG_EMPH);
        let dim = text_style(colors::FG_DIM);
        match self.state {
            State::Choosing => {
                inner.print_centered(1, "Pick the lock: choose your throw.", normal);
                inner.print_centered(3, THROW_HINT, dim);
            }
            State::Result {
                mine,
                theirs,
                outcome,
                amount,
            } => {
                inner.print_centered(
                    1,
                    &format!("{} vs {}", mine.name(), theirs.name()),
                    normal,
                );
                let (text, fg) = match outcome {
                    Outcome::Win => (format!("Opened! +{amount} gold"), colors::GOLD),
                    Outcome::Tie => (format!("Forced open, +{amount} gold"), colors::ORANGE),
                    Outcome::Lose => ("The pick jams.".to_string(), colors::RED),
                };
                inner.print_centered(3, &text, text_style(fg));
                inner.print_centered(5, "[Enter]", dim);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EventKind, MapObject};
    use crate::journal::Journal;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn locked_chest(reward: u32) -> (GameMap, EntityId) {
        let mut map = GameMap::new(Point::new(1, 1), 16);
        let id = map.add_and_place(0, MapObject::chest_with_reward(reward, true));
        (map, id)
    }

    #[test]
    fn win_takes_everything() {
        let (mut map, id) = locked_chest(40);
        assert_eq!(Lockpick::settle(&mut map, id, Outcome::Win), 40);
        assert!(!map.get(id).unwrap().is_locked());
        assert_eq!(map.get(id).unwrap().player_collision_event(), None);
    }

    #[test]
    fn tie_halves_with_floor() {
        let (mut map, id) = locked_chest(41);
        assert_eq!(Lockpick::settle(&mut map, id, Outcome::Tie), 20);
        assert_eq!(map.get(id).unwrap().treasure().unwrap().reward(), 0);
    }

    #[test]
    fn loss_keeps_chest_locked() {
        let (mut map, id) = locked_chest(40);
        assert_eq!(Lockpick::settle(&mut map, id, Outcome::Lose), 0);
        let chest = map.get(id).unwrap();
        assert!(chest.is_locked());
        assert_eq!(chest.player_collision_event(), Some(EventKind::Lockpick));
        assert_eq!(chest.treasure().unwrap().reward(), 40);
    }

    #[test]
    fn chosen_throw_is_resolved_against_a_drawn_one() {
        let (mut map, id) = locked_chest(40);
        let (outcome, theirs) = minigame::resolve(Throw::Paper, &mut StdRng::seed_from_u64(5));
        let mut rng = StdRng::seed_from_u64(5);
        let (mut journal, mut sounds, mut know) = (Journal::new(), Vec::new(), false);
        let mut pick = Lockpick::new(id);
        let mut ctx = ScreenCtx {
            map: &mut map,
            rng: &mut rng,
            journal: &mut journal,
            sounds: &mut sounds,
            know_everything: &mut know,
        };
        assert_eq!(pick.update(0.0, &[Action::Paper], &mut ctx), ScreenState::Running);
        let State::Result {
            mine,
            theirs: drawn,
            outcome: got,
            ..
        } = pick.state
        else {
            panic!("no attempt was made");
        };
        assert_eq!((mine, drawn, got), (Throw::Paper, theirs, outcome));
    }
}
