//! Rock-paper-scissors combat between the player and one enemy.

use cairn_core::{Grid, Point};
use rand::RngExt;

use super::{
    Resolution, ScreenCtx, ScreenState, ScreenView, THROW_HINT, chosen_throw, confirmed, modal,
    text_style,
};
use crate::colors;
use crate::entity::{Creature, EntityId, Role, StatKind, Stats};
use crate::input::Action;
use crate::journal::Tone;
use crate::map::GameMap;
use crate::minigame::{self, Outcome, Throw, resolve_against};

/// Seconds a round result stays up before the next throw is asked for.
const ROUND_PAUSE: f32 = 0.8;
/// Seconds before the final result accepts a confirm.
const FINISH_DELAY: f32 = 0.4;

/// Who is attacking this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    PlayerAttack,
    EnemyAttack,
}

/// What happened in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub phase: BattlePhase,
    pub mine: Throw,
    pub theirs: Throw,
    pub outcome: Outcome,
    /// HP the enemy lost.
    pub to_enemy: i32,
    /// HP the player lost.
    pub to_player: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Choosing,
    Showing { timer: f32 },
    Finished { won: bool, timer: f32 },
}

/// Revealed enemy stat labels, offense then defense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Revealed {
    offense: [bool; 3],
    defense: [bool; 3],
}

impl Revealed {
    fn all(&self) -> bool {
        self.offense.iter().chain(&self.defense).all(|&r| r)
    }
}

#[derive(Debug, Clone)]
pub struct Battle {
    player: EntityId,
    enemy: EntityId,
    /// Tile the enemy stands on, for removing it after a win.
    enemy_tile: usize,
    phase: BattlePhase,
    round: u32,
    state: State,
    revealed: Revealed,
    last: Option<RoundReport>,
}

impl Battle {
    pub fn new(player: EntityId, enemy: EntityId, enemy_tile: usize) -> Self {
        Self {
            player,
            enemy,
            enemy_tile,
            phase: BattlePhase::PlayerAttack,
            round: 1,
            state: State::Choosing,
            revealed: Revealed::default(),
            last: None,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Visible round counter, bumped on every return to `PlayerAttack`.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_round(&self) -> Option<RoundReport> {
        self.last
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished { .. })
    }

    /// Whether the enemy's `kind` offense (`offense = true`) or defense label
    /// has been revealed in this battle.
    pub fn is_revealed(&self, offense: bool, kind: StatKind) -> bool {
        if offense {
            self.revealed.offense[kind.index()]
        } else {
            self.revealed.defense[kind.index()]
        }
    }

    fn stats(map: &GameMap, id: EntityId) -> Option<(Stats, Stats)> {
        map.get(id)
            .and_then(|o| o.creature())
            .map(|c| (c.offense, c.defense))
    }

    fn hit(map: &mut GameMap, id: EntityId, amount: i32, kind: StatKind) -> i32 {
        map.get_mut(id)
            .and_then(|o| o.creature_mut())
            .map_or(0, |c| c.damage(amount, kind))
    }

    fn is_dead(map: &GameMap, id: EntityId) -> bool {
        map.get(id)
            .and_then(|o| o.creature())
            .is_none_or(Creature::is_dead)
    }

    /// Resolve one round with both throws known. Damage is applied to the
    /// creatures on the map; the halved paths halve the raw stat (integer
    /// floor) before defense is subtracted.
    pub fn play_round(&mut self, map: &mut GameMap, mine: Throw, theirs: Throw) -> RoundReport {
        self.settle_round(map, mine, theirs, resolve_against(mine, theirs))
    }

    fn settle_round(
        &mut self,
        map: &mut GameMap,
        mine: Throw,
        theirs: Throw,
        outcome: Outcome,
    ) -> RoundReport {
        let mut report = RoundReport {
            phase: self.phase,
            mine,
            theirs,
            outcome,
            to_enemy: 0,
            to_player: 0,
        };
        let (Some((player_off, _)), Some((enemy_off, _))) =
            (Self::stats(map, self.player), Self::stats(map, self.enemy))
        else {
            log::error!("battle participants missing from the map");
            self.state = State::Finished {
                won: false,
                timer: 0.0,
            };
            return report;
        };

        let (my_kind, their_kind) = (mine.stat(), theirs.stat());
        match (self.phase, outcome) {
            (_, Outcome::Tie) => {}
            (BattlePhase::PlayerAttack, Outcome::Win) => {
                report.to_enemy =
                    Self::hit(map, self.enemy, player_off.get(my_kind), my_kind);
                self.revealed.defense[my_kind.index()] = true;
            }
            (BattlePhase::PlayerAttack, Outcome::Lose) => {
                report.to_player =
                    Self::hit(map, self.player, enemy_off.get(their_kind) / 2, their_kind);
                self.revealed.offense[their_kind.index()] = true;
            }
            (BattlePhase::EnemyAttack, Outcome::Win) => {
                report.to_enemy =
                    Self::hit(map, self.enemy, player_off.get(my_kind) / 2, my_kind);
                self.revealed.defense[my_kind.index()] = true;
            }
            (BattlePhase::EnemyAttack, Outcome::Lose) => {
                report.to_player =
                    Self::hit(map, self.player, enemy_off.get(their_kind), their_kind);
                self.revealed.offense[their_kind.index()] = true;
            }
        }
        log::debug!(
            "battle round {} {:?}: {} vs {} -> {:?} (enemy -{}, player -{})",
            self.round,
            self.phase,
            mine.name(),
            theirs.name(),
            outcome,
            report.to_enemy,
            report.to_player
        );
        self.last = Some(report);

        if Self::is_dead(map, self.enemy) || Self::is_dead(map, self.player) {
            self.state = State::Finished {
                won: !Self::is_dead(map, self.player),
                timer: 0.0,
            };
            return report;
        }
        self.phase = match self.phase {
            BattlePhase::PlayerAttack => BattlePhase::EnemyAttack,
            BattlePhase::EnemyAttack => {
                self.round += 1;
                BattlePhase::PlayerAttack
            }
        };
        self.state = State::Showing { timer: 0.0 };
        report
    }

    pub(super) fn play(&mut self, ctx: &mut ScreenCtx, mine: Throw, theirs: Throw) -> bool {
        self.throw(ctx, mine, Some(theirs))
    }

    /// Play `mine`; without a fixed opponent throw the shared resolver draws
    /// one.
    fn throw(&mut self, ctx: &mut ScreenCtx, mine: Throw, theirs: Option<Throw>) -> bool {
        if self.state != State::Choosing {
            return false;
        }
        let (outcome, theirs) = match theirs {
            Some(theirs) => (resolve_against(mine, theirs), theirs),
            None => minigame::resolve(mine, &mut *ctx.rng),
        };
        let report = self.settle_round(ctx.map, mine, theirs, outcome);
        ctx.sounds.push(match report.outcome {
            Outcome::Win => "win",
            Outcome::Tie => "tie",
            Outcome::Lose => "lose",
        });
        if self.revealed.all() && !*ctx.know_everything {
            *ctx.know_everything = true;
            ctx.journal
                .write("you have learned to read every foe", Tone::Notable);
        }
        if let State::Finished { won, .. } = self.state {
            ctx.sounds.push(if won { "victory" } else { "defeat" });
        }
        true
    }

    pub(super) fn update(&mut self, dt: f32, actions: &[Action], ctx: &mut ScreenCtx) -> ScreenState {
        match self.state {
            State::Choosing => {
                if let Some(mine) = chosen_throw(actions) {
                    self.throw(ctx, mine, None);
                }
            }
            State::Showing { timer } => {
                let timer = timer + dt;
                self.state = if timer >= ROUND_PAUSE || confirmed(actions) {
                    State::Choosing
                } else {
                    State::Showing { timer }
                };
            }
            State::Finished { won, timer } => {
                let timer = timer + dt;
                self.state = State::Finished { won, timer };
                if timer >= FINISH_DELAY && confirmed(actions) {
                    return ScreenState::Done(self.resolution(ctx, won));
                }
            }
        }
        ScreenState::Running
    }

    fn resolution(&self, ctx: &mut ScreenCtx, won: bool) -> Resolution {
        if !won {
            return Resolution::PlayerDefeated;
        }
        let role = ctx
            .map
            .get(self.enemy)
            .and_then(|o| o.creature())
            .map(|c| &c.role);
        let (bounty, boss) = match role {
            Some(&Role::Enemy { boss, bounty }) => (bounty, boss),
            _ => (0, false),
        };
        // Small random bonus on top of the bounty.
        let bonus = ctx.rng.random_range(0..=bounty / 4);
        Resolution::EnemyDefeated {
            enemy: self.enemy,
            tile: self.enemy_tile,
            bounty: bounty + bonus,
            boss,
        }
    }

    pub(super) fn draw(&self, grid: &Grid, view: &ScreenView) {
        let title = format!("Battle, round {}", self.round);
        let inner = modal(grid, Point::new(46, 15), &title);
        let normal = text_style(colors::FG_EMPH);
        let dim = text_style(colors::FG_DIM);

        let player = view.map.get(self.player).and_then(|o| o.creature());
        let enemy = view.map.get(self.enemy).and_then(|o| o.creature());
        let (Some(player), Some(enemy)) = (player, enemy) else {
            return;
        };
        inner.print(
            Point::new(1, 0),
            &format!("You   {:>3}/{:<3} HP", player.hp(), player.max_hp()),
            text_style(colors::YELLOW),
        );
        inner.print(
            Point::new(1, 1),
            &format!("Enemy {:>3}/{:<3} HP", enemy.hp(), enemy.max_hp()),
            text_style(colors::RED),
        );

        inner.print(Point::new(1, 3), "          phys  rang  magi", dim);
        for (row, offense) in [(4, true), (5, false)] {
            let label = if offense { "attack" } else { "defense" };
            inner.print(Point::new(1, row), label, normal);
            for kind in StatKind::ALL {
                let x = 11 + 6 * kind.index() as i32;
                let known = view.know_everything || self.is_revealed(offense, kind);
                let value = if offense {
                    enemy.offense.get(kind)
                } else {
                    enemy.defense.get(kind)
                };
                let text = if known { value.to_string() } else { "?".to_string() };
                inner.print(Point::new(x, row), &text, if known { normal } else { dim });
            }
        }

        if let Some(r) = self.last {
            let verdict = match r.outcome {
                Outcome::Win => "you win the exchange",
                Outcome::Tie => "a stalemate",
                Outcome::Lose => "you lose the exchange",
            };
            inner.print(
                Point::new(1, 7),
                &format!("{} vs {}: {verdict}", r.mine.name(), r.theirs.name()),
                normal,
            );
            inner.print(
                Point::new(1, 8),
                &format!("enemy -{} HP, you -{} HP", r.to_enemy, r.to_player),
                dim,
            );
        }

        let prompt = match (self.state, self.phase) {
            (State::Finished { won: true, .. }, _) => "Victory! [Enter]",
            (State::Finished { won: false, .. }, _) => "You have fallen... [Enter]",
            (State::Showing { .. }, _) => "...",
            (State::Choosing, BattlePhase::PlayerAttack) => "Attack!",
            (State::Choosing, BattlePhase::EnemyAttack) => "Defend!",
        };
        inner.print_centered(10, prompt, text_style(colors::GOLD));
        if self.state == State::Choosing {
            inner.print_centered(11, THROW_HINT, dim);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MapObject;
    use crate::journal::Journal;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// A one-tile map holding the player and an enemy with fixed stats.
    fn arena(enemy_hp: i32, enemy_off: i32, enemy_def: i32) -> (GameMap, Battle) {
        let mut map = GameMap::new(Point::new(2, 1), 16);
        let player = map.add_and_place(0, MapObject::player());
        let mut enemy = MapObject::enemy(&mut StdRng::seed_from_u64(1), 1);
        *enemy.creature_mut().unwrap() = Creature::new(
            enemy_hp,
            Stats::uniform(enemy_off),
            Stats::uniform(enemy_def),
            Role::Enemy {
                boss: false,
                bounty: 8,
            },
        );
        let enemy = map.add_and_place(1, enemy);
        (map, Battle::new(player, enemy, 1))
    }

    fn hp(map: &GameMap, id: EntityId) -> i32 {
        map.get(id).and_then(|o| o.creature()).map_or(-1, Creature::hp)
    }

    #[test]
    fn player_attack_win_deals_full_offense() {
        let (mut map, mut b) = arena(20, 5, 5);
        let r = b.play_round(&mut map, Throw::Rock, Throw::Scissors);
        assert_eq!(r.to_enemy, 5);
        assert_eq!(hp(&map, b.enemy), 15);
        assert!(b.is_revealed(false, StatKind::Physical));
        assert!(!b.is_revealed(true, StatKind::Physical));
        assert_eq!(b.phase(), BattlePhase::EnemyAttack);
    }

    #[test]
    fn countered_attack_is_halved_before_defense() {
        // Player attacking, loses: enemy offense 15 halved to 7, minus 3 defense.
        let (mut map, mut b) = arena(50, 15, 0);
        let r = b.play_round(&mut map, Throw::Rock, Throw::Paper);
        assert_eq!(r.outcome, Outcome::Lose);
        assert_eq!(r.to_player, 4);
        assert!(b.is_revealed(true, StatKind::Ranged));
    }

    #[test]
    fn enemy_attack_paths() {
        let (mut map, mut b) = arena(50, 15, 0);
        b.play_round(&mut map, Throw::Rock, Throw::Rock);
        assert_eq!(b.phase(), BattlePhase::EnemyAttack);
        assert_eq!(b.round(), 1);
        // Successful defence: player offense 10 halved.
        let r = b.play_round(&mut map, Throw::Paper, Throw::Rock);
        assert_eq!(r.to_enemy, 5);
        assert_eq!(b.round(), 2);
        b.play_round(&mut map, Throw::Rock, Throw::Rock);
        // Enemy lands a full hit: 15 - 3.
        let r = b.play_round(&mut map, Throw::Scissors, Throw::Rock);
        assert_eq!(r.to_player, 12);
        assert_eq!(b.round(), 3);
    }

    #[test]
    fn battle_ends_on_death_without_switching() {
        let (mut map, mut b) = arena(4, 1, 0);
        b.play_round(&mut map, Throw::Scissors, Throw::Paper);
        assert!(b.is_finished());
        assert_eq!(b.phase(), BattlePhase::PlayerAttack);
        assert_eq!(hp(&map, b.enemy), 0);
    }

    #[test]
    fn reveals_accumulate() {
        let (mut map, mut b) = arena(500, 1, 0);
        for t in Throw::ALL {
            b.play_round(&mut map, t, t.beats());
            b.play_round(&mut map, t.beats(), t);
        }
        assert!(b.revealed.all());
    }

    #[test]
    fn chosen_throw_is_resolved_against_a_drawn_one() {
        let (mut map, mut b) = arena(500, 1, 0);
        let (outcome, theirs) = minigame::resolve(Throw::Rock, &mut StdRng::seed_from_u64(11));
        let mut rng = StdRng::seed_from_u64(11);
        let (mut journal, mut sounds, mut know) = (Journal::new(), Vec::new(), false);
        let mut ctx = ScreenCtx {
            map: &mut map,
            rng: &mut rng,
            journal: &mut journal,
            sounds: &mut sounds,
            know_everything: &mut know,
        };
        b.update(0.0, &[Action::Rock], &mut ctx);
        let r = b.last_round().unwrap();
        assert_eq!((r.mine, r.theirs, r.outcome), (Throw::Rock, theirs, outcome));
        assert_eq!(b.round(), 1);
    }
}
