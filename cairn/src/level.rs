//! A playable dungeon level: turn phases, movement and the event scheduler.
//!
//! The level alternates between the player's and the enemies' turn. Moving
//! onto a tile collects the player collision events of everything on it into
//! a queue. Events are started one at a time: some settle immediately, the
//! others open a modal [`Screen`] that owns input until it reports a
//! [`Resolution`]. Only then is the next event started.

use cairn_core::{Cell, Color, Direction, Grid, Point, Range, Style};
use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::Assets;
use crate::colors;
use crate::entity::{
    BOSS_MAX_HP_BONUS, Creature, EntityId, EventKind, MapObject, StatKind, TRADE_MAX_HP,
    TRADE_PRICE, TRAP_DAMAGE,
};
use crate::error::MapError;
use crate::input::Action;
use crate::journal::{Journal, Tone};
use crate::map::{GameMap, ScheduledEvent};
use crate::mapgen::{self, Dungeon};
use crate::minigame::Throw;
use crate::save::{self, SaveFile};
use crate::screens::{
    Battle, Lockpick, Notice, PauseChoice, PauseMenu, Resolution, Screen, ScreenCtx,
    ScreenState, ScreenView,
};

/// Seconds after a player move during which input is ignored.
pub const TURN_COOLDOWN: f32 = 0.1;
/// Rows below the map used by the status display.
pub const HUD_ROWS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    PlayerTurn,
    EnemyTurn,
}

/// Run counters carried from level to level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DungeonStats {
    pub level: i32,
    pub turn: u32,
    pub money_collected: u32,
    pub enemies_killed: u32,
}

impl DungeonStats {
    pub fn new_run() -> Self {
        Self {
            level: 1,
            turn: 0,
            money_collected: 0,
            enemies_killed: 0,
        }
    }
}

/// Everything that survives a level change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carry {
    pub player: Creature,
    pub stats: DungeonStats,
    pub know_everything: bool,
}

impl Carry {
    pub fn new_run() -> Self {
        Self {
            player: Creature::player(),
            stats: DungeonStats::new_run(),
            know_everything: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub tile_size: i32,
    pub diagonal_movement: bool,
    /// Fixed RNG seed; random when unset.
    pub seed: Option<u64>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            diagonal_movement: false,
            seed: None,
        }
    }
}

/// What the owner of the level has to act on after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSignal {
    None,
    Completed,
    GameOver,
    SaveAndExit,
    Restart,
}

/// Presentation options for [`Level::draw`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    /// Screen columns per map tile.
    pub tile_columns: i32,
    pub show_grid: bool,
    pub fps: Option<f32>,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            tile_columns: 2,
            show_grid: false,
            fps: None,
        }
    }
}

pub struct Level {
    map: GameMap,
    player: EntityId,
    player_tile: Point,
    facing: Direction,
    phase: TurnPhase,
    cooldown: f32,
    /// Pending events; the last one is started next.
    queue: Vec<ScheduledEvent>,
    current: Option<(ScheduledEvent, Screen)>,
    pause: Option<PauseMenu>,
    stats: DungeonStats,
    know_everything: bool,
    config: LevelConfig,
    rng: StdRng,
    journal: Journal,
    sounds: Vec<&'static str>,
    start_layout: Vec<Vec<i32>>,
    start_carry: Carry,
}

impl Level {
    /// Build a level from per-tile entity-kind ids and put the carried player
    /// into it.
    pub fn from_layout(
        layout: Vec<Vec<i32>>,
        size: Point,
        carry: Carry,
        config: LevelConfig,
    ) -> Result<Self, MapError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let Dungeon {
            mut map,
            player,
            player_tile,
        } = mapgen::from_layout(&layout, size, carry.stats.level, config.tile_size, &mut rng)?;
        if let Some(c) = map.get_mut(player).and_then(MapObject::creature_mut) {
            *c = carry.player.clone();
        }
        let mut journal = Journal::new();
        journal.write(
            &format!("you enter dungeon level {}", carry.stats.level),
            Tone::Notable,
        );
        log::info!(
            "level {} ready: {}x{} tiles, player at {player_tile}",
            carry.stats.level,
            size.x,
            size.y
        );
        Ok(Self {
            map,
            player,
            player_tile,
            facing: Direction::South,
            phase: TurnPhase::PlayerTurn,
            cooldown: 0.0,
            queue: Vec::new(),
            current: None,
            pause: None,
            stats: carry.stats,
            know_everything: carry.know_everything,
            config,
            rng,
            journal,
            sounds: Vec::new(),
            start_layout: layout,
            start_carry: carry,
        })
    }

    pub fn from_image(img: &RgbaImage, carry: Carry, config: LevelConfig) -> Result<Self, MapError> {
        let (layout, size) = mapgen::image_layout(img);
        Self::from_layout(layout, size, carry, config)
    }

    /// Rebuild a saved run. Saves hold kinds only, so every object on the
    /// map is spawned fresh.
    pub fn from_save(save: &SaveFile, config: LevelConfig) -> Result<Self, MapError> {
        let setting = |key: &str| save.map_setting(key).unwrap_or(0).clamp(0, i32::MAX as i64) as i32;
        let size = Point::new(setting("width"), setting("height"));
        let mut config = config;
        if setting("tile_size") > 0 {
            config.tile_size = setting("tile_size");
        }
        let stat = |key: &str| save.dungeon_stat(key).unwrap_or(0).clamp(0, u32::MAX as i64);
        let stats = DungeonStats {
            level: (stat("level") as i32).max(1),
            turn: stat("turn") as u32,
            money_collected: stat("money_collected") as u32,
            enemies_killed: stat("enemies_killed") as u32,
        };
        let mut player = Creature::player();
        save::restore_player(&mut player, &save.player_stats);
        let carry = Carry {
            player,
            stats,
            know_everything: stat("know_everything") != 0,
        };
        Self::from_layout(save.map_layout.clone(), size, carry, config)
    }

    /// Snapshot the run as it stands. A running event screen is not saved.
    pub fn to_save(&self) -> SaveFile {
        let mut save = SaveFile::default();
        if let Some(player) = self.player() {
            save.player_stats = save::player_stats(player);
        }
        let ds = &mut save.dungeon_stats;
        ds.insert("level".into(), self.stats.level as i64);
        ds.insert("turn".into(), self.stats.turn as i64);
        ds.insert("money_collected".into(), self.stats.money_collected as i64);
        ds.insert("enemies_killed".into(), self.stats.enemies_killed as i64);
        ds.insert("know_everything".into(), self.know_everything as i64);
        let size = self.map.map_size();
        let ms = &mut save.map_settings;
        ms.insert("width".into(), size.x as i64);
        ms.insert("height".into(), size.y as i64);
        ms.insert("tile_size".into(), self.map.tile_size() as i64);
        save.map_layout = self.map.layout();
        save
    }

    /// The state to hand to the next level.
    pub fn carry(&self) -> Carry {
        Carry {
            player: self.player().cloned().unwrap_or_else(Creature::player),
            stats: self.stats,
            know_everything: self.know_everything,
        }
    }

    /// The next dungeon level built from `img`.
    pub fn change_level(&self, img: &RgbaImage) -> Result<Level, MapError> {
        let mut carry = self.carry();
        carry.stats.level = carry.stats.level.saturating_add(1);
        log::info!("descending to level {}", carry.stats.level);
        Level::from_image(img, carry, self.config)
    }

    /// This level as it was when it started.
    pub fn restart(&self) -> Result<Level, MapError> {
        log::info!("restarting level {}", self.start_carry.stats.level);
        Level::from_layout(
            self.start_layout.clone(),
            self.map.map_size(),
            self.start_carry.clone(),
            self.config,
        )
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player_tile(&self) -> Point {
        self.player_tile
    }

    pub fn player(&self) -> Option<&Creature> {
        self.map.get(self.player).and_then(MapObject::creature)
    }

    fn player_mut(&mut self) -> Option<&mut Creature> {
        self.map.get_mut(self.player).and_then(MapObject::creature_mut)
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.stats.turn
    }

    pub fn stats(&self) -> DungeonStats {
        self.stats
    }

    pub fn know_everything(&self) -> bool {
        self.know_everything
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn queued_events(&self) -> &[ScheduledEvent] {
        &self.queue
    }

    pub fn current_event(&self) -> Option<ScheduledEvent> {
        self.current.as_ref().map(|(event, _)| *event)
    }

    pub fn current_screen(&self) -> Option<&Screen> {
        self.current.as_ref().map(|(_, screen)| screen)
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    /// Open the pause menu. Ignored while an event screen is current.
    pub fn pause(&mut self) {
        if self.pause.is_none() && self.current.is_none() {
            log::debug!("paused");
            self.pause = Some(PauseMenu::new());
        }
    }

    pub fn resume(&mut self) {
        if self.pause.take().is_some() {
            log::debug!("resumed");
        }
    }

    /// Sound keys queued since the last call.
    pub fn take_sounds(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.sounds)
    }

    pub fn add_money(&mut self, amount: u32) {
        if let Some(player) = self.player_mut() {
            player.add_money(amount);
        }
        self.stats.money_collected = self.stats.money_collected.saturating_add(amount);
    }

    pub fn add_kill(&mut self) {
        self.stats.enemies_killed = self.stats.enemies_killed.saturating_add(1);
    }

    /// Drop pending events and report the run as lost.
    pub fn game_over(&mut self) -> LevelSignal {
        self.queue.clear();
        self.current = None;
        log::info!(
            "player defeated on level {} after {} turns",
            self.stats.level,
            self.stats.turn
        );
        LevelSignal::GameOver
    }

    /// Advance by `dt` seconds with this frame's actions.
    pub fn update(&mut self, dt: f32, actions: &[Action]) -> LevelSignal {
        if let Some(menu) = &mut self.pause {
            let choice = menu.update(actions);
            return match choice {
                None => LevelSignal::None,
                Some(PauseChoice::Resume) => {
                    self.resume();
                    LevelSignal::None
                }
                Some(PauseChoice::Restart) => {
                    self.pause = None;
                    LevelSignal::Restart
                }
                Some(PauseChoice::SaveAndExit) => {
                    self.pause = None;
                    LevelSignal::SaveAndExit
                }
            };
        }
        // A current event runs to completion; it cannot be paused away.
        if self.current.is_some() {
            return self.update_event(dt, actions);
        }
        if actions.contains(&Action::Pause) {
            self.pause();
            return LevelSignal::None;
        }
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
            if self.cooldown > 0.0 {
                return LevelSignal::None;
            }
        }
        // Enemies do not act yet; their turn passes straight back.
        if self.phase == TurnPhase::EnemyTurn {
            self.switch_phase(TurnPhase::PlayerTurn);
        }
        self.player_turn(actions);
        LevelSignal::None
    }

    /// Make a throw against a known opponent throw in the current screen.
    /// False when no screen is waiting for one.
    pub fn play_round(&mut self, mine: Throw, theirs: Throw) -> bool {
        let Level {
            current,
            map,
            rng,
            journal,
            sounds,
            know_everything,
            ..
        } = &mut *self;
        let Some((_, screen)) = current.as_mut() else {
            return false;
        };
        let mut ctx = ScreenCtx {
            map,
            rng,
            journal,
            sounds,
            know_everything,
        };
        screen.play(&mut ctx, mine, theirs)
    }

    fn switch_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
        match phase {
            TurnPhase::EnemyTurn => self.cooldown = TURN_COOLDOWN,
            TurnPhase::PlayerTurn => {
                self.stats.turn = self.stats.turn.saturating_add(1);
                self.journal.new_turn();
            }
        }
        log::trace!("turn {}: {phase:?}", self.stats.turn);
    }

    fn player_turn(&mut self, actions: &[Action]) {
        for &action in actions {
            match action {
                Action::Inspect => self.inspect(),
                Action::Move(dir) => {
                    if dir.is_diagonal() && !self.config.diagonal_movement {
                        continue;
                    }
                    self.facing = dir;
                    if self.try_move(dir) {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn inspect(&mut self) {
        let tile = self.player_tile.step(self.facing);
        if !self.map.is_tile_on_map(tile) {
            self.journal.log("there is nothing there");
            return;
        }
        self.map.inspect_tile(tile);
        let text = self.map.tile_descriptions(tile).replace('\n', " ");
        self.journal.log(&text);
    }

    /// Move the player one step. Returns false when the way is blocked.
    fn try_move(&mut self, dir: Direction) -> bool {
        let target = self.player_tile.step(dir);
        if self.map.is_tile_blocked(target) {
            self.sounds.push("bump");
            return false;
        }
        let from = self.map.tile_to_index(self.player_tile);
        let to = self.map.tile_to_index(target);
        let Some(index) = self.map.find_object_in_tile(from, self.player) else {
            log::error!("player {} missing from tile {}", self.player, self.player_tile);
            return false;
        };
        self.map.move_object(from, index, to);
        self.player_tile = target;
        self.sounds.push("step");
        let events = self.map.player_events(target);
        if !events.is_empty() {
            log::debug!("{} event(s) scheduled at {target}", events.len());
        }
        self.queue.extend(events);
        self.switch_phase(TurnPhase::EnemyTurn);
        self.set_new_event();
        true
    }

    /// Start queued events until one opens a screen or the queue is empty.
    fn set_new_event(&mut self) {
        while self.current.is_none() {
            let Some(event) = self.queue.pop() else {
                return;
            };
            if self.map.get(event.origin).is_none() {
                log::warn!("dropping {} event from deleted object {}", event.kind.name(), event.origin);
                continue;
            }
            log::debug!("starting {} event from {}", event.kind.name(), event.origin);
            if let Some(screen) = self.start_event(event) {
                self.current = Some((event, screen));
            }
        }
    }

    fn start_event(&mut self, event: ScheduledEvent) -> Option<Screen> {
        match event.kind {
            EventKind::ExitMap => Some(Screen::Notice(Notice::completion(
                self.stats.level,
                self.stats.turn,
                self.stats.money_collected,
                self.stats.enemies_killed,
            ))),
            EventKind::Lockpick => Some(Screen::Lockpick(Lockpick::new(event.origin))),
            EventKind::Loot => {
                self.loot(event.origin);
                None
            }
            EventKind::Fight => {
                let tile = self.map.tile_to_index(self.player_tile);
                self.journal.write("an enemy blocks your way", Tone::Notable);
                Some(Screen::Battle(Battle::new(self.player, event.origin, tile)))
            }
            EventKind::Trap => Some(self.spring_trap(event.origin)),
            EventKind::Heal => Some(self.drink(event.origin)),
            EventKind::Trade => Some(self.trade()),
        }
    }

    fn loot(&mut self, origin: EntityId) {
        let Some(obj) = self.map.get_mut(origin) else {
            return;
        };
        let amount = obj.take_reward();
        let destroy = obj
            .treasure()
            .is_some_and(|t| t.destroy_on_empty && t.is_empty());
        if destroy {
            let tile = self.map.tile_to_index(self.player_tile);
            if let Some(index) = self.map.find_object_in_tile(tile, origin) {
                self.map.delete_object(tile, index, true);
            }
        }
        if amount > 0 {
            self.add_money(amount);
            self.journal.write(&format!("you pick up {amount} gold"), Tone::Good);
            self.sounds.push("coin");
        }
    }

    fn spring_trap(&mut self, origin: EntityId) -> Screen {
        if let Some(trap) = self.map.get_mut(origin) {
            trap.set_player_collision_event(None);
            trap.set_sprite(Some("trap_sprung"));
            trap.set_description("A sprung spike trap.");
        }
        let damage = TRAP_DAMAGE * self.stats.level.max(1);
        let dealt = self
            .player_mut()
            .map_or(0, |p| p.damage(damage, StatKind::Physical));
        let dead = self.player().is_none_or(Creature::is_dead);
        self.journal.write(&format!("a trap! you lose {dealt} HP"), Tone::Bad);
        self.sounds.push("trap");
        let resolution = if dead {
            self.sounds.push("defeat");
            Resolution::PlayerDefeated
        } else {
            Resolution::Closed
        };
        let mut lines = vec![format!("Spikes shoot from the floor. You lose {dealt} HP.")];
        if dead {
            lines.push("You bleed out on the dungeon floor.".to_string());
        }
        Screen::Notice(Notice::new("Trap", lines, resolution).with_accent(colors::RED))
    }

    fn drink(&mut self, origin: EntityId) -> Screen {
        if let Some(fountain) = self.map.get_mut(origin) {
            fountain.set_player_collision_event(None);
            fountain.set_sprite(Some("fountain_dry"));
            fountain.set_description("A dried-up fountain.");
        }
        let healed = self.player_mut().map_or(0, |p| {
            let half = p.max_hp() / 2;
            p.heal(half)
        });
        self.journal.write(&format!("you drink and recover {healed} HP"), Tone::Good);
        self.sounds.push("heal");
        Screen::Notice(
            Notice::new(
                "Fountain",
                vec![format!("The water is cool and clear. You recover {healed} HP.")],
                Resolution::Closed,
            )
            .with_accent(colors::CYAN),
        )
    }

    fn trade(&mut self) -> Screen {
        let price = TRADE_PRICE * self.stats.level.max(1) as u32;
        let bought = self.player_mut().is_some_and(|p| {
            if !p.spend_money(price) {
                return false;
            }
            p.increase_max_hp(TRADE_MAX_HP);
            p.heal(TRADE_MAX_HP);
            true
        });
        let line = if bought {
            self.journal
                .write(&format!("you buy a tonic for {price} gold"), Tone::Good);
            self.sounds.push("trade");
            format!("You buy a tonic for {price} gold: +{TRADE_MAX_HP} max HP.")
        } else {
            self.journal.log("you cannot afford the merchant's tonic");
            format!("A tonic costs {price} gold. You cannot afford it.")
        };
        Screen::Notice(Notice::new("Merchant", vec![line], Resolution::Closed).with_accent(colors::GOLD))
    }

    fn update_event(&mut self, dt: f32, actions: &[Action]) -> LevelSignal {
        let Level {
            current,
            map,
            rng,
            journal,
            sounds,
            know_everything,
            ..
        } = &mut *self;
        let Some((_, screen)) = current.as_mut() else {
            return LevelSignal::None;
        };
        let mut ctx = ScreenCtx {
            map,
            rng,
            journal,
            sounds,
            know_everything,
        };
        let ScreenState::Done(resolution) = screen.update(dt, actions, &mut ctx) else {
            return LevelSignal::None;
        };
        if let Some((event, screen)) = self.current.take() {
            log::debug!(
                "{} event from {} closed by {} screen: {resolution:?}",
                event.kind.name(),
                event.origin,
                screen.name()
            );
        }
        let signal = self.apply(resolution);
        if signal == LevelSignal::None {
            self.set_new_event();
        }
        signal
    }

    fn apply(&mut self, resolution: Resolution) -> LevelSignal {
        match resolution {
            Resolution::Closed => LevelSignal::None,
            Resolution::Reward { amount } => {
                self.add_money(amount);
                self.sounds.push("coin");
                LevelSignal::None
            }
            Resolution::EnemyDefeated {
                enemy,
                tile,
                bounty,
                boss,
            } => {
                if let Some(index) = self.map.find_object_in_tile(tile, enemy) {
                    self.map.delete_object(tile, index, true);
                }
                self.add_money(bounty);
                self.add_kill();
                self.journal
                    .write(&format!("the enemy falls; you loot {bounty} gold"), Tone::Good);
                if boss {
                    if let Some(player) = self.player_mut() {
                        player.increase_max_hp(BOSS_MAX_HP_BONUS);
                        player.heal(BOSS_MAX_HP_BONUS);
                    }
                    self.journal.write(
                        &format!("the boss's power flows into you: +{BOSS_MAX_HP_BONUS} max HP"),
                        Tone::Notable,
                    );
                }
                LevelSignal::None
            }
            Resolution::PlayerDefeated => self.game_over(),
            Resolution::LevelComplete => {
                self.queue.clear();
                self.sounds.push("descend");
                log::info!(
                    "level {} complete after {} turns",
                    self.stats.level,
                    self.stats.turn
                );
                LevelSignal::Completed
            }
        }
    }

    /// Draw the map around the player, the status rows and any overlay.
    pub fn draw(&self, grid: &Grid, assets: &Assets, opts: &DrawOptions) {
        grid.fill(Cell::new(' ', Style::default().with_fg(colors::FG).with_bg(colors::BG)));
        let split = (grid.height() - HUD_ROWS).max(0);
        let view = grid.slice(Range::new(0, 0, grid.width(), split));
        let hud = grid.slice(Range::new(0, split, grid.width(), grid.height()));
        self.draw_map(&view, assets, opts);
        self.draw_hud(&hud, opts);
        let screen_view = ScreenView {
            map: &self.map,
            know_everything: self.know_everything,
        };
        if let Some((_, screen)) = &self.current {
            screen.draw(&view, &screen_view);
        }
        if let Some(menu) = &self.pause {
            menu.draw(&view);
        }
    }

    fn draw_map(&self, view: &Grid, assets: &Assets, opts: &DrawOptions) {
        let cols = opts.tile_columns.max(1);
        let tiles = Point::new(view.width() / cols, view.height());
        let origin = camera_origin(self.player_tile, tiles, self.map.map_size());
        let abyss = assets.glyph_or_missing("abyss");
        for y in 0..tiles.y {
            for x in 0..tiles.x {
                let tile = origin.shift(x, y);
                let glyph = if self.map.is_tile_on_map(tile) {
                    self.map
                        .top_object(tile)
                        .and_then(MapObject::sprite)
                        .map_or(abyss, |key| assets.glyph_or_missing(key))
                } else {
                    abyss
                };
                let mut bg = glyph.bg;
                if opts.show_grid && bg == colors::FLOOR_BG && (tile.x + tile.y).rem_euclid(2) == 0 {
                    bg = colors::GRID_BG;
                }
                let style = Style::default().with_fg(glyph.fg).with_bg(bg);
                let p = Point::new(x * cols, y);
                view.set(p, Cell::new(glyph.ch, style));
                for c in 1..cols {
                    view.set(p.shift(c, 0), Cell::new(' ', style));
                }
            }
        }
    }

    fn draw_hud(&self, hud: &Grid, opts: &DrawOptions) {
        let base = Style::default().with_fg(colors::FG).with_bg(colors::BG);
        let dim = base.with_fg(colors::FG_DIM);
        let mut x = 0;
        let mut field = |text: &str, fg: Color| {
            x += hud.print(Point::new(x, 0), text, base.with_fg(fg)) + 2;
        };
        if let Some(p) = self.player() {
            let hp_fg = if p.hp() * 4 <= p.max_hp() {
                colors::RED
            } else {
                colors::GREEN
            };
            field(&format!("HP {}/{}", p.hp(), p.max_hp()), hp_fg);
            field(&format!("Gold {}", p.money()), colors::GOLD);
        }
        field(&format!("Level {}", self.stats.level), colors::FG_EMPH);
        field(&format!("Turn {}", self.stats.turn), colors::FG);
        match self.phase {
            TurnPhase::PlayerTurn => field("Your turn", colors::FG_EMPH),
            TurnPhase::EnemyTurn => field("Enemy turn", colors::FG_DIM),
        }
        if let Some(fps) = opts.fps {
            field(&format!("{fps:.0} fps"), colors::FG_DIM);
        }

        let faced = self.player_tile.step(self.facing);
        let seen = if self.map.is_tile_on_map(faced) {
            self.map.tile_descriptions(faced).replace('\n', " / ")
        } else {
            "Nothing.".to_string()
        };
        hud.print(Point::new(0, 1), &format!("Facing {faced}: {seen}"), dim);

        let lines = (hud.height() - 2).max(0) as usize;
        for (i, (text, tone)) in self.journal.recent(lines).into_iter().enumerate() {
            let fg = match tone {
                Tone::Normal => colors::FG,
                Tone::Good => colors::GREEN,
                Tone::Bad => colors::RED,
                Tone::Notable => colors::YELLOW,
            };
            hud.print(Point::new(0, 2 + i as i32), &text, base.with_fg(fg));
        }
    }
}

/// Top-left tile of a viewport of `view` tiles following `center` on a map
/// of `map` tiles. Maps smaller than the viewport are centered.
pub fn camera_origin(center: Point, view: Point, map: Point) -> Point {
    let axis = |c: i32, v: i32, m: i32| {
        if m <= v {
            -(v - m) / 2
        } else {
            (c - v / 2).clamp(0, m - v)
        }
    };
    Point::new(axis(center.x, view.x, map.x), axis(center.y, view.y, map.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        EID_ENTRANCE, EID_EXIT, EID_FLOOR, EID_FOUNTAIN, EID_GOLD, EID_PLAYER, EID_TRAP, Kind,
        PLAYER_DEFENSE, PLAYER_HP,
    };

    fn config() -> LevelConfig {
        LevelConfig {
            seed: Some(7),
            ..LevelConfig::default()
        }
    }

    /// A one-row level: the player on the left, then `rest` tiles.
    fn corridor(rest: &[Vec<i32>]) -> Level {
        let mut layout = vec![vec![EID_FLOOR, EID_PLAYER]];
        layout.extend(rest.iter().cloned());
        let size = Point::new(layout.len() as i32, 1);
        Level::from_layout(layout, size, Carry::new_run(), config()).unwrap()
    }

    fn east() -> [Action; 1] {
        [Action::Move(Direction::East)]
    }

    #[test]
    fn moving_ends_the_player_turn() {
        let mut level = corridor(&[vec![EID_FLOOR], vec![EID_FLOOR]]);
        assert_eq!(level.update(0.0, &east()), LevelSignal::None);
        assert_eq!(level.player_tile(), Point::new(1, 0));
        assert_eq!(level.phase(), TurnPhase::EnemyTurn);
        assert_eq!(level.take_sounds(), vec!["step"]);
        // The enemy turn passes once the cooldown is over.
        level.update(1.0, &[]);
        assert_eq!(level.phase(), TurnPhase::PlayerTurn);
        assert_eq!(level.turn(), 1);
    }

    #[test]
    fn input_waits_for_cooldown() {
        let mut level = corridor(&[vec![EID_FLOOR], vec![EID_FLOOR]]);
        level.update(0.0, &east());
        level.update(0.01, &east());
        assert_eq!(level.phase(), TurnPhase::EnemyTurn);
        assert_eq!(level.player_tile(), Point::new(1, 0));
        level.update(1.0, &east());
        assert_eq!(level.player_tile(), Point::new(2, 0));
        assert_eq!(level.turn(), 1);
    }

    #[test]
    fn blocked_moves_keep_the_turn() {
        let mut level = corridor(&[vec![]]);
        level.update(0.0, &[Action::Move(Direction::West)]);
        level.update(0.0, &east());
        assert_eq!(level.player_tile(), Point::ZERO);
        assert_eq!(level.phase(), TurnPhase::PlayerTurn);
        assert_eq!(level.take_sounds(), vec!["bump", "bump"]);
        assert_eq!(level.facing(), Direction::East);
    }

    #[test]
    fn diagonals_need_the_setting() {
        let layout = vec![vec![EID_FLOOR, EID_PLAYER], vec![EID_FLOOR], vec![EID_FLOOR], vec![EID_FLOOR]];
        let mut level =
            Level::from_layout(layout.clone(), Point::new(2, 2), Carry::new_run(), config()).unwrap();
        level.update(0.0, &[Action::Move(Direction::SouthEast)]);
        assert_eq!(level.player_tile(), Point::ZERO);

        let config = LevelConfig {
            diagonal_movement: true,
            ..config()
        };
        let mut level = Level::from_layout(layout, Point::new(2, 2), Carry::new_run(), config).unwrap();
        level.update(0.0, &[Action::Move(Direction::SouthEast)]);
        assert_eq!(level.player_tile(), Point::new(1, 1));
    }

    #[test]
    fn gold_is_picked_up_and_removed() {
        let mut level = corridor(&[vec![EID_FLOOR, EID_GOLD]]);
        level.update(0.0, &east());
        let money = level.player().unwrap().money();
        assert!(money > 0);
        assert_eq!(level.stats().money_collected, money);
        assert!(level.current_screen().is_none());
        assert_eq!(level.map().layout()[1], vec![EID_FLOOR, EID_PLAYER]);
    }

    #[test]
    fn traps_hurt_once() {
        let mut level = corridor(&[vec![EID_FLOOR, EID_TRAP], vec![EID_FLOOR]]);
        level.update(0.0, &east());
        let hp = level.player().unwrap().hp();
        assert_eq!(hp, PLAYER_HP - (TRAP_DAMAGE - PLAYER_DEFENSE));
        assert!(matches!(level.current_screen(), Some(Screen::Notice(_))));
        level.update(0.5, &[Action::Confirm]);
        assert!(level.current_screen().is_none());

        let (_, trap) = level.map().find_kind(Kind::Trap).unwrap();
        let trap = level.map().get(trap).unwrap();
        assert_eq!(trap.player_collision_event(), None);
        assert_eq!(trap.sprite(), Some("trap_sprung"));
    }

    #[test]
    fn fountain_heals_half_and_dries() {
        let mut level = corridor(&[vec![EID_FLOOR, EID_FOUNTAIN]]);
        let id = level.player_id();
        level.map_mut().get_mut(id).unwrap().creature_mut().unwrap().set_hp(10);
        level.update(0.0, &east());
        assert_eq!(level.player().unwrap().hp(), 10 + PLAYER_HP / 2);
        let (_, id) = level.map().find_kind(Kind::Fountain).unwrap();
        assert_eq!(level.map().get(id).unwrap().sprite(), Some("fountain_dry"));
    }

    #[test]
    fn exit_completes_the_level() {
        let mut level = corridor(&[vec![EID_EXIT]]);
        level.update(0.0, &east());
        assert_eq!(level.current_event().map(|e| e.kind), Some(EventKind::ExitMap));
        assert_eq!(level.update(0.1, &[Action::Confirm]), LevelSignal::None);
        assert_eq!(level.update(0.5, &[Action::Confirm]), LevelSignal::Completed);
    }

    #[test]
    fn pause_menu_owns_input() {
        let mut level = corridor(&[vec![EID_FLOOR]]);
        level.update(0.0, &[Action::Pause]);
        assert!(level.is_paused());
        level.update(0.0, &east());
        assert_eq!(level.player_tile(), Point::ZERO);
        assert_eq!(level.update(0.0, &[Action::Pause]), LevelSignal::None);
        assert!(!level.is_paused());
        level.update(0.0, &[Action::Pause]);
        level.update(0.0, &[Action::Move(Direction::North)]);
        assert_eq!(level.update(0.0, &[Action::Confirm]), LevelSignal::SaveAndExit);
    }

    #[test]
    fn oversized_saves_are_rejected() {
        let mut save = corridor(&[vec![EID_FLOOR]]).to_save();
        save.map_settings.insert("width".into(), 70_000);
        save.map_settings.insert("height".into(), 70_000);
        assert!(matches!(
            Level::from_save(&save, config()),
            Err(MapError::LayoutSize { .. })
        ));
    }

    #[test]
    fn counters_saturate() {
        let mut level = corridor(&[vec![EID_FLOOR], vec![EID_FLOOR]]);
        level.stats.turn = u32::MAX;
        level.stats.money_collected = u32::MAX - 1;
        level.stats.enemies_killed = u32::MAX;
        level.add_money(10);
        level.add_kill();
        level.update(0.0, &east());
        level.update(1.0, &[]);
        assert_eq!(level.turn(), u32::MAX);
        assert_eq!(level.stats().money_collected, u32::MAX);
        assert_eq!(level.stats().enemies_killed, u32::MAX);
    }

    #[test]
    fn save_round_trip() {
        let mut level = corridor(&[vec![EID_FLOOR], vec![EID_EXIT]]);
        level.add_money(30);
        level.update(0.0, &east());
        level.update(1.0, &[]);
        let save = level.to_save();
        let restored = Level::from_save(&save, config()).unwrap();
        assert_eq!(restored.player_tile(), Point::new(1, 0));
        assert_eq!(restored.player(), level.player());
        assert_eq!(restored.stats(), level.stats());
        assert_eq!(restored.map().layout(), level.map().layout());
    }

    #[test]
    fn restart_returns_to_the_start() {
        let mut level = corridor(&[vec![EID_FLOOR, EID_GOLD]]);
        level.update(0.0, &east());
        let fresh = level.restart().unwrap();
        assert_eq!(fresh.player_tile(), Point::ZERO);
        assert_eq!(fresh.player().unwrap().money(), 0);
        assert_eq!(fresh.stats(), DungeonStats::new_run());
    }

    #[test]
    fn player_starts_on_entrance_without_marker() {
        let layout = vec![vec![EID_FLOOR], vec![EID_ENTRANCE]];
        let level = Level::from_layout(layout, Point::new(2, 1), Carry::new_run(), config()).unwrap();
        assert_eq!(level.player_tile(), Point::new(1, 0));
    }

    #[test]
    fn camera_follows_and_clamps() {
        let view = Point::new(10, 6);
        let map = Point::new(40, 30);
        assert_eq!(camera_origin(Point::new(20, 15), view, map), Point::new(15, 12));
        assert_eq!(camera_origin(Point::new(1, 1), view, map), Point::ZERO);
        assert_eq!(camera_origin(Point::new(39, 29), view, map), Point::new(30, 24));
        assert_eq!(camera_origin(Point::new(1, 1), view, Point::new(4, 2)), Point::new(-3, -2));
    }
}
