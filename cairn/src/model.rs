//! Elm-architecture model: routes terminal messages to the current scene.

use cairn_core::{Effect, Grid, Model, Msg, Point};

use crate::colors;
use crate::context::{AppContext, LevelError, TILE_SIZE};
use crate::input::Action;
use crate::level::{Carry, DrawOptions, DungeonStats, Level, LevelConfig, LevelSignal};
use crate::screens::{modal, text_style};

/// Seconds before the results screen accepts a confirm.
const RESULTS_DELAY: f32 = 0.5;

pub enum Scene {
    /// Waiting for `Msg::Init`.
    Starting,
    Playing(Box<Level>),
    /// End of a run.
    Results {
        stats: DungeonStats,
        age: f32,
    },
    /// No level could be built.
    Failed(String),
}

#[derive(Debug, Default)]
struct FpsMeter {
    frames: u32,
    elapsed: f32,
    value: f32,
}

impl FpsMeter {
    fn frame(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= 1.0 {
            self.value = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }
}

/// The cairn game model.
pub struct CairnModel {
    ctx: AppContext,
    scene: Scene,
    pending: Vec<Action>,
    fps: FpsMeter,
}

impl CairnModel {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            scene: Scene::Starting,
            pending: Vec::new(),
            fps: FpsMeter::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn level(&self) -> Option<&Level> {
        match &self.scene {
            Scene::Playing(level) => Some(level.as_ref()),
            _ => None,
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn level_config(&self) -> LevelConfig {
        LevelConfig {
            tile_size: TILE_SIZE,
            diagonal_movement: self.ctx.settings.diagonal_movement,
            seed: None,
        }
    }

    /// Continue the saved run if there is one, else start a new run.
    fn start(&mut self) {
        let config = self.level_config();
        if let Some(save) = self.ctx.saves.load() {
            match Level::from_save(save, config) {
                Ok(level) => {
                    log::info!("continuing saved run on level {}", level.stats().level);
                    self.scene = Scene::Playing(Box::new(level));
                    return;
                }
                Err(e) => log::warn!("savefile unusable, starting a new run: {e}"),
            }
        }
        self.new_run();
    }

    fn new_run(&mut self) {
        let config = self.level_config();
        let level = self
            .ctx
            .random_map()
            .and_then(|img| Ok(Level::from_image(&img, Carry::new_run(), config)?));
        log::info!("starting a new run");
        self.enter(level);
    }

    fn enter(&mut self, level: Result<Level, LevelError>) {
        self.scene = match level {
            Ok(level) => Scene::Playing(Box::new(level)),
            Err(e) => {
                log::error!("cannot start level: {e}");
                Scene::Failed(e.to_string())
            }
        };
    }

    /// Write the running level to the savefile.
    fn save_current(&mut self) {
        let Scene::Playing(level) = &self.scene else {
            return;
        };
        if let Err(e) = self.ctx.saves.save(level.to_save()) {
            log::error!("save failed: {e}");
        }
    }

    fn tick(&mut self, dt: f32) -> Option<Effect> {
        self.fps.frame(dt);
        let actions = std::mem::take(&mut self.pending);
        match &mut self.scene {
            Scene::Playing(level) => {
                let signal = level.update(dt, &actions);
                for key in level.take_sounds() {
                    self.ctx.play_sound(key);
                }
                return self.handle(signal);
            }
            Scene::Results { age, .. } => {
                *age += dt;
                if *age >= RESULTS_DELAY && actions.contains(&Action::Confirm) {
                    self.new_run();
                }
            }
            Scene::Failed(_) => {
                if actions.contains(&Action::Confirm) || actions.contains(&Action::Pause) {
                    return Some(Effect::End);
                }
            }
            Scene::Starting => {}
        }
        None
    }

    fn handle(&mut self, signal: LevelSignal) -> Option<Effect> {
        let Scene::Playing(level) = &self.scene else {
            return None;
        };
        match signal {
            LevelSignal::None => None,
            LevelSignal::Completed => {
                let next = self
                    .ctx
                    .random_map()
                    .and_then(|img| Ok(level.change_level(&img)?));
                self.enter(next);
                None
            }
            LevelSignal::GameOver => {
                let stats = level.stats();
                if let Err(e) = self.ctx.saves.reset() {
                    log::warn!("cannot reset savefile: {e}");
                }
                self.scene = Scene::Results { stats, age: 0.0 };
                None
            }
            LevelSignal::SaveAndExit => {
                self.save_current();
                Some(Effect::End)
            }
            LevelSignal::Restart => {
                let restarted = level.restart().map_err(LevelError::from);
                self.enter(restarted);
                None
            }
        }
    }

    fn draw_options(&self) -> DrawOptions {
        let settings = &self.ctx.settings;
        DrawOptions {
            tile_columns: settings.tile_columns(),
            show_grid: settings.show_grid,
            fps: settings.show_fps.then_some(self.fps.value),
        }
    }
}

impl Model for CairnModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                self.start();
                None
            }
            Msg::KeyDown { key, .. } => {
                if let Some(action) = self.ctx.keymap.action(key) {
                    self.pending.push(action);
                }
                None
            }
            Msg::Tick { dt } => self.tick(dt.as_secs_f32()),
            Msg::Quit => {
                self.save_current();
                Some(Effect::End)
            }
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, grid: &mut Grid) {
        match &self.scene {
            Scene::Starting => {}
            Scene::Playing(level) => level.draw(grid, &self.ctx.assets, &self.draw_options()),
            Scene::Results { stats, .. } => {
                let lines = [
                    format!("You fell on dungeon level {}.", stats.level),
                    String::new(),
                    format!("Turns taken:     {}", stats.turn),
                    format!("Gold collected:  {}", stats.money_collected),
                    format!("Enemies slain:   {}", stats.enemies_killed),
                ];
                draw_message(grid, "Game over", &lines, "[Enter] new run");
            }
            Scene::Failed(reason) => {
                let lines = [
                    reason.clone(),
                    String::new(),
                    format!("Maps are read from {}.", self.ctx.paths.map_dir.display()),
                ];
                draw_message(grid, "Cannot start", &lines, "[Enter] quit");
            }
        }
    }
}

fn draw_message(grid: &Grid, title: &str, lines: &[String], hint: &str) {
    let width = lines.iter().map(|l| l.chars().count() as i32).max().unwrap_or(0) + 6;
    let inner = modal(grid, Point::new(width.max(30), lines.len() as i32 + 5), title);
    for (i, line) in lines.iter().enumerate() {
        inner.print(Point::new(1, i as i32), line, text_style(colors::FG_EMPH));
    }
    inner.print_centered(inner.height() - 1, hint, text_style(colors::FG_DIM));
}
