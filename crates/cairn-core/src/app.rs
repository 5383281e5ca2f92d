//! The frame-driven application loop: [`Model`], [`Driver`], [`App`].
//!
//! Every frame the loop drains pending input into the model, sends one
//! [`Msg::Tick`] carrying the elapsed time, draws the model into a fresh
//! grid, and flushes only the cells that changed since the last frame.
//! Nothing in the loop blocks except the driver's bounded input poll.

use std::time::{Duration, Instant};

use crate::grid::{compute_frame, Frame, Grid};
use crate::messages::Msg;

/// A side-effect requested by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Stop the application loop.
    End,
}

/// The application model.
pub trait Model {
    /// Process a message, optionally returning an effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

/// Back-end driver (terminal, test harness, ...).
pub trait Driver {
    /// Initialise the back-end. Returns the initial screen size.
    fn init(&mut self) -> Result<(i32, i32), Box<dyn std::error::Error>>;

    /// Wait at most `timeout` for input and append any messages to `out`.
    fn poll_msgs(
        &mut self,
        timeout: Duration,
        out: &mut Vec<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the terminal / release resources.
    fn close(&mut self);
}

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    /// Target frames per second for `Tick` messages.
    pub fps: u32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    frame_interval: Duration,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            frame_interval: Duration::from_secs(1) / config.fps.max(1),
        }
    }

    /// Consume the app, returning the model (used by tests and for
    /// post-run persistence).
    pub fn into_model(self) -> M {
        self.model
    }

    /// Run the loop until the model returns [`Effect::End`] or the driver
    /// sends [`Msg::Quit`] and the model does not veto it.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (w, h) = self.driver.init()?;
        let result = self.run_loop(w, h);
        self.driver.close();
        result
    }

    fn run_loop(&mut self, width: i32, height: i32) -> Result<(), Box<dyn std::error::Error>> {
        let mut prev = Grid::new(width, height);
        let mut curr = Grid::new(width, height);
        let mut full_redraw = true;
        let mut pending = Vec::new();

        if self.model.update(Msg::Init) == Some(Effect::End) {
            return Ok(());
        }

        let mut last_tick = Instant::now();
        loop {
            let budget = self.frame_interval.saturating_sub(last_tick.elapsed());
            self.driver.poll_msgs(budget, &mut pending)?;

            for msg in pending.drain(..) {
                if let Msg::Screen { width, height } = msg {
                    log::debug!("screen resized to {width}x{height}");
                    prev = Grid::new(width, height);
                    curr = Grid::new(width, height);
                    full_redraw = true;
                }
                if self.model.update(msg) == Some(Effect::End) {
                    return Ok(());
                }
            }

            let elapsed = last_tick.elapsed();
            if elapsed < self.frame_interval {
                continue;
            }
            last_tick = Instant::now();
            if self.model.update(Msg::Tick { dt: elapsed }) == Some(Effect::End) {
                return Ok(());
            }

            curr.fill(Default::default());
            self.model.draw(&mut curr);
            let frame = compute_frame(&prev, &curr, full_redraw);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.copy_from(&curr);
            full_redraw = false;
        }
    }
}
