//! Terminal entry point.

use std::fs::{self, File};

use anyhow::Context;
use cairn::assets::LogAudio;
use cairn::{AppContext, CairnModel, Paths};
use cairn_core::{App, AppConfig};
use cairn_crossterm::CrosstermDriver;
use env_logger::{Builder, Env, Target};

const FPS: u32 = 60;

fn main() -> anyhow::Result<()> {
    let paths = Paths::from_env();
    fs::create_dir_all(&paths.data_dir)
        .with_context(|| format!("cannot create {}", paths.data_dir.display()))?;

    // The terminal belongs to the game, so logs go to a file.
    let log_file = File::create(paths.log_file())
        .with_context(|| format!("cannot create {}", paths.log_file().display()))?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(log_file)))
        .init();
    log::info!("data in {}, maps in {}", paths.data_dir.display(), paths.map_dir.display());

    let ctx = AppContext::new(paths, Box::new(LogAudio));
    let mut app = App::new(AppConfig {
        model: CairnModel::new(ctx),
        driver: CrosstermDriver::new(),
        fps: FPS,
    });
    app.run().map_err(|e| anyhow::anyhow!("{e}"))?;
    log::info!("bye");
    Ok(())
}
