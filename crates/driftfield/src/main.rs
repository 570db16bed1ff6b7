mod app;
mod backend;
mod events;
mod logging;

use color_eyre::eyre::WrapErr;
use driftfield_config::Config;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::app::MainLoop;
use crate::backend::terminal::TerminalBackend;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load().wrap_err("failed to load configuration")?;
    let log_path = logging::init(&config.log);
    info!(?log_path, mode = ?config.mode, seed = ?config.seed, "driftfield starting");

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut main_loop = MainLoop::new(&config, rng);
    info!(
        particles = main_loop.field().map_or(0, |field| field.len()),
        "scene ready"
    );

    let mut backend = TerminalBackend::new(config.display.target_fps);
    let result = main_loop.run(&mut backend);
    info!(frames = main_loop.frames(), phase = ?main_loop.phase(), "driftfield exiting");
    result.wrap_err("driftfield stopped with an error")
}
