//! d2-engine headless entry point
//!
//! Runs the demo scene against a recording draw surface with a synthetic
//! clock until the frame limit stops the scheduler.
//!
//! Usage: `d2-engine [config.json]`

use std::rc::Rc;

use d2_engine::consts::SIM_DT;
use d2_engine::input::KeyState;
use d2_engine::renderer::{Image, RecordingSurface};
use d2_engine::{EngineConfig, Game};

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path),
        None => EngineConfig::default(),
    };
    log::info!("d2-engine (headless) starting...");

    let sheet = Rc::new(Image::solid(64, 32, [255, 255, 255, 255]));
    let mut game = Game::new(config, RecordingSurface::new(), sheet, KeyState::arrows());

    game.start();
    let mut now = 0.0f64;
    game.advance(now);
    while game.is_running() {
        now += SIM_DT as f64;
        game.advance(now);
        game.renderer_mut().surface_mut().clear_log();
    }

    let surface = game.renderer().surface();
    log::info!(
        "finished after {} frames: {} actors alive, {} draw calls, {} vertices submitted",
        game.frame(),
        game.state.registry.len(),
        surface.draw_count(),
        surface.vertex_count()
    );
    if game.state.player_ship().is_none() {
        log::info!("player ship was destroyed");
    }
}
