//! d2-engine - A frame-stepped 2D actor simulation
//!
//! Core modules:
//! - `sim`: Simulation (actors, registry, quad-tree collisions, behaviors)
//! - `scheduler`: Frame dispatch with variable or fixed time steps
//! - `renderer`: Draw-surface boundary and per-actor attribute batching
//! - `input`: Key to action mapping
//! - `settings`: Engine configuration
//! - `game`: Wires everything together into one `on_frame` entry point

pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use scheduler::StepMode;
pub use settings::EngineConfig;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest elapsed time a single scheduler advance will account for
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Quad-tree thresholds
    pub const QUADTREE_CAPACITY: usize = 10;
    pub const QUADTREE_MAX_DEPTH: u32 = 10;

    /// Frames to run before the scheduler stops itself
    pub const FRAME_LIMIT: u64 = 900;
    /// Diagnostic output every N frames
    pub const STATS_INTERVAL: u64 = 10;

    /// Player ship speed (pixels/s)
    pub const SHIP_SPEED: f32 = 200.0;
    pub const SHIP_MAX_HP: f32 = 50.0;
    pub const SHIP_SIZE: f32 = 16.0;

    /// Projectile defaults
    pub const BULLET_SPEED: f32 = 100.0;
    pub const BULLET_SIZE: f32 = 6.0;
    pub const BULLET_DAMAGE: f32 = 1.0;
    /// Most volleys one emitter update may catch up on
    pub const MAX_VOLLEYS_PER_UPDATE: u32 = 16;

    /// Vertices per rendered quad (two triangles)
    pub const VERTICES_PER_QUAD: u32 = 6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
