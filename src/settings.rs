//! Engine configuration
//!
//! Everything tunable lives in one explicitly constructed `EngineConfig`.
//! Missing JSON fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::scheduler::StepMode;
use crate::sim::Rect;

/// The world-center ring emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Projectiles per volley
    pub count: u32,
    /// Seconds between volleys
    pub interval: f32,
    /// Rotation applied after each volley (radians)
    pub spin: f32,
    /// Random spread per projectile (radians)
    pub jitter: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            count: 12,
            interval: 0.1,
            spin: 0.1,
            jitter: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world_width: f32,
    pub world_height: f32,

    // === Spatial index ===
    pub quadtree_capacity: usize,
    pub quadtree_max_depth: u32,

    // === Scheduling ===
    pub step: StepMode,
    /// Frames to run before stopping
    pub frame_limit: u64,
    /// Log stats every N frames (0 disables)
    pub stats_interval: u64,

    // === Actors ===
    pub ship_speed: f32,
    pub ship_max_hp: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub emitter: EmitterConfig,

    /// Seed for every random stream
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            quadtree_capacity: QUADTREE_CAPACITY,
            quadtree_max_depth: QUADTREE_MAX_DEPTH,

            step: StepMode::default(),
            frame_limit: FRAME_LIMIT,
            stats_interval: STATS_INTERVAL,

            ship_speed: SHIP_SPEED,
            ship_max_hp: SHIP_MAX_HP,
            bullet_speed: BULLET_SPEED,
            bullet_damage: BULLET_DAMAGE,
            emitter: EmitterConfig::default(),

            seed: 0,
        }
    }
}

impl EngineConfig {
    pub fn world_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.world_width, self.world_height)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults when it is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Invalid config {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read config {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "frame_limit": 30, "emitter": { "count": 3 } }"#).unwrap();
        assert_eq!(config.frame_limit, 30);
        assert_eq!(config.emitter.count, 3);
        assert_eq!(config.emitter.interval, EmitterConfig::default().interval);
        assert_eq!(config.quadtree_capacity, QUADTREE_CAPACITY);
    }

    #[test]
    fn test_step_mode_json() {
        let config = EngineConfig::from_json(r#"{ "step": { "mode": "variable" } }"#).unwrap();
        assert_eq!(config.step, StepMode::Variable);

        let json = EngineConfig::default().to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(EngineConfig::from_json("{ frame_limit: }").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = EngineConfig::load("/nonexistent/d2-engine.json");
        assert_eq!(config, EngineConfig::default());
    }
}
