//! Timed projectile emitters
//!
//! An emitter fires on a fixed interval. Each shot calls the spawn function
//! with the muzzle position, a unit direction and the time elapsed since the
//! shot was due; the spawned actors are queued for the registry's spawn phase.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use crate::consts::MAX_VOLLEYS_PER_UPDATE;
use crate::{normalize_angle, polar_to_cartesian};

/// Builds a projectile from `(position, direction, from_time)`
pub type SpawnFn = Box<dyn FnMut(Vec2, Vec2, f32) -> Actor>;

/// Shape of one volley
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EmitterPattern {
    /// One shot along the emitter angle
    Single,
    /// `count` shots evenly spaced around a circle, rotated by `spin` radians after each volley
    Ring { count: u32, spin: f32 },
}

pub struct Emitter {
    position: Vec2,
    /// Radians
    angle: f32,
    pattern: EmitterPattern,
    /// Seconds between volleys
    interval: f32,
    timer: f32,
    /// Maximum random deviation per shot (radians)
    jitter: f32,
    rng: Pcg32,
    spawn: SpawnFn,
    volleys: u64,
}

impl Emitter {
    pub fn new(
        position: Vec2,
        pattern: EmitterPattern,
        interval: f32,
        spawn: impl FnMut(Vec2, Vec2, f32) -> Actor + 'static,
    ) -> Self {
        Self {
            position,
            angle: 0.0,
            pattern,
            interval,
            timer: 0.0,
            jitter: 0.0,
            rng: Pcg32::seed_from_u64(0),
            spawn: Box::new(spawn),
            volleys: 0,
        }
    }

    /// Randomize each shot direction by up to `jitter` radians, deterministically per seed
    pub fn with_jitter(mut self, jitter: f32, seed: u64) -> Self {
        self.jitter = jitter.abs();
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = normalize_angle(angle);
    }

    /// Total volleys fired so far
    pub fn volleys(&self) -> u64 {
        self.volleys
    }

    /// Advance by `dt`, pushing spawned actors into `out`. Returns the number of shots.
    pub fn update(&mut self, dt: f32, out: &mut Vec<Actor>) -> u32 {
        if !(self.interval > 0.0) || !(dt > 0.0) {
            return 0;
        }

        self.timer += dt;
        let mut shots = 0;
        let mut volleys = 0;
        while self.timer >= self.interval && volleys < MAX_VOLLEYS_PER_UPDATE {
            self.timer -= self.interval;
            // Time since this volley was due, so the projectile can catch up
            let from_time = self.timer;
            shots += self.fire(from_time, out);
            self.volleys += 1;
            volleys += 1;
        }
        if volleys == MAX_VOLLEYS_PER_UPDATE && self.timer >= self.interval {
            log::debug!("emitter dropped {:.3}s of backlog", self.timer);
            self.timer %= self.interval;
        }
        shots
    }

    fn fire(&mut self, from_time: f32, out: &mut Vec<Actor>) -> u32 {
        match self.pattern {
            EmitterPattern::Single => {
                let direction = polar_to_cartesian(1.0, self.angle + self.sample_jitter());
                out.push((self.spawn)(self.position, direction, from_time));
                1
            }
            EmitterPattern::Ring { count, spin } => {
                let step = TAU / count.max(1) as f32;
                for i in 0..count {
                    let theta = self.angle + step * i as f32 + self.sample_jitter();
                    out.push((self.spawn)(
                        self.position,
                        polar_to_cartesian(1.0, theta),
                        from_time,
                    ));
                }
                self.angle = normalize_angle(self.angle + spin);
                count
            }
        }
    }

    fn sample_jitter(&mut self) -> f32 {
        if self.jitter > 0.0 {
            self.rng.random_range(-self.jitter..=self.jitter)
        } else {
            0.0
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("position", &self.position)
            .field("angle", &self.angle)
            .field("pattern", &self.pattern)
            .field("interval", &self.interval)
            .field("volleys", &self.volleys)
            .finish()
    }
}
