//! Simulation state
//!
//! Everything one frame of simulation reads or writes lives here.

use super::actor::{Actor, ActorId};
use super::emitter::Emitter;
use super::entity::Entity;
use super::quadtree::QuadTree;
use super::rect::Rect;
use super::registry::ActorRegistry;
use super::ship::Ship;
use crate::settings::EngineConfig;

/// Counters for one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Live actors after the cull
    pub actors: usize,
    pub spawned: usize,
    /// Actors that hit the player this frame
    pub collisions: usize,
    pub culled: usize,
}

#[derive(Debug)]
pub struct GameState {
    pub world: Rect,
    pub registry: ActorRegistry,
    /// Free-standing emitters (not mounted on a ship)
    pub emitters: Vec<Emitter>,
    /// The actor collisions are tested against
    pub player: Option<ActorId>,
    /// Player speed in world units per second
    pub ship_speed: f32,
    /// Frames simulated so far
    pub time_ticks: u64,
    /// Broad phase, rebuilt inside every collision pass
    pub(crate) quadtree: QuadTree,
    /// Actors spawned during update, registered in the spawn phase
    pub(crate) spawn_queue: Vec<Actor>,
}

impl GameState {
    pub fn new(config: &EngineConfig) -> Self {
        let world = config.world_bounds();
        Self {
            world,
            registry: ActorRegistry::new(),
            emitters: Vec::new(),
            player: None,
            ship_speed: config.ship_speed,
            time_ticks: 0,
            quadtree: QuadTree::new(world, config.quadtree_capacity, config.quadtree_max_depth),
            spawn_queue: Vec::new(),
        }
    }

    /// Register `ship` and track it as the player
    pub fn spawn_player(&mut self, ship: Ship) -> ActorId {
        let id = self.registry.add(ship);
        self.player = Some(id);
        id
    }

    pub fn add_emitter(&mut self, emitter: Emitter) {
        self.emitters.push(emitter);
    }

    /// The player ship, if it is still registered
    pub fn player_ship(&self) -> Option<&Ship> {
        match self.registry.get(self.player?)? {
            Entity::Ship(ship) => Some(ship),
            Entity::Basic(_) => None,
        }
    }

    pub fn player_ship_mut(&mut self) -> Option<&mut Ship> {
        self.registry.get_mut(self.player?)?.as_ship_mut()
    }

    /// Actors queued for the next spawn phase
    pub fn pending_spawns(&self) -> usize {
        self.spawn_queue.len()
    }
}
