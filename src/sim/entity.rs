//! Registry entries: plain actors and ships behind one sum type

use super::actor::{Actor, ActorId};
use super::rect::Rect;
use super::ship::Ship;

/// Per-frame data handed to every entity update
pub struct UpdateContext<'a> {
    pub world: Rect,
    /// Actors spawned during this update, registered in the spawn phase
    pub spawns: &'a mut Vec<Actor>,
}

#[derive(Debug)]
pub enum Entity {
    Basic(Actor),
    Ship(Ship),
}

impl Entity {
    pub fn actor(&self) -> &Actor {
        match self {
            Entity::Basic(actor) => actor,
            Entity::Ship(ship) => &ship.actor,
        }
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        match self {
            Entity::Basic(actor) => actor,
            Entity::Ship(ship) => &mut ship.actor,
        }
    }

    pub fn id(&self) -> ActorId {
        self.actor().id()
    }

    pub fn is_alive(&self) -> bool {
        self.actor().is_alive()
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match self {
            Entity::Ship(ship) => Some(ship),
            Entity::Basic(_) => None,
        }
    }

    pub fn update(&mut self, dt: f32, ctx: &mut UpdateContext<'_>) {
        match self {
            Entity::Basic(actor) => actor.update(dt, &ctx.world),
            Entity::Ship(ship) => ship.update(dt, ctx),
        }
    }
}

impl From<Actor> for Entity {
    fn from(actor: Actor) -> Self {
        Entity::Basic(actor)
    }
}

impl From<Ship> for Entity {
    fn from(ship: Ship) -> Self {
        Entity::Ship(ship)
    }
}
