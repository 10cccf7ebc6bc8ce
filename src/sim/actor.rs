//! Actor entity: pose, bounds, health and observer fan-out
//!
//! Every simulated thing (ships, projectiles) embeds an `Actor`. The registry
//! owns actors; everything else refers to them by `ActorId`.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::ship::MountPoint;

/// Stable handle to a registered actor.
///
/// Ids are handed out by the registry in increasing order, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl ActorId {
    /// Id carried by actors that have not been registered yet
    pub const UNASSIGNED: ActorId = ActorId(0);
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index into the actor renderer's sprite table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteId(pub u16);

/// What happened to an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorEventKind {
    /// The actor died (emitted exactly once)
    Destroyed,
    /// The actor lost `amount` hp and survived the hit
    Damaged { amount: f32 },
    /// A mounted gun fired `shots` projectiles this frame
    Fired { mount: MountPoint, shots: u32 },
}

/// Event tagged with the actor that emitted it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorEvent {
    pub source: ActorId,
    pub kind: ActorEventKind,
}

/// Subscriber callback
pub type Observer = Box<dyn FnMut(&ActorEvent)>;

/// Ordered list of subscribers, notified synchronously in registration order
#[derive(Default)]
pub struct Observers {
    subscribers: Vec<Observer>,
}

impl Observers {
    pub fn add(&mut self, observer: Observer) {
        self.subscribers.push(observer);
    }

    pub fn notify(&mut self, event: &ActorEvent) {
        for observer in &mut self.subscribers {
            observer(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.subscribers.len())
            .finish()
    }
}

/// A live simulation entity
#[derive(Debug)]
pub struct Actor {
    pub(crate) id: ActorId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub scale: Vec2,
    local_bounds: Rect,
    hp: f32,
    max_hp: f32,
    alive: bool,
    /// Damage dealt to whatever this actor hits
    pub contact_damage: f32,
    /// Die as soon as the bounds leave the world
    pub expires_offscreen: bool,
    pub sprite: SpriteId,
    observers: Observers,
}

impl Actor {
    /// Create an actor at `position` with bounds local to that position
    pub fn new(position: Vec2, local_bounds: Rect) -> Self {
        Self {
            id: ActorId::UNASSIGNED,
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            local_bounds,
            hp: 1.0,
            max_hp: 1.0,
            alive: true,
            contact_damage: 0.0,
            expires_offscreen: false,
            sprite: SpriteId::default(),
            observers: Observers::default(),
        }
    }

    /// Square actor of side `size` centered on `position`
    pub fn centered(position: Vec2, size: f32) -> Self {
        Self::new(position, Rect::from_center(Vec2::ZERO, Vec2::splat(size)))
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_max_hp(mut self, max_hp: f32) -> Self {
        self.max_hp = max_hp.max(0.0);
        self.hp = self.max_hp;
        self
    }

    pub fn with_contact_damage(mut self, damage: f32) -> Self {
        self.contact_damage = damage;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteId) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn expiring_offscreen(mut self) -> Self {
        self.expires_offscreen = true;
        self
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// World-space bounds for the current position and scale.
    /// Derived on every call, so direct writes to `position` or `scale` are
    /// always reflected.
    pub fn bounds(&self) -> Rect {
        let local = self.local_bounds;
        Rect::new(
            self.position.x + local.x * self.scale.x,
            self.position.y + local.y * self.scale.y,
            local.width * self.scale.x,
            local.height * self.scale.y,
        )
    }

    pub fn local_bounds(&self) -> Rect {
        self.local_bounds
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_local_bounds(&mut self, local_bounds: Rect) {
        self.local_bounds = local_bounds;
    }

    /// Integrate velocity over `dt`, regardless of liveness
    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Per-frame update. Dead actors are inert.
    pub fn update(&mut self, dt: f32, world: &Rect) {
        if !self.alive {
            return;
        }
        self.advance(dt);
        if self.expires_offscreen && !self.bounds().intersects(world) {
            self.die();
        }
    }

    /// Subtract `amount` hp. Dropping below zero kills the actor.
    pub fn take_damage(&mut self, amount: f32) {
        if !self.alive || !(amount > 0.0) {
            return;
        }
        self.hp -= amount;
        if self.hp < 0.0 {
            self.die();
        } else {
            self.notify(ActorEventKind::Damaged { amount });
        }
    }

    /// Zero hp, mark dead and broadcast the destroy event. Idempotent.
    pub fn die(&mut self) {
        if !self.alive {
            return;
        }
        self.hp = 0.0;
        self.alive = false;
        log::trace!("actor {} destroyed", self.id);
        self.notify(ActorEventKind::Destroyed);
    }

    pub fn reset_health(&mut self) {
        self.hp = self.max_hp;
    }

    pub fn add_observer(&mut self, observer: Observer) {
        self.observers.add(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Tag an event with this actor and forward it to every observer
    pub fn notify(&mut self, kind: ActorEventKind) {
        let event = ActorEvent {
            source: self.id,
            kind,
        };
        self.observers.notify(&event);
    }
}
