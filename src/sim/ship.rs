//! Ships: actors with mounted guns and an optional controller

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorEventKind, Observer};
use super::behavior::Behavior;
use super::emitter::Emitter;
use super::entity::UpdateContext;
use crate::rotate;

/// Labels for common mount points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MountPoint {
    LeftWing,
    LeftMid,
    Center,
    RightMid,
    RightWing,
}

#[derive(Debug)]
pub struct Ship {
    pub actor: Actor,
    /// Gun offsets relative to the top-left of the local bounds
    mount_points: BTreeMap<MountPoint, Vec2>,
    guns: BTreeMap<MountPoint, Emitter>,
    controller: Option<ShipController>,
}

/// Behavior tree steering the ship actor
pub struct ShipController(pub Behavior<Actor>);

impl std::fmt::Debug for ShipController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ShipController")
    }
}

impl Ship {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            mount_points: BTreeMap::new(),
            guns: BTreeMap::new(),
            controller: None,
        }
    }

    pub fn with_mount_point(mut self, label: MountPoint, offset: Vec2) -> Self {
        self.mount_points.insert(label, offset);
        self
    }

    pub fn with_gun(mut self, label: MountPoint, gun: Emitter) -> Self {
        self.guns.insert(label, gun);
        self
    }

    pub fn with_controller(mut self, controller: Behavior<Actor>) -> Self {
        self.controller = Some(ShipController(controller));
        self
    }

    /// Replace every mounted gun
    pub fn set_gun_set(&mut self, guns: BTreeMap<MountPoint, Emitter>) {
        self.guns = guns;
    }

    pub fn gun(&self, label: MountPoint) -> Option<&Emitter> {
        self.guns.get(&label)
    }

    pub fn set_controller(&mut self, controller: Option<Behavior<Actor>>) {
        self.controller = controller.map(ShipController);
    }

    /// Controller, base actor update, then every gun that has a mount point
    pub fn update(&mut self, dt: f32, ctx: &mut UpdateContext<'_>) {
        if !self.actor.is_alive() {
            return;
        }

        if let Some(ShipController(controller)) = &mut self.controller {
            controller.update(&mut self.actor, dt);
        }

        self.actor.update(dt, &ctx.world);
        if !self.actor.is_alive() {
            return;
        }

        let mut fired = Vec::new();
        for (label, gun) in &mut self.guns {
            let Some(offset) = self.mount_points.get(label) else {
                continue;
            };
            gun.set_angle(self.actor.rotation - FRAC_PI_2);
            gun.set_position(mount_world_position(&self.actor, *offset));

            let shots = gun.update(dt, ctx.spawns);
            if shots > 0 {
                fired.push((*label, shots));
            }
        }

        for (mount, shots) in fired {
            self.actor.notify(ActorEventKind::Fired { mount, shots });
        }
    }

    /// World position of a mount point under the current pose
    pub fn mount_position(&self, label: MountPoint) -> Option<Vec2> {
        self.mount_points
            .get(&label)
            .map(|offset| mount_world_position(&self.actor, *offset))
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.actor.take_damage(amount);
    }

    pub fn die(&mut self) {
        self.actor.die();
    }

    pub fn reset_health(&mut self) {
        self.actor.reset_health();
    }

    pub fn add_observer(&mut self, observer: Observer) {
        self.actor.add_observer(observer);
    }
}

fn mount_world_position(actor: &Actor, offset: Vec2) -> Vec2 {
    let local = (offset + actor.local_bounds().min()) * actor.scale;
    actor.position + rotate(local, actor.rotation)
}
