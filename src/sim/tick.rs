//! Per-frame simulation tick
//!
//! Phase order is fixed: input, actor updates, emitters, spawn, collisions,
//! cull. Registry membership only changes in the spawn and cull phases.

use glam::Vec2;

use super::entity::UpdateContext;
use super::state::{FrameStats, GameState};

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Raw movement direction; normalized before scaling by ship speed
    pub movement: Vec2,
}

/// Advance the simulation by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> FrameStats {
    state.time_ticks += 1;

    apply_input(state, input);
    update_actors(state, dt);
    update_emitters(state, dt);
    let spawned = spawn_pending(state);
    let collisions = handle_collisions(state);
    let culled = remove_dead_actors(state);

    FrameStats {
        actors: state.registry.len(),
        spawned,
        collisions,
        culled,
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let speed = state.ship_speed;
    if let Some(ship) = state.player_ship_mut() {
        ship.actor.velocity = input.movement.normalize_or_zero() * speed;
    }
}

fn update_actors(state: &mut GameState, dt: f32) {
    let mut ctx = UpdateContext {
        world: state.world,
        spawns: &mut state.spawn_queue,
    };
    state.registry.for_each(|entity| entity.update(dt, &mut ctx));
}

fn update_emitters(state: &mut GameState, dt: f32) {
    for emitter in &mut state.emitters {
        emitter.update(dt, &mut state.spawn_queue);
    }
}

fn spawn_pending(state: &mut GameState) -> usize {
    let spawned = state.spawn_queue.len();
    for actor in state.spawn_queue.drain(..) {
        state.registry.add(actor);
    }
    spawned
}

/// Rebuild the quad-tree and kill everything overlapping the player.
/// Colliders' contact damage is applied to the player in one hit.
fn handle_collisions(state: &mut GameState) -> usize {
    let Some(player_id) = state.player else {
        return 0;
    };
    let Some(player_bounds) = state
        .registry
        .get(player_id)
        .filter(|entity| entity.is_alive())
        .map(|entity| entity.actor().bounds())
    else {
        return 0;
    };

    state.quadtree.rebuild(
        state
            .registry
            .iter()
            .filter(|entity| entity.is_alive())
            .map(|entity| (entity.id(), entity.actor().bounds())),
    );

    let mut collisions = 0;
    let mut damage = 0.0;
    for id in state.quadtree.query(&player_bounds) {
        if id == player_id {
            continue;
        }
        if let Some(entity) = state.registry.get_mut(id) {
            let actor = entity.actor_mut();
            damage += actor.contact_damage;
            actor.die();
            collisions += 1;
        }
    }

    if damage > 0.0 {
        if let Some(player) = state.registry.get_mut(player_id) {
            player.actor_mut().take_damage(damage);
        }
    }
    if collisions > 0 {
        log::trace!("{collisions} actors hit the player ({damage} damage)");
    }
    collisions
}

fn remove_dead_actors(state: &mut GameState) -> usize {
    state.registry.cull_dead()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EngineConfig;
    use crate::sim::actor::{Actor, ActorId};
    use crate::sim::emitter::{Emitter, EmitterPattern};
    use crate::sim::ship::Ship;

    const DT: f32 = 1.0 / 60.0;

    fn state_with_player() -> (GameState, ActorId) {
        let mut state = GameState::new(&EngineConfig::default());
        let ship = Ship::new(Actor::centered(Vec2::new(400.0, 450.0), 16.0).with_max_hp(10.0));
        let id = state.spawn_player(ship);
        (state, id)
    }

    fn bullet(position: Vec2, velocity: Vec2) -> Actor {
        Actor::centered(position, 4.0)
            .with_velocity(velocity)
            .with_contact_damage(1.0)
            .expiring_offscreen()
    }

    #[test]
    fn test_input_sets_normalized_velocity() {
        let (mut state, _) = state_with_player();
        let input = TickInput {
            movement: Vec2::new(1.0, -1.0),
        };
        tick(&mut state, &input, DT);
        let velocity = state.player_ship().unwrap().actor.velocity;
        assert!((velocity.length() - state.ship_speed).abs() < 1e-3);
    }

    #[test]
    fn test_colliding_actor_dies_and_is_culled() {
        let (mut state, player) = state_with_player();
        let hit = state.registry.add(bullet(Vec2::new(400.0, 445.0), Vec2::ZERO));
        let miss = state.registry.add(bullet(Vec2::new(100.0, 100.0), Vec2::ZERO));

        let stats = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(stats.collisions, 1);
        assert_eq!(stats.culled, 1);
        assert!(state.registry.get(hit).is_none());
        assert!(state.registry.get(miss).is_some());
        assert!(state.registry.get(player).is_some());
        assert_eq!(state.player_ship().unwrap().actor.hp(), 9.0);

        // Gone for good in later frames
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.registry.iter().all(|e| e.id() != hit));
        assert_eq!(state.registry.len(), 2);
    }

    #[test]
    fn test_actor_dying_mid_frame_is_updated_then_removed() {
        let (mut state, _) = state_with_player();
        let leaving = state
            .registry
            .add(bullet(Vec2::new(799.0, 100.0), Vec2::new(600.0, 0.0)));
        let before = state.registry.len();

        let stats = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(stats.culled, 1);
        assert_eq!(state.registry.len(), before - 1);
        assert!(state.registry.get(leaving).is_none());
    }

    #[test]
    fn test_spawned_actors_registered_same_frame() {
        let (mut state, _) = state_with_player();
        state.add_emitter(Emitter::new(
            Vec2::new(400.0, 100.0),
            EmitterPattern::Ring { count: 6, spin: 0.0 },
            DT,
            |pos, dir, from_time| {
                let mut actor = bullet(pos, dir * 100.0);
                actor.advance(from_time);
                actor
            },
        ));
        let stats = tick(&mut state, &TickInput::default(), DT * 1.5);
        assert_eq!(stats.spawned, 6);
        assert_eq!(state.registry.len(), 7);
        assert_eq!(state.pending_spawns(), 0);
    }

    #[test]
    fn test_spawn_placed_by_field_write_collides_same_frame() {
        let (mut state, _) = state_with_player();
        state.add_emitter(Emitter::new(
            Vec2::new(400.0, 450.0),
            EmitterPattern::Single,
            DT,
            |pos, _, _| {
                let mut actor = bullet(Vec2::ZERO, Vec2::ZERO);
                actor.position = pos;
                actor
            },
        ));
        let stats = tick(&mut state, &TickInput::default(), DT * 1.5);
        assert_eq!(stats.spawned, 1);
        assert_eq!(stats.collisions, 1);
        assert_eq!(state.player_ship().unwrap().actor.hp(), 9.0);
    }

    #[test]
    fn test_player_death_stops_collisions() {
        let (mut state, player) = state_with_player();
        state.player_ship_mut().unwrap().die();
        state.registry.add(bullet(Vec2::new(400.0, 450.0), Vec2::ZERO));

        let stats = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(stats.collisions, 0);
        assert!(state.registry.get(player).is_none());
        assert_eq!(state.registry.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let (mut state, _) = state_with_player();
            state.add_emitter(
                Emitter::new(
                    Vec2::new(400.0, 300.0),
                    EmitterPattern::Ring { count: 10, spin: 0.1 },
                    0.05,
                    |pos, dir, from_time| {
                        let mut actor = bullet(pos, dir * 100.0);
                        actor.advance(from_time);
                        actor
                    },
                )
                .with_jitter(0.1, 7),
            );
            let input = TickInput {
                movement: Vec2::new(-1.0, 0.0),
            };
            let mut history = Vec::new();
            for _ in 0..120 {
                history.push(tick(&mut state, &input, DT));
            }
            let positions: Vec<Vec2> = state.registry.iter().map(|e| e.actor().position).collect();
            (history, positions)
        };
        assert_eq!(run(), run());
    }
}
