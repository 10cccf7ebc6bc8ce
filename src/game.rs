//! Game driver
//!
//! Owns the simulation state, the scheduler and the renderer, and runs every
//! per-frame phase from `on_frame`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::input::{InputSource, movement};
use crate::renderer::{ActorRenderer, DrawSurface, Image, Renderer, TextureRegion};
use crate::scheduler::FrameScheduler;
use crate::settings::EngineConfig;
use crate::sim::{
    Actor, ActorEvent, ActorEventKind, ActorId, Emitter, EmitterPattern, FrameStats, GameState, MountPoint,
    Ship, SpriteId, TickInput, tick,
};

pub const SHIP_SPRITE: SpriteId = SpriteId(0);
pub const BULLET_SPRITE: SpriteId = SpriteId(1);

/// Sprite sheet layout: 32x32 ship then a 16x16 bullet on a 64x32 sheet
pub fn sprite_regions() -> Vec<TextureRegion> {
    vec![
        TextureRegion::from_pixels(0, 0, 32, 32, 64, 32),
        TextureRegion::from_pixels(32, 0, 16, 16, 64, 32),
    ]
}

pub struct Game<S: DrawSurface, I: InputSource> {
    config: EngineConfig,
    pub state: GameState,
    scheduler: FrameScheduler,
    renderer: Renderer<S>,
    actor_renderer: ActorRenderer,
    sprite_sheet: Rc<Image>,
    input: I,
    frame: u64,
    last_stats: FrameStats,
    events: Rc<RefCell<Vec<ActorEvent>>>,
}

impl<S: DrawSurface, I: InputSource> Game<S, I> {
    /// Build the scene: the player ship near the bottom and a ring emitter
    /// in the middle of the world.
    pub fn new(config: EngineConfig, surface: S, sprite_sheet: Rc<Image>, input: I) -> Self {
        let mut state = GameState::new(&config);
        let world = config.world_bounds();

        let events = Rc::new(RefCell::new(Vec::new()));
        state.spawn_player(player_ship(&config, events.clone()));
        state.add_emitter(center_emitter(&config, world.center()));

        let mut renderer = Renderer::new(surface);
        renderer.set_resolution(config.world_width, config.world_height);
        let actor_renderer = ActorRenderer::install(&mut renderer, sprite_regions());

        log::info!(
            "world {}x{}, quad-tree capacity {} depth {}",
            config.world_width,
            config.world_height,
            config.quadtree_capacity,
            config.quadtree_max_depth
        );

        Self {
            scheduler: FrameScheduler::new(config.step),
            config,
            state,
            renderer,
            actor_renderer,
            sprite_sheet,
            input,
            frame: 0,
            last_stats: FrameStats::default(),
            events,
        }
    }

    pub fn start(&mut self) {
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Platform timer entry point. Runs however many frames the scheduler
    /// hands out for `now` (seconds) and returns that count.
    pub fn advance(&mut self, now: f64) -> usize {
        let mut frames = 0;
        for dt in self.scheduler.steps(now) {
            if !self.scheduler.is_running() {
                break;
            }
            self.on_frame(dt);
            frames += 1;
        }
        frames
    }

    /// One complete frame
    pub fn on_frame(&mut self, dt: f32) {
        self.frame += 1;
        if self.frame > self.config.frame_limit {
            log::info!("frame limit {} reached, stopping", self.config.frame_limit);
            self.scheduler.stop();
        }

        let input = self.handle_input();
        self.last_stats = tick(&mut self.state, &input, dt);
        self.render_all();

        if self.config.stats_interval > 0 && self.frame.is_multiple_of(self.config.stats_interval) {
            let fps = if dt > 0.0 { (1.0 / dt).round() } else { 0.0 };
            log::info!("{} things rendered at {} fps", self.state.registry.len(), fps);
        }
    }

    fn handle_input(&self) -> TickInput {
        TickInput {
            movement: movement(&self.input),
        }
    }

    fn render_all(&mut self) {
        let count = self.state.registry.len();
        let player = self.state.player;
        self.renderer.set_image(&self.sprite_sheet);
        self.renderer.clear(count);
        for entity in self.state.registry.iter() {
            self.actor_renderer
                .render(entity.actor(), &mut self.renderer, Some(entity.id()) == player);
        }
        self.renderer.draw(count);
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Id of the player ship, as tracked by the simulation state
    pub fn player(&self) -> Option<ActorId> {
        self.state.player
    }

    /// Events broadcast by the player ship so far
    pub fn player_events(&self) -> Vec<ActorEvent> {
        self.events.borrow().clone()
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }
}

fn player_ship(config: &EngineConfig, events: Rc<RefCell<Vec<ActorEvent>>>) -> Ship {
    let position = Vec2::new(config.world_width / 2.0, config.world_height * 0.75);
    let size = crate::consts::SHIP_SIZE;
    let mut ship = Ship::new(
        Actor::centered(position, size)
            .with_max_hp(config.ship_max_hp)
            .with_sprite(SHIP_SPRITE),
    )
    .with_mount_point(MountPoint::LeftWing, Vec2::new(0.0, size / 2.0))
    .with_mount_point(MountPoint::Center, Vec2::new(size / 2.0, 0.0))
    .with_mount_point(MountPoint::RightWing, Vec2::new(size, size / 2.0));

    ship.add_observer(Box::new(move |event| {
        if event.kind == ActorEventKind::Destroyed {
            log::info!("player ship {} destroyed", event.source);
        }
        events.borrow_mut().push(*event);
    }));
    ship
}

fn center_emitter(config: &EngineConfig, position: Vec2) -> Emitter {
    let speed = config.bullet_speed;
    let damage = config.bullet_damage;
    let pattern = EmitterPattern::Ring {
        count: config.emitter.count,
        spin: config.emitter.spin,
    };
    Emitter::new(position, pattern, config.emitter.interval, move |pos, dir, from_time| {
        let mut bullet = Actor::centered(pos, crate::consts::BULLET_SIZE)
            .with_velocity(dir * speed)
            .with_contact_damage(damage)
            .with_sprite(BULLET_SPRITE)
            .expiring_offscreen();
        bullet.advance(from_time);
        bullet
    })
    .with_jitter(config.emitter.jitter, config.seed)
}
