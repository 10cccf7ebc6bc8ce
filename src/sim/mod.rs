//! Simulation module
//!
//! All per-frame logic lives here. This module is deterministic and has no
//! rendering or platform dependencies:
//! - Stable iteration order (registry insertion order, ids increasing)
//! - Seeded RNG only
//! - Registry membership changes only in the spawn and cull phases

pub mod actor;
pub mod behavior;
pub mod emitter;
pub mod entity;
pub mod quadtree;
pub mod rect;
pub mod registry;
pub mod ship;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorEvent, ActorEventKind, ActorId, Observer, SpriteId};
pub use behavior::{Action, Behavior, IfElse, Sequence, move_for, wait};
pub use emitter::{Emitter, EmitterPattern};
pub use entity::{Entity, UpdateContext};
pub use quadtree::QuadTree;
pub use rect::Rect;
pub use registry::ActorRegistry;
pub use ship::{MountPoint, Ship};
pub use state::{FrameStats, GameState};
pub use tick::{TickInput, tick};
