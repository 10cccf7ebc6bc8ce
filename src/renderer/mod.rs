//! Rendering boundary
//!
//! The simulation never touches the GPU. Each frame the game clears the
//! renderer, lets `ActorRenderer` write one quad per actor, then draws.

pub mod actor;
pub mod pipeline;
pub mod surface;
pub mod vertex;

pub use actor::{ActorRenderer, TextureRegion};
pub use pipeline::{AttributeId, Renderer, UniformId};
pub use surface::{DrawSurface, Image, RecordingSurface, SurfaceCall};
pub use vertex::{ArrayAttribute, Uniform2d};
