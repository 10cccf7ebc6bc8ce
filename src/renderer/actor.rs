//! Actor quads: turns actor pose and sprite into attribute data

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pipeline::{AttributeId, Renderer};
use super::surface::DrawSurface;
use super::vertex::ArrayAttribute;
use crate::rotate;
use crate::sim::{Actor, SpriteId};

/// Attribute locations used by the actor shader
pub const POSITION_LOCATION: u32 = 1;
pub const TEX_COORD_LOCATION: u32 = 2;
pub const HIGHLIGHT_LOCATION: u32 = 3;

/// Sub-rectangle of a texture in normalized UV space
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct TextureRegion {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl TextureRegion {
    pub const FULL: TextureRegion = TextureRegion {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Region from pixel coordinates within a `texture_width` x `texture_height` texture
    pub fn from_pixels(x: u32, y: u32, width: u32, height: u32, texture_width: u32, texture_height: u32) -> Self {
        let tw = texture_width.max(1) as f32;
        let th = texture_height.max(1) as f32;
        Self {
            u0: x as f32 / tw,
            v0: y as f32 / th,
            u1: (x + width) as f32 / tw,
            v1: (y + height) as f32 / th,
        }
    }

    fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.u0, self.v0),
            Vec2::new(self.u1, self.v0),
            Vec2::new(self.u0, self.v1),
            Vec2::new(self.u1, self.v1),
        ]
    }
}

/// Writes one quad per actor into the renderer's attribute streams
#[derive(Debug, Clone)]
pub struct ActorRenderer {
    regions: Vec<TextureRegion>,
    position: AttributeId,
    tex_coord: AttributeId,
    highlight: AttributeId,
}

impl ActorRenderer {
    /// Register the actor attribute streams on `renderer`.
    /// `regions` is indexed by `SpriteId`.
    pub fn install<S: DrawSurface>(renderer: &mut Renderer<S>, regions: Vec<TextureRegion>) -> Self {
        Self {
            regions,
            position: renderer.add_array_attribute(ArrayAttribute::new("a_position", POSITION_LOCATION, 2)),
            tex_coord: renderer.add_array_attribute(ArrayAttribute::new("a_tex_coord", TEX_COORD_LOCATION, 2)),
            highlight: renderer.add_array_attribute(ArrayAttribute::new("a_highlight", HIGHLIGHT_LOCATION, 1)),
        }
    }

    pub fn region(&self, sprite: SpriteId) -> TextureRegion {
        self.regions
            .get(sprite.0 as usize)
            .copied()
            .unwrap_or(TextureRegion::FULL)
    }

    pub fn render<S: DrawSurface>(&self, actor: &Actor, renderer: &mut Renderer<S>, highlighted: bool) {
        renderer
            .attribute_mut(self.position)
            .push_quad(world_corners(actor));
        renderer
            .attribute_mut(self.tex_coord)
            .push_quad(self.region(actor.sprite).corners());
        renderer
            .attribute_mut(self.highlight)
            .push_flat(&[if highlighted { 1.0 } else { 0.0 }]);
    }
}

/// Local bounds scaled, rotated about the actor position, then placed in the world
fn world_corners(actor: &Actor) -> [Vec2; 4] {
    let local = actor.local_bounds();
    let min = local.min();
    let max = local.max();
    [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        Vec2::new(max.x, max.y),
    ]
    .map(|corner| actor.position + rotate(corner * actor.scale, actor.rotation))
}
