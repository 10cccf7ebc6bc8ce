//! Per-vertex attribute streams and 2D uniforms

use glam::Vec2;

use crate::consts::VERTICES_PER_QUAD;

/// A float attribute stream with `components` floats per vertex
#[derive(Debug, Clone)]
pub struct ArrayAttribute {
    pub name: &'static str,
    pub location: u32,
    components: u32,
    data: Vec<f32>,
}

impl ArrayAttribute {
    pub fn new(name: &'static str, location: u32, components: u32) -> Self {
        Self {
            name,
            location,
            components: components.clamp(1, 4),
            data: Vec::new(),
        }
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn format(&self) -> wgpu::VertexFormat {
        match self.components {
            1 => wgpu::VertexFormat::Float32,
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }

    /// Empty the stream, reserving room for `quads` quads
    pub fn clear(&mut self, quads: usize) {
        self.data.clear();
        self.data
            .reserve(quads * VERTICES_PER_QUAD as usize * self.components as usize);
    }

    /// Two triangles from corners ordered top-left, top-right, bottom-left, bottom-right
    pub fn push_quad(&mut self, corners: [Vec2; 4]) {
        let [tl, tr, bl, br] = corners;
        for corner in [tl, tr, bl, bl, tr, br] {
            self.data.extend_from_slice(&corner.to_array());
        }
    }

    /// Same value on all six vertices of a quad
    pub fn push_flat(&mut self, value: &[f32]) {
        for _ in 0..VERTICES_PER_QUAD {
            self.data.extend_from_slice(value);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / self.components as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// A vec2 uniform bound by location
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Uniform2d {
    pub location: u32,
    pub value: [f32; 2],
}

impl Uniform2d {
    pub const fn new(location: u32, x: f32, y: f32) -> Self {
        Self {
            location,
            value: [x, y],
        }
    }
}
