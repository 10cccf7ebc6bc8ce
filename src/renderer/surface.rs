//! Draw surface boundary
//!
//! The GPU context is an external collaborator. The renderer talks to it only
//! through `DrawSurface`.

/// RGBA8 bitmap handed to the surface as a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Single-color image
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

pub trait DrawSurface {
    /// Clear color and depth
    fn clear_frame(&mut self);
    fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]);
    fn set_uniform2(&mut self, location: u32, value: [f32; 2]);
    fn bind_attribute(&mut self, location: u32, format: wgpu::VertexFormat, data: &[u8]);
    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertex_count: u32);
}

/// One call made against a `RecordingSurface`
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Clear,
    UploadTexture { width: u32, height: u32 },
    Uniform2 { location: u32, value: [f32; 2] },
    Attribute { location: u32, format: wgpu::VertexFormat, bytes: usize },
    Draw { topology: wgpu::PrimitiveTopology, vertex_count: u32 },
}

/// Headless surface that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
    draws: u64,
    vertices: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Forget recorded calls, keeping the running totals
    pub fn clear_log(&mut self) {
        self.calls.clear();
    }

    /// Draw calls issued since creation
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Vertices submitted since creation
    pub fn vertex_count(&self) -> u64 {
        self.vertices
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_frame(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn upload_texture(&mut self, width: u32, height: u32, _rgba: &[u8]) {
        self.calls.push(SurfaceCall::UploadTexture { width, height });
    }

    fn set_uniform2(&mut self, location: u32, value: [f32; 2]) {
        self.calls.push(SurfaceCall::Uniform2 { location, value });
    }

    fn bind_attribute(&mut self, location: u32, format: wgpu::VertexFormat, data: &[u8]) {
        self.calls.push(SurfaceCall::Attribute {
            location,
            format,
            bytes: data.len(),
        });
    }

    fn draw(&mut self, topology: wgpu::PrimitiveTopology, vertex_count: u32) {
        self.draws += 1;
        self.vertices += vertex_count as u64;
        self.calls.push(SurfaceCall::Draw {
            topology,
            vertex_count,
        });
    }
}
