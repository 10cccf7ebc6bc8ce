//! Quad batch renderer
//!
//! Collects per-vertex attribute streams and vec2 uniforms, then submits one
//! triangle-list draw for the whole frame.

use std::rc::Rc;

use super::surface::{DrawSurface, Image};
use super::vertex::{ArrayAttribute, Uniform2d};
use crate::consts::VERTICES_PER_QUAD;

/// Uniform location reserved for the viewport resolution
pub const RESOLUTION_LOCATION: u32 = 0;

/// Index of a registered attribute stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeId(usize);

/// Index of a registered uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformId(usize);

#[derive(Debug)]
pub struct Renderer<S: DrawSurface> {
    surface: S,
    attributes: Vec<ArrayAttribute>,
    uniforms: Vec<Uniform2d>,
    resolution: Option<UniformId>,
    current_image: Option<Rc<Image>>,
}

impl<S: DrawSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            resolution: None,
            current_image: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Bind `image` as the texture. Re-uploads only when the image changed.
    pub fn set_image(&mut self, image: &Rc<Image>) {
        if let Some(current) = &self.current_image {
            if Rc::ptr_eq(current, image) {
                return;
            }
        }
        log::debug!("uploading {}x{} texture", image.width, image.height);
        self.surface
            .upload_texture(image.width, image.height, &image.pixels);
        self.current_image = Some(Rc::clone(image));
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        match self.resolution {
            Some(id) => self.uniforms[id.0].value = [width, height],
            None => {
                let id = self.add_uniform_2d(Uniform2d::new(RESOLUTION_LOCATION, width, height));
                self.resolution = Some(id);
            }
        }
    }

    pub fn add_array_attribute(&mut self, attribute: ArrayAttribute) -> AttributeId {
        self.attributes.push(attribute);
        AttributeId(self.attributes.len() - 1)
    }

    pub fn add_uniform_2d(&mut self, uniform: Uniform2d) -> UniformId {
        self.uniforms.push(uniform);
        UniformId(self.uniforms.len() - 1)
    }

    pub fn attribute(&self, id: AttributeId) -> &ArrayAttribute {
        &self.attributes[id.0]
    }

    pub fn attribute_mut(&mut self, id: AttributeId) -> &mut ArrayAttribute {
        &mut self.attributes[id.0]
    }

    pub fn uniform_mut(&mut self, id: UniformId) -> &mut Uniform2d {
        &mut self.uniforms[id.0]
    }

    /// Clear the frame and size every attribute stream for `quads` quads
    pub fn clear(&mut self, quads: usize) {
        self.surface.clear_frame();
        for attribute in &mut self.attributes {
            attribute.clear(quads);
        }
    }

    /// Bind uniforms and attributes, then draw `quads` quads
    pub fn draw(&mut self, quads: usize) {
        for uniform in &self.uniforms {
            self.surface.set_uniform2(uniform.location, uniform.value);
        }
        for attribute in &self.attributes {
            self.surface
                .bind_attribute(attribute.location, attribute.format(), attribute.as_bytes());
        }
        self.surface.draw(
            wgpu::PrimitiveTopology::TriangleList,
            VERTICES_PER_QUAD * quads as u32,
        );
    }
}
