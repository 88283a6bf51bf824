use crate::core::color::{ColorRGB, black};
use crate::scene::texture::Texture;
use nalgebra::Vector2;
use std::sync::Arc;

/// The four sampler slots a mesh can be wired to.
///
/// Every slot is optional; an empty slot samples as black. Textures are shared,
/// so one decoded image can back several meshes.
#[derive(Debug, Clone, Default)]
pub struct Material {
    pub diffuse: Option<Arc<Texture>>,
    /// Tangent-space normal map, channels encoded in `[0, 1]`.
    pub normal: Option<Arc<Texture>>,
    /// Glossiness; only the red channel is used.
    pub gloss: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
}

#[inline]
fn sample_slot(slot: &Option<Arc<Texture>>, uv: &Vector2<f32>) -> ColorRGB {
    slot.as_ref().map_or_else(black, |texture| texture.sample(uv))
}

impl Material {
    pub fn sample_diffuse(&self, uv: &Vector2<f32>) -> ColorRGB {
        sample_slot(&self.diffuse, uv)
    }

    pub fn sample_normal(&self, uv: &Vector2<f32>) -> ColorRGB {
        sample_slot(&self.normal, uv)
    }

    pub fn sample_gloss(&self, uv: &Vector2<f32>) -> ColorRGB {
        sample_slot(&self.gloss, uv)
    }

    pub fn sample_specular(&self, uv: &Vector2<f32>) -> ColorRGB {
        sample_slot(&self.specular, uv)
    }
}
