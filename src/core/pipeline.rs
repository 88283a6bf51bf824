use crate::core::color::ColorRGB;
use crate::core::geometry::OutputVertex;
use crate::scene::material::Material;

/// The programmable stage of the pipeline.
///
/// The vertex stage is fixed-function (see `pipeline::vertex`); only the
/// per-pixel evaluation is pluggable. The rasterizer calls `fragment` once for
/// every pixel that passes the depth test, with all varyings already
/// perspective-corrected and the vector attributes renormalized.
pub trait FragmentShader {
    /// Computes the color of one fragment.
    ///
    /// # Arguments
    /// - `fragment`: interpolated vertex. `position` holds the pixel center in
    ///   x/y, the corrected depth in z and the interpolated clip `w`.
    /// - `material`: sampler slots of the mesh being drawn.
    ///
    /// # Returns
    /// - Linear RGB. May exceed 1.0; the rasterizer rescales before packing.
    fn fragment(&self, fragment: &OutputVertex, material: &Material) -> ColorRGB;
}
