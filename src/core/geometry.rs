use crate::core::color::{ColorRGB, white};
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A vertex as supplied by mesh construction. Never modified afterwards.
#[derive(Debug, Clone, Copy)]
pub struct InputVertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    /// Tangent vector for Normal Mapping.
    pub tangent: Vector3<f32>,
    /// Texture coordinates (UV).
    pub uv: Vector2<f32>,
    pub color: ColorRGB,
}

impl InputVertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            tangent: Vector3::zeros(),
            uv,
            color: white(),
        }
    }
}

impl Default for InputVertex {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::zeros(), Vector2::zeros())
    }
}

/// A vertex after the transformation stage, ready for rasterization.
#[derive(Debug, Clone, Copy)]
pub struct OutputVertex {
    /// x, y: pixel coordinates. z: NDC depth. w: clip-space w, kept un-divided
    /// for perspective-correct interpolation.
    pub position: Vector4<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub color: ColorRGB,
    /// Camera-to-vertex direction in world space.
    pub view_direction: Vector3<f32>,
}

impl From<&InputVertex> for OutputVertex {
    fn from(vertex: &InputVertex) -> Self {
        Self {
            position: Vector4::zeros(),
            normal: vertex.normal,
            tangent: vertex.tangent,
            uv: vertex.uv,
            color: vertex.color,
            view_direction: Vector3::zeros(),
        }
    }
}

/// How an index list is turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    /// Every three indices form one triangle.
    #[default]
    TriangleList,
    /// Every index after the second forms a triangle with the two before it.
    /// Odd triangles have their winding flipped back.
    TriangleStrip,
}

/// Iterates the triangles described by `indices`, in index order.
///
/// Triangles that repeat an index are skipped. Strip triangles at odd positions
/// have their first and last vertex swapped so all triangles share one winding.
pub fn assemble_triangles(
    indices: &[u32],
    topology: PrimitiveTopology,
) -> impl Iterator<Item = [u32; 3]> + '_ {
    let (step, count) = match topology {
        PrimitiveTopology::TriangleList => (3, indices.len() / 3),
        PrimitiveTopology::TriangleStrip => (1, indices.len().saturating_sub(2)),
    };

    (0..count).filter_map(move |t| {
        let i = t * step;
        let (i0, i1, i2) = (indices[i], indices[i + 1], indices[i + 2]);

        if i0 == i1 || i1 == i2 || i2 == i0 {
            return None;
        }

        if topology == PrimitiveTopology::TriangleStrip && i % 2 == 1 {
            Some([i2, i1, i0])
        } else {
            Some([i0, i1, i2])
        }
    })
}
