use nalgebra::{Point2, Vector3};
use std::ops::{Add, Mul};

/// 2D edge function: the cross product `(b - a) × (c - a)`.
///
/// Twice the signed area of triangle (a, b, c). Positive when the points wind
/// clockwise on screen (Y pointing down).
#[inline(always)]
pub fn edge_function(a: &Point2<f32>, b: &Point2<f32>, c: &Point2<f32>) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Barycentric weights of point `p` with respect to triangle (v0, v1, v2).
///
/// `inv_area` is the reciprocal of `edge_function(v0, v1, v2)`, computed once
/// per triangle. Only two edges are evaluated: the third weight is `1 - w0 - w1`.
///
/// # Returns
/// A Vector3 where:
/// - x: weight for v0
/// - y: weight for v1
/// - z: weight for v2
#[inline(always)]
pub fn barycentric_weights(
    p: &Point2<f32>,
    v0: &Point2<f32>,
    v1: &Point2<f32>,
    v2: &Point2<f32>,
    inv_area: f32,
) -> Vector3<f32> {
    let w0 = edge_function(v1, v2, p) * inv_area;
    let w1 = edge_function(v2, v0, p) * inv_area;
    Vector3::new(w0, w1, 1.0 - w0 - w1)
}

/// A pixel is covered iff all three weights are non-negative.
#[inline(always)]
pub fn is_inside_triangle(bary: &Vector3<f32>) -> bool {
    bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0
}

/// Blends three reciprocals with the screen-space weights and inverts the sum.
///
/// Used for both the depth (`1/z`) and the perspective `w` (`1/w`):
/// quantities whose reciprocal is affine in screen space.
#[inline(always)]
pub fn interpolate_reciprocal(bary: &Vector3<f32>, inv: &[f32; 3]) -> f32 {
    1.0 / (inv[0] * bary.x + inv[1] * bary.y + inv[2] * bary.z)
}

/// Perspective-correct interpolation of a vertex attribute.
///
/// `pre_divided` holds each vertex's attribute already divided by that vertex's
/// `w`; `w` is the interpolated clip `w` from [`interpolate_reciprocal`].
#[inline(always)]
pub fn perspective_interpolate<T>(pre_divided: &[T; 3], bary: &Vector3<f32>, w: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    (pre_divided[0] * bary.x + pre_divided[1] * bary.y + pre_divided[2] * bary.z) * w
}
