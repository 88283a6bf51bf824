use nalgebra::{Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by the pipeline.
///
/// Matrices follow nalgebra's column-vector convention (`M * v`), in a
/// left-handed coordinate system: +X right, +Y up, the camera looks down +Z and
/// projected depth lands in `[0, 1]`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Euler rotation: pitch (X) is applied first, then yaw (Y), then roll (Z).
    pub fn rotation(pitch: f32, yaw: f32, roll: f32) -> Matrix4<f32> {
        Self::rotation_z(roll) * Self::rotation_y(yaw) * Self::rotation_x(pitch)
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Creates a View matrix (Look-At, Left-Handed).
    ///
    /// `forward` is the viewing direction, not a target point. It must not be
    /// parallel to `up`, otherwise the basis degenerates and the matrix is not
    /// invertible.
    pub fn look_at(
        origin: &Point3<f32>,
        forward: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let z_axis = forward.normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);
        let o = origin.coords;

        Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(&o),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(&o),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(&o),
            0.0,      0.0,      0.0,      1.0,
        )
    }

    /// Creates a Perspective Projection matrix (Left-Handed, depth in [0, 1]).
    ///
    /// The resulting clip `w` equals the view-space depth, so it is never zero for
    /// geometry in front of the near plane.
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        let y_scale = 1.0 / (fov_y_rad / 2.0).tan();
        let x_scale = y_scale / aspect_ratio;
        let q = far / (far - near);

        Matrix4::new(
            x_scale, 0.0,     0.0, 0.0,
            0.0,     y_scale, 0.0, 0.0,
            0.0,     0.0,     q,   -q * near,
            0.0,     0.0,     1.0, 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Transforms a point (w = 1) into homogeneous coordinates without dividing by w.
#[inline]
pub fn transform_point_homogeneous(m: &Matrix4<f32>, p: &Point3<f32>) -> Vector4<f32> {
    m * p.to_homogeneous()
}

/// Transforms a point, translation included.
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let h = transform_point_homogeneous(m, p);
    Point3::new(h.x, h.y, h.z)
}

/// Transforms a direction. Translation is ignored.
#[inline]
pub fn transform_vector(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    m.fixed_view::<3, 3>(0, 0) * v
}

/// Performs perspective division: Clip Space -> NDC.
/// The caller guarantees `w != 0`.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let inv_w = 1.0 / clip.w;
    Point3::new(clip.x * inv_w, clip.y * inv_w, clip.z * inv_w)
}

/// Converts NDC x/y to pixel coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, half_width: f32, half_height: f32) -> (f32, f32) {
    ((ndc_x + 1.0) * half_width, (1.0 - ndc_y) * half_height)
}

/// Maps `value` from `[min, max]` to `[0, 1]`, clamped.
#[inline]
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}
