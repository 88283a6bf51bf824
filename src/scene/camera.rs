use crate::core::math::transform::{TransformFactory, transform_vector};
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
/// Keeps the forward vector away from the world up axis.
const MAX_PITCH_RAD: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// A left-handed perspective camera oriented by pitch and yaw.
///
/// With zero pitch and yaw it looks down +Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3<f32>,
    /// Rotation about X, radians.
    pitch: f32,
    /// Rotation about Y, radians.
    yaw: f32,
    fov_y_rad: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    inv_view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_degrees: f32, aspect_ratio: f32) -> Self {
        let mut cam = Self {
            origin,
            pitch: 0.0,
            yaw: 0.0,
            fov_y_rad: fov_degrees.to_radians(),
            aspect_ratio,
            near: NEAR,
            far: FAR,
            view_matrix: Matrix4::identity(),
            inv_view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_view();
        cam.update_projection();
        cam
    }

    /// Angles in radians. Pitch is clamped just short of straight up/down.
    pub fn set_orientation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        self.yaw = yaw;
        self.update_view();
    }

    pub fn set_position(&mut self, origin: Point3<f32>) {
        self.origin = origin;
        self.update_view();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_projection();
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_y_rad = fov_degrees.to_radians();
        self.update_projection();
    }

    /// Unit viewing direction in world space.
    pub fn forward(&self) -> Vector3<f32> {
        let rotation = TransformFactory::rotation(self.pitch, self.yaw, 0.0);
        transform_vector(&rotation, &Vector3::z()).normalize()
    }

    fn update_view(&mut self) {
        self.view_matrix = TransformFactory::look_at(&self.origin, &self.forward(), &Vector3::y());
        self.inv_view_matrix = self.view_matrix.try_inverse().unwrap_or_else(|| {
            warn!("Camera view matrix is not invertible; using identity");
            Matrix4::identity()
        });
    }

    fn update_projection(&mut self) {
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov_y_rad, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    /// Camera-to-world transform. Its translation column is the camera origin.
    pub fn inv_view_matrix(&self) -> Matrix4<f32> {
        self.inv_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// Projection after view, ready to be combined with a world matrix.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }

    pub fn position(&self) -> Point3<f32> {
        self.origin
    }
}
