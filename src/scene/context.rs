use crate::scene::camera::Camera;
use crate::scene::light::LightingData;
use crate::scene::mesh::Mesh;

/// Default spin of every mesh, degrees per second.
pub const DEFAULT_ROTATION_SPEED: f32 = 45.0;

/// Holds all scene resources required for rendering.
///
/// Meshes are drawn in the order they appear in `meshes`.
pub struct RenderContext {
    pub camera: Camera,
    pub lighting: LightingData,
    pub meshes: Vec<Mesh>,
    pub rotate_meshes: bool,
    /// Degrees per second.
    pub rotation_speed: f32,
}

impl RenderContext {
    pub fn new(camera: Camera, lighting: LightingData, meshes: Vec<Mesh>) -> Self {
        Self {
            camera,
            lighting,
            meshes,
            rotate_meshes: true,
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }

    /// Advances the scene by `elapsed` seconds and hands the current camera
    /// matrices to every mesh.
    pub fn update(&mut self, elapsed: f32) {
        let angle = self.rotation_speed * elapsed;
        let view_projection = self.camera.view_projection();

        for mesh in &mut self.meshes {
            if self.rotate_meshes {
                mesh.rotate_y(angle);
            }
            mesh.set_view_projection(view_projection);
        }
    }

    pub fn toggle_rotation(&mut self) -> bool {
        self.rotate_meshes = !self.rotate_meshes;
        self.rotate_meshes
    }
}
