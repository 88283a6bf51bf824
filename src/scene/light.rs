use nalgebra::Vector3;

/// Lighting parameters for the single directional light of the scene.
#[derive(Debug, Clone)]
pub struct LightingData {
    /// Added unconditionally in the combined shading mode.
    pub ambient: Vector3<f32>,
    pub intensity: f32,
    /// Multiplied by the gloss sample to get the specular exponent.
    pub shininess: f32,
    /// Direction the light travels, world space.
    pub direction: Vector3<f32>,
}

impl Default for LightingData {
    fn default() -> Self {
        Self {
            ambient: Vector3::new(0.025, 0.025, 0.025),
            intensity: 7.0,
            shininess: 25.0,
            direction: Vector3::new(0.577, -0.577, 0.577),
        }
    }
}

impl LightingData {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
            ..Default::default()
        }
    }

    /// Direction from a surface point towards the light.
    #[inline]
    pub fn direction_to_light(&self) -> Vector3<f32> {
        -self.direction
    }
}
