use crate::core::color::ColorRGB;
use crate::core::geometry::OutputVertex;
use crate::core::pipeline::FragmentShader;
use crate::scene::light::LightingData;
use crate::scene::material::Material;
use nalgebra::{Matrix3, Vector3};
use std::f32::consts::PI;
use std::str::FromStr;

/// Which term of the lighting equation ends up in the color buffer.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum ShadingMode {
    /// Lambert cosine only, as gray.
    ObservedArea,
    Diffuse,
    Specular,
    #[default]
    Combined,
}

impl ShadingMode {
    const CYCLE: [ShadingMode; 4] = [
        ShadingMode::ObservedArea,
        ShadingMode::Diffuse,
        ShadingMode::Specular,
        ShadingMode::Combined,
    ];

    /// ObservedArea -> Diffuse -> Specular -> Combined -> ObservedArea.
    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|&m| m == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }
}

impl FromStr for ShadingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "observed_area" => Ok(ShadingMode::ObservedArea),
            "diffuse" => Ok(ShadingMode::Diffuse),
            "specular" => Ok(ShadingMode::Specular),
            "combined" => Ok(ShadingMode::Combined),
            other => Err(format!(
                "Unknown shading mode '{}' (observed_area, diffuse, specular, combined)",
                other
            )),
        }
    }
}

/// Phong shading for one directional light, with optional tangent-space
/// normal mapping.
#[derive(Debug, Clone)]
pub struct PhongShader {
    pub lighting: LightingData,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
}

impl Default for PhongShader {
    fn default() -> Self {
        Self::new(LightingData::default())
    }
}

impl PhongShader {
    pub fn new(lighting: LightingData) -> Self {
        Self {
            lighting,
            shading_mode: ShadingMode::Combined,
            use_normal_map: true,
        }
    }

    pub fn cycle_shading_mode(&mut self) -> ShadingMode {
        self.shading_mode = self.shading_mode.next();
        self.shading_mode
    }

    pub fn toggle_normal_map(&mut self) -> bool {
        self.use_normal_map = !self.use_normal_map;
        self.use_normal_map
    }

    /// Surface normal for lighting. The sampled normal is only used when the
    /// material actually has a normal map wired.
    fn shading_normal(&self, fragment: &OutputVertex, material: &Material) -> Vector3<f32> {
        if !self.use_normal_map || material.normal.is_none() {
            return fragment.normal;
        }

        let normal = fragment.normal;
        let tangent = fragment.tangent;
        let bitangent = normal.cross(&tangent);
        let tbn = Matrix3::from_columns(&[tangent, bitangent, normal]);

        let sampled = material.sample_normal(&fragment.uv);
        let tangent_space = sampled * 2.0 - Vector3::repeat(1.0);

        (tbn * tangent_space).normalize()
    }
}

/// Reflects `v` about the plane perpendicular to `n`.
#[inline]
fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    v - n * (2.0 * v.dot(n))
}

impl FragmentShader for PhongShader {
    fn fragment(&self, fragment: &OutputVertex, material: &Material) -> ColorRGB {
        let uv = &fragment.uv;
        let diffuse_sample = material.sample_diffuse(uv);
        let specular_sample = material.sample_specular(uv);
        let gloss_sample = material.sample_gloss(uv);

        let normal = self.shading_normal(fragment, material);
        let to_light = self.lighting.direction_to_light();

        let observed_area = normal.dot(&to_light).max(0.0);

        let diffuse = diffuse_sample * (self.lighting.intensity / PI);

        let exponent = gloss_sample.x * self.lighting.shininess;
        let phong = reflect(&to_light, &normal)
            .dot(&fragment.view_direction)
            .max(0.0)
            .powf(exponent);
        let specular = specular_sample * phong;

        match self.shading_mode {
            ShadingMode::ObservedArea => Vector3::repeat(observed_area),
            ShadingMode::Diffuse => diffuse * observed_area,
            ShadingMode::Specular => specular,
            ShadingMode::Combined => diffuse * observed_area + specular + self.lighting.ambient,
        }
    }
}
