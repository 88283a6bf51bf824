use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            objects: default_objects(),
        }
    }
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![ObjectConfig {
        path: "resources/vehicle.obj".to_string(),
        position: [0.0, 0.0, 50.0],
        rotation: [0.0, 0.0, 0.0],
        scale: default_scale(),
        visible: true,
        diffuse_texture: Some("resources/vehicle_diffuse.png".to_string()),
        normal_texture: Some("resources/vehicle_normal.png".to_string()),
        gloss_texture: Some("resources/vehicle_gloss.png".to_string()),
        specular_texture: Some("resources/vehicle_specular.png".to_string()),
    }]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,

    // --- Pipeline & Debug ---
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default = "default_shading_mode")]
    pub shading_mode: String, // "observed_area", "diffuse", "specular", "combined"
    #[serde(default = "default_true")]
    pub normal_map: bool,
    #[serde(default)]
    pub depth_buffer: bool,
    #[serde(default)]
    pub bounding_box: bool,
    #[serde(default)]
    pub uniform_clear_color: bool,

    // --- Animation ---
    #[serde(default = "default_true")]
    pub rotate: bool,
    /// Degrees per second.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            cull_mode: default_cull_mode(),
            shading_mode: default_shading_mode(),
            normal_map: true,
            depth_buffer: false,
            bounding_box: false,
            uniform_clear_color: false,
            rotate: true,
            rotation_speed: default_rotation_speed(),
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "Rasterizer_ColorBuffer.bmp".to_string()
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_shading_mode() -> String {
    "combined".to_string()
}
fn default_true() -> bool {
    true
}
fn default_rotation_speed() -> f32 {
    45.0
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees.
    #[serde(default)]
    pub pitch: f32,
    /// Degrees.
    #[serde(default)]
    pub yaw: f32,
    #[serde(default = "default_fov")]
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            pitch: 0.0,
            yaw: 0.0,
            fov: default_fov(),
        }
    }
}

fn default_fov() -> f32 {
    45.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            shininess: default_shininess(),
            ambient: default_ambient(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_shininess() -> f32 {
    25.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    pub path: String,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees (pitch, yaw, roll).
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default = "default_true")]
    pub visible: bool,

    // --- Material Textures ---
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub gloss_texture: Option<String>,
    pub specular_texture: Option<String>,
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
