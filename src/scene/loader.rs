use crate::core::math::transform::TransformFactory;
use crate::io::config::{Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::light::LightingData;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::HashMap;
use std::sync::Arc;

/// Decoded textures keyed by path, so meshes sharing an image share one copy.
type TextureCache = HashMap<String, Arc<Texture>>;

pub fn build_lighting_from_config(config: &Config) -> LightingData {
    let light = &config.light;
    LightingData {
        ambient: Vector3::from(light.ambient),
        intensity: light.intensity,
        shininess: light.shininess,
        direction: Vector3::from(light.direction),
    }
}

pub fn build_camera_from_config(config: &Config) -> Camera {
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;
    let mut camera = Camera::new(
        Point3::from(config.camera.position),
        config.camera.fov,
        aspect_ratio,
    );
    camera.set_orientation(
        config.camera.pitch.to_radians(),
        config.camera.yaw.to_radians(),
    );
    camera
}

/// World matrix for an object: scale, then rotate (X, Y, Z), then translate.
pub fn object_world_matrix(obj_conf: &ObjectConfig) -> Matrix4<f32> {
    let translation = TransformFactory::translation(&Vector3::from(obj_conf.position));
    let rotation = TransformFactory::rotation_x(obj_conf.rotation[0].to_radians())
        * TransformFactory::rotation_y(obj_conf.rotation[1].to_radians())
        * TransformFactory::rotation_z(obj_conf.rotation[2].to_radians());
    let scale = TransformFactory::scaling_nonuniform(&Vector3::from(obj_conf.scale));
    translation * rotation * scale
}

fn load_texture_cached(path: &Option<String>, cache: &mut TextureCache) -> Option<Arc<Texture>> {
    let path = path.as_ref()?;
    if let Some(texture) = cache.get(path) {
        return Some(Arc::clone(texture));
    }

    match Texture::load(path) {
        Ok(texture) => {
            let texture = Arc::new(texture);
            cache.insert(path.clone(), Arc::clone(&texture));
            Some(texture)
        }
        Err(e) => {
            warn!("Texture '{}' unavailable ({}); slot left empty.", path, e);
            None
        }
    }
}

fn build_material(obj_conf: &ObjectConfig, cache: &mut TextureCache) -> Material {
    Material {
        diffuse: load_texture_cached(&obj_conf.diffuse_texture, cache),
        normal: load_texture_cached(&obj_conf.normal_texture, cache),
        gloss: load_texture_cached(&obj_conf.gloss_texture, cache),
        specular: load_texture_cached(&obj_conf.specular_texture, cache),
    }
}

/// Initial resource loading (Heavy I/O). Returns a RenderContext.
///
/// Never fails: a mesh that cannot be loaded is replaced by the test triangle
/// and a missing texture leaves its slot empty.
pub fn init_scene_resources(config: &Config) -> RenderContext {
    // 1. Camera
    let camera = build_camera_from_config(config);

    // 2. Light
    let lighting = build_lighting_from_config(config);

    // 3. Meshes
    let mut cache = TextureCache::new();
    let mut meshes = Vec::with_capacity(config.objects.len());

    for obj_conf in &config.objects {
        let mut mesh = match load_obj(&obj_conf.path) {
            Ok(m) => m,
            Err(e) => {
                error!(
                    "Error loading model '{}': {}. Using fallback mesh.",
                    obj_conf.path, e
                );
                Mesh::create_test_triangle()
            }
        };

        mesh.set_world_matrix(object_world_matrix(obj_conf));
        mesh.set_material(build_material(obj_conf, &mut cache));
        if !obj_conf.visible {
            mesh.toggle_visibility();
        }

        info!(
            "Mesh '{}': {} vertices, {} indices",
            obj_conf.path,
            mesh.vertices().len(),
            mesh.indices().len()
        );
        meshes.push(mesh);
    }

    if meshes.is_empty() {
        warn!("No objects configured; the frame will only show the clear color.");
    }

    let mut context = RenderContext::new(camera, lighting, meshes);
    context.rotate_meshes = config.render.rotate;
    context.rotation_speed = config.render.rotation_speed;
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;

    fn missing_object() -> ObjectConfig {
        ObjectConfig {
            path: "missing/model.obj".to_string(),
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [2.0, 2.0, 2.0],
            visible: false,
            diffuse_texture: Some("missing/diffuse.png".to_string()),
            normal_texture: None,
            gloss_texture: None,
            specular_texture: None,
        }
    }

    #[test]
    fn missing_assets_fall_back() {
        let config = Config {
            objects: vec![missing_object()],
            ..Default::default()
        };
        let ctx = init_scene_resources(&config);

        assert_eq!(ctx.meshes.len(), 1);
        let mesh = &ctx.meshes[0];
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert!(mesh.material().diffuse.is_none());
        assert!(!mesh.is_visible());
    }

    #[test]
    fn world_matrix_scales_then_translates() {
        let world = object_world_matrix(&missing_object());
        let p = transform_point(&world, &Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(3.0, 2.0, 3.0)).norm() < 1e-5);
    }

    #[test]
    fn camera_and_light_follow_config() {
        let mut config = Config::default();
        config.camera.position = [0.0, 1.0, -5.0];
        config.light.intensity = 3.0;
        config.render.rotate = false;
        config.objects.clear();

        let ctx = init_scene_resources(&config);
        assert_eq!(ctx.camera.position(), Point3::new(0.0, 1.0, -5.0));
        assert_eq!(ctx.lighting.intensity, 3.0);
        assert!(!ctx.rotate_meshes);
        assert!(ctx.meshes.is_empty());
    }
}
