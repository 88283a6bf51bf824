use crate::core::geometry::{InputVertex, OutputVertex, PrimitiveTopology};
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use crate::scene::texture::Texture;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::fmt;
use std::sync::Arc;

/// Reasons a vertex/index buffer pair cannot form a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    IndexOutOfBounds {
        index: u32,
        vertex_count: usize,
    },
    InvalidIndexCount {
        count: usize,
        topology: PrimitiveTopology,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::IndexOutOfBounds {
                index,
                vertex_count,
            } => write!(
                f,
                "Index {} out of bounds for {} vertices",
                index, vertex_count
            ),
            MeshError::InvalidIndexCount { count, topology } => {
                write!(f, "{} indices do not form a {:?}", count, topology)
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// A drawable object: immutable input geometry, the per-frame transformed
/// copy, its transform state and its textures.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<InputVertex>,
    /// Same length and order as `vertices`; rewritten by the vertex stage.
    vertices_out: Vec<OutputVertex>,
    indices: Vec<u32>,
    topology: PrimitiveTopology,

    world_matrix: Matrix4<f32>,
    /// Camera view * projection, refreshed before each frame.
    view_projection: Matrix4<f32>,

    material: Material,
    visible: bool,
}

impl Mesh {
    /// Builds a mesh after checking that every index addresses a vertex and
    /// that the index count fits the topology.
    pub fn new(
        vertices: Vec<InputVertex>,
        indices: Vec<u32>,
        topology: PrimitiveTopology,
    ) -> Result<Self, MeshError> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                vertex_count: vertices.len(),
            });
        }

        let count = indices.len();
        let count_ok = match topology {
            PrimitiveTopology::TriangleList => count % 3 == 0,
            PrimitiveTopology::TriangleStrip => count == 0 || count >= 3,
        };
        if !count_ok {
            return Err(MeshError::InvalidIndexCount { count, topology });
        }

        let vertices_out = vertices.iter().map(OutputVertex::from).collect();

        Ok(Self {
            vertices,
            vertices_out,
            indices,
            topology,
            world_matrix: Matrix4::identity(),
            view_projection: Matrix4::identity(),
            material: Material::default(),
            visible: true,
        })
    }

    /// A single triangle in the XY plane facing -Z, clockwise on screen when
    /// viewed from a camera looking down +Z.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            // Top
            InputVertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 0.0)),
            // Bottom right
            InputVertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 1.0)),
            // Bottom left
            InputVertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 1.0)),
        ];

        Self {
            vertices_out: vertices.iter().map(OutputVertex::from).collect(),
            vertices,
            indices: vec![0, 1, 2],
            topology: PrimitiveTopology::TriangleList,
            world_matrix: Matrix4::identity(),
            view_projection: Matrix4::identity(),
            material: Material::default(),
            visible: true,
        }
    }

    pub fn vertices(&self) -> &[InputVertex] {
        &self.vertices
    }

    pub fn output_vertices(&self) -> &[OutputVertex] {
        &self.vertices_out
    }

    /// Input vertices alongside the writable output buffer.
    pub fn vertex_buffers_mut(&mut self) -> (&[InputVertex], &mut [OutputVertex]) {
        (&self.vertices, &mut self.vertices_out)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    // --- Transform ---

    /// Rotates about the mesh's local Y axis (applied before the existing
    /// world transform).
    pub fn rotate_y(&mut self, degrees: f32) {
        self.world_matrix *= TransformFactory::rotation_y(degrees.to_radians());
    }

    /// Replaces the world matrix with a pure translation.
    pub fn set_position(&mut self, position: &Point3<f32>) {
        self.world_matrix = TransformFactory::translation(&position.coords);
    }

    pub fn set_world_matrix(&mut self, world: Matrix4<f32>) {
        self.world_matrix = world;
    }

    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world_matrix
    }

    pub fn set_view_projection(&mut self, view_projection: Matrix4<f32>) {
        self.view_projection = view_projection;
    }

    pub fn view_projection(&self) -> &Matrix4<f32> {
        &self.view_projection
    }

    // --- Material ---

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn set_diffuse(&mut self, texture: Arc<Texture>) {
        self.material.diffuse = Some(texture);
    }

    pub fn set_normal(&mut self, texture: Arc<Texture>) {
        self.material.normal = Some(texture);
    }

    pub fn set_gloss(&mut self, texture: Arc<Texture>) {
        self.material.gloss = Some(texture);
    }

    pub fn set_specular(&mut self, texture: Arc<Texture>) {
        self.material.specular = Some(texture);
    }

    // --- Visibility ---

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;

    fn quad_vertices() -> Vec<InputVertex> {
        (0..4).map(|_| InputVertex::default()).collect()
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new(quad_vertices(), vec![0, 1, 4], PrimitiveTopology::TriangleList)
            .unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfBounds {
                index: 4,
                vertex_count: 4
            }
        );
        assert_eq!(err.to_string(), "Index 4 out of bounds for 4 vertices");
    }

    #[test]
    fn rejects_bad_index_counts() {
        let list = Mesh::new(quad_vertices(), vec![0, 1, 2, 3], PrimitiveTopology::TriangleList);
        assert!(matches!(
            list,
            Err(MeshError::InvalidIndexCount { count: 4, .. })
        ));

        let strip = Mesh::new(quad_vertices(), vec![0, 1], PrimitiveTopology::TriangleStrip);
        assert!(matches!(
            strip,
            Err(MeshError::InvalidIndexCount { count: 2, .. })
        ));

        assert!(Mesh::new(quad_vertices(), vec![], PrimitiveTopology::TriangleStrip).is_ok());
        let quad_strip = Mesh::new(
            quad_vertices(),
            vec![0, 1, 2, 3],
            PrimitiveTopology::TriangleStrip,
        );
        assert!(quad_strip.is_ok());
    }

    #[test]
    fn output_buffer_matches_inputs() {
        let mesh =
            Mesh::new(quad_vertices(), vec![0, 1, 2], PrimitiveTopology::TriangleList).unwrap();
        assert_eq!(mesh.output_vertices().len(), mesh.vertices().len());
    }

    #[test]
    fn rotation_is_about_local_origin() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_position(&Point3::new(0.0, 0.0, 50.0));
        mesh.rotate_y(90.0);

        // The local origin stays put; a local +X point swings around it.
        let origin = transform_point(mesh.world_matrix(), &Point3::origin());
        assert!((origin - Point3::new(0.0, 0.0, 50.0)).norm() < 1e-4);

        let tip = transform_point(mesh.world_matrix(), &Point3::new(1.0, 0.0, 0.0));
        assert!((tip.z - 50.0).abs() > 0.99);
        assert!(tip.x.abs() < 1e-4);
    }

    #[test]
    fn visibility_toggles() {
        let mut mesh = Mesh::create_test_triangle();
        assert!(mesh.is_visible());
        assert!(!mesh.toggle_visibility());
        assert!(!mesh.is_visible());
        assert!(mesh.toggle_visibility());
    }

    #[test]
    fn slot_setters_wire_textures() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_diffuse(Arc::new(Texture::solid([1, 2, 3])));
        assert!(mesh.material().diffuse.is_some());
        assert!(mesh.material().normal.is_none());

        mesh.set_normal(Arc::new(Texture::solid([128, 128, 255])));
        mesh.set_gloss(Arc::new(Texture::solid([255, 0, 0])));
        mesh.set_specular(Arc::new(Texture::solid([0, 255, 0])));

        let uv = Vector2::new(0.5, 0.5);
        let material = mesh.material();
        assert!(material.sample_normal(&uv).z > 0.99);
        assert!((material.sample_gloss(&uv).x - 1.0).abs() < 1e-6);
        assert!((material.sample_specular(&uv).y - 1.0).abs() < 1e-6);
        assert!(material.sample_specular(&uv).x.abs() < 1e-6);
    }
}
