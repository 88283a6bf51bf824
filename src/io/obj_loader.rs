use crate::core::geometry::{InputVertex, PrimitiveTopology};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file as a single triangle-list mesh.
///
/// The file is read as right-handed and converted to the renderer's
/// left-handed space: z is negated and every triangle's winding reversed.
/// UV v is flipped so (0, 0) is the top-left texel, and per-vertex tangents
/// are derived from the UV layout.
///
/// # Arguments
/// * `path` - The file path to the .obj file.
///
/// # Returns
/// * `Result<Mesh, String>` - The loaded mesh or an error message.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, String> {
    let path_obj = path.as_ref();
    if !path_obj.exists() {
        return Err(format!("File not found: {}", path_obj.display()));
    }

    info!("Loading OBJ file: {}", path_obj.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path_obj, &load_options)
        .map_err(|e| format!("Failed to load OBJ: {}", e))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0;

    // All sub-models are merged into one mesh.
    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };

            let uv = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(InputVertex::new(position, normal, uv));
        }

        // Winding is reversed here; z is flipped after tangents are known.
        for tri in mesh.indices.chunks_exact(3) {
            indices.extend_from_slice(&[
                tri[0] + index_offset,
                tri[2] + index_offset,
                tri[1] + index_offset,
            ]);
        }

        index_offset += num_vertices as u32;
    }

    compute_tangents(&mut vertices, &indices);
    flip_handedness(&mut vertices);

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Mesh::new(vertices, indices, PrimitiveTopology::TriangleList)
        .map_err(|e| format!("Invalid OBJ geometry in {}: {}", path_obj.display(), e))
}

/// Accumulates a UV-aligned tangent per triangle onto its vertices, then
/// makes each tangent orthogonal to its normal and unit length.
///
/// Triangles whose UVs are degenerate contribute nothing. A vertex left
/// without a usable tangent keeps a zero tangent.
pub fn compute_tangents(vertices: &mut [InputVertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (v0, v1, v2) = (&vertices[i0], &vertices[i1], &vertices[i2]);

        let edge0 = v1.position - v0.position;
        let edge1 = v2.position - v0.position;
        let diff_x = Vector2::new(v1.uv.x - v0.uv.x, v2.uv.x - v0.uv.x);
        let diff_y = Vector2::new(v1.uv.y - v0.uv.y, v2.uv.y - v0.uv.y);

        let uv_area = diff_x.x * diff_y.y - diff_x.y * diff_y.x;
        if uv_area.abs() <= f32::EPSILON {
            continue;
        }

        let tangent = (edge0 * diff_y.y - edge1 * diff_y.x) / uv_area;
        for i in [i0, i1, i2] {
            vertices[i].tangent += tangent;
        }
    }

    for v in vertices.iter_mut() {
        let n_len_sq = v.normal.norm_squared();
        let rejected = if n_len_sq > 0.0 {
            v.tangent - v.normal * (v.tangent.dot(&v.normal) / n_len_sq)
        } else {
            v.tangent
        };
        v.tangent = rejected.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
    }
}

/// Mirrors positions, normals and tangents along z.
fn flip_handedness(vertices: &mut [InputVertex]) {
    for v in vertices.iter_mut() {
        v.position.z = -v.position.z;
        v.normal.z = -v.normal.z;
        v.tangent.z = -v.tangent.z;
    }
}
