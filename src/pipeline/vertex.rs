use crate::core::math::transform::{
    apply_perspective_division, ndc_to_screen, transform_point, transform_point_homogeneous,
    transform_vector,
};
use crate::scene::mesh::Mesh;
use nalgebra::{Point3, Vector4};

/// Runs the fixed-function vertex stage for one mesh.
///
/// Every input vertex is projected with `view_projection * world`, divided by
/// its clip `w` (which is kept in `position.w`) and mapped to pixel
/// coordinates. Normal and tangent go to world space through the world matrix
/// only; `view_direction` is the unnormalized camera-to-vertex vector.
///
/// Writes into the mesh's preallocated output buffer.
pub fn transform_vertices(
    mesh: &mut Mesh,
    camera_position: &Point3<f32>,
    width: usize,
    height: usize,
) {
    let world = *mesh.world_matrix();
    let world_view_proj = mesh.view_projection() * world;
    let half_width = width as f32 * 0.5;
    let half_height = height as f32 * 0.5;

    let (inputs, outputs) = mesh.vertex_buffers_mut();
    for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
        let clip = transform_point_homogeneous(&world_view_proj, &input.position);
        let ndc = apply_perspective_division(&clip);
        let (screen_x, screen_y) = ndc_to_screen(ndc.x, ndc.y, half_width, half_height);

        let world_position = transform_point(&world, &input.position);

        output.position = Vector4::new(screen_x, screen_y, ndc.z, clip.w);
        output.normal = transform_vector(&world, &input.normal);
        output.tangent = transform_vector(&world, &input.tangent);
        output.uv = input.uv;
        output.color = input.color;
        output.view_direction = world_position - camera_position;
    }
}
