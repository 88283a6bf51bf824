use crate::core::color::{max_to_one, pack_rgb, white};
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{OutputVertex, PrimitiveTopology, assemble_triangles};
use crate::core::math::interpolation::{
    barycentric_weights, edge_function, interpolate_reciprocal, is_inside_triangle,
    perspective_interpolate,
};
use crate::core::math::transform::remap;
use crate::core::pipeline::FragmentShader;
use crate::scene::material::Material;
use nalgebra::{Point2, Vector4};
use std::str::FromStr;

/// Depth range stretched over the full gray ramp by the depth visualization.
const DEPTH_VIEW_RANGE: (f32, f32) = (0.997, 1.0);

/// The Rasterizer is responsible for drawing triangles onto the FrameBuffer.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    pub cull_mode: CullMode,
    /// Fill each triangle's screen bounding box with white instead of shading.
    pub render_bounding_box: bool,
    /// Write remapped depth as gray instead of shading.
    pub render_depth_buffer: bool,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

impl CullMode {
    const CYCLE: [CullMode; 3] = [CullMode::Back, CullMode::Front, CullMode::None];

    /// Back -> Front -> None -> Back.
    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|&m| m == self).unwrap_or(0);
        Self::CYCLE[(idx + 1) % Self::CYCLE.len()]
    }
}

impl FromStr for CullMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "back" => Ok(CullMode::Back),
            "front" => Ok(CullMode::Front),
            "none" => Ok(CullMode::None),
            other => Err(format!("Unknown cull mode '{}' (back, front, none)", other)),
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
            render_bounding_box: false,
            render_depth_buffer: false,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Draws every triangle of an indexed vertex buffer, in index order.
    ///
    /// `indices` must have been validated against `vertices` (see `Mesh::new`).
    pub fn draw_indexed<S: FragmentShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        vertices: &[OutputVertex],
        indices: &[u32],
        topology: PrimitiveTopology,
        material: &Material,
    ) {
        for [i0, i1, i2] in assemble_triangles(indices, topology) {
            self.rasterize_triangle(
                framebuffer,
                shader,
                [
                    &vertices[i0 as usize],
                    &vertices[i1 as usize],
                    &vertices[i2 as usize],
                ],
                material,
            );
        }
    }

    /// Rasterizes one screen-space triangle.
    ///
    /// There is no clipping: a triangle with any vertex outside the viewport or
    /// the `[0, 1]` depth range is dropped as a whole.
    pub fn rasterize_triangle<S: FragmentShader>(
        &self,
        framebuffer: &mut FrameBuffer,
        shader: &S,
        vertices: [&OutputVertex; 3],
        material: &Material,
    ) {
        let width = framebuffer.width as f32;
        let height = framebuffer.height as f32;
        if framebuffer.width == 0 || framebuffer.height == 0 {
            return;
        }

        // 1. View volume rejection
        if vertices
            .iter()
            .any(|v| is_outside_view(&v.position, width, height))
        {
            return;
        }

        let screen = vertices.map(|v| Point2::new(v.position.x, v.position.y));

        // 2. Signed area & culling
        let area = edge_function(&screen[0], &screen[1], &screen[2]);
        if area == 0.0 {
            return;
        }

        let is_back_facing = area <= f32::EPSILON;
        match self.cull_mode {
            CullMode::Back if is_back_facing => return,
            CullMode::Front if !is_back_facing => return,
            _ => {}
        }

        let inv_area = 1.0 / area;

        // 3. Per-triangle setup: reciprocals and w-divided varyings
        let inv_z = vertices.map(|v| 1.0 / v.position.z);
        let inv_w = vertices.map(|v| 1.0 / v.position.w);
        let uvs = [0, 1, 2].map(|i| vertices[i].uv * inv_w[i]);
        let colors = [0, 1, 2].map(|i| vertices[i].color * inv_w[i]);
        let normals = [0, 1, 2].map(|i| vertices[i].normal * inv_w[i]);
        let tangents = [0, 1, 2].map(|i| vertices[i].tangent * inv_w[i]);
        let views = [0, 1, 2].map(|i| vertices[i].view_direction * inv_w[i]);

        // 4. Bounding box
        let (min_x, min_y, max_x, max_y) = compute_bounding_box(&screen, width, height);

        // 5. Pixel loop
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                if self.render_bounding_box {
                    framebuffer.set_pixel(px, py, pack_rgb(&white()));
                    continue;
                }

                let pixel = Point2::new(px as f32 + 0.5, py as f32 + 0.5);
                let bary =
                    barycentric_weights(&pixel, &screen[0], &screen[1], &screen[2], inv_area);
                if !is_inside_triangle(&bary) {
                    continue;
                }

                // Depth: 1/z is affine in screen space.
                let z = interpolate_reciprocal(&bary, &inv_z);
                if !framebuffer.depth_test_and_update(px, py, z) {
                    continue;
                }

                let color = if self.render_depth_buffer {
                    white() * remap(z, DEPTH_VIEW_RANGE.0, DEPTH_VIEW_RANGE.1)
                } else {
                    let w = interpolate_reciprocal(&bary, &inv_w);
                    let fragment = OutputVertex {
                        position: Vector4::new(pixel.x, pixel.y, z, w),
                        normal: perspective_interpolate(&normals, &bary, w).normalize(),
                        tangent: perspective_interpolate(&tangents, &bary, w).normalize(),
                        uv: perspective_interpolate(&uvs, &bary, w),
                        color: perspective_interpolate(&colors, &bary, w),
                        view_direction: perspective_interpolate(&views, &bary, w).normalize(),
                    };
                    shader.fragment(&fragment, material)
                };

                framebuffer.set_pixel(px, py, pack_rgb(&max_to_one(color)));
            }
        }
    }
}

/// Non-finite coordinates count as outside.
#[inline]
fn is_outside_view(position: &Vector4<f32>, width: f32, height: f32) -> bool {
    !(0.0..=width).contains(&position.x)
        || !(0.0..=height).contains(&position.y)
        || !(0.0..=1.0).contains(&position.z)
}

/// Inclusive pixel bounds, clamped to the framebuffer.
fn compute_bounding_box(
    points: &[Point2<f32>; 3],
    width: f32,
    height: f32,
) -> (usize, usize, usize, usize) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).max(0.0).floor();
    let min_y = points[0].y.min(points[1].y).min(points[2].y).max(0.0).floor();
    let max_x = points[0].x.max(points[1].x).max(points[2].x).min(width - 1.0).ceil();
    let max_y = points[0].y.max(points[1].y).max(points[2].y).min(height - 1.0).ceil();
    (min_x as usize, min_y as usize, max_x as usize, max_y as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorRGB;
    use nalgebra::{Vector2, Vector3};
    use std::cell::RefCell;

    /// Returns the interpolated vertex color and counts invocations per pixel.
    struct RecordingShader {
        width: usize,
        hits: RefCell<Vec<u32>>,
    }

    impl RecordingShader {
        fn new(width: usize, height: usize) -> Self {
            Self {
                width,
                hits: RefCell::new(vec![0; width * height]),
            }
        }

        fn total(&self) -> u32 {
            self.hits.borrow().iter().sum()
        }
    }

    impl FragmentShader for RecordingShader {
        fn fragment(&self, fragment: &OutputVertex, _material: &Material) -> ColorRGB {
            let x = fragment.position.x as usize;
            let y = fragment.position.y as usize;
            self.hits.borrow_mut()[y * self.width + x] += 1;
            fragment.color
        }
    }

    fn vertex(x: f32, y: f32, z: f32, w: f32) -> OutputVertex {
        OutputVertex {
            position: Vector4::new(x, y, z, w),
            normal: Vector3::new(0.0, 0.0, -1.0),
            tangent: Vector3::new(1.0, 0.0, 0.0),
            uv: Vector2::zeros(),
            color: Vector3::new(0.25, 0.5, 0.75),
            view_direction: Vector3::z(),
        }
    }

    fn front_facing() -> [OutputVertex; 3] {
        [
            vertex(0.3, 0.6, 0.5, 1.0),
            vertex(7.7, 1.3, 0.5, 1.0),
            vertex(2.2, 7.4, 0.5, 1.0),
        ]
    }

    fn draw(
        rasterizer: &Rasterizer,
        fb: &mut FrameBuffer,
        shader: &RecordingShader,
        tri: &[OutputVertex; 3],
    ) {
        let material = Material::default();
        rasterizer.rasterize_triangle(fb, shader, [&tri[0], &tri[1], &tri[2]], &material);
    }

    #[test]
    fn covers_exactly_the_pixels_inside_all_edges() {
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        let rasterizer = Rasterizer {
            cull_mode: CullMode::None,
            ..Rasterizer::new()
        };
        let tri = front_facing();
        draw(&rasterizer, &mut fb, &shader, &tri);

        let pts = tri.map(|v| Point2::new(v.position.x, v.position.y));
        let area = edge_function(&pts[0], &pts[1], &pts[2]);
        assert!(area > 0.0);

        let hits = shader.hits.borrow();
        let mut covered = 0;
        for y in 0..8 {
            for x in 0..8 {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let bary = barycentric_weights(&p, &pts[0], &pts[1], &pts[2], 1.0 / area);
                let inside = is_inside_triangle(&bary);
                covered += inside as u32;
                assert_eq!(hits[y * 8 + x], inside as u32, "pixel ({}, {})", x, y);
            }
        }
        assert!(covered > 20);
    }

    #[test]
    fn drawing_twice_changes_nothing() {
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        let rasterizer = Rasterizer::new();
        let tri = front_facing();

        draw(&rasterizer, &mut fb, &shader, &tri);
        let color_once = fb.color_buffer.clone();
        let depth_once = fb.depth_buffer.clone();
        let shaded_once = shader.total();
        assert!(shaded_once > 0);

        draw(&rasterizer, &mut fb, &shader, &tri);
        assert_eq!(fb.color_buffer, color_once);
        assert_eq!(fb.depth_buffer, depth_once);
        assert_eq!(shader.total(), shaded_once);
    }

    #[test]
    fn cull_modes_are_symmetric() {
        let tri = front_facing();
        let mirrored = [tri[0], tri[2], tri[1]];

        let drawn = |mode: CullMode, t: &[OutputVertex; 3]| {
            let mut fb = FrameBuffer::new(8, 8);
            let shader = RecordingShader::new(8, 8);
            let rasterizer = Rasterizer {
                cull_mode: mode,
                ..Rasterizer::new()
            };
            draw(&rasterizer, &mut fb, &shader, t);
            (shader.total() > 0, fb.color_buffer)
        };

        assert!(drawn(CullMode::Back, &tri).0);
        assert!(!drawn(CullMode::Back, &mirrored).0);
        assert!(!drawn(CullMode::Front, &tri).0);
        assert!(drawn(CullMode::Front, &mirrored).0);

        let (a, buf_a) = drawn(CullMode::None, &tri);
        let (b, buf_b) = drawn(CullMode::None, &mirrored);
        assert!(a && b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn rejects_triangles_leaving_the_view_volume() {
        let rasterizer = Rasterizer::new();
        let mut tri = front_facing();

        tri[1].position.x = 8.5;
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        draw(&rasterizer, &mut fb, &shader, &tri);
        assert_eq!(shader.total(), 0);

        let mut tri = front_facing();
        tri[2].position.z = 1.01;
        draw(&rasterizer, &mut fb, &shader, &tri);
        assert_eq!(shader.total(), 0);

        let mut tri = front_facing();
        tri[0].position.y = f32::NAN;
        draw(&rasterizer, &mut fb, &shader, &tri);
        assert_eq!(shader.total(), 0);
        assert!(fb.depth_buffer.iter().all(|&d| d == f32::MAX));
    }

    #[test]
    fn zero_area_triangles_are_skipped() {
        let rasterizer = Rasterizer {
            cull_mode: CullMode::None,
            ..Rasterizer::new()
        };
        let tri = [
            vertex(1.0, 1.0, 0.5, 1.0),
            vertex(3.0, 3.0, 0.5, 1.0),
            vertex(5.0, 5.0, 0.5, 1.0),
        ];
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        draw(&rasterizer, &mut fb, &shader, &tri);
        assert_eq!(shader.total(), 0);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let rasterizer = Rasterizer::new();
        let mut near = front_facing();
        let mut far = front_facing();
        for v in near.iter_mut() {
            v.position.z = 0.3;
            v.color = Vector3::new(0.9, 0.0, 0.0);
        }
        for v in far.iter_mut() {
            v.position.z = 0.6;
            v.color = Vector3::new(0.0, 0.0, 0.9);
        }

        let probe = |first: &[OutputVertex; 3], second: &[OutputVertex; 3]| {
            let mut fb = FrameBuffer::new(8, 8);
            let shader = RecordingShader::new(8, 8);
            draw(&rasterizer, &mut fb, &shader, first);
            draw(&rasterizer, &mut fb, &shader, second);
            (fb.get_pixel(2, 2).unwrap(), fb.get_depth(2, 2).unwrap())
        };

        for (pixel, depth) in [probe(&near, &far), probe(&far, &near)] {
            assert_eq!(pixel, 0xFFE50000);
            assert!((depth - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn perspective_correct_color_matches_affine_for_equal_w() {
        let rasterizer = Rasterizer::new();
        let mut tri = front_facing();
        tri[0].color = Vector3::new(1.0, 0.0, 0.0);
        tri[1].color = Vector3::new(0.0, 1.0, 0.0);
        tri[2].color = Vector3::new(0.0, 0.0, 1.0);
        for v in tri.iter_mut() {
            v.position.w = 5.0;
        }

        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        draw(&rasterizer, &mut fb, &shader, &tri);

        let pts = tri.map(|v| Point2::new(v.position.x, v.position.y));
        let inv_area = 1.0 / edge_function(&pts[0], &pts[1], &pts[2]);
        let bary = barycentric_weights(&Point2::new(2.5, 2.5), &pts[0], &pts[1], &pts[2], inv_area);
        let affine = pack_rgb(&Vector3::new(bary.x, bary.y, bary.z));

        let [r, g, b] = crate::core::color::unpack_rgb(fb.get_pixel(2, 2).unwrap());
        let [er, eg, eb] = crate::core::color::unpack_rgb(affine);
        for (got, want) in [(r, er), (g, eg), (b, eb)] {
            assert!((got as i32 - want as i32).abs() <= 1);
        }
    }

    #[test]
    fn depth_view_writes_remapped_gray() {
        let rasterizer = Rasterizer {
            render_depth_buffer: true,
            ..Rasterizer::new()
        };
        let mut tri = front_facing();
        for v in tri.iter_mut() {
            v.position.z = 0.5;
        }
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        draw(&rasterizer, &mut fb, &shader, &tri);

        // Depth far below 0.997 maps to black; the shader is bypassed.
        assert_eq!(fb.get_pixel(2, 2), Some(0xFF000000));
        assert_eq!(shader.total(), 0);
    }

    #[test]
    fn bounding_box_view_fills_the_whole_box() {
        let rasterizer = Rasterizer {
            render_bounding_box: true,
            ..Rasterizer::new()
        };
        let tri = front_facing();
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        draw(&rasterizer, &mut fb, &shader, &tri);

        // Box spans x 0..=7, y 0..=7 (clamped); the corner lies outside the triangle.
        assert_eq!(fb.get_pixel(7, 7), Some(0xFFFFFFFF));
        assert_eq!(fb.get_pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(shader.total(), 0);
        assert!(fb.depth_buffer.iter().all(|&d| d == f32::MAX));
    }

    #[test]
    fn cull_mode_cycles() {
        assert_eq!(CullMode::Back.next(), CullMode::Front);
        assert_eq!(CullMode::Front.next(), CullMode::None);
        assert_eq!(CullMode::None.next(), CullMode::Back);
        assert_eq!("FRONT".parse(), Ok(CullMode::Front));
        assert!("sideways".parse::<CullMode>().is_err());
    }

    #[test]
    fn draw_indexed_follows_strip_winding() {
        // Quad as a strip: (0,0) (8,0) (0,8) (8,8). With strip winding fixed up,
        // both halves face the same way and back-face culling keeps both.
        let verts = vec![
            vertex(0.0, 0.0, 0.5, 1.0),
            vertex(8.0, 0.0, 0.5, 1.0),
            vertex(0.0, 8.0, 0.5, 1.0),
            vertex(8.0, 8.0, 0.5, 1.0),
        ];
        let mut fb = FrameBuffer::new(8, 8);
        let shader = RecordingShader::new(8, 8);
        Rasterizer::new().draw_indexed(
            &mut fb,
            &shader,
            &verts,
            &[0, 1, 2, 3],
            PrimitiveTopology::TriangleStrip,
            &Material::default(),
        );

        // One pixel well inside each half.
        let hits = shader.hits.borrow();
        assert_eq!(hits[8 + 1], 1);
        assert_eq!(hits[6 * 8 + 6], 1);
    }
}
