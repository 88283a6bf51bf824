use crate::core::color::ColorRGB;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{CullMode, Rasterizer};
use crate::io::image::save_buffer_to_image;
use crate::pipeline::shaders::phong::{PhongShader, ShadingMode};
use crate::pipeline::vertex::transform_vertices;
use crate::scene::context::RenderContext;
use log::{debug, info};
use nalgebra::Vector3;
use std::path::Path;

/// Background when the uniform clear color is off.
const SOFTWARE_CLEAR_COLOR: [f32; 3] = [0.39, 0.39, 0.39];
const UNIFORM_CLEAR_COLOR: [f32; 3] = [0.1, 0.1, 0.1];

fn on_off(state: bool) -> &'static str {
    if state { "ON" } else { "OFF" }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub shader: PhongShader,
    pub uniform_clear_color: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            shader: PhongShader::default(),
            uniform_clear_color: false,
        }
    }

    pub fn clear_color(&self) -> ColorRGB {
        let [r, g, b] = if self.uniform_clear_color {
            UNIFORM_CLEAR_COLOR
        } else {
            SOFTWARE_CLEAR_COLOR
        };
        Vector3::new(r, g, b)
    }

    /// Renders one frame of `context` into the framebuffer.
    ///
    /// Meshes are transformed and drawn one after another in context order;
    /// invisible meshes are skipped entirely.
    pub fn render(&mut self, context: &mut RenderContext) {
        let clear_color = self.clear_color();
        self.framebuffer.clear_depth();
        self.framebuffer.clear_color(&clear_color);

        self.shader.lighting = context.lighting.clone();
        let camera_position = context.camera.position();
        let (width, height) = (self.framebuffer.width, self.framebuffer.height);

        for (i, mesh) in context.meshes.iter_mut().enumerate() {
            if !mesh.is_visible() {
                debug!("Skipping hidden mesh {}", i);
                continue;
            }

            transform_vertices(mesh, &camera_position, width, height);

            self.rasterizer.draw_indexed(
                &mut self.framebuffer,
                &self.shader,
                mesh.output_vertices(),
                mesh.indices(),
                mesh.topology(),
                mesh.material(),
            );
        }
    }

    // --- Frame Controls ---

    pub fn cycle_cull_mode(&mut self) -> CullMode {
        let mode = self.rasterizer.cull_mode.next();
        self.rasterizer.set_cull_mode(mode);
        info!("CullMode = {:?}", mode);
        mode
    }

    pub fn cycle_shading_mode(&mut self) -> ShadingMode {
        let mode = self.shader.cycle_shading_mode();
        info!("Shading Mode = {:?}", mode);
        mode
    }

    pub fn toggle_normal_map(&mut self) -> bool {
        let state = self.shader.toggle_normal_map();
        info!("NormalMap {}", on_off(state));
        state
    }

    pub fn toggle_depth_buffer(&mut self) -> bool {
        self.rasterizer.render_depth_buffer = !self.rasterizer.render_depth_buffer;
        info!("DepthBuffer Visualization {}", on_off(self.rasterizer.render_depth_buffer));
        self.rasterizer.render_depth_buffer
    }

    pub fn toggle_bounding_box(&mut self) -> bool {
        self.rasterizer.render_bounding_box = !self.rasterizer.render_bounding_box;
        info!("BoundingBox Visualization {}", on_off(self.rasterizer.render_bounding_box));
        self.rasterizer.render_bounding_box
    }

    pub fn toggle_uniform_clear_color(&mut self) -> bool {
        self.uniform_clear_color = !self.uniform_clear_color;
        info!("Uniform ClearColor {}", on_off(self.uniform_clear_color));
        self.uniform_clear_color
    }

    /// Writes the current color buffer to disk.
    pub fn save_buffer_to_image<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        save_buffer_to_image(
            &self.framebuffer.color_buffer,
            self.framebuffer.width,
            self.framebuffer.height,
            path,
        )
    }
}
