use crate::core::rasterizer::CullMode;
use crate::io::config::Config;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::phong::ShadingMode;
use crate::scene::loader::init_scene_resources;
use log::{debug, info};
use std::time::Instant;

/// Builds a renderer with the frame controls taken from `config.render`.
pub fn build_renderer(config: &Config) -> Result<Renderer, String> {
    let render = &config.render;
    if render.width == 0 || render.height == 0 {
        return Err(format!(
            "Invalid resolution {}x{}",
            render.width, render.height
        ));
    }

    let mut renderer = Renderer::new(render.width, render.height);
    renderer
        .rasterizer
        .set_cull_mode(render.cull_mode.parse::<CullMode>()?);
    renderer.rasterizer.render_depth_buffer = render.depth_buffer;
    renderer.rasterizer.render_bounding_box = render.bounding_box;
    renderer.shader.shading_mode = render.shading_mode.parse::<ShadingMode>()?;
    renderer.shader.use_normal_map = render.normal_map;
    renderer.uniform_clear_color = render.uniform_clear_color;

    info!(
        "Renderer {}x{}: CullMode = {:?}, Shading Mode = {:?}, NormalMap = {}",
        render.width,
        render.height,
        renderer.rasterizer.cull_mode,
        renderer.shader.shading_mode,
        renderer.shader.use_normal_map
    );
    Ok(renderer)
}

/// Runs the application headless: advances the scene `frames` times by
/// `delta` seconds, rendering each step, then saves the last frame.
pub fn run_cli(config: &Config, frames: u32, delta: f32) -> Result<Renderer, String> {
    let mut renderer = build_renderer(config)?;
    let mut context = init_scene_resources(config);
    let start_time = Instant::now();

    for frame in 0..frames.max(1) {
        let frame_start = Instant::now();
        context.update(delta);
        renderer.render(&mut context);
        debug!("Frame {} rendered in {:.2?}", frame, frame_start.elapsed());
    }

    info!(
        "Rendered {} frame(s) in {:.2?}",
        frames.max(1),
        start_time.elapsed()
    );

    info!("Saving output to '{}'...", config.render.output);
    renderer.save_buffer_to_image(&config.render.output)?;
    info!("Done.");
    Ok(renderer)
}
