use clap::Parser;
use log::{error, info};
use soft_rasterizer::app::run_cli;
use soft_rasterizer::io::config::Config;
use std::process::ExitCode;

/// Software triangle rasterizer.
#[derive(Parser, Debug)]
#[command(name = "soft-rasterizer")]
#[command(about = "Renders a TOML-described scene with a software rasterizer")]
struct Cli {
    /// Scene configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path (format follows the extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Number of frames to simulate before saving
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Seconds advanced per frame
    #[arg(long, default_value_t = 0.0)]
    delta: f32,

    /// back, front or none
    #[arg(long)]
    cull_mode: Option<String>,

    /// observed_area, diffuse, specular or combined
    #[arg(long)]
    shading_mode: Option<String>,

    /// Ignore normal maps
    #[arg(long)]
    no_normal_map: bool,

    /// Visualize the depth buffer
    #[arg(long)]
    depth_buffer: bool,

    /// Visualize triangle bounding boxes
    #[arg(long)]
    bounding_box: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config, String> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config: {}", path);
                Config::load(path)?
            }
            None => {
                info!("No config given, using defaults");
                Config::default()
            }
        };

        let render = &mut config.render;
        if let Some(output) = &self.output {
            render.output = output.clone();
        }
        if let Some(mode) = &self.cull_mode {
            render.cull_mode = mode.clone();
        }
        if let Some(mode) = &self.shading_mode {
            render.shading_mode = mode.clone();
        }
        render.normal_map &= !self.no_normal_map;
        render.depth_buffer |= self.depth_buffer;
        render.bounding_box |= self.bounding_box;

        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = cli
        .load_config()
        .and_then(|config| run_cli(&config, cli.frames, cli.delta));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
