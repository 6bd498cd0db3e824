use std::path::PathBuf;

use clap::Parser;
use log::info;

use curvefill::shaders::ShaderSet;
use curvefill::{Canvas, RenderConfig};
use soft_render::SoftBackend;

use super::CommandResult;
use crate::scenes::{self, Scene};

#[derive(Debug, Parser)]
pub struct Config {
    #[arg(short, long, default_value = "scene.png")]
    output: PathBuf,

    /// Paint the canvas white before drawing
    #[arg(long)]
    opaque: bool,
}

pub fn command(
    scene: Scene,
    width: u32,
    height: u32,
    render: RenderConfig,
    cfg: Config,
) -> CommandResult {
    let backend = SoftBackend::new(width, height);
    let shaders = ShaderSet::default();
    let mut canvas = Canvas::with_shaders(backend, width, height, &shaders, render)?;
    scenes::draw(scene, &mut canvas)?;

    let mut image = canvas.into_backend().to_image();
    if cfg.opaque {
        for px in image.pixels_mut() {
            let a = px[3] as f32 / 255.0;
            for c in 0..3 {
                px[c] = (px[c] as f32 * a + 255.0 * (1.0 - a)).round() as u8;
            }
            px[3] = 255;
        }
    }
    image.save(&cfg.output)?;
    info!("wrote {}", cfg.output.display());
    Ok(())
}
