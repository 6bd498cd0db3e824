use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use curvefill::device::trace::TraceBackend;
use curvefill::shaders::ShaderSet;
use curvefill::{Canvas, RenderConfig};

use super::CommandResult;
use crate::scenes::{self, Scene};

#[derive(Debug, Parser)]
pub struct Config {
    /// Defaults to stdout
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
}

pub fn command(
    scene: Scene,
    width: u32,
    height: u32,
    render: RenderConfig,
    cfg: Config,
) -> CommandResult {
    let shaders = ShaderSet::default();
    let mut canvas = Canvas::with_shaders(TraceBackend::new(), width, height, &shaders, render)?;
    scenes::draw(scene, &mut canvas)?;
    let device = canvas.into_backend();
    info!("{} draw calls", device.draw_count());

    match cfg.output {
        Some(path) => {
            let mut out = std::fs::File::create(&path)?;
            out.write_all(device.content().as_bytes())?;
        }
        None => print!("{}", device.content()),
    }
    Ok(())
}
