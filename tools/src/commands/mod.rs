pub mod render;
pub mod trace;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("render failed: {0}")]
    Render(#[from] curvefill::error::RenderError),
    #[error("writing image failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CommandResult = Result<(), CommandError>;
