use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Backend error:{0}")]
    Backend(String),

    #[error("Program error:{0}")]
    Program(String),

    #[error("Offscreen target error:{0}")]
    Target(String),

    #[error("Triangulate error:{0}")]
    Triangulate(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
