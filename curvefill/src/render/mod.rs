pub mod canvas;
pub mod compositor;
pub mod context;
pub mod target;
