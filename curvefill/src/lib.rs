//! Filled, anti-aliased vector paths on a hardware-style rasterizer.
//!
//! Paths made of quadratic and cubic Bézier segments are filled without any
//! CPU polygon clipping: every curve becomes a triangle tested per fragment
//! with the implicit form `s² - t`, the interior is triangulated as a flat
//! polygon, and a stencil pass resolves winding before a single composite
//! quad paints the result.

pub mod color;
pub mod config;
pub mod device;
pub mod error;
pub mod geom;
pub mod render;
pub mod shaders;
pub mod triangulate;

pub use color::Color;
pub use config::RenderConfig;
pub use geom::point::Point;
pub use geom::path::Path;
pub use render::canvas::Canvas;
