//! CPU implementation of the `curvefill` backend.
//!
//! Emulates the small slice of a GL pipeline the fill stages rely on, so
//! paths can be rendered into an image without a graphics context.

pub mod raster;
pub mod shading;
pub mod soft_device;

pub use soft_device::SoftBackend;
