use crate::color::Color;
use crate::device::Blend;

/// Default curve approximation threshold, in device units.
pub const DEFAULT_PRECISION: f32 = 10.0;

/// Default distance under which the last endpoint is treated as closing the path.
pub const DEFAULT_ENDPOINT_TOLERANCE: f32 = 1e-3;

/// Tunables shared by path building and filling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Maximum accepted cubic-to-quadratic error estimate.
    pub precision: f32,
    pub endpoint_tolerance: f32,
    /// Color used by `Path::stroke`.
    pub stroke_color: Color,
    /// Blend of the composite stage, [`Blend::COMPOSITE`] unless layering shapes.
    pub composite_blend: Blend,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            precision: DEFAULT_PRECISION,
            endpoint_tolerance: DEFAULT_ENDPOINT_TOLERANCE,
            stroke_color: Color::BLACK,
            composite_blend: Blend::COMPOSITE,
        }
    }
}

impl RenderConfig {
    pub fn with_precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_composite_blend(mut self, blend: Blend) -> Self {
        self.composite_blend = blend;
        self
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }
}
