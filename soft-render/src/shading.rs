//! Fragment programs of the fill stages, evaluated on the CPU.

use std::collections::HashMap;

use curvefill::device::{ProgramKind, UniformValue};

use crate::raster::Fragment;

/// A single-channel offscreen surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaTarget {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl AlphaTarget {
    pub fn new(width: usize, height: usize) -> Self {
        AlphaTarget {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Nearest texel at texture coordinate `(u, v)`, `v` pointing up.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = ((u * self.width as f32).floor().max(0.0) as usize).min(self.width - 1);
        let y = (((1.0 - v) * self.height as f32).floor().max(0.0) as usize).min(self.height - 1);
        self.get(x, y)
    }
}

/// Analytic coverage of the region `s² - t < 0` at `frag`, or of its
/// complement `s² - t > 0` when `invert` is set.
///
/// The implicit value is divided by its screen-space gradient to get a
/// signed distance in pixels, coverage ramps over one pixel around zero.
pub fn curve_coverage(frag: &Fragment, invert: bool) -> f32 {
    let [s, t] = frag.var;
    let f = if invert { t - s * s } else { s * s - t };
    let fx = 2.0 * s * frag.dx[0] - frag.dx[1];
    let fy = 2.0 * s * frag.dy[0] - frag.dy[1];
    let grad = fx.hypot(fy);
    if grad > 0.0 {
        (0.5 - f / grad).clamp(0.0, 1.0)
    } else if f < 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Runs the fragment program of `kind`, `None` when the fragment is discarded.
pub fn shade(
    kind: ProgramKind,
    frag: &Fragment,
    uniforms: &HashMap<String, UniformValue>,
    texture: Option<&AlphaTarget>,
) -> Option<[f32; 4]> {
    match kind {
        ProgramKind::Flat => Some([1.0; 4]),
        ProgramKind::Curve => {
            let invert = matches!(uniforms.get("invertCoverage"), Some(UniformValue::Int(1)));
            let alpha = curve_coverage(frag, invert);
            let exclude = matches!(uniforms.get("excludeTrans"), Some(UniformValue::Int(1)));
            if alpha <= 0.0 || (exclude && alpha < 1.0) {
                None
            } else {
                Some([alpha; 4])
            }
        }
        ProgramKind::Composite => {
            let color = match uniforms.get("color") {
                Some(UniformValue::Vec4(c)) => *c,
                _ => [0.0, 0.0, 0.0, 1.0],
            };
            let coverage = texture.map_or(0.0, |t| t.sample(frag.var[0], frag.var[1]));
            Some([color[0], color[1], color[2], color[3] * coverage])
        }
    }
}
