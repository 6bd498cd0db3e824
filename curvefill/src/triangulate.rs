//! Flat interior triangulation.

use earcutr::earcut;

use crate::error::{RenderError, Result};
use crate::geom::point::Point;

/// Splits a polygon into triangles.
///
/// Returns indices into `outline`, three per triangle. A degenerate outline
/// (collinear points) yields no triangles.
pub trait Triangulator {
    fn triangulate(&self, outline: &[Point]) -> Result<Vec<u32>>;
}

/// Ear clipping through `earcutr`.
///
/// Only correct for simple polygons: on a self-intersecting outline the
/// triangles do not have the parity the stencil pass relies on.
#[derive(Debug, Default, Clone, Copy)]
pub struct EarcutTriangulator;

impl Triangulator for EarcutTriangulator {
    fn triangulate(&self, outline: &[Point]) -> Result<Vec<u32>> {
        let coords: Vec<f64> = outline
            .iter()
            .flat_map(|p| [p.x() as f64, p.y() as f64])
            .collect();
        let indices = earcut(&coords, &[], 2)
            .map_err(|e| RenderError::Triangulate(format!("earcut failed: {e:?}")))?;
        Ok(indices.into_iter().map(|i| i as u32).collect())
    }
}

/// A fan around the first point, the default of [`Canvas`](crate::Canvas).
///
/// The fan overlaps itself on concave or self-intersecting outlines. Every
/// point is still covered an odd number of times exactly when it is inside
/// by the even-odd rule, which is all the stencil pass needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(&self, outline: &[Point]) -> Result<Vec<u32>> {
        let n = outline.len() as u32;
        let mut indices = Vec::with_capacity(3 * outline.len().saturating_sub(2));
        for i in 1..n.saturating_sub(1) {
            indices.extend_from_slice(&[0, i, i + 1]);
        }
        Ok(indices)
    }
}
