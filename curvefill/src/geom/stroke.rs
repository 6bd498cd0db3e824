//! Outset stroke approximation.
//!
//! Every point is pushed away from the center of the path's bounding box by
//! the stroke width. Filling the pushed path paints a band around the
//! original shape. This is not a parallel offset: sharp corners and strongly
//! varying curvature give a band of uneven width.

use crate::geom::path::Path;
use crate::geom::point::Point;

/// Apply `f` to each point independently.
pub fn transform_all<F>(points: &[Point], f: F) -> Vec<Point>
where
    F: Fn(Point) -> Point,
{
    points.iter().map(|p| f(*p)).collect()
}

/// Moves a point `width` units away from `center`, points on the center stay put.
pub fn outset(center: Point, width: f32) -> impl Fn(Point) -> Point {
    move |p| {
        let dir = p - center;
        let len = dir.length();
        if len <= f32::EPSILON {
            p
        } else {
            p + dir * (width / len)
        }
    }
}

pub fn outset_path(path: &Path, width: f32) -> Path {
    match path.bounding_box() {
        Some(bbox) => path.map_points(outset(bbox.center(), width)),
        None => path.clone(),
    }
}
