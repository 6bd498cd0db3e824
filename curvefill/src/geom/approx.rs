//! Cubic to quadratic approximation.
//!
//! A cubic `P1 C1 C2 P2` is replaced by the single quadratic with control
//! point `(3·C2 - P2 + 3·C1 - P1) / 4` whenever the error estimate
//! `|P2 - 3·C2 + 3·C1 - P1| / 2` is within the precision. Otherwise the cubic
//! is split at `t = 0.5` and both halves are approximated, left half first.
//! Each split divides the estimate by eight, so the recursion is shallow for
//! any finite input.

use crate::geom::bezier::QuadraticCurve;
use crate::geom::point::Point;

/// Splits stop here even if the estimate is still above the precision,
/// which only happens for non-finite control points.
pub const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Distance estimate between the cubic and its best single quadratic.
pub fn quadratic_error(p1: Point, c1: Point, c2: Point, p2: Point) -> f32 {
    (p2 - c2 * 3.0 + c1 * 3.0 - p1).length() / 2.0
}

fn quadratic_control(p1: Point, c1: Point, c2: Point, p2: Point) -> Point {
    (c2 * 3.0 - p2 + c1 * 3.0 - p1) * 0.25
}

/// Approximate the cubic `points` (start, c1, c2, end) with quadratics.
///
/// The first quadratic starts at `points[0]`, the last ends at `points[3]`
/// and consecutive quadratics share their joint exactly.
///
/// # Panics
///
/// If `precision` is not a finite positive number.
pub fn to_quadratics(points: &[Point; 4], precision: f32) -> Vec<QuadraticCurve> {
    to_quadratics_with_depth(points, precision).0
}

pub(crate) fn to_quadratics_with_depth(
    points: &[Point; 4],
    precision: f32,
) -> (Vec<QuadraticCurve>, u32) {
    assert!(
        precision.is_finite() && precision > 0.0,
        "curve precision must be a positive number, got {precision}"
    );
    let mut quads = Vec::new();
    let [p1, c1, c2, p2] = *points;
    let depth = subdivide(p1, c1, c2, p2, precision, 0, &mut quads);
    (quads, depth)
}

fn subdivide(
    p1: Point,
    c1: Point,
    c2: Point,
    p2: Point,
    precision: f32,
    depth: u32,
    out: &mut Vec<QuadraticCurve>,
) -> u32 {
    if depth >= MAX_SUBDIVISION_DEPTH || quadratic_error(p1, c1, c2, p2) <= precision {
        out.push(QuadraticCurve::new(p1, quadratic_control(p1, c1, c2, p2), p2));
        return depth;
    }

    // de Casteljau at t = 0.5
    let p4 = p1.mid(&c1);
    let p5 = c1.mid(&c2);
    let p6 = c2.mid(&p2);
    let p7 = p4.mid(&p5);
    let p8 = p5.mid(&p6);
    let p9 = p7.mid(&p8);

    let left = subdivide(p1, p4, p7, p9, precision, depth + 1, out);
    let right = subdivide(p9, p8, p6, p2, precision, depth + 1, out);
    left.max(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PRECISION;

    fn cubic(v: [(f32, f32); 4]) -> [Point; 4] {
        v.map(Point::from)
    }

    fn assert_chain(points: &[Point; 4], quads: &[QuadraticCurve]) {
        assert_eq!(quads.first().unwrap().start(), points[0]);
        assert_eq!(quads.last().unwrap().end(), points[3]);
        for pair in quads.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_flat_cubic_is_one_quadratic() {
        let points = cubic([(0.0, 0.0), (100.0, 100.0), (200.0, 100.0), (300.0, 0.0)]);
        let quads = to_quadratics(&points, DEFAULT_PRECISION);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].start(), points[0]);
        assert_eq!(quads[0].end(), points[3]);
        assert_eq!(quads[0].control(), Point::new(150.0, 150.0));
    }

    #[test]
    fn test_s_curve_subdivides() {
        let points = cubic([(0.0, 0.0), (100.0, 100.0), (200.0, -100.0), (300.0, 0.0)]);
        let quads = to_quadratics(&points, DEFAULT_PRECISION);
        assert!(quads.len() >= 2);
        assert!(quads.len().is_power_of_two());
        assert_chain(&points, &quads);
    }

    #[test]
    fn test_finer_precision_gives_more_quadratics() {
        let points = cubic([(0.0, 0.0), (100.0, 100.0), (200.0, -100.0), (300.0, 0.0)]);
        let coarse = to_quadratics(&points, 10.0);
        let fine = to_quadratics(&points, 1.0);
        assert!(fine.len() > coarse.len());
        assert_chain(&points, &fine);
    }

    #[test]
    fn test_terminates_within_depth() {
        let shapes = [
            cubic([(0.0, 0.0), (100.0, 100.0), (200.0, -100.0), (300.0, 0.0)]),
            cubic([(0.0, 0.0), (5000.0, -5000.0), (-5000.0, 5000.0), (10.0, 10.0)]),
            cubic([(-1e5, 3e4), (2e5, 2e5), (-2e5, -2e5), (1e5, -3e4)]),
        ];
        for points in shapes.iter() {
            let (quads, depth) = to_quadratics_with_depth(points, 1.0);
            assert!(depth <= 20);
            assert!(depth < MAX_SUBDIVISION_DEPTH);
            assert_chain(points, &quads);
        }
    }

    #[test]
    fn test_non_finite_input_stops_at_cap() {
        let points = cubic([(0.0, 0.0), (f32::NAN, 1.0), (2.0, 2.0), (3.0, 0.0)]);
        let (quads, depth) = to_quadratics_with_depth(&points, 1.0);
        assert_eq!(depth, MAX_SUBDIVISION_DEPTH);
        assert!(!quads.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let points = cubic([(3.0, 7.0), (40.0, 300.0), (260.0, -90.0), (310.0, 20.0)]);
        assert_eq!(to_quadratics(&points, 2.0), to_quadratics(&points, 2.0));
    }

    #[test]
    #[should_panic]
    fn test_zero_precision_panics() {
        let points = cubic([(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)]);
        to_quadratics(&points, 0.0);
    }
}
