use crate::geom::approx;
use crate::geom::point::Point;

/// Below this doubled area (in square device units) a curve triangle covers no pixels.
const DEGENERATE_AREA: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCurve {
    points: [Point; 3],
}

impl QuadraticCurve {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        QuadraticCurve {
            points: [start, control, end],
        }
    }

    /// A straight edge, the control point sits on the chord midpoint.
    pub fn line(start: Point, end: Point) -> Self {
        QuadraticCurve::new(start, start.mid(&end), end)
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn control(&self) -> Point {
        self.points[1]
    }

    pub fn end(&self) -> Point {
        self.points[2]
    }

    pub fn points(&self) -> &[Point; 3] {
        &self.points
    }

    /// True when the control triangle has no area.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.points;
        let u = b - a;
        let v = c - a;
        (u.x() * v.y() - u.y() * v.x()).abs() <= DEGENERATE_AREA
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        QuadraticCurve {
            points: self.points.map(f),
        }
    }
}

/// Cubic Bézier curve together with its quadratic approximation.
///
/// The approximation is computed once, when the curve is created.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicCurve {
    points: [Point; 4],
    quadratics: Vec<QuadraticCurve>,
}

impl CubicCurve {
    /// # Panics
    ///
    /// If the approximation produces no quadratic, or `precision` is not positive.
    pub fn new(start: Point, c1: Point, c2: Point, end: Point, precision: f32) -> Self {
        let points = [start, c1, c2, end];
        let quadratics = approx::to_quadratics(&points, precision);
        assert!(
            !quadratics.is_empty(),
            "cubic {points:?} approximated by zero quadratics"
        );
        CubicCurve { points, quadratics }
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[3]
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    pub fn quadratics(&self) -> &[QuadraticCurve] {
        self.quadratics.as_slice()
    }

    /// Maps the control points and the cached quadratics without re-approximating.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        CubicCurve {
            points: self.points.map(&f),
            quadratics: self.quadratics.iter().map(|q| q.map(&f)).collect(),
        }
    }
}
