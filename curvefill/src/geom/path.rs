use crate::color::Color;
use crate::config::RenderConfig;
use crate::device::Backend;
use crate::error::Result;
use crate::geom::bezier::{CubicCurve, QuadraticCurve};
use crate::geom::point::Point;
use crate::geom::rect::Rectangle;
use crate::geom::stroke;
use crate::render::canvas::Canvas;
use crate::render::compositor;

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Quadratic(QuadraticCurve),
    Cubic(CubicCurve),
}

impl PathSegment {
    pub fn start(&self) -> Point {
        match self {
            PathSegment::Quadratic(q) => q.start(),
            PathSegment::Cubic(c) => c.start(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSegment::Quadratic(q) => q.end(),
            PathSegment::Cubic(c) => c.end(),
        }
    }

    /// The quadratics rasterized for this segment.
    pub fn quadratics(&self) -> &[QuadraticCurve] {
        match self {
            PathSegment::Quadratic(q) => std::slice::from_ref(q),
            PathSegment::Cubic(c) => c.quadratics(),
        }
    }

    /// Control points, used for bounds.
    pub fn points(&self) -> &[Point] {
        match self {
            PathSegment::Quadratic(q) => q.points(),
            PathSegment::Cubic(c) => c.points(),
        }
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        match self {
            PathSegment::Quadratic(q) => PathSegment::Quadratic(q.map(f)),
            PathSegment::Cubic(c) => PathSegment::Cubic(c.map(f)),
        }
    }
}

/// A single contour of quadratic and cubic segments.
///
/// `endpoints` always holds one more point than `segments`, and segment `i`
/// runs from `endpoints[i]` to `endpoints[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
    endpoints: Vec<Point>,
    precision: f32,
}

impl Path {
    pub fn start_at(point: Point) -> Self {
        Path::start_at_with(point, &RenderConfig::default())
    }

    /// Start a path whose cubics are approximated with `config.precision`.
    pub fn start_at_with(point: Point, config: &RenderConfig) -> Self {
        Path {
            segments: Vec::new(),
            endpoints: vec![point],
            precision: config.precision,
        }
    }

    pub fn quadratic_to(mut self, point: Point, control: Point) -> Self {
        let start = self.current_point();
        self.push(PathSegment::Quadratic(QuadraticCurve::new(
            start, control, point,
        )));
        self
    }

    pub fn bezier_to(mut self, point: Point, c1: Point, c2: Point) -> Self {
        let start = self.current_point();
        let curve = CubicCurve::new(start, c1, c2, point, self.precision);
        self.push(PathSegment::Cubic(curve));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        let start = self.current_point();
        self.push(PathSegment::Quadratic(QuadraticCurve::line(start, point)));
        self
    }

    fn push(&mut self, seg: PathSegment) {
        self.endpoints.push(seg.end());
        self.segments.push(seg);
    }

    pub fn current_point(&self) -> Point {
        // never empty, `start_at` seeds the first endpoint
        self.endpoints[self.endpoints.len() - 1]
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn endpoints(&self) -> &[Point] {
        self.endpoints.as_slice()
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    /// Endpoints with a trailing copy of the first point dropped.
    pub fn fill_endpoints(&self, tolerance: f32) -> &[Point] {
        let n = self.endpoints.len();
        if n > 1 && self.endpoints[n - 1].approx_eq(&self.endpoints[0], tolerance) {
            &self.endpoints[..n - 1]
        } else {
            &self.endpoints
        }
    }

    /// The polygon whose interior is filled flat.
    ///
    /// Built from the deduplicated endpoints, with every cubic contributing
    /// the joints of its quadratic chain. `None` when fewer than three
    /// endpoints remain, such a path has no fillable area.
    pub fn outline(&self, tolerance: f32) -> Option<Vec<Point>> {
        let endpoints = self.fill_endpoints(tolerance);
        if endpoints.len() < 3 {
            return None;
        }
        let mut outline = Vec::with_capacity(endpoints.len());
        for (i, p) in endpoints.iter().enumerate() {
            outline.push(*p);
            if let Some(PathSegment::Cubic(c)) = self.segments.get(i) {
                let quads = c.quadratics();
                outline.extend(quads[..quads.len() - 1].iter().map(|q| q.end()));
            }
        }
        Some(outline)
    }

    pub fn bounding_box(&self) -> Option<Rectangle> {
        let first = self.endpoints.first().copied();
        Rectangle::bounding(
            first
                .into_iter()
                .chain(self.segments.iter().flat_map(|s| s.points().iter().copied())),
        )
    }

    /// A copy of the path with `f` applied to every point.
    pub fn map_points<F>(&self, f: F) -> Path
    where
        F: Fn(Point) -> Point,
    {
        Path {
            segments: self.segments.iter().map(|s| s.map(&f)).collect(),
            endpoints: stroke::transform_all(&self.endpoints, &f),
            precision: self.precision,
        }
    }

    pub fn fill<B: Backend>(&self, canvas: &mut Canvas<B>, color: Color) -> Result<()> {
        compositor::fill(canvas, self, color)
    }

    /// Fill the outset silhouette of the path with the canvas stroke color.
    ///
    /// This is an approximation, see [`stroke::outset_path`].
    pub fn stroke<B: Backend>(&self, canvas: &mut Canvas<B>, width: f32) -> Result<()> {
        let outset = stroke::outset_path(self, width);
        let color = canvas.config().stroke_color;
        compositor::fill(canvas, &outset, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Path {
        Path::start_at(Point::new(10.0, 10.0))
            .line_to(Point::new(90.0, 10.0))
            .line_to(Point::new(90.0, 90.0))
            .line_to(Point::new(10.0, 90.0))
    }

    #[test]
    fn test_builder_continuity() {
        let path = square()
            .quadratic_to(Point::new(0.0, 50.0), Point::new(0.0, 90.0))
            .bezier_to(
                Point::new(10.0, 10.0),
                Point::new(0.0, 30.0),
                Point::new(5.0, 15.0),
            );
        assert_eq!(path.endpoints().len(), path.segments().len() + 1);
        for (i, seg) in path.segments().iter().enumerate() {
            assert_eq!(seg.start(), path.endpoints()[i]);
            assert_eq!(seg.end(), path.endpoints()[i + 1]);
        }
        assert_eq!(path.current_point(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_fill_endpoints_drops_closing_point() {
        let closed = square().line_to(Point::new(10.0, 10.0));
        assert_eq!(closed.endpoints().len(), 5);
        assert_eq!(closed.fill_endpoints(1e-3), square().endpoints());

        let almost = square().line_to(Point::new(10.0001, 9.9999));
        assert_eq!(almost.fill_endpoints(1e-3).len(), 4);

        assert_eq!(square().fill_endpoints(1e-3).len(), 4);
    }

    #[test]
    fn test_outline_needs_three_endpoints() {
        let line = Path::start_at(Point::new(0.0, 0.0)).line_to(Point::new(5.0, 5.0));
        assert!(line.outline(1e-3).is_none());

        let back_and_forth = line.line_to(Point::new(0.0, 0.0));
        assert!(back_and_forth.outline(1e-3).is_none());

        let single = Path::start_at(Point::new(1.0, 1.0));
        assert!(single.outline(1e-3).is_none());
    }

    #[test]
    fn test_outline_includes_cubic_joints() {
        let path = Path::start_at(Point::new(0.0, 0.0))
            .bezier_to(
                Point::new(300.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(200.0, -100.0),
            )
            .line_to(Point::new(150.0, 200.0));
        let outline = path.outline(1e-3).unwrap();
        // 3 endpoints + 3 inner joints of the 4 quadratics
        assert_eq!(outline.len(), 6);
        assert_eq!(outline[0], Point::new(0.0, 0.0));
        assert_eq!(outline[4], Point::new(300.0, 0.0));
        assert_eq!(outline[5], Point::new(150.0, 200.0));
    }

    #[test]
    fn test_bounding_box_uses_control_points() {
        let path = Path::start_at(Point::new(0.0, 0.0))
            .quadratic_to(Point::new(10.0, 0.0), Point::new(5.0, -20.0))
            .line_to(Point::new(10.0, 10.0));
        let bbox = path.bounding_box().unwrap();
        assert_eq!(bbox.min(), Point::new(0.0, -20.0));
        assert_eq!(bbox.max(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_precision_follows_config() {
        let config = RenderConfig::default().with_precision(1.0);
        let s_curve = |path: Path| {
            path.bezier_to(
                Point::new(300.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(200.0, -100.0),
            )
        };
        let fine = s_curve(Path::start_at_with(Point::new(0.0, 0.0), &config));
        let coarse = s_curve(Path::start_at(Point::new(0.0, 0.0)));
        assert_eq!(fine.precision(), 1.0);
        assert_eq!(coarse.precision(), crate::config::DEFAULT_PRECISION);
        assert!(fine.segments()[0].quadratics().len() > coarse.segments()[0].quadratics().len());
        // outsetting keeps the precision
        assert_eq!(stroke::outset_path(&fine, 2.0).precision(), 1.0);
    }

    #[test]
    fn test_map_points() {
        let moved = square().map_points(|p| p * 2.0);
        assert_eq!(moved.endpoints()[1], Point::new(180.0, 20.0));
        assert_eq!(
            moved.segments()[0].quadratics()[0].control(),
            Point::new(100.0, 20.0)
        );
    }
}
