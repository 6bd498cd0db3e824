use crate::geom::point::Point;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rectangle {
    min: Point,
    max: Point,
}

impl Rectangle {
    pub fn new(min: Point, max: Point) -> Self {
        Rectangle { min, max }
    }

    /// Smallest rectangle containing every point, `None` for an empty iterator.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut rect = Rectangle::new(first, first);
        for p in points {
            rect.grow_to_contain(p);
        }
        Some(rect)
    }

    pub fn grow_to_contain(&mut self, p: Point) {
        self.min = Point::new(self.min.x().min(p.x()), self.min.y().min(p.y()));
        self.max = Point::new(self.max.x().max(p.x()), self.max.y().max(p.y()));
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> f32 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f32 {
        self.max.y() - self.min.y()
    }

    pub fn center(&self) -> Point {
        self.min.mid(&self.max)
    }
}
