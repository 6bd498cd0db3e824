use clap::ValueEnum;

use curvefill::device::{Backend, Blend};
use curvefill::error::Result;
use curvefill::{Canvas, Color, Path, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    /// A plain square
    Quad,
    /// A closed shape of four cubics
    Blob,
    Heart,
    /// A square whose top edge bends inwards
    Concave,
    /// A stroked and filled circle
    Stroke,
}

/// Scene coordinates are fractions of the canvas size.
fn point<B: Backend>(canvas: &Canvas<B>, x: f32, y: f32) -> Point {
    Point::new(x * canvas.width() as f32, y * canvas.height() as f32)
}

fn quad<B: Backend>(canvas: &Canvas<B>) -> Path {
    Path::start_at_with(point(canvas, 0.1, 0.1), canvas.config())
        .line_to(point(canvas, 0.9, 0.1))
        .line_to(point(canvas, 0.9, 0.9))
        .line_to(point(canvas, 0.1, 0.9))
}

fn blob<B: Backend>(canvas: &Canvas<B>) -> Path {
    let p = |x, y| point(canvas, x, y);
    Path::start_at_with(p(0.5, 0.1), canvas.config())
        .bezier_to(p(0.9, 0.5), p(0.8, 0.05), p(0.95, 0.25))
        .bezier_to(p(0.5, 0.9), p(0.85, 0.8), p(0.7, 0.95))
        .bezier_to(p(0.1, 0.5), p(0.2, 0.85), p(0.3, 0.6))
        .bezier_to(p(0.5, 0.1), p(-0.05, 0.3), p(0.2, 0.1))
}

fn heart<B: Backend>(canvas: &Canvas<B>) -> Path {
    let p = |x, y| point(canvas, x, y);
    Path::start_at_with(p(0.5, 0.3), canvas.config())
        .bezier_to(p(0.9, 0.35), p(0.6, 0.05), p(0.95, 0.1))
        .bezier_to(p(0.5, 0.9), p(0.85, 0.6), p(0.6, 0.75))
        .bezier_to(p(0.1, 0.35), p(0.4, 0.75), p(0.15, 0.6))
        .bezier_to(p(0.5, 0.3), p(0.05, 0.1), p(0.4, 0.05))
}

fn concave<B: Backend>(canvas: &Canvas<B>) -> Path {
    Path::start_at_with(point(canvas, 0.1, 0.1), canvas.config())
        .quadratic_to(point(canvas, 0.9, 0.1), point(canvas, 0.5, 0.7))
        .line_to(point(canvas, 0.9, 0.9))
        .line_to(point(canvas, 0.1, 0.9))
}

fn circle<B: Backend>(canvas: &Canvas<B>, center: Point, radius: f32) -> Path {
    let k = 0.5523 * radius;
    let (cx, cy) = (center.x(), center.y());
    Path::start_at_with(Point::new(cx + radius, cy), canvas.config())
        .bezier_to(
            Point::new(cx, cy + radius),
            Point::new(cx + radius, cy + k),
            Point::new(cx + k, cy + radius),
        )
        .bezier_to(
            Point::new(cx - radius, cy),
            Point::new(cx - k, cy + radius),
            Point::new(cx - radius, cy + k),
        )
        .bezier_to(
            Point::new(cx, cy - radius),
            Point::new(cx - radius, cy - k),
            Point::new(cx - k, cy - radius),
        )
        .bezier_to(
            Point::new(cx + radius, cy),
            Point::new(cx + k, cy - radius),
            Point::new(cx + radius, cy - k),
        )
}

pub fn draw<B: Backend>(scene: Scene, canvas: &mut Canvas<B>) -> Result<()> {
    match scene {
        Scene::Quad => quad(canvas).fill(canvas, Color::rgb(0.2, 0.4, 0.8)),
        Scene::Blob => blob(canvas).fill(canvas, Color::rgb(0.9, 0.3, 0.1)),
        Scene::Heart => heart(canvas).fill(canvas, Color::rgb(0.85, 0.1, 0.2)),
        Scene::Concave => concave(canvas).fill(canvas, Color::rgb(0.1, 0.6, 0.3)),
        Scene::Stroke => {
            let config = canvas.config().with_composite_blend(Blend::OVER);
            canvas.set_config(config);
            let size = canvas.width().min(canvas.height()) as f32;
            let center = point(canvas, 0.5, 0.5);
            let path = circle(canvas, center, size * 0.35);
            path.stroke(canvas, size * 0.03)?;
            path.fill(canvas, Color::rgb(1.0, 0.8, 0.2))
        }
    }
}
