use curvefill::triangulate::EarcutTriangulator;
use curvefill::{device::Blend, Canvas, Color, Path, Point, RenderConfig};
use soft_render::SoftBackend;

const RED: Color = Color::rgb(1.0, 0.0, 0.0);

fn canvas() -> Canvas<SoftBackend> {
    Canvas::new(SoftBackend::new(100, 100), 100, 100).unwrap()
}

fn square(closed: bool) -> Path {
    let path = Path::start_at(Point::new(10.0, 10.0))
        .line_to(Point::new(90.0, 10.0))
        .line_to(Point::new(90.0, 90.0))
        .line_to(Point::new(10.0, 90.0));
    if closed {
        path.line_to(Point::new(10.0, 10.0))
    } else {
        path
    }
}

fn circle(center: Point, radius: f32) -> Path {
    let k = 0.5523 * radius;
    let (cx, cy) = (center.x(), center.y());
    Path::start_at(Point::new(cx + radius, cy))
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

#[test]
fn test_convex_quad_fills_exactly_its_interior() {
    let mut canvas = canvas();
    square(false).fill(&mut canvas, RED).unwrap();
    let backend = canvas.backend();
    for y in 0..100 {
        for x in 0..100 {
            let inside = (10..90).contains(&x) && (10..90).contains(&y);
            let expected = if inside { [1.0, 0.0, 0.0, 1.0] } else { [0.0; 4] };
            assert_eq!(backend.pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_closing_endpoint_does_not_change_pixels() {
    let mut open = canvas();
    square(false).fill(&mut open, RED).unwrap();
    let mut closed = canvas();
    square(true).fill(&mut closed, RED).unwrap();
    assert_eq!(open.backend().to_image(), closed.backend().to_image());
}

#[test]
fn test_outward_bulge_is_filled_beyond_chords() {
    let mut canvas = canvas();
    circle(Point::new(50.0, 50.0), 40.0)
        .fill(&mut canvas, RED)
        .unwrap();
    let backend = canvas.backend();

    assert_eq!(backend.pixel(50, 50), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(50, 12), [1.0, 0.0, 0.0, 1.0]);
    // between the diamond of endpoints and the arc
    assert_eq!(backend.pixel(75, 25), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(24, 76), [1.0, 0.0, 0.0, 1.0]);
    // beyond the arc, still inside the curve triangle
    assert_eq!(backend.pixel(80, 20)[3], 0.0);
    assert_eq!(backend.pixel(2, 2)[3], 0.0);
    assert_eq!(backend.pixel(97, 50)[3], 0.0);
}

#[test]
fn test_curve_edges_are_antialiased() {
    let mut canvas = canvas();
    circle(Point::new(50.0, 50.0), 40.0)
        .fill(&mut canvas, RED)
        .unwrap();
    let backend = canvas.backend();

    let row: Vec<f32> = (70..95).map(|x| backend.pixel(x, 78)[3]).collect();
    assert!(row.iter().any(|&a| a > 0.0 && a < 1.0), "{row:?}");
    // coverage falls off monotonically across the edge
    assert!(row.windows(2).all(|w| w[1] <= w[0]), "{row:?}");
    // partially covered pixels keep the full fill color
    for x in 70..95 {
        let [r, g, b, a] = backend.pixel(x, 78);
        if a > 0.0 {
            assert_eq!([r, g, b], [1.0, 0.0, 0.0]);
        }
    }
}

#[test]
fn test_inward_bulge_is_excluded() {
    let mut canvas = canvas();
    Path::start_at(Point::new(10.0, 10.0))
        .quadratic_to(Point::new(90.0, 10.0), Point::new(50.0, 70.0))
        .line_to(Point::new(90.0, 90.0))
        .line_to(Point::new(10.0, 90.0))
        .fill(&mut canvas, RED)
        .unwrap();
    let backend = canvas.backend();

    // the curve dips to y = 40 at x = 50
    assert_eq!(backend.pixel(50, 25), [0.0; 4]);
    assert_eq!(backend.pixel(50, 5), [0.0; 4]);
    assert_eq!(backend.pixel(50, 60), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(15, 80), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.stencil_at(50, 25) & 0b10, 0);
    assert_eq!(backend.stencil_at(50, 60) & 0b10, 0b10);
}

#[test]
fn test_inward_curve_edge_is_antialiased() {
    let mut canvas = canvas();
    Path::start_at(Point::new(10.0, 10.0))
        .quadratic_to(Point::new(90.0, 10.0), Point::new(50.0, 70.0))
        .line_to(Point::new(90.0, 90.0))
        .line_to(Point::new(10.0, 90.0))
        .fill(&mut canvas, RED)
        .unwrap();
    let backend = canvas.backend();

    // the arc crosses y = 30 near x = 27
    let row: Vec<f32> = (15..45).map(|x| backend.pixel(x, 30)[3]).collect();
    assert_eq!(row[0], 1.0, "{row:?}");
    assert_eq!(row[row.len() - 1], 0.0, "{row:?}");
    assert!(row.iter().any(|&a| a > 0.0 && a < 1.0), "{row:?}");
    assert!(row.windows(2).all(|w| w[1] <= w[0]), "{row:?}");
    for x in 15..45 {
        let [r, g, b, a] = backend.pixel(x, 30);
        if a > 0.0 {
            assert_eq!([r, g, b], [1.0, 0.0, 0.0]);
        }
    }
}

#[test]
fn test_self_intersecting_bow_tie_fills_both_lobes() {
    let mut canvas = canvas();
    Path::start_at(Point::new(10.0, 10.0))
        .line_to(Point::new(90.0, 90.0))
        .line_to(Point::new(90.0, 10.0))
        .line_to(Point::new(10.0, 90.0))
        .fill(&mut canvas, RED)
        .unwrap();
    let backend = canvas.backend();

    assert_eq!(backend.pixel(25, 50), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(75, 50), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(50, 25)[3], 0.0);
    assert_eq!(backend.pixel(50, 75)[3], 0.0);
}

#[test]
fn test_earcut_matches_fan_on_simple_outline() {
    let mut fan = canvas();
    square(false).fill(&mut fan, RED).unwrap();
    let mut earcut = canvas().with_triangulator(EarcutTriangulator);
    square(false).fill(&mut earcut, RED).unwrap();
    assert_eq!(fan.backend().to_image(), earcut.backend().to_image());
}

#[test]
fn test_fill_leaves_alpha_target_with_coverage() {
    let mut canvas = canvas();
    square(false).fill(&mut canvas, RED).unwrap();
    let target = canvas.backend().target(canvas.target()).unwrap();
    assert_eq!(target.get(50, 50), 1.0);
    assert_eq!(target.get(5, 5), 0.0);
}

#[test]
fn test_stroke_covers_outside_the_path() {
    let mut canvas = canvas();
    square(false).stroke(&mut canvas, 5.0).unwrap();
    let backend = canvas.backend();

    assert_eq!(backend.pixel(7, 50), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(50, 50), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(1, 50)[3], 0.0);
}

#[test]
fn test_composite_blend_keeps_earlier_coverage() {
    let mut canvas = canvas();
    square(false).stroke(&mut canvas, 5.0).unwrap();
    square(false).fill(&mut canvas, RED).unwrap();
    let backend = canvas.backend();

    // the second fill only lands where the destination was transparent
    assert_eq!(backend.pixel(7, 50), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(50, 50)[3], 0.0);
}

#[test]
fn test_over_blend_layers_fill_on_stroke() {
    let mut canvas = canvas();
    let config = RenderConfig::default().with_composite_blend(Blend::OVER);
    canvas.set_config(config);
    square(false).stroke(&mut canvas, 5.0).unwrap();
    square(false).fill(&mut canvas, RED).unwrap();
    let backend = canvas.backend();

    assert_eq!(backend.pixel(7, 50), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(backend.pixel(50, 50), [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_clear_resets_framebuffer() {
    let mut canvas = canvas();
    square(false).fill(&mut canvas, RED).unwrap();
    canvas.clear(Color::TRANSPARENT).unwrap();
    assert_eq!(canvas.backend().pixel(50, 50), [0.0; 4]);
}
