//! Three stage path fill.
//!
//! 1. Silhouette: the offscreen alpha target is cleared, the flat interior
//!    triangles toggle it between 0 and 1 (so overlapping triangles cancel
//!    pairwise), then every curve triangle adds its analytic coverage.
//! 2. Stencil: with color writes off, the same triangles invert the stencil.
//!    The wide pass flips both low bits for every covered fragment, the
//!    narrow pass flips bit 0 again for fully covered fragments only. Bit 1
//!    ends up holding the interior parity and bit 0 marks fragments on an
//!    anti-aliased curve edge.
//! 3. Composite: one canvas sized quad samples the alpha target, tinted by
//!    the fill color, where bit 1 of the stencil is set.
//!
//! A curve bulging into the shape is cut out of the flat interior by routing
//! the outline through its control point, and its triangle covers the
//! control point side of the curve instead. Either way the covered region
//! lies inside the shape, so its anti-aliased fringe keeps interior parity.

use log::{debug, trace, warn};

use crate::color::Color;
use crate::device::{Backend, Blend, Primitive, ProgramKind, StencilState, TargetId, Usage};
use crate::error::Result;
use crate::geom::bezier::QuadraticCurve;
use crate::geom::path::Path;
use crate::geom::point::Point;
use crate::render::canvas::Canvas;
use crate::render::context::{DrawConfig, RenderContext};
use crate::render::target::BoundTarget;

/// Stencil bits flipped by the first winding pass.
pub const WIDE_MASK: u8 = 0b11;
/// Stencil bits flipped by the opaque-only winding pass.
pub const NARROW_MASK: u8 = 0b01;
/// Stencil bit holding interior parity.
pub const INTERIOR_BIT: u8 = 0b10;

/// How far towards the control point, as a fraction of the distance from the
/// chord midpoint, the outline is sampled to tell which side of a curve is inside.
const BULGE_NUDGE: f32 = 1e-2;

/// Texture coordinates of a curve triangle's start, control and end point.
const CURVE_TEXCOORDS: [[f32; 2]; 3] = [[0.0, 0.0], [0.5, 0.0], [1.0, 1.0]];

/// Triangle strip over the whole canvas, `texcoord` flipped to texture space.
#[rustfmt::skip]
const CANVAS_QUAD: [f32; 16] = [
    0.0, 0.0, 0.0, 1.0,
    1.0, 0.0, 1.0, 1.0,
    0.0, 1.0, 0.0, 0.0,
    1.0, 1.0, 1.0, 0.0,
];

/// Geometry shared by the silhouette and stencil stages.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Workload {
    /// `position, texcoord` per vertex, three vertices per curve. Curves
    /// bulging out of the shape come first.
    pub curve_vertices: Vec<f32>,
    /// Vertex index of the first curve bulging into the shape.
    pub inward_start: usize,
    /// `position` per flat outline point.
    pub flat_vertices: Vec<f32>,
    pub flat_indices: Vec<u32>,
}

impl Workload {
    /// `outline[i]` must be the start of the `i`th quadratic of `path`, as
    /// produced by [`Path::outline`].
    pub fn build<B: Backend>(canvas: &Canvas<B>, path: &Path, outline: &[Point]) -> Self {
        let quads: Vec<&QuadraticCurve> = path
            .segments()
            .iter()
            .flat_map(|s| s.quadratics())
            .collect();

        let mut outward = Vec::new();
        let mut inward = Vec::new();
        let mut flat_outline = Vec::with_capacity(outline.len());
        for (i, p) in outline.iter().enumerate() {
            flat_outline.push(*p);
            let Some(quad) = quads.get(i).filter(|q| !q.is_degenerate()) else {
                continue;
            };
            if bulges_inward(quad, outline) {
                flat_outline.push(quad.control());
                push_curve(canvas, quad, &mut inward);
            } else {
                push_curve(canvas, quad, &mut outward);
            }
        }
        let inward_start = outward.len() / 4;
        let mut curve_vertices = outward;
        curve_vertices.append(&mut inward);

        let flat_vertices = flat_outline
            .iter()
            .flat_map(|p| canvas.to_clip(*p))
            .collect();
        let flat_indices = match canvas.triangulator.triangulate(&flat_outline) {
            Ok(indices) => indices,
            Err(e) => {
                warn!(
                    "no flat interior for {} point outline: {}",
                    flat_outline.len(),
                    e
                );
                Vec::new()
            }
        };

        Workload {
            curve_vertices,
            inward_start,
            flat_vertices,
            flat_indices,
        }
    }

    pub fn curve_vertex_count(&self) -> usize {
        self.curve_vertices.len() / 4
    }
}

fn push_curve<B: Backend>(canvas: &Canvas<B>, quad: &QuadraticCurve, out: &mut Vec<f32>) {
    for (p, tex) in quad.points().iter().zip(CURVE_TEXCOORDS) {
        out.extend_from_slice(&canvas.to_clip(*p));
        out.extend_from_slice(&tex);
    }
}

/// Whether the region between the chord and the control point of `quad` is
/// inside `outline`.
fn bulges_inward(quad: &QuadraticCurve, outline: &[Point]) -> bool {
    let mid = quad.start().mid(&quad.end());
    let sample = mid + (quad.control() - mid) * BULGE_NUDGE;
    even_odd_contains(outline, sample)
}

/// Even-odd point in polygon test by ray casting towards `+x`.
fn even_odd_contains(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    (0..n).fold(false, |inside, i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a.y() > p.y()) == (b.y() > p.y()) {
            return inside;
        }
        let x = a.x() + (p.y() - a.y()) * (b.x() - a.x()) / (b.y() - a.y());
        if p.x() < x {
            !inside
        } else {
            inside
        }
    })
}

/// Fill `path` with `color` using the silhouette, stencil and composite stages.
///
/// A path with fewer than three distinct endpoints draws nothing.
pub fn fill<B: Backend>(canvas: &mut Canvas<B>, path: &Path, color: Color) -> Result<()> {
    let tolerance = canvas.config().endpoint_tolerance;
    let Some(outline) = path.outline(tolerance) else {
        debug!(
            "skip fill: {} endpoints after closing dedup",
            path.fill_endpoints(tolerance).len()
        );
        return Ok(());
    };
    let workload = Workload::build(canvas, path, &outline);
    debug!(
        "fill: {} curve triangles ({} inward), {} flat triangles",
        workload.curve_vertex_count() / 3,
        (workload.curve_vertex_count() - workload.inward_start) / 3,
        workload.flat_indices.len() / 3
    );

    let blend = canvas.config().composite_blend;
    let Canvas {
        backend,
        context,
        target,
        ..
    } = canvas;
    silhouette_stage(backend, context, *target, &workload)?;
    stencil_stage(backend, context, &workload)?;
    composite_stage(backend, context, *target, color, blend)
}

fn draw_flat<B: Backend + ?Sized>(
    backend: &mut B,
    context: &mut RenderContext,
    workload: &Workload,
    upload: bool,
) -> Result<()> {
    if workload.flat_indices.is_empty() {
        return Ok(());
    }
    context.activate(backend, ProgramKind::Flat)?;
    if upload {
        backend.upload_vertices(&workload.flat_vertices, Usage::Stream)?;
        backend.upload_indices(&workload.flat_indices, Usage::Stream)?;
    }
    backend.draw_indexed(Primitive::Triangles, workload.flat_indices.len())
}

fn draw_curves<B: Backend + ?Sized>(
    backend: &mut B,
    context: &mut RenderContext,
    workload: &Workload,
    exclude_translucent: bool,
    upload: bool,
) -> Result<()> {
    let total = workload.curve_vertex_count();
    if total == 0 {
        return Ok(());
    }
    let split = workload.inward_start;
    context.activate(backend, ProgramKind::Curve)?;
    context.configure(backend, DrawConfig::ExcludeTranslucent(exclude_translucent))?;
    if upload {
        backend.upload_vertices(&workload.curve_vertices, Usage::Stream)?;
    }
    if split > 0 {
        context.configure(backend, DrawConfig::InvertCoverage(false))?;
        backend.draw(Primitive::Triangles, split)?;
    }
    if total > split {
        context.configure(backend, DrawConfig::InvertCoverage(true))?;
        backend.draw_range(Primitive::Triangles, split, total - split)?;
    }
    Ok(())
}

fn silhouette_stage<B: Backend>(
    backend: &mut B,
    context: &mut RenderContext,
    target: TargetId,
    workload: &Workload,
) -> Result<()> {
    trace!("silhouette stage");
    let mut bound = BoundTarget::bind(backend, target)?;
    bound.set_stencil(None)?;
    bound.set_color_mask(true)?;
    bound.clear_color(Color::TRANSPARENT)?;
    bound.set_blend(Some(Blend::TOGGLE))?;
    draw_flat(&mut *bound, context, workload, true)?;
    bound.set_blend(Some(Blend::ADDITIVE))?;
    draw_curves(&mut *bound, context, workload, false, true)
}

fn stencil_stage<B: Backend>(
    backend: &mut B,
    context: &mut RenderContext,
    workload: &Workload,
) -> Result<()> {
    trace!("stencil stage");
    backend.set_color_mask(false)?;
    backend.set_blend(None)?;
    backend.clear_stencil(0)?;

    backend.set_stencil(Some(StencilState::invert(WIDE_MASK)))?;
    draw_flat(backend, context, workload, false)?;
    draw_curves(backend, context, workload, false, false)?;

    backend.set_stencil(Some(StencilState::invert(NARROW_MASK)))?;
    draw_flat(backend, context, workload, false)?;
    draw_curves(backend, context, workload, true, false)
}

fn composite_stage<B: Backend>(
    backend: &mut B,
    context: &mut RenderContext,
    target: TargetId,
    color: Color,
    blend: Blend,
) -> Result<()> {
    trace!("composite stage");
    backend.set_color_mask(true)?;
    backend.set_stencil(Some(StencilState::equal(INTERIOR_BIT, INTERIOR_BIT)))?;
    backend.set_blend(Some(blend))?;
    context.activate(backend, ProgramKind::Composite)?;
    context.configure(backend, DrawConfig::FillColor(color))?;
    backend.bind_texture(target)?;
    backend.upload_vertices(&CANVAS_QUAD, Usage::Static)?;
    backend.draw(Primitive::TriangleStrip, 4)?;
    backend.set_stencil(None)
}
