use log::debug;

use crate::color::Color;
use crate::config::RenderConfig;
use crate::device::{Backend, TargetId};
use crate::error::{RenderError, Result};
use crate::geom::point::Point;
use crate::render::context::RenderContext;
use crate::shaders::ShaderSet;
use crate::triangulate::{FanTriangulator, Triangulator};

/// A drawing surface of `width` x `height` device pixels.
///
/// Owns the backend, the fill programs and one single-channel offscreen
/// target of the same size, allocated here and reused by every fill.
pub struct Canvas<B: Backend> {
    pub(crate) backend: B,
    pub(crate) context: RenderContext,
    pub(crate) target: TargetId,
    pub(crate) triangulator: Box<dyn Triangulator>,
    width: u32,
    height: u32,
    config: RenderConfig,
}

impl<B: Backend> Canvas<B> {
    pub fn new(backend: B, width: u32, height: u32) -> Result<Self> {
        Canvas::with_shaders(
            backend,
            width,
            height,
            &ShaderSet::default(),
            RenderConfig::default(),
        )
    }

    pub fn with_shaders(
        mut backend: B,
        width: u32,
        height: u32,
        shaders: &ShaderSet,
        config: RenderConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::Target(format!(
                "canvas size {width}x{height} is empty"
            )));
        }
        let context = RenderContext::new(&mut backend, shaders)?;
        let target = backend.create_alpha_target(width, height)?;
        debug!("canvas {}x{} with alpha target {:?}", width, height, target);
        Ok(Canvas {
            backend,
            context,
            target,
            triangulator: Box::new(FanTriangulator),
            width,
            height,
            config,
        })
    }

    /// Replace the default [`FanTriangulator`].
    ///
    /// The flat outline may self-intersect, so the triangulator must cover it
    /// with the right parity. `EarcutTriangulator` only does so for simple
    /// outlines.
    pub fn with_triangulator<T: Triangulator + 'static>(mut self, triangulator: T) -> Self {
        self.triangulator = Box::new(triangulator);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Device pixels to the normalized `0.0..=1.0` space the vertex shaders expect.
    pub fn to_clip(&self, p: Point) -> [f32; 2] {
        [p.x() / self.width as f32, p.y() / self.height as f32]
    }

    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.backend.set_color_mask(true)?;
        self.backend.clear_color(color)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::trace::{Call, TraceBackend};
    use crate::device::ProgramKind;

    #[test]
    fn test_new_allocates_programs_and_target() {
        let canvas = Canvas::new(TraceBackend::new(), 640, 480).unwrap();
        let kinds: Vec<ProgramKind> = canvas
            .backend()
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::CreateProgram(kind, _) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![ProgramKind::Curve, ProgramKind::Flat, ProgramKind::Composite]
        );
        let targets = canvas
            .backend()
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateTarget(640, 480, _)))
            .count();
        assert_eq!(targets, 1);
    }

    #[test]
    fn test_to_clip() {
        let canvas = Canvas::new(TraceBackend::new(), 200, 100).unwrap();
        assert_eq!(canvas.to_clip(Point::new(50.0, 50.0)), [0.25, 0.5]);
        assert_eq!(canvas.to_clip(Point::new(200.0, 0.0)), [1.0, 0.0]);
    }

    #[test]
    fn test_fill_leaves_composite_program_active() {
        let mut canvas = Canvas::new(TraceBackend::new(), 100, 100).unwrap();
        assert_eq!(canvas.context().active(), None);
        crate::Path::start_at(Point::new(10.0, 10.0))
            .line_to(Point::new(90.0, 10.0))
            .line_to(Point::new(50.0, 90.0))
            .fill(&mut canvas, Color::BLACK)
            .unwrap();
        let composite = canvas.context().drawer(ProgramKind::Composite).program;
        assert_eq!(canvas.context().active(), Some(composite));
    }

    #[test]
    fn test_empty_canvas_is_rejected() {
        assert!(Canvas::new(TraceBackend::new(), 0, 10).is_err());
    }
}
