//! The graphics backend the compositor drives.
//!
//! A backend exposes a small GL-like surface: programs with a fixed vertex
//! layout, one vertex and one index buffer per program, uniforms, offscreen
//! single-channel targets, and the blend/stencil/color-mask state used by the
//! fill stages. All calls are synchronous and must come from the thread that
//! owns the graphics context.

pub mod trace;

use crate::color::Color;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// Which of the fill programs a shader pair implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Curve triangles, coverage from the implicit `s² - t` test.
    Curve,
    /// Flat interior triangles, full coverage.
    Flat,
    /// Full-canvas quad sampling the alpha mask.
    Composite,
}

impl ProgramKind {
    pub fn layout(&self) -> VertexLayout {
        match self {
            ProgramKind::Flat => VertexLayout::Position,
            ProgramKind::Curve | ProgramKind::Composite => VertexLayout::PositionTexcoord,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `position` (2 floats)
    Position,
    /// `position` then `texcoord` (2 + 2 floats)
    PositionTexcoord,
}

impl VertexLayout {
    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        match self {
            VertexLayout::Position => 2,
            VertexLayout::PositionTexcoord => 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgramDesc<'a> {
    pub kind: ProgramKind,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Static,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Vec4([f32; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilFunc {
    Always,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Invert,
}

/// Stencil test and update, applied to fragments that survive the fragment program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilState {
    pub func: StencilFunc,
    pub reference: u8,
    pub read_mask: u8,
    pub write_mask: u8,
    /// Applied where the stencil test passes.
    pub pass_op: StencilOp,
}

impl StencilState {
    /// Invert the bits in `write_mask` for every fragment drawn.
    pub fn invert(write_mask: u8) -> Self {
        StencilState {
            func: StencilFunc::Always,
            reference: 0,
            read_mask: 0xff,
            write_mask,
            pass_op: StencilOp::Invert,
        }
    }

    /// Pass where `stencil & mask == reference & mask`, leave the buffer untouched.
    pub fn equal(reference: u8, mask: u8) -> Self {
        StencilState {
            func: StencilFunc::Equal,
            reference,
            read_mask: mask,
            write_mask: 0,
            pass_op: StencilOp::Keep,
        }
    }

    pub fn test(&self, value: u8) -> bool {
        let r = self.reference & self.read_mask;
        let v = value & self.read_mask;
        match self.func {
            StencilFunc::Always => true,
            StencilFunc::Equal => r == v,
        }
    }

    pub fn apply(&self, value: u8) -> u8 {
        match self.pass_op {
            StencilOp::Keep => value,
            StencilOp::Invert => value ^ self.write_mask,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
    OneMinusDstAlpha,
    /// Per channel, `1 - dst`.
    OneMinusDstColor,
}

impl BlendFactor {
    pub fn weight(&self, src_alpha: f32, dst_alpha: f32, dst: f32) -> f32 {
        match self {
            BlendFactor::Zero => 0.0,
            BlendFactor::One => 1.0,
            BlendFactor::SrcAlpha => src_alpha,
            BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
            BlendFactor::OneMinusDstAlpha => 1.0 - dst_alpha,
            BlendFactor::OneMinusDstColor => 1.0 - dst,
        }
    }
}

/// `result = src * src_factor + dst * dst_factor`, clamped to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blend {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl Blend {
    pub const ADDITIVE: Blend = Blend {
        src: BlendFactor::One,
        dst: BlendFactor::One,
    };

    /// Writing 1.0 flips a 0.0/1.0 destination, so overlapping triangles cancel pairwise.
    pub const TOGGLE: Blend = Blend {
        src: BlendFactor::OneMinusDstColor,
        dst: BlendFactor::Zero,
    };

    /// Fill colors only where the destination is still transparent.
    pub const COMPOSITE: Blend = Blend {
        src: BlendFactor::OneMinusDstAlpha,
        dst: BlendFactor::Zero,
    };

    /// Regular source-over blending of straight colors.
    pub const OVER: Blend = Blend {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };

    pub fn apply(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        std::array::from_fn(|i| {
            let s = self.src.weight(src[3], dst[3], dst[i]);
            let d = self.dst.weight(src[3], dst[3], dst[i]);
            (src[i] * s + dst[i] * d).clamp(0.0, 1.0)
        })
    }
}

pub trait Backend {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId>;

    /// Allocate a single-channel render target, also usable as a texture.
    fn create_alpha_target(&mut self, width: u32, height: u32) -> Result<TargetId>;

    /// Bind the program, its vertex layout and its buffers.
    fn activate(&mut self, program: ProgramId) -> Result<()>;

    fn upload_vertices(&mut self, data: &[f32], usage: Usage) -> Result<()>;

    fn upload_indices(&mut self, data: &[u32], usage: Usage) -> Result<()>;

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) -> Result<()>;

    /// Draw `count` vertices of the active program's vertex buffer.
    fn draw(&mut self, primitive: Primitive, count: usize) -> Result<()> {
        self.draw_range(primitive, 0, count)
    }

    /// Draw `count` vertices starting at vertex `first`.
    fn draw_range(&mut self, primitive: Primitive, first: usize, count: usize) -> Result<()>;

    /// Draw `count` indices of the active program's index buffer.
    fn draw_indexed(&mut self, primitive: Primitive, count: usize) -> Result<()>;

    /// Redirect drawing into `target`.
    fn bind_target(&mut self, target: TargetId) -> Result<()>;

    /// Draw into the main framebuffer again.
    fn unbind_target(&mut self) -> Result<()>;

    fn bind_texture(&mut self, target: TargetId) -> Result<()>;

    /// Clear the bound target or the framebuffer.
    fn clear_color(&mut self, color: Color) -> Result<()>;

    fn clear_stencil(&mut self, value: u8) -> Result<()>;

    fn set_color_mask(&mut self, enabled: bool) -> Result<()>;

    /// `None` disables the stencil test.
    fn set_stencil(&mut self, state: Option<StencilState>) -> Result<()>;

    /// `None` disables blending.
    fn set_blend(&mut self, blend: Option<Blend>) -> Result<()>;
}
