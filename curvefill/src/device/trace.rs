use std::fmt::Write;

use crate::{
    color::Color,
    device::{
        Backend, Blend, Primitive, ProgramDesc, ProgramId, ProgramKind, StencilState, TargetId,
        UniformValue, Usage,
    },
    error::{RenderError, Result},
};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(ProgramKind, ProgramId),
    CreateTarget(u32, u32, TargetId),
    Activate(ProgramId),
    UploadVertices(Vec<f32>),
    UploadIndices(Vec<u32>),
    Uniform(ProgramId, String, UniformValue),
    Draw(Primitive, usize),
    DrawRange(Primitive, usize, usize),
    DrawIndexed(Primitive, usize),
    BindTarget(TargetId),
    UnbindTarget,
    BindTexture(TargetId),
    ClearColor(Color),
    ClearStencil(u8),
    ColorMask(bool),
    Stencil(Option<StencilState>),
    Blend(Option<Blend>),
}

impl Call {
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Call::Draw(..) | Call::DrawRange(..) | Call::DrawIndexed(..)
        )
    }
}

/// Backend that draws nothing and records every call.
#[derive(Debug, Default)]
pub struct TraceBackend {
    calls: Vec<Call>,
    programs: u32,
    targets: u32,
    draws: usize,
    fail_draw: Option<usize>,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`th draw call (counting from zero) return an error.
    pub fn failing_at_draw(n: usize) -> Self {
        TraceBackend {
            fail_draw: Some(n),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> &[Call] {
        self.calls.as_slice()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_draw()).count()
    }

    pub fn content(&self) -> String {
        let mut res = String::new();
        for (i, call) in self.calls.iter().enumerate() {
            // writing into a String cannot fail
            let _ = writeln!(res, "{i:>5} {call:?}");
        }
        res
    }

    fn record_draw(&mut self, call: Call) -> Result<()> {
        let n = self.draws;
        self.draws += 1;
        self.calls.push(call);
        if self.fail_draw == Some(n) {
            return Err(RenderError::Backend(format!("trace: draw {n} rejected")));
        }
        Ok(())
    }
}

impl Backend for TraceBackend {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId> {
        let id = ProgramId(self.programs);
        self.programs += 1;
        self.calls.push(Call::CreateProgram(desc.kind, id));
        Ok(id)
    }

    fn create_alpha_target(&mut self, width: u32, height: u32) -> Result<TargetId> {
        let id = TargetId(self.targets);
        self.targets += 1;
        self.calls.push(Call::CreateTarget(width, height, id));
        Ok(id)
    }

    fn activate(&mut self, program: ProgramId) -> Result<()> {
        self.calls.push(Call::Activate(program));
        Ok(())
    }

    fn upload_vertices(&mut self, data: &[f32], _usage: Usage) -> Result<()> {
        self.calls.push(Call::UploadVertices(data.to_vec()));
        Ok(())
    }

    fn upload_indices(&mut self, data: &[u32], _usage: Usage) -> Result<()> {
        self.calls.push(Call::UploadIndices(data.to_vec()));
        Ok(())
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) -> Result<()> {
        self.calls.push(Call::Uniform(program, name.to_string(), value));
        Ok(())
    }

    fn draw(&mut self, primitive: Primitive, count: usize) -> Result<()> {
        self.record_draw(Call::Draw(primitive, count))
    }

    fn draw_range(&mut self, primitive: Primitive, first: usize, count: usize) -> Result<()> {
        self.record_draw(Call::DrawRange(primitive, first, count))
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: usize) -> Result<()> {
        self.record_draw(Call::DrawIndexed(primitive, count))
    }

    fn bind_target(&mut self, target: TargetId) -> Result<()> {
        self.calls.push(Call::BindTarget(target));
        Ok(())
    }

    fn unbind_target(&mut self) -> Result<()> {
        self.calls.push(Call::UnbindTarget);
        Ok(())
    }

    fn bind_texture(&mut self, target: TargetId) -> Result<()> {
        self.calls.push(Call::BindTexture(target));
        Ok(())
    }

    fn clear_color(&mut self, color: Color) -> Result<()> {
        self.calls.push(Call::ClearColor(color));
        Ok(())
    }

    fn clear_stencil(&mut self, value: u8) -> Result<()> {
        self.calls.push(Call::ClearStencil(value));
        Ok(())
    }

    fn set_color_mask(&mut self, enabled: bool) -> Result<()> {
        self.calls.push(Call::ColorMask(enabled));
        Ok(())
    }

    fn set_stencil(&mut self, state: Option<StencilState>) -> Result<()> {
        self.calls.push(Call::Stencil(state));
        Ok(())
    }

    fn set_blend(&mut self, blend: Option<Blend>) -> Result<()> {
        self.calls.push(Call::Blend(blend));
        Ok(())
    }
}
