use log::trace;

use crate::color::Color;
use crate::device::{Backend, ProgramDesc, ProgramId, ProgramKind, UniformValue};
use crate::error::Result;
use crate::shaders::ShaderSet;

/// Uniform state pushed to a program right before it draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawConfig {
    /// Curve program only keeps fully covered fragments.
    ExcludeTranslucent(bool),
    /// Curve program covers the control point side of the curve.
    InvertCoverage(bool),
    FillColor(Color),
}

impl DrawConfig {
    pub fn name(&self) -> &'static str {
        match self {
            DrawConfig::ExcludeTranslucent(_) => "excludeTrans",
            DrawConfig::InvertCoverage(_) => "invertCoverage",
            DrawConfig::FillColor(_) => "color",
        }
    }

    pub fn value(&self) -> UniformValue {
        match self {
            DrawConfig::ExcludeTranslucent(on) | DrawConfig::InvertCoverage(on) => {
                UniformValue::Int(*on as i32)
            }
            DrawConfig::FillColor(color) => UniformValue::Vec4(color.to_array()),
        }
    }

    pub fn apply<B: Backend + ?Sized>(&self, program: ProgramId, backend: &mut B) -> Result<()> {
        backend.set_uniform(program, self.name(), self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawer {
    pub kind: ProgramKind,
    pub program: ProgramId,
}

impl Drawer {
    fn create<B: Backend + ?Sized>(
        backend: &mut B,
        kind: ProgramKind,
        shaders: &ShaderSet,
    ) -> Result<Self> {
        let pair = shaders.get(kind);
        let program = backend.create_program(&ProgramDesc {
            kind,
            vertex_source: pair.vertex.as_str(),
            fragment_source: pair.fragment.as_str(),
        })?;
        Ok(Drawer { kind, program })
    }
}

/// The active program and the uniform configs that follow it around.
///
/// A backend forgets per-program bindings when another program is
/// activated, so every activation rebinds the drawer and replays all
/// registered configs.
#[derive(Debug)]
pub struct RenderContext {
    curve: Drawer,
    flat: Drawer,
    composite: Drawer,
    active: Option<ProgramId>,
    configs: Vec<DrawConfig>,
}

impl RenderContext {
    pub fn new<B: Backend + ?Sized>(backend: &mut B, shaders: &ShaderSet) -> Result<Self> {
        Ok(RenderContext {
            curve: Drawer::create(backend, ProgramKind::Curve, shaders)?,
            flat: Drawer::create(backend, ProgramKind::Flat, shaders)?,
            composite: Drawer::create(backend, ProgramKind::Composite, shaders)?,
            active: None,
            configs: Vec::new(),
        })
    }

    pub fn drawer(&self, kind: ProgramKind) -> &Drawer {
        match kind {
            ProgramKind::Curve => &self.curve,
            ProgramKind::Flat => &self.flat,
            ProgramKind::Composite => &self.composite,
        }
    }

    pub fn active(&self) -> Option<ProgramId> {
        self.active
    }

    pub fn configs(&self) -> &[DrawConfig] {
        self.configs.as_slice()
    }

    pub fn activate<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        kind: ProgramKind,
    ) -> Result<ProgramId> {
        let program = self.drawer(kind).program;
        backend.activate(program)?;
        self.active = Some(program);
        trace!("activated {:?} program {:?}", kind, program);
        for config in self.configs.iter() {
            config.apply(program, backend)?;
        }
        Ok(program)
    }

    /// Register `config` (replacing one of the same kind) and push it to the active program.
    ///
    /// # Panics
    ///
    /// If no program has been activated yet.
    pub fn configure<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        config: DrawConfig,
    ) -> Result<()> {
        let program = self
            .active
            .expect("draw config applied without an active program");
        match self.configs.iter_mut().find(|c| c.name() == config.name()) {
            Some(slot) => *slot = config,
            None => self.configs.push(config),
        }
        config.apply(program, backend)
    }
}
