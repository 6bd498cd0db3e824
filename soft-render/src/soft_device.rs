use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use log::debug;

use curvefill::{
    color::Color,
    device::{
        Backend, Blend, Primitive, ProgramDesc, ProgramId, ProgramKind, StencilState, TargetId,
        UniformValue, Usage,
    },
    error::{RenderError, Result},
};

use crate::raster::{self, Fragment, Vertex};
use crate::shading::{self, AlphaTarget};

#[derive(Debug, Clone)]
struct Program {
    kind: ProgramKind,
    uniforms: HashMap<String, UniformValue>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

/// Software rasterizer with an RGBA framebuffer and an 8-bit stencil buffer.
///
/// Vertex positions are taken as normalized `0.0..=1.0` coordinates of the
/// current surface (framebuffer or bound target), `y` pointing down. The
/// stencil buffer belongs to the framebuffer only; offscreen targets have
/// none.
#[derive(Debug, Clone)]
pub struct SoftBackend {
    width: usize,
    height: usize,
    color: Vec<[f32; 4]>,
    stencil: Vec<u8>,
    programs: Vec<Program>,
    targets: Vec<AlphaTarget>,
    active: Option<usize>,
    bound: Option<usize>,
    texture: Option<usize>,
    color_mask: bool,
    stencil_state: Option<StencilState>,
    blend: Option<Blend>,
}

impl SoftBackend {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        SoftBackend {
            width,
            height,
            color: vec![[0.0; 4]; width * height],
            stencil: vec![0; width * height],
            programs: Vec::new(),
            targets: Vec::new(),
            active: None,
            bound: None,
            texture: None,
            color_mask: true,
            stencil_state: None,
            blend: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.color[y * self.width + x]
    }

    pub fn stencil_at(&self, x: usize, y: usize) -> u8 {
        self.stencil[y * self.width + x]
    }

    pub fn target(&self, id: TargetId) -> Option<&AlphaTarget> {
        self.targets.get(id.0 as usize)
    }

    /// The framebuffer as 8-bit straight RGBA.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixel(x as usize, y as usize);
            Rgba(px.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
        })
    }

    fn active_program(&self) -> Result<&Program> {
        self.active
            .and_then(|i| self.programs.get(i))
            .ok_or_else(|| RenderError::Backend("no active program".to_string()))
    }

    fn active_program_mut(&mut self) -> Result<&mut Program> {
        self.active
            .and_then(|i| self.programs.get_mut(i))
            .ok_or_else(|| RenderError::Backend("no active program".to_string()))
    }

    fn surface_size(&self) -> (usize, usize) {
        match self.bound {
            Some(t) => (self.targets[t].width, self.targets[t].height),
            None => (self.width, self.height),
        }
    }

    fn fetch(&self, program: &Program, index: usize) -> Result<Vertex> {
        let stride = program.kind.layout().stride();
        let start = index * stride;
        let data = program
            .vertices
            .get(start..start + stride)
            .ok_or_else(|| {
                RenderError::Backend(format!(
                    "vertex {index} out of range, buffer holds {} floats",
                    program.vertices.len()
                ))
            })?;
        let var = if stride == 4 {
            [data[2], data[3]]
        } else {
            [0.0; 2]
        };
        Ok(Vertex {
            pos: [data[0], data[1]],
            var,
        })
    }

    fn assemble(&mut self, primitive: Primitive, order: Vec<usize>) -> Result<()> {
        let program = self.active_program()?;
        let kind = program.kind;
        let uniforms = program.uniforms.clone();
        let vertices = order
            .iter()
            .map(|i| self.fetch(program, *i))
            .collect::<Result<Vec<Vertex>>>()?;

        let triangles: Vec<[Vertex; 3]> = match primitive {
            Primitive::Triangles => vertices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            Primitive::TriangleStrip => vertices
                .windows(3)
                .enumerate()
                .map(|(i, t)| {
                    if i % 2 == 0 {
                        [t[0], t[1], t[2]]
                    } else {
                        [t[1], t[0], t[2]]
                    }
                })
                .collect(),
        };

        let (w, h) = self.surface_size();
        let mut fragments = Vec::new();
        for tri in triangles {
            let tri = tri.map(|v| Vertex {
                pos: [v.pos[0] * w as f32, v.pos[1] * h as f32],
                var: v.var,
            });
            raster::rasterize(tri, w, h, |f| fragments.push(f));
        }
        for frag in fragments.iter() {
            self.process(kind, &uniforms, frag);
        }
        Ok(())
    }

    fn process(
        &mut self,
        kind: ProgramKind,
        uniforms: &HashMap<String, UniformValue>,
        frag: &Fragment,
    ) {
        let texture = self.texture.and_then(|t| self.targets.get(t));
        let Some(src) = shading::shade(kind, frag, uniforms, texture) else {
            return;
        };

        match self.bound {
            Some(t) => {
                if !self.color_mask {
                    return;
                }
                let target = &mut self.targets[t];
                let i = frag.y * target.width + frag.x;
                let dst = target.data[i];
                target.data[i] = match self.blend {
                    Some(blend) => blend.apply(src, [dst; 4])[0],
                    None => src[0],
                };
            }
            None => {
                let i = frag.y * self.width + frag.x;
                if let Some(state) = self.stencil_state {
                    let value = self.stencil[i];
                    if !state.test(value) {
                        return;
                    }
                    self.stencil[i] = state.apply(value);
                }
                if self.color_mask {
                    let dst = self.color[i];
                    self.color[i] = match self.blend {
                        Some(blend) => blend.apply(src, dst),
                        None => src,
                    };
                }
            }
        }
    }
}

impl Backend for SoftBackend {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId> {
        let id = ProgramId(self.programs.len() as u32);
        debug!("soft program {:?} for {:?}", id, desc.kind);
        self.programs.push(Program {
            kind: desc.kind,
            uniforms: HashMap::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
        });
        Ok(id)
    }

    fn create_alpha_target(&mut self, width: u32, height: u32) -> Result<TargetId> {
        let id = TargetId(self.targets.len() as u32);
        self.targets.push(AlphaTarget::new(width as usize, height as usize));
        Ok(id)
    }

    fn activate(&mut self, program: ProgramId) -> Result<()> {
        let i = program.0 as usize;
        if i >= self.programs.len() {
            return Err(RenderError::Program(format!("unknown program {:?}", program)));
        }
        self.active = Some(i);
        Ok(())
    }

    fn upload_vertices(&mut self, data: &[f32], _usage: Usage) -> Result<()> {
        self.active_program_mut()?.vertices = data.to_vec();
        Ok(())
    }

    fn upload_indices(&mut self, data: &[u32], _usage: Usage) -> Result<()> {
        self.active_program_mut()?.indices = data.to_vec();
        Ok(())
    }

    fn set_uniform(&mut self, program: ProgramId, name: &str, value: UniformValue) -> Result<()> {
        let program = self
            .programs
            .get_mut(program.0 as usize)
            .ok_or_else(|| RenderError::Program(format!("unknown program {:?}", program)))?;
        program.uniforms.insert(name.to_string(), value);
        Ok(())
    }

    fn draw_range(&mut self, primitive: Primitive, first: usize, count: usize) -> Result<()> {
        self.assemble(primitive, (first..first + count).collect())
    }

    fn draw_indexed(&mut self, primitive: Primitive, count: usize) -> Result<()> {
        let indices = &self.active_program()?.indices;
        let order = indices
            .get(..count)
            .ok_or_else(|| {
                RenderError::Backend(format!(
                    "{count} indices requested, {} uploaded",
                    indices.len()
                ))
            })?
            .iter()
            .map(|i| *i as usize)
            .collect();
        self.assemble(primitive, order)
    }

    fn bind_target(&mut self, target: TargetId) -> Result<()> {
        let i = target.0 as usize;
        if i >= self.targets.len() {
            return Err(RenderError::Target(format!("unknown target {:?}", target)));
        }
        if self.texture == Some(i) {
            self.texture = None;
        }
        self.bound = Some(i);
        Ok(())
    }

    fn unbind_target(&mut self) -> Result<()> {
        self.bound = None;
        Ok(())
    }

    fn bind_texture(&mut self, target: TargetId) -> Result<()> {
        let i = target.0 as usize;
        if i >= self.targets.len() {
            return Err(RenderError::Target(format!("unknown target {:?}", target)));
        }
        self.texture = Some(i);
        Ok(())
    }

    fn clear_color(&mut self, color: Color) -> Result<()> {
        if !self.color_mask {
            return Ok(());
        }
        match self.bound {
            Some(t) => self.targets[t].data.fill(color.r),
            None => self.color.fill(color.to_array()),
        }
        Ok(())
    }

    fn clear_stencil(&mut self, value: u8) -> Result<()> {
        if self.bound.is_none() {
            self.stencil.fill(value);
        }
        Ok(())
    }

    fn set_color_mask(&mut self, enabled: bool) -> Result<()> {
        self.color_mask = enabled;
        Ok(())
    }

    fn set_stencil(&mut self, state: Option<StencilState>) -> Result<()> {
        self.stencil_state = state;
        Ok(())
    }

    fn set_blend(&mut self, blend: Option<Blend>) -> Result<()> {
        self.blend = blend;
        Ok(())
    }
}
