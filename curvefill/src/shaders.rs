//! Default GLSL sources for the three fill programs.
//!
//! Positions arrive normalized to `0.0..=1.0` with `y` pointing down, the
//! vertex shaders map them to clip space.

use crate::device::ProgramKind;

pub const POSITION_VERTEX: &str = r#"#version 150
in vec2 position;
void main() {
    gl_Position = vec4(position.x * 2.0 - 1.0, 1.0 - position.y * 2.0, 0.0, 1.0);
}
"#;

pub const TEXTURED_VERTEX: &str = r#"#version 150
in vec2 position;
in vec2 texcoord;
out vec2 Texcoord;
void main() {
    Texcoord = texcoord;
    gl_Position = vec4(position.x * 2.0 - 1.0, 1.0 - position.y * 2.0, 0.0, 1.0);
}
"#;

/// Coverage of `s² - t < 0` (or of `s² - t > 0` with `invertCoverage`),
/// anti-aliased over one pixel of signed distance.
pub const CURVE_FRAGMENT: &str = r#"#version 150
in vec2 Texcoord;
uniform int excludeTrans;
uniform int invertCoverage;
out vec4 outColor;
void main() {
    vec2 px = dFdx(Texcoord);
    vec2 py = dFdy(Texcoord);
    float f = Texcoord.x * Texcoord.x - Texcoord.y;
    if (invertCoverage == 1) {
        f = -f;
    }
    vec2 grad = vec2(2.0 * Texcoord.x * px.x - px.y, 2.0 * Texcoord.x * py.x - py.y);
    float alpha = clamp(0.5 - f / length(grad), 0.0, 1.0);
    if (alpha <= 0.0 || (excludeTrans == 1 && alpha < 1.0)) {
        discard;
    }
    outColor = vec4(alpha);
}
"#;

pub const FLAT_FRAGMENT: &str = r#"#version 150
out vec4 outColor;
void main() {
    outColor = vec4(1.0);
}
"#;

pub const COMPOSITE_FRAGMENT: &str = r#"#version 150
in vec2 Texcoord;
uniform vec4 color;
uniform sampler2D mask;
out vec4 outColor;
void main() {
    float coverage = texture(mask, Texcoord).r;
    outColor = vec4(color.rgb, color.a * coverage);
}
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPair {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderPair {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        ShaderPair {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
        }
    }
}

/// Vertex and fragment sources for every fill program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    pub curve: ShaderPair,
    pub flat: ShaderPair,
    pub composite: ShaderPair,
}

impl ShaderSet {
    pub fn get(&self, kind: ProgramKind) -> &ShaderPair {
        match kind {
            ProgramKind::Curve => &self.curve,
            ProgramKind::Flat => &self.flat,
            ProgramKind::Composite => &self.composite,
        }
    }
}

impl Default for ShaderSet {
    fn default() -> Self {
        ShaderSet {
            curve: ShaderPair::new(TEXTURED_VERTEX, CURVE_FRAGMENT),
            flat: ShaderPair::new(POSITION_VERTEX, FLAT_FRAGMENT),
            composite: ShaderPair::new(TEXTURED_VERTEX, COMPOSITE_FRAGMENT),
        }
    }
}
