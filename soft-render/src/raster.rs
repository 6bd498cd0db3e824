//! Triangle scan conversion with a top-left fill rule.

/// A vertex in window pixels with two interpolated values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub var: [f32; 2],
}

/// A covered pixel, its interpolated values and their screen-space derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    pub var: [f32; 2],
    pub dx: [f32; 2],
    pub dy: [f32; 2],
}

fn cross(u: [f32; 2], v: [f32; 2]) -> f32 {
    u[0] * v[1] - u[1] * v[0]
}

fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

/// Edge function of `u -> v` at `p`, computed from a fixed endpoint order so
/// a shared edge evaluates to exactly opposite values in both triangles.
fn edge(u: [f32; 2], v: [f32; 2], p: [f32; 2]) -> f32 {
    if (u[0], u[1]) > (v[0], v[1]) {
        -cross(sub(u, v), sub(p, v))
    } else {
        cross(sub(v, u), sub(p, u))
    }
}

/// Whether pixels exactly on the edge `u -> v` belong to the triangle.
fn owns_edge(u: [f32; 2], v: [f32; 2]) -> bool {
    let d = sub(v, u);
    d[1] > 0.0 || (d[1] == 0.0 && d[0] < 0.0)
}

/// Calls `emit` for every pixel whose center lies inside the triangle.
///
/// Degenerate triangles cover nothing. Pixels on an edge shared by two
/// triangles are emitted once.
pub fn rasterize<F>(tri: [Vertex; 3], width: usize, height: usize, mut emit: F)
where
    F: FnMut(Fragment),
{
    let [a, mut b, mut c] = tri;
    let mut area = cross(sub(b.pos, a.pos), sub(c.pos, a.pos));
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut b, &mut c);
        area = -area;
    }

    let mut dx = [0.0; 2];
    let mut dy = [0.0; 2];
    for i in 0..2 {
        let db = b.var[i] - a.var[i];
        let dc = c.var[i] - a.var[i];
        dx[i] = (db * (c.pos[1] - a.pos[1]) - dc * (b.pos[1] - a.pos[1])) / area;
        dy[i] = (dc * (b.pos[0] - a.pos[0]) - db * (c.pos[0] - a.pos[0])) / area;
    }

    let min_x = a.pos[0].min(b.pos[0]).min(c.pos[0]).floor().max(0.0) as usize;
    let min_y = a.pos[1].min(b.pos[1]).min(c.pos[1]).floor().max(0.0) as usize;
    let max_x = (a.pos[0].max(b.pos[0]).max(c.pos[0]).ceil().max(0.0) as usize).min(width);
    let max_y = (a.pos[1].max(b.pos[1]).max(c.pos[1]).ceil().max(0.0) as usize).min(height);

    let edges = [(a.pos, b.pos), (b.pos, c.pos), (c.pos, a.pos)];
    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = [x as f32 + 0.5, y as f32 + 0.5];
            let inside = edges.iter().all(|(u, v)| {
                let w = edge(*u, *v, p);
                w > 0.0 || (w == 0.0 && owns_edge(*u, *v))
            });
            if !inside {
                continue;
            }
            let off = sub(p, a.pos);
            let var = [
                a.var[0] + dx[0] * off[0] + dy[0] * off[1],
                a.var[1] + dx[1] * off[0] + dy[1] * off[1],
            ];
            emit(Fragment { x, y, var, dx, dy });
        }
    }
}
