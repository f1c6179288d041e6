//! CPU scalar field + marching-cubes extraction.
//!
//! The field covers world space `[-1, 1]^3` with `resolution^3` samples. Each
//! contributor adds `strength / (1e-6 + d^2) - subtract` (clipped at zero) where
//! `d` is measured in field units (`[0, 1]` across the grid). The surface is the
//! level set at `isolation`. Nothing survives between frames: callers `reset`,
//! re-add every contributor, then `polygonize`.

use bevy::color::LinearRgba;
use bevy::math::Vec3;

use super::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, NONE, TRI_TABLE};
use crate::core::components::Contributor;

/// Smallest grid the extraction loop can walk (it skips a one-voxel border).
pub const MIN_RESOLUTION: usize = 4;

/// Non-indexed triangle soup produced by [`IsosurfaceField::polygonize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Empty when colours are disabled on the field.
    pub colors: Vec<[f32; 4]>,
    /// Set when triangles were dropped to honour the polygon budget.
    pub truncated: bool,
}

impl FieldMesh {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IsosurfaceField {
    size: usize,
    max_poly_count: usize,
    isolation: f32,
    enable_colors: bool,
    values: Vec<f32>,
    palette: Vec<Vec3>,
}

/// Maps a world position in `[-1, 1]^3` to field coordinates in `[0, 1]^3`.
#[inline]
pub fn world_to_field(p: Vec3) -> Vec3 {
    Vec3::splat(0.5) + p * 0.5
}

/// Quintic smoothstep on `[0, 1]`.
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

impl IsosurfaceField {
    pub fn new(resolution: usize, max_poly_count: usize, isolation: f32) -> Self {
        let size = resolution.max(MIN_RESOLUTION);
        let cells = size * size * size;
        Self {
            size,
            max_poly_count,
            isolation,
            enable_colors: true,
            values: vec![0.0; cells],
            palette: vec![Vec3::ZERO; cells],
        }
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.enable_colors = enabled;
        self
    }

    pub fn resolution(&self) -> usize {
        self.size
    }

    pub fn max_poly_count(&self) -> usize {
        self.max_poly_count
    }

    pub fn isolation(&self) -> f32 {
        self.isolation
    }

    pub fn colors_enabled(&self) -> bool {
        self.enable_colors
    }

    pub fn set_max_poly_count(&mut self, max_poly_count: usize) {
        self.max_poly_count = max_poly_count;
    }

    pub fn set_isolation(&mut self, isolation: f32) {
        self.isolation = isolation;
    }

    pub fn set_colors(&mut self, enabled: bool) {
        self.enable_colors = enabled;
    }

    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.palette.fill(Vec3::ZERO);
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size + z * self.size * self.size
    }

    pub fn value_at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[self.index(x, y, z)]
    }

    /// Adds one point source. `center` is in field coordinates (`[0, 1]^3`).
    /// A negative `strength` carves the field instead of filling it.
    pub fn add_ball(&mut self, center: Vec3, strength: f32, subtract: f32, color: LinearRgba) {
        let sign = strength.signum();
        let strength = strength.abs();
        if strength == 0.0 || subtract <= 0.0 {
            return;
        }
        let size = self.size as f32;
        let radius = size * (strength / subtract).sqrt();
        let scaled = center * size;
        let upper = self.size as isize - 1;
        let span = |c: f32| {
            let lo = ((c - radius).floor() as isize).clamp(1, upper) as usize;
            let hi = ((c + radius).floor() as isize).clamp(1, upper) as usize;
            lo..hi
        };
        let tint = Vec3::new(color.red, color.green, color.blue);

        for z in span(scaled.z) {
            let fz = z as f32 / size - center.z;
            let fz2 = fz * fz;
            for y in span(scaled.y) {
                let fy = y as f32 / size - center.y;
                let fy2 = fy * fy;
                for x in span(scaled.x) {
                    let fx = x as f32 / size - center.x;
                    let val = strength / (1e-6 + fx * fx + fy2 + fz2) - subtract;
                    if val <= 0.0 {
                        continue;
                    }
                    let idx = self.index(x, y, z);
                    self.values[idx] += val * sign;
                    if self.enable_colors {
                        let ratio = (Vec3::new(x as f32, y as f32, z as f32) - scaled).length()
                            / radius;
                        self.palette[idx] += tint * (1.0 - smootherstep(ratio.min(1.0)));
                    }
                }
            }
        }
    }

    /// Adds a contributor located at `world` (world space, `[-1, 1]^3` covers the grid).
    pub fn add_contributor(&mut self, world: Vec3, contributor: &Contributor) {
        self.add_ball(
            world_to_field(world),
            contributor.strength,
            contributor.subtract,
            contributor.color,
        );
    }

    /// Clears the field, accumulates every contributor and extracts the surface.
    pub fn rebuild<'a, I>(&mut self, contributors: I) -> FieldMesh
    where
        I: IntoIterator<Item = (Vec3, &'a Contributor)>,
    {
        self.reset();
        for (world, contributor) in contributors {
            self.add_contributor(world, contributor);
        }
        self.polygonize()
    }

    fn gradient(&self, x: usize, y: usize, z: usize) -> Vec3 {
        // Points toward decreasing field, i.e. out of the surface.
        Vec3::new(
            self.value_at(x - 1, y, z) - self.value_at(x + 1, y, z),
            self.value_at(x, y - 1, z) - self.value_at(x, y + 1, z),
            self.value_at(x, y, z - 1) - self.value_at(x, y, z + 1),
        )
    }

    /// Extracts the isosurface as a triangle soup in world space. Deterministic for
    /// a given field state; stops emitting once `max_poly_count` triangles exist.
    pub fn polygonize(&self) -> FieldMesh {
        let mut mesh = FieldMesh::default();
        let n = self.size;
        let half = n as f32 / 2.0;
        let iso = self.isolation;

        'cells: for z in 1..n - 2 {
            for y in 1..n - 2 {
                for x in 1..n - 2 {
                    let mut corners = [[0usize; 3]; 8];
                    let mut values = [0.0f32; 8];
                    let mut cube = 0usize;
                    for (i, off) in CORNER_OFFSETS.iter().enumerate() {
                        let c = [x + off[0], y + off[1], z + off[2]];
                        let v = self.value_at(c[0], c[1], c[2]);
                        if v < iso {
                            cube |= 1 << i;
                        }
                        corners[i] = c;
                        values[i] = v;
                    }
                    let edges = EDGE_TABLE[cube];
                    if edges == 0 {
                        continue;
                    }

                    let mut edge_pos = [Vec3::ZERO; 12];
                    let mut edge_nrm = [Vec3::ZERO; 12];
                    let mut edge_col = [Vec3::ZERO; 12];
                    for (e, &(a, b)) in EDGE_CORNERS.iter().enumerate() {
                        if edges & (1 << e) == 0 {
                            continue;
                        }
                        let t = crossing(iso, values[a], values[b]);
                        let [ax, ay, az] = corners[a];
                        let [bx, by, bz] = corners[b];
                        let pa = Vec3::new(ax as f32, ay as f32, az as f32);
                        let pb = Vec3::new(bx as f32, by as f32, bz as f32);
                        edge_pos[e] = (pa.lerp(pb, t) - Vec3::splat(half)) / half;
                        edge_nrm[e] = self.gradient(ax, ay, az).lerp(self.gradient(bx, by, bz), t);
                        if self.enable_colors {
                            let ca = self.palette[self.index(ax, ay, az)];
                            let cb = self.palette[self.index(bx, by, bz)];
                            edge_col[e] = ca.lerp(cb, t);
                        }
                    }

                    for tri in TRI_TABLE[cube].chunks_exact(3) {
                        if tri[0] == NONE {
                            break;
                        }
                        if mesh.triangle_count() >= self.max_poly_count {
                            mesh.truncated = true;
                            break 'cells;
                        }
                        let [i0, mut i1, mut i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                        let face = (edge_pos[i1] - edge_pos[i0]).cross(edge_pos[i2] - edge_pos[i0]);
                        if face.dot(edge_nrm[i0] + edge_nrm[i1] + edge_nrm[i2]) < 0.0 {
                            std::mem::swap(&mut i1, &mut i2);
                        }
                        let face_n = (edge_pos[i1] - edge_pos[i0])
                            .cross(edge_pos[i2] - edge_pos[i0])
                            .normalize_or_zero();
                        for i in [i0, i1, i2] {
                            mesh.positions.push(edge_pos[i].to_array());
                            let nrm = edge_nrm[i].try_normalize().unwrap_or(face_n);
                            mesh.normals.push(nrm.to_array());
                            if self.enable_colors {
                                mesh.colors.push(vertex_color(edge_col[i]));
                            }
                        }
                    }
                }
            }
        }
        mesh
    }
}

#[inline]
fn crossing(iso: f32, a: f32, b: f32) -> f32 {
    let denom = b - a;
    if denom.abs() < 1e-6 {
        0.5
    } else {
        ((iso - a) / denom).clamp(0.0, 1.0)
    }
}

/// Overlapping contributors can push the blended colour past 1; scale it back so
/// the brightest channel is 1 and hue is preserved.
#[inline]
fn vertex_color(c: Vec3) -> [f32; 4] {
    let peak = c.max_element();
    let c = if peak > 1.0 { c / peak } else { c };
    [c.x, c.y, c.z, 1.0]
}
