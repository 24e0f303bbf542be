//! Outline extrusion.
//!
//! Turns a [`GlyphOutline`] into a closed, beveled solid:
//! 1. Flatten every contour into a polygon and normalize winding (boundary
//!    CCW, holes CW) so the right-hand normal of every edge points away from
//!    the solid.
//! 2. Move the polygons so the outline's X/Y bounding-box center sits at the
//!    origin.
//! 3. Walk a stack of layers from the front cap to the back cap. Each layer is
//!    a `(z, offset)` pair: the contours pushed outwards by `offset` along
//!    their miter directions. The bevel is a quarter circle in `(z, offset)`.
//! 4. Stitch consecutive layers into side quads and fill both caps with
//!    `lyon`'s fill tessellator.
//!
//! The output is a flat-shaded, non-indexed triangle list: each triangle owns
//! its three vertices and carries its face normal, which gives the faceted
//! crystal look the shading expects.

use std::f32::consts::FRAC_PI_2;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

use super::{Aabb2, GlyphOutline};
use crate::config::ExtrudeConfig;
use crate::error::SceneError;

/// Miter vectors are capped at `1 / MIN_MITER_COS` times the bevel size so
/// sharp corners (the apex of `A`, the valley of `M`) do not spike.
const MIN_MITER_COS: f32 = 0.25;

/// Interleaved vertex as uploaded to the GPU (attribute 0: position,
/// attribute 1: normal).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Non-indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct GlyphMesh {
    pub vertices: Vec<Vertex>,
}

impl GlyphMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Axis-aligned bounds of all vertex positions as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), v| {
                let p = Vec3::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Push a triangle with its face normal. Zero-area triangles are dropped.
    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let n = (b - a).cross(c - a);
        if n.length_squared() < 1e-14 {
            return;
        }
        let normal = n.normalize().to_array();
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                normal,
            });
        }
    }
}

/// Extruded glyph, centered on its outline bounds.
#[derive(Debug, Clone)]
pub struct GlyphSolid {
    pub name: &'static str,
    pub mesh: GlyphMesh,
    /// Bounds of the flattened, un-extruded outline in outline space.
    pub outline_bounds: Aabb2,
    /// Outline-space point that now sits at the local origin.
    pub center: Vec2,
}

/// One flattened contour after winding normalization and re-centering.
struct Ring {
    points: Vec<Vec2>,
    directions: Vec<Vec2>,
}

impl Ring {
    fn at(&self, i: usize, z: f32, offset: f32) -> Vec3 {
        let p = self.points[i] + self.directions[i] * offset;
        Vec3::new(p.x, p.y, z)
    }
}

/// Build the solid for `outline` with the given extrusion options.
pub fn build(outline: &GlyphOutline, config: &ExtrudeConfig) -> Result<GlyphSolid, SceneError> {
    let mut shape = outline.shape.flatten(config.curve_segments);
    if shape.len() < 3 {
        return Err(SceneError::DegenerateOutline(outline.name));
    }
    if signed_area(&shape) < 0.0 {
        shape.reverse();
    }

    let mut holes = Vec::with_capacity(outline.holes.len());
    for hole in &outline.holes {
        let mut pts = hole.flatten(config.curve_segments);
        if pts.len() < 3 {
            return Err(SceneError::DegenerateOutline(outline.name));
        }
        if signed_area(&pts) > 0.0 {
            pts.reverse();
        }
        holes.push(pts);
    }

    let outline_bounds = Aabb2::from_points(shape.iter().chain(holes.iter().flatten()));
    let center = outline_bounds.center();

    let rings: Vec<Ring> = std::iter::once(shape)
        .chain(holes)
        .map(|pts| {
            let points: Vec<Vec2> = pts.into_iter().map(|p| p - center).collect();
            let directions = bevel_directions(&points);
            Ring { points, directions }
        })
        .collect();

    let layers = layers(config);
    let mut mesh = GlyphMesh::default();

    for ring in &rings {
        let n = ring.points.len();
        for pair in layers.windows(2) {
            let (z0, o0) = pair[0];
            let (z1, o1) = pair[1];
            for i in 0..n {
                let j = (i + 1) % n;
                let a = ring.at(i, z0, o0);
                let b = ring.at(j, z0, o0);
                let c = ring.at(j, z1, o1);
                let d = ring.at(i, z1, o1);
                mesh.push_triangle(a, b, c);
                mesh.push_triangle(a, c, d);
            }
        }
    }

    let (front_z, _) = layers[0];
    let (back_z, _) = layers[layers.len() - 1];
    fill_caps(&rings, front_z, back_z, &mut mesh)?;

    log::debug!(
        "built glyph {}: {} triangles, center ({:.3}, {:.3})",
        outline.name,
        mesh.triangle_count(),
        center.x,
        center.y
    );

    Ok(GlyphSolid {
        name: outline.name,
        mesh,
        outline_bounds,
        center,
    })
}

/// `(z, offset)` for every layer from the front cap to the back cap.
fn layers(config: &ExtrudeConfig) -> Vec<(f32, f32)> {
    if !config.bevel_enabled {
        return vec![(0.0, 0.0), (config.depth, 0.0)];
    }

    let segments = config.bevel_segments.max(1);
    let thickness = config.bevel_thickness;
    let size = config.bevel_size;
    let bevel = |b: u32| {
        let t = b as f32 / segments as f32;
        (thickness * (t * FRAC_PI_2).cos(), size * (t * FRAC_PI_2).sin())
    };

    let mut out = Vec::with_capacity(2 * segments as usize + 2);
    for b in 0..segments {
        let (z, o) = bevel(b);
        out.push((-z, o));
    }
    out.push((0.0, size));
    out.push((config.depth, size));
    for b in (0..segments).rev() {
        let (z, o) = bevel(b);
        out.push((config.depth + z, o));
    }
    out
}

fn fill_caps(rings: &[Ring], front_z: f32, back_z: f32, mesh: &mut GlyphMesh) -> Result<(), SceneError> {
    let mut builder = Path::builder();
    for ring in rings {
        let first = ring.points[0];
        builder.begin(point(first.x, first.y));
        for p in &ring.points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.close();
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let options = FillOptions::default().with_fill_rule(FillRule::EvenOdd);
    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                let p = v.position();
                Vec2::new(p.x, p.y)
            }),
        )
        .map_err(|e| SceneError::tessellation(format!("{e:?}")))?;

    for tri in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| buffers.vertices[tri[k] as usize]);
        let (a, b, c) = if (b - a).perp_dot(c - a) >= 0.0 {
            (a, b, c)
        } else {
            (a, c, b)
        };
        // back cap faces +Z, front cap faces -Z
        mesh.push_triangle(a.extend(back_z), b.extend(back_z), c.extend(back_z));
        mesh.push_triangle(a.extend(front_z), c.extend(front_z), b.extend(front_z));
    }
    Ok(())
}

/// Per-vertex direction that pushes the contour away from the solid.
fn bevel_directions(ring: &[Vec2]) -> Vec<Vec2> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let prev = ring[(i + n - 1) % n];
            let cur = ring[i];
            let next = ring[(i + 1) % n];
            let n_in = outward_normal(cur - prev);
            let n_out = outward_normal(next - cur);
            let sum = n_in + n_out;
            if sum.length_squared() < 1e-12 {
                return n_in;
            }
            let miter = sum.normalize();
            miter / miter.dot(n_in).max(MIN_MITER_COS)
        })
        .collect()
}

/// Right-hand normal; outward for CCW boundaries and CW holes.
#[inline]
fn outward_normal(edge: Vec2) -> Vec2 {
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Shoelace area, positive for counter-clockwise rings.
pub fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}
