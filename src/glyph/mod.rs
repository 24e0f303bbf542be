//! Glyph outlines and their extruded solids.
//!
//! The scene only ever renders the five letters of [`Glyph::ALL`]. Each has a
//! hand-authored outline (see `library.rs`) made of one closed boundary plus
//! optional holes, in a local space of roughly 5x5 units with Y up.
//!
//! Outlines are kept as exact segments (lines and cubic beziers) and only
//! flattened into polygons when a solid is built, so the curve density is a
//! property of [`crate::config::ExtrudeConfig`] rather than of the outline.

pub mod extrude;
mod library;

use glam::Vec2;
use lyon::geom::CubicBezierSegment;
use lyon::math::point;

/// The fixed alphabet rendered by the scene, in layout order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
    D,
    R,
    E,
    A,
    M,
}

impl Glyph {
    pub const COUNT: usize = 5;
    pub const ALL: [Glyph; Glyph::COUNT] = [Glyph::D, Glyph::R, Glyph::E, Glyph::A, Glyph::M];

    pub fn name(self) -> &'static str {
        match self {
            Glyph::D => "D",
            Glyph::R => "R",
            Glyph::E => "E",
            Glyph::A => "A",
            Glyph::M => "M",
        }
    }

    /// Position of this glyph within [`Glyph::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The static outline for this glyph. Built once on first use.
    pub fn outline(self) -> &'static GlyphOutline {
        &library::outlines()[self.index()]
    }
}

/// One drawing command of a contour. The start point lives on the contour.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    Line(Vec2),
    Cubic { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

impl Segment {
    #[inline]
    pub fn end(&self) -> Vec2 {
        match *self {
            Segment::Line(to) | Segment::Cubic { to, .. } => to,
        }
    }
}

/// A closed path: `start`, then each segment in order, then back to `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub start: Vec2,
    pub segments: Vec<Segment>,
}

impl Contour {
    pub fn builder(x: f32, y: f32) -> ContourBuilder {
        ContourBuilder {
            contour: Contour {
                start: Vec2::new(x, y),
                segments: Vec::new(),
            },
        }
    }

    /// Flatten into a polygon with `curve_segments` samples per cubic.
    ///
    /// The returned ring is open (the closing edge is implied) and has no
    /// repeated consecutive points.
    pub fn flatten(&self, curve_segments: u32) -> Vec<Vec2> {
        let steps = curve_segments.max(1);
        let mut pts = vec![self.start];
        let mut cursor = self.start;

        for seg in &self.segments {
            match *seg {
                Segment::Line(to) => pts.push(to),
                Segment::Cubic { ctrl1, ctrl2, to } => {
                    let curve = CubicBezierSegment {
                        from: point(cursor.x, cursor.y),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(to.x, to.y),
                    };
                    for i in 1..=steps {
                        let p = curve.sample(i as f32 / steps as f32);
                        pts.push(Vec2::new(p.x, p.y));
                    }
                }
            }
            cursor = seg.end();
        }

        pts.dedup_by(|b, a| a.distance_squared(*b) < 1e-10);
        while pts.len() > 1 && pts[0].distance_squared(pts[pts.len() - 1]) < 1e-10 {
            pts.pop();
        }
        pts
    }

    /// Bounds of the exact control polygon. Bezier curves lie inside the hull
    /// of their control points, so this can only be looser than the curve.
    pub fn control_bounds(&self) -> Aabb2 {
        let mut bb = Aabb2::empty();
        bb.include_point(self.start);
        for seg in &self.segments {
            match *seg {
                Segment::Line(to) => bb.include_point(to),
                Segment::Cubic { ctrl1, ctrl2, to } => {
                    bb.include_point(ctrl1);
                    bb.include_point(ctrl2);
                    bb.include_point(to);
                }
            }
        }
        bb
    }
}

/// Fluent builder mirroring the usual `moveTo / lineTo / bezierCurveTo` API.
#[derive(Debug, Clone)]
pub struct ContourBuilder {
    contour: Contour,
}

impl ContourBuilder {
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.contour.segments.push(Segment::Line(Vec2::new(x, y)));
        self
    }

    pub fn cubic_to(mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        self.contour.segments.push(Segment::Cubic {
            ctrl1: Vec2::new(c1x, c1y),
            ctrl2: Vec2::new(c2x, c2y),
            to: Vec2::new(x, y),
        });
        self
    }

    pub fn close(self) -> Contour {
        self.contour
    }
}

/// Immutable outline of a glyph: one boundary plus interior holes.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    pub name: &'static str,
    pub shape: Contour,
    pub holes: Vec<Contour>,
}

impl GlyphOutline {
    pub fn new(name: &'static str, shape: Contour, holes: Vec<Contour>) -> Self {
        Self { name, shape, holes }
    }
}

/// Axis-aligned bounding box in outline space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Vec2::splat(f32::INFINITY),
            max: Vec2::splat(f32::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn include_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn from_points<'a>(pts: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut bb = Self::empty();
        for p in pts {
            bb.include_point(*p);
        }
        bb
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}
