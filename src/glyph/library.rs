//! Hand-authored outlines for the scene alphabet.
//!
//! Coordinates are in local glyph units with the baseline at `y = 0` and the
//! cap height at `y = 5`. Holes are listed separately; their winding does not
//! matter, the mesh builder normalizes it.

use std::sync::OnceLock;

use super::{Contour, Glyph, GlyphOutline};

pub(super) fn outlines() -> &'static [GlyphOutline; Glyph::COUNT] {
    static OUTLINES: OnceLock<[GlyphOutline; Glyph::COUNT]> = OnceLock::new();
    OUTLINES.get_or_init(|| Glyph::ALL.map(author))
}

fn author(glyph: Glyph) -> GlyphOutline {
    match glyph {
        Glyph::D => letter_d(),
        Glyph::R => letter_r(),
        Glyph::E => letter_e(),
        Glyph::A => letter_a(),
        Glyph::M => letter_m(),
    }
}

fn letter_d() -> GlyphOutline {
    let shape = Contour::builder(0.0, 0.0)
        .line_to(0.0, 5.0)
        .line_to(2.0, 5.0)
        .cubic_to(4.2, 5.0, 4.8, 4.0, 4.8, 2.5)
        .cubic_to(4.8, 1.0, 4.2, 0.0, 2.0, 0.0)
        .line_to(0.0, 0.0)
        .close();

    // bowl
    let bowl = Contour::builder(0.9, 0.8)
        .line_to(2.0, 0.8)
        .cubic_to(3.2, 0.8, 3.8, 1.5, 3.8, 2.5)
        .cubic_to(3.8, 3.5, 3.2, 4.2, 2.0, 4.2)
        .line_to(0.9, 4.2)
        .line_to(0.9, 0.8)
        .close();

    GlyphOutline::new("D", shape, vec![bowl])
}

fn letter_r() -> GlyphOutline {
    let shape = Contour::builder(0.0, 0.0)
        .line_to(0.0, 5.0)
        .line_to(2.5, 5.0)
        .cubic_to(4.2, 5.0, 4.8, 4.2, 4.8, 3.5)
        .cubic_to(4.8, 2.8, 4.2, 2.3, 3.0, 2.2)
        .line_to(5.0, 0.0)
        .line_to(3.5, 0.0)
        .line_to(1.8, 2.0)
        .line_to(0.9, 2.0)
        .line_to(0.9, 0.0)
        .line_to(0.0, 0.0)
        .close();

    let bowl = Contour::builder(0.9, 2.9)
        .line_to(2.5, 2.9)
        .cubic_to(3.3, 2.9, 3.8, 3.3, 3.8, 3.7)
        .cubic_to(3.8, 4.1, 3.3, 4.2, 2.5, 4.2)
        .line_to(0.9, 4.2)
        .line_to(0.9, 2.9)
        .close();

    GlyphOutline::new("R", shape, vec![bowl])
}

fn letter_e() -> GlyphOutline {
    let shape = Contour::builder(0.0, 0.0)
        .line_to(0.0, 5.0)
        .line_to(4.2, 5.0)
        .line_to(4.2, 4.2)
        .line_to(0.9, 4.2)
        .line_to(0.9, 2.9)
        .line_to(3.8, 2.9)
        .line_to(3.8, 2.1)
        .line_to(0.9, 2.1)
        .line_to(0.9, 0.8)
        .line_to(4.2, 0.8)
        .line_to(4.2, 0.0)
        .line_to(0.0, 0.0)
        .close();

    GlyphOutline::new("E", shape, Vec::new())
}

fn letter_a() -> GlyphOutline {
    let shape = Contour::builder(2.0, 5.0)
        .line_to(3.0, 5.0)
        .line_to(5.2, 0.0)
        .line_to(4.1, 0.0)
        .line_to(3.6, 1.3)
        .line_to(1.4, 1.3)
        .line_to(0.9, 0.0)
        .line_to(-0.2, 0.0)
        .line_to(2.0, 5.0)
        .close();

    // counter
    let counter = Contour::builder(1.8, 2.1)
        .line_to(3.2, 2.1)
        .line_to(2.5, 4.1)
        .line_to(1.8, 2.1)
        .close();

    GlyphOutline::new("A", shape, vec![counter])
}

fn letter_m() -> GlyphOutline {
    let shape = Contour::builder(0.0, 0.0)
        .line_to(0.0, 5.0)
        .line_to(0.9, 5.0)
        .line_to(0.9, 1.5)
        .line_to(2.5, 4.7)
        .line_to(3.5, 4.7)
        .line_to(5.1, 1.5)
        .line_to(5.1, 5.0)
        .line_to(6.0, 5.0)
        .line_to(6.0, 0.0)
        .line_to(4.8, 0.0)
        .line_to(3.0, 3.5)
        .line_to(1.2, 0.0)
        .line_to(0.0, 0.0)
        .close();

    GlyphOutline::new("M", shape, Vec::new())
}
