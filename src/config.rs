//! Scene configuration.
//!
//! Every authored constant of the scene lives here as a plain field with a
//! `Default` that reproduces the shipped look. Nothing downstream hard-codes
//! these values; the fragment program receives the lighting constants through
//! a generated `#define` prelude (see [`crate::shading`]).

use glam::{Vec2, Vec3};

use crate::glyph::Glyph;

/// Top-level configuration handed to [`crate::stage::Stage::new`].
#[derive(Debug, Clone, Default)]
pub struct DreamConfig {
    pub extrude: ExtrudeConfig,
    pub scroll: ScrollConfig,
    pub layout: LayoutConfig,
    pub lighting: LightingConfig,
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
}

/// Recognized extrusion options for [`crate::glyph::extrude::build`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExtrudeConfig {
    /// Extrusion thickness along +Z.
    pub depth: f32,
    pub bevel_enabled: bool,
    /// How far the bevel reaches out in front of / behind the extruded body.
    pub bevel_thickness: f32,
    /// How far the bevel pushes the outline outwards in X/Y.
    pub bevel_size: f32,
    pub bevel_segments: u32,
    /// Samples taken along every cubic segment of the outline.
    pub curve_segments: u32,
}

impl Default for ExtrudeConfig {
    fn default() -> Self {
        Self {
            depth: 2.0,
            bevel_enabled: true,
            bevel_thickness: 0.3,
            bevel_size: 0.2,
            bevel_segments: 10,
            curve_segments: 20,
        }
    }
}

/// Scroll smoothing and the mapping from progress to motion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Fraction of the remaining distance covered every frame.
    pub smoothing: f32,
    /// Progress below which the arrival animation has not started.
    pub lower_threshold: f32,
    /// Progress at which the arrival animation is complete.
    pub upper_threshold: f32,
    /// Radians of spin per unit of smoothed progress, per axis.
    pub rotation_rates: Vec3,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.08,
            lower_threshold: 0.1,
            upper_threshold: 0.5,
            rotation_rates: Vec3::new(6.0, 7.0, 5.0),
        }
    }
}

/// Where glyphs start, where they land and how they are staggered.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Shared off-screen X/Y every glyph launches from.
    pub launch: Vec2,
    /// Depth every glyph launches from before settling on its base depth.
    pub intermediate_depth: f32,
    /// Base depth of glyph `i` is `-i * depth_step`.
    pub depth_step: f32,
    /// Uniform scale applied to every glyph.
    pub glyph_scale: f32,
    /// Rotation offsets are drawn uniformly from `[-range / 2, range / 2)`.
    pub rotation_range: f32,
    /// Resting X/Y for each glyph, in alphabet order.
    pub targets: [Vec2; Glyph::COUNT],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            launch: Vec2::new(0.0, -20.0),
            intermediate_depth: -10.0,
            depth_step: 2.0,
            glyph_scale: 1.25,
            rotation_range: std::f32::consts::PI,
            targets: [
                Vec2::new(-19.0, 4.0),
                Vec2::new(-10.0, -5.0),
                Vec2::new(2.0, 5.0),
                Vec2::new(12.0, -2.0),
                Vec2::new(22.0, 3.0),
            ],
        }
    }
}

impl LayoutConfig {
    /// Authored base depth for the glyph at `index`.
    #[inline]
    pub fn base_depth(&self, index: usize) -> f32 {
        -(index as f32) * self.depth_step
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, rgb: u32, intensity: f32) -> Self {
        Self {
            position,
            color: rgb_hex(rgb),
            intensity,
        }
    }
}

/// Maximum number of point lights the fragment program is compiled for.
pub const MAX_LIGHTS: usize = 3;

/// Light rig, palette and surface constants of the glass look.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub lights: Vec<PointLight>,
    pub gradient_bottom: Vec3,
    pub gradient_middle: Vec3,
    pub gradient_top: Vec3,
    /// World-space Y mapped to gradient 0 and 1.
    pub gradient_range: (f32, f32),
    pub metalness: f32,
    pub shininess: f32,
    pub rim_exponent: f32,
    pub rim_strength: f32,
    pub base_opacity: f32,
    pub rim_opacity: f32,
    pub specular_opacity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.5,
            lights: vec![
                PointLight::new(Vec3::new(10.0, 0.0, 8.0), 0xff5733, 5.0),
                PointLight::new(Vec3::new(-10.0, 5.0, 8.0), 0x6b46c1, 5.0),
                PointLight::new(Vec3::new(0.0, -5.0, 5.0), 0xff1493, 4.5),
            ],
            gradient_bottom: Vec3::new(1.0, 0.34, 0.2),
            gradient_middle: Vec3::new(0.55, 0.23, 0.39),
            gradient_top: Vec3::new(0.18, 0.11, 0.31),
            gradient_range: (-7.0, 7.0),
            metalness: 0.8,
            shininess: 64.0,
            rim_exponent: 1.5,
            rim_strength: 0.8,
            base_opacity: 0.15,
            rim_opacity: 0.6,
            specular_opacity: 0.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 35.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Element id of the canvas the scene mounts on.
    pub canvas_id: String,
    /// Upper bound for the device pixel ratio used for the backing store.
    pub max_pixel_ratio: f64,
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            canvas_id: "dream-canvas".to_string(),
            max_pixel_ratio: 2.0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// `0xRRGGBB` to linear-ish float RGB (no gamma conversion, as authored).
pub fn rgb_hex(rgb: u32) -> Vec3 {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
