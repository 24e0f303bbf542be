//! Scene assembly and per-glyph motion.
//!
//! A [`GlyphInstance`] pairs a solid and its material with the fixed
//! animation metadata chosen at construction. Nothing on an instance changes
//! afterwards except the uniform values the frame loop writes into its
//! material; its pose is a pure function of [`FrameProgress`].

use glam::{Mat3, Mat4, Vec3};

use crate::config::{DreamConfig, LayoutConfig, ScrollConfig};
use crate::error::SceneError;
use crate::glyph::extrude::{self, GlyphSolid};
use crate::glyph::Glyph;
use crate::scroll::{lerp, FrameProgress};
use crate::shading::{MaterialFactory, ShadingProgram};

/// Position and XYZ euler rotation of a glyph for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Pose {
    /// `T * Rx * Ry * Rz * S`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Inverse transpose of the model matrix's upper 3x3.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model_matrix()).inverse().transpose()
    }
}

#[derive(Debug)]
pub struct GlyphInstance {
    pub glyph: Glyph,
    pub solid: GlyphSolid,
    pub material: ShadingProgram,
    index: usize,
    launch: Vec3,
    target: Vec3,
    rotation_offset: Vec3,
    scale: f32,
}

impl GlyphInstance {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Off-screen start: shared X/Y, intermediate depth.
    #[inline]
    pub fn launch(&self) -> Vec3 {
        self.launch
    }

    /// Authored resting X/Y and base depth.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn rotation_offset(&self) -> Vec3 {
        self.rotation_offset
    }

    /// Arrival follows the remapped progress; spin follows the raw progress
    /// and keeps going after the glyph has landed.
    pub fn pose(&self, progress: FrameProgress, scroll: &ScrollConfig) -> Pose {
        let t = progress.animation;
        Pose {
            position: Vec3::new(
                lerp(self.launch.x, self.target.x, t),
                lerp(self.launch.y, self.target.y, t),
                lerp(self.launch.z, self.target.z, t),
            ),
            rotation: self.rotation_offset + progress.scroll * scroll.rotation_rates,
            scale: self.scale,
        }
    }
}

/// Build the five instances of the scene.
///
/// Rotation offsets are drawn from `rng` exactly once per glyph, three draws
/// per glyph in alphabet order, so a seeded generator reproduces the scene.
pub fn assemble(config: &DreamConfig, rng: &mut fastrand::Rng) -> Result<Vec<GlyphInstance>, SceneError> {
    let materials = MaterialFactory::new(&config.lighting);
    let layout = &config.layout;

    let mut out = Vec::with_capacity(Glyph::COUNT);
    for glyph in Glyph::ALL {
        let index = glyph.index();
        let solid = extrude::build(glyph.outline(), &config.extrude)?;
        let target = layout.targets[index];
        let instance = GlyphInstance {
            glyph,
            solid,
            material: materials.create(),
            index,
            launch: layout.launch.extend(layout.intermediate_depth),
            target: target.extend(layout.base_depth(index)),
            rotation_offset: random_rotation(layout, rng),
            scale: layout.glyph_scale,
        };
        log::debug!(
            "glyph {} -> target {:?}, rotation offset {:?}",
            glyph.name(),
            instance.target,
            instance.rotation_offset
        );
        out.push(instance);
    }
    Ok(out)
}

fn random_rotation(layout: &LayoutConfig, rng: &mut fastrand::Rng) -> Vec3 {
    let mut draw = || (rng.f32() - 0.5) * layout.rotation_range;
    let x = draw();
    let y = draw();
    let z = draw();
    Vec3::new(x, y, z)
}
