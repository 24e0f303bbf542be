//! The mounted scene and its frame loop, independent of the graphics API.
//!
//! [`Stage`] owns everything that lives for one mount: the glyph instances,
//! their GPU resources, the scroll state, the camera and the `running` flag.
//! Event handlers never touch it directly; they hand their inputs to the frame
//! callback, which is the only caller of [`Stage::frame`].
//!
//! GPU work goes through the [`Backend`] trait so the loop, the resize guard
//! and the disposal accounting are testable without a browser.

use glam::{Mat3, Mat4};

use crate::camera::Camera;
use crate::config::DreamConfig;
use crate::error::SceneError;
use crate::glyph::extrude::GlyphMesh;
use crate::scene::{self, GlyphInstance, Pose};
use crate::scroll::{FrameProgress, ScrollState};
use crate::shading::{ShaderSources, ShadingProgram};

/// Per-draw transforms. Material uniforms travel separately in the
/// [`ShadingProgram`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawTransforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub normal: Mat3,
}

/// GPU operations the stage needs.
///
/// Handles returned by `upload_mesh` and `compile_program` are owned by the
/// stage and handed back to `delete_*` exactly once.
pub trait Backend {
    type Mesh;
    type Program;

    fn upload_mesh(&mut self, mesh: &GlyphMesh) -> Result<Self::Mesh, SceneError>;
    fn compile_program(&mut self, sources: &ShaderSources) -> Result<Self::Program, SceneError>;
    /// Drawing-buffer size in device pixels.
    fn resize(&mut self, width: u32, height: u32);
    fn begin_frame(&mut self);
    fn draw(
        &mut self,
        program: &Self::Program,
        mesh: &Self::Mesh,
        transforms: &DrawTransforms,
        material: &ShadingProgram,
    );
    fn delete_mesh(&mut self, mesh: Self::Mesh);
    fn delete_program(&mut self, program: Self::Program);
}

/// What a teardown released.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub listeners_removed: usize,
    pub meshes_disposed: usize,
    pub programs_disposed: usize,
}

pub struct MountedGlyph<B: Backend> {
    pub instance: GlyphInstance,
    pub pose: Pose,
    mesh: B::Mesh,
    program: B::Program,
}

pub struct Stage<B: Backend> {
    config: DreamConfig,
    backend: B,
    glyphs: Vec<MountedGlyph<B>>,
    scroll: ScrollState,
    camera: Camera,
    elapsed: f32,
    running: bool,
}

impl<B: Backend> Stage<B> {
    /// Assemble the scene and upload it through `backend`.
    ///
    /// `width`/`height` are the drawing-buffer size; `initial_scroll` is the
    /// page scroll fraction at mount time. Progress always starts at 0 and
    /// eases towards it.
    pub fn new(
        config: DreamConfig,
        mut backend: B,
        rng: &mut fastrand::Rng,
        width: u32,
        height: u32,
        initial_scroll: f32,
    ) -> Result<Self, SceneError> {
        let instances = scene::assemble(&config, rng)?;

        let mut glyphs: Vec<MountedGlyph<B>> = Vec::with_capacity(instances.len());
        for instance in instances {
            let uploaded = backend.upload_mesh(&instance.solid.mesh).and_then(|mesh| {
                match backend.compile_program(&instance.material.sources) {
                    Ok(program) => Ok((mesh, program)),
                    Err(e) => {
                        backend.delete_mesh(mesh);
                        Err(e)
                    }
                }
            });
            let (mesh, program) = match uploaded {
                Ok(pair) => pair,
                Err(e) => {
                    for g in glyphs.drain(..) {
                        backend.delete_mesh(g.mesh);
                        backend.delete_program(g.program);
                    }
                    return Err(e);
                }
            };
            let pose = instance.pose(
                FrameProgress {
                    scroll: 0.0,
                    animation: 0.0,
                },
                &config.scroll,
            );
            glyphs.push(MountedGlyph {
                instance,
                pose,
                mesh,
                program,
            });
        }

        backend.resize(width, height);
        let camera = Camera::new(&config.camera, width, height);
        let mut scroll = ScrollState::new(config.scroll);
        scroll.set_target(initial_scroll);

        log::info!(
            "scene mounted: {} glyphs, viewport {}x{}",
            glyphs.len(),
            width,
            height
        );

        Ok(Self {
            config,
            backend,
            glyphs,
            scroll,
            camera,
            elapsed: 0.0,
            running: true,
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn glyphs(&self) -> &[MountedGlyph<B>] {
        &self.glyphs
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_scroll_target(&mut self, fraction: f32) {
        self.scroll.set_target(fraction);
    }

    /// Resize the camera and drawing buffer. Ignored once the stage has been
    /// stopped.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.running {
            log::warn!("resize after teardown ignored");
            return;
        }
        self.camera.set_viewport(width, height);
        self.backend.resize(width, height);
    }

    /// Advance one frame at `elapsed` seconds since mount and draw it.
    ///
    /// Returns `None` without touching anything once the stage is stopped.
    pub fn frame(&mut self, elapsed: f32) -> Option<FrameProgress> {
        if !self.running {
            return None;
        }
        self.elapsed = elapsed;
        let progress = self.scroll.advance();

        let view = self.camera.view();
        let projection = self.camera.projection();
        let camera_position = self.camera.position;

        self.backend.begin_frame();
        for g in &mut self.glyphs {
            g.pose = g.instance.pose(progress, &self.config.scroll);
            g.instance.material.time = elapsed;
            g.instance.material.camera_position = camera_position;

            let transforms = DrawTransforms {
                model: g.pose.model_matrix(),
                view,
                projection,
                normal: g.pose.normal_matrix(),
            };
            self.backend
                .draw(&g.program, &g.mesh, &transforms, &g.instance.material);
        }
        Some(progress)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Stop the loop and release every GPU resource. Safe to call twice; the
    /// second call releases nothing.
    pub fn dispose(&mut self) -> TeardownReport {
        self.running = false;
        let mut report = TeardownReport::default();
        for g in self.glyphs.drain(..) {
            self.backend.delete_mesh(g.mesh);
            report.meshes_disposed += 1;
            self.backend.delete_program(g.program);
            report.programs_disposed += 1;
        }
        if report.meshes_disposed > 0 {
            log::info!(
                "scene disposed: {} meshes, {} programs",
                report.meshes_disposed,
                report.programs_disposed
            );
        }
        report
    }
}

impl<B: Backend> Drop for Stage<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
