use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use dream_wasm::glyph::extrude::GlyphMesh;
use dream_wasm::shading::{ShaderSources, ShadingProgram};
use dream_wasm::stage::DrawTransforms;
use dream_wasm::{Backend, DreamConfig, SceneError, Stage, TeardownReport};
use glam::Vec3;

#[derive(Debug, Default)]
struct Log {
    meshes_uploaded: u32,
    programs_compiled: u32,
    meshes_deleted: Vec<u32>,
    programs_deleted: Vec<u32>,
    resizes: Vec<(u32, u32)>,
    frames: usize,
    draws: Vec<Draw>,
}

#[derive(Debug, Clone)]
struct Draw {
    mesh: u32,
    program: u32,
    transforms: DrawTransforms,
    time: f32,
    camera_position: Vec3,
}

/// Hands out numbered handles and records every call.
struct Recorder {
    log: Rc<RefCell<Log>>,
    fail_compile_at: Option<u32>,
}

impl Recorder {
    fn new() -> (Self, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (
            Self {
                log: log.clone(),
                fail_compile_at: None,
            },
            log,
        )
    }
}

impl Backend for Recorder {
    type Mesh = u32;
    type Program = u32;

    fn upload_mesh(&mut self, mesh: &GlyphMesh) -> Result<u32, SceneError> {
        assert!(mesh.vertex_count() > 0);
        let mut log = self.log.borrow_mut();
        log.meshes_uploaded += 1;
        Ok(log.meshes_uploaded)
    }

    fn compile_program(&mut self, sources: &ShaderSources) -> Result<u32, SceneError> {
        let mut log = self.log.borrow_mut();
        if Some(log.programs_compiled) == self.fail_compile_at {
            return Err(SceneError::ShaderCompile {
                stage: "fragment",
                log: "ERROR: 0:1: syntax error".to_string(),
            });
        }
        assert!(sources.fragment.contains("#define MAX_LIGHTS"));
        log.programs_compiled += 1;
        Ok(log.programs_compiled)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }

    fn begin_frame(&mut self) {
        self.log.borrow_mut().frames += 1;
    }

    fn draw(&mut self, program: &u32, mesh: &u32, transforms: &DrawTransforms, material: &ShadingProgram) {
        self.log.borrow_mut().draws.push(Draw {
            mesh: *mesh,
            program: *program,
            transforms: *transforms,
            time: material.time,
            camera_position: material.camera_position,
        });
    }

    fn delete_mesh(&mut self, mesh: u32) {
        self.log.borrow_mut().meshes_deleted.push(mesh);
    }

    fn delete_program(&mut self, program: u32) {
        self.log.borrow_mut().programs_deleted.push(program);
    }
}

fn mount(initial_scroll: f32) -> (Stage<Recorder>, Rc<RefCell<Log>>) {
    let (backend, log) = Recorder::new();
    let mut rng = fastrand::Rng::with_seed(7);
    let stage = Stage::new(DreamConfig::default(), backend, &mut rng, 1600, 900, initial_scroll).unwrap();
    (stage, log)
}

#[test]
fn mount_uploads_one_mesh_and_program_per_glyph() {
    let (stage, log) = mount(0.0);
    let log = log.borrow();
    assert_eq!(log.meshes_uploaded, 5);
    assert_eq!(log.programs_compiled, 5);
    assert_eq!(log.resizes, vec![(1600, 900)]);
    assert_eq!(stage.glyphs().len(), 5);
    assert!(stage.is_running());
    assert_eq!(stage.elapsed(), 0.0);
}

#[test]
fn page_top_keeps_glyphs_at_launch() {
    let (mut stage, log) = mount(0.0);
    for i in 0..30 {
        let progress = stage.frame(i as f32 / 60.0).unwrap();
        assert_eq!(progress.animation, 0.0);
    }
    for g in stage.glyphs() {
        assert_eq!(g.pose.position, Vec3::new(0.0, -20.0, -10.0));
    }
    let log = log.borrow();
    assert_eq!(log.frames, 30);
    assert_eq!(log.draws.len(), 150);
}

#[test]
fn scrolling_to_the_end_brings_glyphs_home() {
    let (mut stage, _log) = mount(0.0);
    stage.set_scroll_target(1.0);
    let mut last = None;
    for i in 0..200 {
        last = stage.frame(i as f32 / 60.0);
    }
    let progress = last.unwrap();
    assert!(progress.scroll > 0.999);
    assert_eq!(progress.animation, 1.0);
    for g in stage.glyphs() {
        let d = (g.pose.position - g.instance.target()).length();
        assert!(d < 0.01, "{} is {d} from its target", g.instance.glyph.name());
    }
}

#[test]
fn progress_eases_instead_of_jumping() {
    let (mut stage, _log) = mount(0.0);
    stage.set_scroll_target(1.0);
    let first = stage.frame(0.0).unwrap();
    assert!((first.scroll - 0.08).abs() < 1e-6);
    assert_eq!(first.animation, 0.0);
}

#[test]
fn initial_scroll_is_the_first_target() {
    let (mut stage, _log) = mount(0.6);
    assert_eq!(stage.scroll().target(), 0.6);
    assert_eq!(stage.scroll().progress(), 0.0);
    let p = stage.frame(0.0).unwrap();
    assert!(p.scroll > 0.0 && p.scroll < 0.6);
}

#[test]
fn frame_pushes_time_and_camera_to_every_material() {
    let (mut stage, log) = mount(0.0);
    stage.frame(1.5).unwrap();
    assert_eq!(stage.elapsed(), 1.5);

    let log = log.borrow();
    assert_eq!(log.draws.len(), 5);
    for d in &log.draws {
        assert_eq!(d.time, 1.5);
        assert_eq!(d.camera_position, Vec3::new(0.0, 0.0, 35.0));
        assert_eq!(d.transforms.view, stage.camera().view());
        assert_eq!(d.transforms.projection, stage.camera().projection());
    }
    let meshes: HashSet<u32> = log.draws.iter().map(|d| d.mesh).collect();
    let programs: HashSet<u32> = log.draws.iter().map(|d| d.program).collect();
    assert_eq!(meshes.len(), 5);
    assert_eq!(programs.len(), 5);

    for g in stage.glyphs() {
        assert_eq!(g.instance.material.time, 1.5);
    }
}

#[test]
fn resize_updates_camera_and_backend() {
    let (mut stage, log) = mount(0.0);
    stage.resize(800, 800);
    assert_eq!(stage.camera().aspect, 1.0);
    assert_eq!(log.borrow().resizes.last(), Some(&(800, 800)));
}

#[test]
fn dispose_releases_everything_once() {
    let (mut stage, log) = mount(0.0);
    stage.frame(0.0);

    let report = stage.dispose();
    assert_eq!(
        report,
        TeardownReport {
            listeners_removed: 0,
            meshes_disposed: 5,
            programs_disposed: 5,
        }
    );
    assert!(!stage.is_running());

    {
        let log = log.borrow();
        let meshes: HashSet<u32> = log.meshes_deleted.iter().copied().collect();
        let programs: HashSet<u32> = log.programs_deleted.iter().copied().collect();
        assert_eq!(meshes, (1..=5).collect::<HashSet<u32>>());
        assert_eq!(programs, (1..=5).collect::<HashSet<u32>>());
    }

    assert_eq!(stage.dispose(), TeardownReport::default());
    drop(stage);

    let log = log.borrow();
    assert_eq!(log.meshes_deleted.len(), 5);
    assert_eq!(log.programs_deleted.len(), 5);
}

#[test]
fn stopped_stage_ignores_frames_and_resizes() {
    let (mut stage, log) = mount(0.0);
    stage.dispose();
    let aspect = stage.camera().aspect;

    assert!(stage.frame(2.0).is_none());
    stage.resize(300, 900);

    assert_eq!(stage.camera().aspect, aspect);
    let log = log.borrow();
    assert_eq!(log.frames, 0);
    assert!(log.draws.is_empty());
    assert_eq!(log.resizes.len(), 1);
}

#[test]
fn drop_releases_an_undisposed_stage() {
    let (mut stage, log) = mount(0.0);
    assert!(stage.frame(0.0).is_some());
    assert!(log.borrow().meshes_deleted.is_empty());

    drop(stage);
    assert_eq!(log.borrow().meshes_deleted.len(), 5);
    assert_eq!(log.borrow().programs_deleted.len(), 5);
}

#[test]
fn compile_failure_releases_what_was_built() {
    let log = Rc::new(RefCell::new(Log::default()));
    let backend = Recorder {
        log: log.clone(),
        fail_compile_at: Some(3),
    };
    let mut rng = fastrand::Rng::with_seed(1);
    let err = Stage::new(DreamConfig::default(), backend, &mut rng, 640, 480, 0.0)
        .err()
        .unwrap();
    assert!(matches!(err, SceneError::ShaderCompile { stage: "fragment", .. }));

    let log = log.borrow();
    // Three complete glyphs plus the mesh of the fourth.
    assert_eq!(log.meshes_uploaded, 4);
    assert_eq!(log.programs_compiled, 3);
    let mut meshes = log.meshes_deleted.clone();
    meshes.sort_unstable();
    assert_eq!(meshes, vec![1, 2, 3, 4]);
    let mut programs = log.programs_deleted.clone();
    programs.sort_unstable();
    assert_eq!(programs, vec![1, 2, 3]);
    assert!(log.resizes.is_empty());
}
