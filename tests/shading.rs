use dream_wasm::config::{LightingConfig, PointLight, MAX_LIGHTS};
use dream_wasm::shading::{Fragment, MaterialFactory};
use glam::Vec3;

fn factory() -> MaterialFactory {
    MaterialFactory::new(&LightingConfig::default())
}

#[test]
fn alpha_is_clamped_for_extreme_inputs() {
    let program = factory().create();
    let s = &program.surface;
    assert_eq!(s.alpha(1.0, 1.0e6), 1.0);
    assert_eq!(s.alpha(1.0, f32::MAX), 1.0);
    assert_eq!(s.alpha(0.0, 0.0), s.base_opacity);
    for rim in [0.0, 0.25, 0.5, 1.0] {
        for spec in [0.0, 0.1, 1.0, 3.0, 1.0e9] {
            let a = s.alpha(rim, spec);
            assert!((0.0..=1.0).contains(&a), "rim={rim} spec={spec} a={a}");
        }
    }
}

#[test]
fn gradient_runs_bottom_to_top() {
    let cfg = LightingConfig::default();
    let program = factory().create();
    let s = &program.surface;
    assert_eq!(s.gradient_color(-7.0), cfg.gradient_bottom);
    assert_eq!(s.gradient_color(-50.0), cfg.gradient_bottom);
    assert_eq!(s.gradient_color(0.0), cfg.gradient_middle);
    assert!((s.gradient_color(7.0) - cfg.gradient_top).length() < 1e-6);
    assert!((s.gradient_color(50.0) - cfg.gradient_top).length() < 1e-6);

    let quarter = s.gradient_color(-3.5);
    let expected = cfg.gradient_bottom.lerp(cfg.gradient_middle, 0.5);
    assert!((quarter - expected).length() < 1e-5);
}

#[test]
fn rim_brightens_grazing_angles() {
    let program = factory().create();
    let s = &program.surface;
    assert_eq!(s.rim_factor(Vec3::Z, Vec3::Z), 0.0);
    assert_eq!(s.rim_factor(Vec3::X, Vec3::Z), 1.0);
    // back-facing still saturates instead of overshooting
    assert_eq!(s.rim_factor(-Vec3::Z, Vec3::Z), 1.0);

    let oblique = s.rim_factor(Vec3::new(0.0, 0.6, 0.8), Vec3::Z);
    assert!(oblique > 0.0 && oblique < 1.0);
}

#[test]
fn edges_are_more_opaque_than_faces() {
    let program = factory().create();
    // Away from every light so only the rim term differs.
    let face = program.shade(&Fragment {
        position: Vec3::new(0.0, 0.0, -40.0),
        normal: Vec3::Z,
        view_dir: Vec3::Z,
    });
    let edge = program.shade(&Fragment {
        position: Vec3::new(0.0, 0.0, -40.0),
        normal: Vec3::X,
        view_dir: Vec3::Z,
    });
    assert!(edge.color.w > face.color.w);
    assert!(edge.rim > face.rim);
    assert!(edge.color.w <= 1.0);
}

#[test]
fn specular_highlight_raises_opacity() {
    let program = factory().create();
    let light = program.lights[0].position;
    // Mirror setup: normal and view direction both point at the light.
    let position = Vec3::new(light.x, light.y, 0.0);
    let towards = (light - position).normalize();
    let hit = program.shade(&Fragment {
        position,
        normal: towards,
        view_dir: towards,
    });
    assert!(hit.total_specular >= 1.0 - 1e-4);
    let s = &program.surface;
    assert!(hit.color.w >= s.base_opacity + s.specular_opacity - 1e-3);
}

#[test]
fn programs_do_not_alias() {
    let f = factory();
    let mut a = f.create();
    let b = f.create();
    a.time = 12.5;
    a.camera_position = Vec3::new(1.0, 2.0, 3.0);
    a.lights[0].intensity = 0.0;
    assert_eq!(b.time, 0.0);
    assert_eq!(b.camera_position, Vec3::ZERO);
    assert_eq!(b.lights[0].intensity, 5.0);
}

#[test]
fn light_rig_matches_config() {
    let program = factory().create();
    assert_eq!(program.light_count(), 3);
    let (positions, colors, intensities) = program.light_arrays();
    assert_eq!(&positions[..3], &[10.0, 0.0, 8.0]);
    assert_eq!(&positions[3..6], &[-10.0, 5.0, 8.0]);
    assert_eq!(intensities, [5.0, 5.0, 4.5]);
    // #ff5733
    assert_eq!(colors[0], 1.0);
    assert!((colors[1] - 0x57 as f32 / 255.0).abs() < 1e-6);
}

#[test]
fn extra_lights_are_dropped() {
    let mut cfg = LightingConfig::default();
    for _ in 0..3 {
        cfg.lights.push(PointLight::new(Vec3::ZERO, 0xffffff, 1.0));
    }
    let program = MaterialFactory::new(&cfg).create();
    assert_eq!(program.lights.len(), MAX_LIGHTS);
}

#[test]
fn fewer_lights_are_padded() {
    let cfg = LightingConfig {
        lights: vec![PointLight::new(Vec3::ONE, 0x00ff00, 2.0)],
        ..LightingConfig::default()
    };
    let program = MaterialFactory::new(&cfg).create();
    assert_eq!(program.light_count(), 1);
    let (positions, _, intensities) = program.light_arrays();
    assert_eq!(positions.len(), MAX_LIGHTS * 3);
    assert_eq!(intensities, [2.0, 0.0, 0.0]);
}

#[test]
fn fragment_source_carries_the_surface_constants() {
    let program = factory().create();
    let frag = &program.sources.fragment;
    assert!(frag.starts_with("#version 300 es\n"));
    assert!(frag.contains("#define MAX_LIGHTS 3\n"));
    assert!(frag.contains("#define SHININESS 64.0\n"));
    assert!(frag.contains("#define METALNESS 0.8\n"));
    assert!(frag.contains("#define GRADIENT_MIN -7.0\n"));
    assert!(frag.contains("#define GRADIENT_BOTTOM vec3(1.0, 0.34, 0.2)\n"));
    assert!(frag.contains("uniform float uTime;"));
    assert!(program.sources.vertex.starts_with("#version 300 es"));
}
