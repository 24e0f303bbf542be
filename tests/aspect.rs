use dream_wasm::camera::Camera;
use dream_wasm::config::CameraConfig;
use glam::Vec3;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() < eps
}

#[test]
fn vertical_fov_is_aspect_invariant() {
    let cfg = CameraConfig::default();
    let half_fov = (cfg.fov_y_deg * 0.5).to_radians();
    let distance = cfg.position.z;

    // A point on the upper edge of the frustum at the origin plane.
    let top = Vec3::new(0.0, distance * half_fov.tan(), 0.0);

    for (w, h) in [(1920, 1080), (1080, 1920), (800, 800)] {
        let cam = Camera::new(&cfg, w, h);
        let ndc = cam.view_projection().project_point3(top);
        assert!(approx_eq(ndc.y, 1.0, 1e-4), "{w}x{h}: ndc={ndc:?}");
        assert!(approx_eq(ndc.x, 0.0, 1e-6));
    }
}

#[test]
fn horizontal_extent_follows_aspect() {
    let cfg = CameraConfig::default();
    let wide = Camera::new(&cfg, 1920, 1080);
    let tall = Camera::new(&cfg, 1080, 1920);

    let p = Vec3::new(10.0, 0.0, 0.0);
    let x_wide = wide.view_projection().project_point3(p).x;
    let x_tall = tall.view_projection().project_point3(p).x;

    // The same world point covers less of a wide screen.
    assert!(x_wide < x_tall);
    assert!(approx_eq(x_tall / x_wide, (1920.0 / 1080.0) / (1080.0 / 1920.0), 1e-3));
}

#[test]
fn zero_viewport_keeps_previous_aspect() {
    let mut cam = Camera::new(&CameraConfig::default(), 1600, 900);
    let aspect = cam.aspect;
    cam.set_viewport(0, 900);
    cam.set_viewport(1600, 0);
    assert_eq!(cam.aspect, aspect);
    cam.set_viewport(900, 900);
    assert_eq!(cam.aspect, 1.0);
}
