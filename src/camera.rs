//! Fixed perspective camera.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn new(cfg: &CameraConfig, width: u32, height: u32) -> Self {
        let mut cam = Self {
            fov_y_deg: cfg.fov_y_deg,
            near: cfg.near,
            far: cfg.far,
            aspect: 1.0,
            position: cfg.position,
            target: cfg.target,
        };
        cam.set_viewport(width, height);
        cam
    }

    /// Update the aspect ratio. A zero-sized viewport (hidden canvas, minimized
    /// window) keeps the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
