//! Camera and projection parameters shared by every backdrop.

use glam::{Mat4, Vec3};

use folio_engine::coords::Viewport;

/// Perspective camera on the +Z axis looking down -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
}

impl Projection {
    pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;
    pub const DEFAULT_CAMERA_Z: f32 = 5.0;

    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y_degrees: Self::DEFAULT_FOV_DEGREES,
            aspect,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            camera_z: Self::DEFAULT_CAMERA_Z,
        }
    }

    /// Projection for a viewport. Degenerate viewports yield aspect 1.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self::new(viewport.aspect())
    }

    /// Recomputes the aspect ratio; invalid viewports leave it unchanged.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.is_valid() {
            self.aspect = viewport.aspect();
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.camera_z), Vec3::ZERO, Vec3::Y)
    }

    /// wgpu clip space (depth 0..1).
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(1.0)
    }
}
