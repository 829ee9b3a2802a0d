//! View and projection for the spectrum mesh scene.

use glam::{Mat4, Vec3};

use crate::params::{FixedCamera, RenderConfig};

/// Camera system looking across the mesh from a fixed viewpoint
pub struct CameraSystem {
    camera: FixedCamera,
}

impl CameraSystem {
    pub fn new(camera: FixedCamera) -> Self {
        Self { camera }
    }

    /// Eye and look-at target
    pub fn position_and_target(&self) -> (Vec3, Vec3) {
        (
            Vec3::from_array(self.camera.position),
            Vec3::from_array(self.camera.target),
        )
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let (eye, target) = self.position_and_target();

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}
