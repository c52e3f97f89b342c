use glam::Mat4;
use zr_core::math::perspective;

pub const NEAR_PLANE: f32 = 0.001;
pub const FAR_PLANE: f32 = 100.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// First-person camera fixed at the origin looking down -z. The world moves
/// around it, so only the projection changes (on resize or FOV reload).
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub viewport: (u32, u32),
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            fov_degrees,
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32
    }

    pub fn projection(&self) -> Mat4 {
        perspective(self.fov_degrees, self.aspect(), NEAR_PLANE, FAR_PLANE)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection().to_cols_array_2d(),
        }
    }
}
