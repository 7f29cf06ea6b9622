use glam::{Mat4, Vec3};

/// Camera orbiting the origin at a fixed distance.
pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub aspect: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    const PITCH_LIMIT: f32 = 1.5;

    pub fn new(aspect: f32, distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.35,
            distance,
            aspect,
            fov: 45.0_f32.to_radians(),
            near: 0.01,
            far: 100.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.distance * Vec3::new(sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_lh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_lh(self.fov, self.aspect, self.near, self.far);
        proj * view
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

impl SceneUniform {
    pub fn new(camera: &Camera, model: Mat4, light_dir: Vec3) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            light_dir: light_dir.normalize_or_zero().extend(0.0).to_array(),
        }
    }
}
