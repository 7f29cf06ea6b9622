use glam::Vec3;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub camera_distance: f32,
    /// Radians the camera moves per arrow-key press.
    pub orbit_step: f32,
    /// Model spin in radians per second.
    pub spin_speed: f32,
    /// Direction the light travels in.
    pub light_direction: Vec3,
    pub clear_color: wgpu::Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Regular Octahedron".to_string(),
            width: 700,
            height: 700,
            camera_distance: 3.0,
            orbit_step: 0.1,
            spin_speed: 0.6,
            light_direction: Vec3::new(-0.5, -1.0, 1.0),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.2,
                b: 0.3,
                a: 1.0,
            },
        }
    }
}
