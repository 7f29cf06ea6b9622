//! Sun / earth / moon transform rig in the XY plane.
//!
//! A single angle `θ` drives everything:
//! - the sun spins at `θ/4`,
//! - the earth orbits the sun at radius 0.7 with angle `θ/6` and spins at `θ`,
//! - the moon orbits the earth at radius 0.2 with angle `2θ` and spins at `θ`.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

const SUN_SCALE: f32 = 0.2;
const EARTH_SCALE: f32 = 0.1;
const MOON_SCALE: f32 = 0.05;
const EARTH_ORBIT_RADIUS: f32 = 0.7;
const MOON_ORBIT_RADIUS: f32 = 0.2;

/// Radians per second.
pub const ANGULAR_SPEED: f32 = PI;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitRig {
    angle: f32,
}

impl OrbitRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_angle(angle: f32) -> Self {
        Self { angle }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle += ANGULAR_SPEED * dt;
    }

    pub fn sun(&self) -> Mat4 {
        Mat4::from_rotation_z(self.angle / 4.0)
            * Mat4::from_scale(Vec3::new(SUN_SCALE, SUN_SCALE, 1.0))
    }

    pub fn earth(&self) -> Mat4 {
        Mat4::from_rotation_z(self.angle / 6.0)
            * Mat4::from_translation(Vec3::new(EARTH_ORBIT_RADIUS, 0.0, 0.0))
            * Mat4::from_rotation_z(self.angle)
            * Mat4::from_scale(Vec3::new(EARTH_SCALE, EARTH_SCALE, 1.0))
    }

    pub fn moon(&self) -> Mat4 {
        let (sin, cos) = (self.angle / 6.0).sin_cos();
        let earth_center = Vec3::new(EARTH_ORBIT_RADIUS * cos, EARTH_ORBIT_RADIUS * sin, 0.0);

        Mat4::from_translation(earth_center)
            * Mat4::from_rotation_z(self.angle * 2.0)
            * Mat4::from_translation(Vec3::new(MOON_ORBIT_RADIUS, 0.0, 0.0))
            * Mat4::from_rotation_z(self.angle)
            * Mat4::from_scale(Vec3::new(MOON_SCALE, MOON_SCALE, 1.0))
    }
}
