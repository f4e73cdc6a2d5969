use glam::{Mat4, Vec3};

use crate::config::*;

/// Third-person camera pinned in X/Y that trails the player along Z.
#[derive(Clone, Debug)]
pub struct FollowCamera {
    pub position: Vec3,
    pub fixed_x: f32,
    pub fixed_y: f32,
    pub z_offset: f32,
    pub lerp: f32,
    pub look_drop: f32,
    look_target: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        let position = Vec3::from(CAMERA_START);
        Self {
            position,
            fixed_x: CAMERA_FIXED_X,
            fixed_y: CAMERA_FIXED_Y,
            z_offset: CAMERA_Z_OFFSET,
            lerp: CAMERA_LERP,
            look_drop: CAMERA_LOOK_DROP,
            look_target: Vec3::new(CAMERA_FIXED_X, CAMERA_FIXED_Y - CAMERA_LOOK_DROP, 0.0),
        }
    }
}

impl FollowCamera {
    /// One tick of smoothing toward `player_z + z_offset`. The fraction is
    /// applied per call, so the feel depends on the frame rate.
    pub fn update(&mut self, player_z: f32) {
        let target_z = player_z + self.z_offset;
        self.position.x = self.fixed_x;
        self.position.y = self.fixed_y;
        self.position.z += (target_z - self.position.z) * self.lerp;
        self.look_target = Vec3::new(self.fixed_x, self.fixed_y - self.look_drop, player_z);
    }

    #[allow(dead_code)]
    pub fn look_target(&self) -> Vec3 {
        self.look_target
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV_DEGREES.to_radians(), aspect, CAMERA_NEAR, CAMERA_FAR)
    }
}

/// Spot light riding on the camera, aimed at the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flashlight {
    pub position: Vec3,
    pub target: Vec3,
}

impl Flashlight {
    pub fn new() -> Self {
        Self {
            position: Vec3::from(CAMERA_START),
            target: Vec3::ZERO,
        }
    }

    pub fn update(&mut self, camera_position: Vec3, player_position: Vec3) {
        self.position = camera_position;
        self.target = player_position;
    }

    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

impl Default for Flashlight {
    fn default() -> Self {
        Self::new()
    }
}
