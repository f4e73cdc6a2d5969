use glam::{Mat4, Vec3};

use crate::config::*;
use crate::input::InputState;
use crate::physics::BodyState;

/// On-screen avatar pose. Position follows the physics body; yaw is smoothed
/// on its own since the body never rotates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerVisual {
    pub position: Vec3,
    pub yaw: f32,
}

impl PlayerVisual {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    pub fn sync_from_body(&mut self, body_position: Vec3) {
        self.position = body_position + Vec3::new(0.0, VISUAL_Y_OFFSET, 0.0);
    }

    pub fn respawn(&mut self) {
        *self = Self::new();
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.yaw)
    }
}

impl Default for PlayerVisual {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct PlayerController {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub ground_threshold: f32,
    pub ground_band: f32,
    pub turn_factor: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            ground_threshold: GROUND_THRESHOLD,
            ground_band: GROUND_BAND,
            turn_factor: TURN_FACTOR,
        }
    }
}

impl PlayerController {
    /// Raw direction from opposing key pairs: -Z is forward, +X is right.
    pub fn intent(input: &InputState) -> Vec3 {
        let axis = |negative: bool, positive: bool| {
            (if positive { 1.0 } else { 0.0 }) - (if negative { 1.0 } else { 0.0 })
        };
        Vec3::new(
            axis(input.left, input.right),
            0.0,
            axis(input.forward, input.backward),
        )
    }

    /// Horizontal velocity for the given input. Diagonals are normalized so
    /// they are no faster than a single axis.
    pub fn planar_velocity(&self, input: &InputState) -> Vec3 {
        Self::intent(input).normalize_or_zero() * self.move_speed
    }

    /// Ground contact approximated by a height band around the resting height.
    pub fn is_grounded(&self, body: &BodyState) -> bool {
        (body.position.y - self.ground_threshold).abs() < self.ground_band
    }

    /// Writes X/Z velocity (and a jump when grounded) into `body`, and turns
    /// the avatar toward the direction of travel. Returns whether the avatar
    /// is moving.
    pub fn apply(&self, input: &InputState, body: &mut BodyState, visual: &mut PlayerVisual) -> bool {
        let movement = self.planar_velocity(input);
        body.velocity.x = movement.x;
        body.velocity.z = movement.z;

        if input.jump && self.is_grounded(body) {
            body.velocity.y = self.jump_speed;
        }

        let moving = movement.length_squared() > MOVING_EPSILON;
        if moving {
            let target_yaw = movement.x.atan2(movement.z);
            visual.yaw += (target_yaw - visual.yaw) * self.turn_factor;
        }
        moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(y: f32) -> BodyState {
        BodyState {
            position: Vec3::new(0.0, y, 0.0),
            velocity: Vec3::new(0.0, -1.25, 0.0),
        }
    }

    fn input(forward: bool, backward: bool, left: bool, right: bool) -> InputState {
        InputState {
            forward,
            backward,
            left,
            right,
            jump: false,
        }
    }

    #[test]
    fn diagonals_are_normalized() {
        let controller = PlayerController::default();
        for (f, b, l, r) in [
            (true, false, true, false),
            (true, false, false, true),
            (false, true, true, false),
            (false, true, false, true),
        ] {
            let v = controller.planar_velocity(&input(f, b, l, r));
            assert!((v.length() - controller.move_speed).abs() < 1e-5);
            assert!(v.x != 0.0 && v.z != 0.0);
        }
    }

    #[test]
    fn forward_is_negative_z() {
        let controller = PlayerController::default();
        let v = controller.planar_velocity(&input(true, false, false, false));
        assert_eq!(v, Vec3::new(0.0, 0.0, -MOVE_SPEED));
    }

    #[test]
    fn zero_intent_keeps_vertical_velocity() {
        let controller = PlayerController::default();
        let mut body = body_at(3.0);
        body.velocity = Vec3::new(4.0, -2.0, 4.0);
        let mut visual = PlayerVisual::new();

        let moving = controller.apply(&InputState::default(), &mut body, &mut visual);
        assert!(!moving);
        assert_eq!(body.velocity, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(visual.yaw, 0.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let controller = PlayerController::default();
        let v = controller.planar_velocity(&input(true, true, true, true));
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn jump_inside_ground_band() {
        let controller = PlayerController::default();
        let mut body = body_at(1.1);
        let jump = InputState {
            jump: true,
            ..InputState::default()
        };
        controller.apply(&jump, &mut body, &mut PlayerVisual::new());
        assert_eq!(body.velocity.y, JUMP_SPEED);
    }

    #[test]
    fn no_jump_outside_ground_band() {
        let controller = PlayerController::default();
        let jump = InputState {
            jump: true,
            ..InputState::default()
        };
        for y in [0.8, 1.3, 4.0] {
            let mut body = body_at(y);
            controller.apply(&jump, &mut body, &mut PlayerVisual::new());
            assert_eq!(body.velocity.y, -1.25, "jumped at y={y}");
        }
    }

    #[test]
    fn yaw_turns_toward_movement() {
        let controller = PlayerController::default();
        let mut body = body_at(1.05);
        let mut visual = PlayerVisual::new();
        controller.apply(&input(false, false, false, true), &mut body, &mut visual);

        let expected = std::f32::consts::FRAC_PI_2 * TURN_FACTOR;
        assert!((visual.yaw - expected).abs() < 1e-6);
    }

    #[test]
    fn visual_sits_below_body() {
        let mut visual = PlayerVisual::new();
        visual.sync_from_body(Vec3::new(1.0, 1.05, -3.0));
        assert!((visual.position - Vec3::new(1.0, 0.65, -3.0)).length() < 1e-6);
    }
}
