use glam::{Mat4, Quat, Vec3};

use crate::config::MIN_HALF_EXTENT;

/// A static, zero-mass box collider in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl StaticBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.max(Vec3::splat(MIN_HALF_EXTENT)),
            rotation: Quat::IDENTITY,
        }
    }

    /// Builds a collider from a scene node's local bounding box and its world
    /// transform. The box keeps the node's world rotation and scale; flat
    /// pieces get a minimal thickness so they still collide.
    pub fn from_node_bounds(local_min: Vec3, local_max: Vec3, world: Mat4) -> Self {
        let (scale, rotation, _) = world.to_scale_rotation_translation();
        let size = (local_max - local_min) * scale.abs();
        let local_center = (local_min + local_max) * 0.5;
        Self {
            center: world.transform_point3(local_center),
            half_extents: (size * 0.5).max(Vec3::splat(MIN_HALF_EXTENT)),
            rotation,
        }
    }
}

/// Static geometry of a level. Immutable once handed to the physics world.
#[derive(Clone, Debug, Default)]
pub struct LevelLayout {
    pub colliders: Vec<StaticBox>,
}

impl LevelLayout {
    /// The built-in run: a long floor slab along +Z, side rails and a handful
    /// of crates to jump or dodge. The slab top sits at y = 0.25 so a resting
    /// player sphere lands in the middle of the ground band.
    pub fn course() -> Self {
        let mut colliders = vec![
            StaticBox::new(Vec3::new(0.0, 0.0, 100.0), Vec3::new(6.0, 0.25, 130.0)),
            StaticBox::new(Vec3::new(-6.5, 0.75, 100.0), Vec3::new(0.5, 0.75, 130.0)),
            StaticBox::new(Vec3::new(6.5, 0.75, 100.0), Vec3::new(0.5, 0.75, 130.0)),
        ];

        // (x, z, yaw) of unit crates placed like scene nodes
        let crates = [
            (-2.5, 24.0, 0.0),
            (2.0, 41.0, 0.4),
            (0.0, 63.0, 0.0),
            (-3.5, 88.0, -0.3),
            (3.0, 110.0, 0.0),
            (-1.0, 137.0, 0.785),
            (2.5, 160.0, 0.0),
            (-2.5, 184.0, 0.2),
            (1.5, 205.0, 0.0),
        ];
        for (x, z, yaw) in crates {
            let world = Mat4::from_rotation_translation(
                Quat::from_rotation_y(yaw),
                Vec3::new(x, 0.75, z),
            );
            colliders.push(StaticBox::from_node_bounds(
                Vec3::splat(-0.5),
                Vec3::splat(0.5),
                world,
            ));
        }

        // Finish gate posts just past the victory line
        colliders.push(StaticBox::new(Vec3::new(-4.5, 2.25, 223.0), Vec3::new(0.3, 2.0, 0.3)));
        colliders.push(StaticBox::new(Vec3::new(4.5, 2.25, 223.0), Vec3::new(0.3, 2.0, 0.3)));

        Self { colliders }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_bounds_follow_world_transform() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 1.0),
            Quat::IDENTITY,
            Vec3::new(10.0, 0.0, -5.0),
        );
        let b = StaticBox::from_node_bounds(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0), world);
        assert!((b.center - Vec3::new(10.0, 1.0, -5.0)).length() < 1e-5);
        assert!((b.half_extents - Vec3::new(2.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn flat_nodes_get_minimum_thickness() {
        let b = StaticBox::from_node_bounds(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(5.0, 0.0, 5.0),
            Mat4::IDENTITY,
        );
        assert_eq!(b.half_extents.y, MIN_HALF_EXTENT);
    }

    #[test]
    fn course_floor_top_matches_ground_band() {
        let floor = LevelLayout::course().colliders[0];
        let top = floor.center.y + floor.half_extents.y;
        let resting = top + crate::config::PLAYER_RADIUS;
        assert!((resting - crate::config::GROUND_THRESHOLD).abs() < 1e-5);
    }
}
