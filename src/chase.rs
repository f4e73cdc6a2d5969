use glam::Vec3;
use rand::Rng;
use rapier3d::prelude::RigidBodyHandle;

use crate::config::*;
use crate::physics::PhysicsWorld;

/// Draws a pursuit speed for one round.
pub fn generate_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(FOX_MIN_SPEED..=FOX_MAX_SPEED)
}

/// The fox. Moves along +Z at a speed fixed for the whole round and slides
/// sideways to stay in the player's lane.
pub struct ChaseActor {
    pub position: Vec3,
    speed: f32,
    start: Vec3,
    size: Vec3,
    shadow_body: RigidBodyHandle,
    shadow_offset: Vec3,
}

impl ChaseActor {
    /// Spawns the fox at its start offset. `bounds_min`/`bounds_max` are the
    /// model's local bounds before scaling; the shadow body is sized from them.
    pub fn spawn<R: Rng + ?Sized>(
        physics: &mut PhysicsWorld,
        rng: &mut R,
        bounds_min: Vec3,
        bounds_max: Vec3,
    ) -> Self {
        let start = Vec3::new(0.0, 0.0, FOX_START_Z);
        // Z is shared with the visual; only the height and lateral centre are offset
        let centre = (bounds_min + bounds_max) * 0.5 * FOX_SCALE;
        let shadow_offset = Vec3::new(centre.x, centre.y, 0.0);
        let size = (bounds_max - bounds_min) * FOX_SCALE;
        let shadow_body = physics.add_shadow_body(start + shadow_offset, size * 0.5);
        let speed = generate_speed(rng);
        log::debug!("Fox speed {:.2}", speed);

        Self {
            position: start,
            speed,
            start,
            size,
            shadow_body,
            shadow_offset,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Scaled model size.
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[allow(dead_code)]
    pub fn shadow_body(&self) -> RigidBodyHandle {
        self.shadow_body
    }

    /// One running tick: advance along the chase axis, keep the shadow body's
    /// Z in step and copy the player's lane.
    pub fn advance(&mut self, dt: f32, player_x: f32, physics: &mut PhysicsWorld) {
        self.position.z += self.speed * dt;
        if let Some(mut shadow) = physics.body_translation(self.shadow_body) {
            shadow.z = self.position.z;
            physics.set_body_translation(self.shadow_body, shadow);
        }
        self.position.x = player_x;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, physics: &mut PhysicsWorld, rng: &mut R) {
        self.position = self.start;
        physics.set_body_translation(self.shadow_body, self.position + self.shadow_offset);
        self.speed = generate_speed(rng);
        log::debug!("Fox reset, speed {:.2}", self.speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelLayout;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn setup() -> (PhysicsWorld, SmallRng) {
        let physics = PhysicsWorld::new(&LevelLayout::default(), Vec3::from(PLAYER_SPAWN));
        (physics, SmallRng::seed_from_u64(7))
    }

    fn fox_bounds() -> (Vec3, Vec3) {
        (Vec3::new(-8.0, 0.0, -40.0), Vec3::new(8.0, 30.0, 40.0))
    }

    #[test]
    fn speed_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let v = generate_speed(&mut rng);
            assert!((FOX_MIN_SPEED..=FOX_MAX_SPEED).contains(&v));
        }
    }

    #[test]
    fn speed_is_roughly_uniform() {
        let mut rng = SmallRng::seed_from_u64(2);
        let n = 20_000;
        let mut buckets = [0usize; 5];
        let width = (FOX_MAX_SPEED - FOX_MIN_SPEED) / buckets.len() as f32;
        for _ in 0..n {
            let v = generate_speed(&mut rng);
            let i = (((v - FOX_MIN_SPEED) / width) as usize).min(buckets.len() - 1);
            buckets[i] += 1;
        }
        let expected = n / buckets.len();
        for count in buckets {
            let deviation = (count as f32 - expected as f32).abs() / expected as f32;
            assert!(deviation < 0.1, "bucket {count} vs {expected}");
        }
    }

    #[test]
    fn advance_moves_along_z_and_copies_lane() {
        let (mut physics, mut rng) = setup();
        let (min, max) = fox_bounds();
        let mut fox = ChaseActor::spawn(&mut physics, &mut rng, min, max);
        let speed = fox.speed();

        fox.advance(0.5, 2.25, &mut physics);
        assert!((fox.position.z - (FOX_START_Z + speed * 0.5)).abs() < 1e-5);
        assert_eq!(fox.position.x, 2.25);
        assert_eq!(fox.position.y, 0.0);
    }

    #[test]
    fn shadow_body_follows_z() {
        let (mut physics, mut rng) = setup();
        let (min, max) = fox_bounds();
        let mut fox = ChaseActor::spawn(&mut physics, &mut rng, min, max);
        let before = physics.body_translation(fox.shadow_body()).unwrap();
        assert!((before.y - 1.5).abs() < 1e-5);

        fox.advance(1.0, 3.0, &mut physics);
        let after = physics.body_translation(fox.shadow_body()).unwrap();
        assert!((after.z - fox.position.z).abs() < 1e-5);
        assert_eq!(after.x, before.x);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn reset_returns_to_start_with_fresh_speed() {
        let (mut physics, mut rng) = setup();
        let (min, max) = fox_bounds();
        let mut fox = ChaseActor::spawn(&mut physics, &mut rng, min, max);
        fox.advance(3.0, -1.0, &mut physics);

        fox.reset(&mut physics, &mut rng);
        assert_eq!(fox.position, Vec3::new(0.0, 0.0, FOX_START_Z));
        assert!((FOX_MIN_SPEED..=FOX_MAX_SPEED).contains(&fox.speed()));
        let shadow = physics.body_translation(fox.shadow_body()).unwrap();
        assert!((shadow.z - FOX_START_Z).abs() < 1e-5);
    }

    #[test]
    fn shadow_z_matches_visual_with_off_centre_bounds() {
        let (mut physics, mut rng) = setup();
        let mut fox =
            ChaseActor::spawn(&mut physics, &mut rng, Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 10.0, 20.0));
        let spawned = physics.body_translation(fox.shadow_body()).unwrap();
        assert_eq!(spawned.z, fox.position.z);
        assert!((spawned.y - 0.5).abs() < 1e-5);

        fox.advance(1.0, 0.0, &mut physics);
        let moved = physics.body_translation(fox.shadow_body()).unwrap();
        assert_eq!(moved.z, fox.position.z);

        fox.reset(&mut physics, &mut rng);
        let back = physics.body_translation(fox.shadow_body()).unwrap();
        assert_eq!(back.z, FOX_START_Z);
        assert!((back.y - 0.5).abs() < 1e-5);
    }
}
