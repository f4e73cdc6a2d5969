use glam::Vec3;
use rapier3d::prelude::*;

use crate::config::*;
use crate::level::{LevelLayout, StaticBox};

/// Position/velocity snapshot of a rigid body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
}

pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    player_body_handle: RigidBodyHandle,
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(level: &LevelLayout, player_spawn: Vec3) -> Self {
        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        // Infinite ground plane
        collider_set.insert(ColliderBuilder::halfspace(Vector::y_axis()).build());

        // Ducky: a rotation-free sphere whose X/Z velocity is driven directly
        let player_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(player_spawn))
            .lock_rotations()
            .can_sleep(false)
            .build();
        let player_body_handle = rigid_body_set.insert(player_body);

        let player_collider = ColliderBuilder::ball(PLAYER_RADIUS)
            .mass(PLAYER_MASS)
            .friction(0.0)
            .build();
        collider_set.insert_with_parent(player_collider, player_body_handle, &mut rigid_body_set);

        let mut world = Self {
            rigid_body_set,
            collider_set,
            gravity: vector![0.0, -GRAVITY, 0.0],
            integration_parameters: IntegrationParameters {
                dt: FIXED_TIME_STEP,
                ..IntegrationParameters::default()
            },
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            player_body_handle,
            accumulator: 0.0,
        };

        for collider in &level.colliders {
            world.add_static_box(collider);
        }
        log::info!("Physics world: {} level colliders", level.colliders.len());

        world
    }

    /// Advances the simulation by `real_delta` seconds using steps of
    /// `fixed_delta`, running at most `max_substeps` steps per call. Time that
    /// does not fill a whole step carries over to the next call.
    pub fn step(&mut self, fixed_delta: f32, real_delta: f32, max_substeps: usize) {
        if !real_delta.is_finite() || real_delta < 0.0 || fixed_delta <= 0.0 {
            return;
        }
        self.integration_parameters.dt = fixed_delta;
        self.accumulator += real_delta;

        let mut substeps = 0;
        while self.accumulator >= fixed_delta && substeps < max_substeps {
            self.step_once();
            self.accumulator -= fixed_delta;
            substeps += 1;
        }
        // Drop whatever the substep cap could not consume
        self.accumulator %= fixed_delta;
        log::trace!("physics: {} substeps, {:.4}s carried", substeps, self.accumulator);
    }

    fn step_once(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    pub fn add_static_box(&mut self, static_box: &StaticBox) -> RigidBodyHandle {
        let (axis, angle) = static_box.rotation.to_axis_angle();
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(static_box.center))
            .rotation(to_vector(axis * angle))
            .build();
        let handle = self.rigid_body_set.insert(body);

        let half = static_box.half_extents;
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// A box that tracks a visual entity but never collides with anything.
    pub fn add_shadow_body(&mut self, center: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let handle = self.rigid_body_set.insert(body);

        let half = half_extents.max(Vec3::splat(MIN_HALF_EXTENT));
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .collision_groups(InteractionGroups::none())
            .solver_groups(InteractionGroups::none())
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    pub fn player_state(&self) -> BodyState {
        let body = &self.rigid_body_set[self.player_body_handle];
        BodyState {
            position: to_vec3(body.translation()),
            velocity: to_vec3(body.linvel()),
        }
    }

    pub fn set_player_velocity(&mut self, velocity: Vec3) {
        self.rigid_body_set[self.player_body_handle].set_linvel(to_vector(velocity), true);
    }

    /// Teleports the player body and zeroes its velocity.
    pub fn reset_player(&mut self, position: Vec3) {
        let body = &mut self.rigid_body_set[self.player_body_handle];
        body.set_translation(to_vector(position), true);
        body.set_linvel(Vector::zeros(), true);
    }

    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| to_vec3(body.translation()))
    }

    pub fn set_body_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(to_vector(position), true);
        }
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
