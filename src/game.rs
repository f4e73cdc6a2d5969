use glam::Vec3;
use rand::rngs::SmallRng;

use crate::animation::{Ambience, ClipClock, GaitAnimator};
use crate::assets::{AssetEvent, AssetInbox};
use crate::camera::{FollowCamera, Flashlight};
use crate::chase::ChaseActor;
use crate::config::*;
use crate::input::InputState;
use crate::level::LevelLayout;
use crate::physics::PhysicsWorld;
use crate::player::{PlayerController, PlayerVisual};
use crate::round::{GameEvent, Round, RoundState};

/// Everything the game mutates, owned in one place and advanced by `tick`.
pub struct SimulationState {
    pub physics: PhysicsWorld,
    pub controller: PlayerController,
    pub visual: PlayerVisual,
    pub chase: Option<ChaseActor>,
    pub round: Round,
    pub camera: FollowCamera,
    pub flashlight: Flashlight,
    pub gait: GaitAnimator,
    pub fox_clip: Option<ClipClock>,
    pub ambience: Ambience,
    assets: AssetInbox,
    rng: SmallRng,
    events: Vec<GameEvent>,
    spawn: Vec3,
}

impl SimulationState {
    pub fn new(level: &LevelLayout, assets: AssetInbox, rng: SmallRng) -> Self {
        let spawn = Vec3::from(PLAYER_SPAWN);
        Self {
            physics: PhysicsWorld::new(level, spawn),
            controller: PlayerController::default(),
            visual: PlayerVisual::new(),
            chase: None,
            round: Round::default(),
            camera: FollowCamera::default(),
            flashlight: Flashlight::new(),
            gait: GaitAnimator::new(),
            fox_clip: None,
            ambience: Ambience::new(),
            assets,
            rng,
            events: Vec::new(),
            spawn,
        }
    }

    /// One frame. `input` is the key state sampled for this frame and `dt`
    /// the real time since the previous one.
    pub fn tick(&mut self, input: InputState, dt: f32) {
        for event in self.assets.drain() {
            self.handle_asset(event);
        }

        self.physics.step(FIXED_TIME_STEP, dt, MAX_SUBSTEPS);

        // Outside a running round the avatar gets no input and stops
        let input = if self.round.is_running() {
            input
        } else {
            InputState::default()
        };
        let mut body = self.physics.player_state();
        let moving = self.controller.apply(&input, &mut body, &mut self.visual);
        self.physics.set_player_velocity(body.velocity);
        self.visual.sync_from_body(body.position);

        if self.round.is_running() {
            if let Some(chase) = &mut self.chase {
                chase.advance(dt, self.visual.position.x, &mut self.physics);
            }
        }

        let chaser = self.chase_position();
        if let Some(event) = self.round.evaluate(self.visual.position, chaser) {
            self.events.push(event);
        }

        self.camera.update(self.visual.position.z);
        self.flashlight
            .update(self.camera.position, self.player_visual_position());

        if let Some(clip) = &mut self.fox_clip {
            clip.advance(dt);
        }
        self.gait.set_moving(moving);
        self.gait.advance(dt);
        self.ambience.advance(dt);
    }

    pub fn start(&mut self) {
        if let Some(event) = self.round.start() {
            self.events.push(event);
        }
    }

    /// Puts Ducky and the fox back at their spawn points and starts a new
    /// round. Does nothing before the first start.
    pub fn reset(&mut self) {
        let Some(event) = self.round.reset() else {
            return;
        };

        self.physics.reset_player(self.spawn);
        self.visual.respawn();
        if let Some(chase) = &mut self.chase {
            chase.reset(&mut self.physics, &mut self.rng);
        }
        self.gait.reset();
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[allow(dead_code)]
    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn player_visual_position(&self) -> Vec3 {
        self.visual.position
    }

    pub fn chase_position(&self) -> Option<Vec3> {
        self.chase.as_ref().map(|chase| chase.position)
    }

    fn handle_asset(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::FoxReady {
                bounds_min,
                bounds_max,
                clip_duration,
            } => {
                if self.chase.is_some() {
                    log::warn!("Fox loaded twice, keeping the first");
                    return;
                }
                let fox = ChaseActor::spawn(&mut self.physics, &mut self.rng, bounds_min, bounds_max);
                log::info!("Fox ready at z={:.1}, speed {:.2}", fox.position.z, fox.speed());
                self.chase = Some(fox);
                self.fox_clip = Some(ClipClock::new(clip_duration));
            }
            AssetEvent::DuckyPartReady(part) => {
                log::info!("Ducky part ready: {:?}", part);
                self.gait.attach(part);
            }
        }
    }
}
