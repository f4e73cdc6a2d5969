use glam::Vec3;

use crate::config::{CAPTURE_RADIUS, VICTORY_Z};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundState {
    #[default]
    Idle,
    Running,
    Victory,
    GameOver,
}

/// Emitted on every round transition; the host reacts with screens and audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    Victory,
    GameOver,
    RoundReset,
}

#[derive(Clone, Debug)]
pub struct Round {
    state: RoundState,
    pub victory_z: f32,
    pub capture_radius: f32,
}

impl Default for Round {
    fn default() -> Self {
        Self {
            state: RoundState::Idle,
            victory_z: VICTORY_Z,
            capture_radius: CAPTURE_RADIUS,
        }
    }
}

impl Round {
    #[allow(dead_code)]
    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RoundState::Running
    }

    pub fn start(&mut self) -> Option<GameEvent> {
        if self.state != RoundState::Idle {
            log::debug!("Start ignored in {:?}", self.state);
            return None;
        }
        self.state = RoundState::Running;
        log::info!("Round started");
        Some(GameEvent::RoundStarted)
    }

    /// Checks the end conditions of a running round. Victory is checked
    /// before capture, so a tick that crosses both ends in Victory. Without a
    /// chase actor only the victory line applies.
    pub fn evaluate(&mut self, player: Vec3, chaser: Option<Vec3>) -> Option<GameEvent> {
        if self.state != RoundState::Running {
            return None;
        }

        if player.z >= self.victory_z {
            self.state = RoundState::Victory;
            log::info!("Victory at z={:.2}", player.z);
            return Some(GameEvent::Victory);
        }

        if let Some(chaser) = chaser {
            let distance = planar_distance(player, chaser);
            if distance < self.capture_radius {
                self.state = RoundState::GameOver;
                log::info!("Caught by the fox ({:.2} away)", distance);
                return Some(GameEvent::GameOver);
            }
        }

        None
    }

    /// Back to a fresh running round. Idle has to go through `start` first.
    pub fn reset(&mut self) -> Option<GameEvent> {
        if self.state == RoundState::Idle {
            log::debug!("Reset ignored before the first start");
            return None;
        }
        self.state = RoundState::Running;
        log::info!("Round reset");
        Some(GameEvent::RoundReset)
    }
}

/// Distance on the XZ plane, ignoring height.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
