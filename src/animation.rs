use glam::Vec3;
use std::f32::consts::PI;

use crate::config::BACKGROUND_COLOR;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    #[allow(dead_code)]
    Linear,
    Power1Out,
    Power1InOut,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// An endlessly repeating there-and-back tween. `amount()` goes 0 → 1 over
/// `duration`, then back to 0 over the next `duration`.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration: f32,
    ease: Ease,
    elapsed: f32,
    playing: bool,
}

impl Timeline {
    pub fn new(duration: f32, ease: Ease) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            ease,
            elapsed: 0.0,
            playing: false,
        }
    }

    pub fn playing(duration: f32, ease: Ease) -> Self {
        let mut timeline = Self::new(duration, ease);
        timeline.play();
        timeline
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn seek_start(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.playing {
            self.elapsed = (self.elapsed + dt) % (2.0 * self.duration);
        }
    }

    pub fn amount(&self) -> f32 {
        let t = self.elapsed / self.duration;
        let t = if t > 1.0 { 2.0 - t } else { t };
        self.ease.apply(t)
    }

    pub fn lerp(&self, from: f32, to: f32) -> f32 {
        from + (to - from) * self.amount()
    }
}

/// Looping playback position of a baked animation clip.
#[derive(Clone, Debug)]
pub struct ClipClock {
    duration: f32,
    time: f32,
}

impl ClipClock {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(f32::EPSILON),
            time: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.time = (self.time + dt) % self.duration;
    }

    /// Fraction of the clip played, in [0, 1).
    pub fn phase(&self) -> f32 {
        self.time / self.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuckyPart {
    Body,
    RightLeg,
    LeftLeg,
    Bow,
}

impl DuckyPart {
    #[allow(dead_code)]
    pub const ALL: [DuckyPart; 4] = [
        DuckyPart::Body,
        DuckyPart::RightLeg,
        DuckyPart::LeftLeg,
        DuckyPart::Bow,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Offsets applied on top of the Ducky rest pose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GaitPose {
    pub right_leg_pitch: f32,
    pub left_leg_pitch: f32,
    pub bow_lift: f32,
}

struct GaitTimelines {
    right_leg: Timeline,
    left_leg: Timeline,
    bow: Timeline,
}

impl GaitTimelines {
    fn new() -> Self {
        Self {
            right_leg: Timeline::new(0.22, Ease::Power1InOut),
            left_leg: Timeline::new(0.28, Ease::Power1InOut),
            bow: Timeline::new(0.35, Ease::SineInOut),
        }
    }

    fn each(&mut self, mut f: impl FnMut(&mut Timeline)) {
        f(&mut self.right_leg);
        f(&mut self.left_leg);
        f(&mut self.bow);
    }
}

/// Leg and bow bob while Ducky walks. Timelines only exist once both legs
/// and the bow have loaded.
#[derive(Default)]
pub struct GaitAnimator {
    loaded: [bool; 4],
    timelines: Option<GaitTimelines>,
    moving: bool,
}

impl GaitAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, part: DuckyPart) {
        self.loaded[part.index()] = true;
        let animated = [DuckyPart::RightLeg, DuckyPart::LeftLeg, DuckyPart::Bow];
        if self.timelines.is_none() && animated.iter().all(|p| self.has_part(*p)) {
            let mut timelines = GaitTimelines::new();
            if self.moving {
                timelines.each(Timeline::play);
            }
            self.timelines = Some(timelines);
            log::info!("Ducky gait ready");
        }
    }

    pub fn has_part(&self, part: DuckyPart) -> bool {
        self.loaded[part.index()]
    }

    #[allow(dead_code)]
    pub fn is_ready(&self) -> bool {
        self.timelines.is_some()
    }

    #[allow(dead_code)]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Starts the bob on a rising edge, stops and rewinds it on a falling one.
    pub fn set_moving(&mut self, moving: bool) {
        if moving == self.moving {
            return;
        }
        self.moving = moving;
        if let Some(timelines) = &mut self.timelines {
            if moving {
                timelines.each(Timeline::play);
            } else {
                timelines.each(|t| {
                    t.pause();
                    t.seek_start();
                });
            }
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(timelines) = &mut self.timelines {
            timelines.each(|t| t.advance(dt));
        }
    }

    pub fn reset(&mut self) {
        if let Some(timelines) = &mut self.timelines {
            timelines.each(|t| {
                t.pause();
                t.seek_start();
            });
        }
        self.moving = false;
    }

    pub fn pose(&self) -> GaitPose {
        match &self.timelines {
            Some(t) => GaitPose {
                right_leg_pitch: t.right_leg.lerp(0.0, 0.45),
                left_leg_pitch: t.left_leg.lerp(0.0, -0.45),
                bow_lift: t.bow.lerp(0.0, 0.04),
            },
            None => GaitPose::default(),
        }
    }
}

/// Slow pulses of the moon, fog and flashlight. Always running.
pub struct Ambience {
    moon: Timeline,
    fog: Timeline,
    flashlight: Timeline,
}

impl Ambience {
    pub fn new() -> Self {
        Self {
            moon: Timeline::playing(3.0, Ease::SineInOut),
            fog: Timeline::playing(6.0, Ease::Power1Out),
            flashlight: Timeline::playing(1.5, Ease::SineInOut),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.moon.advance(dt);
        self.fog.advance(dt);
        self.flashlight.advance(dt);
    }

    pub fn moon_intensity(&self) -> f32 {
        self.moon.lerp(0.6, 0.4)
    }

    pub fn flashlight_intensity(&self) -> f32 {
        self.flashlight.lerp(2.2, 1.8)
    }

    pub fn fog_color(&self) -> Vec3 {
        Vec3::from(BACKGROUND_COLOR).lerp(Vec3::new(0.03, 0.03, 0.06), self.fog.amount())
    }
}

impl Default for Ambience {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_gait() -> GaitAnimator {
        let mut gait = GaitAnimator::new();
        for part in DuckyPart::ALL {
            gait.attach(part);
        }
        gait
    }

    #[test]
    fn easings_hit_endpoints() {
        for ease in [Ease::Linear, Ease::Power1Out, Ease::Power1InOut, Ease::SineInOut] {
            assert!(ease.apply(0.0).abs() < 1e-6);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!((Ease::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn timeline_yoyos() {
        let mut t = Timeline::playing(1.0, Ease::Linear);
        t.advance(0.25);
        assert!((t.amount() - 0.25).abs() < 1e-6);
        t.advance(1.0);
        assert!((t.amount() - 0.75).abs() < 1e-6);
        t.advance(0.75);
        assert!(t.amount().abs() < 1e-6);
    }

    #[test]
    fn paused_timeline_holds() {
        let mut t = Timeline::new(1.0, Ease::Linear);
        t.advance(0.5);
        assert_eq!(t.amount(), 0.0);
    }

    #[test]
    fn clip_clock_wraps() {
        let mut clip = ClipClock::new(2.0);
        clip.advance(3.0);
        assert!((clip.phase() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn gait_waits_for_all_animated_parts() {
        let mut gait = GaitAnimator::new();
        gait.attach(DuckyPart::RightLeg);
        gait.attach(DuckyPart::Bow);
        assert!(!gait.is_ready());
        gait.set_moving(true);
        gait.advance(0.1);
        assert_eq!(gait.pose(), GaitPose::default());

        gait.attach(DuckyPart::LeftLeg);
        assert!(gait.is_ready());
    }

    #[test]
    fn gait_plays_while_moving_and_rewinds_on_stop() {
        let mut gait = loaded_gait();
        gait.set_moving(true);
        gait.advance(0.1);
        assert!(gait.pose().right_leg_pitch > 0.0);
        assert!(gait.pose().left_leg_pitch < 0.0);

        gait.set_moving(false);
        assert_eq!(gait.pose(), GaitPose::default());
        gait.advance(0.1);
        assert_eq!(gait.pose(), GaitPose::default());
    }

    #[test]
    fn gait_reset_clears_moving() {
        let mut gait = loaded_gait();
        gait.set_moving(true);
        gait.advance(0.2);
        gait.reset();
        assert!(!gait.is_moving());
        assert_eq!(gait.pose(), GaitPose::default());
    }

    #[test]
    fn ambience_starts_at_rest_values() {
        let ambience = Ambience::new();
        assert!((ambience.moon_intensity() - 0.6).abs() < 1e-6);
        assert!((ambience.flashlight_intensity() - 2.2).abs() < 1e-6);
        assert_eq!(ambience.fog_color(), Vec3::from(BACKGROUND_COLOR));
    }
}
