// src/ui/anim.rs
//! Tween scheduler with an explicit clock.
//!
//! Usage sketch:
//! ```ignore
//! use crate::ui::anim::*;
//!
//! let mut anim: Scheduler<Cue> = Scheduler::new();
//!
//! // position and rotation run as independent tweens on the same card
//! anim.add(exponential_in_out(1.2).position(Subject::Card(3), vec3(0.0, 240.0, 1000.0)).cue(Cue::Landed));
//! anim.add(exponential_in_out(0.9).rotation(Subject::Card(3), vec3(0.0, 0.0, 0.0)));
//!
//! // aggregate "everything settled" signal
//! anim.add(sleep(2.0).cue(Cue::Settled));
//!
//! // each frame
//! for cue in anim.tick(&mut stage, dt) {
//!     handle(cue);
//! }
//! ```
use cgmath::Vector3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// tween.js `Exponential.InOut`
    ExponentialInOut,
}

pub fn ease_apply(e: Ease, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Ease::Linear => t,
        Ease::ExponentialInOut => {
            if t <= 0.0 { return 0.0; }
            if t >= 1.0 { return 1.0; }
            let k = t * 2.0;
            if k < 1.0 {
                0.5 * 1024f32.powf(k - 1.0)
            } else {
                0.5 * (2.0 - 2f32.powf(-10.0 * (k - 1.0)))
            }
        }
    }
}

/// What a tween writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    Card(usize),
    Camera,
    /// The scene root (whole-formation spin).
    Stage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Position,
    /// Euler XYZ, radians.
    Rotation,
    Scale,
}

/// Lets the scheduler write live values into whatever owns the subjects.
/// Returning `None` means the subject is gone; the tween keeps its clock
/// but writes nothing.
pub trait Animatable {
    fn channel_mut(&mut self, subject: Subject, channel: Channel) -> Option<&mut Vector3<f32>>;
}

#[derive(Clone, Copy, Debug)]
struct Op {
    subject: Subject,
    channel: Channel,
    to: Vector3<f32>,
    // captured on first tick
    from: Option<Vector3<f32>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

/// Builder for one tween (mirrors the `linear(t):xy(..)` command style).
#[derive(Clone, Debug)]
pub struct TweenBuilder<C> {
    ease: Ease,
    dur: f32,
    ops: Vec<Op>,
    cue: Option<C>,
}

impl<C> TweenBuilder<C> {
    fn new(ease: Ease, dur: f32) -> Self {
        Self { ease, dur: dur.max(0.0), ops: Vec::new(), cue: None }
    }

    fn op(mut self, subject: Subject, channel: Channel, to: Vector3<f32>) -> Self {
        self.ops.push(Op { subject, channel, to, from: None });
        self
    }

    pub fn position(self, subject: Subject, to: Vector3<f32>) -> Self { self.op(subject, Channel::Position, to) }
    pub fn rotation(self, subject: Subject, to: Vector3<f32>) -> Self { self.op(subject, Channel::Rotation, to) }
    pub fn scale(self, subject: Subject, to: Vector3<f32>) -> Self { self.op(subject, Channel::Scale, to) }

    /// Value handed back by `Scheduler::tick` once the duration has elapsed.
    pub fn cue(mut self, cue: C) -> Self {
        self.cue = Some(cue);
        self
    }
}

pub fn linear<C>(dur: f32) -> TweenBuilder<C> { TweenBuilder::new(Ease::Linear, dur) }
pub fn exponential_in_out<C>(dur: f32) -> TweenBuilder<C> { TweenBuilder::new(Ease::ExponentialInOut, dur) }

/// A tween with no targets: only its clock and cue matter.
pub fn sleep<C>(dur: f32) -> TweenBuilder<C> { TweenBuilder::new(Ease::Linear, dur) }

#[derive(Debug)]
struct Tween<C> {
    id: TweenId,
    ease: Ease,
    dur: f32,
    elapsed: f32,
    ops: Vec<Op>,
    prepared_once: bool,
    cue: Option<C>,
}

impl<C> Tween<C> {
    fn prepare_if_needed<W: Animatable>(&mut self, world: &mut W) {
        if self.prepared_once { return; }
        for op in &mut self.ops {
            op.from = world.channel_mut(op.subject, op.channel).map(|v| *v);
        }
        self.prepared_once = true;
    }

    fn apply<W: Animatable>(&self, world: &mut W, a: f32) {
        for op in &self.ops {
            let Some(from) = op.from else { continue; };
            if let Some(v) = world.channel_mut(op.subject, op.channel) {
                *v = if a >= 1.0 { op.to } else { from + (op.to - from) * a };
            }
        }
    }

    /// Returns true once the duration boundary is reached.
    fn update<W: Animatable>(&mut self, world: &mut W, dt: f32) -> bool {
        self.prepare_if_needed(world);

        if self.dur == 0.0 {
            self.apply(world, 1.0);
            return true;
        }

        self.elapsed = (self.elapsed + dt).min(self.dur);
        if self.elapsed >= self.dur {
            // snap to exact targets
            self.apply(world, 1.0);
            return true;
        }
        self.apply(world, ease_apply(self.ease, self.elapsed / self.dur));
        false
    }
}

/// Owns every in-flight tween of one presentation session.
#[derive(Debug)]
pub struct Scheduler<C> {
    tweens: Vec<Tween<C>>,
    next_id: u64,
    epoch: u64,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self { tweens: Vec::new(), next_id: 0, epoch: 0 }
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, b: TweenBuilder<C>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tweens.push(Tween {
            id,
            ease: b.ease,
            dur: b.dur,
            elapsed: 0.0,
            ops: b.ops,
            prepared_once: false,
            cue: b.cue,
        });
        id
    }

    /// Advance every tween by `dt` seconds. Cues of tweens that finished on
    /// this tick come back in insertion order; each cue is returned once.
    pub fn tick<W: Animatable>(&mut self, world: &mut W, dt: f32) -> Vec<C> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.tweens.len() {
            if self.tweens[i].update(world, dt) {
                let done = self.tweens.remove(i);
                if let Some(cue) = done.cue {
                    fired.push(cue);
                }
            } else {
                i += 1;
            }
        }
        fired
    }

    /// Drop every in-flight tween without firing its cue.
    pub fn cancel_all(&mut self) {
        if !self.tweens.is_empty() {
            log::debug!("Cancelling {} in-flight tweens.", self.tweens.len());
        }
        self.tweens.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Drop one tween; its cue never fires. Returns false if it already finished.
    pub fn cancel(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.id != id);
        self.tweens.len() != before
    }

    /// Bumped by every `cancel_all`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[derive(Default)]
    struct World {
        pos: Vec<Vector3<f32>>,
        rot: Vec<Vector3<f32>>,
    }

    impl World {
        fn with_cards(n: usize) -> Self {
            Self { pos: vec![vec3(0.0, 0.0, 0.0); n], rot: vec![vec3(0.0, 0.0, 0.0); n] }
        }
    }

    impl Animatable for World {
        fn channel_mut(&mut self, subject: Subject, channel: Channel) -> Option<&mut Vector3<f32>> {
            let Subject::Card(i) = subject else { return None; };
            match channel {
                Channel::Position => self.pos.get_mut(i),
                Channel::Rotation => self.rot.get_mut(i),
                Channel::Scale => None,
            }
        }
    }

    #[test]
    fn cue_fires_once_after_duration() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<&'static str> = Scheduler::new();
        s.add(linear(1.0).position(Subject::Card(0), vec3(4.0, 0.0, 0.0)).cue("done"));

        let mut fired_at = Vec::new();
        let mut clock = 0.0;
        for _ in 0..40 {
            clock += 0.25;
            for cue in s.tick(&mut w, 0.25) {
                fired_at.push((cue, clock));
            }
        }
        assert_eq!(fired_at, vec![("done", 1.0)]);
        assert_eq!(w.pos[0], vec3(4.0, 0.0, 0.0));
    }

    #[test]
    fn interpolates_live_values() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<()> = Scheduler::new();
        s.add(linear(1.0).position(Subject::Card(0), vec3(10.0, -10.0, 2.0)));
        assert!(s.tick(&mut w, 0.5).is_empty());
        assert_eq!(w.pos[0], vec3(5.0, -5.0, 1.0));
    }

    #[test]
    fn overlapping_tweens_complete_independently() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<u8> = Scheduler::new();
        s.add(linear(1.0).position(Subject::Card(0), vec3(1.0, 0.0, 0.0)).cue(1));
        s.add(linear(0.5).rotation(Subject::Card(0), vec3(0.0, 3.0, 0.0)).cue(2));

        assert_eq!(s.tick(&mut w, 0.5), vec![2]);
        assert_eq!(w.rot[0], vec3(0.0, 3.0, 0.0));
        assert_eq!(s.tick(&mut w, 0.5), vec![1]);
        assert_eq!(w.pos[0], vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn start_value_is_captured_on_first_tick() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<()> = Scheduler::new();
        s.add(linear(1.0).position(Subject::Card(0), vec3(2.0, 0.0, 0.0)));
        w.pos[0] = vec3(1.0, 0.0, 0.0);
        s.tick(&mut w, 0.5);
        assert_eq!(w.pos[0], vec3(1.5, 0.0, 0.0));
    }

    #[test]
    fn cancel_all_drops_cues() {
        let mut w = World::with_cards(2);
        let mut s: Scheduler<u8> = Scheduler::new();
        s.add(linear(1.0).position(Subject::Card(0), vec3(1.0, 0.0, 0.0)).cue(1));
        s.add(sleep(1.0).cue(2));
        s.tick(&mut w, 0.5);
        let before = s.epoch();
        s.cancel_all();
        assert_ne!(s.epoch(), before);
        assert!(s.tick(&mut w, 5.0).is_empty());
        assert_eq!(w.pos[0], vec3(0.5, 0.0, 0.0));
    }

    #[test]
    fn cancel_one_keeps_the_rest() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<u8> = Scheduler::new();
        let spin = s.add(linear(10.0).rotation(Subject::Card(0), vec3(0.0, 9.0, 0.0)).cue(1));
        s.add(sleep(1.0).cue(2));
        let epoch = s.epoch();
        assert!(s.cancel(spin));
        assert!(!s.cancel(spin));
        assert_eq!(s.epoch(), epoch);
        assert_eq!(s.tick(&mut w, 20.0), vec![2]);
        assert_eq!(w.rot[0], vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn missing_subject_still_completes() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<&'static str> = Scheduler::new();
        s.add(linear(0.5).position(Subject::Card(9), vec3(1.0, 1.0, 1.0)).cue("ghost"));
        assert_eq!(s.tick(&mut w, 0.5), vec!["ghost"]);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut w = World::with_cards(1);
        let mut s: Scheduler<u8> = Scheduler::new();
        let id = s.add(linear(0.0).position(Subject::Card(0), vec3(7.0, 0.0, 0.0)).cue(7));
        assert_eq!(s.tick(&mut w, 0.0), vec![7]);
        assert_eq!(w.pos[0].x, 7.0);
        // already finished, nothing left to cancel
        assert!(!s.cancel(id));
    }

    #[test]
    fn exponential_in_out_shape() {
        assert_eq!(ease_apply(Ease::ExponentialInOut, 0.0), 0.0);
        assert_eq!(ease_apply(Ease::ExponentialInOut, 1.0), 1.0);
        assert!((ease_apply(Ease::ExponentialInOut, 0.5) - 0.5).abs() < 1e-6);
        assert!(ease_apply(Ease::ExponentialInOut, 0.1) < 0.01);
        assert!(ease_apply(Ease::ExponentialInOut, 0.9) > 0.99);
    }
}
