use rand::Rng;

use crate::lottery::geometry::Size;
use crate::ui::color;

// simulation runs in fixed 60 Hz steps; velocities are px per step
const STEP: f32 = 1.0 / 60.0;
const GRAVITY: f32 = 3.0;
const LIFETIME_STEPS: u32 = 200;
const PALETTE: [&str; 7] = ["#26ccff", "#a25afd", "#ff5e7e", "#88ff5a", "#fcff42", "#ffa62d", "#ff36ff"];

// ---- centre bursts ----
const BURST_TOTAL: f32 = 200.0;
const BURST_ORIGIN: (f32, f32) = (0.5, 0.7);
const BURST_RATIO: [f32; 5]    = [0.25, 0.2, 0.35, 0.1, 0.1];
const BURST_SPREAD: [f32; 5]   = [26.0, 60.0, 100.0, 120.0, 120.0];
const BURST_VELOCITY: [f32; 5] = [55.0, 45.0, 45.0, 25.0, 45.0];
const BURST_DECAY: [f32; 5]    = [0.9, 0.9, 0.91, 0.92, 0.9];

// ---- side stream ----
const STREAM_SECONDS: f32 = 3.0;
const STREAM_PER_EDGE: usize = 2;
const STREAM_SPREAD: f32 = 55.0;
const STREAM_VELOCITY: f32 = 45.0;
const STREAM_DECAY: f32 = 0.9;

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Screen-space heading in radians; +y is down.
    heading: f32,
    velocity: f32,
    decay: f32,
    age: u32,
    pub color: [f32; 4],
}

impl Particle {
    fn step(&mut self) {
        self.x += self.heading.cos() * self.velocity;
        self.y += self.heading.sin() * self.velocity + GRAVITY;
        self.velocity *= self.decay;
        self.age += 1;
    }

    pub fn alive(&self) -> bool {
        self.age < LIFETIME_STEPS
    }

    /// 1.0 when fresh, fading linearly to 0.0.
    pub fn opacity(&self) -> f32 {
        1.0 - self.age as f32 / LIFETIME_STEPS as f32
    }
}

struct Shot {
    origin: (f32, f32),
    angle_deg: f32,
    spread_deg: f32,
    velocity: f32,
    decay: f32,
}

pub struct Confetti {
    bounds: Size,
    particles: Vec<Particle>,
    stream_left: f32,
    acc: f32,
    palette: Vec<[f32; 4]>,
}

impl Confetti {
    pub fn new(bounds: Size) -> Self {
        let palette = PALETTE.iter().map(|h| color::rgba_hex_or(h, [1.0, 1.0, 1.0, 1.0])).collect();
        Self { bounds, particles: Vec::new(), stream_left: 0.0, acc: 0.0, palette }
    }

    /// New bursts and stream shots use `bounds`; particles in flight keep going.
    pub fn resize(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty() || self.stream_left > 0.0
    }

    /// Five centre bursts right away, then the side stream for a few seconds.
    pub fn fire<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in 0..BURST_RATIO.len() {
            let count = (BURST_TOTAL * BURST_RATIO[i]).round() as usize;
            let shot = Shot {
                origin: BURST_ORIGIN,
                angle_deg: 90.0,
                spread_deg: BURST_SPREAD[i],
                velocity: BURST_VELOCITY[i],
                decay: BURST_DECAY[i],
            };
            self.emit(&shot, count, rng);
        }
        self.stream_left = STREAM_SECONDS;
        log::debug!("Confetti fired: {} particles in flight.", self.particles.len());
    }

    fn emit<R: Rng + ?Sized>(&mut self, shot: &Shot, count: usize, rng: &mut R) {
        let spread = shot.spread_deg.to_radians();
        for _ in 0..count {
            let heading = -shot.angle_deg.to_radians() + (0.5 * spread - rng.random::<f32>() * spread);
            let color = self.palette[rng.random_range(0..self.palette.len())];
            self.particles.push(Particle {
                x: shot.origin.0 * self.bounds.width,
                y: shot.origin.1 * self.bounds.height,
                heading,
                velocity: shot.velocity * 0.5 + rng.random::<f32>() * shot.velocity,
                decay: shot.decay,
                age: 0,
                color,
            });
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if !self.is_active() {
            self.acc = 0.0;
            return;
        }
        self.acc += dt.max(0.0);
        while self.acc >= STEP {
            self.acc -= STEP;
            if self.stream_left > 0.0 {
                self.stream_left -= STEP;
                let left = Shot { origin: (0.0, 0.5), angle_deg: 60.0, spread_deg: STREAM_SPREAD, velocity: STREAM_VELOCITY, decay: STREAM_DECAY };
                let right = Shot { origin: (1.0, 0.5), angle_deg: 120.0, ..left };
                self.emit(&left, STREAM_PER_EDGE, rng);
                self.emit(&right, STREAM_PER_EDGE, rng);
            }
            for p in &mut self.particles {
                p.step();
            }
            self.particles.retain(Particle::alive);
        }
    }
}
