//! Particle factories and bursts
//!
//! Purely cosmetic. Every factory draws its random numbers even when the
//! particle cap rejects the result, so gameplay randomness does not depend
//! on the cap.

use glam::DVec2;
use rand::Rng;

use super::state::{Color, Particle, palette};
use crate::consts::{PARTICLE_FRICTION, PARTICLE_GRAVITY};

impl Particle {
    /// Random-direction particle with default physics
    pub fn new<R: Rng>(rng: &mut R, pos: DVec2, color: Color, speed_scale: f64, size: f64) -> Self {
        let angle = rng.random::<f64>() * std::f64::consts::TAU;
        let speed = (rng.random::<f64>() * 5.0 + 2.0) * speed_scale;
        let size = size + rng.random::<f64>();
        let decay = 0.01 + rng.random::<f64>() * 0.02;
        Self {
            pos,
            vel: DVec2::new(angle.cos() * speed, angle.sin() * speed),
            color,
            alpha: 1.0,
            friction: PARTICLE_FRICTION,
            gravity: PARTICLE_GRAVITY,
            decay,
            size,
            active: true,
        }
    }

    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }
}

/// Appends particles to a collection, respecting a cap
pub struct Emitter<'a, R: Rng> {
    particles: &'a mut Vec<Particle>,
    rng: &'a mut R,
    cap: usize,
}

impl<'a, R: Rng> Emitter<'a, R> {
    pub fn new(particles: &'a mut Vec<Particle>, rng: &'a mut R, cap: usize) -> Self {
        Self { particles, rng, cap }
    }

    /// Push a particle if there is room
    #[inline]
    pub fn emit(&mut self, particle: Particle) {
        if self.particles.len() < self.cap {
            self.particles.push(particle);
        }
    }

    /// Uniform draw in [0, 1) from the emitter's RNG
    #[inline]
    pub fn roll(&mut self) -> f64 {
        self.rng.random()
    }

    /// One default particle
    pub fn spark(&mut self, pos: DVec2, color: Color, speed_scale: f64, size: f64) {
        let p = Particle::new(&mut *self.rng, pos, color, speed_scale, size);
        self.emit(p);
    }

    /// `count` default particles in one color
    pub fn burst(&mut self, pos: DVec2, color: Color, count: usize) {
        for _ in 0..count {
            self.spark(pos, color, 1.0, 1.5);
        }
    }

    /// Golden starburst, ring of sparks and a central flash
    pub fn direct_hit(&mut self, pos: DVec2) {
        for _ in 0..60 {
            let color = palette::DIRECT_HIT[self.rng.random_range(0..palette::DIRECT_HIT.len())];
            self.spark(pos, color, 2.5, 3.0);
        }

        for i in 0..24 {
            let angle = (i as f64 / 24.0) * std::f64::consts::TAU;
            let p = Particle::new(&mut *self.rng, pos, palette::WHITE, 0.1, 2.0)
                .with_velocity(DVec2::new(angle.cos() * 8.0, angle.sin() * 8.0))
                .with_gravity(0.0)
                .with_friction(0.92)
                .with_decay(0.025);
            self.emit(p);
        }

        for _ in 0..15 {
            let p = Particle::new(&mut *self.rng, pos, palette::WHITE, 0.5, 5.0)
                .with_decay(0.05)
                .with_gravity(0.0);
            self.emit(p);
        }
    }

    /// Large white sparks thrown out when an interceptor detonates
    pub fn detonation_sparks(&mut self, pos: DVec2, count: usize) {
        for _ in 0..count {
            let vel = DVec2::new(
                (self.rng.random::<f64>() - 0.5) * 16.0,
                (self.rng.random::<f64>() - 0.5) * 16.0,
            );
            let size = 2.5 + self.rng.random::<f64>();
            let decay = 0.01 + self.rng.random::<f64>() * 0.02;
            self.emit(Particle {
                pos,
                vel,
                color: palette::WHITE,
                alpha: 1.0,
                friction: PARTICLE_FRICTION,
                gravity: PARTICLE_GRAVITY,
                decay,
                size,
                active: true,
            });
        }
    }
}
