//! Per-frame simulation step
//!
//! [`Simulation`] owns everything a tick needs besides the state itself:
//! the tuning table, the seeded RNG and the particle cap.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::update_collisions;
use super::input::process_input;
use super::movement::update_movement;
use super::spawn::update_spawning;
use super::state::{City, GameState, Star, scale_for_height};
use crate::consts::*;
use crate::tuning::Tuning;

/// Simulation context: tuning, RNG and resource limits
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    rng: Pcg32,
    max_particles: usize,
}

impl Simulation {
    /// Deterministic context; equal seeds and inputs give equal states
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            max_particles: DEFAULT_MAX_PARTICLES,
        }
    }

    /// Context seeded from the OS (or browser) entropy source
    pub fn from_entropy(tuning: Tuning) -> Self {
        Self::new(tuning, rand::random())
    }

    pub fn with_max_particles(mut self, max_particles: usize) -> Self {
        self.max_particles = max_particles;
        self
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles;
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Swap in new tuning (clamped); takes effect on the next tick
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning.clamped();
    }

    /// Fresh round: starfield and a row of evenly spaced cities
    pub fn new_round(&mut self, width: f64, height: f64) -> GameState {
        let mut state = GameState::new(width, height, &self.tuning);

        state.stars = (0..STAR_COUNT)
            .map(|_| Star::new(&mut self.rng, width, height))
            .collect();

        let scale = state.scale;
        let spacing = width / (CITY_COUNT + 1) as f64;
        let half_width = CITY_BASE_WIDTH * scale / 2.0;
        state.cities = (1..=CITY_COUNT)
            .map(|i| {
                City::new(
                    &mut self.rng,
                    i as f64 * spacing - half_width,
                    CITY_BASE_WIDTH,
                    scale,
                )
            })
            .collect();

        log::info!("New round ({width}x{height}, scale {:.2})", state.scale);
        state
    }

    /// Start over on the same playfield, carrying the high score
    pub fn restart(&mut self, state: &mut GameState) {
        let high_score = state.high_score.max(state.score);
        *state = self.new_round(state.width, state.height);
        state.high_score = high_score;
    }

    /// Adopt new playfield dimensions and re-scatter the stars
    ///
    /// Cities and in-flight entities keep their positions.
    pub fn resize(&mut self, state: &mut GameState, width: f64, height: f64) {
        state.width = width;
        state.height = height;
        state.scale = scale_for_height(height);
        for star in &mut state.stars {
            star.scatter(&mut self.rng, width, height);
        }
        log::debug!("Resized to {width}x{height}");
    }

    /// Advance one frame
    ///
    /// `delta_ms` only drives spawning and level progression; everything
    /// else moves a fixed step per call.
    pub fn advance(&mut self, state: &mut GameState, delta_ms: f64) {
        let delta_ms = if delta_ms.is_finite() {
            delta_ms.max(0.0)
        } else {
            0.0
        };

        decay_screen_shake(state);

        process_input(state, &self.tuning, &mut self.rng);

        if !state.is_game_over {
            update_spawning(state, &self.tuning, &mut self.rng, delta_ms);
        }

        update_movement(state, &self.tuning, &mut self.rng, self.max_particles);
        update_collisions(state, &self.tuning, &mut self.rng, self.max_particles);

        if state.is_game_over && state.score > state.high_score {
            state.high_score = state.score;
        }
    }
}

/// Exponential shake falloff, snapped to zero once imperceptible
pub fn decay_screen_shake(state: &mut GameState) {
    state.screen_shake *= SCREEN_SHAKE_DECAY;
    if state.screen_shake < SCREEN_SHAKE_CUTOFF {
        state.screen_shake = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyMissile;
    use glam::DVec2;

    fn sim() -> Simulation {
        Simulation::new(Tuning::default(), 12345)
    }

    #[test]
    fn test_new_round_layout() {
        let mut sim = sim();
        let state = sim.new_round(1400.0, 750.0);

        assert_eq!(state.stars.len(), STAR_COUNT);
        assert_eq!(state.cities.len(), CITY_COUNT);
        assert!(state.cities.iter().all(|c| c.is_alive && c.width == 50.0));
        // Centers land on width / 7 multiples
        for (i, city) in state.cities.iter().enumerate() {
            assert!((city.center_x() - (i + 1) as f64 * 200.0).abs() < 1e-9);
        }
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let mut sim1 = sim();
        let mut sim2 = sim();
        let mut state1 = sim1.new_round(800.0, 600.0);
        let mut state2 = sim2.new_round(800.0, 600.0);

        for frame in 0..600 {
            if frame % 45 == 0 {
                let x = (frame * 37 % 800) as f64;
                state1.submit_launch(x, 200.0);
                state2.submit_launch(x, 200.0);
            }
            sim1.advance(&mut state1, NOMINAL_FRAME_MS);
            sim2.advance(&mut state2, NOMINAL_FRAME_MS);
            assert_eq!(state1.drain_sounds(), state2.drain_sounds());
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.combo, state2.combo);
        assert_eq!(state1.missiles.len(), state2.missiles.len());
        assert_eq!(state1.particles.len(), state2.particles.len());
        for (a, b) in state1.missiles.iter().zip(&state2.missiles) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_zero_delta_is_idempotent_on_fresh_round() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);

        for _ in 0..10 {
            sim.advance(&mut state, 0.0);
        }

        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.level, 1);
        assert!(state.missiles.is_empty());
        assert!(state.interceptors.is_empty());
        assert!(state.explosions.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.cities.len(), CITY_COUNT);
        assert!(state.sound_buffer.is_empty());
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);
        sim.advance(&mut state, f64::NAN);
        sim.advance(&mut state, -500.0);
        assert_eq!(state.spawn_timer, 0.0);
        assert_eq!(state.level_timer, 0.0);
    }

    #[test]
    fn test_first_missile_spawns_after_base_interval() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);

        let mut frames = 0;
        while state.missiles.is_empty() {
            sim.advance(&mut state, 100.0);
            frames += 1;
            assert!(frames < 100);
        }
        // 2000 ms must be strictly exceeded
        assert_eq!(frames, 21);
    }

    #[test]
    fn test_direct_hit_through_advance() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);
        let pos = DVec2::new(400.0, 735.0);
        state
            .missiles
            .push(EnemyMissile::new(pos, pos + DVec2::Y, 0.0, false));
        state.submit_launch(pos.x, pos.y);

        sim.advance(&mut state, NOMINAL_FRAME_MS);

        assert_eq!(state.combo, 5);
        assert_eq!(state.score, 100);
        assert!(state.missiles.is_empty());
        assert!(state.interceptors.is_empty());
        let sounds = state.drain_sounds();
        assert_eq!(sounds.len(), 2);
    }

    #[test]
    fn test_screen_shake_decays_and_snaps() {
        let mut state = GameState::new(800.0, 750.0, &Tuning::default());
        state.screen_shake = 10.0;
        decay_screen_shake(&mut state);
        assert!((state.screen_shake - 9.0).abs() < 1e-12);

        state.screen_shake = 0.55;
        decay_screen_shake(&mut state);
        assert_eq!(state.screen_shake, 0.0);
    }

    #[test]
    fn test_high_score_latched_on_game_over() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);
        state.high_score = 50;
        state.score = 400;

        sim.advance(&mut state, 0.0);
        assert_eq!(state.high_score, 50);

        state.is_game_over = true;
        sim.advance(&mut state, 0.0);
        assert_eq!(state.high_score, 400);
    }

    #[test]
    fn test_restart_carries_high_score() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);
        state.score = 900;
        state.is_game_over = true;

        sim.restart(&mut state);

        assert_eq!(state.high_score, 900);
        assert_eq!(state.score, 0);
        assert!(!state.is_game_over);
        assert_eq!(state.cities.len(), CITY_COUNT);
    }

    #[test]
    fn test_resize_updates_scale_and_stars() {
        let mut sim = sim();
        let mut state = sim.new_round(800.0, 750.0);
        sim.resize(&mut state, 1600.0, 1500.0);
        assert_eq!(state.scale, 2.0);
        assert_eq!(state.width, 1600.0);
        assert!(state.stars.iter().all(|s| s.pos.y < 1050.0 && s.pos.x < 1600.0));
    }

    #[test]
    fn test_set_tuning_is_clamped() {
        let mut sim = sim();
        let mut t = Tuning::default();
        t.combo.decay_rate_on_miss = 4.0;
        sim.set_tuning(t);
        assert_eq!(sim.tuning().combo.decay_rate_on_miss, 1.0);
    }
}
