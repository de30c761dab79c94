//! Attract-mode player
//!
//! Picks the most dangerous uncovered missile and fires an interceptor at
//! where it will be. Used by the headless demo and the browser idle screen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{EnemyMissile, GameState};
use crate::tuning::Tuning;

/// Minimum time between launches
pub const DEFAULT_COOLDOWN_MS: f64 = 350.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autopilot {
    pub cooldown_ms: f64,
    timer_ms: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

impl Autopilot {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            timer_ms: 0.0,
        }
    }

    /// Queue at most one launch on `state`; returns the aim point
    pub fn update(&mut self, state: &mut GameState, tuning: &Tuning, delta_ms: f64) -> Option<DVec2> {
        if state.is_game_over {
            return None;
        }

        self.timer_ms += delta_ms.max(0.0);
        if self.timer_ms < self.cooldown_ms {
            return None;
        }

        let aim = choose_target(state, tuning)?;
        if state.submit_launch(aim.x, aim.y) {
            self.timer_ms = 0.0;
            Some(aim)
        } else {
            None
        }
    }
}

/// Lead point for the lowest missile nothing is already aimed at
fn choose_target(state: &GameState, tuning: &Tuning) -> Option<DVec2> {
    let origin = state.launch_origin();
    let speed = tuning.defense.speed * state.scale;
    let cover = tuning.defense.explosion_radius * 0.8;

    state
        .missiles
        .iter()
        .filter(|m| m.active)
        .map(|m| (m, lead_point(m, origin, speed, state.ground_y())))
        .filter(|(_, aim)| !is_covered(state, *aim, cover))
        .max_by(|(a, _), (b, _)| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(_, aim)| aim)
}

/// Where the missile will be when an interceptor launched now arrives
///
/// Falls back to the missile's current position when the prediction lands
/// below the ground line.
fn lead_point(missile: &EnemyMissile, origin: DVec2, speed: f64, ground_y: f64) -> DVec2 {
    if speed <= 0.0 {
        return missile.pos;
    }
    // Two refinement passes are plenty at these speeds
    let mut aim = missile.pos;
    for _ in 0..2 {
        let ticks = origin.distance(aim) / speed;
        aim = missile.pos + missile.vel * ticks;
    }
    if aim.y >= ground_y || !aim.is_finite() {
        missile.pos
    } else {
        aim
    }
}

/// An interceptor in flight or a live player blast already handles `point`
fn is_covered(state: &GameState, point: DVec2, cover: f64) -> bool {
    state
        .interceptors
        .iter()
        .filter(|i| i.active)
        .any(|i| i.target.distance(point) < cover)
        || state
            .explosions
            .iter()
            .filter(|e| e.active && e.is_player)
            .any(|e| e.pos.distance(point) < cover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Interceptor;

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(800.0, 750.0, &tuning), tuning)
    }

    #[test]
    fn test_respects_cooldown() {
        let (mut state, tuning) = setup();
        state.missiles.push(EnemyMissile::new(
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 750.0),
            1.0,
            false,
        ));
        let mut pilot = Autopilot::new(100.0);

        assert!(pilot.update(&mut state, &tuning, 50.0).is_none());
        assert!(pilot.update(&mut state, &tuning, 60.0).is_some());
        assert_eq!(state.input_buffer.len(), 1);
        assert!(pilot.update(&mut state, &tuning, 10.0).is_none());
    }

    #[test]
    fn test_targets_lowest_missile_with_lead() {
        let (mut state, tuning) = setup();
        state.missiles.push(EnemyMissile::new(
            DVec2::new(100.0, 100.0),
            DVec2::new(100.0, 750.0),
            1.0,
            false,
        ));
        state.missiles.push(EnemyMissile::new(
            DVec2::new(600.0, 300.0),
            DVec2::new(600.0, 750.0),
            1.0,
            false,
        ));
        let mut pilot = Autopilot::new(0.0);

        let aim = pilot.update(&mut state, &tuning, 16.0).unwrap();
        assert!((aim.x - 600.0).abs() < 1e-6);
        assert!(aim.y > 300.0, "aim should lead the missile downward");
    }

    #[test]
    fn test_skips_covered_missile() {
        let (mut state, tuning) = setup();
        let missile = EnemyMissile::new(DVec2::new(400.0, 300.0), DVec2::new(400.0, 750.0), 0.0, false);
        state.missiles.push(missile);
        state.interceptors.push(Interceptor::new(
            state.launch_origin(),
            DVec2::new(400.0, 300.0),
            11.0,
            0xffffff,
        ));

        let mut pilot = Autopilot::new(0.0);
        assert!(pilot.update(&mut state, &tuning, 16.0).is_none());
    }

    #[test]
    fn test_idle_after_game_over() {
        let (mut state, tuning) = setup();
        state.is_game_over = true;
        state.missiles.push(EnemyMissile::new(DVec2::ZERO, DVec2::new(0.0, 750.0), 1.0, false));
        let mut pilot = Autopilot::new(0.0);
        assert!(pilot.update(&mut state, &tuning, 1000.0).is_none());
    }
}
