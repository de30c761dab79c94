//! Spawn controller
//!
//! Drives enemy missile spawning from elapsed time and derives the level
//! from time played plus score. This is the only place `delta_ms` matters.

use glam::DVec2;
use rand::Rng;

use super::state::{EnemyMissile, GameState};
use crate::consts::MISSILE_SPAWN_HEIGHT;
use crate::tuning::Tuning;

/// Advance spawn/level timers and spawn a standard missile when due
pub fn update_spawning<R: Rng>(state: &mut GameState, tuning: &Tuning, rng: &mut R, delta_ms: f64) {
    if state.is_game_over {
        return;
    }

    state.spawn_timer += delta_ms;
    state.level_timer += delta_ms;

    let level = level_for(state.level_timer, state.score, tuning);
    if level > state.level {
        log::info!("Level {} -> {}", state.level, level);
    }
    state.level = level;

    if state.spawn_timer > state.spawn_interval {
        let missile = spawn_enemy_missile(state, tuning, rng, false);
        state.missiles.push(missile);
        state.spawn_timer = 0.0;
        state.spawn_interval = spawn_interval_for(state.level, tuning);
    }
}

/// `floor(level_timer / time_weight + score / score_weight) + 1`
pub fn level_for(level_timer: f64, score: u64, tuning: &Tuning) -> u32 {
    let progress =
        level_timer / tuning.level.time_weight + score as f64 / tuning.level.score_weight;
    // Saturating cast: degenerate weights cannot push the level below 1.
    (progress.floor() as u32).saturating_add(1)
}

/// Spawn interval shrinks linearly with level down to a floor
pub fn spawn_interval_for(level: u32, tuning: &Tuning) -> f64 {
    let s = &tuning.spawn;
    s.min_interval.max(s.base_interval - level as f64 * s.level_scale)
}

/// Build an enemy missile entering from a random point above the top edge
///
/// Fast missiles aim precisely at a living city. Standard missiles aim at a
/// living city 70% of the time and otherwise at a random ground point. With
/// no city alive, both fall back to random ground targets.
pub fn spawn_enemy_missile<R: Rng>(
    state: &GameState,
    tuning: &Tuning,
    rng: &mut R,
    is_fast: bool,
) -> EnemyMissile {
    let origin = DVec2::new(
        rng.random::<f64>() * state.width,
        -MISSILE_SPAWN_HEIGHT * state.scale,
    );

    let living: Vec<_> = state.living_cities().collect();
    let target = if is_fast && !living.is_empty() {
        let city = living[rng.random_range(0..living.len())];
        DVec2::new(city.center_x(), state.height - city.height / 2.0)
    } else if !living.is_empty() && rng.random::<f64>() > 0.3 {
        let city = living[rng.random_range(0..living.len())];
        DVec2::new(city.center_x(), state.height)
    } else {
        DVec2::new(rng.random::<f64>() * state.width, state.height)
    };

    let speed = if is_fast {
        let f = &tuning.missile.fast;
        (f.base_speed + rng.random::<f64>() * f.speed_variance) * state.scale
    } else {
        let n = &tuning.missile.normal;
        (n.base_speed + state.level as f64 * n.level_bonus) * state.scale
    };

    log::debug!(
        "Spawned {} missile at x={:.0} aiming at ({:.0}, {:.0})",
        if is_fast { "fast" } else { "standard" },
        origin.x,
        target.x,
        target.y
    );

    EnemyMissile::new(origin, target, speed, is_fast)
}
