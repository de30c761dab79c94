//! Collision detection, scoring and the combo state machine
//!
//! Runs in a fixed phase order every tick:
//! 1. Direct interceptor hits, then interceptor arrivals
//! 2. Explosion-radius hits
//! 3. Ground and city impacts
//! 4. Cleanup (the only place entities leave their collections)
//!
//! A missile can be destroyed once, so earlier phases take precedence.
//! Combo decay for spent player blasts is triggered from the movement pass
//! through [`decay_on_wasted_blast`].

use glam::DVec2;
use rand::Rng;

use super::effects::Emitter;
use super::spawn;
use super::state::{Explosion, GameState, Interceptor, SoundEvent, palette};
use crate::decay_floor;
use crate::tuning::Tuning;

/// Explosion cue volumes
const DIRECT_HIT_VOLUME: f64 = 0.25;
const DIRECT_HIT_FAST_VOLUME: f64 = 0.35;
const RADIUS_HIT_VOLUME: f64 = 0.08;

/// Resolve every interaction for this tick, then drop dead entities
pub fn update_collisions<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    max_particles: usize,
) {
    check_direct_hits(state, tuning, rng, max_particles);
    check_explosion_hits(state, tuning, rng, max_particles);
    check_ground_hits(state, tuning, rng, max_particles);
    cleanup(state);
}

/// Points for a direct hit at the current (already incremented) combo
pub fn direct_hit_points(tuning: &Tuning, is_fast: bool, combo: u32) -> u64 {
    let base = tuning.scoring.direct_hit.for_missile(is_fast) as f64;
    (base * tuning.multiplier(combo)).floor() as u64
}

/// Points for a player blast kill at the current level and combo
pub fn explosion_hit_points(tuning: &Tuning, level: u32, combo: u32) -> u64 {
    let hit = &tuning.scoring.explosion_hit;
    let level_factor = 1.0 + level as f64 * hit.level_bonus;
    (hit.base as f64 * level_factor * tuning.multiplier(combo)).floor() as u64
}

/// A player blast expired without a kill
pub fn decay_on_wasted_blast(state: &mut GameState, tuning: &Tuning) {
    state.combo = decay_floor(state.combo, tuning.combo.decay_rate_on_miss);
}

/// Interceptor vs missile proximity kills, then arrivals at target
///
/// At most one direct hit is credited per tick: the first active interceptor
/// in insertion order that has an active missile within `direct_hit_radius`
/// takes the first such missile, and the phase ends there. Interceptors after
/// it wait until the next tick, arrivals included.
///
/// An interceptor detonates once it is within `arrival_distance` of its
/// target or has flown past it.
fn check_direct_hits<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    max_particles: usize,
) {
    let mut fx = Emitter::new(&mut state.particles, rng, max_particles);

    for interceptor in state.interceptors.iter_mut().filter(|i| i.active) {
        let hit = state
            .missiles
            .iter_mut()
            .find(|m| m.active && m.pos.distance(interceptor.pos) < tuning.direct_hit_radius);

        if let Some(missile) = hit {
            missile.active = false;
            interceptor.active = false;

            let is_fast = missile.is_fast;
            state.combo = state
                .combo
                .saturating_add(tuning.combo.direct_hit_bonus.for_missile(is_fast));
            let points = direct_hit_points(tuning, is_fast, state.combo);
            state.score = state.score.saturating_add(points);
            log::debug!(
                "Direct hit on {} missile: +{} (combo {})",
                if is_fast { "fast" } else { "standard" },
                points,
                state.combo
            );

            state.sound_buffer.push(SoundEvent::Explosion {
                volume: Some(if is_fast {
                    DIRECT_HIT_FAST_VOLUME
                } else {
                    DIRECT_HIT_VOLUME
                }),
            });

            fx.direct_hit(missile.pos);
            if is_fast {
                fx.direct_hit(missile.pos);
                fx.burst(missile.pos, palette::FAST_MISSILE, 100);
            }
            fx.burst(missile.pos, interceptor.color, 80);
            return;
        }

        if has_arrived(interceptor, tuning) {
            interceptor.active = false;
            state.sound_buffer.push(SoundEvent::Explosion { volume: None });
            state.explosions.push(Explosion::new(
                interceptor.pos,
                interceptor.color,
                tuning.defense.explosion_radius,
                true,
            ));
            fx.burst(interceptor.pos, interceptor.color, 120);
            fx.detonation_sparks(interceptor.pos, 5);
        }
    }
}

/// Inside the arrival window, or moving away from the target
///
/// Scaled speeds can step clean over the unscaled window on tall fields.
fn has_arrived(interceptor: &Interceptor, tuning: &Tuning) -> bool {
    let to_target = interceptor.target - interceptor.pos;
    to_target.length() < tuning.defense.arrival_distance || to_target.dot(interceptor.vel) < 0.0
}

/// Blast radius kills against standard missiles
///
/// Fast missiles are immune here; only a direct hit stops them.
fn check_explosion_hits<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    max_particles: usize,
) {
    let mut fx = Emitter::new(&mut state.particles, rng, max_particles);
    let level = state.level;

    for explosion in state.explosions.iter_mut().filter(|e| e.active) {
        let reach = explosion.radius + tuning.missile.hit_margin;

        for missile in state.missiles.iter_mut() {
            if !missile.active || missile.is_fast {
                continue;
            }
            if missile.pos.distance(explosion.pos) >= reach {
                continue;
            }

            missile.active = false;

            if explosion.is_player {
                if explosion.has_hit_enemy {
                    state.combo = state.combo.saturating_add(tuning.combo.multi_kill_bonus);
                }
                explosion.has_hit_enemy = true;
                state.combo = state.combo.saturating_add(1);
                let points = explosion_hit_points(tuning, level, state.combo);
                state.score = state.score.saturating_add(points);
            } else {
                state.score = state.score.saturating_add(tuning.scoring.chain_hit as u64);
            }

            state.sound_buffer.push(SoundEvent::Explosion {
                volume: Some(RADIUS_HIT_VOLUME),
            });
            fx.burst(missile.pos, palette::WHITE, 40);
        }
    }
}

/// Missiles reaching the ground: misses, penalties, city losses, game over
fn check_ground_hits<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    max_particles: usize,
) {
    let ground_y = state.ground_y();
    let debris_y = state.height - 20.0;

    // Penalty missiles appended below start above the screen; skip them.
    let count = state.missiles.len();
    for i in 0..count {
        let missile = &mut state.missiles[i];
        if !missile.active || missile.pos.y < ground_y {
            continue;
        }
        missile.active = false;
        let pos = missile.pos;
        let is_fast = missile.is_fast;

        state.missed_count += 1;
        if state.missed_count >= tuning.penalty.miss_threshold {
            state.missed_count = 0;
            if state.any_city_alive() {
                let penalty = spawn::spawn_enemy_missile(state, tuning, rng, true);
                log::debug!("Miss threshold reached; sending a fast missile");
                state.missiles.push(penalty);
            }
        }

        state.screen_shake = tuning.missile.screen_shake(is_fast);

        let mut fx = Emitter::new(&mut state.particles, rng, max_particles);

        let mut city_hit = false;
        for city in state.cities.iter_mut().filter(|c| c.is_alive) {
            if (pos.x - city.center_x()).abs() < city.width {
                city.is_alive = false;
                city_hit = true;
                fx.burst(DVec2::new(city.center_x(), debris_y), palette::DEBRIS, 60);
                log::info!("City at x={:.0} destroyed", city.center_x());
            }
        }

        if city_hit {
            state.sound_buffer.push(SoundEvent::CityHit);
            state.combo = decay_floor(state.combo, tuning.combo.decay_rate_on_city_hit);
            if !state.is_game_over && state.cities.iter().all(|c| !c.is_alive) {
                state.is_game_over = true;
                log::info!("All cities destroyed - game over (score {})", state.score);
            }
        } else {
            state.sound_buffer.push(SoundEvent::Explosion { volume: None });
            state.combo = decay_floor(state.combo, tuning.combo.decay_rate_on_ground_hit);
        }

        let color = if is_fast {
            palette::FAST_MISSILE
        } else {
            palette::MISSILE_IMPACT
        };
        state.explosions.push(Explosion::new(
            pos,
            color,
            tuning.missile.impact_radius(is_fast),
            false,
        ));
        fx.burst(pos, color, if is_fast { 70 } else { 30 });
    }
}

/// Drop inactive entities; cities persist as ruins
fn cleanup(state: &mut GameState) {
    state.missiles.retain(|m| m.active);
    state.interceptors.retain(|i| i.active);
    state.explosions.retain(|e| e.active);
    state.particles.retain(|p| p.active);
}
