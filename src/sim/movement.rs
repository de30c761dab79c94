//! Movement integrator
//!
//! Advances every entity by one fixed increment per tick. Movement ignores
//! `delta_ms`; simulation speed follows the host's tick rate.

use rand::Rng;

use super::collision;
use super::effects::Emitter;
use super::state::{GameState, palette};
use crate::consts::*;
use crate::tuning::Tuning;

/// Run the whole movement pass in fixed order
pub fn update_movement<R: Rng>(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut R,
    max_particles: usize,
) {
    update_stars(state);
    update_missiles(state, rng, max_particles);
    update_interceptors(state, rng, max_particles);
    update_explosions(state, tuning);
    update_particles(state);
}

/// Twinkle: alpha bounces between 0 and 1
fn update_stars(state: &mut GameState) {
    for star in &mut state.stars {
        star.alpha += star.blink_speed;
        if star.alpha > 1.0 || star.alpha < 0.0 {
            star.blink_speed = -star.blink_speed;
        }
    }
}

fn update_missiles<R: Rng>(state: &mut GameState, rng: &mut R, max_particles: usize) {
    let mut fx = Emitter::new(&mut state.particles, rng, max_particles);

    for missile in state.missiles.iter_mut().filter(|m| m.active) {
        missile.pos += missile.vel;

        if missile.is_fast {
            missile.flicker += 0.8;
            for _ in 0..3 {
                fx.spark(missile.pos, palette::FAST_MISSILE, 1.0, 1.8);
            }
            fx.spark(missile.pos, palette::WHITE, 0.6, 1.2);
        } else {
            missile.flicker += 0.2;
            if fx.roll() > 0.3 {
                fx.spark(missile.pos, palette::MISSILE_TRAIL, 0.6, 1.2);
            }
        }
    }
}

fn update_interceptors<R: Rng>(state: &mut GameState, rng: &mut R, max_particles: usize) {
    let mut fx = Emitter::new(&mut state.particles, rng, max_particles);

    for interceptor in state.interceptors.iter_mut().filter(|i| i.active) {
        interceptor.pos += interceptor.vel;
        fx.spark(interceptor.pos, interceptor.color, 0.3, 1.0);
    }
}

/// Grow to max radius, then shrink and fade until spent
fn update_explosions(state: &mut GameState, tuning: &Tuning) {
    let grow = EXPLOSION_GROW_SPEED * state.scale;
    let shrink = EXPLOSION_SHRINK_SPEED * state.scale;
    let mut wasted = 0;

    for explosion in state.explosions.iter_mut().filter(|e| e.active) {
        if explosion.growing {
            explosion.radius += grow;
            if explosion.radius >= explosion.max_radius {
                explosion.growing = false;
            }
        } else {
            explosion.radius -= shrink;
            explosion.alpha -= EXPLOSION_FADE;
            if explosion.radius <= 0.0 || explosion.alpha <= 0.0 {
                explosion.active = false;
                if explosion.is_player && !explosion.has_hit_enemy {
                    wasted += 1;
                }
            }
        }
    }

    for _ in 0..wasted {
        collision::decay_on_wasted_blast(state, tuning);
    }
}

/// Friction, then gravity, then position; fade out
fn update_particles(state: &mut GameState) {
    for p in state.particles.iter_mut().filter(|p| p.active) {
        p.vel *= p.friction;
        p.vel.y += p.gravity;
        p.pos += p.vel;
        p.alpha -= p.decay;
        if p.alpha <= 0.0 {
            p.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyMissile, Explosion, Interceptor, Particle, Star};
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameState, Tuning, Pcg32) {
        let tuning = Tuning::default();
        let state = GameState::new(800.0, 750.0, &tuning);
        (state, tuning, Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_missile_euler_step_and_trail() {
        let (mut state, tuning, mut rng) = setup();
        let mut m = EnemyMissile::new(DVec2::new(100.0, 0.0), DVec2::new(100.0, 750.0), 2.0, true);
        m.vel = DVec2::new(0.0, 2.0);
        state.missiles.push(m);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);

        assert_eq!(state.missiles[0].pos, DVec2::new(100.0, 2.0));
        assert!((state.missiles[0].flicker - 0.8).abs() < 1e-12);
        // Fast missiles always leave four trail particles
        assert_eq!(state.particles.len(), 4);
    }

    #[test]
    fn test_inactive_entities_do_not_move() {
        let (mut state, tuning, mut rng) = setup();
        let mut i = Interceptor::new(DVec2::new(400.0, 750.0), DVec2::new(400.0, 100.0), 11.0, 0xffffff);
        i.active = false;
        state.interceptors.push(i);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);

        assert_eq!(state.interceptors[0].pos, DVec2::new(400.0, 750.0));
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_explosion_lifecycle() {
        let (mut state, tuning, mut rng) = setup();
        state.explosions.push(Explosion::new(DVec2::ZERO, 0xffffff, 12.0, false));

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        assert_eq!(state.explosions[0].radius, 5.0);
        assert!(state.explosions[0].growing);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        assert_eq!(state.explosions[0].radius, 15.0);
        assert!(!state.explosions[0].growing);

        let mut ticks = 0;
        while state.explosions[0].active {
            update_movement(&mut state, &tuning, &mut rng, usize::MAX);
            ticks += 1;
            assert!(ticks < 100);
        }
        // 15 / 1.8 rounds up to 9 shrink ticks
        assert_eq!(ticks, 9);
    }

    #[test]
    fn test_wasted_player_blast_decays_combo() {
        let (mut state, tuning, mut rng) = setup();
        state.combo = 9;
        let mut e = Explosion::new(DVec2::ZERO, 0xffffff, 75.0, true);
        e.growing = false;
        e.radius = 1.0;
        state.explosions.push(e);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);

        assert!(!state.explosions[0].active);
        assert_eq!(state.combo, 4);
    }

    #[test]
    fn test_scoring_or_enemy_blast_keeps_combo() {
        let (mut state, tuning, mut rng) = setup();
        state.combo = 9;
        for (is_player, hit) in [(true, true), (false, false)] {
            let mut e = Explosion::new(DVec2::ZERO, 0xffffff, 75.0, is_player);
            e.growing = false;
            e.alpha = 0.005;
            e.has_hit_enemy = hit;
            state.explosions.push(e);
        }

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);

        assert!(state.explosions.iter().all(|e| !e.active));
        assert_eq!(state.combo, 9);
    }

    #[test]
    fn test_particle_physics() {
        let (mut state, tuning, mut rng) = setup();
        let p = Particle::new(&mut rng, DVec2::ZERO, 0xffffff, 1.0, 1.0)
            .with_velocity(DVec2::new(10.0, 0.0))
            .with_decay(0.6);
        state.particles.push(p);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        let p = &state.particles[0];
        assert!((p.vel.x - 9.5).abs() < 1e-12);
        assert!((p.vel.y - 0.08).abs() < 1e-12);
        assert!((p.pos.x - 9.5).abs() < 1e-12);
        assert!(p.active);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        assert!(!state.particles[0].active);
    }

    #[test]
    fn test_star_alpha_bounces() {
        let (mut state, tuning, mut rng) = setup();
        state.stars.push(Star {
            pos: DVec2::ZERO,
            size: 1.0,
            blink_speed: 0.3,
            alpha: 0.9,
        });

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        assert!(state.stars[0].alpha > 1.0);
        assert_eq!(state.stars[0].blink_speed, -0.3);

        update_movement(&mut state, &tuning, &mut rng, usize::MAX);
        assert!(state.stars[0].alpha < 1.0);
    }

    #[test]
    fn test_particle_cap_respected() {
        let (mut state, tuning, mut rng) = setup();
        for _ in 0..10 {
            state.missiles.push(EnemyMissile::new(DVec2::ZERO, DVec2::new(0.0, 750.0), 1.0, true));
        }
        update_movement(&mut state, &tuning, &mut rng, 25);
        assert_eq!(state.particles.len(), 25);
    }
}
