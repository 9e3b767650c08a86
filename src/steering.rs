/*
 * Steering Composition Module
 *
 * This module combines the individual steering forces into one acceleration
 * contribution per chicken per tick. The weights depend on the behavioral
 * state and the local context:
 * - idle chickens barely steer and bleed off velocity
 * - scared chickens flock hard and jitter instead of seeking
 * - feeding chickens tolerate crowding and seek their food point firmly
 * - crowded walkers prioritize getting clear over flock cohesion
 */

use nannou::prelude::*;
use rand::Rng;

use crate::chicken::{Chicken, State};
use crate::params::SimulationParams;

// Velocity retained per tick while idle
const IDLE_FRICTION: f32 = 0.85;
// Scale of the random per-tick impulse while scared
const SCARED_WANDER_SCALE: f32 = 1.5;

// Compose this tick's acceleration for the chicken at `idx` from the full
// flock. Reads may observe neighbors already moved earlier in the same pass.
pub fn apply_behaviors(
    chickens: &mut [Chicken],
    idx: usize,
    params: &SimulationParams,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
) {
    let flock: &[Chicken] = chickens;
    let chicken = &flock[idx];

    let separation = chicken.separation(flock, params);
    let alignment = chicken.alignment(flock, params);
    let cohesion = chicken.cohesion(flock, params);
    let boundary = chicken.avoid_walls(width, height, params);

    let seek = match chicken.state {
        State::Walking { target, .. } => chicken.seek(target.position(), params),
        _ => Vec2::ZERO,
    };

    let crowded = flock
        .iter()
        .enumerate()
        .any(|(j, other)| {
            j != idx && chicken.position.distance(other.position) < params.separation_radius
        });

    let chicken = &mut chickens[idx];
    match chicken.state {
        State::Idle { .. } => {
            chicken.apply_force(separation * 0.1);
            chicken.velocity *= IDLE_FRICTION;
            chicken.apply_force(boundary);
        }

        State::Scared { .. } => {
            // Flee erratically: no seek, just a random impulse each tick
            let wander = vec2(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * SCARED_WANDER_SCALE;

            chicken.current_max_speed = params.run_speed;
            chicken.apply_force(separation * 3.0);
            chicken.apply_force(alignment * 5.0);
            chicken.apply_force(cohesion * 1.5);
            chicken.apply_force(wander);
            chicken.apply_force(boundary * 5.0);
        }

        State::Walking { .. } | State::Eating { .. } => {
            let (sep_w, align_w, cohesion_w, seek_w) = if chicken.interacting_with_food() {
                (0.8, 0.0, 0.0, 2.0)
            } else if crowded {
                (4.0, 0.1, 0.0, 1.5)
            } else {
                (2.5, 1.0, 0.2, 1.5)
            };

            chicken.apply_force(separation * sep_w);
            chicken.apply_force(alignment * align_w);
            chicken.apply_force(cohesion * cohesion_w);
            chicken.apply_force(seek * seek_w);
            chicken.apply_force(boundary * 3.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chicken::{ChickenId, ChickenKind, EatTimer, NextState, Target};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flock_of(positions: &[(f32, f32)]) -> Vec<Chicken> {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut c = Chicken::new(ChickenId(i as u64), ChickenKind::Hen, pt2(x, y), &params, &mut rng);
                c.velocity = Vec2::ZERO;
                c
            })
            .collect()
    }

    #[test]
    fn test_idle_friction_decays_velocity() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].velocity = vec2(2.0, 0.0);

        apply_behaviors(&mut chickens, 0, &params, &mut rng, 1280.0, 720.0);

        assert!((chickens[0].velocity.x - 2.0 * IDLE_FRICTION).abs() < 1e-5);
    }

    #[test]
    fn test_scared_raises_speed_cap() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Scared { timer: 50 };

        apply_behaviors(&mut chickens, 0, &params, &mut rng, 1280.0, 720.0);

        assert_eq!(chickens[0].current_max_speed, params.run_speed);
        // The wander impulse means a lone scared chicken still accelerates
        assert!(chickens[0].acceleration.length() > 0.0);
    }

    #[test]
    fn test_walking_seek_accelerates_toward_target() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Walking {
            target: Target::Wander(pt2(600.0, 400.0)),
            next: NextState::Idle,
        };

        apply_behaviors(&mut chickens, 0, &params, &mut rng, 1280.0, 720.0);

        assert!(chickens[0].acceleration.x > 0.0);
    }

    #[test]
    fn test_eating_ignores_alignment_and_cohesion() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        // A fast neighbor well inside perception range but outside the
        // halved separation radius: only alignment/cohesion could act
        let mut chickens = flock_of(&[(400.0, 400.0), (440.0, 400.0)]);
        chickens[0].state = State::Eating {
            timer: EatTimer::Bounded(30),
            source: None,
        };
        chickens[1].velocity = vec2(2.0, 0.0);

        apply_behaviors(&mut chickens, 0, &params, &mut rng, 1280.0, 720.0);

        assert_eq!(chickens[0].acceleration, Vec2::ZERO);
    }
}
