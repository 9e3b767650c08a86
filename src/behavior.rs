/*
 * Behavior Module
 *
 * The per-chicken state machine: Idle, Walking, Eating, Scared.
 * Runs once per chicken per tick, after steering composition, and owns
 * every transition: idle decisions, walk integration with stuck/detour
 * handling, arrival resolution, eating countdowns, scare recovery, and
 * panic contagion between neighbors.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::avoidance;
use crate::chicken::{Chicken, EatTimer, NextState, State, Target};
use crate::food::{self, Feed, FeedId};
use crate::params::SimulationParams;
use crate::vector;
use crate::SPAWN_MARGIN;

// Distance at which a walk target counts as reached
pub const ARRIVE_DISTANCE: f32 = 10.0;
// Cooldown armed when a walk is cancelled because no detour exists
pub const WALK_CANCEL_COOLDOWN: u32 = 20;
// Cooldown armed when a scare wears off
pub const SCARE_EXIT_COOLDOWN: u32 = 60;

// A walk counts as stalled below this per-tick displacement
const STUCK_DISPLACEMENT: f32 = 0.5;
// Detours are only considered once the chicken is actually moving
const DETOUR_SPEED_THRESHOLD: f32 = 0.5;

const FACING_SPEED_THRESHOLD: f32 = 0.2;
const FACING_COOLDOWN_TICKS: u32 = 20;

// Chance an idle decision picks a stroll over grazing in place
const IDLE_WANDER_CHANCE: f64 = 0.7;
// Wander targets land within this reach of the current position
const WANDER_REACH: f32 = 200.0;

// Timer ranges (ticks), sampled uniformly
const GRAZE_MIN: u32 = 60;
const GRAZE_MAX: u32 = 120;
const ARRIVAL_IDLE_MIN: u32 = 60;
const ARRIVAL_IDLE_MAX: u32 = 120;
const POST_GRAZE_IDLE_MIN: u32 = 100;
const POST_GRAZE_IDLE_MAX: u32 = 300;
const PANIC_MIN: u32 = 80;
const PANIC_MAX: u32 = 120;

// Advance the chicken at `idx` by one tick
pub fn advance(
    chickens: &mut [Chicken],
    idx: usize,
    feeds: &[Feed],
    params: &SimulationParams,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
) {
    match chickens[idx].state {
        State::Idle { decision_timer } => {
            idle_tick(chickens, idx, feeds, params, rng, width, height, decision_timer)
        }
        State::Walking { target, next } => {
            walking_tick(chickens, idx, feeds, params, rng, target, next)
        }
        State::Eating { timer, source } => eating_tick(chickens, idx, feeds, rng, timer, source),
        State::Scared { timer } => scared_tick(chickens, idx, params, timer),
    }
}

// A scared chicken may convert nearby calm chickens, producing a contagion
// wave. Conversions land in the shared registry immediately, so chickens
// later in this tick's pass already see them.
pub fn spread_panic(
    chickens: &mut [Chicken],
    idx: usize,
    params: &SimulationParams,
    rng: &mut impl Rng,
) {
    if !chickens[idx].is_scared() {
        return;
    }
    let origin = chickens[idx].position;

    for j in 0..chickens.len() {
        if j == idx {
            continue;
        }
        let other = &mut chickens[j];
        if other.is_scared() {
            continue;
        }
        if other.position.distance(origin) < params.panic_radius && rng.gen_bool(params.panic_chance)
        {
            other.state = State::Scared {
                timer: rng.gen_range(PANIC_MIN..=PANIC_MAX),
            };
            let away = other.position - origin;
            other.velocity = if away.length() > 0.0 {
                away.normalize() * params.run_speed
            } else {
                Vec2::ZERO
            };
            other.current_max_speed = params.run_speed;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn idle_tick(
    chickens: &mut [Chicken],
    idx: usize,
    feeds: &[Feed],
    params: &SimulationParams,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
    decision_timer: u32,
) {
    let chicken = &mut chickens[idx];
    chicken.stuck_frames = 0;

    if decision_timer > 1 {
        chicken.state = State::Idle {
            decision_timer: decision_timer - 1,
        };
        return;
    }

    // Decision point: nearest food within range wins
    let mut found: Option<&Feed> = None;
    let mut min_dist = params.food_range;
    for feed in feeds {
        let d = chicken.position.distance(feed.position);
        if d < min_dist {
            min_dist = d;
            found = Some(feed);
        }
    }

    if let Some(feed) = found {
        // Approach a point beside the site so arriving chickens ring it
        // instead of stacking on top of it
        let approach = feed.position + food::approach_offset(rng);
        chicken.state = State::Walking {
            target: Target::Food {
                approach,
                site: feed.id,
            },
            next: NextState::Eating,
        };
    } else if rng.gen_bool(IDLE_WANDER_CHANCE) {
        let tx = (chicken.position.x + rng.gen_range(-WANDER_REACH..WANDER_REACH))
            .max(SPAWN_MARGIN)
            .min(width - SPAWN_MARGIN);
        let ty = (chicken.position.y + rng.gen_range(-WANDER_REACH..WANDER_REACH))
            .max(SPAWN_MARGIN)
            .min(height - SPAWN_MARGIN);
        chicken.state = State::Walking {
            target: Target::Wander(pt2(tx, ty)),
            next: NextState::Idle,
        };
    } else {
        // Graze in place for a while
        chicken.state = State::Eating {
            timer: EatTimer::Bounded(rng.gen_range(GRAZE_MIN..=GRAZE_MAX)),
            source: None,
        };
    }
}

fn walking_tick(
    chickens: &mut [Chicken],
    idx: usize,
    feeds: &[Feed],
    params: &SimulationParams,
    rng: &mut impl Rng,
    target: Target,
    next: NextState,
) {
    {
        let chicken = &mut chickens[idx];
        let cap = chicken.current_max_speed;
        chicken.integrate(cap);

        let moved = chicken.position.distance(chicken.last_position);
        chicken.last_position = chicken.position;
        if moved < STUCK_DISPLACEMENT {
            chicken.stuck_frames += 1;
        } else {
            chicken.stuck_frames = 0;
        }
    }

    // A chicken stalled past the threshold is already wedged, so the
    // breakout probe skips the normal heading block check
    let mut breaking_out = false;
    if chickens[idx].stuck_frames > params.stuck_threshold {
        if let Some(dir) = avoidance::find_breakout_dir(chickens, idx) {
            let chicken = &mut chickens[idx];
            chicken.velocity = dir * chicken.current_max_speed;
            chicken.stuck_frames = 0;
            breaking_out = true;
        }
    }

    if !breaking_out {
        // Food approaches push through the crowd; everyone else detours
        let should_avoid_path = !matches!(target, Target::Food { .. });
        let heading = chickens[idx].velocity;

        if should_avoid_path
            && heading.length() > DETOUR_SPEED_THRESHOLD
            && avoidance::is_blocked(chickens, idx, heading, avoidance::LOOK_AHEAD)
        {
            match avoidance::find_detour(chickens, idx) {
                Some(dir) => {
                    let chicken = &mut chickens[idx];
                    chicken.velocity = dir * chicken.current_max_speed;
                }
                None => {
                    // Boxed in: give up on this walk
                    let chicken = &mut chickens[idx];
                    chicken.velocity = Vec2::ZERO;
                    chicken.state = State::Idle {
                        decision_timer: WALK_CANCEL_COOLDOWN,
                    };
                    return;
                }
            }
        }
    }

    let chicken = &mut chickens[idx];

    // Facing flips only past a small horizontal speed and a cooldown,
    // so sprites do not flicker while jostling
    if chicken.velocity.x.abs() > FACING_SPEED_THRESHOLD && chicken.facing_cooldown == 0 {
        let new_facing = chicken.velocity.x > 0.0;
        if chicken.facing_right != new_facing {
            chicken.facing_right = new_facing;
            chicken.facing_cooldown = FACING_COOLDOWN_TICKS;
        }
    }

    if chicken.position.distance(target.position()) < ARRIVE_DISTANCE {
        chicken.state = match (next, target) {
            (NextState::Eating, Target::Food { site, .. }) => {
                if feeds.iter().any(|f| f.id == site) {
                    // Eat until the food manager says the site is gone
                    State::Eating {
                        timer: EatTimer::UntilDepleted,
                        source: Some(site),
                    }
                } else {
                    // The site vanished while we walked; treat it as
                    // already gone and think again shortly
                    State::Idle {
                        decision_timer: food::WALK_DISENGAGE_COOLDOWN,
                    }
                }
            }
            (NextState::Eating, Target::Wander(_)) => State::Eating {
                timer: EatTimer::Bounded(rng.gen_range(GRAZE_MIN..=GRAZE_MAX)),
                source: None,
            },
            (NextState::Idle, _) => State::Idle {
                decision_timer: rng.gen_range(ARRIVAL_IDLE_MIN..=ARRIVAL_IDLE_MAX),
            },
        };
    }
}

fn eating_tick(
    chickens: &mut [Chicken],
    idx: usize,
    feeds: &[Feed],
    rng: &mut impl Rng,
    timer: EatTimer,
    source: Option<FeedId>,
) {
    let chicken = &mut chickens[idx];
    chicken.stuck_frames = 0;

    // No self-propelled motion while eating
    chicken.velocity *= 0.5;

    if let Some(site) = source {
        match feeds.iter().find(|f| f.id == site) {
            Some(feed) => {
                // Peck toward the site
                chicken.facing_right = chicken.position.x < feed.position.x;
            }
            None => {
                // The site is gone (evicted mid-meal): already-gone semantics
                chicken.state = State::Idle {
                    decision_timer: food::EAT_DISENGAGE_COOLDOWN,
                };
                return;
            }
        }
    }

    if let EatTimer::Bounded(t) = timer {
        if t > 1 {
            chicken.state = State::Eating {
                timer: EatTimer::Bounded(t - 1),
                source,
            };
        } else {
            chicken.state = State::Idle {
                decision_timer: rng.gen_range(POST_GRAZE_IDLE_MIN..=POST_GRAZE_IDLE_MAX),
            };
        }
    }
}

fn scared_tick(chickens: &mut [Chicken], idx: usize, params: &SimulationParams, timer: u32) {
    let chicken = &mut chickens[idx];
    chicken.stuck_frames = 0;

    chicken.integrate(params.run_speed);

    // Panic reactions are immediate: facing follows velocity, no cooldown
    if chicken.velocity.x > 0.0 {
        chicken.facing_right = true;
    }
    if chicken.velocity.x < 0.0 {
        chicken.facing_right = false;
    }

    if timer > 0 {
        chicken.state = State::Scared { timer: timer - 1 };
    } else {
        chicken.current_max_speed = params.max_speed;
        chicken.velocity = vector::limit(chicken.velocity, params.max_speed);
        chicken.state = State::Idle {
            decision_timer: SCARE_EXIT_COOLDOWN,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chicken::{ChickenId, ChickenKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flock_of(positions: &[(f32, f32)]) -> Vec<Chicken> {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
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
    fn test_idle_decision_fires_exactly_at_zero() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Idle { decision_timer: 10 };

        for _ in 0..9 {
            advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
            assert!(matches!(chickens[0].state, State::Idle { .. }));
        }
        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
        assert!(!matches!(chickens[0].state, State::Idle { .. }));
    }

    #[test]
    fn test_idle_decision_prefers_nearest_food() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Idle { decision_timer: 1 };

        let feeds = vec![
            Feed {
                id: FeedId(0),
                position: pt2(600.0, 400.0),
                amount: 300.0,
            },
            Feed {
                id: FeedId(1),
                position: pt2(450.0, 400.0),
                amount: 300.0,
            },
        ];

        advance(&mut chickens, 0, &feeds, &params, &mut rng, 1280.0, 720.0);

        match chickens[0].state {
            State::Walking {
                target: Target::Food { site, approach },
                next: NextState::Eating,
            } => {
                assert_eq!(site, FeedId(1));
                // Approach point sits beside the site, not on it
                let offset = approach - pt2(450.0, 400.0);
                assert!(offset.x.abs() >= 25.0 && offset.x.abs() <= 40.0);
                assert!(offset.y <= -25.0 && offset.y >= -40.0);
            }
            other => panic!("expected food walk, got {:?}", other),
        }
    }

    #[test]
    fn test_idle_decision_ignores_food_out_of_range() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(100.0, 100.0)]);
        chickens[0].state = State::Idle { decision_timer: 1 };

        let feeds = vec![Feed {
            id: FeedId(0),
            position: pt2(900.0, 600.0),
            amount: 300.0,
        }];

        advance(&mut chickens, 0, &feeds, &params, &mut rng, 1280.0, 720.0);

        assert!(chickens[0].food_site().is_none());
    }

    #[test]
    fn test_wander_targets_stay_in_bounds() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        // Corner chicken: unclamped targets would frequently leave the canvas
        for _ in 0..40 {
            let mut chickens = flock_of(&[(60.0, 60.0)]);
            chickens[0].state = State::Idle { decision_timer: 1 };
            advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
            if let State::Walking {
                target: Target::Wander(p),
                ..
            } = chickens[0].state
            {
                assert!(p.x >= SPAWN_MARGIN && p.x <= 1280.0 - SPAWN_MARGIN);
                assert!(p.y >= SPAWN_MARGIN && p.y <= 720.0 - SPAWN_MARGIN);
            }
        }
    }

    #[test]
    fn test_arrival_on_wander_returns_to_idle() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Walking {
            target: Target::Wander(pt2(403.0, 400.0)),
            next: NextState::Idle,
        };

        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);

        match chickens[0].state {
            State::Idle { decision_timer } => {
                assert!((ARRIVAL_IDLE_MIN..=ARRIVAL_IDLE_MAX).contains(&decision_timer))
            }
            other => panic!("expected idle, got {:?}", other),
        }
    }

    #[test]
    fn test_arrival_at_live_site_starts_open_ended_meal() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Walking {
            target: Target::Food {
                approach: pt2(402.0, 400.0),
                site: FeedId(7),
            },
            next: NextState::Eating,
        };
        let feeds = vec![Feed {
            id: FeedId(7),
            position: pt2(420.0, 430.0),
            amount: 300.0,
        }];

        advance(&mut chickens, 0, &feeds, &params, &mut rng, 1280.0, 720.0);

        assert!(matches!(
            chickens[0].state,
            State::Eating {
                timer: EatTimer::UntilDepleted,
                source: Some(FeedId(7)),
            }
        ));
    }

    #[test]
    fn test_arrival_at_vanished_site_goes_idle() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Walking {
            target: Target::Food {
                approach: pt2(402.0, 400.0),
                site: FeedId(7),
            },
            next: NextState::Eating,
        };

        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);

        assert!(matches!(
            chickens[0].state,
            State::Idle {
                decision_timer: food::WALK_DISENGAGE_COOLDOWN
            }
        ));
    }

    #[test]
    fn test_grazing_counts_down_to_idle() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Eating {
            timer: EatTimer::Bounded(3),
            source: None,
        };

        for _ in 0..2 {
            advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
            assert!(matches!(chickens[0].state, State::Eating { .. }));
        }
        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
        assert!(matches!(chickens[0].state, State::Idle { .. }));
    }

    #[test]
    fn test_eating_faces_its_site_and_damps_velocity() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].velocity = vec2(1.0, 0.0);
        chickens[0].facing_right = false;
        chickens[0].state = State::Eating {
            timer: EatTimer::UntilDepleted,
            source: Some(FeedId(2)),
        };
        let feeds = vec![Feed {
            id: FeedId(2),
            position: pt2(430.0, 400.0),
            amount: 50.0,
        }];

        advance(&mut chickens, 0, &feeds, &params, &mut rng, 1280.0, 720.0);

        assert!(chickens[0].facing_right);
        assert!((chickens[0].velocity.x - 0.5).abs() < 1e-5);
        // Open-ended meals never count down
        assert!(matches!(
            chickens[0].state,
            State::Eating {
                timer: EatTimer::UntilDepleted,
                ..
            }
        ));
    }

    #[test]
    fn test_eating_from_vanished_site_goes_idle() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Eating {
            timer: EatTimer::UntilDepleted,
            source: Some(FeedId(2)),
        };

        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);

        assert!(matches!(
            chickens[0].state,
            State::Idle {
                decision_timer: food::EAT_DISENGAGE_COOLDOWN
            }
        ));
    }

    #[test]
    fn test_scare_wears_off_and_restores_speed_cap() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut chickens = flock_of(&[(400.0, 400.0)]);
        chickens[0].state = State::Scared { timer: 2 };
        chickens[0].current_max_speed = params.run_speed;
        chickens[0].velocity = vec2(params.run_speed, 0.0);

        for _ in 0..2 {
            advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);
            assert!(chickens[0].is_scared());
        }
        advance(&mut chickens, 0, &[], &params, &mut rng, 1280.0, 720.0);

        assert!(matches!(
            chickens[0].state,
            State::Idle {
                decision_timer: SCARE_EXIT_COOLDOWN
            }
        ));
        assert_eq!(chickens[0].current_max_speed, params.max_speed);
        // Leftover run-speed momentum is clamped back to the walking cap
        assert!(chickens[0].velocity.length() <= params.max_speed + 1e-4);
    }

    #[test]
    fn test_panic_spreads_only_within_radius() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut chickens = flock_of(&[(400.0, 400.0), (430.0, 400.0), (800.0, 400.0)]);
        chickens[0].state = State::Scared { timer: 100 };

        // 0.02 per tick per neighbor: many ticks make conversion overwhelmingly likely
        for _ in 0..2000 {
            spread_panic(&mut chickens, 0, &params, &mut rng);
        }

        assert!(chickens[1].is_scared());
        assert!(!chickens[2].is_scared());
        // The convert flees away from the trigger at run speed
        assert!(chickens[1].velocity.x > 0.0);
        assert!((chickens[1].velocity.length() - params.run_speed).abs() < 1e-4);
    }

    #[test]
    fn test_calm_chicken_does_not_spread_panic() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut chickens = flock_of(&[(400.0, 400.0), (430.0, 400.0)]);

        for _ in 0..2000 {
            spread_panic(&mut chickens, 0, &params, &mut rng);
        }

        assert!(!chickens[1].is_scared());
    }
}
