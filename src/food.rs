/*
 * Food Module
 *
 * Deposited food sites and the per-tick settlement pass: every site loses
 * one unit per chicken currently eating from it, and a site that runs out
 * is removed with every referencing chicken disengaged in the same pass,
 * so the rest of the tick sees a consistent registry.
 */

use nannou::prelude::*;
use rand::Rng;
use tracing::debug;

use crate::chicken::{Chicken, State, Target};

// Cooldown armed when a meal ends because the site ran out
pub const EAT_DISENGAGE_COOLDOWN: u32 = 60;
// Cooldown armed when a walk is abandoned because the site ran out
pub const WALK_DISENGAGE_COOLDOWN: u32 = 30;

// Side offsets for approach points beside a site
const APPROACH_OFFSET_MIN: f32 = 25.0;
const APPROACH_OFFSET_MAX: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeedId(pub u64);

#[derive(Clone, Debug)]
pub struct Feed {
    pub id: FeedId,
    pub position: Point2,
    pub amount: f32,
}

// A point beside a food site: random left/right side, slightly above,
// so chickens ring the site instead of standing on it
pub fn approach_offset(rng: &mut impl Rng) -> Vec2 {
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    vec2(
        side * rng.gen_range(APPROACH_OFFSET_MIN..APPROACH_OFFSET_MAX),
        -rng.gen_range(APPROACH_OFFSET_MIN..APPROACH_OFFSET_MAX),
    )
}

// Deplete every site by its concurrent eater count, removing exhausted
// sites and synchronously disengaging every chicken that references them
pub fn settle(feeds: &mut Vec<Feed>, chickens: &mut [Chicken]) {
    let mut i = 0;
    while i < feeds.len() {
        let id = feeds[i].id;

        let eaters = chickens
            .iter()
            .filter(|c| matches!(c.state, State::Eating { source: Some(s), .. } if s == id))
            .count();
        if eaters > 0 {
            feeds[i].amount -= eaters as f32;
        }

        if feeds[i].amount <= 0.0 {
            feeds.remove(i);
            debug!(feed = id.0, "food site depleted");
            disengage(chickens, id);
        } else {
            i += 1;
        }
    }
}

fn disengage(chickens: &mut [Chicken], id: FeedId) {
    for chicken in chickens.iter_mut() {
        match chicken.state {
            State::Eating {
                source: Some(s), ..
            } if s == id => {
                chicken.state = State::Idle {
                    decision_timer: EAT_DISENGAGE_COOLDOWN,
                };
            }
            State::Walking {
                target: Target::Food { site, .. },
                ..
            } if site == id => {
                chicken.velocity = Vec2::ZERO;
                chicken.state = State::Idle {
                    decision_timer: WALK_DISENGAGE_COOLDOWN,
                };
            }
            _ => {}
        }
    }
}
