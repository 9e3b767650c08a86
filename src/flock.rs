/*
 * Flock Module
 *
 * The tick driver. A Flock owns the agent registry, the food registry, the
 * id counters and the random source, and advances everything exactly once
 * per tick: food settlement first, then one sequential pass over the
 * chickens. The pass mutates the registry in place, so neighbor-dependent
 * forces and panic checks see chickens already moved earlier in the same
 * pass. That partially-updated view is a deliberate property of the
 * simulation, not an artifact to remove.
 */

use nannou::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::behavior;
use crate::chicken::{Chicken, ChickenId, ChickenKind, NextState, State, Target};
use crate::food::{self, Feed, FeedId};
use crate::params::SimulationParams;
use crate::snapshot::{ChickenView, FeedView, Snapshot};
use crate::steering;

// Fright durations (ticks)
const FRIGHT_MIN: u32 = 120;
const FRIGHT_MAX: u32 = 180;

pub struct Flock {
    pub chickens: Vec<Chicken>,
    pub feeds: Vec<Feed>,
    pub width: f32,
    pub height: f32,
    pub tick_count: u64,
    next_chicken_id: u64,
    next_feed_id: u64,
    rng: ChaCha8Rng,
}

impl Flock {
    pub fn new(width: f32, height: f32) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(width, height, seed)
    }

    // Deterministic flock for tests and benchmarks
    pub fn with_seed(width: f32, height: f32, seed: u64) -> Self {
        Self {
            chickens: Vec::new(),
            feeds: Vec::new(),
            width,
            height,
            tick_count: 0,
            next_chicken_id: 0,
            next_feed_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // The host window geometry; commands clamp into this
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    // Create one idle chicken with a small random initial velocity.
    // Out-of-range positions are clamped, never rejected.
    pub fn spawn(&mut self, kind: ChickenKind, position: Point2, params: &SimulationParams) -> ChickenId {
        let position = self.clamp_to_bounds(position);
        let id = ChickenId(self.next_chicken_id);
        self.next_chicken_id += 1;

        let chicken = Chicken::new(id, kind, position, params, &mut self.rng);
        self.chickens.push(chicken);

        debug!(id = id.0, ?kind, x = position.x, y = position.y, "chicken spawned");
        id
    }

    // Drop a food site at full capacity, evicting the oldest site first if
    // the registry is full, and send every chicken in attraction range
    // walking toward it. Eviction does not disengage chickens that still
    // reference the evicted site; they idle out at the stale approach point.
    pub fn deposit_food(&mut self, position: Point2, params: &SimulationParams) -> FeedId {
        let position = self.clamp_to_bounds(position);

        if self.feeds.len() >= params.max_feeds {
            let evicted = self.feeds.remove(0);
            debug!(feed = evicted.id.0, "oldest food site evicted");
        }

        let id = FeedId(self.next_feed_id);
        self.next_feed_id += 1;
        self.feeds.push(Feed {
            id,
            position,
            amount: params.food_capacity,
        });
        debug!(feed = id.0, x = position.x, y = position.y, "food deposited");

        let rng = &mut self.rng;
        for chicken in self.chickens.iter_mut() {
            if chicken.position.distance(position) < params.food_range {
                let approach = position + food::approach_offset(rng);
                chicken.state = State::Walking {
                    target: Target::Food { approach, site: id },
                    next: NextState::Eating,
                };
                // A scared recruit walks, so it walks at walking pace
                chicken.current_max_speed = params.max_speed;
            }
        }

        id
    }

    // Scare every chicken within the radius: flee straight away from the
    // origin at run speed for a randomized duration. Evaluated immediately,
    // not deferred to the next tick.
    pub fn fright(&mut self, origin: Point2, radius: f32, params: &SimulationParams) {
        info!(x = origin.x, y = origin.y, radius, "fright triggered");

        let rng = &mut self.rng;
        for chicken in self.chickens.iter_mut() {
            if chicken.position.distance(origin) < radius {
                chicken.state = State::Scared {
                    timer: rng.gen_range(FRIGHT_MIN..=FRIGHT_MAX),
                };
                let away = chicken.position - origin;
                // A chicken exactly on the origin has nowhere to flee to
                chicken.velocity = if away.length() > 0.0 {
                    away.normalize() * params.run_speed
                } else {
                    Vec2::ZERO
                };
                chicken.current_max_speed = params.run_speed;
            }
        }
    }

    // Advance the whole simulation by one discrete step
    pub fn tick(&mut self, params: &SimulationParams) {
        self.tick_count += 1;

        // Food settles first so the behavior pass sees a consistent registry
        food::settle(&mut self.feeds, &mut self.chickens);

        for i in 0..self.chickens.len() {
            if self.chickens[i].facing_cooldown > 0 {
                self.chickens[i].facing_cooldown -= 1;
            }

            behavior::spread_panic(&mut self.chickens, i, params, &mut self.rng);
            steering::apply_behaviors(
                &mut self.chickens,
                i,
                params,
                &mut self.rng,
                self.width,
                self.height,
            );
            behavior::advance(
                &mut self.chickens,
                i,
                &self.feeds,
                params,
                &mut self.rng,
                self.width,
                self.height,
            );

            // Acceleration is transient: whatever was not integrated this
            // tick does not carry over
            self.chickens[i].acceleration = Vec2::ZERO;
        }
    }

    // The render-facing view of the current state
    pub fn snapshot(&self, params: &SimulationParams) -> Snapshot {
        Snapshot {
            chickens: self.chickens.iter().map(ChickenView::of).collect(),
            feeds: self
                .feeds
                .iter()
                .map(|f| FeedView::of(f, params.food_capacity))
                .collect(),
        }
    }

    fn clamp_to_bounds(&self, p: Point2) -> Point2 {
        pt2(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }
}
