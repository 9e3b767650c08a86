/*
 * Chicken Module
 *
 * This module defines the Chicken struct, its behavioral state types, and
 * the individual steering forces a chicken computes against the rest of
 * the flock:
 * 1. Seek: steer toward a target, decelerating inside an arrival radius
 * 2. Separation: avoid crowding neighbors
 * 3. Alignment: steer towards the average heading of neighbors
 * 4. Cohesion: steer towards the average position of neighbors
 * 5. Boundary avoidance: push back from the canvas edges
 */

use nannou::prelude::*;
use rand::Rng;

use crate::food::FeedId;
use crate::params::SimulationParams;
use crate::vector;

// Fresh spawns reach their first decision within 60 ticks
const SPAWN_DECISION_MIN: u32 = 20;
const SPAWN_DECISION_MAX: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChickenId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChickenKind {
    Hen,
    Rooster,
    Chick,
}

// What a walking chicken is heading for
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    Wander(Point2),
    Food { approach: Point2, site: FeedId },
}

impl Target {
    pub fn position(&self) -> Point2 {
        match *self {
            Target::Wander(p) => p,
            Target::Food { approach, .. } => approach,
        }
    }
}

// State to enter once a walk resolves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextState {
    Idle,
    Eating,
}

// Eating either counts down or waits for the food manager to end it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EatTimer {
    Bounded(u32),
    UntilDepleted,
}

// One variant per behavioral state, carrying only what that state needs
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum State {
    Idle { decision_timer: u32 },
    Walking { target: Target, next: NextState },
    Eating { timer: EatTimer, source: Option<FeedId> },
    Scared { timer: u32 },
}

#[derive(Clone)]
pub struct Chicken {
    pub id: ChickenId,
    pub kind: ChickenKind,
    pub position: Point2,
    pub last_position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub current_max_speed: f32,
    pub facing_right: bool,
    pub facing_cooldown: u32,
    pub stuck_frames: u32,
    pub state: State,
}

impl Chicken {
    pub fn new(
        id: ChickenId,
        kind: ChickenKind,
        position: Point2,
        params: &SimulationParams,
        rng: &mut impl Rng,
    ) -> Self {
        // Random initial velocity
        let velocity = vec2(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5));

        Self {
            id,
            kind,
            position,
            last_position: position,
            velocity,
            acceleration: Vec2::ZERO,
            current_max_speed: params.max_speed,
            // Hens start facing left, everyone else right
            facing_right: kind != ChickenKind::Hen,
            facing_cooldown: 0,
            stuck_frames: 0,
            state: State::Idle {
                decision_timer: rng.gen_range(SPAWN_DECISION_MIN..=SPAWN_DECISION_MAX),
            },
        }
    }

    // Apply a force to the chicken
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    // Integrate acceleration into velocity (capped) and velocity into position
    pub fn integrate(&mut self, speed_cap: f32) {
        self.velocity += self.acceleration;
        self.velocity = vector::limit(self.velocity, speed_cap);
        self.position += self.velocity;
    }

    pub fn is_scared(&self) -> bool {
        matches!(self.state, State::Scared { .. })
    }

    // Walking toward a food site, or eating (grazing included) — feeding
    // chickens are expected to cluster, so several forces relax for them
    pub fn interacting_with_food(&self) -> bool {
        matches!(
            self.state,
            State::Walking {
                target: Target::Food { .. },
                ..
            } | State::Eating { .. }
        )
    }

    // The food site this chicken currently references, if any
    pub fn food_site(&self) -> Option<FeedId> {
        match self.state {
            State::Walking {
                target: Target::Food { site, .. },
                ..
            } => Some(site),
            State::Eating { source, .. } => source,
            _ => None,
        }
    }

    // Food approaches settle precisely, wander targets feel looser
    fn arrival_radius(&self) -> f32 {
        if matches!(
            self.state,
            State::Walking {
                target: Target::Food { .. },
                ..
            }
        ) {
            20.0
        } else {
            50.0
        }
    }

    // Steer toward a target, decelerating linearly inside the arrival radius
    pub fn seek(&self, target: Point2, params: &SimulationParams) -> Vec2 {
        let desired = target - self.position;
        let d = desired.length();
        if d == 0.0 {
            return Vec2::ZERO;
        }

        let slow_radius = self.arrival_radius();
        let speed = if d < slow_radius {
            (d / slow_radius) * self.current_max_speed
        } else {
            self.current_max_speed
        };

        let steer = (desired / d) * speed - self.velocity;
        vector::limit(steer, params.max_force)
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(&self, flock: &[Chicken], params: &SimulationParams) -> Vec2 {
        // Feeding chickens tolerate half the personal space
        let effective_radius = if self.interacting_with_food() {
            params.separation_radius * 0.5
        } else {
            params.separation_radius
        };

        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for other in flock {
            let d = self.position.distance(other.position);

            // If this is not the same chicken and it's within the effective radius
            if d > 0.0 && d < effective_radius {
                // Vector pointing away from neighbor, weighted by distance
                let diff = (self.position - other.position).normalize() / d;
                steering += diff;
                count += 1;
            }
        }

        if count > 0 {
            steering /= count as f32;
        }

        if steering.length() > 0.0 {
            // Implement Reynolds: Steering = Desired - Velocity
            steering = steering.normalize() * self.current_max_speed - self.velocity;
            steering = vector::limit(steering, params.max_force);
        }

        steering
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, flock: &[Chicken], params: &SimulationParams) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in flock {
            let d = self.position.distance(other.position);

            if d > 0.0 && d < params.perception_radius {
                sum += other.velocity;
                count += 1;
            }
        }

        if count > 0 && sum.length() > 0.0 {
            sum /= count as f32;

            // Implement Reynolds: Steering = Desired - Velocity
            let steer = sum.normalize() * self.current_max_speed - self.velocity;
            return vector::limit(steer, params.max_force);
        }

        Vec2::ZERO
    }

    // Calculate cohesion force (seek towards average position of neighbors)
    pub fn cohesion(&self, flock: &[Chicken], params: &SimulationParams) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in flock {
            let d = self.position.distance(other.position);

            if d > 0.0 && d < params.perception_radius {
                sum += other.position;
                count += 1;
            }
        }

        if count > 0 {
            sum /= count as f32;
            return self.seek(sum, params);
        }

        Vec2::ZERO
    }

    // Push back from any canvas edge closer than the wall buffer.
    // Wall penetration must be corrected urgently, so the force cap doubles.
    pub fn avoid_walls(&self, width: f32, height: f32, params: &SimulationParams) -> Vec2 {
        let mut steer = Vec2::ZERO;
        let buffer = params.wall_buffer;

        if self.position.x < buffer {
            steer.x = self.current_max_speed;
        }
        if self.position.x > width - buffer {
            steer.x = -self.current_max_speed;
        }
        if self.position.y < buffer {
            steer.y = self.current_max_speed;
        }
        if self.position.y > height - buffer {
            steer.y = -self.current_max_speed;
        }

        if steer.length() > 0.0 {
            steer = steer.normalize() * self.current_max_speed - self.velocity;
            steer = vector::limit(steer, params.max_force * 2.0);
        }

        steer
    }
}
