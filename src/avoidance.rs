/*
 * Obstacle and Stuck Avoidance Module
 *
 * Directional probing against the rest of the flock:
 * - is_blocked: corridor check ahead of a chicken, not a full-circle check
 * - find_breakout_dir: 12 probes at 30 degree steps with a short look-ahead,
 *   used once a chicken has been stalled past the stuck threshold
 * - find_detour: the current heading rotated by +-45 and +-90 degrees,
 *   used while walking when the path ahead is occupied
 */

use nannou::prelude::*;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::chicken::Chicken;
use crate::vector;

// Standard look-ahead for path checks while walking
pub const LOOK_AHEAD: f32 = 60.0;
// Shorter horizon for breakout probes: a stalled chicken only needs
// enough clearance to start moving again
const BREAKOUT_LOOK_AHEAD: f32 = 30.0;
// Half-width of the blocked corridor
const COLLISION_RADIUS: f32 = 35.0;

const BREAKOUT_PROBES: usize = 12;
const BREAKOUT_STEP: f32 = PI / 6.0;
const DETOUR_ANGLES: [f32; 4] = [FRAC_PI_4, -FRAC_PI_4, FRAC_PI_2, -FRAC_PI_2];

// True if another chicken sits in the corridor ahead of `idx` along
// `direction`: its projection on the normalized direction falls within
// [0, look_ahead] and its perpendicular offset is under the collision radius.
pub fn is_blocked(flock: &[Chicken], idx: usize, direction: Vec2, look_ahead: f32) -> bool {
    if direction.length() == 0.0 {
        return false;
    }
    let forward = direction.normalize();
    let position = flock[idx].position;

    for (j, other) in flock.iter().enumerate() {
        if j == idx {
            continue;
        }
        let d = position.distance(other.position);
        if d > look_ahead {
            continue;
        }
        let to_other = other.position - position;
        let along = to_other.dot(forward);
        if along > 0.0 && along < look_ahead {
            let perp = (d * d - along * along).max(0.0).sqrt();
            if perp < COLLISION_RADIUS {
                return true;
            }
        }
    }
    false
}

// First unblocked direction out of 12 probes spaced 30 degrees apart
pub fn find_breakout_dir(flock: &[Chicken], idx: usize) -> Option<Vec2> {
    for i in 0..BREAKOUT_PROBES {
        let dir = vector::from_angle(i as f32 * BREAKOUT_STEP);
        if !is_blocked(flock, idx, dir, BREAKOUT_LOOK_AHEAD) {
            return Some(dir);
        }
    }
    None
}

// First unblocked rotation of the current heading, normalized
pub fn find_detour(flock: &[Chicken], idx: usize) -> Option<Vec2> {
    for &angle in DETOUR_ANGLES.iter() {
        let candidate = vector::rotate(flock[idx].velocity, angle);
        if candidate.length() == 0.0 {
            continue;
        }
        if !is_blocked(flock, idx, candidate, LOOK_AHEAD) {
            return Some(candidate.normalize());
        }
    }
    None
}
