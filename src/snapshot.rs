/*
 * Snapshot Module
 *
 * The per-tick state view handed to the rendering host: position, velocity,
 * behavioral state, facing, and target kind per chicken; position and
 * remaining fraction per food site. Internal timers and AI thresholds are
 * deliberately not exposed.
 */

use nannou::prelude::*;

use crate::chicken::{Chicken, ChickenId, ChickenKind, State, Target};
use crate::food::{Feed, FeedId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKind {
    Idle,
    Walking,
    Eating,
    Scared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    None,
    Wander,
    Food,
}

#[derive(Clone, Debug)]
pub struct ChickenView {
    pub id: ChickenId,
    pub kind: ChickenKind,
    pub position: Point2,
    pub velocity: Vec2,
    pub state: StateKind,
    pub facing_right: bool,
    pub target: TargetKind,
}

impl ChickenView {
    pub fn of(chicken: &Chicken) -> Self {
        let (state, target) = match chicken.state {
            State::Idle { .. } => (StateKind::Idle, TargetKind::None),
            State::Walking {
                target: Target::Wander(_),
                ..
            } => (StateKind::Walking, TargetKind::Wander),
            State::Walking {
                target: Target::Food { .. },
                ..
            } => (StateKind::Walking, TargetKind::Food),
            State::Eating { source: Some(_), .. } => (StateKind::Eating, TargetKind::Food),
            State::Eating { source: None, .. } => (StateKind::Eating, TargetKind::None),
            State::Scared { .. } => (StateKind::Scared, TargetKind::None),
        };

        Self {
            id: chicken.id,
            kind: chicken.kind,
            position: chicken.position,
            velocity: chicken.velocity,
            state,
            facing_right: chicken.facing_right,
            target,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FeedView {
    pub id: FeedId,
    pub position: Point2,
    /// Remaining amount as a fraction of capacity, for depletion visuals
    pub fraction: f32,
}

impl FeedView {
    pub fn of(feed: &Feed, capacity: f32) -> Self {
        Self {
            id: feed.id,
            position: feed.position,
            fraction: (feed.amount / capacity).clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub chickens: Vec<ChickenView>,
    pub feeds: Vec<FeedView>,
}

impl Snapshot {
    pub fn count_of(&self, kind: ChickenKind) -> usize {
        self.chickens.iter().filter(|c| c.kind == kind).count()
    }
}
