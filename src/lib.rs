/*
 * Hencoop - Module Definitions
 *
 * This file defines the module structure for the chicken flock simulation.
 * The simulation core (vector, chicken, steering, avoidance, behavior, food,
 * flock, snapshot) is free of any rendering concerns; the host layers
 * (app, ui, debug, main) consume the core through commands and snapshots only.
 */

// Re-export key components for easier access
pub use chicken::{Chicken, ChickenId, ChickenKind, EatTimer, NextState, State, Target};
pub use debug::DebugInfo;
pub use flock::Flock;
pub use food::{Feed, FeedId};
pub use params::SimulationParams;
pub use snapshot::{ChickenView, FeedView, Snapshot, StateKind, TargetKind};

// Define modules
pub mod app;
pub mod avoidance;
pub mod behavior;
pub mod chicken;
pub mod debug;
pub mod flock;
pub mod food;
pub mod params;
pub mod snapshot;
pub mod steering;
pub mod ui;
pub mod vector;

// Constants
pub const SPAWN_MARGIN: f32 = 50.0;
