/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains the
 * adjustable parameters for the flock simulation. Defaults are the tuned
 * values the behavior model was calibrated against; the host UI may adjust
 * them through the provided slider ranges.
 */

// Parameters for the simulation that can be adjusted via UI
pub struct SimulationParams {
    /// Walking speed cap
    pub max_speed: f32,
    /// Base steering force cap
    pub max_force: f32,
    /// Speed cap while fleeing
    pub run_speed: f32,
    /// Radius for alignment and cohesion neighbor scans
    pub perception_radius: f32,
    /// Radius for separation and crowding checks
    pub separation_radius: f32,
    /// How far an idle chicken will notice food
    pub food_range: f32,
    /// Radius of the host's fright command
    pub scare_range: f32,
    /// Units of food in a freshly deposited site
    pub food_capacity: f32,
    /// Outstanding food sites before FIFO eviction
    pub max_feeds: usize,
    /// Distance within which a scared chicken can panic a calm one
    pub panic_radius: f32,
    /// Per-neighbor per-tick conversion probability
    pub panic_chance: f64,
    /// Consecutive low-displacement ticks before a breakout attempt
    pub stuck_threshold: u32,
    /// Distance from a canvas edge at which boundary avoidance engages
    pub wall_buffer: f32,
    pub show_debug: bool,
    pub pause_simulation: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_speed: 2.0,
            max_force: 0.03,
            run_speed: 5.0,
            perception_radius: 60.0,
            separation_radius: 50.0,
            food_range: 250.0,
            scare_range: 150.0,
            food_capacity: 300.0,
            max_feeds: 10,
            panic_radius: 70.0,
            panic_chance: 0.02,
            stuck_threshold: 60,
            wall_buffer: 50.0,
            show_debug: false,
            pause_simulation: false,
        }
    }
}

impl SimulationParams {
    // Get parameter ranges for UI sliders
    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        0.5..=5.0
    }

    pub fn get_run_speed_range() -> std::ops::RangeInclusive<f32> {
        2.0..=10.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=150.0
    }

    pub fn get_range_range() -> std::ops::RangeInclusive<f32> {
        50.0..=500.0
    }

    pub fn get_panic_chance_range() -> std::ops::RangeInclusive<f64> {
        0.0..=0.2
    }
}
