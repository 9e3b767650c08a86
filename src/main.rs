/*
 * Hencoop - Chicken Flock Simulation
 *
 * A small flock of chickens wandering, feeding, and panicking on a 2D
 * plane, driven by boids-style steering and a per-chicken state machine.
 *
 * Left click scares the flock, right click drops feed, and the control
 * window adds hens, roosters, and chicks.
 */

use hencoop::app;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    nannou::app(app::model).update(app::update).run();
}
