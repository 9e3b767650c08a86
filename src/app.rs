/*
 * Application Module
 *
 * The nannou host for the simulation core. It owns the Flock, forwards
 * user input as core commands (left click scares, right click feeds, UI
 * buttons spawn), advances the core once per frame, and renders the
 * per-tick snapshot. All simulation logic lives behind the Flock API;
 * this module only draws what the snapshot exposes.
 */

use nannou::prelude::*;
use nannou::winit::event::MouseButton;
use nannou_egui::Egui;
use rand::Rng;

use crate::chicken::ChickenKind;
use crate::debug::DebugInfo;
use crate::flock::Flock;
use crate::params::SimulationParams;
use crate::snapshot::{ChickenView, FeedView, StateKind};
use crate::ui;
use crate::SPAWN_MARGIN;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

// Expanding ring drawn where the user last clicked
pub struct ClickEffect {
    pub position: Point2,
    pub radius: f32,
    pub alpha: f32,
    pub kind: ClickKind,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Scare,
    Feed,
}

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub params: SimulationParams,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub mouse_position: Vec2,
    pub click_effect: Option<ClickEffect>,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Create the main window
    let window_id = app
        .new_window()
        .title("Hencoop")
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    // Get the window
    let window = app.window(window_id).unwrap();

    // Create the UI
    let egui = Egui::from_window(&window);

    let params = SimulationParams::default();
    let rect = window.rect();
    let mut flock = Flock::new(rect.w(), rect.h());

    // Starting trio around the center of the yard
    let center = pt2(rect.w() / 2.0, rect.h() / 2.0);
    flock.spawn(ChickenKind::Hen, center + vec2(-60.0, -30.0), &params);
    flock.spawn(ChickenKind::Rooster, center + vec2(60.0, -30.0), &params);
    flock.spawn(ChickenKind::Chick, center + vec2(0.0, 50.0), &params);

    Model {
        flock,
        params,
        egui,
        debug_info: DebugInfo::default(),
        mouse_position: Vec2::ZERO,
        click_effect: None,
    }
}

// Update the model: UI first, then exactly one simulation tick per frame
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.debug_info.ticks = model.flock.tick_count;

    // Track the live window size so commands clamp into the visible yard
    let rect = app.window_rect();
    model.flock.set_bounds(rect.w(), rect.h());

    let snapshot = model.flock.snapshot(&model.params);
    let actions = ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info, &snapshot);

    // Spawn requests land at a random spot inside the margins
    let mut rng = rand::thread_rng();
    let random_spot = |rng: &mut rand::rngs::ThreadRng| {
        pt2(
            rng.gen_range(SPAWN_MARGIN..rect.w() - SPAWN_MARGIN),
            rng.gen_range(SPAWN_MARGIN..rect.h() - SPAWN_MARGIN),
        )
    };
    if actions.spawn_hen {
        let p = random_spot(&mut rng);
        model.flock.spawn(ChickenKind::Hen, p, &model.params);
    }
    if actions.spawn_rooster {
        let p = random_spot(&mut rng);
        model.flock.spawn(ChickenKind::Rooster, p, &model.params);
    }
    if actions.spawn_chick {
        let p = random_spot(&mut rng);
        model.flock.spawn(ChickenKind::Chick, p, &model.params);
    }

    if !model.params.pause_simulation {
        model.flock.tick(&model.params);
    }

    // Let the click ring expand and fade
    if let Some(effect) = &mut model.click_effect {
        effect.radius += 10.0;
        effect.alpha -= 0.05;
        if effect.alpha <= 0.0 {
            model.click_effect = None;
        }
    }
}

// Render the snapshot
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    // Clear the background
    draw.background().color(DARKOLIVEGREEN);

    let snapshot = model.flock.snapshot(&model.params);

    if let Some(effect) = &model.click_effect {
        draw_click_effect(&draw, effect, window_rect);
    }

    for feed in &snapshot.feeds {
        draw_feed(&draw, feed, window_rect);
    }

    // Painter's order: chickens lower in the yard draw over those above
    let mut chickens: Vec<&ChickenView> = snapshot.chickens.iter().collect();
    chickens.sort_by(|a, b| a.position.y.partial_cmp(&b.position.y).unwrap());
    for chicken in chickens {
        draw_chicken(&draw, chicken, window_rect);
    }

    // Status line
    let status = format!(
        "Hens {}  Roosters {}  Chicks {}{}",
        snapshot.count_of(ChickenKind::Hen),
        snapshot.count_of(ChickenKind::Rooster),
        snapshot.count_of(ChickenKind::Chick),
        if model.params.pause_simulation {
            "  [paused]"
        } else {
            ""
        }
    );
    draw.text(&status)
        .x_y(window_rect.left() + 150.0, window_rect.top() - 20.0)
        .color(WHITE)
        .font_size(14);

    // Finish drawing
    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}

// Convert a simulation point (origin top-left, y down) to nannou screen
// coordinates (origin center, y up)
fn world_to_screen(p: Point2, window_rect: Rect) -> Point2 {
    pt2(p.x - window_rect.w() / 2.0, window_rect.h() / 2.0 - p.y)
}

fn screen_to_world(p: Point2, window_rect: Rect) -> Point2 {
    pt2(p.x + window_rect.w() / 2.0, window_rect.h() / 2.0 - p.y)
}

fn draw_chicken(draw: &Draw, chicken: &ChickenView, window_rect: Rect) {
    let pos = world_to_screen(chicken.position, window_rect);

    let (body_radius, body_color) = match chicken.kind {
        ChickenKind::Hen => (14.0, rgb(0.96, 0.94, 0.90)),
        ChickenKind::Rooster => (16.0, rgb(0.77, 0.35, 0.24)),
        ChickenKind::Chick => (8.0, rgb(0.98, 0.86, 0.35)),
    };

    // Scared chickens get a warning ring
    if chicken.state == StateKind::Scared {
        draw.ellipse()
            .xy(pos)
            .radius(body_radius + 4.0)
            .no_fill()
            .stroke(rgba(1.0, 0.3, 0.2, 0.8))
            .stroke_weight(2.0);
    }

    // Body
    draw.ellipse()
        .xy(pos)
        .w_h(body_radius * 2.2, body_radius * 2.0)
        .color(body_color);

    // Head offset toward the facing side, dipped while eating
    let side = if chicken.facing_right { 1.0 } else { -1.0 };
    let head_dy = if chicken.state == StateKind::Eating {
        -body_radius * 0.4
    } else {
        body_radius * 0.7
    };
    let head = pos + vec2(side * body_radius * 1.1, head_dy);
    draw.ellipse()
        .xy(head)
        .radius(body_radius * 0.55)
        .color(body_color);

    // Beak
    let beak = [
        head + vec2(side * body_radius * 0.5, 2.0),
        head + vec2(side * body_radius * 0.5, -2.0),
        head + vec2(side * body_radius * 0.95, 0.0),
    ];
    draw.polygon().points(beak).color(ORANGE);
}

fn draw_feed(draw: &Draw, feed: &FeedView, window_rect: Rect) {
    let pos = world_to_screen(feed.position, window_rect);

    // The pile shrinks as it is eaten
    let radius = 4.0 + feed.fraction * 8.0;
    draw.ellipse().xy(pos).radius(radius).color(rgb(0.82, 0.71, 0.55));
    draw.ellipse()
        .xy(pos)
        .radius(radius)
        .no_fill()
        .stroke(rgba(0.0, 0.0, 0.0, 0.2))
        .stroke_weight(1.0);
}

fn draw_click_effect(draw: &Draw, effect: &ClickEffect, window_rect: Rect) {
    let pos = world_to_screen(effect.position, window_rect);
    let alpha = effect.alpha.max(0.0);
    let color = match effect.kind {
        ClickKind::Scare => rgba(1.0, 1.0, 1.0, alpha * 0.5),
        ClickKind::Feed => rgba(0.82, 0.7, 0.55, alpha * 0.5),
    };
    draw.ellipse()
        .xy(pos)
        .radius(effect.radius)
        .no_fill()
        .stroke(color)
        .stroke_weight(2.0);
}

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.mouse_position = vec2(pos.x, pos.y);
}

// Mouse pressed event handler: left scares, right feeds
pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the UI are not yard clicks
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let window_rect = app.window_rect();
    let world = screen_to_world(pt2(model.mouse_position.x, model.mouse_position.y), window_rect);

    match button {
        MouseButton::Left => {
            model.flock.fright(world, model.params.scare_range, &model.params);
            model.click_effect = Some(ClickEffect {
                position: world,
                radius: 0.0,
                alpha: 1.0,
                kind: ClickKind::Scare,
            });
        }
        MouseButton::Right => {
            model.flock.deposit_food(world, &model.params);
            model.click_effect = Some(ClickEffect {
                position: world,
                radius: 0.0,
                alpha: 1.0,
                kind: ClickKind::Feed,
            });
        }
        _ => {}
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
