/*
 * UI Module
 *
 * This module contains the nannou_egui control window for the simulation
 * host: spawn buttons, tunable parameter sliders, and status/debug labels.
 * Spawn requests are returned to the app module rather than applied here.
 */

use nannou_egui::{egui, Egui};

use crate::chicken::ChickenKind;
use crate::debug::DebugInfo;
use crate::params::SimulationParams;
use crate::snapshot::Snapshot;

// Spawn requests made through the UI this frame
#[derive(Default)]
pub struct UiActions {
    pub spawn_hen: bool,
    pub spawn_rooster: bool,
    pub spawn_chick: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    debug_info: &DebugInfo,
    snapshot: &Snapshot,
) -> UiActions {
    let mut actions = UiActions::default();

    let ctx = egui.begin_frame();

    egui::Window::new("Coop Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                if ui.button("+ Hen").clicked() {
                    actions.spawn_hen = true;
                }
                if ui.button("+ Rooster").clicked() {
                    actions.spawn_rooster = true;
                }
                if ui.button("+ Chick").clicked() {
                    actions.spawn_chick = true;
                }

                ui.separator();
                ui.label(format!(
                    "Hens: {}  Roosters: {}  Chicks: {}",
                    snapshot.count_of(ChickenKind::Hen),
                    snapshot.count_of(ChickenKind::Rooster),
                    snapshot.count_of(ChickenKind::Chick)
                ));
                ui.label(format!("Food sites: {}", snapshot.feeds.len()));
            });

            ui.collapsing("Behavior", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range())
                        .text("Walk Speed"),
                );
                ui.add(
                    egui::Slider::new(&mut params.run_speed, SimulationParams::get_run_speed_range())
                        .text("Run Speed"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.perception_radius,
                        SimulationParams::get_radius_range(),
                    )
                    .text("Perception Radius"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.separation_radius,
                        SimulationParams::get_radius_range(),
                    )
                    .text("Separation Radius"),
                );
                ui.add(
                    egui::Slider::new(&mut params.food_range, SimulationParams::get_range_range())
                        .text("Food Range"),
                );
                ui.add(
                    egui::Slider::new(&mut params.scare_range, SimulationParams::get_range_range())
                        .text("Scare Range"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.panic_chance,
                        SimulationParams::get_panic_chance_range(),
                    )
                    .text("Panic Chance"),
                );
            });

            ui.label("Left click: scare the flock");
            ui.label("Right click: drop feed");

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");

            if params.show_debug {
                ui.separator();
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!(
                    "Frame time: {:.2} ms",
                    debug_info.frame_time.as_secs_f64() * 1000.0
                ));
                ui.label(format!("Ticks: {}", debug_info.ticks));
            }
        });

    actions
}
