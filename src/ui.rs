//! egui overlay: statistics, god-mode commands, and brain inspection.
//!
//! Commands are issued through the world's command surface; the main loop
//! calls this strictly between ticks.

use egui_macroquad::egui;
use egui_plot::{Line, Plot, PlotPoints};

use vivarium::simulation::agent::Species;
use vivarium::simulation::brain::{BrainKind, LayoutNodeKind};
use vivarium::simulation::context::SimContext;
use vivarium::simulation::obstacle::ObstaclePattern;
use vivarium::simulation::params::{ArenaSize, Params};
use vivarium::simulation::world::World;

/// Transient UI state.
pub struct UiState {
    /// Simulation paused.
    pub paused: bool,
    /// Run a single tick while paused.
    pub step_once: bool,
    /// Tick speed multiplier.
    pub time_scale: f32,
    /// Rebuild the world on the next frame.
    pub reset_requested: bool,
    /// Show the god-mode window.
    pub god_mode: bool,
    /// Show the brain topology window.
    pub show_brain: bool,
    /// Index of the inspected agent.
    pub inspected: usize,
    /// Active click tool while god mode is on.
    pub tool: SpawnTool,
    /// Status line from the last export.
    pub status: Option<String>,
}

impl UiState {
    /// Creates the default UI state.
    pub fn new() -> Self {
        Self {
            paused: false,
            step_once: false,
            time_scale: 1.0,
            reset_requested: false,
            god_mode: false,
            show_brain: false,
            inspected: 0,
            tool: SpawnTool::None,
            status: None,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds all egui windows for this frame.
pub fn draw_ui(state: &mut UiState, world: &mut World, params: &mut Params, ctx: &mut SimContext) {
    egui_macroquad::ui(|egui_ctx| {
        draw_control_window(egui_ctx, state, params);
        draw_stats_window(egui_ctx, state, world, params);
        if state.god_mode {
            draw_god_window(egui_ctx, state, world, params, ctx);
        }
        if state.show_brain {
            draw_brain_window(egui_ctx, state, world);
        }
    });
}

/// Flushes the egui draw list to the screen.
pub fn process_egui() {
    egui_macroquad::draw();
}

fn draw_control_window(egui_ctx: &egui::Context, state: &mut UiState, params: &mut Params) {
    egui::Window::new("Control").show(egui_ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button(if state.paused { "Resume" } else { "Pause" }).clicked() {
                state.paused = !state.paused;
            }
            if ui.button("Step").clicked() {
                state.step_once = true;
            }
            if ui.button("Reset").clicked() {
                state.reset_requested = true;
            }
        });
        ui.add(egui::Slider::new(&mut state.time_scale, 0.1..=5.0).text("Speed"));

        egui::ComboBox::from_label("Arena")
            .selected_text(params.arena.name())
            .show_ui(ui, |ui| {
                for size in [ArenaSize::Small, ArenaSize::Medium, ArenaSize::Large, ArenaSize::Huge] {
                    if ui.selectable_value(&mut params.arena, size, size.name()).clicked() {
                        state.reset_requested = true;
                    }
                }
            });

        ui.separator();
        ui.checkbox(&mut state.god_mode, "God Mode");
        ui.checkbox(&mut state.show_brain, "Brain Inspector");
    });
}

fn draw_stats_window(
    egui_ctx: &egui::Context,
    state: &mut UiState,
    world: &World,
    params: &Params,
) {
    egui::Window::new("Statistics").show(egui_ctx, |ui| {
        let stats = &world.stats;
        ui.label(format!("Generation: {}", stats.generation));
        ui.label(format!("Population: {}", world.population()));
        ui.label(format!("Births: {} | Deaths: {}", stats.births, stats.deaths));
        ui.label(format!("Avg fitness: {:.2}", stats.avg_fitness));
        ui.label(format!("Best fitness: {:.2}", stats.best_fitness));
        ui.label(format!(
            "Season: {} ({:.0}%)",
            world.season.current.name(),
            world.season.progress(params.season_duration) * 100.0
        ));
        ui.label(format!(
            "Avg speed {:.2} | size {:.2} | eff {:.2}",
            stats.avg_speed, stats.avg_size, stats.avg_efficiency
        ));

        ui.separator();
        let avg: PlotPoints = stats
            .history
            .iter()
            .map(|s| [f64::from(s.generation), f64::from(s.avg_fitness)])
            .collect();
        let best: PlotPoints = stats
            .history
            .iter()
            .map(|s| [f64::from(s.generation), f64::from(s.best_fitness)])
            .collect();
        Plot::new("fitness_plot")
            .height(120.0)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(avg).name("avg"));
                plot_ui.line(Line::new(best).name("best"));
            });

        if ui.button("Export history").clicked() {
            state.status = Some(export_history(world));
        }
        if let Some(status) = &state.status {
            ui.label(status);
        }
    });
}

fn export_history(world: &World) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("history_{stamp}.json");
    match serde_json::to_string_pretty(&world.stats.history) {
        Ok(json) => match std::fs::write(&path, json) {
            Ok(()) => format!("wrote {path}"),
            Err(e) => format!("export failed: {e}"),
        },
        Err(e) => format!("export failed: {e}"),
    }
}

fn draw_god_window(
    egui_ctx: &egui::Context,
    state: &mut UiState,
    world: &mut World,
    params: &mut Params,
    ctx: &mut SimContext,
) {
    egui::Window::new("God Mode").show(egui_ctx, |ui| {
        egui::ComboBox::from_label("Click tool")
            .selected_text(state.tool.name())
            .show_ui(ui, |ui| {
                for tool in SpawnTool::ALL {
                    ui.selectable_value(&mut state.tool, tool, tool.name());
                }
            });

        ui.separator();
        ui.label("Population");
        ui.horizontal(|ui| {
            for species in Species::ALL {
                if ui.button(format!("+5 {}", species.name())).clicked() {
                    world.spawn_species(species, 5, params, ctx);
                }
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Spawn 10 fruits").clicked() {
                for _ in 0..10 {
                    let (x, y) = world.find_safe_spawn(5.0, params, ctx);
                    world.spawn_fruit_at(x, y);
                }
            }
            if ui.button("Spawn 10 poisons").clicked() {
                for _ in 0..10 {
                    let (x, y) = world.find_safe_spawn(5.0, params, ctx);
                    world.spawn_poison_at(x, y);
                }
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Kill 50%").clicked() {
                world.cull(0.5, ctx);
            }
            if ui.button("Max energy").clicked() {
                world.fertility_blessing(params);
            }
            if ui.button("Mutate all").clicked() {
                world.force_mutation(params, ctx);
            }
        });
        if ui.button("Next season").clicked() {
            world.advance_season();
        }

        ui.separator();
        ui.label("Obstacle layout");
        ui.horizontal_wrapped(|ui| {
            for pattern in ObstaclePattern::ALL {
                if ui.button(pattern.name()).clicked() {
                    world.regenerate_obstacles(pattern, params, ctx);
                }
            }
        });

        ui.separator();
        ui.label("Tunables");
        ui.add(egui::Slider::new(&mut params.vision_radius, 50.0..=400.0).text("Vision radius"));
        ui.add(egui::Slider::new(&mut params.max_energy, 100.0..=500.0).text("Max energy"));
        ui.add(egui::Slider::new(&mut params.metabolism_rate, 5.0..=30.0).text("Metabolism"));
        ui.add(egui::Slider::new(&mut params.mutation_multiplier, 0.0..=5.0).text("Mutation rate"));
        ui.add(egui::Slider::new(&mut params.mating_threshold, 50.0..=180.0).text("Mating threshold"));
        ui.add(egui::Slider::new(&mut params.mating_cost, 10.0..=100.0).text("Mating cost"));
        ui.add(egui::Slider::new(&mut params.season_duration, 10.0..=120.0).text("Season length"));
        ui.add(egui::Slider::new(&mut params.predator_steal, 0.0..=100.0).text("Predator steal"));
        ui.checkbox(&mut params.lifetime_learning, "Lifetime learning");
    });
}

fn draw_brain_window(egui_ctx: &egui::Context, state: &mut UiState, world: &World) {
    egui::Window::new("Brain").show(egui_ctx, |ui| {
        if world.agents.is_empty() {
            ui.label("No agents alive.");
            return;
        }
        state.inspected = state.inspected.min(world.agents.len() - 1);
        ui.horizontal(|ui| {
            if ui.button("<").clicked() && state.inspected > 0 {
                state.inspected -= 1;
            }
            ui.label(format!("Agent {} / {}", state.inspected + 1, world.agents.len()));
            if ui.button(">").clicked() && state.inspected + 1 < world.agents.len() {
                state.inspected += 1;
            }
        });

        let agent = &world.agents[state.inspected];
        ui.label(format!(
            "{} | {} | energy {:.0}",
            agent.brain.kind().name(),
            agent.species.name(),
            agent.energy
        ));

        let (width, height) = (320.0, 240.0);
        let (response, painter) =
            ui.allocate_painter(egui::vec2(width, height), egui::Sense::hover());
        let origin = response.rect.min;

        let layout = agent.brain.layout(width, height);
        for link in &layout.links {
            let from = &layout.nodes[link.from];
            let to = &layout.nodes[link.to];
            let color = if link.weight > 0.0 {
                egui::Color32::from_rgba_unmultiplied(100, 255, 100, 110)
            } else {
                egui::Color32::from_rgba_unmultiplied(255, 100, 100, 110)
            };
            let thickness = link.weight.abs().clamp(0.3, 3.0);
            painter.line_segment(
                [
                    egui::pos2(origin.x + from.x, origin.y + from.y),
                    egui::pos2(origin.x + to.x, origin.y + to.y),
                ],
                egui::Stroke::new(thickness, color),
            );
        }
        for node in &layout.nodes {
            let color = match node.kind {
                LayoutNodeKind::Input => egui::Color32::from_rgb(100, 200, 255),
                LayoutNodeKind::Hidden => egui::Color32::from_rgb(255, 200, 100),
                LayoutNodeKind::Output => egui::Color32::from_rgb(100, 255, 150),
            };
            painter.circle_filled(egui::pos2(origin.x + node.x, origin.y + node.y), 5.0, color);
        }

        if !agent.last_sensors.inputs.is_empty() {
            ui.label(format!(
                "inputs: {}",
                agent
                    .last_sensors
                    .inputs
                    .iter()
                    .map(|v| format!("{v:+.2}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
        }
    });
}

/// What a click in the arena does while god mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTool {
    /// Clicks do nothing.
    None,
    /// Drop a fruit.
    Fruit,
    /// Drop a poison.
    Poison,
    /// Drop an agent of a brain kind.
    Agent(BrainKind),
    /// Erase entities within a radius.
    Erase,
}

impl SpawnTool {
    /// All tools, in display order.
    pub const ALL: [SpawnTool; 7] = [
        SpawnTool::None,
        SpawnTool::Fruit,
        SpawnTool::Poison,
        SpawnTool::Agent(BrainKind::FeedForward),
        SpawnTool::Agent(BrainKind::Recurrent),
        SpawnTool::Agent(BrainKind::Neat),
        SpawnTool::Erase,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            SpawnTool::None => "None",
            SpawnTool::Fruit => "Fruit",
            SpawnTool::Poison => "Poison",
            SpawnTool::Agent(BrainKind::FeedForward) => "FeedForward agent",
            SpawnTool::Agent(BrainKind::Recurrent) => "Recurrent agent",
            SpawnTool::Agent(BrainKind::Neat) => "NEAT agent",
            SpawnTool::Erase => "Eraser",
        }
    }
}
