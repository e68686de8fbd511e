//! Window loop for the arena simulation.
//!
//! Owns the `Params` and the `SimContext`; all UI commands, including the
//! click tools, are applied between ticks.

use macroquad::prelude::*;

use vivarium::simulation::context::SimContext;
use vivarium::simulation::params::Params;
use vivarium::simulation::world::World;

mod graphics;
mod ui;

/// Clamp on the per-frame timestep so a dragged window cannot produce a
/// catastrophic tick.
const MAX_DT: f32 = 0.05;

fn apply_click_tool(
    state: &ui::UiState,
    world: &mut World,
    params: &Params,
    ctx: &mut SimContext,
) {
    if !state.god_mode || state.tool == ui::SpawnTool::None {
        return;
    }
    if !is_mouse_button_pressed(MouseButton::Left) {
        return;
    }

    let (mx, my) = mouse_position();
    let (arena_w, arena_h) = params.arena.dimensions();
    let x = mx / screen_width() * arena_w;
    let y = my / screen_height() * arena_h;

    match state.tool {
        ui::SpawnTool::None => {}
        ui::SpawnTool::Fruit => world.spawn_fruit_at(x, y),
        ui::SpawnTool::Poison => world.spawn_poison_at(x, y),
        ui::SpawnTool::Agent(kind) => world.spawn_agent_at(x, y, kind, params, ctx),
        ui::SpawnTool::Erase => world.erase_within(x, y, 40.0),
    }
}

/// Optional parameter file next to the executable.
const CONFIG_PATH: &str = "vivarium.json";

#[macroquad::main("Vivarium - Evolution Sim")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut params = match Params::from_file(CONFIG_PATH) {
        Ok(loaded) => {
            log::info!("loaded parameters from {CONFIG_PATH}");
            loaded
        }
        Err(err) => {
            log::debug!("no parameter file ({err}); using defaults");
            Params::default()
        }
    };
    let mut ctx = SimContext::new();
    let mut state = ui::UiState::new();
    let mut world: Option<World> = None;

    loop {
        let Some(active_world) = world.as_mut() else {
            clear_background(Color::from_rgba(20, 20, 25, 255));
            let text = "Press Enter to seed a new world";
            let font_size = 30.0;
            let size = measure_text(text, None, font_size as u16, 1.0);
            draw_text(
                text,
                screen_width() / 2.0 - size.width / 2.0,
                screen_height() / 2.0 - size.height / 2.0,
                font_size,
                LIGHTGRAY,
            );
            if is_key_pressed(KeyCode::Enter) {
                world = Some(World::new(&params, &mut ctx));
            }
            next_frame().await;
            continue;
        };

        if state.reset_requested {
            state.reset_requested = false;
            *active_world = World::new(&params, &mut ctx);
        }

        // Commands land between ticks.
        apply_click_tool(&state, active_world, &params, &mut ctx);

        if !state.paused {
            let dt = get_frame_time().min(MAX_DT) * state.time_scale;
            active_world.tick(&params, &mut ctx, dt);
        } else if state.step_once {
            state.step_once = false;
            active_world.tick(&params, &mut ctx, 1.0 / 60.0);
        }

        clear_background(Color::from_rgba(20, 20, 25, 255));
        graphics::draw_world(active_world, &params);
        ui::draw_ui(&mut state, active_world, &mut params, &mut ctx);
        ui::process_egui();

        next_frame().await;
    }
}
