//! Entity rendering. Reads simulation state, draws, mutates nothing.

use macroquad::prelude::*;
use vivarium::simulation::agent::{Sex, Species};
use vivarium::simulation::obstacle::ObstacleShape;
use vivarium::simulation::params::Params;
use vivarium::simulation::world::World;

/// Scale from arena units to screen pixels.
fn scale(params: &Params) -> (f32, f32) {
    let (arena_w, arena_h) = params.arena.dimensions();
    (screen_width() / arena_w, screen_height() / arena_h)
}

fn species_color(species: Species, sex: Sex) -> Color {
    match (species, sex) {
        (Species::Herbivore, Sex::Male) => Color::from_rgba(0, 121, 241, 255),
        (Species::Herbivore, Sex::Female) => Color::from_rgba(230, 41, 55, 255),
        (Species::Scavenger, _) => Color::from_rgba(160, 200, 60, 255),
        (Species::Predator, _) => Color::from_rgba(255, 140, 0, 255),
    }
}

/// Draws obstacles, food and agents.
pub fn draw_world(world: &World, params: &Params) {
    let (sx, sy) = scale(params);
    let s = sx.min(sy);

    for obs in &world.obstacles {
        if !obs.active {
            continue;
        }
        let (x, y, w, h) = (obs.x * sx, obs.y * sy, obs.width * sx, obs.height * sy);
        let fill = Color::from_rgba(95, 95, 105, 255);
        let line = Color::from_rgba(135, 135, 145, 255);
        match obs.shape {
            ObstacleShape::Wall => {
                draw_rectangle(x, y, w, h, fill);
                draw_rectangle_lines(x, y, w, h, 2.0, line);
            }
            ObstacleShape::Circle => {
                let r = obs.radius() * s;
                draw_circle(x + w / 2.0, y + h / 2.0, r, fill);
                draw_circle_lines(x + w / 2.0, y + h / 2.0, r, 2.0, line);
            }
            ObstacleShape::LShape => {
                draw_rectangle(x, y, w * 0.3, h, fill);
                draw_rectangle(x, y + h * 0.7, w, h * 0.3, fill);
            }
            ObstacleShape::Corridor => {
                draw_rectangle(x, y, w, h, fill);
                let gap = Color::from_rgba(30, 30, 35, 255);
                draw_rectangle(x + w * 0.35, y, w * 0.1, h, gap);
                draw_rectangle(x + w * 0.55, y, w * 0.1, h, gap);
            }
        }
    }

    for fruit in &world.fruits {
        if fruit.active {
            draw_circle(fruit.x * sx, fruit.y * sy, 3.0 * s, Color::from_rgba(0, 228, 48, 255));
        }
    }
    for poison in &world.poisons {
        if poison.active {
            draw_rectangle(
                poison.x * sx - 3.0 * s,
                poison.y * sy - 3.0 * s,
                6.0 * s,
                6.0 * s,
                Color::from_rgba(160, 32, 240, 255),
            );
        }
    }

    for agent in &world.agents {
        if !agent.active {
            continue;
        }
        let mut color = species_color(agent.species, agent.sex);
        color.a = agent.energy_fraction(params.max_energy).max(0.2);

        let (ax, ay) = (agent.x * sx, agent.y * sy);
        let radius = agent.phenotype.visual_radius() * s;
        draw_circle(ax, ay, radius, color);

        // Heading indicator.
        let head_x = ax + agent.angle.cos() * radius * 1.6;
        let head_y = ay + agent.angle.sin() * radius * 1.6;
        draw_line(ax, ay, head_x, head_y, 1.0, Color::from_rgba(255, 255, 255, 100));

        // Debug target lines from the last sensor snapshot.
        if let Some((fx, fy)) = agent.last_sensors.target_fruit {
            draw_line(ax, ay, fx * sx, fy * sy, 1.0, Color::from_rgba(0, 255, 0, 30));
        }
        if let Some((px, py)) = agent.last_sensors.target_poison {
            draw_line(ax, ay, px * sx, py * sy, 1.0, Color::from_rgba(255, 0, 0, 30));
        }
    }
}
