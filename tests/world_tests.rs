#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use vivarium::simulation::agent::{Agent, Sex, Species};
use vivarium::simulation::brain::{Brain, BrainKind};
use vivarium::simulation::context::SimContext;
use vivarium::simulation::obstacle::{Obstacle, ObstaclePattern, ObstacleShape};
use vivarium::simulation::params::Params;
use vivarium::simulation::phenotype::Phenotype;
use vivarium::simulation::season::Season;
use vivarium::simulation::world::World;

fn test_params() -> Params {
    Params {
        obstacle_count: 0,
        ..Params::default()
    }
}

fn crafted_agent(
    x: f32,
    y: f32,
    species: Species,
    sex: Sex,
    energy: f32,
    params: &Params,
    ctx: &mut SimContext,
) -> Agent {
    let brain = Brain::random(
        BrainKind::FeedForward,
        params.input_size(),
        params.hidden_size,
        params.output_size(),
        ctx,
    );
    let mut agent = Agent::new(x, y, brain, Phenotype::default(), energy, ctx);
    agent.species = species;
    agent.sex = sex;
    agent
}

#[test]
fn test_world_creation() {
    let params = test_params();
    let mut ctx = SimContext::seeded(1);
    let world = World::new(&params, &mut ctx);

    assert_eq!(world.population(), params.scaled_population());
    assert_eq!(world.fruits.len(), params.scaled_fruit_cap() * 3 / 2);
    assert_eq!(world.poisons.len(), params.scaled_poison_cap() * 4 / 3);
    assert_eq!(world.stats.generation, 1);
    assert!(world.archive.is_empty());

    for agent in &world.agents {
        assert!(agent.is_alive());
        assert_eq!(agent.energy, params.start_energy);
        assert_eq!(agent.brain.input_size(), params.input_size());
    }
}

#[test]
fn test_tick_advances_time_and_lifespans() {
    let params = test_params();
    let mut ctx = SimContext::seeded(2);
    let mut world = World::new(&params, &mut ctx);

    let dt = 0.05;
    world.tick(&params, &mut ctx, dt);

    assert!((world.stats.time - dt).abs() < 0.001);
    for agent in &world.agents {
        assert!(agent.lifespan >= dt - 0.001);
    }
}

#[test]
fn test_metabolism_death_triggers_generation_rollover() {
    // Effective drain is metabolism x phenotype rate (1.5 at neutral):
    // 10 x 1.5 = 15 per second against 10 energy kills within one dt=1 tick.
    let mut params = test_params();
    params.metabolism_rate = 10.0;
    let mut ctx = SimContext::seeded(3);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let agent = crafted_agent(400.0, 300.0, Species::Herbivore, Sex::Male, 10.0, &params, &mut ctx);
    world.agents.push(agent);

    world.tick(&params, &mut ctx, 1.0);

    // The only agent died: one death, no births, and the extinction
    // finalized the generation and repopulated.
    let snapshot = world.stats.history.back().expect("generation snapshot");
    assert_eq!(snapshot.deaths, 1);
    assert_eq!(snapshot.births, 0);
    assert_eq!(world.stats.generation, 2);
    assert_eq!(world.population(), params.scaled_population());
}

#[test]
fn test_fruit_eating_caps_energy_at_max() {
    let params = test_params();
    let mut ctx = SimContext::seeded(4);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let agent = crafted_agent(400.0, 300.0, Species::Herbivore, Sex::Male, 180.0, &params, &mut ctx);
    world.agents.push(agent);
    world.spawn_fruit_at(400.0, 300.0);

    world.tick(&params, &mut ctx, 0.01);

    assert_eq!(world.agents[0].energy, params.max_energy);
    assert_eq!(world.agents[0].fruits_eaten, 1);
}

#[test]
fn test_scavenger_gains_from_poison() {
    let params = test_params();
    let mut ctx = SimContext::seeded(5);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let scavenger =
        crafted_agent(400.0, 300.0, Species::Scavenger, Sex::Male, 100.0, &params, &mut ctx);
    world.agents.push(scavenger);
    world.spawn_poison_at(400.0, 300.0);

    world.tick(&params, &mut ctx, 0.01);

    // Gained poison_damage x scavenger_gain minus a sliver of metabolism.
    assert!(world.agents[0].energy > 100.0);
    // Sighting the poison counted, and feeding on it cost nothing.
    assert_eq!(world.agents[0].poisons_avoided, 1);
}

#[test]
fn test_poison_damages_herbivore() {
    let params = test_params();
    let mut ctx = SimContext::seeded(6);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let herbivore =
        crafted_agent(400.0, 300.0, Species::Herbivore, Sex::Male, 100.0, &params, &mut ctx);
    world.agents.push(herbivore);
    world.spawn_poison_at(400.0, 300.0);

    world.tick(&params, &mut ctx, 0.01);

    assert!(world.agents[0].energy < 100.0 - params.poison_damage + 1.0);
}

#[test]
fn test_mating_produces_one_child() {
    let params = test_params();
    let mut ctx = SimContext::seeded(7);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let mother =
        crafted_agent(400.0, 300.0, Species::Herbivore, Sex::Female, 150.0, &params, &mut ctx);
    let father =
        crafted_agent(410.0, 300.0, Species::Herbivore, Sex::Male, 150.0, &params, &mut ctx);
    world.agents.push(mother);
    world.agents.push(father);

    world.tick(&params, &mut ctx, 0.01);

    assert_eq!(world.agents.len(), 3, "exactly one child per tick");
    assert_eq!(world.stats.births, 1);
    assert_eq!(world.agents[0].children, 1);
    assert_eq!(world.agents[1].children, 1);

    let child = &world.agents[2];
    assert_eq!(child.species, Species::Herbivore);
    assert_eq!(child.energy, params.start_energy);
    assert_eq!(child.lifespan, 0.0);

    // Both parents paid the mating cost.
    assert!(world.agents[0].energy < 150.0 - params.mating_cost + 1.0);
    assert!(world.agents[1].energy < 150.0 - params.mating_cost + 1.0);
}

#[test]
fn test_mating_requires_same_species() {
    let params = test_params();
    let mut ctx = SimContext::seeded(8);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let female =
        crafted_agent(400.0, 300.0, Species::Herbivore, Sex::Female, 150.0, &params, &mut ctx);
    let male =
        crafted_agent(410.0, 300.0, Species::Scavenger, Sex::Male, 150.0, &params, &mut ctx);
    world.agents.push(female);
    world.agents.push(male);

    world.tick(&params, &mut ctx, 0.01);

    assert_eq!(world.agents.len(), 2, "cross-species pairs must not breed");
    assert_eq!(world.stats.births, 0);
}

#[test]
fn test_predator_steals_energy() {
    let params = test_params();
    let mut ctx = SimContext::seeded(9);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    let predator =
        crafted_agent(400.0, 300.0, Species::Predator, Sex::Male, 100.0, &params, &mut ctx);
    let prey = crafted_agent(405.0, 300.0, Species::Herbivore, Sex::Male, 100.0, &params, &mut ctx);
    world.agents.push(predator);
    world.agents.push(prey);

    world.tick(&params, &mut ctx, 0.01);

    assert!(world.agents[0].energy > world.agents[1].energy);
    assert!(world.agents[1].energy < 100.0 - params.predator_steal + 1.0);
}

#[test]
fn test_safe_spawn_never_inside_active_rectangle() {
    let params = test_params();
    let mut ctx = SimContext::seeded(10);
    let mut world = World::new(&params, &mut ctx);

    world.obstacles = vec![Obstacle::new(300.0, 200.0, 200.0, 150.0, ObstacleShape::Wall)];
    // Rebuild the grid so collision queries see the new layout.
    world.tick(&params, &mut ctx, 0.0);

    for _ in 0..100 {
        let (x, y) = world.find_safe_spawn(5.0, &params, &mut ctx);
        assert!(
            !world.obstacles[0].contains(x, y),
            "safe spawn returned a point inside an active obstacle"
        );
    }
}

#[test]
fn test_erase_within_radius() {
    let params = test_params();
    let mut ctx = SimContext::seeded(11);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();
    world.spawn_fruit_at(100.0, 100.0);
    world.spawn_poison_at(105.0, 100.0);
    let agent = crafted_agent(110.0, 100.0, Species::Herbivore, Sex::Male, 100.0, &params, &mut ctx);
    world.agents.push(agent);

    world.erase_within(100.0, 100.0, 30.0);

    assert!(!world.fruits[0].active);
    assert!(!world.poisons[0].active);
    assert_eq!(world.population(), 0);
}

#[test]
fn test_fertility_blessing_fills_energy() {
    let params = test_params();
    let mut ctx = SimContext::seeded(12);
    let mut world = World::new(&params, &mut ctx);

    world.fertility_blessing(&params);
    for agent in &world.agents {
        assert_eq!(agent.energy, params.max_energy);
    }
}

#[test]
fn test_cull_kills_requested_fraction() {
    let params = test_params();
    let mut ctx = SimContext::seeded(13);
    let mut world = World::new(&params, &mut ctx);

    let before = world.population();
    world.cull(0.5, &mut ctx);
    assert_eq!(world.population(), before - before / 2);
}

#[test]
fn test_advance_season_command() {
    let params = test_params();
    let mut ctx = SimContext::seeded(14);
    let mut world = World::new(&params, &mut ctx);

    assert_eq!(world.season.current, Season::Spring);
    world.advance_season();
    assert_eq!(world.season.current, Season::Summer);
}

#[test]
fn test_regenerate_obstacles_patterns() {
    let params = test_params();
    let mut ctx = SimContext::seeded(15);
    let mut world = World::new(&params, &mut ctx);

    world.regenerate_obstacles(ObstaclePattern::Maze, &params, &mut ctx);
    assert!(!world.obstacles.is_empty());

    world.regenerate_obstacles(ObstaclePattern::Clear, &params, &mut ctx);
    assert!(world.obstacles.is_empty());
}

#[test]
fn test_agents_stay_in_bounds() {
    let params = test_params();
    let mut ctx = SimContext::seeded(16);
    let mut world = World::new(&params, &mut ctx);

    let (arena_w, arena_h) = params.arena.dimensions();
    for _ in 0..20 {
        world.tick(&params, &mut ctx, 0.05);
        for agent in &world.agents {
            assert!(agent.x >= 0.0 && agent.x <= arena_w);
            assert!(agent.y >= 0.0 && agent.y <= arena_h);
        }
    }
}

#[test]
fn test_pheromone_channel_widens_sensors() {
    let mut params = test_params();
    params.pheromone_enabled = true;
    let mut ctx = SimContext::seeded(17);
    let mut world = World::new(&params, &mut ctx);

    assert_eq!(params.input_size(), 7);
    assert_eq!(params.output_size(), 3);
    for agent in &world.agents {
        assert_eq!(agent.brain.input_size(), 7);
    }

    world.tick(&params, &mut ctx, 0.05);
    for agent in &world.agents {
        if agent.lifespan > 0.0 {
            assert_eq!(agent.last_sensors.inputs.len(), 7);
        }
    }
}

#[test]
fn test_spawn_agent_of_each_variant() {
    let params = test_params();
    let mut ctx = SimContext::seeded(18);
    let mut world = World::new(&params, &mut ctx);

    let before = world.population();
    world.spawn_agent_at(200.0, 200.0, BrainKind::FeedForward, &params, &mut ctx);
    world.spawn_agent_at(210.0, 200.0, BrainKind::Recurrent, &params, &mut ctx);
    world.spawn_agent_at(220.0, 200.0, BrainKind::Neat, &params, &mut ctx);

    assert_eq!(world.population(), before + 3);
    let kinds: Vec<BrainKind> = world.agents[before..].iter().map(|a| a.brain.kind()).collect();
    assert_eq!(
        kinds,
        vec![BrainKind::FeedForward, BrainKind::Recurrent, BrainKind::Neat]
    );
}
