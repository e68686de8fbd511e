#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use vivarium::simulation::agent::{Agent, Sex, Species};
use vivarium::simulation::brain::{Brain, BrainKind};
use vivarium::simulation::context::SimContext;
use vivarium::simulation::params::Params;
use vivarium::simulation::phenotype::Phenotype;
use vivarium::simulation::world::{tier_sizes, GeneticRecord, World};

fn test_params() -> Params {
    Params {
        obstacle_count: 0,
        ..Params::default()
    }
}

#[test]
fn test_tier_sizes_for_reference_population() {
    // Target 80 splits 8 elite / 36 weak / 28 strong / 8 random.
    assert_eq!(tier_sizes(80), (8, 36, 28, 8));
}

#[test]
fn test_tier_sizes_always_sum_to_total() {
    for total in [4, 20, 40, 80, 160, 180, 320] {
        let (elite, weak, strong, random) = tier_sizes(total);
        assert_eq!(elite + weak + strong + random, total, "total {total}");
    }
}

#[test]
fn test_repopulation_from_small_archive_fills_target() {
    let params = test_params();
    let mut ctx = SimContext::seeded(20);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.archive.clear();

    // Five records with distinct fitness and recognizable speeds.
    let speeds = [0.6, 0.8, 1.0, 1.2, 1.4];
    for (i, speed) in speeds.iter().enumerate() {
        let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
        world.archive.push(GeneticRecord {
            brain,
            phenotype: Phenotype {
                speed: *speed,
                size: 1.0,
                efficiency: 1.0,
            },
            fitness: (i + 1) as f32 * 10.0,
        });
    }

    let generation_before = world.stats.generation;
    world.repopulate(&params, &mut ctx);

    assert_eq!(world.agents.len(), params.scaled_population());
    assert_eq!(world.stats.generation, generation_before + 1);
    assert!(world.archive.is_empty(), "archive is consumed");

    // Elite clones cycle the fitness-sorted archive unmutated: best first.
    let sorted_speeds = [1.4, 1.2, 1.0, 0.8, 0.6];
    let (elite, _, _, _) = tier_sizes(params.scaled_population());
    for k in 0..elite {
        assert_eq!(
            world.agents[k].phenotype.speed,
            sorted_speeds[k % sorted_speeds.len()],
            "elite clone {k}"
        );
    }
}

#[test]
fn test_first_generation_is_fully_random() {
    let params = test_params();
    let mut ctx = SimContext::seeded(21);
    let world = World::new(&params, &mut ctx);

    assert_eq!(world.agents.len(), params.scaled_population());
    // No archive existed, so all spawn counters belong to this generation.
    let spawned: u32 = world.stats.brain_counts.iter().sum();
    assert_eq!(spawned as usize, params.scaled_population());
}

#[test]
fn test_high_fitness_death_is_archived_at_low_population() {
    let params = test_params();
    let mut ctx = SimContext::seeded(22);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();

    let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
    let mut dying = Agent::new(300.0, 300.0, brain, Phenotype::default(), 0.5, &mut ctx);
    dying.species = Species::Herbivore;
    dying.sex = Sex::Male;
    dying.fruits_eaten = 10;
    world.agents.push(dying);

    let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
    let mut survivor = Agent::new(700.0, 500.0, brain, Phenotype::default(), 150.0, &mut ctx);
    survivor.species = Species::Herbivore;
    survivor.sex = Sex::Male;
    world.agents.push(survivor);

    world.tick(&params, &mut ctx, 1.0);

    assert_eq!(world.agents.len(), 1, "the starved agent was compacted");
    assert_eq!(world.archive.len(), 1);

    // fruits 10 x 2.0 plus one second of lifespan x 0.3.
    let record = &world.archive[0];
    assert!((record.fitness - 20.3).abs() < 1e-3);
}

#[test]
fn test_low_fitness_death_is_not_archived() {
    let params = test_params();
    let mut ctx = SimContext::seeded(23);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    world.fruits.clear();
    world.poisons.clear();

    let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
    let mut dying = Agent::new(300.0, 300.0, brain, Phenotype::default(), 0.5, &mut ctx);
    dying.species = Species::Herbivore;
    dying.sex = Sex::Male;
    world.agents.push(dying);

    let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
    let mut survivor = Agent::new(700.0, 500.0, brain, Phenotype::default(), 150.0, &mut ctx);
    survivor.species = Species::Herbivore;
    survivor.sex = Sex::Male;
    world.agents.push(survivor);

    world.tick(&params, &mut ctx, 1.0);

    assert!(world.archive.is_empty(), "fitness below the bar is discarded");
}

#[test]
fn test_archive_truncates_to_cap() {
    let params = test_params();
    let mut ctx = SimContext::seeded(24);
    let mut world = World::new(&params, &mut ctx);

    world.agents.clear();
    for i in 0..50 {
        let brain = Brain::random(BrainKind::FeedForward, 6, 8, 2, &mut ctx);
        world.archive.push(GeneticRecord {
            brain,
            phenotype: Phenotype::default(),
            fitness: i as f32,
        });
    }

    world.repopulate(&params, &mut ctx);

    // The archive was consumed, but only the top `archive_cap` records fed
    // the generation; elites therefore clone the best record first.
    assert_eq!(world.agents.len(), params.scaled_population());
    assert!(world.archive.is_empty());
}
