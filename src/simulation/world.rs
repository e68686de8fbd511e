//! The world: entities, tick loop, and god-mode commands.
//!
//! The tick is single-threaded and synchronous. Each tick rebuilds the
//! spatial grid, runs every active agent through
//! Sense -> Decide -> Move/Collide -> Metabolize -> Die-or-Interact,
//! appends newborns, compacts the dead, tops up food, and - when the
//! population reaches zero - assembles the next generation from the elite
//! archive. Agents updated earlier in a tick observe the effects of agents
//! updated before them; the grid is not rebuilt mid-tick.
//!
//! Commands issued by the UI layer are plain methods applied strictly
//! between ticks.

use log::{debug, info};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::agent::{Agent, Sex, SensorSnapshot, Species};
use super::brain::{Brain, BrainKind};
use super::context::SimContext;
use super::grid::{GridCategory, SpatialGrid};
use super::obstacle::{generate_layout, Obstacle, ObstaclePattern};
use super::params::Params;
use super::phenotype::Phenotype;
use super::season::SeasonClock;
use super::stats::Stats;

/// Spawn-search attempts before falling back to the arena center.
const SPAWN_ATTEMPTS: usize = 20;
/// Spawn-search attempts for a newborn before falling back to the parents'
/// midpoint.
const BIRTH_ATTEMPTS: usize = 10;

/// An edible energy pellet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    /// Position in world units.
    pub x: f32,
    /// Position in world units.
    pub y: f32,
    /// Consumed fruit is compacted out at the end of the tick.
    pub active: bool,
}

/// A toxic pellet. Scavengers feed on these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poison {
    /// Position in world units.
    pub x: f32,
    /// Position in world units.
    pub y: f32,
    /// Triggered poison is compacted out at the end of the tick.
    pub active: bool,
}

/// Elite archive entry: the genetic legacy of a high-fitness death.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticRecord {
    /// Deep clone of the deceased's brain.
    pub brain: Brain,
    /// Snapshot of the deceased's phenotype.
    pub phenotype: Phenotype,
    /// Fitness at death.
    pub fitness: f32,
}

/// Tier sizes for next-generation assembly: elite clones, weak-mutation
/// offspring, strong-mutation offspring, and random newcomers.
pub fn tier_sizes(total: usize) -> (usize, usize, usize, usize) {
    let elite = total / 10;
    let random = total / 10;
    let weak = total * 9 / 20;
    let strong = total - elite - random - weak;
    (elite, weak, strong, random)
}

/// Mutable access to two distinct slice elements.
fn pair_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = slice.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Signed angle wrapped into [-pi, pi].
fn normalize_angle(mut angle: f32) -> f32 {
    while angle > std::f32::consts::PI {
        angle -= std::f32::consts::TAU;
    }
    while angle < -std::f32::consts::PI {
        angle += std::f32::consts::TAU;
    }
    angle
}

/// The complete simulation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// All agents, living and not-yet-compacted dead.
    pub agents: Vec<Agent>,
    /// Fruit pellets.
    pub fruits: Vec<Fruit>,
    /// Poison pellets.
    pub poisons: Vec<Poison>,
    /// Obstacle layout.
    pub obstacles: Vec<Obstacle>,
    /// Spatial index, rebuilt every tick.
    pub grid: SpatialGrid,
    /// Elite archive consumed by the next repopulation.
    pub archive: Vec<GeneticRecord>,
    /// Aggregate statistics.
    pub stats: Stats,
    /// Season clock.
    pub season: SeasonClock,
}

impl World {
    /// Creates a world with a random obstacle layout and a fully random
    /// first generation.
    pub fn new(params: &Params, ctx: &mut SimContext) -> Self {
        let (arena_w, arena_h) = params.arena.dimensions();
        let mut world = Self {
            agents: Vec::new(),
            fruits: Vec::new(),
            poisons: Vec::new(),
            obstacles: if params.obstacle_count > 0 {
                generate_layout(ObstaclePattern::Random, arena_w, arena_h, params.obstacle_count, ctx)
            } else {
                Vec::new()
            },
            grid: SpatialGrid::new(arena_w, arena_h, params.grid_cell_size),
            archive: Vec::new(),
            stats: Stats::default(),
            season: SeasonClock::new(),
        };
        world.rebuild_grid();
        world.repopulate(params, ctx);
        world
    }

    /// Number of living agents.
    pub fn population(&self) -> usize {
        self.agents.iter().filter(|a| a.active).count()
    }

    // --- Spatial bookkeeping ---

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (i, fruit) in self.fruits.iter().enumerate() {
            if fruit.active {
                self.grid.insert(GridCategory::Fruit, i, fruit.x, fruit.y);
            }
        }
        for (i, poison) in self.poisons.iter().enumerate() {
            if poison.active {
                self.grid.insert(GridCategory::Poison, i, poison.x, poison.y);
            }
        }
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.active {
                self.grid.insert(GridCategory::Agent, i, agent.x, agent.y);
            }
        }
        for (i, obs) in self.obstacles.iter().enumerate() {
            if obs.active {
                self.grid
                    .insert_extent(GridCategory::Obstacle, i, obs.x, obs.y, obs.width, obs.height);
            }
        }
    }

    /// Whether a circle at the position overlaps any active obstacle,
    /// resolved through the grid's obstacle buckets around the point.
    pub fn obstacle_collision(&self, x: f32, y: f32, radius: f32) -> bool {
        for (gx, gy) in self.grid.cells_in_range(x, y, self.grid.cell_size()) {
            for &idx in self.grid.obstacles_at(gx, gy) {
                let obs = &self.obstacles[idx];
                if obs.active && obs.intersects(x, y, radius) {
                    return true;
                }
            }
        }
        false
    }

    /// Searches for a collision-free position, falling back to the arena
    /// center when the attempt budget runs out.
    pub fn find_safe_spawn(
        &self,
        min_radius: f32,
        params: &Params,
        ctx: &mut SimContext,
    ) -> (f32, f32) {
        let (arena_w, arena_h) = params.arena.dimensions();
        for _ in 0..SPAWN_ATTEMPTS {
            let x = ctx.range(min_radius + 50.0, arena_w - min_radius - 50.0);
            let y = ctx.range(min_radius + 50.0, arena_h - min_radius - 50.0);
            if !self.obstacle_collision(x, y, min_radius) {
                return (x, y);
            }
        }
        (arena_w / 2.0, arena_h / 2.0)
    }

    // --- Tick ---

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, params: &Params, ctx: &mut SimContext, dt: f32) {
        self.stats.time += dt;
        if self.season.advance(dt, params.season_duration) {
            info!("season changed to {}", self.season.current.name());
        }

        self.rebuild_grid();

        let mut babies: Vec<Agent> = Vec::new();
        let (mut total_speed, mut total_size, mut total_efficiency) = (0.0, 0.0, 0.0);
        let mut census = 0usize;

        for i in 0..self.agents.len() {
            if !self.agents[i].active {
                continue;
            }
            census += 1;
            total_speed += self.agents[i].phenotype.speed;
            total_size += self.agents[i].phenotype.size;
            total_efficiency += self.agents[i].phenotype.efficiency;

            self.update_agent(i, &mut babies, params, ctx, dt);
        }

        if census > 0 {
            self.stats.avg_speed = total_speed / census as f32;
            self.stats.avg_size = total_size / census as f32;
            self.stats.avg_efficiency = total_efficiency / census as f32;
        }

        self.stats.births += babies.len() as u32;
        for baby in babies {
            self.register_spawn(baby);
        }

        self.agents.retain(|a| a.active);
        self.fruits.retain(|f| f.active);
        self.poisons.retain(|p| p.active);

        let fruit_cap =
            (params.scaled_fruit_cap() as f32 * self.season.current.fruit_factor()) as usize;
        if self.fruits.len() < fruit_cap {
            let (x, y) = self.find_safe_spawn(5.0, params, ctx);
            self.fruits.push(Fruit { x, y, active: true });
        }
        let poison_cap =
            (params.scaled_poison_cap() as f32 * self.season.current.poison_factor()) as usize;
        if self.poisons.len() < poison_cap {
            let (x, y) = self.find_safe_spawn(5.0, params, ctx);
            self.poisons.push(Poison { x, y, active: true });
        }

        if self.agents.is_empty() {
            self.stats.finalize_generation();
            info!(
                "generation {} extinct after {:.1}s; repopulating",
                self.stats.generation, self.stats.time
            );
            self.repopulate(params, ctx);
        }

        let population = self.agents.len();
        if population > self.stats.max_population {
            self.stats.max_population = population;
        }
    }

    /// Runs one agent through the per-tick state machine.
    fn update_agent(
        &mut self,
        i: usize,
        babies: &mut Vec<Agent>,
        params: &Params,
        ctx: &mut SimContext,
        dt: f32,
    ) {
        // Sense.
        let (inputs, snapshot, saw_poison) = self.sense(i, params);

        // Decide.
        let outputs = {
            let agent = &mut self.agents[i];
            agent.lifespan += dt;
            if saw_poison {
                agent.poisons_avoided += 1;
            }
            agent.last_sensors = snapshot;
            agent.brain.infer(&inputs)
        };

        let left = outputs.first().copied().unwrap_or(0.0);
        let right = outputs.get(1).copied().unwrap_or(0.0);
        let emission = if params.pheromone_enabled {
            outputs.get(2).copied().unwrap_or(0.0).max(0.0)
        } else {
            0.0
        };

        // Move/Collide.
        let (x, y, angle, radius, step) = {
            let agent = &mut self.agents[i];
            agent.pheromone = emission;
            agent.angle =
                normalize_angle(agent.angle + (left - right) * params.rotation_speed * dt);
            let throttle = ((left + right) / 2.0).max(-0.2);
            let speed = params.move_speed * agent.phenotype.actual_speed();
            (
                agent.x,
                agent.y,
                agent.angle,
                agent.phenotype.visual_radius(),
                throttle * speed * dt,
            )
        };

        let mut new_x = x + angle.cos() * step;
        let mut new_y = y + angle.sin() * step;
        let mut hit = false;

        if self.obstacle_collision(new_x, new_y, radius) {
            hit = true;
            new_x = x;
            new_y = y;
            // Two lateral slide attempts at half step before giving up.
            for slide in [
                angle + std::f32::consts::FRAC_PI_2,
                angle - std::f32::consts::FRAC_PI_2,
            ] {
                let sx = x + slide.cos() * step.abs() * 0.5;
                let sy = y + slide.sin() * step.abs() * 0.5;
                if !self.obstacle_collision(sx, sy, radius) {
                    new_x = sx;
                    new_y = sy;
                    break;
                }
            }
        }

        // Toroidal wrap, unless the wrapped position would itself collide.
        let (arena_w, arena_h) = params.arena.dimensions();
        let wrapped_x = new_x.rem_euclid(arena_w);
        let wrapped_y = new_y.rem_euclid(arena_h);
        let wrapped = (wrapped_x - new_x).abs() > f32::EPSILON
            || (wrapped_y - new_y).abs() > f32::EPSILON;
        if wrapped && self.obstacle_collision(wrapped_x, wrapped_y, radius) {
            new_x = new_x.clamp(0.0, arena_w);
            new_y = new_y.clamp(0.0, arena_h);
        } else {
            new_x = wrapped_x;
            new_y = wrapped_y;
        }

        {
            let agent = &mut self.agents[i];
            agent.x = new_x;
            agent.y = new_y;
            if hit {
                agent.obstacles_hit += 1;
                agent.drain_energy(params.collision_energy_penalty);
                if params.lifetime_learning {
                    agent
                        .brain
                        .learn_from_reward(-0.1 * params.collision_learning_boost, params.learning_rate);
                }
            }
        }

        // Metabolize.
        let drain = params.metabolism_rate
            * self.agents[i].phenotype.metabolic_rate()
            * self.species_metabolism(self.agents[i].species, params)
            * self.season.current.metabolism_factor()
            * dt;
        self.agents[i].drain_energy(drain);

        // Die or interact.
        if self.agents[i].energy <= 0.0 {
            self.agents[i].energy = 0.0;
            self.agents[i].active = false;
            let fitness = self.agents[i].fitness();
            self.stats.record_death(fitness);

            let living = self.population();
            if living <= params.low_population && fitness > params.archive_fitness_bar {
                let record = GeneticRecord {
                    brain: self.agents[i].brain.duplicate(),
                    phenotype: self.agents[i].phenotype,
                    fitness,
                };
                self.archive.push(record);
            }
            return;
        }

        let reward = self.resolve_interactions(i, babies, params, ctx);
        if reward != 0.0 {
            self.agents[i].total_reward += reward;
            if params.lifetime_learning {
                self.agents[i]
                    .brain
                    .learn_from_reward(reward, params.learning_rate);
            }
        }
    }

    fn species_metabolism(&self, species: Species, params: &Params) -> f32 {
        match species {
            Species::Predator => params.predator_metabolism,
            _ => 1.0,
        }
    }

    /// Builds the sensor input vector for one agent: nearest fruit, poison
    /// and obstacle as (signed angle / pi, distance / vision radius), plus
    /// the aggregate pheromone scalar when that channel is enabled.
    fn sense(&self, index: usize, params: &Params) -> (Array1<f32>, SensorSnapshot, bool) {
        let agent = &self.agents[index];
        let vision = params.vision_radius;
        let vision_sq = vision * vision;

        let mut fruit = (0.0_f32, 1.0_f32);
        let mut poison = (0.0_f32, 1.0_f32);
        let mut obstacle = (0.0_f32, 1.0_f32);
        let mut best_fruit = vision_sq;
        let mut best_poison = vision_sq;
        let mut best_obstacle = vision_sq;
        let mut target_fruit = None;
        let mut target_poison = None;
        let mut pheromone_sum = 0.0_f32;
        let mut saw_poison = false;

        let bearing = |tx: f32, ty: f32| -> f32 {
            normalize_angle((ty - agent.y).atan2(tx - agent.x) - agent.angle) / std::f32::consts::PI
        };

        for (gx, gy) in self.grid.cells_in_range(agent.x, agent.y, vision) {
            for &fi in self.grid.fruit_at(gx, gy) {
                let f = &self.fruits[fi];
                if !f.active {
                    continue;
                }
                let d_sq = (f.x - agent.x).powi(2) + (f.y - agent.y).powi(2);
                if d_sq < best_fruit {
                    best_fruit = d_sq;
                    fruit = (bearing(f.x, f.y), d_sq.sqrt() / vision);
                    target_fruit = Some((f.x, f.y));
                }
            }

            for &pi in self.grid.poison_at(gx, gy) {
                let p = &self.poisons[pi];
                if !p.active {
                    continue;
                }
                let d_sq = (p.x - agent.x).powi(2) + (p.y - agent.y).powi(2);
                if d_sq < best_poison {
                    best_poison = d_sq;
                    poison = (bearing(p.x, p.y), d_sq.sqrt() / vision);
                    target_poison = Some((p.x, p.y));
                    saw_poison = true;
                }
            }

            for &oi in self.grid.obstacles_at(gx, gy) {
                let obs = &self.obstacles[oi];
                if !obs.active {
                    continue;
                }
                let (cx, cy) = obs.center();
                let d_sq = (cx - agent.x).powi(2) + (cy - agent.y).powi(2);
                if d_sq < best_obstacle {
                    best_obstacle = d_sq;
                    obstacle = (bearing(cx, cy), d_sq.sqrt() / vision);
                }
            }

            if params.pheromone_enabled {
                for &ai in self.grid.agents_at(gx, gy) {
                    if ai == index {
                        continue;
                    }
                    let other = &self.agents[ai];
                    if !other.active || other.pheromone <= 0.0 {
                        continue;
                    }
                    let d_sq = (other.x - agent.x).powi(2) + (other.y - agent.y).powi(2);
                    if d_sq < vision_sq {
                        pheromone_sum += other.pheromone * (1.0 - d_sq.sqrt() / vision);
                    }
                }
            }
        }

        let mut inputs = vec![fruit.0, fruit.1, poison.0, poison.1, obstacle.0, obstacle.1];
        if params.pheromone_enabled {
            inputs.push(pheromone_sum.tanh());
        }

        let snapshot = SensorSnapshot {
            inputs: inputs.clone(),
            target_fruit,
            target_poison,
        };

        (Array1::from_vec(inputs), snapshot, saw_poison)
    }

    /// Resolves local interactions for one agent: feeding, predation and
    /// mating within the surrounding cells. Returns the net reward. At most
    /// one reproduction event is processed per agent per tick.
    fn resolve_interactions(
        &mut self,
        i: usize,
        babies: &mut Vec<Agent>,
        params: &Params,
        ctx: &mut SimContext,
    ) -> f32 {
        let (x, y) = (self.agents[i].x, self.agents[i].y);
        let scan = params.eat_radius.max(params.mating_range);
        let eat_sq = params.eat_radius * params.eat_radius;
        let mut reward = 0.0_f32;

        let mut fruit_hits: Vec<usize> = Vec::new();
        let mut poison_hits: Vec<usize> = Vec::new();
        let mut neighbors: Vec<usize> = Vec::new();
        for (gx, gy) in self.grid.cells_in_range(x, y, scan) {
            fruit_hits.extend_from_slice(self.grid.fruit_at(gx, gy));
            poison_hits.extend_from_slice(self.grid.poison_at(gx, gy));
            neighbors.extend_from_slice(self.grid.agents_at(gx, gy));
        }

        for fi in fruit_hits {
            let fruit = &self.fruits[fi];
            if !fruit.active {
                continue;
            }
            if (fruit.x - x).powi(2) + (fruit.y - y).powi(2) < eat_sq {
                self.fruits[fi].active = false;
                let agent = &mut self.agents[i];
                let gain = match agent.species {
                    Species::Herbivore => params.fruit_energy * params.herbivore_fruit_bonus,
                    _ => params.fruit_energy,
                };
                agent.gain_energy(gain, params.max_energy);
                agent.fruits_eaten += 1;
                reward += 1.0;
            }
        }

        for pi in poison_hits {
            let poison = &self.poisons[pi];
            if !poison.active {
                continue;
            }
            if (poison.x - x).powi(2) + (poison.y - y).powi(2) < eat_sq {
                self.poisons[pi].active = false;
                let agent = &mut self.agents[i];
                if agent.species == Species::Scavenger {
                    agent.gain_energy(
                        params.poison_damage * params.scavenger_poison_gain,
                        params.max_energy,
                    );
                    reward += 1.0;
                } else {
                    agent.drain_energy(params.poison_damage);
                    agent.poisons_avoided = agent.poisons_avoided.saturating_sub(5);
                    reward -= 2.0;
                }
            }
        }

        // Predation: one steal per tick from the first adjacent prey.
        if self.agents[i].species == Species::Predator {
            for &j in &neighbors {
                if j == i || !self.agents[j].active {
                    continue;
                }
                if self.agents[j].species == Species::Predator {
                    continue;
                }
                let prey = &self.agents[j];
                if (prey.x - x).powi(2) + (prey.y - y).powi(2) < eat_sq {
                    let steal = params.predator_steal;
                    let (hunter, prey) = pair_mut(&mut self.agents, i, j);
                    prey.drain_energy(steal);
                    hunter.gain_energy(steal * 0.75, params.max_energy);
                    reward += 0.5;
                    break;
                }
            }
        }

        // Mating: a female above the threshold pairs with the first
        // same-species male above the threshold within range.
        let mating_sq = params.mating_range * params.mating_range;
        if self.agents[i].sex == Sex::Female && self.agents[i].energy > params.mating_threshold {
            for &j in &neighbors {
                if j == i || !self.agents[j].active {
                    continue;
                }
                let partner = &self.agents[j];
                if partner.sex != Sex::Male
                    || partner.species != self.agents[i].species
                    || partner.energy <= params.mating_threshold
                {
                    continue;
                }
                if (partner.x - x).powi(2) + (partner.y - y).powi(2) >= mating_sq {
                    continue;
                }

                let baby = self.conceive(i, j, params, ctx);
                let (mother, father) = pair_mut(&mut self.agents, i, j);
                mother.drain_energy(params.mating_cost);
                father.drain_energy(params.mating_cost);
                mother.children += 1;
                father.children += 1;
                babies.push(baby);
                reward += 0.5;
                return reward;
            }
        }

        reward
    }

    /// Builds a child agent from two parents: crossed-over mutated brain
    /// and phenotype, spawned at a collision-free point near the parents'
    /// midpoint (bounded search, uncorrected midpoint as fallback).
    fn conceive(&self, mother: usize, father: usize, params: &Params, ctx: &mut SimContext) -> Agent {
        let (mom, dad) = (&self.agents[mother], &self.agents[father]);

        // The NEAT crossover treats the caller as the not-less-fit parent.
        let mut brain = if mom.fitness() >= dad.fitness() {
            mom.brain.crossover(&dad.brain, ctx)
        } else {
            dad.brain.crossover(&mom.brain, ctx)
        };
        brain.mutate(
            params.child_brain_mutation_rate * params.mutation_multiplier,
            params.child_brain_mutation_power,
            ctx,
        );

        let mut phenotype = Phenotype::crossover(&mom.phenotype, &dad.phenotype, ctx);
        phenotype.mutate(
            params.child_phenotype_mutation_rate * params.mutation_multiplier,
            ctx,
        );

        let mid_x = (mom.x + dad.x) / 2.0;
        let mid_y = (mom.y + dad.y) / 2.0;
        let radius = phenotype.visual_radius();
        let (mut bx, mut by) = (mid_x, mid_y);
        if self.obstacle_collision(bx, by, radius) {
            let mut placed = false;
            for _ in 0..BIRTH_ATTEMPTS {
                let cx = mid_x + ctx.range(-30.0, 30.0);
                let cy = mid_y + ctx.range(-30.0, 30.0);
                if !self.obstacle_collision(cx, cy, radius) {
                    bx = cx;
                    by = cy;
                    placed = true;
                    break;
                }
            }
            if !placed {
                // Uncorrected midpoint; the child will slide out on its own.
                bx = mid_x;
                by = mid_y;
            }
        }

        let species = mom.species;
        let mut baby = Agent::new(bx, by, brain, phenotype, params.start_energy, ctx);
        baby.species = species;
        baby
    }

    // --- Generational control ---

    fn register_spawn(&mut self, agent: Agent) {
        self.stats.species_counts[agent.species.index()] += 1;
        let brain_slot = match agent.brain.kind() {
            BrainKind::FeedForward => 0,
            BrainKind::Recurrent => 1,
            BrainKind::Neat => 2,
        };
        self.stats.brain_counts[brain_slot] += 1;
        self.agents.push(agent);
    }

    fn random_agent(&self, params: &Params, ctx: &mut SimContext) -> Agent {
        let (x, y) = self.find_safe_spawn(10.0, params, ctx);
        let kind = params.brain_mix.pick(ctx.range(0.0, 1.0));
        let brain = Brain::random(
            kind,
            params.input_size(),
            params.hidden_size,
            params.output_size(),
            ctx,
        );
        Agent::new(x, y, brain, Phenotype::random(ctx), params.start_energy, ctx)
    }

    /// Assembles the next generation from the elite archive.
    ///
    /// The archive is sorted by fitness and truncated, then four tiers are
    /// spawned: unmutated elite clones, weak-mutation offspring,
    /// strong-mutation offspring, and random newcomers. With no archive the
    /// whole population is random. The archive is cleared afterwards, and
    /// the food supply is reset.
    pub fn repopulate(&mut self, params: &Params, ctx: &mut SimContext) {
        self.stats.generation += 1;

        self.archive
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
        self.archive.truncate(params.archive_cap);

        let total = params.scaled_population();
        let (elite, weak, strong, random) = tier_sizes(total);

        if self.archive.is_empty() {
            for _ in 0..total {
                let agent = self.random_agent(params, ctx);
                self.register_spawn(agent);
            }
        } else {
            for k in 0..elite {
                let record = &self.archive[k % self.archive.len()];
                let (brain, phenotype) = (record.brain.duplicate(), record.phenotype);
                let (x, y) = self.find_safe_spawn(10.0, params, ctx);
                let agent = Agent::new(x, y, brain, phenotype, params.start_energy, ctx);
                self.register_spawn(agent);
            }

            for (count, brain_rate, brain_power, pheno_rate) in [
                (weak, 0.15, 0.08, 0.1),
                (strong, 0.3, 0.25, 0.3),
            ] {
                for _ in 0..count {
                    let pick = (ctx.range(0.0, self.archive.len() as f32) as usize)
                        .min(self.archive.len() - 1);
                    let record = &self.archive[pick];
                    let mut brain = record.brain.duplicate();
                    let mut phenotype = record.phenotype;
                    brain.mutate(brain_rate * params.mutation_multiplier, brain_power, ctx);
                    phenotype.mutate(pheno_rate * params.mutation_multiplier, ctx);
                    let (x, y) = self.find_safe_spawn(10.0, params, ctx);
                    let agent = Agent::new(x, y, brain, phenotype, params.start_energy, ctx);
                    self.register_spawn(agent);
                }
            }

            for _ in 0..random {
                let agent = self.random_agent(params, ctx);
                self.register_spawn(agent);
            }

            self.archive.clear();
        }

        // Fresh food supply for the new generation.
        self.fruits.clear();
        self.poisons.clear();
        for _ in 0..params.scaled_fruit_cap() * 3 / 2 {
            let (x, y) = self.find_safe_spawn(5.0, params, ctx);
            self.fruits.push(Fruit { x, y, active: true });
        }
        for _ in 0..params.scaled_poison_cap() * 4 / 3 {
            let (x, y) = self.find_safe_spawn(5.0, params, ctx);
            self.poisons.push(Poison { x, y, active: true });
        }
    }

    // --- Command surface (applied between ticks) ---

    /// Spawns a fruit at a position.
    pub fn spawn_fruit_at(&mut self, x: f32, y: f32) {
        self.fruits.push(Fruit { x, y, active: true });
    }

    /// Spawns a poison at a position.
    pub fn spawn_poison_at(&mut self, x: f32, y: f32) {
        self.poisons.push(Poison { x, y, active: true });
    }

    /// Spawns an agent of a chosen brain kind at a position.
    pub fn spawn_agent_at(
        &mut self,
        x: f32,
        y: f32,
        kind: BrainKind,
        params: &Params,
        ctx: &mut SimContext,
    ) {
        let brain = Brain::random(
            kind,
            params.input_size(),
            params.hidden_size,
            params.output_size(),
            ctx,
        );
        let agent = Agent::new(x, y, brain, Phenotype::random(ctx), params.start_energy, ctx);
        debug!("god-mode spawn: {} agent at ({x:.0}, {y:.0})", kind.name());
        self.register_spawn(agent);
    }

    /// Spawns `count` agents of a species at safe positions.
    pub fn spawn_species(
        &mut self,
        species: Species,
        count: usize,
        params: &Params,
        ctx: &mut SimContext,
    ) {
        for _ in 0..count {
            let mut agent = self.random_agent(params, ctx);
            agent.species = species;
            self.register_spawn(agent);
        }
        debug!("god-mode spawn: {count} x {}", species.name());
    }

    /// Deactivates all fruits, poisons and agents within a radius.
    pub fn erase_within(&mut self, x: f32, y: f32, radius: f32) {
        let r_sq = radius * radius;
        for fruit in &mut self.fruits {
            if (fruit.x - x).powi(2) + (fruit.y - y).powi(2) < r_sq {
                fruit.active = false;
            }
        }
        for poison in &mut self.poisons {
            if (poison.x - x).powi(2) + (poison.y - y).powi(2) < r_sq {
                poison.active = false;
            }
        }
        for agent in &mut self.agents {
            if agent.active && (agent.x - x).powi(2) + (agent.y - y).powi(2) < r_sq {
                agent.active = false;
                agent.energy = 0.0;
                self.stats.deaths += 1;
            }
        }
    }

    /// Mutates every living agent's brain heavily.
    pub fn force_mutation(&mut self, params: &Params, ctx: &mut SimContext) {
        for agent in &mut self.agents {
            if agent.active {
                agent
                    .brain
                    .mutate(0.5 * params.mutation_multiplier, 0.5, ctx);
            }
        }
        debug!("god-mode: force mutation applied to population");
    }

    /// Sets every living agent's energy to the maximum.
    pub fn fertility_blessing(&mut self, params: &Params) {
        for agent in &mut self.agents {
            if agent.active {
                agent.energy = params.max_energy;
            }
        }
    }

    /// Kills a random fraction of the living population.
    pub fn cull(&mut self, fraction: f32, ctx: &mut SimContext) {
        let fraction = fraction.clamp(0.0, 1.0);
        let mut victims: Vec<usize> = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.active)
            .map(|(i, _)| i)
            .collect();
        let target = (victims.len() as f32 * fraction) as usize;
        for _ in 0..target {
            let pick = (ctx.range(0.0, victims.len() as f32) as usize).min(victims.len() - 1);
            let idx = victims.swap_remove(pick);
            let fitness = self.agents[idx].fitness();
            self.agents[idx].energy = 0.0;
            self.agents[idx].active = false;
            self.stats.record_death(fitness);
        }
        debug!("god-mode: culled {target} agents");
    }

    /// Jumps to the next season immediately.
    pub fn advance_season(&mut self) {
        self.season.skip();
        info!("season skipped to {}", self.season.current.name());
    }

    /// Replaces the obstacle layout with a named pattern.
    pub fn regenerate_obstacles(
        &mut self,
        pattern: ObstaclePattern,
        params: &Params,
        ctx: &mut SimContext,
    ) {
        let (arena_w, arena_h) = params.arena.dimensions();
        self.obstacles =
            generate_layout(pattern, arena_w, arena_h, params.obstacle_count, ctx);
        self.rebuild_grid();
        debug!("obstacle layout regenerated: {}", pattern.name());
    }
}
