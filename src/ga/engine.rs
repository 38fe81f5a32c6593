//! Island-model GA engine: per-worker population loop and the shared
//! state two workers touch — the global-best solution and the
//! personal-best pool.
//!
//! # Algorithm
//!
//! Each worker owns a population of `P` individuals, evolved in
//! isolation except for two exchanges each generation: a read-then-
//! maybe-write check against the shared global best, and the same
//! against a shared pool of up-to-10 personal bests used both as an
//! immigration source and as a mid-quality reservoir against premature
//! convergence within a single island.
//!
//! # Reference
//! Grounded on `algorithm.hpp`'s worker-thread declarations
//! (`run_thread`, `global_best`, `personal_best_vector`) and on the
//! teacher's `std::thread`/`RwLock` usage in `dispatching/engine.rs`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ga::chromosome::{decode, encode_random, Decoder, Individual};
use crate::ga::operators::{crossover, mutate, tournament_select};
use crate::instance::Instance;
use crate::solution::Solution;

/// Tunable constants for the island-model GA. Defaults reproduce the
/// numbers named in the source: population 100, elitism 10, culling 30,
/// a personal-best pool capped at 10, and the 30%/70% mutation/crossover
/// split.
#[derive(Debug, Clone, Copy)]
pub struct GaConfig {
    pub population_size: usize,
    pub elite_count: usize,
    pub cull_count: usize,
    pub personal_best_capacity: usize,
    pub mutation_probability: f64,
    pub crossover_probability: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_count: 10,
            cull_count: 30,
            personal_best_capacity: 10,
            mutation_probability: 0.3,
            crossover_probability: 0.7,
        }
    }
}

/// Shared state two or more workers touch: the best solution found so
/// far, and a small pool of other high-quality individuals used for
/// migration between islands.
pub struct SharedState {
    pub global_best: RwLock<Solution>,
    pub personal_bests: RwLock<Vec<Individual>>,
    pub stop: AtomicBool,
}

impl SharedState {
    pub fn new(initial_best: Solution) -> Self {
        Self {
            global_best: RwLock::new(initial_best),
            personal_bests: RwLock::new(Vec::new()),
            stop: AtomicBool::new(false),
        }
    }
}

/// Runs `num_threads` independent GA workers against `instance` for
/// `time_limit`, starting from `seed_solution`, and returns the best
/// solution any worker found.
///
/// `root_seed`, if given, seeds every worker's RNG deterministically
/// (split per worker as `root_seed.wrapping_add(worker_index)`); absent,
/// each worker seeds from OS entropy. Workers never share an RNG.
pub fn run_islands(
    instance: &Instance,
    seed_solution: Solution,
    num_threads: usize,
    time_limit: Duration,
    root_seed: Option<u64>,
    config: GaConfig,
) -> Solution {
    let shared = Arc::new(SharedState::new(seed_solution));

    thread::scope(|scope| {
        for worker_index in 0..num_threads {
            let shared = Arc::clone(&shared);
            let rng = match root_seed {
                Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker_index as u64)),
                None => SmallRng::from_os_rng(),
            };
            scope.spawn(move || run_worker(worker_index, instance, &shared, rng, config));
        }

        thread::sleep(time_limit);
        shared.stop.store(true, Ordering::SeqCst);
    });

    shared
        .global_best
        .read()
        .expect("global-best lock poisoned")
        .clone()
}

fn run_worker(worker_index: usize, instance: &Instance, shared: &SharedState, mut rng: SmallRng, config: GaConfig) {
    let mut decoder = Decoder::new(instance);
    let mut population: Vec<Individual> = (0..config.population_size)
        .map(|_| Individual::evaluate(encode_random(instance, &mut rng), instance))
        .collect();
    let mut best_seen = u32::MAX;
    let mut generation = 0u64;

    while !shared.stop.load(Ordering::Relaxed) {
        population.sort_by_key(|individual| individual.fitness);

        if population[0].fitness < best_seen {
            best_seen = population[0].fitness;
            log::debug!(
                "worker {worker_index}: generation {generation} improved to fitness {best_seen}"
            );
        }

        maybe_update_global_best(worker_index, &population[0], instance, shared);
        maybe_update_personal_bests(&population[0], shared, config.personal_best_capacity);

        population = next_generation(&population, instance, &mut decoder, shared, &mut rng, config);
        generation += 1;
    }
}

fn maybe_update_global_best(worker_index: usize, best: &Individual, instance: &Instance, shared: &SharedState) {
    let current_makespan = shared
        .global_best
        .read()
        .expect("global-best lock poisoned")
        .makespan();
    if best.fitness >= current_makespan {
        return;
    }

    let mut global_best = shared.global_best.write().expect("global-best lock poisoned");
    if best.fitness < global_best.makespan() {
        let previous_makespan = global_best.makespan();
        *global_best = decode(&best.chromosome, instance);
        log::info!(
            "worker {worker_index}: new global best makespan {} (was {})",
            best.fitness,
            previous_makespan
        );
    }
}

fn maybe_update_personal_bests(best: &Individual, shared: &SharedState, capacity: usize) {
    let worst = {
        let pool = shared.personal_bests.read().expect("personal-best lock poisoned");
        if pool.len() < capacity {
            None
        } else {
            pool.iter().map(|individual| individual.fitness).max()
        }
    };
    if worst.is_some_and(|worst| best.fitness >= worst) {
        return;
    }

    let mut pool = shared.personal_bests.write().expect("personal-best lock poisoned");
    if pool.len() >= capacity {
        if let Some((worst_idx, _)) = pool
            .iter()
            .enumerate()
            .max_by_key(|(_, individual)| individual.fitness)
        {
            if pool[worst_idx].fitness <= best.fitness {
                return;
            }
            pool.remove(worst_idx);
        }
    }
    pool.push(best.clone());
}

fn next_generation<R: Rng>(
    population: &[Individual],
    instance: &Instance,
    decoder: &mut Decoder,
    shared: &SharedState,
    rng: &mut R,
    config: GaConfig,
) -> Vec<Individual> {
    let target = config.population_size;
    let mut new_gen = Vec::with_capacity(target);

    new_gen.extend(population.iter().take(config.elite_count).cloned());

    let keep = population.len().saturating_sub(config.cull_count);
    new_gen.extend(population.iter().take(keep).cloned());
    {
        let pool = shared.personal_bests.read().expect("personal-best lock poisoned");
        new_gen.extend(pool.iter().cloned());
    }

    while new_gen.len() < target {
        let r: f64 = rng.random();
        if r < config.mutation_probability {
            let parent = tournament_select(population, rng);
            new_gen.push(mutate(&population[parent], instance, decoder, rng));
        } else if rng.random_bool(config.crossover_probability) {
            let p1 = tournament_select(population, rng);
            let p2 = tournament_select(population, rng);
            let (c1, c2) = crossover(&population[p1].chromosome, &population[p2].chromosome, instance, rng);
            new_gen.push(Individual::evaluate(c1, instance));
            if new_gen.len() < target {
                new_gen.push(Individual::evaluate(c2, instance));
            }
        }
        // else: no-op, this draw produces nothing this slot.
    }

    new_gen.truncate(target);
    new_gen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceBuilder;

    fn small_instance() -> Instance {
        InstanceBuilder::new()
            .add_machine(0)
            .add_machine(1)
            .add_job(0, 100)
            .add_step(0, 0, 0, 3)
            .add_step(0, 1, 1, 2)
            .add_job(1, 100)
            .add_step(1, 0, 1, 4)
            .add_step(1, 1, 0, 1)
            .add_job(2, 100)
            .add_step(2, 0, 0, 2)
            .add_step(2, 1, 1, 3)
            .add_job(3, 100)
            .add_step(3, 0, 1, 1)
            .add_step(3, 1, 0, 2)
            .add_job(4, 100)
            .add_step(4, 0, 0, 4)
            .add_step(4, 1, 1, 2)
            .build()
            .unwrap()
    }

    #[test]
    fn run_islands_never_worsens_the_seed_solution() {
        let instance = small_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let seed_chromosome = encode_random(&instance, &mut rng);
        let seed_solution = decode(&seed_chromosome, &instance);
        let seed_makespan = seed_solution.makespan();

        let config = GaConfig {
            population_size: 16,
            elite_count: 2,
            cull_count: 4,
            personal_best_capacity: 3,
            ..GaConfig::default()
        };

        let best = run_islands(
            &instance,
            seed_solution,
            2,
            Duration::from_millis(200),
            Some(7),
            config,
        );

        assert!(best.makespan() <= seed_makespan);
        assert!(best.is_feasible(&instance));
    }

    #[test]
    fn next_generation_preserves_population_size() {
        let instance = small_instance();
        let mut rng = SmallRng::seed_from_u64(3);
        let config = GaConfig::default();
        let population: Vec<Individual> = (0..config.population_size)
            .map(|_| Individual::evaluate(encode_random(&instance, &mut rng), &instance))
            .collect();
        let shared = SharedState::new(decode(&population[0].chromosome, &instance));
        let mut decoder = Decoder::new(&instance);

        let next = next_generation(&population, &instance, &mut decoder, &shared, &mut rng, config);
        assert_eq!(next.len(), config.population_size);
    }
}
