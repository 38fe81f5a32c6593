//! Genetic operators: tournament selection, partition crossover, and
//! 3-position best-of-permutation mutation.
//!
//! # Reference
//! Operator shapes are grounded on the declarations in `algorithm.hpp`
//! (`tournament_selection`, `crossover`, `mutation`); the original's
//! definitions for crossover/mutation were not retained in the source
//! excerpt this crate was distilled from, so the implementations below
//! follow `spec.md` §4.E literally, including its two explicit
//! resolutions of source ambiguities (crossover complement-fill
//! direction, and the small-instance fallback).

use std::collections::HashSet;

use rand::Rng;

use crate::ga::chromosome::{Chromosome, Decoder, Individual};
use crate::instance::{Instance, JobId};

/// Tournament selection, size 5: draws five individuals uniformly with
/// replacement and returns the index of the one with minimum fitness.
/// Ties go to whichever was encountered first.
pub fn tournament_select<R: Rng>(population: &[Individual], rng: &mut R) -> usize {
    assert!(!population.is_empty(), "tournament selection needs a non-empty population");
    let mut best = rng.random_range(0..population.len());
    for _ in 1..5 {
        let candidate = rng.random_range(0..population.len());
        if population[candidate].fitness < population[best].fitness {
            best = candidate;
        }
    }
    best
}

/// Partition (operation-preserving) crossover.
///
/// Draws a split `s` uniformly from `[2, max_job_id - 2]` and partitions
/// job ids into `G1 = {j < s}` and `G2 = {j >= s}`. Child 1 keeps `G1`
/// positions from parent 1 unchanged and fills the rest with parent 2's
/// `G2` jobs in parent-2 order; child 2 is the mirror image. Both
/// children are valid chromosomes by construction.
///
/// Falls back to cloning both parents when the instance has fewer than
/// 5 distinct job ids, since the split range is empty below that — this
/// is `spec.md` §9's resolution of an undefined case in the source, not
/// a new behaviour.
pub fn crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    instance: &Instance,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let Some(max_job_id) = instance.max_job_id() else {
        return (p1.clone(), p2.clone());
    };
    if max_job_id < 4 {
        log::debug!(
            "crossover: instance has only {} job id(s), below the 5 required for a split; \
             returning parents unchanged",
            max_job_id + 1
        );
        return (p1.clone(), p2.clone());
    }

    let split = rng.random_range(2..=(max_job_id - 2));
    let in_g1 = |job_id: JobId| job_id < split;

    let child1 = build_child(p1, p2, in_g1);
    let child2 = build_child(p2, p1, |job_id| !in_g1(job_id));
    (child1, child2)
}

/// Builds one crossover child: positions whose job passes `keep` are
/// copied from `template`; the rest are filled, left to right, from
/// `donor`'s occurrences of jobs that fail `keep`, in donor order.
fn build_child(template: &[JobId], donor: &[JobId], keep: impl Fn(JobId) -> bool) -> Chromosome {
    let mut donor_iter = donor.iter().copied().filter(|&job_id| !keep(job_id));
    template
        .iter()
        .map(|&job_id| {
            if keep(job_id) {
                job_id
            } else {
                donor_iter
                    .next()
                    .expect("donor has the same job-id multiset as template")
            }
        })
        .collect()
}

const NON_IDENTITY_PERMS: [[usize; 3]; 5] = [
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];
const IDENTITY_PERM: [usize; 3] = [0, 1, 2];

/// Best-of-permutation, 3-point mutation.
///
/// Picks three positions holding three *distinct* job ids, generates all
/// 5 non-identity permutations of those three values (plus the identity,
/// i.e. the original), decodes each, and returns the one with minimum
/// makespan. A deterministic local-search step given the position choice.
///
/// If three distinct-job positions cannot be found within a bounded
/// number of attempts (e.g. a single-job instance), the individual is
/// returned unchanged.
pub fn mutate<R: Rng>(
    individual: &Individual,
    instance: &Instance,
    decoder: &mut Decoder,
    rng: &mut R,
) -> Individual {
    let Some(positions) = pick_three_distinct_positions(&individual.chromosome, rng) else {
        return individual.clone();
    };
    let values = [
        individual.chromosome[positions[0]],
        individual.chromosome[positions[1]],
        individual.chromosome[positions[2]],
    ];

    let mut best = individual.clone();
    for perm in std::iter::once(&IDENTITY_PERM).chain(NON_IDENTITY_PERMS.iter()) {
        let mut candidate = individual.chromosome.clone();
        for (slot, &value_idx) in positions.iter().zip(perm.iter()) {
            candidate[*slot] = values[value_idx];
        }
        let fitness = decoder.decode_into(&candidate, instance).makespan();
        if fitness < best.fitness {
            best = Individual { chromosome: candidate, fitness };
        }
    }
    best
}

fn pick_three_distinct_positions<R: Rng>(chromosome: &[JobId], rng: &mut R) -> Option<[usize; 3]> {
    if chromosome.len() < 3 {
        return None;
    }
    for _ in 0..50 {
        let mut chosen = HashSet::with_capacity(3);
        while chosen.len() < 3 {
            chosen.insert(rng.random_range(0..chromosome.len()));
        }
        let mut positions: Vec<usize> = chosen.into_iter().collect();
        positions.sort_unstable();
        let [a, b, c] = [positions[0], positions[1], positions[2]];
        if chromosome[a] != chromosome[b] && chromosome[b] != chromosome[c] && chromosome[a] != chromosome[c] {
            return Some([a, b, c]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::chromosome::{decode, encode_random, is_valid_chromosome};
    use crate::instance::InstanceBuilder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn instance_with_n_jobs(n: JobId) -> Instance {
        let mut builder = InstanceBuilder::new().add_machine(0);
        for job_id in 0..n {
            builder = builder.add_job(job_id, 100).add_step(job_id, 0, 0, 3 + job_id);
        }
        builder.build().unwrap()
    }

    #[test]
    fn tournament_selection_prefers_lower_fitness() {
        let population = vec![
            Individual { chromosome: vec![0], fitness: 50 },
            Individual { chromosome: vec![0], fitness: 10 },
            Individual { chromosome: vec![0], fitness: 30 },
        ];
        let mut rng = SmallRng::seed_from_u64(0);
        // Over many draws the selected individual's fitness should never
        // exceed the population minimum.
        for _ in 0..50 {
            let idx = tournament_select(&population, &mut rng);
            assert!(population[idx].fitness >= 10);
        }
    }

    #[test]
    fn crossover_children_satisfy_multiplicity_invariant() {
        let instance = instance_with_n_jobs(6);
        let mut rng = SmallRng::seed_from_u64(1);
        for seed in 0..20u64 {
            let mut rng2 = SmallRng::seed_from_u64(seed);
            let p1 = encode_random(&instance, &mut rng2);
            let p2 = encode_random(&instance, &mut rng2);
            let (c1, c2) = crossover(&p1, &p2, &instance, &mut rng);
            assert!(is_valid_chromosome(&c1, &instance), "seed={seed}");
            assert!(is_valid_chromosome(&c2, &instance), "seed={seed}");
        }
    }

    #[test]
    fn crossover_falls_back_below_five_jobs() {
        let instance = instance_with_n_jobs(4);
        let mut rng = SmallRng::seed_from_u64(2);
        let p1 = encode_random(&instance, &mut rng);
        let p2 = encode_random(&instance, &mut rng);
        let (c1, c2) = crossover(&p1, &p2, &instance, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn mutation_never_worsens_fitness() {
        let instance = instance_with_n_jobs(6);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut decoder = Decoder::new(&instance);
        for seed in 0..20u64 {
            let mut rng2 = SmallRng::seed_from_u64(seed);
            let chromosome = encode_random(&instance, &mut rng2);
            let fitness = decode(&chromosome, &instance).makespan();
            let individual = Individual { chromosome, fitness };

            let mutated = mutate(&individual, &instance, &mut decoder, &mut rng);
            assert!(mutated.fitness <= individual.fitness, "seed={seed}");
            assert!(is_valid_chromosome(&mutated.chromosome, &instance));
        }
    }

    #[test]
    fn mutation_on_single_job_returns_input_unchanged() {
        let instance = InstanceBuilder::new()
            .add_machine(0)
            .add_job(0, 10)
            .add_step(0, 0, 0, 5)
            .build()
            .unwrap();
        let mut decoder = Decoder::new(&instance);
        let mut rng = SmallRng::seed_from_u64(4);
        let individual = Individual::evaluate(vec![0], &instance);
        let mutated = mutate(&individual, &instance, &mut decoder, &mut rng);
        assert_eq!(mutated.chromosome, individual.chromosome);
        assert_eq!(mutated.fitness, individual.fitness);
    }
}
