//! Island-model genetic algorithm: per-thread populations evolved
//! independently, synchronized only through a shared global-best
//! solution and a shared pool of personal bests.
//!
//! See [`engine`] for the worker loop and shared state, [`chromosome`]
//! for the encoding and decoder, and [`operators`] for selection,
//! crossover, and mutation.

pub mod chromosome;
pub mod engine;
pub mod operators;

pub use chromosome::{decode, encode_from_solution, encode_random, Chromosome, Decoder, Individual};
pub use engine::{run_islands, GaConfig};
pub use operators::{crossover, mutate, tournament_select};
