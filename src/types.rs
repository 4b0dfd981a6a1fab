//! Core trait definitions for the evolutionary engine.
//!
//! Three traits form the contract between the generic engine and
//! domain-specific code: [`Genotype`] (the evolvable unit),
//! [`FitnessFunction`] (the scorer) and [`Environment`] (the factory that
//! wires the two together). The engine never inspects gene semantics:
//! genotypes are opaque beyond length, crossover, mutation and
//! save/load of internal state.

use crate::error::EvalError;
use rand::Rng;
use std::io::{Read, Write};

/// An evolvable candidate solution.
///
/// Higher fitness is better. Genotypes are opaque to the engine: it only
/// ever asks for the gene count, recombines two parents at a position,
/// mutates a position, and streams internal state in and out.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct BitString { bits: Vec<bool> }
///
/// impl Genotype for BitString {
///     fn len(&self) -> usize { self.bits.len() }
///
///     fn crossover(&self, other: &Self, position: usize) -> (Self, Self) {
///         let mut a = self.clone();
///         let mut b = other.clone();
///         a.bits[position..].copy_from_slice(&other.bits[position..]);
///         b.bits[position..].copy_from_slice(&self.bits[position..]);
///         (a, b)
///     }
///
///     fn mutate<R: Rng>(&mut self, position: usize, rng: &mut R) {
///         self.bits[position] = rng.random_bool(0.5);
///     }
///     // save/load stream the bit vector
/// }
/// ```
pub trait Genotype: Clone + Send + Sync {
    /// Number of genes in this genotype.
    fn len(&self) -> usize;

    /// Returns `true` if the genotype has no genes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Single-point crossover at `position`, producing two complementary
    /// offspring: the first takes `self`'s genes before `position` and
    /// `other`'s from `position` onward, the second is the symmetric
    /// complement.
    ///
    /// `position == self.len()` is valid and yields plain copies of the
    /// two parents (no mixing).
    fn crossover(&self, other: &Self, position: usize) -> (Self, Self);

    /// Replaces the gene at `position` with a random value.
    fn mutate<R: Rng>(&mut self, position: usize, rng: &mut R);

    /// Writes the genotype's internal state to a stream.
    fn save<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;

    /// Overwrites the genotype's internal state from a stream.
    ///
    /// Called on a freshly constructed genotype of the right shape
    /// (see [`Environment::random_genotype`]).
    fn load<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()>;
}

/// Scores genotypes with a real number; higher is better.
///
/// Implementations may carry mutable internal state (caches, simulators,
/// network handles) and need not be `Sync`: the engine guarantees that a
/// given instance is never used by two threads at once. In parallel mode
/// it pre-creates one instance per worker thread.
pub trait FitnessFunction<G: Genotype>: Send {
    /// Computes the fitness of `genotype`.
    ///
    /// In serial mode an error aborts the generation; in parallel mode it
    /// is converted into the sentinel fitness −1.0 for that individual.
    fn evaluate(&mut self, genotype: &G) -> Result<f64, EvalError>;
}

/// Factory producing fresh genotypes and fitness-function instances.
///
/// The engine calls [`random_genotype`](Environment::random_genotype)
/// during population initialization (and when reconstructing persisted
/// state) and [`fitness_function`](Environment::fitness_function) once
/// per worker thread.
pub trait Environment: Send + Sync {
    /// The genotype representation this environment produces.
    type Genotype: Genotype;

    /// The fitness function scoring this environment's genotypes.
    type Fitness: FitnessFunction<Self::Genotype>;

    /// Creates a randomly initialized genotype.
    fn random_genotype<R: Rng>(&self, rng: &mut R) -> Self::Genotype;

    /// Creates a fresh fitness-function instance.
    fn fitness_function(&self) -> Self::Fitness;
}
