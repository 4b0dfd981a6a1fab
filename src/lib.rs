//! Generational evolutionary engine with pluggable genotypes.
//!
//! The engine evolves a fixed-size population of candidate solutions
//! ("genotypes") over successive generations using fitness-proportionate
//! selection, single-point crossover and positional mutation, guided by a
//! user-supplied fitness function. It knows nothing about what a gene
//! means — genotypes, fitness functions and their factory are trait
//! capabilities supplied by the caller.
//!
//! # Components
//!
//! - [`Genotype`] / [`FitnessFunction`] / [`Environment`]: the capability
//!   traits a domain implements.
//! - [`FitnessEvaluator`]: serial or rayon-parallel population scoring
//!   with best-ever tracking.
//! - [`ReproductionEngine`]: fitness scaling, elitist survival,
//!   roulette-wheel selection, crossover, mutation.
//! - [`IslandPartitioner`] / [`IslandTopology`]: spatially structured
//!   populations with periodic migration between neighboring islands.
//! - [`Evolution`]: the orchestrator driving one generation per call,
//!   with optional statistics logging, fitness history and state
//!   persistence.
//! - [`PersistenceStore`]: binary save/restore of the full engine state.
//!
//! # Example
//!
//! ```ignore
//! use evo_engine::{Evolution, EvolutionConfig, ScalingPolicy};
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(200)
//!     .with_scaling(ScalingPolicy::Rank)
//!     .with_survival_fraction(0.1)
//!     .with_threads(4)
//!     .with_seed(42);
//!
//! let mut evolution = Evolution::new(MyEnvironment::new(), config)?;
//! for _ in 0..1000 {
//!     evolution.advance_generation()?;
//! }
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*
//! - Whitley et al. (1999), "The Island Model Genetic Algorithm: On
//!   Separability, Population Size and Convergence"

mod config;
mod error;
mod evaluate;
mod evolution;
mod history;
mod islands;
mod persist;
mod reproduction;
mod scaling;
mod types;

pub use config::{EvolutionConfig, IslandConfig, PersistenceConfig};
pub use error::{EvalError, EvolutionError};
pub use evaluate::{FitnessEvaluator, FAILED_FITNESS};
pub use evolution::Evolution;
pub use history::FitnessHistory;
pub use islands::{IslandPartitioner, IslandTopology};
pub use persist::{PersistedState, PersistenceStore};
pub use reproduction::{roulette, ReproductionEngine};
pub use scaling::ScalingPolicy;
pub use types::{Environment, FitnessFunction, Genotype};
