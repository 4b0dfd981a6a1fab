//! Engine configuration.
//!
//! [`EvolutionConfig`] holds every parameter that controls the
//! generational loop. All parameters are set before the first generation;
//! the engine never re-reads external configuration mid-run.

use crate::islands::IslandTopology;
use crate::scaling::ScalingPolicy;
use std::path::PathBuf;

/// Island-model parameters.
///
/// Present only when the population is partitioned across a topology;
/// absent means a single panmictic population.
#[derive(Debug, Clone)]
pub struct IslandConfig {
    /// The immutable node/adjacency graph. One node per island.
    pub topology: IslandTopology,

    /// Migration runs on generations divisible by this. Must be ≥ 1.
    pub migration_frequency: u32,

    /// Fraction of each island's fittest members that migrate (0.0–1.0).
    pub migration_fraction: f64,
}

/// State-persistence parameters.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Persist on generations divisible by this. Must be ≥ 1.
    pub every: u32,

    /// File holding the serialized engine state.
    pub path: PathBuf,
}

/// Configuration for the evolutionary engine.
///
/// # Defaults
///
/// ```
/// use evo_engine::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.threads, 1);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use evo_engine::{EvolutionConfig, ScalingPolicy};
///
/// let config = EvolutionConfig::default()
///     .with_population_size(200)
///     .with_scaling(ScalingPolicy::Rank)
///     .with_survival_fraction(0.1)
///     .with_threads(4)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    /// Number of individuals in the population. Constant across
    /// generations.
    pub population_size: usize,

    /// Probability of applying crossover to a selected pair (0.0–1.0).
    ///
    /// When crossover is not applied the pair still goes through the
    /// crossover call with position = genotype length, which copies both
    /// parents unchanged.
    pub p_crossover: f64,

    /// Per-gene mutation probability (0.0–1.0), applied independently to
    /// every position of every offspring.
    pub p_mutation: f64,

    /// Fitness-scaling policy applied before roulette selection.
    pub scaling: ScalingPolicy,

    /// Fraction of the population carried over unchanged as elites
    /// (0.0–1.0). The survivor count is rounded down to an even number.
    pub survival_fraction: f64,

    /// Worker-thread count for fitness evaluation. 1 means serial
    /// evaluation on the calling thread.
    pub threads: usize,

    /// Island-model configuration; `None` evolves a single panmictic
    /// population.
    pub islands: Option<IslandConfig>,

    /// Number of recent generations kept in the fitness-history buffer;
    /// `None` disables history tracking.
    pub history_window: Option<usize>,

    /// Per-generation statistics log file
    /// (`generation \t avg \t max \t best-ever`); `None` disables it.
    pub log_path: Option<PathBuf>,

    /// Periodic state persistence; `None` disables it.
    pub persistence: Option<PersistenceConfig>,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            p_crossover: 0.9,
            p_mutation: 0.01,
            scaling: ScalingPolicy::default(),
            survival_fraction: 0.0,
            threads: 1,
            islands: None,
            history_window: None,
            log_path: None,
            persistence: None,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_p_crossover(mut self, p: f64) -> Self {
        self.p_crossover = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_p_mutation(mut self, p: f64) -> Self {
        self.p_mutation = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the fitness-scaling policy.
    pub fn with_scaling(mut self, scaling: ScalingPolicy) -> Self {
        self.scaling = scaling;
        self
    }

    /// Sets the elitist survival fraction.
    pub fn with_survival_fraction(mut self, fraction: f64) -> Self {
        self.survival_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the evaluation worker-thread count (1 = serial).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Enables the island model.
    pub fn with_islands(
        mut self,
        topology: IslandTopology,
        migration_frequency: u32,
        migration_fraction: f64,
    ) -> Self {
        self.islands = Some(IslandConfig {
            topology,
            migration_frequency,
            migration_fraction: migration_fraction.clamp(0.0, 1.0),
        });
        self
    }

    /// Enables the fitness-history buffer, keeping the last `window`
    /// generations.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = Some(window);
        self
    }

    /// Sets the per-generation statistics log file.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Enables periodic state persistence.
    pub fn with_persistence(mut self, every: u32, path: impl Into<PathBuf>) -> Self {
        self.persistence = Some(PersistenceConfig {
            every,
            path: path.into(),
        });
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.threads == 0 {
            return Err("threads must be at least 1".into());
        }
        if let ScalingPolicy::Top(p) = self.scaling {
            if !(0.0..=1.0).contains(&p) {
                return Err("Top scaling fraction must be in [0, 1]".into());
            }
        }
        if let Some(islands) = &self.islands {
            if islands.topology.node_count() == 0 {
                return Err("island topology must have at least one node".into());
            }
            if islands.migration_frequency == 0 {
                return Err("migration_frequency must be at least 1".into());
            }
        }
        if self.history_window == Some(0) {
            return Err("history_window must be positive or unset".into());
        }
        if let Some(persistence) = &self.persistence {
            if persistence.every == 0 {
                return Err("persistence frequency must be at least 1".into());
            }
        }
        Ok(())
    }
}
