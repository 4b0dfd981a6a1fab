//! The generational orchestrator.
//!
//! [`Evolution`] owns the population, the generation counter, the
//! evaluator with its best-ever record, and the optional history buffer,
//! statistics log and persistence store. One call to
//! [`advance_generation`](Evolution::advance_generation) runs exactly one
//! generation: evaluate → persist → record history → log statistics →
//! reproduce (panmictic or islands) → commit the new population.

use crate::config::EvolutionConfig;
use crate::error::EvolutionError;
use crate::evaluate::FitnessEvaluator;
use crate::history::FitnessHistory;
use crate::islands::IslandPartitioner;
use crate::persist::{PersistedState, PersistenceStore};
use crate::reproduction::ReproductionEngine;
use crate::types::Environment;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

/// Drives the evolutionary process one generation at a time.
///
/// # Usage
///
/// ```ignore
/// let mut evolution = Evolution::new(MyEnvironment::new(), config)?;
/// for _ in 0..1000 {
///     evolution.advance_generation()?;
/// }
/// println!("best fitness: {:?}", evolution.best_fitness());
/// ```
pub struct Evolution<E: Environment> {
    env: E,
    config: EvolutionConfig,
    population: Vec<E::Genotype>,
    generation: u32,
    evaluator: FitnessEvaluator<E>,
    reproduction: ReproductionEngine,
    partitioner: Option<IslandPartitioner>,
    membership: Vec<usize>,
    history: Option<FitnessHistory>,
    store: Option<(u32, PersistenceStore)>,
    log: Option<BufWriter<std::fs::File>>,
    rng: StdRng,
}

impl<E: Environment> Evolution<E> {
    /// Creates an engine over `env`.
    ///
    /// If persistence is configured and the state file exists, the
    /// population, generation counter and best-ever record are restored
    /// from it; otherwise a fresh random population is created (a missing
    /// file is a notice, not an error).
    pub fn new(env: E, config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate().map_err(EvolutionError::Config)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut evaluator = FitnessEvaluator::new(&env, config.threads)?;

        let store = config
            .persistence
            .as_ref()
            .map(|p| (p.every, PersistenceStore::new(p.path.clone())));

        let (population, generation) = match &store {
            Some((_, store)) => {
                match store.load(&env, config.population_size, &mut rng)? {
                    Some(state) => {
                        info!(
                            generation = state.generation,
                            best_fitness = state.best_fitness,
                            "restored persisted state"
                        );
                        evaluator.restore_best(state.best_fitness, state.best);
                        (state.population, state.generation)
                    }
                    None => (Self::random_population(&env, &config, &mut rng), 0),
                }
            }
            None => (Self::random_population(&env, &config, &mut rng), 0),
        };

        let partitioner = config.islands.as_ref().map(|islands| {
            IslandPartitioner::new(
                islands.topology.clone(),
                islands.migration_frequency,
                islands.migration_fraction,
            )
        });
        let membership = match &partitioner {
            Some(p) => p.random_membership(config.population_size, &mut rng),
            None => Vec::new(),
        };

        let history = config.history_window.map(FitnessHistory::new);

        let log = match &config.log_path {
            Some(path) => Some(BufWriter::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
            None => None,
        };

        let reproduction = ReproductionEngine {
            p_crossover: config.p_crossover,
            p_mutation: config.p_mutation,
            survival_fraction: config.survival_fraction,
            scaling: config.scaling,
        };

        Ok(Self {
            env,
            config,
            population,
            generation,
            evaluator,
            reproduction,
            partitioner,
            membership,
            history,
            store,
            log,
            rng,
        })
    }

    fn random_population(
        env: &E,
        config: &EvolutionConfig,
        rng: &mut StdRng,
    ) -> Vec<E::Genotype> {
        info!(size = config.population_size, "initializing random population");
        (0..config.population_size)
            .map(|_| env.random_genotype(rng))
            .collect()
    }

    /// Runs one generation.
    ///
    /// Evaluates the current population, persists state and records
    /// history when configured, appends one statistics line to the log,
    /// and commits the next-generation population. The population seen
    /// by callers is always a complete generation — never a partial one.
    pub fn advance_generation(&mut self) -> Result<(), EvolutionError> {
        let mut fitness = self.evaluator.evaluate(&self.population)?;

        if let Some((every, store)) = &self.store {
            if self.generation % every == 0 {
                let state = PersistedState {
                    generation: self.generation,
                    best_fitness: self
                        .evaluator
                        .best_fitness()
                        .expect("best recorded after evaluation"),
                    best: self
                        .evaluator
                        .best_genotype()
                        .cloned()
                        .expect("best recorded after evaluation"),
                    population: self.population.clone(),
                    fitness: fitness.clone(),
                };
                store.save(&state)?;
            }
        }

        if let Some(history) = &self.history {
            history.record(self.generation, &fitness);
        }

        let average = fitness.iter().sum::<f64>() / fitness.len() as f64;
        let max_this_gen = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let max_ever = self
            .evaluator
            .best_fitness()
            .expect("best recorded after evaluation");

        if let Some(log) = &mut self.log {
            writeln!(log, "{}\t{}\t{}\t{}", self.generation, average, max_this_gen, max_ever)?;
            log.flush()?;
        }
        debug!(
            generation = self.generation,
            average, max_this_gen, max_ever, "generation evaluated"
        );

        let next = match &self.partitioner {
            Some(partitioner) => partitioner.next_generation(
                &self.reproduction,
                &self.population,
                &fitness,
                &mut self.membership,
                self.generation,
                &mut self.rng,
            ),
            // Panmictic reproduction scales the fitness vector in place;
            // persistence and history above saw the raw values.
            None => self
                .reproduction
                .next_generation(&self.population, &mut fitness, &mut self.rng),
        };

        self.population = next;
        self.generation += 1;
        Ok(())
    }

    /// The current generation counter (number of completed generations).
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The current population, index-aligned with island membership.
    pub fn population(&self) -> &[E::Genotype] {
        &self.population
    }

    /// Highest fitness ever observed, if at least one generation ran.
    pub fn best_fitness(&self) -> Option<f64> {
        self.evaluator.best_fitness()
    }

    /// The genotype that achieved [`best_fitness`](Self::best_fitness).
    pub fn best_genotype(&self) -> Option<&E::Genotype> {
        self.evaluator.best_genotype()
    }

    /// A handle to the shared fitness-history buffer, if tracking is
    /// enabled. The handle can be read from another thread while the
    /// engine runs.
    pub fn history(&self) -> Option<FitnessHistory> {
        self.history.clone()
    }

    /// Current island membership (global index → node id), empty when no
    /// islands are configured.
    pub fn island_membership(&self) -> &[usize] {
        &self.membership
    }

    /// The environment this engine evolves against.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }
}
