//! Population fitness evaluation.
//!
//! [`FitnessEvaluator`] scores a whole population either on the calling
//! thread (serial) or fanned out across a dedicated rayon pool sized to
//! the configured thread count. It owns one [`FitnessFunction`] instance
//! per worker — instances may be stateful and are never touched by two
//! threads at once: a task checks an instance out of a locked bank,
//! scores its genotype, and checks the instance back in. Since at most
//! `threads` tasks run concurrently on a pool of `threads` workers, the
//! bank is never empty at checkout.
//!
//! Results come back as an index-ordered vector; the parallel collect is
//! the join barrier, so the fitness vector is complete before
//! reproduction reads it. Best-ever merging happens on the controlling
//! thread in index order, which makes parallel results bit-identical to
//! serial for a deterministic fitness function.

use crate::error::EvolutionError;
use crate::types::{Environment, FitnessFunction};
use rayon::prelude::*;
use std::sync::Mutex;
use tracing::warn;

/// Fitness assigned to an individual whose evaluation failed in parallel
/// mode. The lowest possible score, biasing the individual out of
/// selection without aborting the batch.
pub const FAILED_FITNESS: f64 = -1.0;

/// Evaluates populations and tracks the best genotype ever seen.
pub struct FitnessEvaluator<E: Environment> {
    workers: Vec<E::Fitness>,
    pool: Option<rayon::ThreadPool>,
    best: Option<(f64, E::Genotype)>,
}

impl<E: Environment> FitnessEvaluator<E> {
    /// Creates an evaluator with `threads` pre-created fitness-function
    /// instances. `threads == 1` evaluates serially on the calling
    /// thread; larger values build a dedicated rayon pool of exactly that
    /// many workers.
    pub fn new(env: &E, threads: usize) -> Result<Self, EvolutionError> {
        if threads == 0 {
            return Err(EvolutionError::Config("threads must be at least 1".into()));
        }
        let workers = (0..threads).map(|_| env.fitness_function()).collect();
        let pool = if threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| EvolutionError::Pool(e.to_string()))?,
            )
        } else {
            None
        };
        Ok(Self {
            workers,
            pool,
            best: None,
        })
    }

    /// Scores every genotype, returning a fitness vector index-aligned
    /// with `population`, and updates the best-ever record.
    ///
    /// Serial mode propagates the first evaluation error; parallel mode
    /// converts per-task failures into [`FAILED_FITNESS`] and always
    /// completes the batch.
    pub fn evaluate(&mut self, population: &[E::Genotype]) -> Result<Vec<f64>, EvolutionError> {
        let fitness = match self.pool.take() {
            None => self.evaluate_serial(population)?,
            Some(pool) => {
                let fitness = self.evaluate_parallel(&pool, population);
                self.pool = Some(pool);
                fitness
            }
        };
        self.update_best(population, &fitness);
        Ok(fitness)
    }

    fn evaluate_serial(
        &mut self,
        population: &[E::Genotype],
    ) -> Result<Vec<f64>, EvolutionError> {
        let scorer = &mut self.workers[0];
        let mut fitness = Vec::with_capacity(population.len());
        for (index, genotype) in population.iter().enumerate() {
            let value = scorer
                .evaluate(genotype)
                .map_err(|source| EvolutionError::Evaluation { index, source })?;
            fitness.push(value);
        }
        Ok(fitness)
    }

    fn evaluate_parallel(
        &mut self,
        pool: &rayon::ThreadPool,
        population: &[E::Genotype],
    ) -> Vec<f64> {
        let bank = Mutex::new(std::mem::take(&mut self.workers));

        let fitness: Vec<f64> = pool.install(|| {
            (0..population.len())
                .into_par_iter()
                .map(|i| {
                    let mut scorer = bank
                        .lock()
                        .expect("fitness bank lock poisoned")
                        .pop()
                        .expect("fitness bank exhausted");
                    let value = match scorer.evaluate(&population[i]) {
                        Ok(v) => v,
                        Err(e) => {
                            warn!(index = i, error = %e, "fitness evaluation failed, assigning sentinel");
                            FAILED_FITNESS
                        }
                    };
                    bank.lock().expect("fitness bank lock poisoned").push(scorer);
                    value
                })
                .collect()
        });

        self.workers = bank.into_inner().expect("fitness bank lock poisoned");
        fitness
    }

    /// Merges a generation's results into the best-ever record.
    ///
    /// Uses `>=` so that among equal-fitness candidates the most recently
    /// evaluated genotype wins, matching serial evaluation order.
    fn update_best(&mut self, population: &[E::Genotype], fitness: &[f64]) {
        for (genotype, &value) in population.iter().zip(fitness) {
            let improved = match &self.best {
                None => true,
                Some((best, _)) => value >= *best,
            };
            if improved {
                self.best = Some((value, genotype.clone()));
            }
        }
    }

    /// Highest fitness observed so far, if any generation has been
    /// evaluated. Monotonically non-decreasing.
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|(f, _)| *f)
    }

    /// The genotype that achieved [`best_fitness`](Self::best_fitness).
    pub fn best_genotype(&self) -> Option<&E::Genotype> {
        self.best.as_ref().map(|(_, g)| g)
    }

    /// Overwrites the best-ever record, used when restoring persisted
    /// state.
    pub(crate) fn restore_best(&mut self, fitness: f64, genotype: E::Genotype) {
        self.best = Some((fitness, genotype));
    }
}
