//! Binary persistence of the full evolutionary state.
//!
//! The persisted file is a sequential record stream with big-endian
//! scalars:
//!
//! ```text
//! [i32 generation][best genotype][f64 best fitness]
//! [genotype 0] .. [genotype N-1][f64 fitness 0] .. [f64 fitness N-1]
//! ```
//!
//! Genotype records are opaque: each genotype streams its own internal
//! state via [`Genotype::save`]/[`Genotype::load`]. Restoring therefore
//! rebuilds each genotype through the environment's random factory first
//! and then overwrites its state from the stream.
//!
//! A missing file at startup is not an error — the engine logs a notice
//! and starts from a fresh random population.

use crate::error::EvolutionError;
use crate::types::{Environment, Genotype};
use rand::Rng;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Complete engine state as written to and read from disk.
#[derive(Debug, Clone)]
pub struct PersistedState<G> {
    /// Generation counter at the time of persistence.
    pub generation: u32,

    /// Highest fitness ever observed.
    pub best_fitness: f64,

    /// The genotype that achieved `best_fitness`.
    pub best: G,

    /// The full population, in index order.
    pub population: Vec<G>,

    /// The fitness vector of the persisted generation, index-aligned
    /// with `population`.
    pub fitness: Vec<f64>,
}

/// Reads and writes [`PersistedState`] at a fixed filesystem path.
#[derive(Debug, Clone)]
pub struct PersistenceStore {
    path: PathBuf,
}

impl PersistenceStore {
    /// Creates a store over `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the full state, truncating any previous file.
    pub fn save<G: Genotype>(&self, state: &PersistedState<G>) -> Result<(), EvolutionError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);

        writer.write_all(&(state.generation as i32).to_be_bytes())?;
        state.best.save(&mut writer)?;
        writer.write_all(&state.best_fitness.to_be_bytes())?;
        for genotype in &state.population {
            genotype.save(&mut writer)?;
        }
        for &fitness in &state.fitness {
            writer.write_all(&fitness.to_be_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads back a state persisted by [`save`](Self::save).
    ///
    /// Genotypes are reconstructed via `env`'s random factory and then
    /// overwritten from the stream. Returns `Ok(None)` when no file
    /// exists at the store's path.
    pub fn load<E: Environment, R: Rng>(
        &self,
        env: &E,
        population_size: usize,
        rng: &mut R,
    ) -> Result<Option<PersistedState<E::Genotype>>, EvolutionError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no persisted state found, starting fresh");
            return Ok(None);
        }

        let mut reader = BufReader::new(File::open(&self.path)?);

        let generation = read_i32(&mut reader)? as u32;

        let mut best = env.random_genotype(rng);
        best.load(&mut reader)?;
        let best_fitness = read_f64(&mut reader)?;

        let mut population = Vec::with_capacity(population_size);
        for _ in 0..population_size {
            let mut genotype = env.random_genotype(rng);
            genotype.load(&mut reader)?;
            population.push(genotype);
        }

        let mut fitness = Vec::with_capacity(population_size);
        for _ in 0..population_size {
            fitness.push(read_f64(&mut reader)?);
        }

        Ok(Some(PersistedState {
            generation,
            best_fitness,
            best,
            population,
            fitness,
        }))
    }
}

fn read_i32<R: Read>(reader: &mut R) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> std::io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}
