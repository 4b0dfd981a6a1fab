//! Criterion benchmarks for the evolutionary engine.
//!
//! Uses a synthetic OneMax problem (maximize set bits) to measure pure
//! engine overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evo_engine::{
    Environment, EvalError, Evolution, EvolutionConfig, FitnessFunction, Genotype,
    IslandTopology, ScalingPolicy,
};
use rand::Rng;

// ===========================================================================
// OneMax: maximize the number of set bits
// ===========================================================================

#[derive(Clone)]
struct BitString {
    bits: Vec<bool>,
}

impl Genotype for BitString {
    fn len(&self) -> usize {
        self.bits.len()
    }

    fn crossover(&self, other: &Self, position: usize) -> (Self, Self) {
        let mut c1 = self.clone();
        let mut c2 = other.clone();
        for i in position..self.bits.len() {
            c1.bits[i] = other.bits[i];
            c2.bits[i] = self.bits[i];
        }
        (c1, c2)
    }

    fn mutate<R: Rng>(&mut self, position: usize, rng: &mut R) {
        self.bits[position] = rng.random_bool(0.5);
    }

    fn save<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let bytes: Vec<u8> = self.bits.iter().map(|&b| b as u8).collect();
        writer.write_all(&bytes)
    }

    fn load<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
        let mut bytes = vec![0u8; self.bits.len()];
        reader.read_exact(&mut bytes)?;
        self.bits = bytes.into_iter().map(|b| b != 0).collect();
        Ok(())
    }
}

struct OneMax;

impl FitnessFunction<BitString> for OneMax {
    fn evaluate(&mut self, genotype: &BitString) -> Result<f64, EvalError> {
        Ok(genotype.bits.iter().filter(|&&b| b).count() as f64)
    }
}

struct OneMaxEnv {
    genes: usize,
}

impl Environment for OneMaxEnv {
    type Genotype = BitString;
    type Fitness = OneMax;

    fn random_genotype<R: Rng>(&self, rng: &mut R) -> BitString {
        BitString {
            bits: (0..self.genes).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    fn fitness_function(&self) -> OneMax {
        OneMax
    }
}

fn bench_panmictic(c: &mut Criterion) {
    let mut group = c.benchmark_group("panmictic_generation");
    for &size in &[50usize, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let config = EvolutionConfig::default()
                .with_population_size(size)
                .with_p_mutation(0.01)
                .with_scaling(ScalingPolicy::Rank)
                .with_survival_fraction(0.1)
                .with_seed(42);
            let mut evolution =
                Evolution::new(OneMaxEnv { genes: 64 }, config).expect("engine");
            b.iter(|| {
                evolution.advance_generation().expect("generation");
                black_box(evolution.best_fitness());
            });
        });
    }
    group.finish();
}

fn bench_islands(c: &mut Criterion) {
    c.bench_function("island_generation_3x3_grid", |b| {
        let config = EvolutionConfig::default()
            .with_population_size(180)
            .with_p_mutation(0.01)
            .with_islands(IslandTopology::grid(3, 3), 5, 0.1)
            .with_seed(42);
        let mut evolution =
            Evolution::new(OneMaxEnv { genes: 64 }, config).expect("engine");
        b.iter(|| {
            evolution.advance_generation().expect("generation");
            black_box(evolution.best_fitness());
        });
    });
}

fn bench_parallel_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_threads");
    for &threads in &[1usize, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                let config = EvolutionConfig::default()
                    .with_population_size(200)
                    .with_threads(threads)
                    .with_seed(42);
                let mut evolution =
                    Evolution::new(OneMaxEnv { genes: 256 }, config).expect("engine");
                b.iter(|| {
                    evolution.advance_generation().expect("generation");
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_panmictic,
    bench_islands,
    bench_parallel_evaluation
);
criterion_main!(benches);
