//! Next-generation production: elitist survival, roulette-wheel
//! selection, single-point crossover, positional mutation.
//!
//! [`ReproductionEngine`] is stateless beyond its parameters: given a
//! population slice and its fitness vector it produces a same-sized next
//! generation. The island partitioner reuses it unchanged on per-island
//! sub-populations.

use crate::scaling::{descending_order, ScalingPolicy};
use crate::types::Genotype;
use rand::Rng;

/// Produces the next generation from a population and its fitness vector.
#[derive(Debug, Clone)]
pub struct ReproductionEngine {
    /// Probability of a real crossover point for each selected pair.
    pub p_crossover: f64,

    /// Per-gene mutation probability.
    pub p_mutation: f64,

    /// Fraction of the population carried over unchanged.
    pub survival_fraction: f64,

    /// Scaling applied to the fitness vector before selection.
    pub scaling: ScalingPolicy,
}

impl ReproductionEngine {
    /// Indices of the individuals that survive unchanged.
    ///
    /// The count is `floor(n · survival_fraction)` rounded down to the
    /// nearest even number; survivors are the highest raw-fitness
    /// individuals, ties broken by the lower original index.
    pub fn survivor_indices(&self, fitness: &[f64]) -> Vec<usize> {
        if self.survival_fraction <= 0.0 {
            return Vec::new();
        }
        let n = fitness.len();
        let mut k = (n as f64 * self.survival_fraction) as usize;
        k -= k % 2;
        let mut order = descending_order(fitness);
        order.truncate(k);
        order
    }

    /// Produces the next generation.
    ///
    /// `fitness` is index-aligned with `population` and is overwritten in
    /// place by scaling; survivors are chosen from the raw values first.
    /// The returned vector has exactly `population.len()` entries.
    ///
    /// # Panics
    /// Panics if `population` is empty or its length differs from
    /// `fitness`.
    pub fn next_generation<G: Genotype, R: Rng>(
        &self,
        population: &[G],
        fitness: &mut [f64],
        rng: &mut R,
    ) -> Vec<G> {
        let n = population.len();
        assert!(n > 0, "cannot reproduce an empty population");
        assert_eq!(n, fitness.len(), "fitness vector must match population");

        let survivors = self.survivor_indices(fitness);
        self.scaling.scale(fitness);

        let mut next: Vec<G> = Vec::with_capacity(n);
        for &idx in &survivors {
            next.push(population[idx].clone());
        }

        // Remaining slots fill in consecutive pairs; an odd final slot
        // keeps only the first offspring of its pair.
        while next.len() < n {
            let p1 = roulette(fitness, rng);
            let p2 = roulette(fitness, rng);

            let (c1, c2) = self.cross_pair(&population[p1], &population[p2], rng);
            next.push(c1);
            if next.len() < n {
                next.push(c2);
            }
        }
        next
    }

    /// Crossover + mutation for one selected pair.
    fn cross_pair<G: Genotype, R: Rng>(&self, p1: &G, p2: &G, rng: &mut R) -> (G, G) {
        let len = p1.len();
        // Position == len means no mixing; both offspring are straight
        // copies of their parents, but still go through the crossover call.
        let position = if len > 0 && rng.random_range(0.0..1.0) < self.p_crossover {
            rng.random_range(0..len)
        } else {
            len
        };

        let (mut c1, mut c2) = p1.crossover(p2, position);
        self.mutate_genes(&mut c1, rng);
        self.mutate_genes(&mut c2, rng);
        (c1, c2)
    }

    fn mutate_genes<G: Genotype, R: Rng>(&self, genotype: &mut G, rng: &mut R) {
        if self.p_mutation <= 0.0 {
            return;
        }
        for position in 0..genotype.len() {
            if rng.random_range(0.0..1.0) < self.p_mutation {
                genotype.mutate(position, rng);
            }
        }
    }
}

/// Roulette-wheel selection over a (scaled) fitness vector.
///
/// Draws uniformly in `[0, sum)` and walks the population in index order,
/// selecting the index at which the running sum first exceeds the draw.
/// A non-positive total falls back to a uniform draw.
pub fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    let total: f64 = fitness.iter().sum();
    if total <= 0.0 {
        return rng.random_range(0..n);
    }

    let draw = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &f) in fitness.iter().enumerate() {
        cumulative += f;
        if cumulative > draw {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Debug, PartialEq)]
    struct ByteString {
        genes: Vec<u8>,
    }

    impl ByteString {
        fn of(genes: &[u8]) -> Self {
            Self {
                genes: genes.to_vec(),
            }
        }
    }

    impl Genotype for ByteString {
        fn len(&self) -> usize {
            self.genes.len()
        }

        fn crossover(&self, other: &Self, position: usize) -> (Self, Self) {
            let mut c1 = self.clone();
            let mut c2 = other.clone();
            for i in position..self.genes.len() {
                c1.genes[i] = other.genes[i];
                c2.genes[i] = self.genes[i];
            }
            (c1, c2)
        }

        fn mutate<R: Rng>(&mut self, position: usize, rng: &mut R) {
            self.genes[position] = rng.random_range(0..=255u32) as u8;
        }

        fn save<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
            writer.write_all(&self.genes)
        }

        fn load<R: std::io::Read>(&mut self, reader: &mut R) -> std::io::Result<()> {
            reader.read_exact(&mut self.genes)
        }
    }

    fn engine(p_crossover: f64, p_mutation: f64, survival: f64) -> ReproductionEngine {
        ReproductionEngine {
            p_crossover,
            p_mutation,
            survival_fraction: survival,
            scaling: ScalingPolicy::None,
        }
    }

    #[test]
    fn test_survivor_count_is_even() {
        let e = engine(0.9, 0.01, 0.5);
        // 5 * 0.5 = 2.5 -> floor 2, already even
        assert_eq!(e.survivor_indices(&[1.0, 2.0, 3.0, 4.0, 5.0]).len(), 2);
        // 6 * 0.5 = 3 -> rounded down to 2
        let e6 = engine(0.9, 0.01, 0.5);
        assert_eq!(
            e6.survivor_indices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).len(),
            2
        );
    }

    #[test]
    fn test_survivors_are_fittest() {
        let e = engine(0.9, 0.01, 0.5);
        let survivors = e.survivor_indices(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(survivors, vec![3, 2]);
    }

    #[test]
    fn test_survivor_tie_breaks_to_lower_index() {
        let e = engine(0.9, 0.01, 0.5);
        let survivors = e.survivor_indices(&[5.0, 5.0, 5.0, 5.0]);
        assert_eq!(survivors, vec![0, 1]);
    }

    #[test]
    fn test_no_survivors_when_fraction_zero() {
        let e = engine(0.9, 0.01, 0.0);
        assert!(e.survivor_indices(&[1.0, 2.0, 3.0]).is_empty());
    }

    #[test]
    fn test_next_generation_preserves_size() {
        let mut rng = StdRng::seed_from_u64(42);
        let population: Vec<ByteString> = (0..7)
            .map(|i| ByteString::of(&[i as u8; 6]))
            .collect();
        let mut fitness: Vec<f64> = (1..=7).map(|i| i as f64).collect();

        let e = engine(0.9, 0.05, 0.3);
        let next = e.next_generation(&population, &mut fitness, &mut rng);
        assert_eq!(next.len(), 7);
    }

    #[test]
    fn test_worked_example_survivors_lead() {
        // Population 4, pC=1.0, pM=0.0, fitness [1,2,3,4], survival 0.5:
        // the two fittest (indices 3 and 2) are copied verbatim first.
        let mut rng = StdRng::seed_from_u64(7);
        let population = vec![
            ByteString::of(&[0, 0]),
            ByteString::of(&[1, 1]),
            ByteString::of(&[2, 2]),
            ByteString::of(&[3, 3]),
        ];
        let mut fitness = vec![1.0, 2.0, 3.0, 4.0];

        let e = engine(1.0, 0.0, 0.5);
        let next = e.next_generation(&population, &mut fitness, &mut rng);

        assert_eq!(next.len(), 4);
        assert_eq!(next[0], ByteString::of(&[3, 3]));
        assert_eq!(next[1], ByteString::of(&[2, 2]));
        // Remaining slots are crossover products of [0,0]/[1,1]/[2,2]/[3,3],
        // so every gene pair stays uniform per position-source parent.
        for child in &next[2..] {
            assert_eq!(child.genes.len(), 2);
        }
    }

    #[test]
    fn test_no_crossover_no_mutation_copies_parents() {
        let mut rng = StdRng::seed_from_u64(3);
        let population = vec![ByteString::of(&[9, 9, 9]), ByteString::of(&[4, 4, 4])];
        let mut fitness = vec![1.0, 1.0];

        let e = engine(0.0, 0.0, 0.0);
        let next = e.next_generation(&population, &mut fitness, &mut rng);
        for child in &next {
            assert!(
                child == &population[0] || child == &population[1],
                "offspring must be a verbatim parent copy, got {child:?}"
            );
        }
    }

    #[test]
    fn test_roulette_frequencies() {
        let fitness = vec![1.0, 2.0, 3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(42);

        let n = 100_000;
        let mut counts = [0u32; 4];
        for _ in 0..n {
            counts[roulette(&fitness, &mut rng)] += 1;
        }

        let total: f64 = fitness.iter().sum();
        for (i, &c) in counts.iter().enumerate() {
            let expected = fitness[i] / total;
            let observed = c as f64 / n as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "index {i}: expected {expected:.3}, observed {observed:.3}"
            );
        }
    }

    #[test]
    fn test_roulette_uniform_fallback_on_zero_total() {
        let fitness = vec![0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 3];
        for _ in 0..9000 {
            counts[roulette(&fitness, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2500, "expected roughly uniform, got {counts:?}");
        }
    }

    #[test]
    fn test_roulette_never_selects_zero_weight() {
        let fitness = vec![0.0, 1.0, 0.0];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(roulette(&fitness, &mut rng), 1);
        }
    }
}
