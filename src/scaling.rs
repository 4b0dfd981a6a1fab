//! Fitness scaling policies.
//!
//! Scaling rewrites the raw fitness vector in place before roulette
//! selection, controlling selection pressure independently of the raw
//! fitness landscape.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 4 (scaling mechanisms)
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fitness-scaling policy applied before selection.
///
/// All policies assume **maximization** (higher fitness = better).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalingPolicy {
    /// No scaling: selection probability is directly proportional to raw
    /// fitness.
    None,

    /// Rank scaling: individuals ordered by descending fitness, rank `r`
    /// (0 = fittest) receives the value `1/sqrt(1 + r)`.
    ///
    /// Decouples selection pressure from the raw fitness spread, so a
    /// single super-individual cannot dominate the wheel.
    Rank,

    /// Truncation scaling: the fittest `floor(n · p)` individuals receive
    /// 1.0, all others 0.0 — uniform selection among the elite.
    Top(f64),

    /// Declared upstream but with no scaling behavior; currently
    /// equivalent to [`ScalingPolicy::None`]. Do not rely on it acquiring
    /// semantics.
    LinearShift,
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        ScalingPolicy::None
    }
}

impl ScalingPolicy {
    /// Rewrites `fitness` in place according to the policy.
    pub fn scale(&self, fitness: &mut [f64]) {
        match self {
            ScalingPolicy::None | ScalingPolicy::LinearShift => {}
            ScalingPolicy::Rank => rank_scale(fitness),
            ScalingPolicy::Top(p) => top_scale(fitness, *p),
        }
    }
}

/// Indices of `fitness` ordered by descending value, ties broken by the
/// lower original index (stable sort on a descending comparator).
pub(crate) fn descending_order(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

fn rank_scale(fitness: &mut [f64]) {
    let order = descending_order(fitness);
    for (rank, &idx) in order.iter().enumerate() {
        fitness[idx] = 1.0 / (1.0 + rank as f64).sqrt();
    }
}

fn top_scale(fitness: &mut [f64], p: f64) {
    let n = fitness.len();
    let elite = (n as f64 * p) as usize;
    let order = descending_order(fitness);
    for (rank, &idx) in order.iter().enumerate() {
        fitness[idx] = if rank < elite { 1.0 } else { 0.0 };
    }
}
