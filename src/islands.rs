//! Island-model population partitioning and migration.
//!
//! The global population is split across the nodes of an immutable
//! [`IslandTopology`]; each node ("island") evolves semi-independently
//! with the same reproduction algorithm as the panmictic case, and on a
//! configurable period a fraction of each island's fittest members
//! migrates to a uniformly chosen neighboring island.
//!
//! Nodes live in an arena addressed by integer id with adjacency stored
//! as index lists, so membership is just a `global index → node id` map.
//! Island working structures are rebuilt every generation from that map;
//! a migrating member's source slot is nulled (not compacted) and an
//! arrival fills the first null slot of its destination, or appends.
//! Reproduced individuals are written back at the global index recorded
//! when the island was bucketed, so total population size is invariant.

use crate::reproduction::ReproductionEngine;
use crate::types::Genotype;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable island adjacency graph.
///
/// One node per island; `adjacency[id]` lists the ids reachable from
/// `id` as migration destinations. Constructed once at initialization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IslandTopology {
    adjacency: Vec<Vec<usize>>,
}

impl IslandTopology {
    /// Builds a topology from explicit adjacency lists.
    pub fn from_adjacency(adjacency: Vec<Vec<usize>>) -> Self {
        Self { adjacency }
    }

    /// A non-wrapping `rows × cols` grid with Moore 8-neighborhood:
    /// every cell is adjacent to its horizontal, vertical, and diagonal
    /// neighbors. Corners have 3 neighbors, edges 5, interior cells 8.
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut adjacency = vec![Vec::new(); rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                let id = r * cols + c;
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let (nr, nc) = (r as i64 + dr, c as i64 + dc);
                        if nr >= 0 && nr < rows as i64 && nc >= 0 && nc < cols as i64 {
                            adjacency[id].push(nr as usize * cols + nc as usize);
                        }
                    }
                }
            }
        }
        Self { adjacency }
    }

    /// A ring: each island is adjacent to its predecessor and successor.
    pub fn ring(n: usize) -> Self {
        let adjacency = (0..n)
            .map(|i| {
                let mut neighbors = vec![(i + n - 1) % n, (i + 1) % n];
                neighbors.sort_unstable();
                neighbors.dedup();
                neighbors.retain(|&j| j != i);
                neighbors
            })
            .collect();
        Self { adjacency }
    }

    /// Every island adjacent to every other.
    pub fn fully_connected(n: usize) -> Self {
        let adjacency = (0..n)
            .map(|i| (0..n).filter(|&j| j != i).collect())
            .collect();
        Self { adjacency }
    }

    /// Number of islands.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Migration destinations reachable from `id`.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.adjacency[id]
    }
}

/// One island member: a genotype, the global population index it holds,
/// and its fitness this generation.
#[derive(Debug, Clone)]
struct Member<G> {
    genotype: G,
    global_index: usize,
    fitness: f64,
}

/// Working structure for one island, rebuilt every generation. Slots are
/// nulled when a member emigrates and refilled by arrivals.
type IslandSlots<G> = Vec<Option<Member<G>>>;

/// Splits the population across islands, migrates, and reproduces each
/// island independently.
#[derive(Debug, Clone)]
pub struct IslandPartitioner {
    topology: IslandTopology,
    migration_frequency: u32,
    migration_fraction: f64,
}

impl IslandPartitioner {
    /// Creates a partitioner over `topology`.
    pub fn new(topology: IslandTopology, migration_frequency: u32, migration_fraction: f64) -> Self {
        Self {
            topology,
            migration_frequency,
            migration_fraction,
        }
    }

    /// The topology this partitioner distributes over.
    pub fn topology(&self) -> &IslandTopology {
        &self.topology
    }

    /// Random initial island assignment for every global index.
    pub fn random_membership<R: Rng>(&self, population_size: usize, rng: &mut R) -> Vec<usize> {
        let nodes = self.topology.node_count();
        (0..population_size)
            .map(|_| rng.random_range(0..nodes))
            .collect()
    }

    /// Produces the next global generation.
    ///
    /// Buckets the population by `membership`, migrates if `generation`
    /// is divisible by the migration frequency, runs `reproduction` on
    /// each island's surviving member set, and reassembles the global
    /// array by original global index. `membership` is updated in place
    /// for every migrated individual.
    pub fn next_generation<G: Genotype, R: Rng>(
        &self,
        reproduction: &ReproductionEngine,
        population: &[G],
        fitness: &[f64],
        membership: &mut [usize],
        generation: u32,
        rng: &mut R,
    ) -> Vec<G> {
        debug_assert_eq!(population.len(), fitness.len());
        debug_assert_eq!(population.len(), membership.len());

        let mut islands: Vec<IslandSlots<G>> = vec![Vec::new(); self.topology.node_count()];
        for (i, genotype) in population.iter().enumerate() {
            islands[membership[i]].push(Some(Member {
                genotype: genotype.clone(),
                global_index: i,
                fitness: fitness[i],
            }));
        }

        if generation % self.migration_frequency == 0 {
            self.migrate(&mut islands, membership, rng);
        }

        let mut next: Vec<Option<G>> = (0..population.len()).map(|_| None).collect();
        for slots in islands {
            let members: Vec<Member<G>> = slots.into_iter().flatten().collect();
            if members.len() < 2 {
                // Too small to select a pair; carry members through.
                for member in members {
                    next[member.global_index] = Some(member.genotype);
                }
                continue;
            }

            let local_population: Vec<G> =
                members.iter().map(|m| m.genotype.clone()).collect();
            let mut local_fitness: Vec<f64> = members.iter().map(|m| m.fitness).collect();
            let offspring =
                reproduction.next_generation(&local_population, &mut local_fitness, rng);
            for (member, child) in members.iter().zip(offspring) {
                next[member.global_index] = Some(child);
            }
        }

        next.into_iter()
            .map(|slot| slot.expect("every global index is produced by exactly one island"))
            .collect()
    }

    /// Moves the top `floor(size · migration_fraction)` members of each
    /// island to a uniformly chosen neighbor. Migrant selection for all
    /// islands happens before any arrival is applied.
    fn migrate<G: Genotype, R: Rng>(
        &self,
        islands: &mut [IslandSlots<G>],
        membership: &mut [usize],
        rng: &mut R,
    ) {
        let mut inbound: Vec<Vec<Member<G>>> = vec![Vec::new(); islands.len()];

        for (id, slots) in islands.iter_mut().enumerate() {
            let neighbors = self.topology.neighbors(id);
            if neighbors.is_empty() {
                continue;
            }

            let mut order: Vec<usize> = (0..slots.len()).collect();
            order.sort_by(|&a, &b| {
                let fa = slots[a].as_ref().map(|m| m.fitness).unwrap_or(f64::NEG_INFINITY);
                let fb = slots[b].as_ref().map(|m| m.fitness).unwrap_or(f64::NEG_INFINITY);
                fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
            });

            let count = (slots.len() as f64 * self.migration_fraction) as usize;
            for &slot in order.iter().take(count) {
                if let Some(member) = slots[slot].take() {
                    let destination = neighbors[rng.random_range(0..neighbors.len())];
                    inbound[destination].push(member);
                }
            }
        }

        for (destination, arrivals) in inbound.into_iter().enumerate() {
            for member in arrivals {
                membership[member.global_index] = destination;
                let slots = &mut islands[destination];
                match slots.iter_mut().find(|s| s.is_none()) {
                    Some(empty) => *empty = Some(member),
                    None => slots.push(Some(member)),
                }
            }
        }
    }
}
