//! Bounded per-generation fitness history.
//!
//! The engine records a sorted snapshot of every generation's fitness
//! values, keeping only the most recent window. The buffer sits behind
//! its own lock so an external observer (a UI, a monitor thread) can read
//! it while the generation loop writes — it shares nothing with the
//! evaluation lock.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Shared, bounded map from generation number to that generation's
/// sorted fitness values.
///
/// Cloning is cheap and yields a handle to the same buffer.
#[derive(Debug, Clone)]
pub struct FitnessHistory {
    inner: Arc<Mutex<BTreeMap<u32, Vec<f64>>>>,
    window: usize,
}

impl FitnessHistory {
    /// Creates a history keeping the last `window` generations.
    pub fn new(window: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BTreeMap::new())),
            window,
        }
    }

    /// Records a generation's fitness values as a sorted snapshot,
    /// pruning entries older than the window.
    pub fn record(&self, generation: u32, fitness: &[f64]) {
        let mut snapshot = fitness.to_vec();
        snapshot.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut map = self.inner.lock().expect("history lock poisoned");
        map.insert(generation, snapshot);
        while map.len() > self.window {
            map.pop_first();
        }
    }

    /// The sorted fitness snapshot of `generation`, if still in the
    /// window.
    pub fn snapshot(&self, generation: u32) -> Option<Vec<f64>> {
        self.inner
            .lock()
            .expect("history lock poisoned")
            .get(&generation)
            .cloned()
    }

    /// Generation numbers currently held, oldest first.
    pub fn generations(&self) -> Vec<u32> {
        self.inner
            .lock()
            .expect("history lock poisoned")
            .keys()
            .copied()
            .collect()
    }

    /// The most recent snapshot, if any.
    pub fn latest(&self) -> Option<(u32, Vec<f64>)> {
        self.inner
            .lock()
            .expect("history lock poisoned")
            .iter()
            .next_back()
            .map(|(g, snapshot)| (*g, snapshot.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_sorted() {
        let history = FitnessHistory::new(10);
        history.record(0, &[3.0, 1.0, 2.0]);
        assert_eq!(history.snapshot(0), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_window_prunes_oldest() {
        let history = FitnessHistory::new(3);
        for generation in 0..5 {
            history.record(generation, &[generation as f64]);
        }
        assert_eq!(history.generations(), vec![2, 3, 4]);
        assert_eq!(history.snapshot(0), None);
        assert_eq!(history.snapshot(4), Some(vec![4.0]));
    }

    #[test]
    fn test_latest() {
        let history = FitnessHistory::new(5);
        assert!(history.latest().is_none());
        history.record(3, &[2.0, 1.0]);
        history.record(4, &[5.0]);
        assert_eq!(history.latest(), Some((4, vec![5.0])));
    }

    #[test]
    fn test_concurrent_reader() {
        let history = FitnessHistory::new(100);
        let reader = history.clone();

        let handle = std::thread::spawn(move || {
            let mut seen = 0usize;
            for _ in 0..1000 {
                seen = seen.max(reader.generations().len());
            }
            seen
        });

        for generation in 0..50 {
            history.record(generation, &[1.0, 2.0]);
        }
        let seen = handle.join().expect("reader thread");
        assert!(seen <= 50);
        assert_eq!(history.generations().len(), 50);
    }
}
