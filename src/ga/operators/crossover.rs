//! Crossover between two parents.

use std::fmt;

use rand::{Rng, RngCore};

use crate::config::SearchConfig;
use crate::ga::chromosome::Chromosome;

/// Recombines two parents in place.
pub trait CrossOverFunction<C: Chromosome>: fmt::Debug + Send + Sync {
    /// Replace both parents with their offspring.
    fn cross_over(&self, parent1: &mut C, parent2: &mut C, config: &SearchConfig, rng: &mut dyn RngCore);
}

/// Single point crossover with one relative split point for both parents.
///
/// A split `s ~ U(0, 1)` maps to `floor((size - 1) * s) + 1` in each
/// parent, so both offspring keep at least one element of their own parent.
/// Parents with fewer than two elements are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinglePointRelativeCrossOver;

impl SinglePointRelativeCrossOver {
    /// Create the operator
    pub fn new() -> Self {
        Self
    }
}

fn split_position(size: usize, split_point: f64) -> usize {
    ((size - 1) as f64 * split_point).floor() as usize + 1
}

impl<C: Chromosome> CrossOverFunction<C> for SinglePointRelativeCrossOver {
    fn cross_over(&self, parent1: &mut C, parent2: &mut C, config: &SearchConfig, rng: &mut dyn RngCore) {
        if parent1.size() < 2 || parent2.size() < 2 {
            return;
        }

        let split_point: f64 = rng.gen();
        let position1 = split_position(parent1.size(), split_point);
        let position2 = split_position(parent2.size(), split_point);
        let clone1 = parent1.clone();

        parent1.cross_over(parent2, position1, position2, config, rng);
        parent2.cross_over(&clone1, position2, position1, config, rng);
    }
}
