//! Fitness values and the fitness function contract.
//!
//! A [`FitnessFunction`] scores one chromosome against the program under
//! test, usually by running it through an executor bound at construction.
//! The engine caches the result on the chromosome (see
//! [`Chromosome::evaluate`](crate::ga::Chromosome::evaluate)) and only asks
//! again once the content changed.
//!
//! # Example
//!
//! ```
//! use aprender_testgen::ga::FitnessValues;
//!
//! assert!(FitnessValues::new(3.5, 0.25).validate().is_empty());
//! assert_eq!(FitnessValues::new(-1.0, 0.5).validate().len(), 1);
//! assert_eq!(FitnessValues::new(f64::NAN, 1.5).validate().len(), 2);
//! ```

mod branch_distance;
mod utilities;

pub use branch_distance::{BranchDistanceTestCaseFitness, BranchDistanceTestSuiteFitness};
pub use utilities::{
    analyze_results, compute_branch_coverage, compute_branch_distance_fitness, normalise,
};

use serde::{Deserialize, Serialize};

/// Fitness scalar and coverage fraction of one evaluation.
///
/// Construction does not check anything; [`FitnessValues::validate`] does,
/// so callers can decide what to do with bad values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessValues {
    /// Fitness, finite and non-negative when valid
    pub fitness: f64,
    /// Coverage, finite and within [0, 1] when valid
    pub coverage: f64,
}

impl FitnessValues {
    /// Pair a fitness with a coverage value
    pub fn new(fitness: f64, coverage: f64) -> Self {
        Self { fitness, coverage }
    }

    /// Describe every constraint these values violate.
    ///
    /// An empty list means the values are valid.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if !self.fitness.is_finite() || self.fitness < 0.0 {
            violations.push(format!("Invalid value of fitness: {}", self.fitness));
        }
        if !self.coverage.is_finite() || !(0.0..=1.0).contains(&self.coverage) {
            violations.push(format!("Invalid value for coverage: {}", self.coverage));
        }
        violations
    }
}

/// Computes fitness values for chromosomes of type `C`.
pub trait FitnessFunction<C> {
    /// Score one individual.
    ///
    /// Implementations may record execution results on the individual, but
    /// must leave its change flag to the caller.
    fn compute_fitness_values(&self, individual: &mut C) -> FitnessValues;

    /// Do we need to maximise or minimise this function?
    fn is_maximisation_function(&self) -> bool;
}
