//! Evolutionary engine: chromosomes, fitness and genetic operators.
//!
//! # Chromosome Variants
//!
//! - [`TestCaseChromosome`] - one test case, varied statement by statement
//! - [`TestSuiteChromosome`] - a suite of test case chromosomes
//!
//! Both implement [`Chromosome`], which carries the change flag and the
//! memoized fitness. Concrete operators are generic over the trait.
//!
//! # Operators
//!
//! - [`RankSelection`], [`TournamentSelection`] - parent selection
//! - [`SinglePointRelativeCrossOver`] - crossover at one relative split point
//! - [`Chromosome::mutate`] - variant specific mutation
//!
//! # Example
//!
//! ```
//! use aprender_testgen::ga::{compare_fitness, RankSelection};
//! use std::cmp::Ordering;
//!
//! // Minimising: the lower fitness ranks first, unevaluated ranks last.
//! assert_eq!(compare_fitness(Some(1.0), Some(3.0), false), Ordering::Less);
//! assert_eq!(compare_fitness(None, Some(3.0), false), Ordering::Greater);
//!
//! let selection = RankSelection::new().with_rank_bias(1.5);
//! assert!((selection.rank_bias() - 1.5).abs() < 1e-12);
//! ```

mod chromosome;
mod chromosome_factory;
pub mod fitness;
pub mod operators;
mod testcase_chromosome;
mod testsuite_chromosome;

#[cfg(test)]
pub(crate) mod fixtures;

pub use chromosome::{Chromosome, ChromosomeState};
pub use chromosome_factory::{ChromosomeFactory, TestCaseChromosomeFactory, TestSuiteChromosomeFactory};
pub use fitness::{
    BranchDistanceTestCaseFitness, BranchDistanceTestSuiteFitness, FitnessFunction, FitnessValues,
};
pub use operators::{
    compare_fitness, ranked_indices, selection_from_config, CrossOverFunction, RankSelection,
    SelectionFunction, SinglePointRelativeCrossOver, TournamentSelection,
};
pub use testcase_chromosome::TestCaseChromosome;
pub use testsuite_chromosome::TestSuiteChromosome;
