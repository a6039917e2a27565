//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use aprender_testgen::prelude::*;
//! ```

pub use crate::config::{SearchConfig, SelectionKind, StoppingConditionKind};
pub use crate::error::{Result, TestGenError};
pub use crate::ga::{
    BranchDistanceTestCaseFitness, BranchDistanceTestSuiteFitness, Chromosome, ChromosomeFactory,
    CrossOverFunction, FitnessFunction, FitnessValues, RankSelection, SelectionFunction,
    SinglePointRelativeCrossOver, TestCaseChromosome, TestCaseChromosomeFactory,
    TestSuiteChromosome, TestSuiteChromosomeFactory, TournamentSelection,
};
pub use crate::generation::{GenerationalSearch, SearchResult, StoppingCondition, TerminationReason};
pub use crate::testcase::{
    ExecutionResult, RandomLengthTestCaseFactory, Statement, TestCase, TestCaseExecutor,
    TestCaseFactory, TestFactory,
};
