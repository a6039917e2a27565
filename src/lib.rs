//! Aprender TestGen: search-based unit test generation in pure Rust.
//!
//! Test cases are evolved with a genetic algorithm towards higher branch
//! coverage of a program under test. The crate provides the engine: the
//! chromosome abstraction and its genetic operators, the fitness contract,
//! parent selection, stopping conditions and the generational loop tying them
//! together. Statements, the test factory that edits them and the executor
//! that runs them are supplied by the caller through traits.
//!
//! # Quick Start
//!
//! ```
//! use aprender_testgen::prelude::*;
//!
//! let config = SearchConfig::default()
//!     .with_seed(42)
//!     .with_population(20)
//!     .with_stopping_condition(StoppingConditionKind::MaxIterations)
//!     .with_algorithm_iterations(10);
//! assert!(config.validate().is_ok());
//!
//! let selection = RankSelection::new().with_rank_bias(config.rank_bias);
//! assert!((selection.rank_bias() - 1.7).abs() < 1e-12);
//! ```
//!
//! # Modules
//!
//! - [`testcase`]: Statements, test cases, test factories and execution results
//! - [`ga`]: Chromosomes, fitness functions, selection and crossover
//! - [`generation`]: Stopping conditions and the generational search
//! - [`config`]: Search configuration, loadable from TOML
//! - [`error`]: Error type shared by the crate

pub mod config;
pub mod error;
pub mod ga;
pub mod generation;
pub mod prelude;
pub mod testcase;

pub use error::{Result, TestGenError};
