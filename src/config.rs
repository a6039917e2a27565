//! Search configuration.
//!
//! Every knob the evolutionary engine reads lives in [`SearchConfig`]. The
//! struct is passed explicitly into operators and the search loop; nothing in
//! the crate reads configuration from global state.
//!
//! # Example
//!
//! ```
//! use aprender_testgen::config::{SearchConfig, SelectionKind};
//!
//! let config = SearchConfig::default()
//!     .with_population(20)
//!     .with_chromosome_length(15)
//!     .with_selection(SelectionKind::Tournament)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//!
//! let parsed = SearchConfig::from_toml_str("population = 30\nelite = 2\n").unwrap();
//! assert_eq!(parsed.population, 30);
//! assert_eq!(parsed.chromosome_length, 40);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TestGenError};

/// Parent selection strategy used by the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// Linear rank selection biased by `rank_bias`
    #[default]
    Rank,
    /// Tournament of `tournament_size` individuals
    Tournament,
}

/// Primary budget of a search run.
///
/// The global timeout is always added on top of the chosen condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoppingConditionKind {
    /// Stop after `budget` seconds
    #[default]
    MaxTime,
    /// Stop after `algorithm_iterations` generations
    MaxIterations,
    /// Stop after `search_budget` iterations, one batch of tests each
    MaxTests,
}

/// Numeric knobs of the evolutionary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Seed for the search's random number generator
    pub seed: Option<u64>,

    /// Population size of the genetic algorithm
    pub population: usize,

    /// Number of best individuals copied unchanged into the next generation
    pub elite: usize,

    /// Maximum number of statements of a test case during search
    pub chromosome_length: usize,

    /// Attempts when building a random test case before giving up
    pub max_attempts: usize,

    /// Chop statements after an exception once the length limit is reached
    pub chop_max_length: bool,

    /// Probability of applying crossover to a pair of parents
    pub crossover_rate: f64,

    /// Probability of the delete step during test case mutation
    pub test_delete_probability: f64,

    /// Probability of the change step during test case mutation
    pub test_change_probability: f64,

    /// Probability of the insert step during test case mutation
    pub test_insert_probability: f64,

    /// Initial probability of inserting a statement; decays as `alpha^k`
    pub statement_insertion_probability: f64,

    /// Initial probability of inserting a test into a suite; decays as `alpha^k`
    pub test_insertion_probability: f64,

    /// Maximum number of test cases in a test suite
    pub max_size: usize,

    /// Minimum number of tests in an initial suite
    pub min_initial_tests: usize,

    /// Maximum number of tests in an initial suite
    pub max_initial_tests: usize,

    /// Bias for better individuals in rank selection, in (1, 2]
    pub rank_bias: f64,

    /// Number of contestants in tournament selection
    pub tournament_size: usize,

    /// Parent selection strategy
    pub selection: SelectionKind,

    /// Primary stopping condition
    pub stopping_condition: StoppingConditionKind,

    /// Time budget in seconds for [`StoppingConditionKind::MaxTime`]
    pub budget: u64,

    /// Iterations for [`StoppingConditionKind::MaxTests`]
    pub search_budget: u64,

    /// Generations for [`StoppingConditionKind::MaxIterations`]
    pub algorithm_iterations: u64,

    /// Hard wall-clock limit in seconds for the whole search, 0 disables it
    pub global_timeout: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            population: 50,
            elite: 1,
            chromosome_length: 40,
            max_attempts: 1000,
            chop_max_length: true,
            crossover_rate: 0.75,
            test_delete_probability: 1.0 / 3.0,
            test_change_probability: 1.0 / 3.0,
            test_insert_probability: 1.0 / 3.0,
            statement_insertion_probability: 0.5,
            test_insertion_probability: 0.1,
            max_size: 100,
            min_initial_tests: 1,
            max_initial_tests: 10,
            rank_bias: 1.7,
            tournament_size: 5,
            selection: SelectionKind::Rank,
            stopping_condition: StoppingConditionKind::MaxTime,
            budget: 600,
            search_budget: 60,
            algorithm_iterations: 60,
            global_timeout: 120,
        }
    }
}

impl SearchConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set random seed for reproducibility
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set population size
    #[must_use]
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Set elite size
    #[must_use]
    pub fn with_elite(mut self, elite: usize) -> Self {
        self.elite = elite;
        self
    }

    /// Set the maximum test case length
    #[must_use]
    pub fn with_chromosome_length(mut self, length: usize) -> Self {
        self.chromosome_length = length;
        self
    }

    /// Toggle chopping of dead statements on overflow
    #[must_use]
    pub fn with_chop_max_length(mut self, chop: bool) -> Self {
        self.chop_max_length = chop;
        self
    }

    /// Set crossover probability
    #[must_use]
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Set the delete, change and insert step probabilities
    #[must_use]
    pub fn with_mutation_probabilities(mut self, delete: f64, change: f64, insert: f64) -> Self {
        self.test_delete_probability = delete;
        self.test_change_probability = change;
        self.test_insert_probability = insert;
        self
    }

    /// Set the statement insertion decay factor
    #[must_use]
    pub fn with_statement_insertion_probability(mut self, alpha: f64) -> Self {
        self.statement_insertion_probability = alpha;
        self
    }

    /// Set the test insertion decay factor for suites
    #[must_use]
    pub fn with_test_insertion_probability(mut self, alpha: f64) -> Self {
        self.test_insertion_probability = alpha;
        self
    }

    /// Set the maximum number of tests per suite
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the size range of initial suites
    #[must_use]
    pub fn with_initial_tests(mut self, min: usize, max: usize) -> Self {
        self.min_initial_tests = min;
        self.max_initial_tests = max;
        self
    }

    /// Set the parent selection strategy
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionKind) -> Self {
        self.selection = selection;
        self
    }

    /// Set the rank selection bias
    #[must_use]
    pub fn with_rank_bias(mut self, bias: f64) -> Self {
        self.rank_bias = bias;
        self
    }

    /// Set the tournament size
    #[must_use]
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Set the primary stopping condition
    #[must_use]
    pub fn with_stopping_condition(mut self, kind: StoppingConditionKind) -> Self {
        self.stopping_condition = kind;
        self
    }

    /// Set the number of generations for [`StoppingConditionKind::MaxIterations`]
    #[must_use]
    pub fn with_algorithm_iterations(mut self, iterations: u64) -> Self {
        self.algorithm_iterations = iterations;
        self
    }

    /// Set the iteration budget for [`StoppingConditionKind::MaxTests`]
    #[must_use]
    pub fn with_search_budget(mut self, budget: u64) -> Self {
        self.search_budget = budget;
        self
    }

    /// Set the time budget in seconds
    #[must_use]
    pub fn with_budget(mut self, seconds: u64) -> Self {
        self.budget = seconds;
        self
    }

    /// Set the global timeout in seconds (0 disables it)
    #[must_use]
    pub fn with_global_timeout(mut self, seconds: u64) -> Self {
        self.global_timeout = seconds;
        self
    }

    /// Check every knob against its admissible range.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("crossover_rate", self.crossover_rate),
            ("test_delete_probability", self.test_delete_probability),
            ("test_change_probability", self.test_change_probability),
            ("test_insert_probability", self.test_insert_probability),
            (
                "statement_insertion_probability",
                self.statement_insertion_probability,
            ),
            ("test_insertion_probability", self.test_insertion_probability),
        ];
        for (param, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TestGenError::invalid_config(param, value, "must be in [0, 1]"));
            }
        }

        if !(self.rank_bias > 1.0 && self.rank_bias <= 2.0) {
            return Err(TestGenError::invalid_config(
                "rank_bias",
                self.rank_bias,
                "must be in (1, 2]",
            ));
        }

        let non_zero = [
            ("population", self.population),
            ("chromosome_length", self.chromosome_length),
            ("tournament_size", self.tournament_size),
            ("max_size", self.max_size),
        ];
        for (param, value) in non_zero {
            if value == 0 {
                return Err(TestGenError::invalid_config(param, value, "must be positive"));
            }
        }

        if self.elite > self.population {
            return Err(TestGenError::invalid_config(
                "elite",
                self.elite,
                format!("must not exceed population ({})", self.population),
            ));
        }

        if self.min_initial_tests > self.max_initial_tests {
            return Err(TestGenError::invalid_config(
                "min_initial_tests",
                self.min_initial_tests,
                format!(
                    "must not exceed max_initial_tests ({})",
                    self.max_initial_tests
                ),
            ));
        }

        Ok(())
    }
}
