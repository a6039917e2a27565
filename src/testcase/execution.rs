//! Execution results consumed by the engine.
//!
//! Running a test case against the program under test is the job of a
//! [`TestCaseExecutor`]. The engine only reads what comes back: where the
//! first exception was raised, and the coverage trace fitness functions
//! score.

use std::collections::{BTreeMap, BTreeSet};

use super::{Statement, TestCase};

/// Coverage signals recorded while executing one or more test cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTrace {
    /// Code objects that were entered
    pub executed_code_objects: BTreeSet<usize>,
    /// How often each predicate was evaluated
    pub executed_predicates: BTreeMap<usize, usize>,
    /// Smallest distance to taking the true branch, per predicate
    pub true_distances: BTreeMap<usize, f64>,
    /// Smallest distance to taking the false branch, per predicate
    pub false_distances: BTreeMap<usize, f64>,
}

impl ExecutionTrace {
    /// Create an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another trace into this one.
    ///
    /// Code objects are united, predicate counts summed and branch distances
    /// keep their minimum.
    pub fn merge(&mut self, other: &ExecutionTrace) {
        self.executed_code_objects
            .extend(other.executed_code_objects.iter().copied());
        for (&predicate, &count) in &other.executed_predicates {
            *self.executed_predicates.entry(predicate).or_insert(0) += count;
        }
        merge_min(&mut self.true_distances, &other.true_distances);
        merge_min(&mut self.false_distances, &other.false_distances);
    }
}

fn merge_min(target: &mut BTreeMap<usize, f64>, source: &BTreeMap<usize, f64>) {
    for (&predicate, &distance) in source {
        target
            .entry(predicate)
            .and_modify(|current| *current = current.min(distance))
            .or_insert(distance);
    }
}

/// Structure of the program under test known to the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownData {
    /// All code objects that could be entered
    pub existing_code_objects: BTreeSet<usize>,
    /// All predicates; each one contributes a true and a false branch
    pub existing_predicates: BTreeSet<usize>,
}

/// Result of one test case execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    exceptions: BTreeMap<usize, String>,
    execution_trace: Option<ExecutionTrace>,
}

impl ExecutionResult {
    /// Create a result without exceptions or trace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an execution trace
    #[must_use]
    pub fn with_trace(mut self, trace: ExecutionTrace) -> Self {
        self.execution_trace = Some(trace);
        self
    }

    /// Statement indices that raised, with a description of what was raised
    pub fn exceptions(&self) -> &BTreeMap<usize, String> {
        &self.exceptions
    }

    /// The coverage trace, if the executor recorded one
    pub fn execution_trace(&self) -> Option<&ExecutionTrace> {
        self.execution_trace.as_ref()
    }

    /// Replace the coverage trace
    pub fn set_execution_trace(&mut self, trace: ExecutionTrace) {
        self.execution_trace = Some(trace);
    }

    /// Record that the statement at `statement_index` raised
    pub fn report_new_thrown_exception(
        &mut self,
        statement_index: usize,
        exception: impl Into<String>,
    ) {
        self.exceptions.insert(statement_index, exception.into());
    }

    /// Whether any statement raised during the execution
    pub fn has_test_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }

    /// Index of the first statement that raised
    pub fn first_position_of_thrown_exception(&self) -> Option<usize> {
        self.exceptions.keys().next().copied()
    }
}

/// Runs test cases against the program under test.
///
/// Executor failures are the executor's business: whatever went wrong must be
/// expressed in the returned [`ExecutionResult`].
pub trait TestCaseExecutor<S: Statement>: Send + Sync {
    /// Execute a test case
    fn execute(&self, test_case: &TestCase<S>) -> ExecutionResult;

    /// Structure of the program under test, as far as it is known
    fn known_data(&self) -> &KnownData;
}
