//! Branch distance fitness for test cases and test suites.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::utilities::{analyze_results, compute_branch_coverage, compute_branch_distance_fitness};
use super::{FitnessFunction, FitnessValues};
use crate::ga::chromosome::Chromosome;
use crate::ga::testcase_chromosome::TestCaseChromosome;
use crate::ga::testsuite_chromosome::TestSuiteChromosome;
use crate::testcase::{ExecutionResult, Statement, TestCaseExecutor};

/// Runs `test` unless its last result is still current, and returns that result.
fn run_if_stale<S: Statement>(
    executor: &dyn TestCaseExecutor<S>,
    test: &mut TestCaseChromosome<S>,
) -> ExecutionResult {
    if test.has_changed() || test.last_execution_result().is_none() {
        let result = executor.execute(test.test_case());
        trace!(
            size = test.size(),
            exceptions = result.exceptions().len(),
            "executed test case"
        );
        test.set_last_execution_result(result);
    }
    test.last_execution_result().cloned().unwrap_or_default()
}

/// Branch distance fitness of a single test case. Lower is better.
pub struct BranchDistanceTestCaseFitness<S: Statement> {
    executor: Arc<dyn TestCaseExecutor<S>>,
}

impl<S: Statement> BranchDistanceTestCaseFitness<S> {
    /// Score test cases by running them through `executor`
    pub fn new(executor: Arc<dyn TestCaseExecutor<S>>) -> Self {
        Self { executor }
    }
}

impl<S: Statement> fmt::Debug for BranchDistanceTestCaseFitness<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchDistanceTestCaseFitness").finish_non_exhaustive()
    }
}

impl<S: Statement> FitnessFunction<TestCaseChromosome<S>> for BranchDistanceTestCaseFitness<S> {
    fn compute_fitness_values(&self, individual: &mut TestCaseChromosome<S>) -> FitnessValues {
        let result = run_if_stale(self.executor.as_ref(), individual);
        let trace = analyze_results([&result]);
        let known_data = self.executor.known_data();
        FitnessValues::new(
            compute_branch_distance_fitness(&trace, known_data),
            compute_branch_coverage(&trace, known_data),
        )
    }

    fn is_maximisation_function(&self) -> bool {
        false
    }
}

/// Branch distance fitness of a whole suite, over the merged traces of its
/// test cases. Lower is better.
///
/// Only tests that changed since their last execution are run again.
pub struct BranchDistanceTestSuiteFitness<S: Statement> {
    executor: Arc<dyn TestCaseExecutor<S>>,
}

impl<S: Statement> BranchDistanceTestSuiteFitness<S> {
    /// Score suites by running their tests through `executor`
    pub fn new(executor: Arc<dyn TestCaseExecutor<S>>) -> Self {
        Self { executor }
    }
}

impl<S: Statement> fmt::Debug for BranchDistanceTestSuiteFitness<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchDistanceTestSuiteFitness").finish_non_exhaustive()
    }
}

impl<S: Statement> FitnessFunction<TestSuiteChromosome<S>> for BranchDistanceTestSuiteFitness<S> {
    fn compute_fitness_values(&self, individual: &mut TestSuiteChromosome<S>) -> FitnessValues {
        let results: Vec<ExecutionResult> = individual
            .test_chromosomes_mut()
            .iter_mut()
            .map(|test| {
                let result = run_if_stale(self.executor.as_ref(), test);
                test.set_changed(false);
                result
            })
            .collect();

        let trace = analyze_results(&results);
        let known_data = self.executor.known_data();
        FitnessValues::new(
            compute_branch_distance_fitness(&trace, known_data),
            compute_branch_coverage(&trace, known_data),
        )
    }

    fn is_maximisation_function(&self) -> bool {
        false
    }
}
