//! Factories producing the initial population.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};

use super::testcase_chromosome::TestCaseChromosome;
use super::testsuite_chromosome::TestSuiteChromosome;
use crate::config::SearchConfig;
use crate::testcase::{Statement, TestCaseFactory, TestFactory};

/// Produces fresh random chromosomes.
pub trait ChromosomeFactory<C>: fmt::Debug + Send + Sync {
    /// Create a new random chromosome
    fn get_chromosome(&self, rng: &mut dyn RngCore) -> C;
}

/// Wraps freshly built test cases into test case chromosomes.
#[derive(Debug, Clone)]
pub struct TestCaseChromosomeFactory<S: Statement> {
    test_factory: Arc<dyn TestFactory<S>>,
    test_case_factory: Arc<dyn TestCaseFactory<S>>,
}

impl<S: Statement> TestCaseChromosomeFactory<S> {
    /// Build test cases with `test_case_factory`; the resulting chromosomes
    /// are varied through `test_factory`.
    pub fn new(
        test_factory: Arc<dyn TestFactory<S>>,
        test_case_factory: Arc<dyn TestCaseFactory<S>>,
    ) -> Self {
        Self {
            test_factory,
            test_case_factory,
        }
    }
}

impl<S: Statement> ChromosomeFactory<TestCaseChromosome<S>> for TestCaseChromosomeFactory<S> {
    fn get_chromosome(&self, rng: &mut dyn RngCore) -> TestCaseChromosome<S> {
        let test_case = self.test_case_factory.get_test_case(rng);
        TestCaseChromosome::new(test_case, Arc::clone(&self.test_factory))
    }
}

/// Builds suites of `[min_initial_tests, max_initial_tests]` random tests.
#[derive(Debug, Clone)]
pub struct TestSuiteChromosomeFactory<S: Statement> {
    test_case_chromosome_factory: Arc<dyn ChromosomeFactory<TestCaseChromosome<S>>>,
    min_initial_tests: usize,
    max_initial_tests: usize,
}

impl<S: Statement> TestSuiteChromosomeFactory<S> {
    /// Create a factory reading the initial suite size from `config`
    pub fn new(
        test_case_chromosome_factory: Arc<dyn ChromosomeFactory<TestCaseChromosome<S>>>,
        config: &SearchConfig,
    ) -> Self {
        let min_initial_tests = config.min_initial_tests;
        Self {
            test_case_chromosome_factory,
            min_initial_tests,
            max_initial_tests: config.max_initial_tests.max(min_initial_tests),
        }
    }
}

impl<S: Statement> ChromosomeFactory<TestSuiteChromosome<S>> for TestSuiteChromosomeFactory<S> {
    fn get_chromosome(&self, rng: &mut dyn RngCore) -> TestSuiteChromosome<S> {
        let mut suite =
            TestSuiteChromosome::new().with_factory(Arc::clone(&self.test_case_chromosome_factory));
        let tests = rng.gen_range(self.min_initial_tests..=self.max_initial_tests);
        for _ in 0..tests {
            suite.add_test_case_chromosome(self.test_case_chromosome_factory.get_chromosome(rng));
        }
        suite
    }
}
