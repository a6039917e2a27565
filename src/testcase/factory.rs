//! Structural edit contracts and random test case construction.

use std::fmt;
use std::sync::Arc;

use rand::{Rng, RngCore};

use super::{Statement, TestCase};
use crate::config::SearchConfig;

/// Dependency-safe structural edits on a test case.
///
/// Every operation must leave the test case referentially intact: no
/// statement may refer to a result that is not defined before it.
/// Implementations decide what a valid statement is; the engine never does.
pub trait TestFactory<S: Statement>: fmt::Debug + Send + Sync {
    /// Append a copy of `statement`, which may come from a different test
    /// case, re-binding its references onto `test_case` and creating
    /// supporting statements where needed.
    fn append_statement(&self, test_case: &mut TestCase<S>, statement: &S, rng: &mut dyn RngCore);

    /// Insert one random statement at a position in `[0, max_position]`.
    ///
    /// Returns the position of the new statement, or `None` when nothing
    /// could be inserted.
    fn insert_random_statement(
        &self,
        test_case: &mut TestCase<S>,
        max_position: usize,
        rng: &mut dyn RngCore,
    ) -> Option<usize>;

    /// Delete the statement at `position` together with whatever can no
    /// longer stand without it. Returns whether the test case changed.
    fn delete_statement_gracefully(&self, test_case: &mut TestCase<S>, position: usize) -> bool;

    /// Substitute the call at `position` with a structurally different one.
    ///
    /// The replacement must go through [`TestCase::set_statement`] so the
    /// slot keeps its id. Returns whether the test case changed.
    fn change_random_call(
        &self,
        test_case: &mut TestCase<S>,
        position: usize,
        rng: &mut dyn RngCore,
    ) -> bool;
}

/// Produces fresh test cases for an initial population.
pub trait TestCaseFactory<S: Statement>: fmt::Debug + Send + Sync {
    /// Create a new random test case
    fn get_test_case(&self, rng: &mut dyn RngCore) -> TestCase<S>;
}

/// Builds test cases of random length in `[1, chromosome_length]`.
#[derive(Debug, Clone)]
pub struct RandomLengthTestCaseFactory<S: Statement> {
    test_factory: Arc<dyn TestFactory<S>>,
    chromosome_length: usize,
    max_attempts: usize,
}

impl<S: Statement> RandomLengthTestCaseFactory<S> {
    /// Create a factory reading its length limits from `config`
    pub fn new(test_factory: Arc<dyn TestFactory<S>>, config: &SearchConfig) -> Self {
        Self {
            test_factory,
            chromosome_length: config.chromosome_length.max(1),
            max_attempts: config.max_attempts,
        }
    }
}

impl<S: Statement> TestCaseFactory<S> for RandomLengthTestCaseFactory<S> {
    fn get_test_case(&self, rng: &mut dyn RngCore) -> TestCase<S> {
        let mut test_case = TestCase::new();
        let target = rng.gen_range(1..=self.chromosome_length);
        let mut attempts = 0;

        while test_case.size() < target && attempts < self.max_attempts {
            let end = test_case.size();
            self.test_factory
                .insert_random_statement(&mut test_case, end, rng);
            attempts += 1;
        }
        test_case
    }
}
