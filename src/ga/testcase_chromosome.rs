//! A chromosome that encodes a single test case.
//!
//! # Mutation
//!
//! ```text
//! mutate():
//!   1. chop    if size >= chromosome_length, drop everything after the
//!              last mutatable statement
//!   2. delete  with test_delete_probability, delete each mutatable
//!              statement with p = 1/(last + 1), back to front
//!   3. change  with test_change_probability, walk front to back and
//!              mutate each statement with p = 1/(last + 1), falling back
//!              to the test factory when the statement declines
//!   4. insert  with test_insert_probability, insert statements while
//!              U(0,1) < alpha^k and size < chromosome_length
//! ```
//!
//! Statements after the first one that raised during the last execution are
//! dead code and are never edited.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::debug;

use super::chromosome::{Chromosome, ChromosomeState};
use crate::config::SearchConfig;
use crate::testcase::{ExecutionResult, Statement, TestCase, TestFactory};

/// A chromosome wrapping one test case.
///
/// Clones deep-copy the statements but share the test factory.
#[derive(Debug, Clone)]
pub struct TestCaseChromosome<S: Statement> {
    test_case: TestCase<S>,
    test_factory: Option<Arc<dyn TestFactory<S>>>,
    last_execution_result: Option<ExecutionResult>,
    state: ChromosomeState,
}

impl<S: Statement> TestCaseChromosome<S> {
    /// Wrap a test case, editing it through `test_factory`
    pub fn new(test_case: TestCase<S>, test_factory: Arc<dyn TestFactory<S>>) -> Self {
        Self {
            test_case,
            test_factory: Some(test_factory),
            last_execution_result: None,
            state: ChromosomeState::new(),
        }
    }

    /// Wrap a test case that will only be executed, never varied.
    ///
    /// Calling [`Chromosome::mutate`] or [`Chromosome::cross_over`] on the
    /// result panics.
    pub fn without_factory(test_case: TestCase<S>) -> Self {
        Self {
            test_case,
            test_factory: None,
            last_execution_result: None,
            state: ChromosomeState::new(),
        }
    }

    /// The wrapped test case
    pub fn test_case(&self) -> &TestCase<S> {
        &self.test_case
    }

    /// The test factory used to edit the test case, if any
    pub fn test_factory(&self) -> Option<&Arc<dyn TestFactory<S>>> {
        self.test_factory.as_ref()
    }

    /// Result of the most recent execution
    pub fn last_execution_result(&self) -> Option<&ExecutionResult> {
        self.last_execution_result.as_ref()
    }

    /// Replace the most recent execution result
    pub fn set_last_execution_result(&mut self, result: ExecutionResult) {
        self.last_execution_result = Some(result);
    }

    /// Index of the last statement structural edits may touch.
    ///
    /// `None` for an empty test case. If the last execution raised, this is
    /// the statement that raised (clamped to the current size); otherwise
    /// the last statement.
    pub fn last_mutatable_statement(&self) -> Option<usize> {
        let last = self.test_case.size().checked_sub(1)?;
        let thrown = self
            .last_execution_result
            .as_ref()
            .and_then(ExecutionResult::first_position_of_thrown_exception);
        Some(thrown.map_or(last, |position| position.min(last)))
    }

    fn require_test_factory(&self) -> Arc<dyn TestFactory<S>> {
        match &self.test_factory {
            Some(factory) => Arc::clone(factory),
            None => panic!("mutation and crossover require a test factory"),
        }
    }

    fn mutation_delete(&mut self, factory: &dyn TestFactory<S>, rng: &mut dyn RngCore) -> bool {
        let Some(last) = self.last_mutatable_statement() else {
            return false;
        };

        let p_per_statement = 1.0 / (last + 1) as f64;
        let mut changed = false;
        for index in (0..=last).rev() {
            if index >= self.test_case.size() {
                continue;
            }
            if rng.gen::<f64>() < p_per_statement {
                changed |= factory.delete_statement_gracefully(&mut self.test_case, index);
            }
        }
        changed
    }

    fn mutation_change(&mut self, factory: &dyn TestFactory<S>, rng: &mut dyn RngCore) -> bool {
        let Some(last) = self.last_mutatable_statement() else {
            return false;
        };

        let p_per_statement = 1.0 / (last + 1) as f64;
        let mut changed = false;
        let mut position = 0;
        while position <= last && position < self.test_case.size() {
            if rng.gen::<f64>() < p_per_statement {
                let Some(id) = self.test_case.id_at(position) else {
                    break;
                };
                let mut old_distance = 0;
                let mut mutated = false;
                if let Some(statement) = self.test_case.get_mut(position) {
                    old_distance = statement.distance();
                    mutated = statement.mutate(rng);
                }

                if mutated || factory.change_random_call(&mut self.test_case, position, rng) {
                    changed = true;
                }

                // The factory may have shifted or removed the statement. If it
                // is gone, its successor now sits at `position`.
                if let Some(current) = self.test_case.position_of(id) {
                    if let Some(statement) = self.test_case.get_mut(current) {
                        statement.set_distance(old_distance);
                    }
                    position = current + 1;
                }
            } else {
                position += 1;
            }
        }
        changed
    }

    fn mutation_insert(
        &mut self,
        factory: &dyn TestFactory<S>,
        config: &SearchConfig,
        rng: &mut dyn RngCore,
    ) -> bool {
        let alpha = config.statement_insertion_probability;
        let mut exponent = 1;
        let mut changed = false;

        while rng.gen::<f64>() < alpha.powi(exponent)
            && self.test_case.size() < config.chromosome_length
        {
            let max_position = self
                .last_mutatable_statement()
                .map_or(0, |last| last + 1);
            match factory.insert_random_statement(&mut self.test_case, max_position, rng) {
                Some(position) if position < self.test_case.size() => changed = true,
                Some(_) => {}
                None => break,
            }
            exponent += 1;
        }
        changed
    }
}

impl<S: Statement> Chromosome for TestCaseChromosome<S> {
    fn state(&self) -> &ChromosomeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChromosomeState {
        &mut self.state
    }

    fn size(&self) -> usize {
        self.test_case.size()
    }

    fn mutate(&mut self, config: &SearchConfig, rng: &mut dyn RngCore) {
        let factory = self.require_test_factory();
        let mut changed = false;

        if config.chop_max_length && self.size() >= config.chromosome_length {
            if let Some(last) = self.last_mutatable_statement() {
                let before = self.size();
                self.test_case.chop(last);
                if self.size() < before {
                    debug!(before, after = self.size(), "chopped dead statements");
                    changed = true;
                }
            }
        }

        if rng.gen::<f64>() < config.test_delete_probability
            && self.mutation_delete(factory.as_ref(), rng)
        {
            changed = true;
        }

        if rng.gen::<f64>() < config.test_change_probability
            && self.mutation_change(factory.as_ref(), rng)
        {
            changed = true;
        }

        if rng.gen::<f64>() < config.test_insert_probability
            && self.mutation_insert(factory.as_ref(), config, rng)
        {
            changed = true;
        }

        if changed {
            self.set_changed(true);
        }
    }

    fn cross_over(
        &mut self,
        other: &Self,
        position1: usize,
        position2: usize,
        config: &SearchConfig,
        rng: &mut dyn RngCore,
    ) {
        let factory = self.require_test_factory();

        let mut offspring = TestCase::new();
        for statement in self.test_case.iter().take(position1) {
            offspring.push(statement.clone());
        }
        for statement in other.test_case.iter().skip(position2) {
            factory.append_statement(&mut offspring, statement, rng);
        }

        if offspring.size() < config.chromosome_length {
            self.test_case = offspring;
            self.set_changed(true);
        } else {
            debug!(
                size = offspring.size(),
                limit = config.chromosome_length,
                "crossover offspring too long, discarded"
            );
        }
    }
}

impl<S: Statement> PartialEq for TestCaseChromosome<S> {
    fn eq(&self, other: &Self) -> bool {
        self.test_case == other.test_case
    }
}

impl<S: Statement> Eq for TestCaseChromosome<S> {}

impl<S: Statement> Hash for TestCaseChromosome<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.test_case.hash(state);
    }
}

#[cfg(test)]
#[path = "testcase_chromosome_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests_mutation_contract.rs"]
mod tests_mutation_contract;
