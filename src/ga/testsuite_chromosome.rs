//! A chromosome made of test case chromosomes.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::debug;

use super::chromosome::{Chromosome, ChromosomeState};
use super::chromosome_factory::ChromosomeFactory;
use super::testcase_chromosome::TestCaseChromosome;
use crate::config::SearchConfig;
use crate::testcase::Statement;

/// A whole test suite as one individual.
///
/// `size` is the number of tests, `length` the number of statements over
/// all of them.
#[derive(Debug, Clone)]
pub struct TestSuiteChromosome<S: Statement> {
    test_chromosomes: Vec<TestCaseChromosome<S>>,
    test_case_chromosome_factory: Option<Arc<dyn ChromosomeFactory<TestCaseChromosome<S>>>>,
    state: ChromosomeState,
}

impl<S: Statement> Default for TestSuiteChromosome<S> {
    fn default() -> Self {
        Self {
            test_chromosomes: Vec::new(),
            test_case_chromosome_factory: None,
            state: ChromosomeState::new(),
        }
    }
}

impl<S: Statement> TestSuiteChromosome<S> {
    /// Empty suite without a factory for new tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `factory` to create tests inserted during mutation.
    ///
    /// Without one, mutation never adds tests.
    #[must_use]
    pub fn with_factory(
        mut self,
        factory: Arc<dyn ChromosomeFactory<TestCaseChromosome<S>>>,
    ) -> Self {
        self.test_case_chromosome_factory = Some(factory);
        self
    }

    /// Append a test and mark the suite as changed
    pub fn add_test_case_chromosome(&mut self, test: TestCaseChromosome<S>) {
        self.test_chromosomes.push(test);
        self.set_changed(true);
    }

    /// Remove the test at `index`, marking the suite as changed
    pub fn delete_test_case_chromosome(&mut self, index: usize) -> Option<TestCaseChromosome<S>> {
        if index >= self.test_chromosomes.len() {
            return None;
        }
        self.set_changed(true);
        Some(self.test_chromosomes.remove(index))
    }

    /// The test at `index`
    pub fn test_case_chromosome(&self, index: usize) -> Option<&TestCaseChromosome<S>> {
        self.test_chromosomes.get(index)
    }

    /// All tests of the suite
    pub fn test_chromosomes(&self) -> &[TestCaseChromosome<S>] {
        &self.test_chromosomes
    }

    /// Mutable access to the tests.
    ///
    /// Meant for fitness functions that store execution results on the
    /// tests. The suite's change flag is left alone.
    pub fn test_chromosomes_mut(&mut self) -> &mut [TestCaseChromosome<S>] {
        &mut self.test_chromosomes
    }
}

impl<S: Statement> Chromosome for TestSuiteChromosome<S> {
    fn state(&self) -> &ChromosomeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChromosomeState {
        &mut self.state
    }

    fn size(&self) -> usize {
        self.test_chromosomes.len()
    }

    fn length(&self) -> usize {
        self.test_chromosomes.iter().map(Chromosome::size).sum()
    }

    fn mutate(&mut self, config: &SearchConfig, rng: &mut dyn RngCore) {
        let mut changed = false;

        if !self.test_chromosomes.is_empty() {
            let p_per_test = 1.0 / self.test_chromosomes.len() as f64;
            for test in &mut self.test_chromosomes {
                if rng.gen::<f64>() < p_per_test {
                    // A test may still be pending execution; only count edits made here.
                    let pending = test.has_changed();
                    test.set_changed(false);
                    test.mutate(config, rng);
                    let edited = test.has_changed();
                    test.set_changed(pending || edited);
                    changed |= edited;
                }
            }
        }

        if let Some(factory) = self.test_case_chromosome_factory.clone() {
            let alpha = config.test_insertion_probability;
            let mut exponent = 1;
            while rng.gen::<f64>() < alpha.powi(exponent) && self.size() < config.max_size {
                self.test_chromosomes.push(factory.get_chromosome(rng));
                exponent += 1;
                changed = true;
            }
        }

        let before = self.test_chromosomes.len();
        self.test_chromosomes.retain(|test| test.size() > 0);
        if self.test_chromosomes.len() != before {
            debug!(removed = before - self.test_chromosomes.len(), "removed empty tests");
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
        _rng: &mut dyn RngCore,
    ) {
        let offspring: Vec<TestCaseChromosome<S>> = self
            .test_chromosomes
            .iter()
            .take(position1)
            .chain(other.test_chromosomes.iter().skip(position2))
            .cloned()
            .collect();

        if offspring.len() <= config.max_size {
            self.test_chromosomes = offspring;
            self.set_changed(true);
        } else {
            debug!(
                size = offspring.len(),
                limit = config.max_size,
                "suite crossover offspring too large, discarded"
            );
        }
    }
}

impl<S: Statement> PartialEq for TestSuiteChromosome<S> {
    fn eq(&self, other: &Self) -> bool {
        self.test_chromosomes == other.test_chromosomes
    }
}

impl<S: Statement> Eq for TestSuiteChromosome<S> {}

impl<S: Statement> Hash for TestSuiteChromosome<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.test_chromosomes.hash(state);
    }
}
