//! The chromosome contract shared by every unit of evolution.

use std::fmt;
use std::hash::Hash;

use rand::RngCore;

use super::fitness::{FitnessFunction, FitnessValues};
use crate::config::SearchConfig;
use crate::error::{Result, TestGenError};

/// Bookkeeping every chromosome carries next to its encoded content.
///
/// None of it takes part in equality: two chromosomes with the same content
/// are equal whatever their cached fitness or change flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeState {
    changed: bool,
    fitness_values: Option<FitnessValues>,
    number_of_evaluations: usize,
    age: usize,
}

impl Default for ChromosomeState {
    fn default() -> Self {
        Self {
            changed: true,
            fitness_values: None,
            number_of_evaluations: 0,
            age: 0,
        }
    }
}

impl ChromosomeState {
    /// Fresh state: changed, never evaluated, age 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A candidate solution of the search.
///
/// Implementors provide the encoded content and the genetic operators; the
/// fitness cache and change tracking come with the trait. `cross_over` takes
/// `other: &Self`, so crossing two different chromosome variants does not
/// compile.
pub trait Chromosome: Clone + Eq + Hash + fmt::Debug {
    /// Bookkeeping state
    fn state(&self) -> &ChromosomeState;

    /// Mutable bookkeeping state
    fn state_mut(&mut self) -> &mut ChromosomeState;

    /// Number of elements this individual contains.
    fn size(&self) -> usize;

    /// Total length of all contained elements and sub-elements.
    fn length(&self) -> usize {
        self.size()
    }

    /// Mutate in place. May leave the content untouched.
    fn mutate(&mut self, config: &SearchConfig, rng: &mut dyn RngCore);

    /// Single point crossover: keep this chromosome's elements before
    /// `position1` and append `other`'s elements from `position2` on.
    fn cross_over(
        &mut self,
        other: &Self,
        position1: usize,
        position2: usize,
        config: &SearchConfig,
        rng: &mut dyn RngCore,
    );

    /// Has the content changed since the last evaluation?
    fn has_changed(&self) -> bool {
        self.state().changed
    }

    /// Set the change flag
    fn set_changed(&mut self, changed: bool) {
        self.state_mut().changed = changed;
    }

    /// Fitness values of the last evaluation, possibly stale if
    /// [`Chromosome::has_changed`] is true
    fn fitness_values(&self) -> Option<FitnessValues> {
        self.state().fitness_values
    }

    /// Cached fitness scalar
    fn fitness(&self) -> Option<f64> {
        self.fitness_values().map(|values| values.fitness)
    }

    /// Cached coverage
    fn coverage(&self) -> Option<f64> {
        self.fitness_values().map(|values| values.coverage)
    }

    /// How often this chromosome was evaluated
    fn number_of_evaluations(&self) -> usize {
        self.state().number_of_evaluations
    }

    /// Generation this chromosome was born in
    fn age(&self) -> usize {
        self.state().age
    }

    /// Record the generation this chromosome was born in
    fn set_age(&mut self, age: usize) {
        self.state_mut().age = age;
    }

    /// Fitness of this chromosome, computing it only when the content changed
    /// since the last evaluation.
    ///
    /// Values failing [`FitnessValues::validate`] are not cached and are
    /// reported as [`TestGenError::InvalidFitness`]; the chromosome stays
    /// marked as changed.
    fn evaluate(&mut self, fitness_function: &dyn FitnessFunction<Self>) -> Result<FitnessValues> {
        if !self.has_changed() {
            if let Some(values) = self.fitness_values() {
                return Ok(values);
            }
        }

        let values = fitness_function.compute_fitness_values(self);
        let violations = values.validate();
        if !violations.is_empty() {
            return Err(TestGenError::InvalidFitness { violations });
        }

        let state = self.state_mut();
        state.fitness_values = Some(values);
        state.changed = false;
        state.number_of_evaluations += 1;
        Ok(values)
    }
}
