//! Generational genetic algorithm over any [`Chromosome`].
//!
//! # Algorithm
//!
//! ```text
//! reset stopping conditions
//! P = evaluate(population random chromosomes), sorted best first
//! while no condition is fulfilled and best fitness is not optimal:
//!     P' = elite best of P
//!     while |P'| < population:
//!         o1, o2 = clone(select(P, 2))
//!         if U(0,1) < crossover_rate: crossover(o1, o2)
//!         mutate(o1); mutate(o2)
//!         P' += evaluate(o1, o2)
//!     P = sort(P'); iterate stopping conditions
//! ```
//!
//! The next generation is built completely before it replaces the current
//! one, so a stop always leaves a fully evaluated population behind.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::stopping::{stopping_conditions_from_config, StoppingCondition};
use crate::config::SearchConfig;
use crate::error::{Result, TestGenError};
use crate::ga::{
    compare_fitness, selection_from_config, Chromosome, ChromosomeFactory, CrossOverFunction,
    FitnessFunction, SelectionFunction, SinglePointRelativeCrossOver,
};

/// Why a search ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The named stopping condition was fulfilled
    StoppingCondition(String),
    /// A minimising fitness function reached 0
    OptimumReached,
}

/// Outcome of [`GenerationalSearch::run`].
#[derive(Debug, Clone)]
pub struct SearchResult<C> {
    /// Best chromosome of the final population
    pub best: C,
    /// Final population, best first
    pub population: Vec<C>,
    /// Completed generations after the initial one
    pub generations: usize,
    /// Fitness computations performed
    pub evaluations: usize,
    /// Best fitness of the initial population and after every generation
    pub fitness_history: Vec<f64>,
    /// Why the search ended
    pub termination: TerminationReason,
}

impl<C: Chromosome> SearchResult<C> {
    /// Fitness of the best chromosome
    pub fn best_fitness(&self) -> Option<f64> {
        self.best.fitness()
    }

    /// Coverage of the best chromosome
    pub fn best_coverage(&self) -> Option<f64> {
        self.best.coverage()
    }
}

/// Generational genetic algorithm with elitism.
///
/// # Example
///
/// ```ignore
/// let mut search = GenerationalSearch::new(config, chromosome_factory, fitness)?
///     .with_selection(Box::new(TournamentSelection::new()));
/// let result = search.run()?;
/// println!("best fitness: {:?}", result.best_fitness());
/// ```
pub struct GenerationalSearch<C: Chromosome> {
    config: SearchConfig,
    chromosome_factory: Box<dyn ChromosomeFactory<C>>,
    fitness_function: Box<dyn FitnessFunction<C>>,
    selection: Box<dyn SelectionFunction<C>>,
    crossover: Box<dyn CrossOverFunction<C>>,
    stopping_conditions: Vec<Box<dyn StoppingCondition>>,
}

impl<C: Chromosome> fmt::Debug for GenerationalSearch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationalSearch")
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("crossover", &self.crossover)
            .field("stopping_conditions", &self.stopping_conditions)
            .finish_non_exhaustive()
    }
}

impl<C: Chromosome> GenerationalSearch<C> {
    /// Create a search from a validated configuration.
    ///
    /// Selection and stopping conditions follow `config`; crossover is
    /// [`SinglePointRelativeCrossOver`].
    ///
    /// # Errors
    ///
    /// Returns [`TestGenError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        config: SearchConfig,
        chromosome_factory: Box<dyn ChromosomeFactory<C>>,
        fitness_function: Box<dyn FitnessFunction<C>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            selection: selection_from_config(&config),
            crossover: Box::new(SinglePointRelativeCrossOver::new()),
            stopping_conditions: stopping_conditions_from_config(&config),
            config,
            chromosome_factory,
            fitness_function,
        })
    }

    /// Replace the selection strategy
    #[must_use]
    pub fn with_selection(mut self, selection: Box<dyn SelectionFunction<C>>) -> Self {
        self.selection = selection;
        self
    }

    /// Replace the crossover operator
    #[must_use]
    pub fn with_crossover(mut self, crossover: Box<dyn CrossOverFunction<C>>) -> Self {
        self.crossover = crossover;
        self
    }

    /// Replace all stopping conditions
    #[must_use]
    pub fn with_stopping_conditions(mut self, conditions: Vec<Box<dyn StoppingCondition>>) -> Self {
        self.stopping_conditions = conditions;
        self
    }

    /// Add one more stopping condition
    #[must_use]
    pub fn with_stopping_condition(mut self, condition: Box<dyn StoppingCondition>) -> Self {
        self.stopping_conditions.push(condition);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Stopping conditions in use
    pub fn stopping_conditions(&self) -> &[Box<dyn StoppingCondition>] {
        &self.stopping_conditions
    }

    /// Run the search until a stopping condition is fulfilled or a
    /// minimising fitness function reports 0.
    ///
    /// # Errors
    ///
    /// Returns [`TestGenError::InvalidFitness`] as soon as the fitness
    /// function produces invalid values, and
    /// [`TestGenError::EmptyPopulation`] if no individual could be created.
    pub fn run(&mut self) -> Result<SearchResult<C>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let maximize = self.fitness_function.is_maximisation_function();
        self.selection.set_maximize(maximize);
        for condition in &mut self.stopping_conditions {
            condition.reset();
        }
        info!(
            population = self.config.population,
            elite = self.config.elite,
            maximize,
            "starting search"
        );

        let mut evaluations = 0;
        let mut population = Vec::with_capacity(self.config.population);
        for _ in 0..self.config.population {
            let mut chromosome = self.chromosome_factory.get_chromosome(&mut rng);
            self.evaluate(&mut chromosome, &mut evaluations)?;
            population.push(chromosome);
        }
        sort_best_first(&mut population, maximize);

        let mut fitness_history: Vec<f64> =
            population.first().and_then(Chromosome::fitness).into_iter().collect();
        let mut generations = 0;

        let termination = loop {
            if let Some(condition) = self.stopping_conditions.iter().find(|c| c.is_fulfilled()) {
                break TerminationReason::StoppingCondition(condition.name().to_string());
            }
            if !maximize && population.first().and_then(Chromosome::fitness) == Some(0.0) {
                break TerminationReason::OptimumReached;
            }

            let mut next = self.evolve(&population, generations + 1, &mut rng, &mut evaluations)?;
            sort_best_first(&mut next, maximize);
            population = next;
            generations += 1;

            for condition in &mut self.stopping_conditions {
                condition.iterate();
            }

            let best_fitness = population.first().and_then(Chromosome::fitness);
            fitness_history.extend(best_fitness);
            debug!(generation = generations, ?best_fitness, evaluations, "generation complete");
        };

        let best = population.first().cloned().ok_or(TestGenError::EmptyPopulation)?;
        info!(
            generations,
            evaluations,
            best_fitness = ?best.fitness(),
            best_coverage = ?best.coverage(),
            ?termination,
            "search finished"
        );

        Ok(SearchResult {
            best,
            population,
            generations,
            evaluations,
            fitness_history,
            termination,
        })
    }

    fn evolve(
        &mut self,
        population: &[C],
        age: usize,
        rng: &mut StdRng,
        evaluations: &mut usize,
    ) -> Result<Vec<C>> {
        let size = self.config.population;
        let mut offspring: Vec<C> = population.iter().take(self.config.elite).cloned().collect();

        while offspring.len() < size {
            let mut children: Vec<C> = self
                .selection
                .select(population, 2, rng)
                .into_iter()
                .cloned()
                .collect();

            if let [first, second] = children.as_mut_slice() {
                if rng.gen::<f64>() < self.config.crossover_rate {
                    self.crossover.cross_over(first, second, &self.config, rng);
                }
            }

            for mut child in children {
                if offspring.len() >= size {
                    break;
                }
                child.mutate(&self.config, rng);
                child.set_age(age);
                self.evaluate(&mut child, evaluations)?;
                offspring.push(child);
            }
        }
        Ok(offspring)
    }

    fn evaluate(&mut self, chromosome: &mut C, evaluations: &mut usize) -> Result<()> {
        if chromosome.has_changed() || chromosome.fitness_values().is_none() {
            *evaluations += 1;
        }
        if let Err(err) = chromosome.evaluate(self.fitness_function.as_ref()) {
            warn!(error = %err, "fitness function produced invalid values");
            return Err(err);
        }
        Ok(())
    }
}

fn sort_best_first<C: Chromosome>(population: &mut [C], maximize: bool) {
    population.sort_by(|a, b| compare_fitness(a.fitness(), b.fitness(), maximize));
}
