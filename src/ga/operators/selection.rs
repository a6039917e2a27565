//! Parent selection strategies.
//!
//! Every strategy reads its `maximize` flag to decide which direction is
//! better. Chromosomes that were never evaluated rank behind every evaluated
//! one.

use std::cmp::Ordering;
use std::fmt;

use rand::{Rng, RngCore};

use crate::config::{SearchConfig, SelectionKind};
use crate::ga::chromosome::Chromosome;

/// Order two cached fitness values so that the better one comes first.
///
/// `None` stands for "not evaluated yet" and always loses.
pub fn compare_fitness(a: Option<f64>, b: Option<f64>, maximize: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if maximize => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Indices of `population` ordered best first.
pub fn ranked_indices<C: Chromosome>(population: &[C], maximize: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.sort_by(|&a, &b| compare_fitness(population[a].fitness(), population[b].fitness(), maximize));
    indices
}

/// Picks parents out of a population.
pub trait SelectionFunction<C: Chromosome>: fmt::Debug + Send + Sync {
    /// Index of one selected individual.
    ///
    /// # Panics
    ///
    /// Panics if `population` is empty.
    fn get_index(&self, population: &[C], rng: &mut dyn RngCore) -> usize;

    /// Select `number` individuals independently, with replacement, in
    /// selection order.
    fn select<'a>(&self, population: &'a [C], number: usize, rng: &mut dyn RngCore) -> Vec<&'a C> {
        let mut selected = Vec::with_capacity(number);
        for _ in 0..number {
            let index = self.get_index(population, rng);
            selected.push(&population[index]);
        }
        selected
    }

    /// Is higher fitness better?
    fn maximize(&self) -> bool;

    /// Choose whether higher fitness is better
    fn set_maximize(&mut self, maximize: bool);
}

/// Rank-based selection with a configurable bias towards better ranks.
///
/// With bias `b` and `r ~ U(0, 1)` the selected rank is
/// `len * (b - sqrt(b^2 - 4(b - 1)r)) / (2(b - 1))`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankSelection {
    rank_bias: f64,
    maximize: bool,
}

impl Default for RankSelection {
    fn default() -> Self {
        Self {
            rank_bias: 1.7,
            maximize: true,
        }
    }
}

impl RankSelection {
    /// Rank selection with bias 1.7, maximising
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rank bias, expected in (1, 2]
    #[must_use]
    pub fn with_rank_bias(mut self, rank_bias: f64) -> Self {
        self.rank_bias = rank_bias;
        self
    }

    /// Rank bias in use
    pub fn rank_bias(&self) -> f64 {
        self.rank_bias
    }
}

impl<C: Chromosome> SelectionFunction<C> for RankSelection {
    fn get_index(&self, population: &[C], rng: &mut dyn RngCore) -> usize {
        assert!(!population.is_empty(), "cannot select from an empty population");

        let ranked = ranked_indices(population, self.maximize);
        let random_value: f64 = rng.gen();
        let bias = self.rank_bias;
        let mut d = bias - (bias * bias - 4.0 * (bias - 1.0) * random_value).sqrt();
        d = d / 2.0 / (bias - 1.0);

        let rank = ((population.len() as f64 * d) as usize).min(population.len() - 1);
        ranked[rank]
    }

    fn maximize(&self) -> bool {
        self.maximize
    }

    fn set_maximize(&mut self, maximize: bool) {
        self.maximize = maximize;
    }
}

/// Tournament selection: the best of `tournament_size` uniform draws wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentSelection {
    tournament_size: usize,
    maximize: bool,
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self {
            tournament_size: 5,
            maximize: true,
        }
    }
}

impl TournamentSelection {
    /// Tournaments of 5, maximising
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of contestants per tournament
    #[must_use]
    pub fn with_tournament_size(mut self, tournament_size: usize) -> Self {
        self.tournament_size = tournament_size.max(1);
        self
    }

    /// Contestants per tournament
    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }
}

impl<C: Chromosome> SelectionFunction<C> for TournamentSelection {
    fn get_index(&self, population: &[C], rng: &mut dyn RngCore) -> usize {
        assert!(!population.is_empty(), "cannot select from an empty population");

        let mut winner = rng.gen_range(0..population.len());
        for _ in 1..self.tournament_size {
            let contestant = rng.gen_range(0..population.len());
            let ordering = compare_fitness(
                population[contestant].fitness(),
                population[winner].fitness(),
                self.maximize,
            );
            if ordering == Ordering::Less {
                winner = contestant;
            }
        }
        winner
    }

    fn maximize(&self) -> bool {
        self.maximize
    }

    fn set_maximize(&mut self, maximize: bool) {
        self.maximize = maximize;
    }
}

/// Selection strategy configured by `config.selection`
pub fn selection_from_config<C: Chromosome>(config: &SearchConfig) -> Box<dyn SelectionFunction<C>> {
    match config.selection {
        SelectionKind::Rank => Box::new(RankSelection::new().with_rank_bias(config.rank_bias)),
        SelectionKind::Tournament => {
            Box::new(TournamentSelection::new().with_tournament_size(config.tournament_size))
        }
    }
}
