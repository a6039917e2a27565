//! Genetic operators applied by the search loop.

mod crossover;
mod selection;

pub use crossover::{CrossOverFunction, SinglePointRelativeCrossOver};
pub use selection::{
    compare_fitness, ranked_indices, selection_from_config, RankSelection, SelectionFunction,
    TournamentSelection,
};
