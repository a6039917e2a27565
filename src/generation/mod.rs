//! Search orchestration: the generational loop and its stopping conditions.
//!
//! # Example
//!
//! ```
//! use aprender_testgen::config::{SearchConfig, StoppingConditionKind};
//! use aprender_testgen::generation::{stopping_conditions_from_config, StoppingCondition};
//!
//! let config = SearchConfig::default()
//!     .with_stopping_condition(StoppingConditionKind::MaxIterations)
//!     .with_algorithm_iterations(2);
//! let mut conditions = stopping_conditions_from_config(&config);
//! let primary = &mut conditions[0];
//!
//! primary.reset();
//! assert!(!primary.is_fulfilled());
//! primary.iterate();
//! primary.iterate();
//! assert!(primary.is_fulfilled());
//! ```

mod search;
mod stopping;

pub use search::{GenerationalSearch, SearchResult, TerminationReason};
pub use stopping::{
    stopping_conditions_from_config, GlobalTimeStoppingCondition, MaxIterationsStoppingCondition,
    MaxTestsStoppingCondition, MaxTimeStoppingCondition, StoppingCondition,
};
