//! Budget trackers that end a search.
//!
//! A condition is reset before a run, polled with
//! [`StoppingCondition::is_fulfilled`] between generations and advanced with
//! [`StoppingCondition::iterate`] once per generation. Time based conditions
//! run on their own clock and ignore `iterate`.

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{SearchConfig, StoppingConditionKind};

/// A resettable budget tracker polled by the search loop.
pub trait StoppingCondition: fmt::Debug + Send {
    /// Short name used in logs and termination reports
    fn name(&self) -> &'static str;

    /// Budget consumed so far
    fn current_value(&self) -> u64;

    /// Force the consumed budget.
    ///
    /// Handle with care: this bypasses the normal bookkeeping and is meant
    /// for tests and for resuming a search, not for regular use.
    fn set_current_value(&mut self, value: u64);

    /// Budget at which the condition is fulfilled
    fn limit(&self) -> u64;

    /// Change the budget; the consumed budget is kept
    fn set_limit(&mut self, limit: u64);

    /// Is the budget used up?
    fn is_fulfilled(&self) -> bool;

    /// Return to the initial, unfulfilled state
    fn reset(&mut self);

    /// Advance by one generation
    fn iterate(&mut self);
}

/// Fulfilled after a number of generations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxIterationsStoppingCondition {
    current_iteration: u64,
    max_iterations: u64,
}

impl MaxIterationsStoppingCondition {
    /// Stop after `max_iterations` generations
    pub fn new(max_iterations: u64) -> Self {
        Self {
            current_iteration: 0,
            max_iterations,
        }
    }
}

impl StoppingCondition for MaxIterationsStoppingCondition {
    fn name(&self) -> &'static str {
        "max_iterations"
    }

    fn current_value(&self) -> u64 {
        self.current_iteration
    }

    fn set_current_value(&mut self, value: u64) {
        self.current_iteration = value;
    }

    fn limit(&self) -> u64 {
        self.max_iterations
    }

    fn set_limit(&mut self, limit: u64) {
        self.max_iterations = limit;
    }

    fn is_fulfilled(&self) -> bool {
        self.current_iteration >= self.max_iterations
    }

    fn reset(&mut self) {
        self.current_iteration = 0;
    }

    fn iterate(&mut self) {
        self.current_iteration += 1;
    }
}

/// Fulfilled after a number of search iterations, each of which produces a
/// new batch of tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxTestsStoppingCondition {
    current_tests: u64,
    max_tests: u64,
}

impl MaxTestsStoppingCondition {
    /// Stop after `max_tests` iterations
    pub fn new(max_tests: u64) -> Self {
        Self {
            current_tests: 0,
            max_tests,
        }
    }
}

impl StoppingCondition for MaxTestsStoppingCondition {
    fn name(&self) -> &'static str {
        "max_tests"
    }

    fn current_value(&self) -> u64 {
        self.current_tests
    }

    fn set_current_value(&mut self, value: u64) {
        self.current_tests = value;
    }

    fn limit(&self) -> u64 {
        self.max_tests
    }

    fn set_limit(&mut self, limit: u64) {
        self.max_tests = limit;
    }

    fn is_fulfilled(&self) -> bool {
        self.current_tests >= self.max_tests
    }

    fn reset(&mut self) {
        self.current_tests = 0;
    }

    fn iterate(&mut self) {
        self.current_tests += 1;
    }
}

/// Start instant that lies `seconds` in the past, or now if the clock does
/// not reach back that far.
fn started_seconds_ago(seconds: u64) -> Instant {
    let now = Instant::now();
    now.checked_sub(Duration::from_secs(seconds)).unwrap_or(now)
}

/// Fulfilled once more than `limit` seconds passed since the last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxTimeStoppingCondition {
    start: Option<Instant>,
    max_seconds: u64,
}

impl MaxTimeStoppingCondition {
    /// Stop after `max_seconds` of wall-clock time
    pub fn new(max_seconds: u64) -> Self {
        Self {
            start: None,
            max_seconds,
        }
    }
}

impl StoppingCondition for MaxTimeStoppingCondition {
    fn name(&self) -> &'static str {
        "max_time"
    }

    fn current_value(&self) -> u64 {
        self.start.map_or(0, |start| start.elapsed().as_secs())
    }

    fn set_current_value(&mut self, value: u64) {
        self.start = Some(started_seconds_ago(value));
    }

    fn limit(&self) -> u64 {
        self.max_seconds
    }

    fn set_limit(&mut self, limit: u64) {
        self.max_seconds = limit;
    }

    fn is_fulfilled(&self) -> bool {
        self.start
            .is_some_and(|start| start.elapsed() > Duration::from_secs(self.max_seconds))
    }

    fn reset(&mut self) {
        self.start = Some(Instant::now());
    }

    fn iterate(&mut self) {}
}

/// Hard wall-clock limit over all runs.
///
/// The clock starts at the first reset and is never restarted. A limit of 0
/// disables the condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalTimeStoppingCondition {
    start: Option<Instant>,
    global_timeout: u64,
}

impl GlobalTimeStoppingCondition {
    /// Stop once `global_timeout` seconds passed since the first reset
    pub fn new(global_timeout: u64) -> Self {
        Self {
            start: None,
            global_timeout,
        }
    }
}

impl StoppingCondition for GlobalTimeStoppingCondition {
    fn name(&self) -> &'static str {
        "global_time"
    }

    fn current_value(&self) -> u64 {
        self.start.map_or(0, |start| start.elapsed().as_secs())
    }

    fn set_current_value(&mut self, value: u64) {
        self.start = Some(started_seconds_ago(value));
    }

    fn limit(&self) -> u64 {
        self.global_timeout
    }

    fn set_limit(&mut self, limit: u64) {
        self.global_timeout = limit;
    }

    fn is_fulfilled(&self) -> bool {
        if self.global_timeout == 0 {
            return false;
        }
        self.start
            .is_some_and(|start| start.elapsed() > Duration::from_secs(self.global_timeout))
    }

    fn reset(&mut self) {
        if self.start.is_none() {
            self.start = Some(Instant::now());
        }
    }

    fn iterate(&mut self) {}
}

/// The configured primary condition followed by the global time limit.
pub fn stopping_conditions_from_config(config: &SearchConfig) -> Vec<Box<dyn StoppingCondition>> {
    let primary: Box<dyn StoppingCondition> = match config.stopping_condition {
        StoppingConditionKind::MaxIterations => {
            Box::new(MaxIterationsStoppingCondition::new(config.algorithm_iterations))
        }
        StoppingConditionKind::MaxTests => Box::new(MaxTestsStoppingCondition::new(config.search_budget)),
        StoppingConditionKind::MaxTime => Box::new(MaxTimeStoppingCondition::new(config.budget)),
    };
    vec![
        primary,
        Box::new(GlobalTimeStoppingCondition::new(config.global_timeout)),
    ]
}
