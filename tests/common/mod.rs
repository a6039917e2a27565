//! Small program under test shared by the integration tests.
//!
//! The program has two functions:
//!
//! ```text
//! classify(a, b):          // code object 1
//!     if a > 10 { .. }     // predicate 0
//!     if a == b { .. }     // predicate 1
//! double(x):               // code object 2
//!     raises when |x| > 1000
//! ```
//!
//! Code object 0 is the module itself and is entered by every execution.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use aprender_testgen::prelude::*;
use aprender_testgen::testcase::{ExecutionTrace, KnownData};
use rand::{Rng, RngCore};

/// One statement of a test for the program above.
#[derive(Debug, Clone)]
pub enum Stmt {
    Int { value: i64, distance: i64 },
    Classify { a: usize, b: usize },
    Double { x: usize },
}

impl Stmt {
    pub fn int(value: i64) -> Self {
        Stmt::Int { value, distance: 0 }
    }

    /// Kind, value and references; the distance is left out.
    fn structure(&self) -> (u8, i64, Vec<usize>) {
        match self {
            Stmt::Int { value, .. } => (0, *value, Vec::new()),
            Stmt::Classify { .. } => (1, 0, self.references()),
            Stmt::Double { .. } => (2, 0, self.references()),
        }
    }

    fn references(&self) -> Vec<usize> {
        match self {
            Stmt::Int { .. } => Vec::new(),
            Stmt::Classify { a, b } => vec![*a, *b],
            Stmt::Double { x } => vec![*x],
        }
    }

    fn references_mut(&mut self) -> Vec<&mut usize> {
        match self {
            Stmt::Int { .. } => Vec::new(),
            Stmt::Classify { a, b } => vec![a, b],
            Stmt::Double { x } => vec![x],
        }
    }
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.structure() == other.structure()
    }
}

impl Eq for Stmt {}

impl Hash for Stmt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structure().hash(state);
    }
}

impl Statement for Stmt {
    fn mutate(&mut self, rng: &mut dyn RngCore) -> bool {
        match self {
            Stmt::Int { value, .. } => {
                *value += rng.gen_range(-20..=20);
                true
            }
            _ => false,
        }
    }

    fn distance(&self) -> i64 {
        match self {
            Stmt::Int { distance, .. } => *distance,
            _ => 0,
        }
    }

    fn set_distance(&mut self, new_distance: i64) {
        if let Stmt::Int { distance, .. } = self {
            *distance = new_distance;
        }
    }
}

/// Every reference points to an earlier statement.
pub fn references_are_valid(test_case: &TestCase<Stmt>) -> bool {
    test_case
        .iter()
        .enumerate()
        .all(|(index, stmt)| stmt.references().iter().all(|&reference| reference < index))
}

/// Test factory keeping references valid.
#[derive(Debug, Default)]
pub struct StmtFactory;

impl StmtFactory {
    fn random_statement(position: usize, rng: &mut dyn RngCore) -> Stmt {
        if position == 0 || rng.gen_bool(0.4) {
            return Stmt::int(rng.gen_range(-50..=50));
        }
        if rng.gen_bool(0.5) {
            Stmt::Classify {
                a: rng.gen_range(0..position),
                b: rng.gen_range(0..position),
            }
        } else {
            Stmt::Double {
                x: rng.gen_range(0..position),
            }
        }
    }

    fn insert_at(test_case: &mut TestCase<Stmt>, statement: Stmt, position: usize) -> usize {
        let position = test_case.add_statement(statement, position);
        for index in position + 1..test_case.size() {
            if let Some(stmt) = test_case.get_mut(index) {
                for reference in stmt.references_mut() {
                    if *reference >= position {
                        *reference += 1;
                    }
                }
            }
        }
        position
    }
}

impl TestFactory<Stmt> for StmtFactory {
    fn append_statement(&self, test_case: &mut TestCase<Stmt>, statement: &Stmt, rng: &mut dyn RngCore) {
        let mut copy = statement.clone();
        if test_case.is_empty() && !copy.references().is_empty() {
            test_case.push(Stmt::int(rng.gen_range(-50..=50)));
        }
        let size = test_case.size();
        for reference in copy.references_mut() {
            if *reference >= size {
                *reference = rng.gen_range(0..size);
            }
        }
        test_case.push(copy);
    }

    fn insert_random_statement(
        &self,
        test_case: &mut TestCase<Stmt>,
        max_position: usize,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        let position = rng.gen_range(0..=max_position.min(test_case.size()));
        let statement = Self::random_statement(position, rng);
        Some(Self::insert_at(test_case, statement, position))
    }

    fn delete_statement_gracefully(&self, test_case: &mut TestCase<Stmt>, position: usize) -> bool {
        if !test_case.has_statement(position) {
            return false;
        }
        let mut doomed = BTreeSet::from([position]);
        for (index, stmt) in test_case.iter().enumerate().skip(position + 1) {
            if stmt.references().iter().any(|reference| doomed.contains(reference)) {
                doomed.insert(index);
            }
        }
        for &index in doomed.iter().rev() {
            test_case.remove(index);
        }
        for index in 0..test_case.size() {
            if let Some(stmt) = test_case.get_mut(index) {
                for reference in stmt.references_mut() {
                    *reference -= doomed.range(..*reference).count();
                }
            }
        }
        true
    }

    fn change_random_call(
        &self,
        test_case: &mut TestCase<Stmt>,
        position: usize,
        rng: &mut dyn RngCore,
    ) -> bool {
        let replacement = match test_case.get(position) {
            Some(Stmt::Classify { a, .. }) => Stmt::Double { x: *a },
            Some(Stmt::Double { x }) => Stmt::Classify {
                a: *x,
                b: rng.gen_range(0..position),
            },
            _ => return false,
        };
        test_case.set_statement(position, replacement);
        true
    }
}

/// Executes [`Stmt`] test cases against the program.
#[derive(Debug)]
pub struct ProgramExecutor {
    known: KnownData,
}

impl Default for ProgramExecutor {
    fn default() -> Self {
        Self {
            known: KnownData {
                existing_code_objects: [0, 1, 2].into_iter().collect(),
                existing_predicates: [0, 1].into_iter().collect(),
            },
        }
    }
}

fn record(trace: &mut ExecutionTrace, predicate: usize, true_distance: f64, false_distance: f64) {
    *trace.executed_predicates.entry(predicate).or_insert(0) += 1;
    let entry = trace.true_distances.entry(predicate).or_insert(true_distance);
    *entry = entry.min(true_distance);
    let entry = trace.false_distances.entry(predicate).or_insert(false_distance);
    *entry = entry.min(false_distance);
}

impl TestCaseExecutor<Stmt> for ProgramExecutor {
    fn execute(&self, test_case: &TestCase<Stmt>) -> ExecutionResult {
        let mut result = ExecutionResult::new();
        let mut trace = ExecutionTrace::new();
        trace.executed_code_objects.insert(0);

        let mut values: Vec<i64> = Vec::with_capacity(test_case.size());
        for (index, stmt) in test_case.iter().enumerate() {
            let value = match *stmt {
                Stmt::Int { value, .. } => value,
                Stmt::Classify { a, b } => {
                    trace.executed_code_objects.insert(1);
                    let (a, b) = (values[a], values[b]);
                    record(&mut trace, 0, (11 - a).max(0) as f64, (a - 10).max(0) as f64);
                    let equal_distance = (a - b).abs() as f64;
                    record(&mut trace, 1, equal_distance, if a == b { 1.0 } else { 0.0 });
                    i64::from(a > 10) + i64::from(a == b)
                }
                Stmt::Double { x } => {
                    trace.executed_code_objects.insert(2);
                    if values[x].abs() > 1000 {
                        result.report_new_thrown_exception(index, "Overflow");
                        break;
                    }
                    values[x] * 2
                }
            };
            values.push(value);
        }
        result.with_trace(trace)
    }

    fn known_data(&self) -> &KnownData {
        &self.known
    }
}

pub fn test_factory() -> Arc<dyn TestFactory<Stmt>> {
    Arc::new(StmtFactory)
}

pub fn executor() -> Arc<dyn TestCaseExecutor<Stmt>> {
    Arc::new(ProgramExecutor::default())
}

pub fn test_case_chromosome_factory(config: &SearchConfig) -> Arc<TestCaseChromosomeFactory<Stmt>> {
    let test_factory = test_factory();
    let test_cases = Arc::new(RandomLengthTestCaseFactory::new(test_factory.clone(), config));
    Arc::new(TestCaseChromosomeFactory::new(test_factory, test_cases))
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
