//! In-crate statement model, test factory and executor used by unit tests.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::{Rng, RngCore};

use super::{ExecutionResult, ExecutionTrace, KnownData, Statement, TestCase, TestCaseExecutor, TestFactory};

/// Integer statement that optionally uses the result of an earlier one.
#[derive(Debug, Clone)]
pub(crate) struct IntStatement {
    pub value: i64,
    pub arg: Option<usize>,
    pub distance: i64,
    pub frozen: bool,
}

impl IntStatement {
    pub fn literal(value: i64) -> Self {
        Self {
            value,
            arg: None,
            distance: 0,
            frozen: false,
        }
    }

    pub fn call(value: i64, arg: usize) -> Self {
        Self {
            arg: Some(arg),
            ..Self::literal(value)
        }
    }

    pub fn with_distance(mut self, distance: i64) -> Self {
        self.distance = distance;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }
}

impl PartialEq for IntStatement {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.arg == other.arg && self.frozen == other.frozen
    }
}

impl Eq for IntStatement {}

impl Hash for IntStatement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.arg.hash(state);
        self.frozen.hash(state);
    }
}

impl Statement for IntStatement {
    fn mutate(&mut self, rng: &mut dyn RngCore) -> bool {
        if self.frozen {
            return false;
        }
        self.value += rng.gen_range(1..=5);
        // Mutating a value forgets the distance; the operator has to restore it.
        self.distance = 0;
        true
    }

    fn distance(&self) -> i64 {
        self.distance
    }

    fn set_distance(&mut self, distance: i64) {
        self.distance = distance;
    }
}

/// Test factory over [`IntStatement`] that keeps `arg` references valid.
#[derive(Debug, Default)]
pub(crate) struct IntTestFactory {
    pub refuse_inserts: bool,
    pub refuse_changes: bool,
    pub support_on_change: bool,
    pub delete_on_change: bool,
    pub cascade_deletes: bool,
    pub inserts: AtomicUsize,
    pub deletes: AtomicUsize,
    pub changes: AtomicUsize,
    pub appends: AtomicUsize,
}

impl IntTestFactory {
    pub fn new() -> Self {
        Self {
            cascade_deletes: true,
            ..Self::default()
        }
    }

    pub fn refusing_inserts(mut self) -> Self {
        self.refuse_inserts = true;
        self
    }

    pub fn refusing_changes(mut self) -> Self {
        self.refuse_changes = true;
        self
    }

    /// `change_random_call` inserts a supporting literal in front of the
    /// changed statement, shifting it one position to the right.
    pub fn with_support_on_change(mut self) -> Self {
        self.support_on_change = true;
        self
    }

    /// `change_random_call` deletes the statement instead of replacing it.
    pub fn deleting_on_change(mut self) -> Self {
        self.delete_on_change = true;
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn insert_shifting(test_case: &mut TestCase<IntStatement>, statement: IntStatement, position: usize) -> usize {
        let position = test_case.add_statement(statement, position);
        for index in position + 1..test_case.size() {
            if let Some(stmt) = test_case.get_mut(index) {
                if let Some(arg) = stmt.arg.as_mut() {
                    if *arg >= position {
                        *arg += 1;
                    }
                }
            }
        }
        position
    }
}

impl TestFactory<IntStatement> for IntTestFactory {
    fn append_statement(
        &self,
        test_case: &mut TestCase<IntStatement>,
        statement: &IntStatement,
        _rng: &mut dyn RngCore,
    ) {
        self.appends.fetch_add(1, Ordering::SeqCst);
        let mut copy = statement.clone();
        if let Some(arg) = copy.arg {
            if test_case.is_empty() {
                test_case.push(IntStatement::literal(0));
                copy.arg = Some(0);
            } else if arg >= test_case.size() {
                copy.arg = Some(test_case.size() - 1);
            }
        }
        test_case.push(copy);
    }

    fn insert_random_statement(
        &self,
        test_case: &mut TestCase<IntStatement>,
        max_position: usize,
        rng: &mut dyn RngCore,
    ) -> Option<usize> {
        if self.refuse_inserts {
            return None;
        }
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let position = rng.gen_range(0..=max_position).min(test_case.size());
        let value = rng.gen_range(0..20);
        let statement = if position > 0 && rng.gen::<bool>() {
            IntStatement::call(value, rng.gen_range(0..position))
        } else {
            IntStatement::literal(value)
        };
        Some(Self::insert_shifting(test_case, statement, position))
    }

    fn delete_statement_gracefully(&self, test_case: &mut TestCase<IntStatement>, position: usize) -> bool {
        if position >= test_case.size() {
            return false;
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);

        let mut doomed: BTreeSet<usize> = BTreeSet::new();
        doomed.insert(position);
        if self.cascade_deletes {
            for (index, stmt) in test_case.iter().enumerate().skip(position + 1) {
                if stmt.arg.is_some_and(|arg| doomed.contains(&arg)) {
                    doomed.insert(index);
                }
            }
        }
        for &index in doomed.iter().rev() {
            test_case.remove(index);
        }
        for index in 0..test_case.size() {
            if let Some(stmt) = test_case.get_mut(index) {
                if let Some(arg) = stmt.arg.as_mut() {
                    let removed_before = doomed.range(..*arg).count();
                    *arg -= removed_before;
                }
            }
        }
        true
    }

    fn change_random_call(
        &self,
        test_case: &mut TestCase<IntStatement>,
        position: usize,
        rng: &mut dyn RngCore,
    ) -> bool {
        if self.refuse_changes || !test_case.has_statement(position) {
            return false;
        }
        self.changes.fetch_add(1, Ordering::SeqCst);
        if self.delete_on_change {
            return self.delete_statement_gracefully(test_case, position);
        }
        let mut position = position;
        if self.support_on_change {
            position = Self::insert_shifting(test_case, IntStatement::literal(0), position) + 1;
        }
        let replacement = IntStatement::literal(1000 + rng.gen_range(0..1000));
        test_case.set_statement(position, replacement);
        true
    }
}

/// Executor over [`IntStatement`] test cases.
///
/// Statements with negative values raise; execution stops at the first one.
/// Each statement enters code object `value % 4`; predicate 0 measures the
/// distance of the smallest value to 10.
#[derive(Debug)]
pub(crate) struct IntExecutor {
    known: KnownData,
    pub executions: AtomicUsize,
}

impl IntExecutor {
    pub fn new() -> Self {
        Self {
            known: KnownData {
                existing_code_objects: (0..4).collect(),
                existing_predicates: [0].into_iter().collect(),
            },
            executions: AtomicUsize::new(0),
        }
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl TestCaseExecutor<IntStatement> for IntExecutor {
    fn execute(&self, test_case: &TestCase<IntStatement>) -> ExecutionResult {
        self.executions.fetch_add(1, Ordering::SeqCst);
        let mut result = ExecutionResult::new();
        let mut trace = ExecutionTrace::new();
        for (index, stmt) in test_case.iter().enumerate() {
            if stmt.value < 0 {
                result.report_new_thrown_exception(index, "NegativeValue");
                break;
            }
            trace.executed_code_objects.insert((stmt.value % 4) as usize);
            *trace.executed_predicates.entry(0).or_insert(0) += 1;
            let true_distance = (stmt.value - 10).abs() as f64;
            let false_distance = if stmt.value == 10 { 1.0 } else { 0.0 };
            let entry = trace.true_distances.entry(0).or_insert(true_distance);
            *entry = entry.min(true_distance);
            let entry = trace.false_distances.entry(0).or_insert(false_distance);
            *entry = entry.min(false_distance);
        }
        result.with_trace(trace)
    }

    fn known_data(&self) -> &KnownData {
        &self.known
    }
}

/// Values of a test case in order.
pub(crate) fn values(test_case: &TestCase<IntStatement>) -> Vec<i64> {
    test_case.iter().map(|stmt| stmt.value).collect()
}

/// Every `arg` points to an earlier statement.
pub(crate) fn references_are_valid(test_case: &TestCase<IntStatement>) -> bool {
    test_case
        .iter()
        .enumerate()
        .all(|(index, stmt)| stmt.arg.map_or(true, |arg| arg < index))
}
