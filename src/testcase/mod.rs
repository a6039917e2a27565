//! Test case model shared by chromosomes and their collaborators.
//!
//! A [`TestCase`] is an ordered sequence of statements. What a statement *is*
//! belongs to the caller: the engine only needs the capabilities of the
//! [`Statement`] trait (cloning, structural equality, self-mutation and the
//! opaque distance value kept for assertion generation).
//!
//! Statements are position addressed, but every slot also carries a
//! [`StatementId`] that survives insertions, removals and in-place
//! replacement elsewhere in the sequence. Operators that hand the sequence to
//! a [`TestFactory`] re-resolve their working index through
//! [`TestCase::position_of`] afterwards instead of assuming positions stayed
//! put.

mod execution;
mod factory;

#[cfg(test)]
pub(crate) mod fixtures;

pub use execution::{ExecutionResult, ExecutionTrace, KnownData, TestCaseExecutor};
pub use factory::{RandomLengthTestCaseFactory, TestCaseFactory, TestFactory};

use std::fmt;
use std::hash::{Hash, Hasher};

use rand::RngCore;

/// One atomic action of a test case.
///
/// Equality and hashing must describe the statement's structure only; the
/// distance value is bookkeeping and must not take part in it.
pub trait Statement: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// Mutate the statement's own values or arguments.
    ///
    /// Returns `false` when the statement declines, in which case the caller
    /// may ask the test factory to substitute a different call.
    fn mutate(&mut self, rng: &mut dyn RngCore) -> bool;

    /// Distance metric of the statement's result variable.
    fn distance(&self) -> i64;

    /// Overwrite the distance metric of the statement's result variable.
    fn set_distance(&mut self, distance: i64);
}

/// Stable handle of a statement slot inside one [`TestCase`].
///
/// Ids are only meaningful within the test case that issued them and its
/// clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatementId(u64);

/// An ordered sequence of statements.
#[derive(Debug, Clone)]
pub struct TestCase<S> {
    statements: Vec<S>,
    ids: Vec<StatementId>,
    next_id: u64,
}

impl<S> Default for TestCase<S> {
    fn default() -> Self {
        Self {
            statements: Vec::new(),
            ids: Vec::new(),
            next_id: 0,
        }
    }
}

impl<S: Statement> TestCase<S> {
    /// Create an empty test case
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a test case from statements in order
    pub fn from_statements(statements: impl IntoIterator<Item = S>) -> Self {
        let mut test_case = Self::new();
        for statement in statements {
            test_case.push(statement);
        }
        test_case
    }

    /// Number of statements
    pub fn size(&self) -> usize {
        self.statements.len()
    }

    /// True if the test case holds no statements
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statements in order
    pub fn statements(&self) -> &[S] {
        &self.statements
    }

    /// Iterate over statements in order
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.statements.iter()
    }

    /// Statement at `position`
    pub fn get(&self, position: usize) -> Option<&S> {
        self.statements.get(position)
    }

    /// Mutable statement at `position`
    pub fn get_mut(&mut self, position: usize) -> Option<&mut S> {
        self.statements.get_mut(position)
    }

    /// Whether `position` addresses a statement
    pub fn has_statement(&self, position: usize) -> bool {
        position < self.statements.len()
    }

    /// Id of the slot at `position`
    pub fn id_at(&self, position: usize) -> Option<StatementId> {
        self.ids.get(position).copied()
    }

    /// Current position of the slot `id`, if it is still part of the sequence
    pub fn position_of(&self, id: StatementId) -> Option<usize> {
        self.ids.iter().position(|&candidate| candidate == id)
    }

    /// Append a statement and return its position
    pub fn push(&mut self, statement: S) -> usize {
        let id = self.fresh_id();
        self.statements.push(statement);
        self.ids.push(id);
        self.statements.len() - 1
    }

    /// Insert a statement before `position` (clamped to the end) and return
    /// the position it ended up at.
    pub fn add_statement(&mut self, statement: S, position: usize) -> usize {
        let position = position.min(self.statements.len());
        let id = self.fresh_id();
        self.statements.insert(position, statement);
        self.ids.insert(position, id);
        position
    }

    /// Replace the statement at `position`, keeping the slot's id.
    ///
    /// Returns the replaced statement, or `None` if `position` is out of
    /// bounds.
    pub fn set_statement(&mut self, position: usize, statement: S) -> Option<S> {
        let slot = self.statements.get_mut(position)?;
        Some(std::mem::replace(slot, statement))
    }

    /// Remove the statement at `position`
    pub fn remove(&mut self, position: usize) -> Option<S> {
        if position >= self.statements.len() {
            return None;
        }
        self.ids.remove(position);
        Some(self.statements.remove(position))
    }

    /// Remove every statement after `position`; the statement at `position`
    /// itself is kept.
    pub fn chop(&mut self, position: usize) {
        let keep = position.saturating_add(1);
        self.statements.truncate(keep);
        self.ids.truncate(keep);
    }

    /// Remove all statements
    pub fn clear(&mut self) {
        self.statements.clear();
        self.ids.clear();
    }

    fn fresh_id(&mut self) -> StatementId {
        let id = StatementId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl<S: PartialEq> PartialEq for TestCase<S> {
    fn eq(&self, other: &Self) -> bool {
        self.statements == other.statements
    }
}

impl<S: Eq> Eq for TestCase<S> {}

impl<S: Hash> Hash for TestCase<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.statements.hash(state);
    }
}

impl<'a, S: Statement> IntoIterator for &'a TestCase<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
