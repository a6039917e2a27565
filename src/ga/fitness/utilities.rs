//! Branch distance and branch coverage computations.

use crate::testcase::{ExecutionResult, ExecutionTrace, KnownData};

/// Map a non-negative distance into [0, 1).
///
/// Infinite distances map to 1. Negative input is not clamped; the resulting
/// fitness fails validation instead.
pub fn normalise(value: f64) -> f64 {
    if value.is_infinite() && value > 0.0 {
        return 1.0;
    }
    value / (1.0 + value)
}

/// Merge the traces of the given results into one.
///
/// Results without a trace contribute nothing.
pub fn analyze_results<'a>(results: impl IntoIterator<Item = &'a ExecutionResult>) -> ExecutionTrace {
    let mut merged = ExecutionTrace::new();
    for trace in results.into_iter().filter_map(ExecutionResult::execution_trace) {
        merged.merge(trace);
    }
    merged
}

/// Fitness from missed code objects plus the normalised distance to every
/// uncovered branch. Zero means everything known was covered.
pub fn compute_branch_distance_fitness(trace: &ExecutionTrace, known_data: &KnownData) -> f64 {
    let code_objects_missing = known_data
        .existing_code_objects
        .difference(&trace.executed_code_objects)
        .count() as f64;

    let predicate_fitness: f64 = known_data
        .existing_predicates
        .iter()
        .map(|&predicate| {
            branch_fitness(predicate, trace, &trace.true_distances)
                + branch_fitness(predicate, trace, &trace.false_distances)
        })
        .sum();

    code_objects_missing + predicate_fitness
}

fn branch_fitness(
    predicate: usize,
    trace: &ExecutionTrace,
    distances: &std::collections::BTreeMap<usize, f64>,
) -> f64 {
    let distance = distances.get(&predicate).copied();
    if distance == Some(0.0) {
        return 0.0;
    }
    // A branch counts as reachable only once its predicate was seen twice;
    // otherwise the other branch could still be missing its first evaluation.
    let executions = trace.executed_predicates.get(&predicate).copied().unwrap_or(0);
    match distance {
        Some(distance) if executions >= 2 => normalise(distance),
        _ => 1.0,
    }
}

/// Fraction of code objects and branches covered.
///
/// Every predicate contributes two branches; a branch is covered when its
/// distance is zero. With nothing to cover the coverage is 1.
pub fn compute_branch_coverage(trace: &ExecutionTrace, known_data: &KnownData) -> f64 {
    let existing =
        known_data.existing_code_objects.len() + known_data.existing_predicates.len() * 2;
    if existing == 0 {
        return 1.0;
    }

    let covered_code_objects = known_data
        .existing_code_objects
        .intersection(&trace.executed_code_objects)
        .count();
    let covered_branches = known_data
        .existing_predicates
        .iter()
        .map(|predicate| {
            usize::from(trace.true_distances.get(predicate) == Some(&0.0))
                + usize::from(trace.false_distances.get(predicate) == Some(&0.0))
        })
        .sum::<usize>();

    (covered_code_objects + covered_branches) as f64 / existing as f64
}
