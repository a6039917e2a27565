// =========================================================================
// FALSIFY: test case chromosome variation contract
//
// Each test tries to break one guarantee of mutation or crossover over many
// seeded runs rather than a single hand-picked example.
// =========================================================================

use super::*;
use crate::testcase::fixtures::{references_are_valid, values, IntExecutor, IntStatement, IntTestFactory};
use crate::testcase::{RandomLengthTestCaseFactory, TestCaseExecutor, TestCaseFactory};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn shared(factory: &Arc<IntTestFactory>) -> Arc<dyn TestFactory<IntStatement>> {
    factory.clone()
}

/// FALSIFY: a clone is equal to its source and stays so until edited
#[test]
fn falsify_clone_preserves_equality() {
    let factory = Arc::new(IntTestFactory::new());
    let config = SearchConfig::default().with_chromosome_length(12);
    let cases = RandomLengthTestCaseFactory::new(shared(&factory), &config);
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let chromosome = TestCaseChromosome::new(cases.get_test_case(&mut rng), shared(&factory));
        let copy = chromosome.clone();
        assert_eq!(chromosome, copy, "FALSIFIED: clone differs from source");
        assert_eq!(copy.size(), chromosome.size());
    }
}

/// FALSIFY: crossover never produces a test case at or above the length limit
#[test]
fn falsify_crossover_respects_chromosome_length() {
    let factory = Arc::new(IntTestFactory::new());
    let config = SearchConfig::default().with_chromosome_length(10);
    let cases = RandomLengthTestCaseFactory::new(shared(&factory), &config);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let mut first = TestCaseChromosome::new(cases.get_test_case(&mut rng), shared(&factory));
        let second = TestCaseChromosome::new(cases.get_test_case(&mut rng), shared(&factory));
        let before = first.size();
        let position1 = rng.gen_range(0..=first.size());
        let position2 = rng.gen_range(0..=second.size());

        first.cross_over(&second, position1, position2, &config, &mut rng);
        assert!(
            first.size() < config.chromosome_length || first.size() == before,
            "FALSIFIED: offspring size {} >= limit {}",
            first.size(),
            config.chromosome_length
        );
        assert!(references_are_valid(first.test_case()));
    }
}

/// FALSIFY: insertion alone never grows a test case past the length limit
#[test]
fn falsify_insert_respects_chromosome_length() {
    let factory = Arc::new(IntTestFactory::new());
    let config = SearchConfig::default()
        .with_chromosome_length(8)
        .with_mutation_probabilities(0.0, 0.0, 1.0)
        .with_statement_insertion_probability(0.9);
    let cases = RandomLengthTestCaseFactory::new(shared(&factory), &config);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..200 {
        let mut chromosome = TestCaseChromosome::new(cases.get_test_case(&mut rng), shared(&factory));
        for _ in 0..5 {
            chromosome.mutate(&config, &mut rng);
            assert!(
                chromosome.size() <= config.chromosome_length,
                "FALSIFIED: size {} > limit {}",
                chromosome.size(),
                config.chromosome_length
            );
        }
    }
}

/// FALSIFY: statements after the first raising one are never edited
#[test]
fn falsify_dead_suffix_is_frozen() {
    let factory = Arc::new(IntTestFactory::new());
    let executor = IntExecutor::new();
    let config = SearchConfig::default().with_mutation_probabilities(0.0, 1.0, 1.0);
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        let test_case = TestCase::from_statements(
            [1, -1, 5, 6].into_iter().map(IntStatement::literal),
        );
        let mut chromosome = TestCaseChromosome::new(test_case, shared(&factory));
        chromosome.set_last_execution_result(executor.execute(chromosome.test_case()));
        assert_eq!(chromosome.last_mutatable_statement(), Some(1));

        chromosome.mutate(&config, &mut rng);
        let current = values(chromosome.test_case());
        assert_eq!(
            &current[current.len() - 2..],
            &[5, 6],
            "FALSIFIED: dead suffix edited: {current:?}"
        );
    }
}

/// FALSIFY: with only deletion enabled, five independent statements lose one
/// statement per mutation on average
#[test]
fn falsify_delete_expectation() {
    let factory = Arc::new(IntTestFactory::new());
    let config = SearchConfig::default().with_mutation_probabilities(1.0, 0.0, 0.0);
    let mut rng = StdRng::seed_from_u64(2024);
    let trials = 4000;

    let mut removed = 0;
    for _ in 0..trials {
        let test_case = TestCase::from_statements((0..5).map(IntStatement::literal));
        let mut chromosome = TestCaseChromosome::new(test_case, shared(&factory));
        chromosome.mutate(&config, &mut rng);
        removed += 5 - chromosome.size();
    }

    let mean = removed as f64 / trials as f64;
    assert!(
        (mean - 1.0).abs() < 0.1,
        "FALSIFIED: mean deletions {mean}, expected about 1.0"
    );
}

/// FALSIFY: the change step keeps every statement's distance
#[test]
fn falsify_change_preserves_distances() {
    let factory = Arc::new(IntTestFactory::new());
    let config = SearchConfig::default().with_mutation_probabilities(0.0, 1.0, 0.0);
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..100 {
        let test_case = TestCase::from_statements(
            (0..4).map(|index| IntStatement::literal(index).with_distance(index * 10)),
        );
        let mut chromosome = TestCaseChromosome::new(test_case, shared(&factory));
        chromosome.mutate(&config, &mut rng);
        for (index, statement) in chromosome.test_case().iter().enumerate() {
            assert_eq!(
                statement.distance,
                index as i64 * 10,
                "FALSIFIED: distance of statement {index} lost"
            );
        }
    }
}
