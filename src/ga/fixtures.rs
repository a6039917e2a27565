//! Bit string chromosome and fitness functions used by unit tests.

use std::hash::{Hash, Hasher};

use rand::{Rng, RngCore};

use super::chromosome::{Chromosome, ChromosomeState};
use super::fitness::{FitnessFunction, FitnessValues};
use crate::config::SearchConfig;

/// Chromosome over a vector of bits.
#[derive(Debug, Clone)]
pub(crate) struct Bits {
    pub bits: Vec<bool>,
    state: ChromosomeState,
}

impl Bits {
    pub fn new(bits: Vec<bool>) -> Self {
        Self {
            bits,
            state: ChromosomeState::new(),
        }
    }

    pub fn ones(count: usize, len: usize) -> Self {
        Self::new((0..len).map(|index| index < count).collect())
    }

    pub fn random(len: usize, rng: &mut dyn RngCore) -> Self {
        Self::new((0..len).map(|_| rng.gen()).collect())
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }
}

impl PartialEq for Bits {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for Bits {}

impl Hash for Bits {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl Chromosome for Bits {
    fn state(&self) -> &ChromosomeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChromosomeState {
        &mut self.state
    }

    fn size(&self) -> usize {
        self.bits.len()
    }

    fn mutate(&mut self, _config: &SearchConfig, rng: &mut dyn RngCore) {
        if self.bits.is_empty() {
            return;
        }
        let p_per_bit = 1.0 / self.bits.len() as f64;
        let mut changed = false;
        for bit in &mut self.bits {
            if rng.gen::<f64>() < p_per_bit {
                *bit = !*bit;
                changed = true;
            }
        }
        if changed {
            self.set_changed(true);
        }
    }

    fn cross_over(
        &mut self,
        other: &Self,
        position1: usize,
        position2: usize,
        config: &SearchConfig,
        _rng: &mut dyn RngCore,
    ) {
        let offspring: Vec<bool> = self
            .bits
            .iter()
            .take(position1)
            .chain(other.bits.iter().skip(position2))
            .copied()
            .collect();
        if offspring.len() < config.chromosome_length {
            self.bits = offspring;
            self.set_changed(true);
        }
    }
}

/// Number of zero bits, minimised. Zero is the optimum.
#[derive(Debug, Default)]
pub(crate) struct CountZeros;

impl FitnessFunction<Bits> for CountZeros {
    fn compute_fitness_values(&self, individual: &mut Bits) -> FitnessValues {
        let ones = individual.count_ones();
        let zeros = individual.size() - ones;
        let coverage = if individual.size() == 0 {
            0.0
        } else {
            ones as f64 / individual.size() as f64
        };
        FitnessValues::new(zeros as f64, coverage)
    }

    fn is_maximisation_function(&self) -> bool {
        false
    }
}

/// Number of one bits, maximised.
#[derive(Debug, Default)]
pub(crate) struct CountOnes;

impl FitnessFunction<Bits> for CountOnes {
    fn compute_fitness_values(&self, individual: &mut Bits) -> FitnessValues {
        let ones = individual.count_ones();
        let coverage = if individual.size() == 0 {
            0.0
        } else {
            ones as f64 / individual.size() as f64
        };
        FitnessValues::new(ones as f64, coverage)
    }

    fn is_maximisation_function(&self) -> bool {
        true
    }
}

/// Evaluated bit strings with `ones[i]` one bits out of `len`.
pub(crate) fn scored_population(ones: &[usize], len: usize) -> Vec<Bits> {
    ones.iter()
        .map(|&count| {
            let mut bits = Bits::ones(count, len);
            bits.evaluate(&CountOnes).ok();
            bits
        })
        .collect()
}
