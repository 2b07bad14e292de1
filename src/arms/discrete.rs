use super::arm::RewardDistribution;
use super::discount::discounted_sum;
use super::kullback::kl_bern;

use crate::errors::ArmError;

use rand::{seq::IndexedRandom, Rng};
use std::fmt;
use tracing::warn;

/// Arm drawing uniformly, with replacement, from a finite multiset of historical rewards.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteArm {
    id: String,
    values: Vec<f64>,
    lower: f64,
    amplitude: f64,
    mean: f64,
    median: f64,
    discounted_sum: f64,
    consumption: f64,
}

impl DiscreteArm {
    pub fn new(id: impl Into<String>, values: Vec<f64>) -> Result<Self, ArmError> {
        if values.is_empty() {
            return Err(ArmError::EmptyValues);
        }
        if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
            return Err(ArmError::NonFiniteValue(value));
        }

        let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let consumption = values.iter().sum::<f64>();

        Ok(Self {
            id: id.into(),
            lower,
            amplitude: upper - lower,
            mean: consumption / values.len() as f64,
            median: median(&values),
            discounted_sum: discounted_sum(&values),
            consumption,
            values,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn discounted_sum(&self) -> f64 {
        self.discounted_sum
    }

    pub fn consumption(&self) -> f64 {
        self.consumption
    }

    pub fn size(&self) -> u64 {
        self.values.len() as u64
    }

    /// Distinct values in increasing order, with their empirical probability.
    pub fn probabilities(&self) -> Vec<(f64, f64)> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        sorted
            .chunk_by(|a, b| a == b)
            .map(|chunk| (chunk[0], chunk.len() as f64 / n))
            .collect()
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

impl RewardDistribution for DiscreteArm {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // values is never empty
        self.values.choose(rng).copied().unwrap_or(self.mean)
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    fn lower_amplitude(&self) -> (f64, f64) {
        (self.lower, self.amplitude)
    }

    /// Only correct for a two-point support: a discrete distribution is not described by its
    /// mean, so the Bernoulli divergence is used as an approximation.
    fn kl(&self, x: f64, y: f64) -> f64 {
        warn!(
            arm = %self.id,
            x = %x,
            y = %y,
            "DiscreteArm kl is not defined, kl_bern is used but this is WRONG"
        );
        kl_bern(x, y)
    }
}

impl fmt::Display for DiscreteArm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs = self
            .probabilities()
            .iter()
            .map(|(value, proba)| format!("{value}: {proba:.3}"))
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "D({{{pairs}}})")
    }
}
