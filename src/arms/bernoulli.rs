use super::arm::RewardDistribution;
use super::kullback::kl_bern;

use crate::errors::ArmError;

use rand::Rng;
use rand_distr::Distribution;
use std::fmt;

/// Arm paying 1 with probability `probability` and 0 otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Bernoulli {
    id: String,
    probability: f64,
    distribution: rand_distr::Bernoulli,
}

impl Bernoulli {
    pub fn new(probability: f64) -> Result<Self, ArmError> {
        let distribution = rand_distr::Bernoulli::new(probability)
            .map_err(|_| ArmError::InvalidProbability(probability))?;

        Ok(Self {
            id: format!("B({probability:.3})"),
            probability,
            distribution,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl RewardDistribution for Bernoulli {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.distribution.sample(rng) {
            1.0
        } else {
            0.0
        }
    }

    fn mean(&self) -> f64 {
        self.probability
    }

    fn lower_amplitude(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn kl(&self, x: f64, y: f64) -> f64 {
        kl_bern(x, y)
    }
}

impl fmt::Display for Bernoulli {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "B({:.3})", self.probability)
    }
}
