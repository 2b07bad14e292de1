use super::bernoulli::Bernoulli;
use super::discrete::DiscreteArm;

use rand::Rng;
use std::fmt;

/// Capabilities shared by every reward distribution an arm can follow.
pub trait RewardDistribution {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;

    fn draw_batch<R: Rng + ?Sized>(&self, rng: &mut R, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.draw(rng)).collect()
    }

    fn mean(&self) -> f64;

    /// Rewards lie in `[lower, lower + amplitude]`.
    fn lower_amplitude(&self) -> (f64, f64);

    fn kl(&self, x: f64, y: f64) -> f64;

    /// One term of the Lai & Robbins lower bound: `(mumax - mu) / kl(mu, mumax)`.
    fn one_lr(&self, mumax: f64, mu: f64) -> f64 {
        (mumax - mu) / self.kl(mu, mumax)
    }

    /// One term of the optimal arm identification factor.
    fn one_hoi(&self, mumax: f64, mu: f64) -> f64 {
        1.0 - (mumax - mu)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arm {
    Bernoulli(Bernoulli),
    Discrete(DiscreteArm),
}

impl Arm {
    pub fn id(&self) -> &str {
        match self {
            Arm::Bernoulli(arm) => arm.id(),
            Arm::Discrete(arm) => arm.id(),
        }
    }

    pub fn median(&self) -> Option<f64> {
        match self {
            Arm::Bernoulli(_) => None,
            Arm::Discrete(arm) => Some(arm.median()),
        }
    }

    pub fn discounted_sum(&self) -> f64 {
        match self {
            Arm::Bernoulli(_) => 0.0,
            Arm::Discrete(arm) => arm.discounted_sum(),
        }
    }

    pub fn consumption(&self) -> f64 {
        match self {
            Arm::Bernoulli(_) => 0.0,
            Arm::Discrete(arm) => arm.consumption(),
        }
    }

    /// Number of historical samples backing the arm.
    pub fn size(&self) -> u64 {
        match self {
            Arm::Bernoulli(_) => 0,
            Arm::Discrete(arm) => arm.size(),
        }
    }
}

impl RewardDistribution for Arm {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Arm::Bernoulli(arm) => arm.draw(rng),
            Arm::Discrete(arm) => arm.draw(rng),
        }
    }

    fn mean(&self) -> f64 {
        match self {
            Arm::Bernoulli(arm) => arm.mean(),
            Arm::Discrete(arm) => arm.mean(),
        }
    }

    fn lower_amplitude(&self) -> (f64, f64) {
        match self {
            Arm::Bernoulli(arm) => arm.lower_amplitude(),
            Arm::Discrete(arm) => arm.lower_amplitude(),
        }
    }

    fn kl(&self, x: f64, y: f64) -> f64 {
        match self {
            Arm::Bernoulli(arm) => arm.kl(x, y),
            Arm::Discrete(arm) => arm.kl(x, y),
        }
    }
}

impl From<Bernoulli> for Arm {
    fn from(arm: Bernoulli) -> Self {
        Arm::Bernoulli(arm)
    }
}

impl From<DiscreteArm> for Arm {
    fn from(arm: DiscreteArm) -> Self {
        Arm::Discrete(arm)
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arm::Bernoulli(arm) => write!(f, "{arm}"),
            Arm::Discrete(arm) => write!(f, "{arm}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    fn arms() -> Vec<Arm> {
        vec![
            Bernoulli::new(0.0).unwrap().into(),
            Bernoulli::new(0.42).unwrap().into(),
            Bernoulli::new(1.0).unwrap().into(),
            DiscreteArm::new("a", vec![3.0, 1.0, 2.0]).unwrap().into(),
            DiscreteArm::new("b", vec![-4.0, 10.0]).unwrap().into(),
            DiscreteArm::new("c", vec![5.0]).unwrap().into(),
        ]
    }

    #[test]
    fn mean_within_bounds() {
        for arm in arms() {
            let (lower, amplitude) = arm.lower_amplitude();
            assert!(arm.mean() >= lower, "{arm}");
            assert!(arm.mean() <= lower + amplitude, "{arm}");
        }
    }

    #[test]
    fn draws_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        for arm in arms() {
            let (lower, amplitude) = arm.lower_amplitude();
            for reward in arm.draw_batch(&mut rng, 50) {
                assert!(reward >= lower && reward <= lower + amplitude);
            }
        }
    }

    #[test]
    fn history_statistics() {
        let bernoulli = Arm::from(Bernoulli::new(0.5).unwrap());
        assert_eq!(bernoulli.size(), 0);
        assert_eq!(bernoulli.consumption(), 0.0);
        assert_eq!(bernoulli.median(), None);

        let discrete = Arm::from(DiscreteArm::new("a", vec![3.0, 1.0, 2.0]).unwrap());
        assert_eq!(discrete.id(), "a");
        assert_eq!(discrete.size(), 3);
        assert_eq!(discrete.consumption(), 6.0);
        assert_eq!(discrete.median(), Some(2.0));
    }

    #[test]
    fn one_hoi() {
        let arm = Arm::from(Bernoulli::new(0.2).unwrap());
        assert!((arm.one_hoi(0.8, 0.2) - 0.4).abs() < 1e-12);
    }
}
