use super::rng::MaybeSeededRng;

use crate::errors::PolicyError;

use rand::rngs::SmallRng;
use serde::Serialize;

/// Per-arm accumulators shared by every policy. `t` always equals the sum of `pulls`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RewardStats {
    t: u64,
    pulls: Vec<u64>,
    rewards: Vec<f64>,
    rewards_squared: Vec<f64>,
}

impl RewardStats {
    pub fn new(nb_arms: usize) -> Self {
        Self {
            t: 0,
            pulls: vec![0; nb_arms],
            rewards: vec![0.0; nb_arms],
            rewards_squared: vec![0.0; nb_arms],
        }
    }

    pub fn nb_arms(&self) -> usize {
        self.pulls.len()
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    pub fn pulls(&self) -> &[u64] {
        &self.pulls
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    pub fn rewards_squared(&self) -> &[f64] {
        &self.rewards_squared
    }

    pub fn reset(&mut self) {
        self.t = 0;
        self.pulls.fill(0);
        self.rewards.fill(0.0);
        self.rewards_squared.fill(0.0);
    }

    fn check_arm(&self, arm: usize) -> Result<(), PolicyError> {
        if arm < self.nb_arms() {
            Ok(())
        } else {
            Err(PolicyError::ArmNotFound(arm))
        }
    }

    /// Counts one pull of `arm` and accumulates `reward * weight` into its rewards.
    pub fn record(&mut self, arm: usize, reward: f64, weight: f64) -> Result<(), PolicyError> {
        self.check_arm(arm)?;
        self.t += 1;
        self.pulls[arm] += 1;
        self.rewards[arm] += reward * weight;
        Ok(())
    }

    pub fn record_squared(&mut self, arm: usize, value: f64) -> Result<(), PolicyError> {
        self.check_arm(arm)?;
        self.rewards_squared[arm] += value;
        Ok(())
    }

    /// Replaces the accumulators with a historical snapshot, the round counter becomes the
    /// total pulls.
    pub fn warm_start(
        &mut self,
        pulls: &[u64],
        rewards: &[f64],
        rewards_squared: &[f64],
    ) -> Result<(), PolicyError> {
        let expected = self.nb_arms();
        for got in [pulls.len(), rewards.len(), rewards_squared.len()] {
            if got != expected {
                return Err(PolicyError::SnapshotLength { expected, got });
            }
        }

        self.pulls.copy_from_slice(pulls);
        self.rewards.copy_from_slice(rewards);
        self.rewards_squared.copy_from_slice(rewards_squared);
        self.t = pulls.iter().sum();
        Ok(())
    }

    /// Empirical mean of `arm`, `None` while it has never been pulled.
    pub fn mean(&self, arm: usize) -> Option<f64> {
        match self.pulls.get(arm) {
            Some(&pulls) if pulls > 0 => Some(self.rewards[arm] / pulls as f64),
            _ => None,
        }
    }

    pub fn min_pulls(&self) -> u64 {
        self.pulls.iter().copied().min().unwrap_or_default()
    }
}

/// State common to all policies: reward bounds, accumulators and the random source.
/// The bounds are fixed at construction.
#[derive(Clone, Debug)]
pub struct PolicyCore {
    lower: f64,
    amplitude: f64,
    stats: RewardStats,
    rng: MaybeSeededRng,
}

impl PolicyCore {
    pub fn new(
        nb_arms: usize,
        lower: f64,
        amplitude: f64,
        seed: Option<u64>,
    ) -> Result<Self, PolicyError> {
        if nb_arms == 0 {
            return Err(PolicyError::InvalidArmCount(nb_arms));
        }
        if !(amplitude > 0.0 && amplitude.is_finite()) {
            return Err(PolicyError::InvalidAmplitude(amplitude));
        }

        Ok(Self {
            lower,
            amplitude,
            stats: RewardStats::new(nb_arms),
            rng: MaybeSeededRng::new(seed),
        })
    }

    pub fn nb_arms(&self) -> usize {
        self.stats.nb_arms()
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn stats(&self) -> &RewardStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut RewardStats {
        &mut self.stats
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    pub fn rng_mut(&mut self) -> &mut SmallRng {
        self.rng.get_rng()
    }

    /// Seeds the accumulators from a historical snapshot.
    pub fn warm_start(
        &mut self,
        pulls: &[u64],
        rewards: &[f64],
        rewards_squared: &[f64],
    ) -> Result<(), PolicyError> {
        self.stats.warm_start(pulls, rewards, rewards_squared)
    }
}

pub trait Policy {
    fn name(&self) -> &'static str;

    fn core(&self) -> &PolicyCore;

    fn core_mut(&mut self) -> &mut PolicyCore;

    fn nb_arms(&self) -> usize {
        self.core().nb_arms()
    }

    fn stats(&self) -> &RewardStats {
        self.core().stats()
    }

    fn start_game(&mut self) {
        self.core_mut().stats_mut().reset();
    }

    /// `weight` scales the raw reward, e.g. by a price to learn on revenue rather than on demand.
    fn get_reward(&mut self, arm: usize, reward: f64, weight: f64) -> Result<(), PolicyError> {
        self.core_mut().stats_mut().record(arm, reward, weight)
    }

    fn choice(&mut self) -> usize;

    fn choice_multiple(&mut self, size: usize) -> Result<Vec<usize>, PolicyError> {
        let nb_arms = self.nb_arms();
        if size == 0 || size > nb_arms {
            Err(PolicyError::InvalidBatchSize { size, nb_arms })
        } else if size == 1 {
            Ok(vec![self.choice()])
        } else {
            Err(PolicyError::BatchSelectionUnsupported {
                policy: self.name(),
                size,
            })
        }
    }
}
