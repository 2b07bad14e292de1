use crate::arms::{Arm, DiscreteArm};
use crate::config::ExperimentConfig;
use crate::environment::Mab;
use crate::errors::ExperimentError;
use crate::history::History;
use crate::policies::{IndexPolicy, Policy, PolicyConfig, RewardStats};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub experiment_id: Uuid,
    pub arm: usize,
    pub placement_id: String,
    pub indexes: Vec<f64>,
    pub stats: RewardStats,
}

/// Wires one placement experiment: history to arms, arms to an environment, and a policy
/// warm-started from the environment snapshot.
pub struct Experiment {
    id: Uuid,
    environment: Mab,
    policy: Box<dyn IndexPolicy>,
}

impl Experiment {
    pub fn new(
        config: &ExperimentConfig,
        policy: &PolicyConfig,
        history: &History,
    ) -> Result<Self, ExperimentError> {
        if config.placement_ids.is_empty() {
            return Err(ExperimentError::NoPlacementIds);
        }

        let id = Uuid::new_v4();
        let arms = init_arms(id, &config.placement_ids, history);
        if arms.is_empty() {
            return Err(ExperimentError::NoArms);
        }

        let mut environment = Mab::new(arms)?;
        if let Some(sparsity) = config.sparsity {
            environment = environment.with_sparsity(sparsity)?;
        }

        let mut policy = policy.build(environment.nb_arms())?;
        policy.core_mut().warm_start(
            environment.pulls(),
            environment.rewards(),
            environment.rewards_squared(),
        )?;

        info!(
            id = %id,
            nb_arms = environment.nb_arms(),
            policy = policy.name(),
            hoifactor = %environment.hoifactor(),
            "Created experiment"
        );

        Ok(Self {
            id,
            environment,
            policy,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn environment(&self) -> &Mab {
        &self.environment
    }

    pub fn policy(&self) -> &dyn IndexPolicy {
        self.policy.as_ref()
    }

    pub fn recommend(&mut self) -> Recommendation {
        let arm = self.policy.choice();
        let placement_id = self.environment.ids()[arm].clone();
        info!(id = %self.id, placement_id = %placement_id, "Model chooses placement id");

        Recommendation {
            experiment_id: self.id,
            arm,
            placement_id,
            indexes: self.policy.indexes().to_vec(),
            stats: self.policy.stats().clone(),
        }
    }

    /// Plays `rounds` rounds, rewards being drawn from the chosen arm's history.
    pub fn simulate<R: Rng + ?Sized>(
        &mut self,
        rounds: u64,
        rng: &mut R,
    ) -> Result<Vec<usize>, ExperimentError> {
        let mut arms = Vec::new();
        for _ in 0..rounds {
            let arm = self.policy.choice();
            let reward = self.environment.draw(arm, rng)?;
            self.policy.get_reward(arm, reward, 1.0)?;
            arms.push(arm);
        }

        Ok(arms)
    }
}

fn init_arms(id: Uuid, placement_ids: &[String], history: &History) -> Vec<Arm> {
    placement_ids
        .iter()
        .filter_map(|placement_id| {
            let Some(values) = history.consumption(placement_id) else {
                error!(id = %id, placement_id = %placement_id, "No history for placement id");
                return None;
            };

            match DiscreteArm::new(placement_id.as_str(), values.to_vec()) {
                Ok(arm) => {
                    debug!(id = %id, arm = %arm, "Added arm");
                    Some(arm.into())
                }
                Err(err) => {
                    error!(id = %id, placement_id = %placement_id, error = %err, "Cannot build arm");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConsumptionRecord;
    use crate::policies::PolicyParams;
    use rand::{rngs::SmallRng, SeedableRng};

    const SEED: u64 = 1234;

    fn history() -> History {
        History::from_records(
            [("1", 2.0), ("2", 5.0), ("1", 4.0), ("2", 1.0), ("3", 0.5)]
                .into_iter()
                .map(|(id, consumption)| ConsumptionRecord {
                    placement_id: id.to_string(),
                    consumption,
                }),
        )
    }

    fn experiment_config(placement_ids: &[&str]) -> ExperimentConfig {
        ExperimentConfig {
            placement_ids: placement_ids.iter().map(|id| id.to_string()).collect(),
            sparsity: None,
            rounds: 0,
            seed: None,
        }
    }

    fn policy_config(archtype: &str) -> PolicyConfig {
        PolicyConfig {
            archtype: archtype.to_string(),
            params: PolicyParams {
                seed: Some(SEED),
                ..Default::default()
            },
        }
    }

    #[test]
    fn warm_starts_policy_from_history() {
        let experiment = Experiment::new(
            &experiment_config(&["1", "2", "3"]),
            &policy_config("UCB"),
            &history(),
        )
        .unwrap();

        let env = experiment.environment();
        assert_eq!(env.ids(), &["1", "2", "3"]);
        let stats = experiment.policy().stats();
        assert_eq!(stats.pulls(), &[2, 2, 1]);
        assert_eq!(stats.t(), 5);
        assert_eq!(stats.rewards(), env.rewards());
        assert_eq!(stats.rewards_squared(), env.rewards_squared());
    }

    #[test]
    fn skips_placement_ids_without_history() {
        let experiment = Experiment::new(
            &experiment_config(&["1", "9"]),
            &policy_config("UCB"),
            &history(),
        )
        .unwrap();
        assert_eq!(experiment.environment().nb_arms(), 1);
    }

    #[test]
    fn fails_without_arms() {
        assert!(matches!(
            Experiment::new(&experiment_config(&[]), &policy_config("UCB"), &history()),
            Err(ExperimentError::NoPlacementIds)
        ));
        assert!(matches!(
            Experiment::new(&experiment_config(&["9"]), &policy_config("UCB"), &history()),
            Err(ExperimentError::NoArms)
        ));
        assert!(matches!(
            Experiment::new(&experiment_config(&["1"]), &policy_config("BESA"), &history()),
            Err(ExperimentError::Registry(_))
        ));
    }

    #[test]
    fn recommend() {
        let mut experiment = Experiment::new(
            &experiment_config(&["1", "2", "3"]),
            &policy_config("UCBV"),
            &history(),
        )
        .unwrap();

        let recommendation = experiment.recommend();
        assert!(recommendation.arm < 3);
        assert_eq!(recommendation.indexes.len(), 3);
        assert_eq!(
            recommendation.placement_id,
            experiment.environment().ids()[recommendation.arm]
        );
        assert_eq!(recommendation.experiment_id, experiment.id());
        assert_eq!(recommendation.stats.t(), 5);
    }

    #[test]
    fn simulate() {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let mut experiment = Experiment::new(
            &experiment_config(&["1", "2"]),
            &policy_config("UCB"),
            &history(),
        )
        .unwrap();

        let arms = experiment.simulate(20, &mut rng).unwrap();
        assert_eq!(arms.len(), 20);
        assert!(arms.iter().all(|&arm| arm < 2));
        assert_eq!(experiment.policy().stats().t(), 4 + 20);
    }
}
