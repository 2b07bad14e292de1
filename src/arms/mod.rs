mod arm;
mod bernoulli;
mod discount;
mod discrete;
mod kullback;

pub use arm::{Arm, RewardDistribution};
pub use bernoulli::Bernoulli;
pub use discount::{discounted_rewards, discounted_sum, DISCOUNT_FACTOR};
pub use discrete::DiscreteArm;
pub use kullback::{kl_bern, EPS};
