mod index;
mod policy;
pub mod registry;
mod rng;
mod ucb;
mod ucbv;

pub use index::IndexPolicy;
pub use policy::{Policy, PolicyCore, RewardStats};
pub use registry::{PolicyConfig, PolicyKind, PolicyParams};
pub use rng::MaybeSeededRng;
pub use ucb::Ucb;
pub use ucbv::UcbV;
