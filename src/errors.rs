use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArmError {
    #[error("Bernoulli probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("Discrete arm values cannot be empty")]
    EmptyValues,
    #[error("Discrete arm values must be finite, got {0}")]
    NonFiniteValue(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("Number of arms must be > 0, got {0}")]
    InvalidArmCount(usize),
    #[error("Amplitude must be > 0, got {0}")]
    InvalidAmplitude(f64),
    #[error("Arm {0} not found")]
    ArmNotFound(usize),
    #[error("Rank {rank} is out of range for {nb_arms} arms")]
    InvalidRank { rank: usize, nb_arms: usize },
    #[error("Cannot select {size} arms out of {nb_arms}")]
    InvalidBatchSize { size: usize, nb_arms: usize },
    #[error("Best arm count {m} must be between 1 and {nb_arms}")]
    InvalidBestArmCount { m: usize, nb_arms: usize },
    #[error("Policy {policy} cannot select {size} arms at once")]
    BatchSelectionUnsupported { policy: &'static str, size: usize },
    #[error("Snapshot has {got} entries, expected {expected}")]
    SnapshotLength { expected: usize, got: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum EnvironmentError {
    #[error("Environment needs at least one arm")]
    NoArms,
    #[error("Arm {0} not found")]
    ArmNotFound(usize),
    #[error("Count {m} must be between 1 and {nb_arms}")]
    InvalidCount { m: usize, nb_arms: usize },
    #[error("Sparsity {sparsity} exceeds the number of arms {nb_arms}")]
    InvalidSparsity { sparsity: usize, nb_arms: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Unknown policy '{0}'")]
    UnknownPolicy(String),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error while reading history: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse history JSON: {0}")]
    Deserialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Experiment has no placement ids")]
    NoPlacementIds,
    #[error("No arm could be built from the history")]
    NoArms,
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}
