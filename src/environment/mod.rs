mod mab;
mod sparse;

pub use mab::Mab;
pub use sparse::{SolverError, SparseBoundSolver};
