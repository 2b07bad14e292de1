use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("Sparse optimization problem is infeasible")]
    Infeasible,
    #[error("Sparse solver failed: {0}")]
    Failed(String),
}

/// Solves the optimization problem behind the sparse bandit lower bound
/// [Kwon, Perchet & Vernade, 2017], returning one exploration coefficient per arm.
pub trait SparseBoundSolver {
    fn solve(&self, means: &[f64], sparsity: usize) -> Result<Vec<f64>, SolverError>;
}
