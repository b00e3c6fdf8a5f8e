//! Assembly
use crate::types::{Result, TransMode};
use rlst::RlstScalar;

/// Computes per-cell contributions to a global vector
pub trait LocalAssembler: Sync {
    /// Scalar type
    type T: RlstScalar;

    /// One local vector per cell, ordered like the local DOFs of the cell's element
    fn evaluate_local_weak_forms(&self, cells: &[usize]) -> Result<Vec<Vec<Self::T>>>;
}

/// A linear operator between coefficient vectors
pub trait DiscreteOperator {
    /// Scalar type
    type T: RlstScalar;

    /// [rows, columns]
    fn shape(&self) -> [usize; 2];

    /// Compute y = alpha * op(A) x + beta * y
    fn apply(
        &self,
        trans: TransMode,
        x: &[Self::T],
        y: &mut [Self::T],
        alpha: Self::T,
        beta: Self::T,
    ) -> Result<()>;
}
