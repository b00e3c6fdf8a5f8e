//! Quadrature types
use crate::types::ReferenceCellType;

/// Quadrature error
#[derive(thiserror::Error, Debug)]
pub enum QuadratureError {
    /// Rule not found
    #[error("no quadrature rule with {npoints} points per direction for {cell_type:?}")]
    RuleNotFound {
        /// The cell the rule was requested for
        cell_type: ReferenceCellType,
        /// The requested number of points per direction
        npoints: usize,
    },
}

/// A tensor-product Gauss rule on a reference cell
#[derive(Debug, Clone)]
pub struct QuadratureRule {
    /// Topological dimension of the reference cell
    pub dim: usize,
    /// Polynomial degree integrated exactly
    pub order: usize,
    /// Total number of points
    pub npoints: usize,
    /// Weights, summing to the volume of the reference cell
    pub weights: Vec<f64>,
    /// Coordinates of the points, point by point (`dim` values each)
    pub points: Vec<f64>,
}
