//! Types shared across the library

use crate::quadrature::QuadratureError;
use rlst::{Array, BaseArray, RlstScalar, VectorContainer};
use std::str::FromStr;

/// A real scalar that can be used for coordinates and reference values
pub trait RealScalar: num::Float + RlstScalar<Real = Self> {}

impl<T: num::Float + RlstScalar<Real = T>> RealScalar for T {}

/// An owned dense rlst array
pub type RlstArray<T, const DIM: usize> = Array<T, BaseArray<T, VectorContainer<T>, DIM>, DIM>;

/// The type of a reference cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ReferenceCellType {
    /// A point
    Point = 0,
    /// A line interval
    Interval = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron (whose faces are all triangles)
    Tetrahedron = 4,
    /// A hexahedron (whose faces are all quadrilaterals)
    Hexahedron = 5,
    /// A triangular prism
    Prism = 6,
    /// A square-based pyramid
    Pyramid = 7,
}

impl ReferenceCellType {
    /// Create a reference cell type from a u8
    pub fn from(i: u8) -> Option<ReferenceCellType> {
        match i {
            0 => Some(ReferenceCellType::Point),
            1 => Some(ReferenceCellType::Interval),
            2 => Some(ReferenceCellType::Triangle),
            3 => Some(ReferenceCellType::Quadrilateral),
            4 => Some(ReferenceCellType::Tetrahedron),
            5 => Some(ReferenceCellType::Hexahedron),
            6 => Some(ReferenceCellType::Prism),
            7 => Some(ReferenceCellType::Pyramid),
            _ => None,
        }
    }
}

/// Continuity of a finite element space across cell boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuity {
    /// DOFs on shared sub-entities are shared between cells
    Continuous,
    /// Every cell owns all its DOFs
    Discontinuous,
}

/// Transposition mode for applying an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransMode {
    /// Apply the operator as is
    NoTrans,
    /// Apply the transpose
    Trans,
    /// Apply the conjugate transpose
    ConjTrans,
}

/// Which of the two representations of a grid function a vector holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    /// Expansion coefficients in the primal space
    Coefficients,
    /// Inner products against the basis of the dual space
    Projections,
}

/// Where a grid function is evaluated for post-processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialPoints {
    /// One value per cell, taken at the cell's centroid
    Cell,
    /// One value per vertex, averaged over all cells containing it
    Vertex,
}

impl FromStr for SpecialPoints {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cell" => Ok(SpecialPoints::Cell),
            "vertex" => Ok(SpecialPoints::Vertex),
            _ => Err(Error::InvalidArgument(format!(
                "invalid special point data type: {s}"
            ))),
        }
    }
}

/// Error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// An object was used before it was ready
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
    /// Arithmetic between grid functions on different spaces
    #[error("Incompatible spaces: {0}")]
    IncompatibleSpaces(String),
    /// Arithmetic between incompatible interpolated functions
    #[error("Incompatible operands: {0}")]
    IncompatibleOperands(String),
    /// A cell shape that cannot be handled
    #[error("Unsupported element type: topological dimension {topology_dim} with {corner_count} corners")]
    UnsupportedElement {
        /// Topological dimension of the cell
        topology_dim: usize,
        /// Number of corners of the cell
        corner_count: usize,
    },
    /// Operation that is not available
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    /// Division of a function by zero
    #[error("Divide by zero")]
    DivideByZero,
    /// Failure inside a dense linear algebra routine
    #[error("Linear algebra error: {0}")]
    LinearAlgebra(String),
    /// Failure to create a quadrature rule
    #[error("Quadrature error: {0}")]
    Quadrature(#[from] QuadratureError),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_special_points() {
        assert_eq!("cell".parse::<SpecialPoints>().unwrap(), SpecialPoints::Cell);
        assert_eq!(
            "VERTEX".parse::<SpecialPoints>().unwrap(),
            SpecialPoints::Vertex
        );
        assert!(matches!(
            "edge".parse::<SpecialPoints>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cell_type_from_u8() {
        for i in 0..8 {
            assert_eq!(ReferenceCellType::from(i).unwrap() as u8, i);
        }
        assert!(ReferenceCellType::from(8).is_none());
    }
}
