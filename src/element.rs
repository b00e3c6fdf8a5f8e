//! Finite elements

pub mod lagrange;
pub mod reference_cell;

pub use lagrange::{LagrangeElement, LagrangeElementFamily};
