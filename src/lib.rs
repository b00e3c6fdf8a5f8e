//! Grid functions for boundary element methods
//!
//! A [function::GridFunction] is a function on a surface grid, stored as its coefficients in a
//! function space, as its projections onto a dual space, or both. Each representation is computed
//! from the other when needed using the identity operator between the two spaces.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod assembly;
pub mod element;
pub mod function;
pub mod grid;
pub mod quadrature;
pub mod traits;
pub mod types;
