//! Trait definitions

mod assembly;
mod element;
mod function;
mod grid;

pub use assembly::{DiscreteOperator, LocalAssembler};
pub use element::{ElementFamily, FiniteElement};
pub use function::{DataWriter, Function, FunctionSpace, ShapeTransformation};
pub use grid::{GeometryMap, Grid};
