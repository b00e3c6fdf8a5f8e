//! Assembly of operators and projections
pub(crate) mod common;
mod context;
mod dense_operator;
mod identity;
mod local;
mod options;
mod projections;

pub use context::Context;
pub use dense_operator::DenseMatrixOperator;
pub use identity::assemble_identity;
pub use local::GridFunctionLocalAssembler;
pub use options::AssemblyOptions;
pub use projections::calculate_projections;
