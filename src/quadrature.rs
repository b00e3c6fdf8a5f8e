//! Quadrature rules on reference cells
mod gauss_legendre;
mod types;

pub use gauss_legendre::{gauss_legendre_interval, reference_rule};
pub use types::{QuadratureRule, QuadratureError};
