//! Functions and function spaces
mod analytic;
mod arithmetic;
mod data;
mod dual_data;
mod function_space;
mod grid_function;
mod interpolated;
mod special_points;
mod transformations;

pub use analytic::{SurfaceNormalDependentFunction, SurfaceNormalIndependentFunction};
pub use data::{BasisData, BasisDependencies, GeometricalData, GeometryDependencies};
pub use function_space::SerialFunctionSpace;
pub use grid_function::GridFunction;
pub use interpolated::{InterpolatedFunction, InterpolationMethod};
pub use transformations::{ScalarFunctionValue, SurfaceGradient};
