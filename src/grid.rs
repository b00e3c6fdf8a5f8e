//! Grid creation and storage

mod builder;
pub mod shapes;
mod surface_grid;

pub use builder::SurfaceGridBuilder;
pub use surface_grid::{SurfaceGeometryMap, SurfaceGrid};
