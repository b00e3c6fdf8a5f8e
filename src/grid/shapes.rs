//! Functions to create simple example grids

mod regular_sphere;
mod screen;

pub use regular_sphere::regular_sphere;
pub use screen::{screen_intervals, screen_quadrilaterals, screen_triangles};
