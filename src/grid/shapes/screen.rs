//! Screen grids

use crate::grid::{SurfaceGrid, SurfaceGridBuilder};
use crate::types::{Error, RealScalar, ReferenceCellType, Result};

fn check_cell_count(ncells: usize) -> Result<()> {
    if ncells == 0 {
        Err(Error::InvalidArgument(
            "Cannot create a grid with 0 cells".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Create a square grid with triangle cells
///
/// Create a grid of the square \[0,1\]^2 with triangle cells. The input ncells is the number of cells
/// along each side of the square.
pub fn screen_triangles<T: RealScalar>(ncells: usize) -> Result<SurfaceGrid<T>> {
    check_cell_count(ncells)?;
    let mut b = SurfaceGridBuilder::new_with_capacity(3, (ncells + 1) * (ncells + 1), 2 * ncells * ncells);

    let zero = T::zero();
    let n = num::cast::<usize, T>(ncells).unwrap();
    for y in 0..ncells + 1 {
        for x in 0..ncells + 1 {
            b.add_point(
                y * (ncells + 1) + x,
                &[
                    num::cast::<usize, T>(x).unwrap() / n,
                    num::cast::<usize, T>(y).unwrap() / n,
                    zero,
                ],
            );
        }
    }
    for y in 0..ncells {
        for x in 0..ncells {
            b.add_cell(
                2 * y * ncells + 2 * x,
                (
                    &[
                        y * (ncells + 1) + x,
                        y * (ncells + 1) + x + 1,
                        y * (ncells + 1) + x + ncells + 2,
                    ],
                    ReferenceCellType::Triangle,
                ),
            );
            b.add_cell(
                2 * y * ncells + 2 * x + 1,
                (
                    &[
                        y * (ncells + 1) + x,
                        y * (ncells + 1) + x + ncells + 2,
                        y * (ncells + 1) + x + ncells + 1,
                    ],
                    ReferenceCellType::Triangle,
                ),
            );
        }
    }

    b.create_grid()
}

/// Create a square grid with quadrilateral cells
///
/// Create a grid of the square \[0,1\]^2 with quadrilateral cells. The input ncells is the number of
/// cells along each side of the square.
pub fn screen_quadrilaterals<T: RealScalar>(ncells: usize) -> Result<SurfaceGrid<T>> {
    check_cell_count(ncells)?;
    let mut b = SurfaceGridBuilder::new_with_capacity(3, (ncells + 1) * (ncells + 1), ncells * ncells);

    let zero = T::zero();
    let n = num::cast::<usize, T>(ncells).unwrap();
    for y in 0..ncells + 1 {
        for x in 0..ncells + 1 {
            b.add_point(
                y * (ncells + 1) + x,
                &[
                    num::cast::<usize, T>(x).unwrap() / n,
                    num::cast::<usize, T>(y).unwrap() / n,
                    zero,
                ],
            );
        }
    }
    for y in 0..ncells {
        for x in 0..ncells {
            b.add_cell(
                y * ncells + x,
                (
                    &[
                        y * (ncells + 1) + x,
                        y * (ncells + 1) + x + 1,
                        y * (ncells + 1) + x + ncells + 1,
                        y * (ncells + 1) + x + ncells + 2,
                    ],
                    ReferenceCellType::Quadrilateral,
                ),
            );
        }
    }

    b.create_grid()
}

/// Create a grid of the interval \[0,1\] embedded in the plane with ncells cells
pub fn screen_intervals<T: RealScalar>(ncells: usize) -> Result<SurfaceGrid<T>> {
    check_cell_count(ncells)?;
    let mut b = SurfaceGridBuilder::new_with_capacity(2, ncells + 1, ncells);
    let n = num::cast::<usize, T>(ncells).unwrap();
    for x in 0..ncells + 1 {
        b.add_point(x, &[num::cast::<usize, T>(x).unwrap() / n, T::zero()]);
    }
    for x in 0..ncells {
        b.add_cell(x, (&[x, x + 1], ReferenceCellType::Interval));
    }
    b.create_grid()
}
