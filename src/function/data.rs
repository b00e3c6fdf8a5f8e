//! Basis and geometrical data at reference points, and the flags requesting them

use crate::traits::GeometryMap;
use crate::types::{RealScalar, RlstArray};
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, rlst_dynamic_array4, RandomAccessByRef,
    RandomAccessMut, RawAccessMut, RlstScalar, Shape,
};
use std::ops::BitOrAssign;

/// Basis data needed by a transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasisDependencies {
    /// Values of the basis functions
    pub values: bool,
    /// First derivatives of the basis functions with respect to reference coordinates
    pub derivatives: bool,
}

impl BitOrAssign for BasisDependencies {
    fn bitor_assign(&mut self, rhs: Self) {
        self.values |= rhs.values;
        self.derivatives |= rhs.derivatives;
    }
}

impl BasisDependencies {
    /// Number of derivatives to tabulate
    pub fn nderivs(&self) -> usize {
        usize::from(self.derivatives)
    }
}

/// Geometrical data needed by a transformation or function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryDependencies {
    /// Physical coordinates of the points
    pub globals: bool,
    /// Jacobians of the reference map
    pub jacobians: bool,
    /// Integration elements (generalised jacobian determinants)
    pub integration_elements: bool,
    /// Unit normals
    pub normals: bool,
}

impl BitOrAssign for GeometryDependencies {
    fn bitor_assign(&mut self, rhs: Self) {
        self.globals |= rhs.globals;
        self.jacobians |= rhs.jacobians;
        self.integration_elements |= rhs.integration_elements;
        self.normals |= rhs.normals;
    }
}

/// Basis values and derivatives at a set of reference points
pub struct BasisData<T: RlstScalar> {
    /// Values, shape [component, function, point]
    pub values: RlstArray<T, 3>,
    /// Reference derivatives, shape [component, direction, function, point]
    pub derivatives: RlstArray<T, 4>,
}

impl<T: RlstScalar> BasisData<T> {
    /// Basis data for every basis function of an element
    ///
    /// `table` is the output of [crate::traits::FiniteElement::tabulate], with shape
    /// [derivative, point, basis function, component].
    pub fn from_table(table: &RlstArray<T::Real, 4>, tdim: usize, deps: BasisDependencies) -> Self {
        let [nderivs, npts, nfun, ncomp] = table.shape();
        let mut data = Self::allocate(ncomp, tdim, nfun, npts, deps);
        if deps.values {
            for p in 0..npts {
                for f in 0..nfun {
                    for c in 0..ncomp {
                        *data.values.get_mut([c, f, p]).unwrap() =
                            T::from_real(*table.get([0, p, f, c]).unwrap());
                    }
                }
            }
        }
        if deps.derivatives {
            debug_assert!(nderivs > tdim);
            for p in 0..npts {
                for f in 0..nfun {
                    for d in 0..tdim {
                        for c in 0..ncomp {
                            *data.derivatives.get_mut([c, d, f, p]).unwrap() =
                                T::from_real(*table.get([1 + d, p, f, c]).unwrap());
                        }
                    }
                }
            }
        }
        data
    }

    /// Data of a single function given by its coefficients in the basis of an element
    pub fn from_table_and_coefficients(
        table: &RlstArray<T::Real, 4>,
        tdim: usize,
        coefficients: &[T],
        deps: BasisDependencies,
    ) -> Self {
        let [nderivs, npts, nfun, ncomp] = table.shape();
        debug_assert_eq!(coefficients.len(), nfun);
        let mut data = Self::allocate(ncomp, tdim, 1, npts, deps);
        if deps.values {
            for p in 0..npts {
                for c in 0..ncomp {
                    *data.values.get_mut([c, 0, p]).unwrap() = coefficients
                        .iter()
                        .enumerate()
                        .fold(T::zero(), |acc, (f, coeff)| {
                            acc + T::from_real(*table.get([0, p, f, c]).unwrap()) * *coeff
                        });
                }
            }
        }
        if deps.derivatives {
            debug_assert!(nderivs > tdim);
            for p in 0..npts {
                for d in 0..tdim {
                    for c in 0..ncomp {
                        *data.derivatives.get_mut([c, d, 0, p]).unwrap() = coefficients
                            .iter()
                            .enumerate()
                            .fold(T::zero(), |acc, (f, coeff)| {
                                acc + T::from_real(*table.get([1 + d, p, f, c]).unwrap()) * *coeff
                            });
                    }
                }
            }
        }
        data
    }

    fn allocate(ncomp: usize, tdim: usize, nfun: usize, npts: usize, deps: BasisDependencies) -> Self {
        Self {
            values: if deps.values {
                rlst_dynamic_array3!(T, [ncomp, nfun, npts])
            } else {
                rlst_dynamic_array3!(T, [0, 0, 0])
            },
            derivatives: if deps.derivatives {
                rlst_dynamic_array4!(T, [ncomp, tdim, nfun, npts])
            } else {
                rlst_dynamic_array4!(T, [0, 0, 0, 0])
            },
        }
    }

    /// Number of functions
    pub fn function_count(&self) -> usize {
        usize::max(self.values.shape()[1], self.derivatives.shape()[2])
    }

    /// Number of points
    pub fn point_count(&self) -> usize {
        usize::max(self.values.shape()[2], self.derivatives.shape()[3])
    }
}

/// Geometrical data of a cell at a set of reference points
pub struct GeometricalData<T: RealScalar> {
    /// Physical points, shape [geometry_dim, npts]
    pub globals: RlstArray<T, 2>,
    /// Jacobians, shape [geometry_dim, topology_dim, npts]
    pub jacobians: RlstArray<T, 3>,
    /// Integration elements, one per point
    pub integration_elements: Vec<T>,
    /// Unit normals, shape [geometry_dim, npts]; zero unless the grid has codimension one
    pub normals: RlstArray<T, 2>,
}

impl<T: RealScalar> GeometricalData<T> {
    /// Allocate storage for geometrical data
    pub fn new(gdim: usize, tdim: usize, npts: usize) -> Self {
        Self {
            globals: rlst_dynamic_array2!(T, [gdim, npts]),
            jacobians: rlst_dynamic_array3!(T, [gdim, tdim, npts]),
            integration_elements: vec![T::zero(); npts],
            normals: rlst_dynamic_array2!(T, [gdim, npts]),
        }
    }

    /// Fill in the requested data for one cell
    pub fn compute(&mut self, map: &impl GeometryMap<T = T>, cell: usize, deps: GeometryDependencies) {
        if deps.globals {
            map.physical_points(cell, self.globals.data_mut());
        }
        if deps.integration_elements || deps.normals {
            map.jacobians_dets_normals(
                cell,
                self.jacobians.data_mut(),
                &mut self.integration_elements,
                self.normals.data_mut(),
            );
        } else if deps.jacobians {
            map.jacobians(cell, self.jacobians.data_mut());
        }
    }

    /// Number of points
    pub fn point_count(&self) -> usize {
        self.integration_elements.len()
    }

    /// Dimension of the space the points live in
    pub fn geometry_dim(&self) -> usize {
        self.globals.shape()[0]
    }

    /// Topological dimension of the cell
    pub fn topology_dim(&self) -> usize {
        self.jacobians.shape()[1]
    }
}
