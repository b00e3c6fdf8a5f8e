//! Maps from reference basis data to physical values

use crate::function::{BasisData, BasisDependencies, GeometricalData, GeometryDependencies};
use crate::traits::ShapeTransformation;
use crate::types::RlstArray;
use rlst::{RandomAccessByRef, RandomAccessMut, RlstScalar, Shape};

/// The values of scalar basis functions, unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarFunctionValue;

impl ShapeTransformation for ScalarFunctionValue {
    fn codomain_dimension(&self) -> usize {
        1
    }

    fn add_dependencies(
        &self,
        basis_deps: &mut BasisDependencies,
        _geom_deps: &mut GeometryDependencies,
    ) {
        basis_deps.values = true;
    }

    fn evaluate<T: RlstScalar>(
        &self,
        basis: &BasisData<T>,
        _geometry: &GeometricalData<T::Real>,
        result: &mut RlstArray<T, 3>,
    ) {
        let [_, nfun, npts] = basis.values.shape();
        for p in 0..npts {
            for f in 0..nfun {
                *result.get_mut([0, f, p]).unwrap() = *basis.values.get([0, f, p]).unwrap();
            }
        }
    }
}

/// The surface gradient of scalar basis functions
///
/// The gradient is `J (J^T J)^{-1} grad_ref`, a vector tangent to the cell.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceGradient {
    geometry_dim: usize,
}

impl SurfaceGradient {
    /// Create the surface gradient for a grid embedded in `geometry_dim` dimensions
    pub fn new(geometry_dim: usize) -> Self {
        Self { geometry_dim }
    }
}

impl ShapeTransformation for SurfaceGradient {
    fn codomain_dimension(&self) -> usize {
        self.geometry_dim
    }

    fn add_dependencies(
        &self,
        basis_deps: &mut BasisDependencies,
        geom_deps: &mut GeometryDependencies,
    ) {
        basis_deps.derivatives = true;
        geom_deps.jacobians = true;
    }

    fn evaluate<T: RlstScalar>(
        &self,
        basis: &BasisData<T>,
        geometry: &GeometricalData<T::Real>,
        result: &mut RlstArray<T, 3>,
    ) {
        let [_, tdim, nfun, npts] = basis.derivatives.shape();
        let gdim = self.geometry_dim;
        debug_assert_eq!(geometry.geometry_dim(), gdim);
        let zero = <T::Real as num::Zero>::zero();
        for p in 0..npts {
            let jac = |i: usize, a: usize| *geometry.jacobians.get([i, a, p]).unwrap();

            // Inverse of the metric tensor J^T J
            let mut g = [[zero; 2]; 2];
            for (a, row) in g.iter_mut().enumerate().take(tdim) {
                for (b, entry) in row.iter_mut().enumerate().take(tdim) {
                    *entry = (0..gdim).fold(zero, |acc, i| acc + jac(i, a) * jac(i, b));
                }
            }
            let ginv = if tdim == 1 {
                [[<T::Real as num::One>::one() / g[0][0], zero], [zero, zero]]
            } else {
                let det = g[0][0] * g[1][1] - g[0][1] * g[1][0];
                [[g[1][1] / det, -g[0][1] / det], [-g[1][0] / det, g[0][0] / det]]
            };

            for f in 0..nfun {
                for i in 0..gdim {
                    let mut value = T::zero();
                    for a in 0..tdim {
                        for b in 0..tdim {
                            value += T::from_real(jac(i, a) * ginv[a][b])
                                * *basis.derivatives.get([0, b, f, p]).unwrap();
                        }
                    }
                    *result.get_mut([i, f, p]).unwrap() = value;
                }
            }
        }
    }
}
