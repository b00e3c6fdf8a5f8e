//! Local assembler for the projections of a function
use crate::assembly::common::{map_cell_batches, tabulate_space, CellQuadrature};
use crate::assembly::AssemblyOptions;
use crate::function::{BasisData, BasisDependencies, GeometricalData, GeometryDependencies};
use crate::traits::{Function, FunctionSpace, GeometryMap, Grid, LocalAssembler, ShapeTransformation};
use crate::types::{Error, Result};
use num::Zero;
use rlst::{rlst_dynamic_array2, rlst_dynamic_array3, RandomAccessByRef, RawAccess, RlstScalar};
use std::collections::HashMap;

/// Computes the inner products of a function with the basis functions of each cell
///
/// For a cell, entry `i` of the local vector is the integral over the cell of the `i`th basis
/// function of the dual space multiplied by the function, computed by Gauss quadrature.
pub struct GridFunctionLocalAssembler<'a, Space: FunctionSpace, F: Function<T = Space::T>> {
    dual_space: &'a Space,
    function: &'a F,
    options: AssemblyOptions,
    quadrature: CellQuadrature<<Space::T as RlstScalar>::Real>,
    tables: HashMap<usize, BasisData<<Space::T as RlstScalar>::Real>>,
    geometry_deps: GeometryDependencies,
}

impl<'a, Space: FunctionSpace, F: Function<T = Space::T>> GridFunctionLocalAssembler<'a, Space, F> {
    /// Create an assembler
    pub fn new(dual_space: &'a Space, function: &'a F, options: &AssemblyOptions) -> Result<Self> {
        let transformation = dual_space.shape_function_value();
        if function.codomain_dimension() != transformation.codomain_dimension() {
            return Err(Error::InvalidArgument(format!(
                "Function has {} components but the dual space has {}",
                function.codomain_dimension(),
                transformation.codomain_dimension()
            )));
        }
        let grid = dual_space.grid();
        if function.world_dimension() != grid.geometry_dim() {
            return Err(Error::InvalidArgument(format!(
                "Function is defined in {} dimensions but the grid is embedded in {}",
                function.world_dimension(),
                grid.geometry_dim()
            )));
        }

        let mut basis_deps = BasisDependencies::default();
        let mut geometry_deps = GeometryDependencies {
            integration_elements: true,
            ..Default::default()
        };
        transformation.add_dependencies(&mut basis_deps, &mut geometry_deps);
        function.add_geometrical_dependencies(&mut geometry_deps);

        let quadrature = CellQuadrature::new(grid.cell_types(), options)?;
        let tables = tabulate_space(dual_space, &quadrature, basis_deps);
        Ok(Self {
            dual_space,
            function,
            options: options.clone(),
            quadrature,
            tables,
            geometry_deps,
        })
    }

    fn local_weak_form(&self, cell: usize) -> Result<Vec<Space::T>> {
        let grid = self.dual_space.grid();
        let transformation = self.dual_space.shape_function_value();
        let cell_type = grid.cell_type(cell);
        let points = self.quadrature.points(cell_type);
        let weights = self.quadrature.weights(cell_type);
        let map = grid.geometry_map(cell_type, points.data());
        let npts = map.point_count();
        let mut geometry = GeometricalData::new(grid.geometry_dim(), grid.topology_dim(), npts);
        geometry.compute(&map, cell, self.geometry_deps);

        let basis = &self.tables[&self.dual_space.element_key(cell)];
        let nfun = basis.function_count();
        let ncomponents = transformation.codomain_dimension();
        let mut test_values =
            rlst_dynamic_array3!(<Space::T as RlstScalar>::Real, [ncomponents, nfun, npts]);
        transformation.evaluate(basis, &geometry, &mut test_values);

        let mut function_values = rlst_dynamic_array2!(Space::T, [ncomponents, npts]);
        self.function.evaluate(&geometry, &mut function_values)?;

        let mut local = vec![Space::T::zero(); nfun];
        for (p, w) in weights.iter().enumerate() {
            let jw = Space::T::from_real(*w * geometry.integration_elements[p]);
            for (i, entry) in local.iter_mut().enumerate() {
                for c in 0..ncomponents {
                    *entry += jw
                        * Space::T::from_real(*test_values.get([c, i, p]).unwrap()).conj()
                        * *function_values.get([c, p]).unwrap();
                }
            }
        }
        Ok(local)
    }
}

impl<Space: FunctionSpace, F: Function<T = Space::T>> LocalAssembler
    for GridFunctionLocalAssembler<'_, Space, F>
{
    type T = Space::T;

    fn evaluate_local_weak_forms(&self, cells: &[usize]) -> Result<Vec<Vec<Self::T>>> {
        map_cell_batches(cells, &self.options, |batch| {
            batch
                .iter()
                .map(|cell| self.local_weak_form(*cell))
                .collect()
        })
    }
}
