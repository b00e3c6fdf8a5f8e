//! Assembly of the identity operator
use crate::assembly::common::{
    cell_dofs, check_dofs_assigned, equal_grids, map_cell_batches, tabulate_space, CellQuadrature,
};
use crate::assembly::{AssemblyOptions, DenseMatrixOperator};
use crate::function::{BasisDependencies, GeometricalData, GeometryDependencies};
use crate::traits::{FunctionSpace, GeometryMap, Grid, ShapeTransformation};
use crate::types::{Error, Result};
use log::debug;
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, RandomAccessByRef, RandomAccessMut, RawAccess,
    RlstScalar,
};

/// Assemble the weak form of the identity operator (the mass matrix)
///
/// Entry `[i, j]` is the integral over the grid of the product of the `i`th basis function of
/// `dual_space` and the `j`th basis function of `space`.
pub fn assemble_identity<T, TrialSpace, TestSpace>(
    space: &TrialSpace,
    dual_space: &TestSpace,
    options: &AssemblyOptions,
) -> Result<DenseMatrixOperator<T>>
where
    T: RlstScalar,
    TrialSpace: FunctionSpace<T = T>,
    TestSpace: FunctionSpace<T = T>,
{
    if !equal_grids(space.grid(), dual_space.grid()) {
        return Err(Error::InvalidArgument(
            "Space and dual space must be defined on the same grid".to_string(),
        ));
    }
    check_dofs_assigned(space, "space")?;
    check_dofs_assigned(dual_space, "dual space")?;

    let trial_transformation = space.shape_function_value();
    let test_transformation = dual_space.shape_function_value();
    let ncomponents = trial_transformation.codomain_dimension();
    if test_transformation.codomain_dimension() != ncomponents {
        return Err(Error::InvalidArgument(format!(
            "Cannot pair functions with {ncomponents} and {} components",
            test_transformation.codomain_dimension()
        )));
    }

    let grid = space.grid();
    let quadrature = CellQuadrature::<T::Real>::new(grid.cell_types(), options)?;
    let mut trial_deps = BasisDependencies::default();
    let mut test_deps = BasisDependencies::default();
    let mut geometry_deps = GeometryDependencies {
        integration_elements: true,
        ..Default::default()
    };
    trial_transformation.add_dependencies(&mut trial_deps, &mut geometry_deps);
    test_transformation.add_dependencies(&mut test_deps, &mut geometry_deps);
    let trial_tables = tabulate_space(space, &quadrature, trial_deps);
    let test_tables = tabulate_space(dual_space, &quadrature, test_deps);

    let cells = (0..grid.cell_count()).collect::<Vec<_>>();
    debug!(
        "Assembling identity operator: {} cells, {} x {} DOFs",
        cells.len(),
        dual_space.global_size(),
        space.global_size()
    );

    let local_matrices = map_cell_batches(&cells, options, |batch| {
        let mut out = Vec::with_capacity(batch.len());
        for cell in batch {
            let cell_type = grid.cell_type(*cell);
            let points = quadrature.points(cell_type);
            let weights = quadrature.weights(cell_type);
            let map = grid.geometry_map(cell_type, points.data());
            let npts = map.point_count();
            let mut geometry =
                GeometricalData::new(grid.geometry_dim(), grid.topology_dim(), npts);
            geometry.compute(&map, *cell, geometry_deps);

            let trial_basis = &trial_tables[&space.element_key(*cell)];
            let test_basis = &test_tables[&dual_space.element_key(*cell)];
            let ntrial = trial_basis.function_count();
            let ntest = test_basis.function_count();
            let mut trial_values = rlst_dynamic_array3!(T::Real, [ncomponents, ntrial, npts]);
            let mut test_values = rlst_dynamic_array3!(T::Real, [ncomponents, ntest, npts]);
            trial_transformation.evaluate(trial_basis, &geometry, &mut trial_values);
            test_transformation.evaluate(test_basis, &geometry, &mut test_values);

            let mut local = vec![<T::Real as num::Zero>::zero(); ntest * ntrial];
            for (p, w) in weights.iter().enumerate() {
                let jw = *w * geometry.integration_elements[p];
                for j in 0..ntrial {
                    for i in 0..ntest {
                        for c in 0..ncomponents {
                            local[i + ntest * j] += jw
                                * *test_values.get([c, i, p]).unwrap()
                                * *trial_values.get([c, j, p]).unwrap();
                        }
                    }
                }
            }
            out.push(local);
        }
        Ok(out)
    })?;

    let mut matrix = rlst_dynamic_array2!(T, [dual_space.global_size(), space.global_size()]);
    for (cell, local) in local_matrices.iter().enumerate() {
        let test_dofs = cell_dofs(dual_space, cell)?;
        let trial_dofs = cell_dofs(space, cell)?;
        for (j, trial_dof) in trial_dofs.iter().enumerate() {
            for (i, test_dof) in test_dofs.iter().enumerate() {
                *matrix.get_mut([*test_dof, *trial_dof]).unwrap() +=
                    T::from_real(local[i + test_dofs.len() * j]);
            }
        }
    }
    Ok(DenseMatrixOperator::new(matrix))
}
