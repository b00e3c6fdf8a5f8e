//! Evaluation of grid functions at cell midpoints and vertices
use crate::assembly::common::{cell_dofs, map_cell_batches};
use crate::element::reference_cell;
use crate::function::{BasisData, BasisDependencies, GeometricalData, GeometryDependencies, GridFunction};
use crate::traits::{DataWriter, FiniteElement, FunctionSpace, Grid, ShapeTransformation};
use crate::types::{Error, Result, RlstArray, SpecialPoints};
use log::{debug, warn};
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, rlst_dynamic_array4, MatrixInverse, RandomAccessMut,
    RawAccess, RlstScalar,
};
use std::collections::BTreeMap;

impl<Space: FunctionSpace> GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    /// Evaluate the function at special points
    ///
    /// The result has shape [codomain_dimension, N]. For [SpecialPoints::Cell], N is the number of
    /// cells and each column is the value at the cell's midpoint. For [SpecialPoints::Vertex], N is
    /// the number of vertices and each column is the mean of the values at the vertex in every
    /// cell containing it.
    pub fn evaluate_at_special_points(&self, kind: SpecialPoints) -> Result<RlstArray<Space::T, 2>> {
        self.evaluate_transformation_at_special_points(self.space.shape_function_value(), kind)
    }

    /// Evaluate a transformation of the function at special points
    pub fn evaluate_transformation_at_special_points<Transformation: ShapeTransformation>(
        &self,
        transformation: &Transformation,
        kind: SpecialPoints,
    ) -> Result<RlstArray<Space::T, 2>> {
        let coefficients = self.coefficients()?;
        let space = self.space.as_ref();
        let grid = space.grid();
        let tdim = grid.topology_dim();
        let gdim = grid.geometry_dim();
        let ncomponents = transformation.codomain_dimension();
        let options = self.context.options();

        let mut basis_deps = BasisDependencies::default();
        let mut geometry_deps = GeometryDependencies::default();
        transformation.add_dependencies(&mut basis_deps, &mut geometry_deps);

        // Cells sharing a basis and a shape share the reference data
        let mut groups = BTreeMap::<(usize, usize), Vec<usize>>::new();
        for cell in 0..grid.cell_count() {
            groups
                .entry((space.element_key(cell), grid.cell_vertices(cell).len()))
                .or_default()
                .push(cell);
        }
        debug!(
            "Evaluating at {kind:?} points: {} cells in {} groups",
            grid.cell_count(),
            groups.len()
        );

        let ncols = match kind {
            SpecialPoints::Cell => grid.cell_count(),
            SpecialPoints::Vertex => grid.vertex_count(),
        };
        let mut result = rlst_dynamic_array2!(Space::T, [ncomponents, ncols]);
        let mut multiplicities = vec![0usize; grid.vertex_count()];

        for ((key, corner_count), cells) in &groups {
            let cell_type = reference_cell::from_corner_count(tdim, *corner_count).ok_or(
                Error::UnsupportedElement {
                    topology_dim: tdim,
                    corner_count: *corner_count,
                },
            )?;
            let reference_points = match kind {
                SpecialPoints::Cell => vec![reference_cell::midpoint(cell_type)],
                SpecialPoints::Vertex => reference_cell::vertices(cell_type),
            };
            let reference_points: Vec<Vec<<Space::T as RlstScalar>::Real>> = reference_points;
            let npts = reference_points.len();
            let mut points = rlst_dynamic_array2!(<Space::T as RlstScalar>::Real, [tdim, npts]);
            for (p, point) in reference_points.iter().enumerate() {
                for (d, x) in point.iter().enumerate() {
                    *points.get_mut([d, p]).unwrap() = *x;
                }
            }

            let element = space.element(*key);
            let mut table = rlst_dynamic_array4!(
                <Space::T as RlstScalar>::Real,
                element.tabulate_array_shape(basis_deps.nderivs(), npts)
            );
            element.tabulate(&points, basis_deps.nderivs(), &mut table);

            let values = map_cell_batches(cells, options, |batch| {
                let map = grid.geometry_map(cell_type, points.data());
                let mut geometry = GeometricalData::new(gdim, tdim, npts);
                let mut out = Vec::with_capacity(batch.len());
                for cell in batch {
                    let local_coefficients = cell_dofs(space, *cell)?
                        .iter()
                        .map(|dof| coefficients[*dof])
                        .collect::<Vec<_>>();
                    let basis = BasisData::<Space::T>::from_table_and_coefficients(
                        &table,
                        tdim,
                        &local_coefficients,
                        basis_deps,
                    );
                    geometry.compute(&map, *cell, geometry_deps);
                    let mut cell_values = rlst_dynamic_array3!(Space::T, [ncomponents, 1, npts]);
                    transformation.evaluate(&basis, &geometry, &mut cell_values);
                    out.push(cell_values.data().to_vec());
                }
                Ok(out)
            })?;

            for (cell, cell_values) in cells.iter().zip(values) {
                match kind {
                    SpecialPoints::Cell => {
                        for (c, v) in cell_values.iter().enumerate() {
                            *result.get_mut([c, *cell]).unwrap() = *v;
                        }
                    }
                    SpecialPoints::Vertex => {
                        for (vertex, corner_values) in grid
                            .cell_vertices(*cell)
                            .iter()
                            .zip(cell_values.chunks_exact(ncomponents))
                        {
                            for (c, v) in corner_values.iter().enumerate() {
                                *result.get_mut([c, *vertex]).unwrap() += *v;
                            }
                            multiplicities[*vertex] += 1;
                        }
                    }
                }
            }
        }

        if kind == SpecialPoints::Vertex {
            let mut unused = 0;
            for (vertex, m) in multiplicities.iter().enumerate() {
                if *m == 0 {
                    unused += 1;
                    continue;
                }
                let scale = Space::T::from_real(
                    num::cast::<usize, <Space::T as RlstScalar>::Real>(*m).unwrap(),
                );
                for c in 0..ncomponents {
                    *result.get_mut([c, vertex]).unwrap() /= scale;
                }
            }
            if unused > 0 {
                warn!("{unused} vertices are not used by any cell; their values are set to zero");
            }
        }
        Ok(result)
    }

    /// Evaluate the function at special points and pass the values to a writer
    pub fn export(
        &self,
        writer: &mut impl DataWriter<Space::T>,
        kind: SpecialPoints,
        label: &str,
    ) -> Result<()> {
        let data = self.evaluate_at_special_points(kind)?;
        writer.write(&data, kind, label)
    }
}
