//! Common utility functions
use crate::assembly::AssemblyOptions;
use crate::element::reference_cell;
use crate::function::{BasisData, BasisDependencies};
use crate::quadrature::{reference_rule, QuadratureError};
use crate::traits::{FiniteElement, FunctionSpace, Grid};
use crate::types::{Error, RealScalar, ReferenceCellType, Result, RlstArray};
use rayon::prelude::*;
use rlst::{rlst_dynamic_array2, rlst_dynamic_array4, RandomAccessMut, RlstScalar, Shape};
use std::collections::HashMap;

pub(crate) fn equal_grids<TestGrid: Grid, TrialGrid: Grid>(
    test_grid: &TestGrid,
    trial_grid: &TrialGrid,
) -> bool {
    std::ptr::addr_of!(*test_grid) as usize == std::ptr::addr_of!(*trial_grid) as usize
}

/// Check that the DOFs of a space have been numbered
pub(crate) fn check_dofs_assigned<Space: FunctionSpace>(space: &Space, name: &str) -> Result<()> {
    if space.dofs_assigned() {
        Ok(())
    } else {
        Err(Error::PreconditionViolation(format!(
            "DOFs of the {name} have not been assigned"
        )))
    }
}

/// The global DOFs of a cell
pub(crate) fn cell_dofs<Space: FunctionSpace>(space: &Space, cell: usize) -> Result<&[usize]> {
    space.cell_dofs(cell).ok_or_else(|| {
        Error::PreconditionViolation(format!("no DOFs are associated with cell {cell}"))
    })
}

/// Quadrature points and weights on each cell type of a grid
pub(crate) struct CellQuadrature<T: RealScalar> {
    rules: HashMap<ReferenceCellType, (RlstArray<T, 2>, Vec<T>)>,
}

impl<T: RealScalar> CellQuadrature<T> {
    pub(crate) fn new(cell_types: &[ReferenceCellType], options: &AssemblyOptions) -> Result<Self> {
        let mut rules = HashMap::new();
        for cell_type in cell_types {
            let npoints = options.quadrature_points(*cell_type).ok_or(Error::Quadrature(
                QuadratureError::RuleNotFound {
                    cell_type: *cell_type,
                    npoints: 0,
                },
            ))?;
            let rule = reference_rule(*cell_type, npoints)?;
            let mut points = rlst_dynamic_array2!(T, [rule.dim, rule.npoints]);
            for p in 0..rule.npoints {
                for j in 0..rule.dim {
                    *points.get_mut([j, p]).unwrap() =
                        num::cast::<f64, T>(rule.points[rule.dim * p + j]).unwrap();
                }
            }
            let weights = rule
                .weights
                .iter()
                .map(|w| num::cast::<f64, T>(*w).unwrap())
                .collect();
            rules.insert(*cell_type, (points, weights));
        }
        Ok(Self { rules })
    }

    pub(crate) fn points(&self, cell_type: ReferenceCellType) -> &RlstArray<T, 2> {
        &self.rules[&cell_type].0
    }

    pub(crate) fn weights(&self, cell_type: ReferenceCellType) -> &[T] {
        &self.rules[&cell_type].1
    }
}

/// Tabulated basis data of every element of a space at the quadrature points of its cell
pub(crate) fn tabulate_space<Space: FunctionSpace>(
    space: &Space,
    quadrature: &CellQuadrature<<Space::T as RlstScalar>::Real>,
    deps: BasisDependencies,
) -> HashMap<usize, BasisData<<Space::T as RlstScalar>::Real>> {
    let grid = space.grid();
    let mut tables = HashMap::new();
    for cell in 0..grid.cell_count() {
        let key = space.element_key(cell);
        if tables.contains_key(&key) {
            continue;
        }
        let element = space.element(key);
        let cell_type = element.cell_type();
        let points = quadrature.points(cell_type);
        let mut table = rlst_dynamic_array4!(
            <Space::T as RlstScalar>::Real,
            element.tabulate_array_shape(deps.nderivs(), points.shape()[1])
        );
        element.tabulate(points, deps.nderivs(), &mut table);
        tables.insert(
            key,
            BasisData::from_table(&table, reference_cell::dim(cell_type), deps),
        );
    }
    tables
}

/// Run `f` on batches of cells and concatenate the results in cell order
pub(crate) fn map_cell_batches<T: Send, F>(
    cells: &[usize],
    options: &AssemblyOptions,
    f: F,
) -> Result<Vec<T>>
where
    F: Fn(&[usize]) -> Result<Vec<T>> + Sync,
{
    let batch_size = usize::max(options.batch_size(), 1);
    let batches = if options.parallel() {
        cells
            .par_chunks(batch_size)
            .map(&f)
            .collect::<Result<Vec<_>>>()?
    } else {
        cells
            .chunks(batch_size)
            .map(&f)
            .collect::<Result<Vec<_>>>()?
    };
    Ok(batches.into_iter().flatten().collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_map_cell_batches_keeps_order() {
        let cells = (0..1000).collect::<Vec<_>>();
        let mut options = AssemblyOptions::default();
        options.set_batch_size(7);
        let out = map_cell_batches(&cells, &options, |batch| {
            Ok(batch.iter().map(|c| 2 * c).collect())
        })
        .unwrap();
        assert_eq!(out, cells.iter().map(|c| 2 * c).collect::<Vec<_>>());

        options.set_parallel(false);
        let out2 = map_cell_batches(&cells, &options, |batch| Ok(batch.to_vec())).unwrap();
        assert_eq!(out2, cells);
    }

    #[test]
    fn test_map_cell_batches_propagates_errors() {
        let cells = (0..100).collect::<Vec<_>>();
        let options = AssemblyOptions::default();
        let out: Result<Vec<usize>> = map_cell_batches(&cells, &options, |_| {
            Err(Error::NotImplemented("test".to_string()))
        });
        assert!(out.is_err());
    }
}
