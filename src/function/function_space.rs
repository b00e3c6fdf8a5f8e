//! Serial function space

use crate::element::LagrangeElement;
use crate::function::ScalarFunctionValue;
use crate::traits::{ElementFamily, FiniteElement, FunctionSpace, Grid};
use crate::types::{Error, ReferenceCellType, Result};
use log::debug;
use rlst::RlstScalar;
use std::sync::Arc;

type DofList = Vec<Vec<usize>>;

/// Assign global DOF numbers to the cells of a grid
///
/// DOFs associated with a vertex are shared by all cells containing the vertex; DOFs associated
/// with the interior of a cell belong to that cell only.
pub(crate) fn assign_dofs<G: Grid, E: FiniteElement>(
    grid: &G,
    elements: &[E],
    element_keys: &[usize],
) -> (DofList, usize) {
    let mut size = 0;
    let tdim = grid.topology_dim();
    let mut vertex_dofs = vec![vec![]; grid.vertex_count()];
    let mut cell_dofs = vec![vec![]; grid.cell_count()];

    for (cell, dofs) in cell_dofs.iter_mut().enumerate() {
        let element = &elements[element_keys[cell]];
        *dofs = vec![0; element.dim()];

        // Assign DOFs to vertices
        for (i, v) in grid.cell_vertices(cell).iter().enumerate() {
            let e_dofs = element.entity_dofs(0, i).unwrap_or(&[]);
            if !e_dofs.is_empty() {
                if vertex_dofs[*v].is_empty() {
                    for _ in e_dofs {
                        vertex_dofs[*v].push(size);
                        size += 1;
                    }
                }
                for (local_dof, dof) in e_dofs.iter().zip(&vertex_dofs[*v]) {
                    dofs[*local_dof] = *dof;
                }
            }
        }

        debug_assert!(tdim < 2 || (0..grid.cell_vertices(cell).len()).all(|e| element
            .entity_dofs(1, e)
            .map_or(true, |d| d.is_empty())));

        // Assign DOFs to the interior of the cell
        for local_dof in element.entity_dofs(tdim, 0).unwrap() {
            dofs[*local_dof] = size;
            size += 1;
        }
    }
    (cell_dofs, size)
}

/// A function space on a single process
pub struct SerialFunctionSpace<T: RlstScalar, G: Grid<T = T::Real>> {
    grid: Arc<G>,
    elements: Vec<LagrangeElement<T::Real>>,
    element_keys: Vec<usize>,
    cell_dofs: DofList,
    size: usize,
    dofs_assigned: bool,
    transformation: ScalarFunctionValue,
}

impl<T: RlstScalar, G: Grid<T = T::Real>> SerialFunctionSpace<T, G> {
    /// Create a function space and number its DOFs
    pub fn new(
        grid: Arc<G>,
        e_family: &impl ElementFamily<T = T::Real, FiniteElement = LagrangeElement<T::Real>>,
    ) -> Result<Self> {
        let mut space = Self::new_unassigned(grid, e_family)?;
        space.assign_dofs();
        Ok(space)
    }

    /// Create a function space whose DOFs have not been numbered yet
    ///
    /// The space cannot be used for grid functions or assembly until [Self::assign_dofs] is called.
    pub fn new_unassigned(
        grid: Arc<G>,
        e_family: &impl ElementFamily<T = T::Real, FiniteElement = LagrangeElement<T::Real>>,
    ) -> Result<Self> {
        let cell_types: Vec<ReferenceCellType> = grid.cell_types().to_vec();
        let elements = cell_types
            .iter()
            .map(|ct| e_family.element(*ct))
            .collect::<Result<Vec<_>>>()?;
        let element_keys = (0..grid.cell_count())
            .map(|cell| {
                let ct = grid.cell_type(cell);
                cell_types.iter().position(|c| *c == ct).ok_or_else(|| {
                    Error::InvalidArgument(format!("grid does not list cell type {ct:?}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            grid,
            elements,
            element_keys,
            cell_dofs: vec![],
            size: 0,
            dofs_assigned: false,
            transformation: ScalarFunctionValue,
        })
    }

    /// Number the DOFs of the space
    pub fn assign_dofs(&mut self) {
        if self.dofs_assigned {
            return;
        }
        let (cell_dofs, size) = assign_dofs(self.grid.as_ref(), &self.elements, &self.element_keys);
        debug!(
            "Assigned {size} DOFs on {} cells",
            self.grid.cell_count()
        );
        self.cell_dofs = cell_dofs;
        self.size = size;
        self.dofs_assigned = true;
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> FunctionSpace for SerialFunctionSpace<T, G> {
    type T = T;
    type Grid = G;
    type FiniteElement = LagrangeElement<T::Real>;
    type Transformation = ScalarFunctionValue;

    fn grid(&self) -> &G {
        &self.grid
    }
    fn dofs_assigned(&self) -> bool {
        self.dofs_assigned
    }
    fn global_size(&self) -> usize {
        self.size
    }
    fn cell_dofs(&self, cell: usize) -> Option<&[usize]> {
        self.cell_dofs.get(cell).map(|d| d.as_slice())
    }
    fn element_key(&self, cell: usize) -> usize {
        self.element_keys[cell]
    }
    fn element(&self, key: usize) -> &LagrangeElement<T::Real> {
        &self.elements[key]
    }
    fn shape_function_value(&self) -> &ScalarFunctionValue {
        &self.transformation
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::LagrangeElementFamily;
    use crate::grid::shapes::{regular_sphere, screen_quadrilaterals, screen_triangles};
    use crate::grid::SurfaceGrid;
    use crate::types::Continuity;
    use paste::paste;

    fn check_dofs(space: &SerialFunctionSpace<f64, SurfaceGrid<f64>>, continuity: Continuity) {
        let grid = space.grid();
        let mut seen = vec![0; space.global_size()];
        for cell in 0..grid.cell_count() {
            let dofs = space.cell_dofs(cell).unwrap();
            assert_eq!(dofs.len(), space.cell_element(cell).dim());
            for d in dofs {
                assert!(*d < space.global_size());
                seen[*d] += 1;
            }
        }
        assert!(seen.iter().all(|s| *s > 0));
        if continuity == Continuity::Discontinuous {
            assert!(seen.iter().all(|s| *s == 1));
        }
    }

    macro_rules! test_space {
        ($grid:ident, $degree:expr, $continuity:ident, $size:expr) => {
            paste! {
                #[test]
                fn [<test_ $grid _ $degree _ $continuity:lower>]() {
                    let grid = Arc::new($grid::<f64>(2).unwrap());
                    let family = LagrangeElementFamily::<f64>::new($degree, Continuity::[<$continuity>]);
                    let space = SerialFunctionSpace::<f64, _>::new(grid, &family).unwrap();
                    assert!(space.dofs_assigned());
                    assert_eq!(space.global_size(), $size);
                    check_dofs(&space, Continuity::[<$continuity>]);
                }
            }
        };
    }

    test_space!(screen_triangles, 0, Discontinuous, 8);
    test_space!(screen_triangles, 1, Continuous, 9);
    test_space!(screen_triangles, 1, Discontinuous, 24);
    test_space!(screen_quadrilaterals, 0, Discontinuous, 4);
    test_space!(screen_quadrilaterals, 1, Continuous, 9);
    test_space!(screen_quadrilaterals, 1, Discontinuous, 16);

    #[test]
    fn test_unassigned() {
        let grid = Arc::new(regular_sphere::<f64>(1).unwrap());
        let family = LagrangeElementFamily::<f64>::new(1, Continuity::Continuous);
        let mut space = SerialFunctionSpace::<f64, _>::new_unassigned(grid, &family).unwrap();
        assert!(!space.dofs_assigned());
        assert!(space.cell_dofs(0).is_none());
        space.assign_dofs();
        assert!(space.dofs_assigned());
        assert_eq!(space.global_size(), 18);
        assert_eq!(space.codomain_dimension(), 1);
    }

    #[test]
    fn test_invalid_family() {
        let grid = Arc::new(screen_triangles::<f64>(1).unwrap());
        let family = LagrangeElementFamily::<f64>::new(0, Continuity::Continuous);
        assert!(SerialFunctionSpace::<f64, _>::new(grid, &family).is_err());
    }
}
