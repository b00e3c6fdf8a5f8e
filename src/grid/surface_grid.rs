//! A grid of flat intervals, triangles and quadrilaterals

use crate::element::{reference_cell, LagrangeElement};
use crate::traits::{FiniteElement, GeometryMap, Grid};
use crate::types::{Continuity, RealScalar, ReferenceCellType, RlstArray};
use rlst::{rlst_dynamic_array2, rlst_dynamic_array4, RandomAccessByRef, RawAccessMut};
use std::collections::HashMap;

/// A grid whose cells are affine intervals or triangles, or bilinear quadrilaterals
///
/// Triangles and quadrilaterals may be mixed in one grid.
#[derive(Debug)]
pub struct SurfaceGrid<T: RealScalar> {
    gdim: usize,
    tdim: usize,
    points: Vec<T>,
    cells: Vec<usize>,
    cell_offsets: Vec<usize>,
    cell_types: Vec<ReferenceCellType>,
    distinct_cell_types: Vec<ReferenceCellType>,
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
}

impl<T: RealScalar> SurfaceGrid<T> {
    /// Create a grid
    ///
    /// The inputs are assumed to be consistent; use [crate::grid::SurfaceGridBuilder] to create
    /// grids from user data.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        gdim: usize,
        tdim: usize,
        points: Vec<T>,
        cells: Vec<usize>,
        cell_types: Vec<ReferenceCellType>,
        point_indices_to_ids: Vec<usize>,
        point_ids_to_indices: HashMap<usize, usize>,
        cell_indices_to_ids: Vec<usize>,
        cell_ids_to_indices: HashMap<usize, usize>,
    ) -> Self {
        let mut cell_offsets = Vec::with_capacity(cell_types.len() + 1);
        cell_offsets.push(0);
        for ct in &cell_types {
            cell_offsets.push(cell_offsets[cell_offsets.len() - 1] + reference_cell::vertex_count(*ct));
        }
        debug_assert_eq!(cell_offsets[cell_types.len()], cells.len());

        let mut distinct_cell_types = cell_types.clone();
        distinct_cell_types.sort();
        distinct_cell_types.dedup();

        Self {
            gdim,
            tdim,
            points,
            cells,
            cell_offsets,
            cell_types,
            distinct_cell_types,
            point_indices_to_ids,
            point_ids_to_indices,
            cell_indices_to_ids,
            cell_ids_to_indices,
        }
    }

    /// The user id of a vertex
    pub fn point_index_to_id(&self, index: usize) -> usize {
        self.point_indices_to_ids[index]
    }

    /// The index of the vertex with a given user id
    pub fn point_id_to_index(&self, id: usize) -> Option<usize> {
        self.point_ids_to_indices.get(&id).copied()
    }

    /// The user id of a cell
    pub fn cell_index_to_id(&self, index: usize) -> usize {
        self.cell_indices_to_ids[index]
    }

    /// The index of the cell with a given user id
    pub fn cell_id_to_index(&self, id: usize) -> Option<usize> {
        self.cell_ids_to_indices.get(&id).copied()
    }
}

impl<T: RealScalar> Grid for SurfaceGrid<T> {
    type T = T;
    type GeometryMap<'a> = SurfaceGeometryMap<'a, T> where Self: 'a;

    fn topology_dim(&self) -> usize {
        self.tdim
    }
    fn geometry_dim(&self) -> usize {
        self.gdim
    }
    fn cell_count(&self) -> usize {
        self.cell_types.len()
    }
    fn vertex_count(&self) -> usize {
        self.point_indices_to_ids.len()
    }
    fn cell_type(&self, cell: usize) -> ReferenceCellType {
        self.cell_types[cell]
    }
    fn cell_types(&self) -> &[ReferenceCellType] {
        &self.distinct_cell_types
    }
    fn cell_vertices(&self, cell: usize) -> &[usize] {
        &self.cells[self.cell_offsets[cell]..self.cell_offsets[cell + 1]]
    }
    fn vertex(&self, index: usize) -> &[T] {
        &self.points[index * self.gdim..(index + 1) * self.gdim]
    }
    fn geometry_map<'a>(
        &'a self,
        cell_type: ReferenceCellType,
        points: &'a [T],
    ) -> SurfaceGeometryMap<'a, T> {
        SurfaceGeometryMap::new(self, cell_type, points)
    }
}

/// Geometry map for cells of one type of a [SurfaceGrid]
pub struct SurfaceGeometryMap<'a, T: RealScalar> {
    grid: &'a SurfaceGrid<T>,
    cell_type: ReferenceCellType,
    npts: usize,
    table: RlstArray<T, 4>,
}

impl<'a, T: RealScalar> SurfaceGeometryMap<'a, T> {
    fn new(grid: &'a SurfaceGrid<T>, cell_type: ReferenceCellType, points: &'a [T]) -> Self {
        let tdim = reference_cell::dim(cell_type);
        debug_assert_eq!(tdim, grid.tdim);
        let npts = points.len() / tdim;
        // Degree 1 Lagrange basis functions are the vertex weights of the map
        let element = LagrangeElement::<T>::new(cell_type, 1, Continuity::Continuous).unwrap();
        let mut reference_points = rlst_dynamic_array2!(T, [tdim, npts]);
        reference_points.data_mut().copy_from_slice(points);
        let mut table = rlst_dynamic_array4!(T, element.tabulate_array_shape(1, npts));
        element.tabulate(&reference_points, 1, &mut table);
        Self {
            grid,
            cell_type,
            npts,
            table,
        }
    }
}

impl<T: RealScalar> GeometryMap for SurfaceGeometryMap<'_, T> {
    type T = T;

    fn point_count(&self) -> usize {
        self.npts
    }

    fn physical_points(&self, cell: usize, points: &mut [T]) {
        debug_assert_eq!(self.grid.cell_type(cell), self.cell_type);
        let gdim = self.grid.gdim;
        points.iter_mut().for_each(|p| *p = T::zero());
        for (v, vertex) in self.grid.cell_vertices(cell).iter().enumerate() {
            let coords = self.grid.vertex(*vertex);
            for p in 0..self.npts {
                let phi = *self.table.get([0, p, v, 0]).unwrap();
                for (i, c) in coords.iter().enumerate() {
                    points[i + gdim * p] += phi * *c;
                }
            }
        }
    }

    fn jacobians(&self, cell: usize, jacobians: &mut [T]) {
        debug_assert_eq!(self.grid.cell_type(cell), self.cell_type);
        let gdim = self.grid.gdim;
        let tdim = self.grid.tdim;
        jacobians.iter_mut().for_each(|j| *j = T::zero());
        for (v, vertex) in self.grid.cell_vertices(cell).iter().enumerate() {
            let coords = self.grid.vertex(*vertex);
            for p in 0..self.npts {
                for j in 0..tdim {
                    let dphi = *self.table.get([1 + j, p, v, 0]).unwrap();
                    for (i, c) in coords.iter().enumerate() {
                        jacobians[i + gdim * j + gdim * tdim * p] += dphi * *c;
                    }
                }
            }
        }
    }

    fn jacobians_dets_normals(
        &self,
        cell: usize,
        jacobians: &mut [T],
        jdets: &mut [T],
        normals: &mut [T],
    ) {
        self.jacobians(cell, jacobians);
        let gdim = self.grid.gdim;
        let tdim = self.grid.tdim;
        for p in 0..self.npts {
            let jac = &jacobians[gdim * tdim * p..gdim * tdim * (p + 1)];
            match (tdim, gdim) {
                (1, _) => {
                    jdets[p] = num::Float::sqrt(jac.iter().fold(T::zero(), |a, x| a + *x * *x));
                    if gdim == 2 {
                        normals[2 * p] = jac[1] / jdets[p];
                        normals[2 * p + 1] = -jac[0] / jdets[p];
                    }
                }
                (2, 3) => {
                    let n = [
                        jac[1] * jac[5] - jac[2] * jac[4],
                        jac[2] * jac[3] - jac[0] * jac[5],
                        jac[0] * jac[4] - jac[1] * jac[3],
                    ];
                    jdets[p] = num::Float::sqrt(n[0] * n[0] + n[1] * n[1] + n[2] * n[2]);
                    for (i, ni) in n.iter().enumerate() {
                        normals[3 * p + i] = *ni / jdets[p];
                    }
                }
                (2, 2) => {
                    jdets[p] = num::Float::abs(jac[0] * jac[3] - jac[1] * jac[2]);
                }
                _ => {
                    // sqrt(det(J^T J))
                    let mut jtj = vec![T::zero(); tdim * tdim];
                    for a in 0..tdim {
                        for b in 0..tdim {
                            for i in 0..gdim {
                                jtj[a + tdim * b] += jac[i + gdim * a] * jac[i + gdim * b];
                            }
                        }
                    }
                    jdets[p] = if tdim == 2 {
                        num::Float::sqrt(jtj[0] * jtj[3] - jtj[1] * jtj[2])
                    } else {
                        num::Float::sqrt(jtj[0])
                    };
                }
            }
        }
    }
}
