//! Grid builder

use crate::element::reference_cell;
use crate::grid::SurfaceGrid;
use crate::types::{Error, RealScalar, ReferenceCellType, Result};
use std::collections::HashMap;

/// Grid builder for a [SurfaceGrid]
///
/// Points and cells are added with user ids; the grid numbers them in insertion order.
pub struct SurfaceGridBuilder<T: RealScalar> {
    gdim: usize,
    points: Vec<T>,
    cells: Vec<usize>,
    cell_types: Vec<ReferenceCellType>,
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
}

impl<T: RealScalar> SurfaceGridBuilder<T> {
    /// Create a builder for a grid embedded in `gdim` dimensions
    pub fn new(gdim: usize) -> Self {
        Self {
            gdim,
            points: vec![],
            cells: vec![],
            cell_types: vec![],
            point_indices_to_ids: vec![],
            point_ids_to_indices: HashMap::new(),
            cell_indices_to_ids: vec![],
            cell_ids_to_indices: HashMap::new(),
        }
    }

    /// Create a builder with space reserved for `npoints` points and `ncells` cells
    pub fn new_with_capacity(gdim: usize, npoints: usize, ncells: usize) -> Self {
        Self {
            gdim,
            points: Vec::with_capacity(npoints * gdim),
            cells: Vec::with_capacity(ncells * 4),
            cell_types: Vec::with_capacity(ncells),
            point_indices_to_ids: Vec::with_capacity(npoints),
            point_ids_to_indices: HashMap::new(),
            cell_indices_to_ids: Vec::with_capacity(ncells),
            cell_ids_to_indices: HashMap::new(),
        }
    }

    /// Add a point
    pub fn add_point(&mut self, id: usize, data: &[T]) {
        self.point_ids_to_indices
            .insert(id, self.point_indices_to_ids.len());
        self.point_indices_to_ids.push(id);
        self.points.extend_from_slice(data);
    }

    /// Add a cell given by the ids of its corner points
    pub fn add_cell(&mut self, id: usize, cell_data: (&[usize], ReferenceCellType)) {
        self.cell_ids_to_indices
            .insert(id, self.cell_indices_to_ids.len());
        self.cell_indices_to_ids.push(id);
        self.cells.extend_from_slice(cell_data.0);
        self.cell_types.push(cell_data.1);
    }

    /// Check the input and create the grid
    pub fn create_grid(self) -> Result<SurfaceGrid<T>> {
        let npts = self.point_indices_to_ids.len();
        if self.points.len() != npts * self.gdim {
            return Err(Error::InvalidArgument(format!(
                "points must have {} coordinates",
                self.gdim
            )));
        }
        if self.point_ids_to_indices.len() != npts || self.cell_ids_to_indices.len() != self.cell_types.len() {
            return Err(Error::InvalidArgument("ids must be unique".to_string()));
        }
        if self.cell_types.is_empty() {
            return Err(Error::InvalidArgument("a grid must contain at least one cell".to_string()));
        }

        let tdim = reference_cell::dim(self.cell_types[0]);
        let mut cells = Vec::with_capacity(self.cells.len());
        let mut start = 0;
        for ct in &self.cell_types {
            if !matches!(
                ct,
                ReferenceCellType::Interval
                    | ReferenceCellType::Triangle
                    | ReferenceCellType::Quadrilateral
            ) {
                return Err(Error::NotImplemented(format!("grids with {ct:?} cells")));
            }
            if reference_cell::dim(*ct) != tdim {
                return Err(Error::InvalidArgument(
                    "all cells must have the same topological dimension".to_string(),
                ));
            }
            if tdim >= self.gdim {
                return Err(Error::InvalidArgument(format!(
                    "cells of dimension {tdim} cannot form a surface in {} dimensions",
                    self.gdim
                )));
            }
            let end = start + reference_cell::vertex_count(*ct);
            if end > self.cells.len() {
                return Err(Error::InvalidArgument(format!(
                    "{ct:?} cells need {} vertices",
                    reference_cell::vertex_count(*ct)
                )));
            }
            for id in &self.cells[start..end] {
                match self.point_ids_to_indices.get(id) {
                    Some(index) => cells.push(*index),
                    None => {
                        return Err(Error::InvalidArgument(format!("unknown point id: {id}")))
                    }
                }
            }
            start = end;
        }
        if start != self.cells.len() {
            return Err(Error::InvalidArgument(
                "number of cell vertices does not match cell types".to_string(),
            ));
        }

        Ok(SurfaceGrid::new(
            self.gdim,
            tdim,
            self.points,
            cells,
            self.cell_types,
            self.point_indices_to_ids,
            self.point_ids_to_indices,
            self.cell_indices_to_ids,
            self.cell_ids_to_indices,
        ))
    }
}
