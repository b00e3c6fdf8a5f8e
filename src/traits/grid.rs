//! Grid and geometry traits
use crate::types::{RealScalar, ReferenceCellType};

/// A surface or curve grid
///
/// Cells and vertices are numbered consecutively from zero. Point arrays passed to and from a
/// grid are flat column-major slices.
pub trait Grid: Send + Sync {
    /// Scalar type of the coordinates
    type T: RealScalar;

    /// Geometry map for a set of reference points
    type GeometryMap<'a>: GeometryMap<T = Self::T>
    where
        Self: 'a;

    /// Topological dimension of the cells
    fn topology_dim(&self) -> usize;

    /// Dimension of the space the grid is embedded in
    fn geometry_dim(&self) -> usize;

    /// Number of cells
    fn cell_count(&self) -> usize;

    /// Number of vertices
    fn vertex_count(&self) -> usize;

    /// The type of a cell
    fn cell_type(&self, cell: usize) -> ReferenceCellType;

    /// The distinct cell types used in the grid
    fn cell_types(&self) -> &[ReferenceCellType];

    /// Indices of the corner vertices of a cell, in reference order
    fn cell_vertices(&self, cell: usize) -> &[usize];

    /// Coordinates of a vertex
    fn vertex(&self, index: usize) -> &[Self::T];

    /// Create a geometry map for cells of the given type
    ///
    /// `points` has shape [topology_dim, npts].
    fn geometry_map<'a>(
        &'a self,
        cell_type: ReferenceCellType,
        points: &'a [Self::T],
    ) -> Self::GeometryMap<'a>;
}

/// Map from reference points to the physical cells of a grid
pub trait GeometryMap {
    /// Scalar type
    type T: RealScalar;

    /// Number of reference points
    fn point_count(&self) -> usize;

    /// Write the physical points of a cell into `points` (shape [geometry_dim, npts])
    fn physical_points(&self, cell: usize, points: &mut [Self::T]);

    /// Write the jacobians of a cell into `jacobians` (shape [geometry_dim, topology_dim, npts])
    fn jacobians(&self, cell: usize, jacobians: &mut [Self::T]);

    /// Write jacobians, integration elements and unit normals of a cell
    ///
    /// Normals (shape [geometry_dim, npts]) are only written when the grid has codimension one.
    fn jacobians_dets_normals(
        &self,
        cell: usize,
        jacobians: &mut [Self::T],
        jdets: &mut [Self::T],
        normals: &mut [Self::T],
    );
}
