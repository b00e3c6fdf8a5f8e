//! Finite element definitions
use crate::types::{Continuity, RealScalar, ReferenceCellType, Result};
use rlst::{RandomAccessByRef, RandomAccessMut, Shape};

/// A finite element defined on a reference cell
pub trait FiniteElement: Sync {
    /// The scalar type of reference values
    type T: RealScalar;

    /// The reference cell type
    fn cell_type(&self) -> ReferenceCellType;

    /// The polynomial degree
    fn degree(&self) -> usize;

    /// Continuity across cell boundaries
    fn continuity(&self) -> Continuity;

    /// The number of basis functions
    fn dim(&self) -> usize;

    /// The value size
    fn value_size(&self) -> usize;

    /// The DOFs that are associated with a subentity of the reference cell
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]>;

    /// The shape of the array passed to `tabulate`: [derivatives, points, basis functions, components]
    fn tabulate_array_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4];

    /// Tabulate the values of the basis functions and their derivatives at a set of points
    ///
    /// `points` has shape [topology_dim, npts]. Derivative index 0 holds values, 1 + d the
    /// first derivative in reference direction d.
    fn tabulate<Array2: RandomAccessByRef<2, Item = Self::T> + Shape<2>>(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut impl RandomAccessMut<4, Item = Self::T>,
    );
}

/// A family of finite elements
pub trait ElementFamily {
    /// The scalar type of reference values
    type T: RealScalar;
    /// The finite element type
    type FiniteElement: FiniteElement<T = Self::T>;

    /// Get the element of this family on a given cell type
    fn element(&self, cell_type: ReferenceCellType) -> Result<Self::FiniteElement>;
}
