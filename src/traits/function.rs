//! Functions and function spaces
use crate::function::{BasisData, BasisDependencies, GeometricalData, GeometryDependencies};
use crate::traits::{FiniteElement, Grid};
use crate::types::{Result, RlstArray, SpecialPoints};
use rlst::RlstScalar;

/// A function space
pub trait FunctionSpace: Sync {
    /// Scalar type of functions in the space
    type T: RlstScalar;
    /// The grid type
    type Grid: Grid<T = <Self::T as RlstScalar>::Real>;
    /// The finite element type
    type FiniteElement: FiniteElement<T = <Self::T as RlstScalar>::Real>;
    /// The map from reference basis values to the space's values
    type Transformation: ShapeTransformation;

    /// Get the grid that the space is defined on
    fn grid(&self) -> &Self::Grid;

    /// Has the global DOF numbering been computed?
    fn dofs_assigned(&self) -> bool;

    /// Get the number of DOFs
    fn global_size(&self) -> usize;

    /// Get the global DOF numbers associated with a cell
    fn cell_dofs(&self, cell: usize) -> Option<&[usize]>;

    /// Small integer identifying the local basis used on a cell
    ///
    /// Cells with the same key use the same element.
    fn element_key(&self, cell: usize) -> usize;

    /// Get the element with the given key
    fn element(&self, key: usize) -> &Self::FiniteElement;

    /// Get the element used on a cell
    fn cell_element(&self, cell: usize) -> &Self::FiniteElement {
        self.element(self.element_key(cell))
    }

    /// The transformation giving the values of basis functions
    fn shape_function_value(&self) -> &Self::Transformation;

    /// Number of components of functions in the space
    fn codomain_dimension(&self) -> usize {
        self.shape_function_value().codomain_dimension()
    }
}

/// A map from reference basis data to values on physical cells
pub trait ShapeTransformation: Sync {
    /// Number of components of the result
    fn codomain_dimension(&self) -> usize;

    /// Add the basis and geometrical data needed by `evaluate`
    fn add_dependencies(
        &self,
        basis_deps: &mut BasisDependencies,
        geom_deps: &mut GeometryDependencies,
    );

    /// Transform basis data
    ///
    /// `result` has shape [codomain_dimension, functions, points].
    fn evaluate<T: RlstScalar>(
        &self,
        basis: &BasisData<T>,
        geometry: &GeometricalData<T::Real>,
        result: &mut RlstArray<T, 3>,
    );
}

/// An analytic function on the surface
pub trait Function: Sync {
    /// Scalar type of the values
    type T: RlstScalar;

    /// Dimension of the points the function is defined at
    fn world_dimension(&self) -> usize;

    /// Number of components of the values
    fn codomain_dimension(&self) -> usize;

    /// Add the geometrical data needed by `evaluate`
    fn add_geometrical_dependencies(&self, deps: &mut GeometryDependencies);

    /// Evaluate the function at the points described by `geometry`
    ///
    /// `result` has shape [codomain_dimension, npts].
    fn evaluate(
        &self,
        geometry: &GeometricalData<<Self::T as RlstScalar>::Real>,
        result: &mut RlstArray<Self::T, 2>,
    ) -> Result<()>;
}

/// Output sink for values at special points
pub trait DataWriter<T: RlstScalar> {
    /// Write a [codomain_dimension, N] array of values
    fn write(&mut self, data: &RlstArray<T, 2>, kind: SpecialPoints, label: &str) -> Result<()>;
}
