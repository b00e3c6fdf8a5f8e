//! Functions given by closures
use crate::function::{GeometricalData, GeometryDependencies};
use crate::traits::Function;
use crate::types::{Error, Result, RlstArray};
use itertools::izip;
use rlst::{RawAccess, RawAccessMut, RlstScalar, Shape};
use std::marker::PhantomData;

fn check_result_shape<T: RlstScalar>(
    result: &RlstArray<T, 2>,
    codomain_dimension: usize,
    npts: usize,
) -> Result<()> {
    if result.shape() == [codomain_dimension, npts] {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "Result array has shape {:?} but [{codomain_dimension}, {npts}] is needed",
            result.shape()
        )))
    }
}

/// A function of the global point only
///
/// The closure is called once per point with the point's coordinates and a slice to fill with
/// the function's values.
pub struct SurfaceNormalIndependentFunction<T: RlstScalar, F: Fn(&[T::Real], &mut [T]) + Sync> {
    world_dimension: usize,
    codomain_dimension: usize,
    f: F,
    _t: PhantomData<T>,
}

impl<T: RlstScalar, F: Fn(&[T::Real], &mut [T]) + Sync> SurfaceNormalIndependentFunction<T, F> {
    /// Create a function
    pub fn new(world_dimension: usize, codomain_dimension: usize, f: F) -> Self {
        Self {
            world_dimension,
            codomain_dimension,
            f,
            _t: PhantomData,
        }
    }
}

impl<T: RlstScalar, F: Fn(&[T::Real], &mut [T]) + Sync> Function
    for SurfaceNormalIndependentFunction<T, F>
{
    type T = T;

    fn world_dimension(&self) -> usize {
        self.world_dimension
    }

    fn codomain_dimension(&self) -> usize {
        self.codomain_dimension
    }

    fn add_geometrical_dependencies(&self, deps: &mut GeometryDependencies) {
        deps.globals = true;
    }

    fn evaluate(&self, geometry: &GeometricalData<T::Real>, result: &mut RlstArray<T, 2>) -> Result<()> {
        let npts = geometry.point_count();
        check_result_shape(result, self.codomain_dimension, npts)?;
        let gdim = geometry.geometry_dim();
        for (x, values) in geometry
            .globals
            .data()
            .chunks_exact(gdim)
            .zip(result.data_mut().chunks_exact_mut(self.codomain_dimension))
        {
            (self.f)(x, values);
        }
        Ok(())
    }
}

/// A function of the global point and the unit normal at that point
pub struct SurfaceNormalDependentFunction<
    T: RlstScalar,
    F: Fn(&[T::Real], &[T::Real], &mut [T]) + Sync,
> {
    world_dimension: usize,
    codomain_dimension: usize,
    f: F,
    _t: PhantomData<T>,
}

impl<T: RlstScalar, F: Fn(&[T::Real], &[T::Real], &mut [T]) + Sync>
    SurfaceNormalDependentFunction<T, F>
{
    /// Create a function
    pub fn new(world_dimension: usize, codomain_dimension: usize, f: F) -> Self {
        Self {
            world_dimension,
            codomain_dimension,
            f,
            _t: PhantomData,
        }
    }
}

impl<T: RlstScalar, F: Fn(&[T::Real], &[T::Real], &mut [T]) + Sync> Function
    for SurfaceNormalDependentFunction<T, F>
{
    type T = T;

    fn world_dimension(&self) -> usize {
        self.world_dimension
    }

    fn codomain_dimension(&self) -> usize {
        self.codomain_dimension
    }

    fn add_geometrical_dependencies(&self, deps: &mut GeometryDependencies) {
        deps.globals = true;
        deps.normals = true;
    }

    fn evaluate(&self, geometry: &GeometricalData<T::Real>, result: &mut RlstArray<T, 2>) -> Result<()> {
        let npts = geometry.point_count();
        check_result_shape(result, self.codomain_dimension, npts)?;
        let gdim = geometry.geometry_dim();
        for (x, n, values) in izip!(
            geometry.globals.data().chunks_exact(gdim),
            geometry.normals.data().chunks_exact(gdim),
            result.data_mut().chunks_exact_mut(self.codomain_dimension)
        ) {
            (self.f)(x, n, values);
        }
        Ok(())
    }
}
