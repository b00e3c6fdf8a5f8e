//! Functions defined by their values at the vertices of a grid
use crate::assembly::common::equal_grids;
use crate::function::{GeometricalData, GeometryDependencies, GridFunction};
use crate::traits::{DataWriter, Function, FunctionSpace, Grid};
use crate::types::{Error, Result, RlstArray, SpecialPoints};
use itertools::izip;
use rlst::{
    c32, c64, rlst_dynamic_array2, MatrixInverse, RawAccess, RawAccessMut, RlstScalar, Shape,
};
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

/// How values between vertices are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMethod {
    /// Linear interpolation
    #[default]
    Linear,
}

/// A function given by its values at the vertices of a grid
pub struct InterpolatedFunction<T: RlstScalar, G: Grid<T = T::Real>> {
    grid: Arc<G>,
    vertex_values: RlstArray<T, 2>,
    method: InterpolationMethod,
}

fn map_values<T: RlstScalar>(values: &RlstArray<T, 2>, f: impl Fn(T) -> T) -> RlstArray<T, 2> {
    let mut out = rlst_dynamic_array2!(T, values.shape());
    for (o, v) in out.data_mut().iter_mut().zip(values.data()) {
        *o = f(*v);
    }
    out
}

impl<T: RlstScalar, G: Grid<T = T::Real>> InterpolatedFunction<T, G> {
    /// Create a function
    ///
    /// `vertex_values` has shape [codomain_dimension, vertex_count].
    pub fn new(
        grid: Arc<G>,
        vertex_values: RlstArray<T, 2>,
        method: InterpolationMethod,
    ) -> Result<Self> {
        if vertex_values.shape()[1] != grid.vertex_count() {
            return Err(Error::InvalidArgument(format!(
                "{} vertex values given for a grid with {} vertices",
                vertex_values.shape()[1],
                grid.vertex_count()
            )));
        }
        Ok(Self {
            grid,
            vertex_values,
            method,
        })
    }

    /// The grid
    pub fn grid(&self) -> &Arc<G> {
        &self.grid
    }

    /// The values at the vertices, shape [codomain_dimension, vertex_count]
    pub fn vertex_values(&self) -> &RlstArray<T, 2> {
        &self.vertex_values
    }

    /// The interpolation method
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    fn check_compatibility(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.grid, &other.grid)
            && self.vertex_values.shape() == other.vertex_values.shape()
            && self.method == other.method
        {
            Ok(())
        } else {
            Err(Error::IncompatibleOperands(
                "interpolated functions must share their grid, shape and method".to_string(),
            ))
        }
    }

    fn with_values(&self, vertex_values: RlstArray<T, 2>) -> Self {
        Self {
            grid: self.grid.clone(),
            vertex_values,
            method: self.method,
        }
    }

    fn combine(&self, other: &Self, op: impl Fn(T, T) -> T) -> Result<Self> {
        self.check_compatibility(other)?;
        let mut values = rlst_dynamic_array2!(T, self.vertex_values.shape());
        for (v, a, b) in izip!(
            values.data_mut().iter_mut(),
            self.vertex_values.data(),
            other.vertex_values.data()
        ) {
            *v = op(*a, *b);
        }
        Ok(self.with_values(values))
    }

    fn scale(&self, scalar: T) -> Self {
        self.with_values(map_values(&self.vertex_values, |v| v * scalar))
    }

    /// Take the vertex values from a grid function on the same grid
    ///
    /// Where the grid function is discontinuous, the mean of the values in the cells around
    /// each vertex is used.
    pub fn set_surface_values<Space>(&mut self, function: &GridFunction<Space>) -> Result<()>
    where
        Space: FunctionSpace<T = T, Grid = G>,
        T: MatrixInverse,
    {
        if !equal_grids(self.grid.as_ref(), function.grid()) {
            return Err(Error::InvalidArgument(
                "grid function is defined on a different grid".to_string(),
            ));
        }
        let values = function.evaluate_at_special_points(SpecialPoints::Vertex)?;
        if values.shape() != self.vertex_values.shape() {
            return Err(Error::InvalidArgument(format!(
                "grid function values have shape {:?} but {:?} is needed",
                values.shape(),
                self.vertex_values.shape()
            )));
        }
        self.vertex_values = values;
        Ok(())
    }

    /// Copy the vertex values of a compatible interpolated function
    pub fn set_surface_values_from(&mut self, other: &Self) -> Result<()> {
        self.check_compatibility(other)?;
        self.vertex_values = map_values(&other.vertex_values, |v| v);
        Ok(())
    }

    /// Pass the vertex values to a writer
    pub fn export(&self, writer: &mut impl DataWriter<T>, label: &str) -> Result<()> {
        writer.write(&self.vertex_values, SpecialPoints::Vertex, label)
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> Function for InterpolatedFunction<T, G> {
    type T = T;

    fn world_dimension(&self) -> usize {
        self.grid.geometry_dim()
    }

    fn codomain_dimension(&self) -> usize {
        self.vertex_values.shape()[0]
    }

    fn add_geometrical_dependencies(&self, deps: &mut GeometryDependencies) {
        deps.globals = true;
    }

    fn evaluate(&self, geometry: &GeometricalData<T::Real>, _result: &mut RlstArray<T, 2>) -> Result<()> {
        if geometry.geometry_dim() != self.world_dimension() {
            return Err(Error::InvalidArgument(format!(
                "points have dimension {} but the function is defined in {} dimensions",
                geometry.geometry_dim(),
                self.world_dimension()
            )));
        }
        Err(Error::NotImplemented(
            "evaluation of interpolated functions away from vertices".to_string(),
        ))
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> Add for &InterpolatedFunction<T, G> {
    type Output = Result<InterpolatedFunction<T, G>>;

    fn add(self, other: Self) -> Self::Output {
        self.combine(other, |a, b| a + b)
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> Sub for &InterpolatedFunction<T, G> {
    type Output = Result<InterpolatedFunction<T, G>>;

    fn sub(self, other: Self) -> Self::Output {
        self.combine(other, |a, b| a - b)
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> Mul<T> for &InterpolatedFunction<T, G> {
    type Output = InterpolatedFunction<T, G>;

    fn mul(self, scalar: T) -> Self::Output {
        self.scale(scalar)
    }
}

impl<T: RlstScalar, G: Grid<T = T::Real>> Div<T> for &InterpolatedFunction<T, G> {
    type Output = Result<InterpolatedFunction<T, G>>;

    fn div(self, scalar: T) -> Self::Output {
        if scalar == T::zero() {
            Err(Error::DivideByZero)
        } else {
            Ok(self.scale(T::one() / scalar))
        }
    }
}

macro_rules! left_scalar_mul {
    ($($dtype:ty),*) => {
        $(
            impl<G: Grid<T = <$dtype as RlstScalar>::Real>> Mul<&InterpolatedFunction<$dtype, G>>
                for $dtype
            {
                type Output = InterpolatedFunction<$dtype, G>;

                fn mul(self, function: &InterpolatedFunction<$dtype, G>) -> Self::Output {
                    function.scale(self)
                }
            }
        )*
    };
}

left_scalar_mul!(f32, f64, c32, c64);
