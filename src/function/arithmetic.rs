//! Linear combinations of grid functions
use crate::function::GridFunction;
use crate::traits::FunctionSpace;
use crate::types::{Error, Result};
use rlst::{c32, c64, MatrixInverse, RlstScalar};
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

impl<Space: FunctionSpace> GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    fn check_compatible(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.space, &other.space) {
            Ok(())
        } else {
            Err(Error::IncompatibleSpaces(
                "grid functions must be defined on the same space".to_string(),
            ))
        }
    }

    fn combine(&self, other: &Self, op: impl Fn(Space::T, Space::T) -> Space::T) -> Result<Self> {
        self.check_compatible(other)?;
        let coefficients = self
            .coefficients()?
            .iter()
            .zip(other.coefficients()?.iter())
            .map(|(a, b)| op(*a, *b))
            .collect::<Vec<_>>();
        if !Arc::ptr_eq(&self.dual_space, &other.dual_space) {
            // Projections onto different dual spaces cannot be combined
            let function = Self::from_coefficients(
                self.context.clone(),
                self.space.clone(),
                self.dual_space.clone(),
                coefficients,
            )?;
            function.projections()?;
            return Ok(function);
        }
        let projections = self
            .projections()?
            .iter()
            .zip(other.projections()?.iter())
            .map(|(a, b)| op(*a, *b))
            .collect();
        Ok(Self::from_parts(
            self.context.clone(),
            self.space.clone(),
            self.dual_space.clone(),
            coefficients,
            projections,
        ))
    }

    fn scale(&self, scalar: Space::T) -> Result<Self> {
        let coefficients = self.coefficients()?.iter().map(|a| *a * scalar).collect();
        let projections = self.projections()?.iter().map(|a| *a * scalar).collect();
        Ok(Self::from_parts(
            self.context.clone(),
            self.space.clone(),
            self.dual_space.clone(),
            coefficients,
            projections,
        ))
    }

    /// Multiply by a real scalar
    ///
    /// For real grid functions this is the same as `self * scalar`.
    pub fn mul_real(&self, scalar: <Space::T as RlstScalar>::Real) -> Result<Self> {
        self.scale(Space::T::from_real(scalar))
    }

    /// Divide by a real scalar
    pub fn div_real(&self, scalar: <Space::T as RlstScalar>::Real) -> Result<Self> {
        self / Space::T::from_real(scalar)
    }
}

impl<Space: FunctionSpace> Add for &GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    type Output = Result<GridFunction<Space>>;

    fn add(self, other: Self) -> Self::Output {
        self.combine(other, |a, b| a + b)
    }
}

impl<Space: FunctionSpace> Sub for &GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    type Output = Result<GridFunction<Space>>;

    fn sub(self, other: Self) -> Self::Output {
        self.combine(other, |a, b| a - b)
    }
}

impl<Space: FunctionSpace> Mul<Space::T> for &GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    type Output = Result<GridFunction<Space>>;

    fn mul(self, scalar: Space::T) -> Self::Output {
        self.scale(scalar)
    }
}

impl<Space: FunctionSpace> Div<Space::T> for &GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    type Output = Result<GridFunction<Space>>;

    fn div(self, scalar: Space::T) -> Self::Output {
        if scalar == <Space::T as num::Zero>::zero() {
            Err(Error::DivideByZero)
        } else {
            self.scale(<Space::T as num::One>::one() / scalar)
        }
    }
}

macro_rules! left_scalar_mul {
    ($($dtype:ty),*) => {
        $(
            impl<Space: FunctionSpace<T = $dtype>> Mul<&GridFunction<Space>> for $dtype {
                type Output = Result<GridFunction<Space>>;

                fn mul(self, function: &GridFunction<Space>) -> Self::Output {
                    function.scale(self)
                }
            }
        )*
    };
}

left_scalar_mul!(f32, f64, c32, c64);
