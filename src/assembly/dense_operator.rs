//! Dense discrete operators

use crate::traits::DiscreteOperator;
use crate::types::{Error, Result, RlstArray, TransMode};
use rlst::{
    empty_array, rlst_array_from_slice2, rlst_dynamic_array2, MatrixInverse, MultIntoResize,
    RawAccess, RawAccessMut, RlstScalar, Shape,
};

/// A discrete operator stored as a dense matrix
pub struct DenseMatrixOperator<T: RlstScalar> {
    matrix: RlstArray<T, 2>,
}

impl<T: RlstScalar> DenseMatrixOperator<T> {
    /// Create an operator from a matrix
    pub fn new(matrix: RlstArray<T, 2>) -> Self {
        Self { matrix }
    }

    /// The matrix of the operator
    pub fn matrix(&self) -> &RlstArray<T, 2> {
        &self.matrix
    }

    fn transpose(&self) -> RlstArray<T, 2> {
        let [m, n] = self.matrix.shape();
        let mut out = rlst_dynamic_array2!(T, [n, m]);
        out.fill_from(self.matrix.view().transpose());
        out
    }

    fn conj_transpose(&self) -> RlstArray<T, 2> {
        let mut out = self.transpose();
        out.data_mut().iter_mut().for_each(|v| *v = v.conj());
        out
    }
}

fn inverse<T: RlstScalar + MatrixInverse>(mut a: RlstArray<T, 2>) -> Result<RlstArray<T, 2>> {
    a.view_mut()
        .into_inverse_alloc()
        .map_err(|e| Error::LinearAlgebra(format!("{e:?}")))?;
    Ok(a)
}

impl<T: RlstScalar + MatrixInverse> DenseMatrixOperator<T> {
    /// The Moore-Penrose pseudoinverse of a full rank operator
    ///
    /// Square matrices are inverted; rectangular matrices use the normal equations.
    pub fn pseudoinverse(&self) -> Result<Self> {
        let [m, n] = self.matrix.shape();
        let matrix = if m == n {
            let mut copy = rlst_dynamic_array2!(T, [m, n]);
            copy.fill_from(self.matrix.view());
            inverse(copy)?
        } else if m > n {
            let ah = self.conj_transpose();
            let aha = empty_array::<T, 2>().simple_mult_into_resize(ah.view(), self.matrix.view());
            empty_array::<T, 2>().simple_mult_into_resize(inverse(aha)?.view(), ah.view())
        } else {
            let ah = self.conj_transpose();
            let aah = empty_array::<T, 2>().simple_mult_into_resize(self.matrix.view(), ah.view());
            empty_array::<T, 2>().simple_mult_into_resize(ah.view(), inverse(aah)?.view())
        };
        Ok(Self { matrix })
    }
}

impl<T: RlstScalar> DiscreteOperator for DenseMatrixOperator<T> {
    type T = T;

    fn shape(&self) -> [usize; 2] {
        self.matrix.shape()
    }

    fn apply(&self, trans: TransMode, x: &[T], y: &mut [T], alpha: T, beta: T) -> Result<()> {
        let [m, n] = self.matrix.shape();
        let (rows, cols) = match trans {
            TransMode::NoTrans => (m, n),
            TransMode::Trans | TransMode::ConjTrans => (n, m),
        };
        if x.len() != cols {
            return Err(Error::InvalidArgument(format!(
                "input vector has length {} but operator has {cols} columns",
                x.len()
            )));
        }
        if y.len() != rows {
            return Err(Error::InvalidArgument(format!(
                "output vector has length {} but operator has {rows} rows",
                y.len()
            )));
        }

        let x = rlst_array_from_slice2!(x, [cols, 1]);
        let product = match trans {
            TransMode::NoTrans => {
                empty_array::<T, 2>().simple_mult_into_resize(self.matrix.view(), x.view())
            }
            TransMode::Trans => {
                empty_array::<T, 2>().simple_mult_into_resize(self.transpose().view(), x.view())
            }
            TransMode::ConjTrans => empty_array::<T, 2>()
                .simple_mult_into_resize(self.conj_transpose().view(), x.view()),
        };
        for (yi, pi) in y.iter_mut().zip(product.data()) {
            *yi = if beta == T::zero() {
                alpha * *pi
            } else {
                alpha * *pi + beta * *yi
            };
        }
        Ok(())
    }
}
