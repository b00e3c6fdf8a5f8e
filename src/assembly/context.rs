//! Assembly context
use crate::assembly::identity::assemble_identity;
use crate::assembly::{AssemblyOptions, DenseMatrixOperator, GridFunctionLocalAssembler};
use crate::traits::{Function, FunctionSpace};
use crate::types::Result;
use rlst::{MatrixInverse, RlstScalar};
use std::marker::PhantomData;

/// Creates the operators and local assemblers used by grid functions
#[derive(Debug, Clone, Default)]
pub struct Context<T: RlstScalar> {
    options: AssemblyOptions,
    _t: PhantomData<T>,
}

impl<T: RlstScalar> Context<T> {
    /// Create a context
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            options,
            _t: PhantomData,
        }
    }

    /// The assembly options
    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// The weak form of the identity operator from `space` to `dual_space`
    pub fn identity_operator<TrialSpace, TestSpace>(
        &self,
        space: &TrialSpace,
        dual_space: &TestSpace,
    ) -> Result<DenseMatrixOperator<T>>
    where
        TrialSpace: FunctionSpace<T = T>,
        TestSpace: FunctionSpace<T = T>,
    {
        assemble_identity(space, dual_space, &self.options)
    }

    /// A local assembler computing the projections of `function` onto `dual_space`
    pub fn grid_function_assembler<'a, Space, F>(
        &self,
        dual_space: &'a Space,
        function: &'a F,
    ) -> Result<GridFunctionLocalAssembler<'a, Space, F>>
    where
        Space: FunctionSpace<T = T>,
        F: Function<T = T>,
    {
        GridFunctionLocalAssembler::new(dual_space, function, &self.options)
    }
}

impl<T: RlstScalar + MatrixInverse> Context<T> {
    /// The pseudoinverse of the weak form of the identity operator from `space` to `dual_space`
    ///
    /// This maps the projections of a function onto `dual_space` to its coefficients in `space`.
    pub fn pseudoinverse_identity_operator<TrialSpace, TestSpace>(
        &self,
        space: &TrialSpace,
        dual_space: &TestSpace,
    ) -> Result<DenseMatrixOperator<T>>
    where
        TrialSpace: FunctionSpace<T = T>,
        TestSpace: FunctionSpace<T = T>,
    {
        self.identity_operator(space, dual_space)?.pseudoinverse()
    }
}
