//! Grid functions
use crate::assembly::common::{cell_dofs, check_dofs_assigned, equal_grids};
use crate::assembly::{calculate_projections, Context};
use crate::function::dual_data::DualData;
use crate::traits::{DiscreteOperator, Function, FunctionSpace, Grid};
use crate::types::{Error, Result, TransMode, VectorKind};
use log::debug;
use num::{One, Zero};
use rlst::MatrixInverse;
use std::cell::RefCell;
use std::sync::Arc;

/// A function on a grid, given by its coefficients in a space or its projections onto a dual space
///
/// Either representation is computed from the other when it is first needed, using the identity
/// operator from the space to the dual space, and then cached. The cache is not synchronised, so a
/// grid function must not be shared between threads.
pub struct GridFunction<Space: FunctionSpace> {
    pub(crate) context: Arc<Context<Space::T>>,
    pub(crate) space: Arc<Space>,
    pub(crate) dual_space: Arc<Space>,
    data: RefCell<DualData<Space::T>>,
}

impl<Space: FunctionSpace> Clone for GridFunction<Space> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            space: self.space.clone(),
            dual_space: self.dual_space.clone(),
            data: RefCell::new(self.data.borrow().clone()),
        }
    }
}

fn check_length(length: usize, expected: usize, name: &str) -> Result<()> {
    if length == expected {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{name} vector has length {length} but {expected} is needed"
        )))
    }
}

impl<Space: FunctionSpace> GridFunction<Space>
where
    Space::T: MatrixInverse,
{
    fn check_spaces(space: &Space, dual_space: &Space) -> Result<()> {
        if !equal_grids(space.grid(), dual_space.grid()) {
            return Err(Error::InvalidArgument(
                "Space and dual space must be defined on the same grid".to_string(),
            ));
        }
        check_dofs_assigned(space, "space")?;
        check_dofs_assigned(dual_space, "dual space")
    }

    pub(crate) fn from_parts(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        coefficients: Vec<Space::T>,
        projections: Vec<Space::T>,
    ) -> Self {
        Self {
            context,
            space,
            dual_space,
            data: RefCell::new(DualData::Both {
                coefficients: coefficients.into(),
                projections: projections.into(),
            }),
        }
    }

    /// Create a grid function from its coefficients or its projections
    pub fn new(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        data: Vec<Space::T>,
        kind: VectorKind,
    ) -> Result<Self> {
        Self::check_spaces(&space, &dual_space)?;
        let data = match kind {
            VectorKind::Coefficients => {
                check_length(data.len(), space.global_size(), "Coefficient")?;
                DualData::Coefficients(data.into())
            }
            VectorKind::Projections => {
                check_length(data.len(), dual_space.global_size(), "Projection")?;
                DualData::Projections(data.into())
            }
        };
        Ok(Self {
            context,
            space,
            dual_space,
            data: RefCell::new(data),
        })
    }

    /// Create a grid function from its coefficients in `space`
    pub fn from_coefficients(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        coefficients: Vec<Space::T>,
    ) -> Result<Self> {
        Self::new(context, space, dual_space, coefficients, VectorKind::Coefficients)
    }

    /// Create a grid function from its projections onto `dual_space`
    pub fn from_projections(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        projections: Vec<Space::T>,
    ) -> Result<Self> {
        Self::new(context, space, dual_space, projections, VectorKind::Projections)
    }

    /// Create a grid function from both representations
    ///
    /// The two vectors are assumed to describe the same function; this is not checked.
    pub fn from_coefficients_and_projections(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        coefficients: Vec<Space::T>,
        projections: Vec<Space::T>,
    ) -> Result<Self> {
        Self::check_spaces(&space, &dual_space)?;
        check_length(coefficients.len(), space.global_size(), "Coefficient")?;
        check_length(projections.len(), dual_space.global_size(), "Projection")?;
        Ok(Self::from_parts(
            context,
            space,
            dual_space,
            coefficients,
            projections,
        ))
    }

    /// Create a grid function by projecting a function onto `dual_space`
    pub fn from_function(
        context: Arc<Context<Space::T>>,
        space: Arc<Space>,
        dual_space: Arc<Space>,
        function: &impl Function<T = Space::T>,
    ) -> Result<Self> {
        Self::check_spaces(&space, &dual_space)?;
        let assembler = context.grid_function_assembler(dual_space.as_ref(), function)?;
        let projections = calculate_projections(dual_space.as_ref(), &assembler)?;
        Ok(Self {
            context,
            space,
            dual_space,
            data: RefCell::new(DualData::Projections(projections.into())),
        })
    }

    /// The context used to create operators
    pub fn context(&self) -> &Arc<Context<Space::T>> {
        &self.context
    }

    /// The space the coefficients are expanded in
    pub fn space(&self) -> &Arc<Space> {
        &self.space
    }

    /// The space the projections are taken against
    pub fn dual_space(&self) -> &Arc<Space> {
        &self.dual_space
    }

    /// The grid
    pub fn grid(&self) -> &Space::Grid {
        self.space.grid()
    }

    /// Number of components of the function's values
    pub fn codomain_dimension(&self) -> usize {
        self.space.codomain_dimension()
    }

    /// The coefficients of the function in the space
    pub fn coefficients(&self) -> Result<Arc<[Space::T]>> {
        if let Some(c) = self.data.borrow().coefficients() {
            return Ok(c.clone());
        }

        debug!("Computing coefficients from projections");
        let data = self.data.borrow().with_coefficients(|projections| {
            let pinv = self
                .context
                .pseudoinverse_identity_operator(self.space.as_ref(), self.dual_space.as_ref())?;
            let mut coefficients = vec![Space::T::zero(); self.space.global_size()];
            pinv.apply(
                TransMode::NoTrans,
                projections,
                &mut coefficients,
                Space::T::one(),
                Space::T::zero(),
            )?;
            Ok(coefficients)
        })?;
        let coefficients = match data.coefficients() {
            Some(c) => c.clone(),
            None => unreachable!("coefficients missing after being computed"),
        };
        *self.data.borrow_mut() = data;
        Ok(coefficients)
    }

    /// The projections of the function onto the dual space
    pub fn projections(&self) -> Result<Arc<[Space::T]>> {
        if let Some(p) = self.data.borrow().projections() {
            return Ok(p.clone());
        }

        debug!("Computing projections from coefficients");
        let data = self.data.borrow().with_projections(|coefficients| {
            let identity = self
                .context
                .identity_operator(self.space.as_ref(), self.dual_space.as_ref())?;
            let mut projections = vec![Space::T::zero(); self.dual_space.global_size()];
            identity.apply(
                TransMode::NoTrans,
                coefficients,
                &mut projections,
                Space::T::one(),
                Space::T::zero(),
            )?;
            Ok(projections)
        })?;
        let projections = match data.projections() {
            Some(p) => p.clone(),
            None => unreachable!("projections missing after being computed"),
        };
        *self.data.borrow_mut() = data;
        Ok(projections)
    }

    /// Replace the coefficients, discarding the projections
    pub fn set_coefficients(&mut self, coefficients: Vec<Space::T>) -> Result<()> {
        check_length(coefficients.len(), self.space.global_size(), "Coefficient")?;
        *self.data.get_mut() = DualData::Coefficients(coefficients.into());
        Ok(())
    }

    /// Replace the projections, discarding the coefficients
    pub fn set_projections(&mut self, projections: Vec<Space::T>) -> Result<()> {
        check_length(projections.len(), self.dual_space.global_size(), "Projection")?;
        *self.data.get_mut() = DualData::Projections(projections.into());
        Ok(())
    }

    /// The coefficients of the basis functions of a cell, in the order of the cell's local DOFs
    pub fn local_coefficients(&self, cell: usize) -> Result<Vec<Space::T>> {
        if cell >= self.grid().cell_count() {
            return Err(Error::InvalidArgument(format!(
                "Cell {cell} does not exist in a grid with {} cells",
                self.grid().cell_count()
            )));
        }
        let coefficients = self.coefficients()?;
        Ok(cell_dofs(self.space.as_ref(), cell)?
            .iter()
            .map(|dof| coefficients[*dof])
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assembly::AssemblyOptions;
    use crate::element::LagrangeElementFamily;
    use crate::function::{SerialFunctionSpace, SurfaceNormalIndependentFunction};
    use crate::grid::shapes::screen_triangles;
    use crate::grid::{SurfaceGrid, SurfaceGridBuilder};
    use crate::types::{Continuity, ReferenceCellType};
    use approx::assert_relative_eq;

    type Space = SerialFunctionSpace<f64, SurfaceGrid<f64>>;

    fn p1_space(n: usize) -> Arc<Space> {
        let grid = Arc::new(screen_triangles::<f64>(n).unwrap());
        let family = LagrangeElementFamily::<f64>::new(1, Continuity::Continuous);
        Arc::new(SerialFunctionSpace::new(grid, &family).unwrap())
    }

    fn context() -> Arc<Context<f64>> {
        Arc::new(Context::new(AssemblyOptions::default()))
    }

    #[test]
    fn test_construction_checks_lengths() {
        let space = p1_space(2);
        assert!(matches!(
            GridFunction::from_coefficients(context(), space.clone(), space.clone(), vec![1.0; 8]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            GridFunction::from_coefficients_and_projections(
                context(),
                space.clone(),
                space.clone(),
                vec![1.0; 9],
                vec![1.0; 10]
            ),
            Err(Error::InvalidArgument(_))
        ));
        assert!(GridFunction::from_projections(context(), space.clone(), space, vec![1.0; 9]).is_ok());
    }

    #[test]
    fn test_construction_checks_spaces() {
        let space = p1_space(2);
        let other = p1_space(2);
        assert!(matches!(
            GridFunction::from_coefficients(context(), space, other, vec![0.0; 9]),
            Err(Error::InvalidArgument(_))
        ));

        let grid = Arc::new(screen_triangles::<f64>(2).unwrap());
        let family = LagrangeElementFamily::<f64>::new(1, Continuity::Continuous);
        let assigned = Arc::new(Space::new(grid.clone(), &family).unwrap());
        let unassigned = Arc::new(Space::new_unassigned(grid, &family).unwrap());
        assert!(matches!(
            GridFunction::from_coefficients(context(), assigned, unassigned, vec![0.0; 9]),
            Err(Error::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let space = p1_space(2);
        let coefficients = (0..9).map(|i| i as f64).collect::<Vec<_>>();
        let f = GridFunction::from_coefficients(
            context(),
            space.clone(),
            space.clone(),
            coefficients.clone(),
        )
        .unwrap();
        let projections = f.projections().unwrap().to_vec();

        let g = GridFunction::from_projections(context(), space.clone(), space, projections).unwrap();
        for (a, b) in g.coefficients().unwrap().iter().zip(&coefficients) {
            assert_relative_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_cache() {
        let space = p1_space(2);
        let mut f = GridFunction::from_coefficients(
            context(),
            space.clone(),
            space,
            vec![1.0; 9],
        )
        .unwrap();
        let p0 = f.projections().unwrap();
        let p1 = f.projections().unwrap();
        assert!(Arc::ptr_eq(&p0, &p1));
        assert!(Arc::ptr_eq(&f.coefficients().unwrap(), &f.coefficients().unwrap()));

        f.set_coefficients(vec![2.0; 9]).unwrap();
        let p2 = f.projections().unwrap();
        assert!(!Arc::ptr_eq(&p0, &p2));
        for (a, b) in p0.iter().zip(p2.iter()) {
            assert_relative_eq!(2.0 * a, *b, epsilon = 1e-14);
        }

        assert!(matches!(f.set_projections(vec![0.0; 3]), Err(Error::InvalidArgument(_))));
        assert_eq!(&*f.coefficients().unwrap(), &[2.0; 9]);
    }

    #[test]
    fn test_clone_shares_spaces() {
        let space = p1_space(1);
        let f = GridFunction::from_coefficients(context(), space.clone(), space, vec![1.0; 4])
            .unwrap();
        let mut g = f.clone();
        assert!(Arc::ptr_eq(f.space(), g.space()));
        g.set_coefficients(vec![3.0; 4]).unwrap();
        assert_eq!(&*f.coefficients().unwrap(), &[1.0; 4]);
    }

    #[test]
    fn test_projection_of_constant_on_reference_triangle() {
        let mut b = SurfaceGridBuilder::<f64>::new(3);
        b.add_point(0, &[0.0, 0.0, 0.0]);
        b.add_point(1, &[1.0, 0.0, 0.0]);
        b.add_point(2, &[0.0, 1.0, 0.0]);
        b.add_cell(0, (&[0, 1, 2], ReferenceCellType::Triangle));
        let grid = Arc::new(b.create_grid().unwrap());
        let family = LagrangeElementFamily::<f64>::new(0, Continuity::Discontinuous);
        let space = Arc::new(SerialFunctionSpace::<f64, _>::new(grid, &family).unwrap());

        let one = SurfaceNormalIndependentFunction::new(3, 1, |_: &[f64], values: &mut [f64]| {
            values[0] = 1.0;
        });
        let f = GridFunction::from_function(context(), space.clone(), space, &one).unwrap();
        let projections = f.projections().unwrap();
        assert_eq!(projections.len(), 1);
        assert_relative_eq!(projections[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(f.coefficients().unwrap()[0], 1.0, epsilon = 1e-12);
        assert_eq!(f.local_coefficients(0).unwrap().len(), 1);
        assert!(f.local_coefficients(1).is_err());
    }
}
