extern crate blas_src;
extern crate lapack_src;

use approx::assert_relative_eq;
use bempp_gridfunction::assembly::{AssemblyOptions, Context};
use bempp_gridfunction::element::LagrangeElementFamily;
use bempp_gridfunction::function::{
    GridFunction, SerialFunctionSpace, SurfaceNormalIndependentFunction,
};
use bempp_gridfunction::grid::shapes::{regular_sphere, screen_quadrilaterals, screen_triangles};
use bempp_gridfunction::grid::{SurfaceGrid, SurfaceGridBuilder};
use bempp_gridfunction::traits::{DiscreteOperator, FunctionSpace, Grid};
use bempp_gridfunction::types::{
    Continuity, Error, ReferenceCellType, SpecialPoints, TransMode, VectorKind,
};
use paste::paste;
use rand::Rng;
use rlst::{c32, c64, RandomAccessByRef, RlstScalar, Shape};
use std::sync::Arc;

type Space<T> = SerialFunctionSpace<T, SurfaceGrid<<T as RlstScalar>::Real>>;

fn random_vector<T: RlstScalar>(n: usize) -> Vec<T> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| T::from_real(num::cast::<f64, T::Real>(rng.gen::<f64>()).unwrap()))
        .collect()
}

fn assert_close<T: RlstScalar>(a: &[T], b: &[T], tol: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        let diff = num::cast::<T::Real, f64>((*x - *y).abs()).unwrap();
        assert!(diff <= tol, "{x} and {y} differ by {diff}");
    }
}

macro_rules! grid_function_tests {
    ($dtype:ident, $grid:ident, $n:expr, $degree:expr, $continuity:ident, $tol:expr) => {
        paste! {
            fn [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]() -> (Arc<Context<$dtype>>, Arc<Space<$dtype>>) {
                let grid = Arc::new($grid::<<$dtype as RlstScalar>::Real>($n).unwrap());
                let family = LagrangeElementFamily::<<$dtype as RlstScalar>::Real>::new(
                    $degree,
                    Continuity::[<$continuity>],
                );
                let space = Arc::new(SerialFunctionSpace::new(grid, &family).unwrap());
                (Arc::new(Context::new(AssemblyOptions::default())), space)
            }

            #[test]
            fn [<test_round_trip_ $grid _ $degree _ $continuity:lower _ $dtype>]() {
                let (context, space) = [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]();
                let v = random_vector::<$dtype>(space.global_size());
                let mut f = GridFunction::new(
                    context.clone(),
                    space.clone(),
                    space.clone(),
                    vec![<$dtype as num::Zero>::zero(); space.global_size()],
                    VectorKind::Coefficients,
                )
                .unwrap();
                f.set_coefficients(v.clone()).unwrap();
                assert_eq!(&*f.coefficients().unwrap(), v.as_slice());

                // The projections are the weak form of the identity applied to the coefficients
                let identity = context.identity_operator(space.as_ref(), space.as_ref()).unwrap();
                let mut expected = vec![<$dtype as num::Zero>::zero(); space.global_size()];
                identity
                    .apply(
                        TransMode::NoTrans,
                        &v,
                        &mut expected,
                        <$dtype as num::One>::one(),
                        <$dtype as num::Zero>::zero(),
                    )
                    .unwrap();
                assert_close(&f.projections().unwrap(), &expected, $tol);

                let g = GridFunction::new(
                    context,
                    space.clone(),
                    space,
                    expected,
                    VectorKind::Projections,
                )
                .unwrap();
                assert_close(&g.coefficients().unwrap(), &v, 100.0 * $tol);
            }

            #[test]
            fn [<test_cache_ $grid _ $degree _ $continuity:lower _ $dtype>]() {
                let (context, space) = [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]();
                let mut f = GridFunction::from_coefficients(
                    context,
                    space.clone(),
                    space.clone(),
                    random_vector::<$dtype>(space.global_size()),
                )
                .unwrap();
                let c0 = f.coefficients().unwrap();
                let p0 = f.projections().unwrap();
                assert!(Arc::ptr_eq(&c0, &f.coefficients().unwrap()));
                assert!(Arc::ptr_eq(&p0, &f.projections().unwrap()));
                assert_eq!(&*p0, &*f.projections().unwrap());

                let v2 = c0
                    .iter()
                    .map(|c| *c + <$dtype as num::One>::one())
                    .collect::<Vec<_>>();
                f.set_coefficients(v2).unwrap();
                let p2 = f.projections().unwrap();
                assert!(!Arc::ptr_eq(&p0, &p2));

                let mut g = f.clone();
                g.set_projections(p0.to_vec()).unwrap();
                assert_close(&g.projections().unwrap(), &p0, 0.0);
                assert_close(&f.projections().unwrap(), &p2, 0.0);
            }

            #[test]
            fn [<test_linear_laws_ $grid _ $degree _ $continuity:lower _ $dtype>]() {
                let (context, space) = [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]();
                let f = GridFunction::from_coefficients(
                    context.clone(),
                    space.clone(),
                    space.clone(),
                    random_vector::<$dtype>(space.global_size()),
                )
                .unwrap();
                let g = GridFunction::from_projections(
                    context,
                    space.clone(),
                    space.clone(),
                    random_vector::<$dtype>(space.global_size()),
                )
                .unwrap();

                let sum = (&f + &g).unwrap();
                let expected = f
                    .coefficients()
                    .unwrap()
                    .iter()
                    .zip(g.coefficients().unwrap().iter())
                    .map(|(a, b)| *a + *b)
                    .collect::<Vec<_>>();
                assert_close(&sum.coefficients().unwrap(), &expected, 0.0);
                let expected = f
                    .projections()
                    .unwrap()
                    .iter()
                    .zip(g.projections().unwrap().iter())
                    .map(|(a, b)| *a + *b)
                    .collect::<Vec<_>>();
                assert_close(&sum.projections().unwrap(), &expected, 0.0);

                let c = <$dtype as RlstScalar>::from_real(num::cast::<f64, <$dtype as RlstScalar>::Real>(2.5).unwrap());
                let scaled = (&f * c).unwrap();
                let expected = f.coefficients().unwrap().iter().map(|a| *a * c).collect::<Vec<_>>();
                assert_close(&scaled.coefficients().unwrap(), &expected, 0.0);
                let left = (c * &f).unwrap();
                assert_close(&left.coefficients().unwrap(), &expected, 0.0);

                let difference = (&sum - &g).unwrap();
                assert_close(&difference.coefficients().unwrap(), &f.coefficients().unwrap(), 10.0 * $tol);

                assert!(matches!(&f / <$dtype as num::Zero>::zero(), Err(Error::DivideByZero)));
                let halved = (&f / c).unwrap();
                assert_close(&(&halved * c).unwrap().coefficients().unwrap(), &f.coefficients().unwrap(), $tol);
            }

            #[test]
            fn [<test_mismatched_spaces_ $grid _ $degree _ $continuity:lower _ $dtype>]() {
                let (context, space) = [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]();
                let (_, other) = [<setup_ $grid _ $degree _ $continuity:lower _ $dtype>]();
                let f = GridFunction::from_coefficients(
                    context.clone(),
                    space.clone(),
                    space.clone(),
                    random_vector::<$dtype>(space.global_size()),
                )
                .unwrap();
                let g = GridFunction::from_coefficients(
                    context,
                    other.clone(),
                    other.clone(),
                    random_vector::<$dtype>(other.global_size()),
                )
                .unwrap();
                assert!(matches!(&f + &g, Err(Error::IncompatibleSpaces(_))));
                assert!(matches!(&f - &g, Err(Error::IncompatibleSpaces(_))));
            }
        }
    };
}

grid_function_tests!(f64, screen_triangles, 3, 0, Discontinuous, 1e-10);
grid_function_tests!(f64, screen_triangles, 3, 1, Continuous, 1e-10);
grid_function_tests!(f32, screen_triangles, 2, 1, Discontinuous, 1e-3);
grid_function_tests!(c64, screen_quadrilaterals, 3, 1, Continuous, 1e-10);
grid_function_tests!(c32, screen_quadrilaterals, 2, 0, Discontinuous, 1e-3);
grid_function_tests!(f64, regular_sphere, 1, 1, Continuous, 1e-10);

#[test]
fn test_projection_of_constant_on_single_triangle() {
    let mut b = SurfaceGridBuilder::<f64>::new(3);
    b.add_point(0, &[0.0, 0.0, 0.0]);
    b.add_point(1, &[1.0, 0.0, 0.0]);
    b.add_point(2, &[0.0, 1.0, 0.0]);
    b.add_cell(0, (&[0, 1, 2], ReferenceCellType::Triangle));
    let grid = Arc::new(b.create_grid().unwrap());
    let context = Arc::new(Context::new(AssemblyOptions::default()));

    let p0 = Arc::new(
        SerialFunctionSpace::<f64, _>::new(
            grid.clone(),
            &LagrangeElementFamily::new(0, Continuity::Discontinuous),
        )
        .unwrap(),
    );
    let one = SurfaceNormalIndependentFunction::new(3, 1, |_: &[f64], v: &mut [f64]| v[0] = 1.0);
    let f = GridFunction::from_function(context.clone(), p0.clone(), p0, &one).unwrap();
    assert_relative_eq!(f.projections().unwrap()[0], 0.5, epsilon = 1e-14);

    // Each P1 hat function integrates to 1/6 on the reference triangle
    let p1 = Arc::new(
        SerialFunctionSpace::<f64, _>::new(grid, &LagrangeElementFamily::new(1, Continuity::Continuous))
            .unwrap(),
    );
    let g = GridFunction::from_function(context, p1.clone(), p1, &one).unwrap();
    for p in g.projections().unwrap().iter() {
        assert_relative_eq!(*p, 1.0 / 6.0, epsilon = 1e-14);
    }
    for c in g.coefficients().unwrap().iter() {
        assert_relative_eq!(*c, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_projection_then_evaluation_recovers_linear_function() {
    let grid = Arc::new(screen_triangles::<f64>(4).unwrap());
    let space = Arc::new(
        SerialFunctionSpace::<f64, _>::new(grid, &LagrangeElementFamily::new(1, Continuity::Continuous))
            .unwrap(),
    );
    let context = Arc::new(Context::new(AssemblyOptions::default()));
    let f = SurfaceNormalIndependentFunction::new(3, 1, |x: &[f64], v: &mut [f64]| {
        v[0] = 1.0 + x[0] - 2.0 * x[1];
    });
    let g = GridFunction::from_function(context, space.clone(), space.clone(), &f).unwrap();
    let values = g.evaluate_at_special_points(SpecialPoints::Vertex).unwrap();
    let grid = space.grid();
    for v in 0..grid.vertex_count() {
        let x = grid.vertex(v);
        assert_relative_eq!(
            *values.get([0, v]).unwrap(),
            1.0 + x[0] - 2.0 * x[1],
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_vertex_averaging_across_shared_edge() {
    let mut b = SurfaceGridBuilder::<f64>::new(3);
    b.add_point(10, &[0.0, 0.0, 0.0]);
    b.add_point(11, &[1.0, 0.0, 0.0]);
    b.add_point(12, &[0.0, 1.0, 0.0]);
    b.add_point(13, &[1.0, 1.0, 0.0]);
    b.add_cell(0, (&[10, 11, 12], ReferenceCellType::Triangle));
    b.add_cell(1, (&[11, 13, 12], ReferenceCellType::Triangle));
    let grid = Arc::new(b.create_grid().unwrap());
    let context = Arc::new(Context::new(AssemblyOptions::default()));
    let space = Arc::new(
        SerialFunctionSpace::<f64, _>::new(grid, &LagrangeElementFamily::new(1, Continuity::Discontinuous))
            .unwrap(),
    );

    // The same value in both triangles is reproduced exactly
    let f = GridFunction::from_coefficients(context.clone(), space.clone(), space.clone(), vec![0.7; 6])
        .unwrap();
    let values = f.evaluate_at_special_points(SpecialPoints::Vertex).unwrap();
    for v in 0..4 {
        assert_eq!(*values.get([0, v]).unwrap(), 0.7);
    }

    // Different values at a shared vertex give their mean
    let mut coefficients = vec![0.0; 6];
    for (i, dof) in space.cell_dofs(0).unwrap().iter().enumerate() {
        coefficients[*dof] = [1.0, 2.0, 3.0][i];
    }
    for (i, dof) in space.cell_dofs(1).unwrap().iter().enumerate() {
        coefficients[*dof] = [4.0, 5.0, 6.0][i];
    }
    let f = GridFunction::from_coefficients(context, space.clone(), space, coefficients).unwrap();
    let values = f.evaluate_at_special_points(SpecialPoints::Vertex).unwrap();
    assert_relative_eq!(*values.get([0, 0]).unwrap(), 1.0);
    assert_relative_eq!(*values.get([0, 1]).unwrap(), 3.0);
    assert_relative_eq!(*values.get([0, 2]).unwrap(), 4.5);
    assert_relative_eq!(*values.get([0, 3]).unwrap(), 5.0);
}

#[test]
fn test_sequential_and_parallel_evaluation_agree() {
    let grid = Arc::new(regular_sphere::<f64>(2).unwrap());
    let space = Arc::new(
        SerialFunctionSpace::<f64, _>::new(grid, &LagrangeElementFamily::new(1, Continuity::Discontinuous))
            .unwrap(),
    );
    let coefficients = random_vector::<f64>(space.global_size());
    let mut options = AssemblyOptions::default();
    options.set_batch_size(5);
    let parallel = GridFunction::from_coefficients(
        Arc::new(Context::new(options.clone())),
        space.clone(),
        space.clone(),
        coefficients.clone(),
    )
    .unwrap();
    options.set_parallel(false);
    let sequential = GridFunction::from_coefficients(
        Arc::new(Context::new(options)),
        space.clone(),
        space,
        coefficients,
    )
    .unwrap();

    assert_eq!(&*parallel.projections().unwrap(), &*sequential.projections().unwrap());
    let a = parallel.evaluate_at_special_points(SpecialPoints::Vertex).unwrap();
    let b = sequential.evaluate_at_special_points(SpecialPoints::Vertex).unwrap();
    for v in 0..a.shape()[1] {
        assert_eq!(a.get([0, v]).unwrap(), b.get([0, v]).unwrap());
    }
}
