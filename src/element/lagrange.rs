//! Lagrange elements of degree 0 and 1

use crate::element::reference_cell;
use crate::traits::{ElementFamily, FiniteElement};
use crate::types::{Continuity, Error, RealScalar, ReferenceCellType, Result};
use rlst::{RandomAccessByRef, RandomAccessMut, Shape};
use std::marker::PhantomData;

/// A Lagrange element on an interval, triangle or quadrilateral
///
/// Degree 1 on a quadrilateral is the bilinear (Q1) element. Degree 1 DOFs are numbered like the
/// vertices of the reference cell.
#[derive(Debug, Clone)]
pub struct LagrangeElement<T: RealScalar> {
    cell_type: ReferenceCellType,
    degree: usize,
    continuity: Continuity,
    dim: usize,
    entity_dofs: [Vec<Vec<usize>>; 3],
    _t: PhantomData<T>,
}

impl<T: RealScalar> LagrangeElement<T> {
    /// Create a Lagrange element
    pub fn new(cell_type: ReferenceCellType, degree: usize, continuity: Continuity) -> Result<Self> {
        if !matches!(
            cell_type,
            ReferenceCellType::Interval
                | ReferenceCellType::Triangle
                | ReferenceCellType::Quadrilateral
        ) {
            return Err(Error::NotImplemented(format!(
                "Lagrange elements on {cell_type:?} cells"
            )));
        }
        if degree > 1 {
            return Err(Error::NotImplemented(format!(
                "Lagrange elements of degree {degree}"
            )));
        }
        if degree == 0 && continuity == Continuity::Continuous {
            return Err(Error::InvalidArgument(
                "Degree 0 Lagrange elements must be discontinuous".to_string(),
            ));
        }

        let tdim = reference_cell::dim(cell_type);
        let nvertices = reference_cell::vertex_count(cell_type);
        let dim = if degree == 0 { 1 } else { nvertices };

        let mut entity_dofs = [
            vec![vec![]; nvertices],
            vec![],
            vec![],
        ];
        if tdim == 2 {
            entity_dofs[1] = vec![vec![]; if nvertices == 3 { 3 } else { 4 }];
        }
        entity_dofs[tdim] = vec![vec![]];
        if degree == 1 && continuity == Continuity::Continuous {
            for (v, dofs) in entity_dofs[0].iter_mut().enumerate() {
                dofs.push(v);
            }
        } else {
            // All DOFs of a discontinuous element belong to the interior of the cell
            entity_dofs[tdim][0] = (0..dim).collect();
        }

        Ok(Self {
            cell_type,
            degree,
            continuity,
            dim,
            entity_dofs,
            _t: PhantomData,
        })
    }

    fn derivative_count(&self, nderivs: usize) -> usize {
        match reference_cell::dim(self.cell_type) {
            1 => nderivs + 1,
            _ => (nderivs + 1) * (nderivs + 2) / 2,
        }
    }
}

impl<T: RealScalar> FiniteElement for LagrangeElement<T> {
    type T = T;

    fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }
    fn degree(&self) -> usize {
        self.degree
    }
    fn continuity(&self) -> Continuity {
        self.continuity
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn value_size(&self) -> usize {
        1
    }
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        if entity_dim < 3 && entity_number < self.entity_dofs[entity_dim].len() {
            Some(&self.entity_dofs[entity_dim][entity_number])
        } else {
            None
        }
    }
    fn tabulate_array_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4] {
        [self.derivative_count(nderivs), npoints, self.dim, 1]
    }
    fn tabulate<Array2: RandomAccessByRef<2, Item = T> + Shape<2>>(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut impl RandomAccessMut<4, Item = T>,
    ) {
        let one = T::one();
        let zero = T::zero();
        let npts = points.shape()[1];
        for d in 0..self.derivative_count(nderivs) {
            for p in 0..npts {
                for b in 0..self.dim {
                    *data.get_mut([d, p, b, 0]).unwrap() = zero;
                }
            }
        }

        for p in 0..npts {
            if self.degree == 0 {
                *data.get_mut([0, p, 0, 0]).unwrap() = one;
                continue;
            }
            let x = *points.get([0, p]).unwrap();
            match self.cell_type {
                ReferenceCellType::Interval => {
                    *data.get_mut([0, p, 0, 0]).unwrap() = one - x;
                    *data.get_mut([0, p, 1, 0]).unwrap() = x;
                    if nderivs > 0 {
                        *data.get_mut([1, p, 0, 0]).unwrap() = -one;
                        *data.get_mut([1, p, 1, 0]).unwrap() = one;
                    }
                }
                ReferenceCellType::Triangle => {
                    let y = *points.get([1, p]).unwrap();
                    *data.get_mut([0, p, 0, 0]).unwrap() = one - x - y;
                    *data.get_mut([0, p, 1, 0]).unwrap() = x;
                    *data.get_mut([0, p, 2, 0]).unwrap() = y;
                    if nderivs > 0 {
                        *data.get_mut([1, p, 0, 0]).unwrap() = -one;
                        *data.get_mut([1, p, 1, 0]).unwrap() = one;
                        *data.get_mut([2, p, 0, 0]).unwrap() = -one;
                        *data.get_mut([2, p, 2, 0]).unwrap() = one;
                    }
                }
                ReferenceCellType::Quadrilateral => {
                    let y = *points.get([1, p]).unwrap();
                    *data.get_mut([0, p, 0, 0]).unwrap() = (one - x) * (one - y);
                    *data.get_mut([0, p, 1, 0]).unwrap() = x * (one - y);
                    *data.get_mut([0, p, 2, 0]).unwrap() = (one - x) * y;
                    *data.get_mut([0, p, 3, 0]).unwrap() = x * y;
                    if nderivs > 0 {
                        *data.get_mut([1, p, 0, 0]).unwrap() = y - one;
                        *data.get_mut([1, p, 1, 0]).unwrap() = one - y;
                        *data.get_mut([1, p, 2, 0]).unwrap() = -y;
                        *data.get_mut([1, p, 3, 0]).unwrap() = y;
                        *data.get_mut([2, p, 0, 0]).unwrap() = x - one;
                        *data.get_mut([2, p, 1, 0]).unwrap() = -x;
                        *data.get_mut([2, p, 2, 0]).unwrap() = one - x;
                        *data.get_mut([2, p, 3, 0]).unwrap() = x;
                    }
                    if nderivs > 1 {
                        // d^2/dxdy
                        *data.get_mut([4, p, 0, 0]).unwrap() = one;
                        *data.get_mut([4, p, 1, 0]).unwrap() = -one;
                        *data.get_mut([4, p, 2, 0]).unwrap() = -one;
                        *data.get_mut([4, p, 3, 0]).unwrap() = one;
                    }
                }
                _ => unreachable!(),
            }
        }
    }
}

/// Lagrange element family
pub struct LagrangeElementFamily<T: RealScalar> {
    degree: usize,
    continuity: Continuity,
    _t: PhantomData<T>,
}

impl<T: RealScalar> LagrangeElementFamily<T> {
    /// Create new family
    pub fn new(degree: usize, continuity: Continuity) -> Self {
        Self {
            degree,
            continuity,
            _t: PhantomData,
        }
    }
}

impl<T: RealScalar> ElementFamily for LagrangeElementFamily<T> {
    type T = T;
    type FiniteElement = LagrangeElement<T>;
    fn element(&self, cell_type: ReferenceCellType) -> Result<LagrangeElement<T>> {
        LagrangeElement::new(cell_type, self.degree, self.continuity)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;
    use rlst::{rlst_dynamic_array2, rlst_dynamic_array4, RandomAccessByRef, RawAccessMut};

    fn check_dofs(e: &impl FiniteElement) {
        let mut ndofs = 0;
        for (dim, entity_count) in match e.cell_type() {
            ReferenceCellType::Interval => vec![2, 1],
            ReferenceCellType::Triangle => vec![3, 3, 1],
            ReferenceCellType::Quadrilateral => vec![4, 4, 1],
            _ => panic!("Unsupported cell"),
        }
        .iter()
        .enumerate()
        {
            for entity in 0..*entity_count {
                ndofs += e.entity_dofs(dim, entity).unwrap().len();
            }
        }
        assert_eq!(ndofs, e.dim());
    }

    macro_rules! test_element {
        ($cell:ident, $degree:expr, $continuity:ident) => {
            paste! {
                #[test]
                fn [<test_lagrange_ $cell:lower _ $degree _ $continuity:lower>]() {
                    let cell_type = ReferenceCellType::[<$cell>];
                    let e = LagrangeElement::<f64>::new(cell_type, $degree, Continuity::[<$continuity>]).unwrap();
                    check_dofs(&e);

                    // Basis functions form a partition of unity and are nodal
                    let vertices = reference_cell::vertices::<f64>(cell_type);
                    let tdim = reference_cell::dim(cell_type);
                    let mut points = rlst_dynamic_array2!(f64, [tdim, vertices.len()]);
                    for (p, v) in vertices.iter().enumerate() {
                        for (j, x) in v.iter().enumerate() {
                            points.data_mut()[j + tdim * p] = *x;
                        }
                    }
                    let mut table = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, vertices.len()));
                    e.tabulate(&points, 1, &mut table);
                    for p in 0..vertices.len() {
                        let mut sum = 0.0;
                        let mut dsum = 0.0;
                        for b in 0..e.dim() {
                            sum += *table.get([0, p, b, 0]).unwrap();
                            dsum += *table.get([1, p, b, 0]).unwrap();
                            if $degree == 1 {
                                let expected = if b == p { 1.0 } else { 0.0 };
                                assert_relative_eq!(*table.get([0, p, b, 0]).unwrap(), expected);
                            }
                        }
                        assert_relative_eq!(sum, 1.0);
                        assert_relative_eq!(dsum, 0.0);
                    }
                }
            }
        };
    }

    test_element!(Interval, 0, Discontinuous);
    test_element!(Interval, 1, Continuous);
    test_element!(Triangle, 0, Discontinuous);
    test_element!(Triangle, 1, Continuous);
    test_element!(Triangle, 1, Discontinuous);
    test_element!(Quadrilateral, 0, Discontinuous);
    test_element!(Quadrilateral, 1, Continuous);
    test_element!(Quadrilateral, 1, Discontinuous);

    #[test]
    fn test_q1_derivatives() {
        let e = LagrangeElement::<f64>::new(ReferenceCellType::Quadrilateral, 1, Continuity::Continuous)
            .unwrap();
        let mut points = rlst_dynamic_array2!(f64, [2, 1]);
        points.data_mut().copy_from_slice(&[0.25, 0.5]);
        let mut table = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 1));
        e.tabulate(&points, 1, &mut table);
        // Derivatives of x y
        assert_relative_eq!(*table.get([1, 0, 3, 0]).unwrap(), 0.5);
        assert_relative_eq!(*table.get([2, 0, 3, 0]).unwrap(), 0.25);
    }

    #[test]
    fn test_invalid_elements() {
        assert!(matches!(
            LagrangeElement::<f64>::new(ReferenceCellType::Triangle, 0, Continuity::Continuous),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            LagrangeElement::<f64>::new(ReferenceCellType::Triangle, 2, Continuity::Continuous),
            Err(Error::NotImplemented(_))
        ));
        assert!(matches!(
            LagrangeElement::<f64>::new(ReferenceCellType::Tetrahedron, 1, Continuity::Continuous),
            Err(Error::NotImplemented(_))
        ));
    }

    #[test]
    fn test_family() {
        let family = LagrangeElementFamily::<f64>::new(1, Continuity::Continuous);
        let e = family.element(ReferenceCellType::Quadrilateral).unwrap();
        assert_eq!(e.dim(), 4);
        assert_eq!(e.degree(), 1);
    }
}
