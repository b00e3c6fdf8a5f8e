//! Cell definitions

use crate::types::{RealScalar, ReferenceCellType};

/// The topological dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point => 0,
        ReferenceCellType::Interval => 1,
        ReferenceCellType::Triangle => 2,
        ReferenceCellType::Quadrilateral => 2,
        ReferenceCellType::Tetrahedron => 3,
        ReferenceCellType::Hexahedron => 3,
        ReferenceCellType::Prism => 3,
        ReferenceCellType::Pyramid => 3,
    }
}

/// The number of vertices of the cell
pub fn vertex_count(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point => 1,
        ReferenceCellType::Interval => 2,
        ReferenceCellType::Triangle => 3,
        ReferenceCellType::Quadrilateral => 4,
        ReferenceCellType::Tetrahedron => 4,
        ReferenceCellType::Hexahedron => 8,
        ReferenceCellType::Prism => 6,
        ReferenceCellType::Pyramid => 5,
    }
}

/// The cell of a given dimension with a given number of corners
pub fn from_corner_count(tdim: usize, corner_count: usize) -> Option<ReferenceCellType> {
    match (tdim, corner_count) {
        (0, 1) => Some(ReferenceCellType::Point),
        (1, 2) => Some(ReferenceCellType::Interval),
        (2, 3) => Some(ReferenceCellType::Triangle),
        (2, 4) => Some(ReferenceCellType::Quadrilateral),
        (3, 4) => Some(ReferenceCellType::Tetrahedron),
        (3, 8) => Some(ReferenceCellType::Hexahedron),
        (3, 6) => Some(ReferenceCellType::Prism),
        (3, 5) => Some(ReferenceCellType::Pyramid),
        _ => None,
    }
}

/// The vertices of the reference cell
pub fn vertices<T: RealScalar>(cell: ReferenceCellType) -> Vec<Vec<T>> {
    let zero = T::zero();
    let one = T::one();
    match cell {
        ReferenceCellType::Point => vec![vec![]],
        ReferenceCellType::Interval => vec![vec![zero], vec![one]],
        ReferenceCellType::Triangle => vec![vec![zero, zero], vec![one, zero], vec![zero, one]],
        ReferenceCellType::Quadrilateral => vec![
            vec![zero, zero],
            vec![one, zero],
            vec![zero, one],
            vec![one, one],
        ],
        ReferenceCellType::Tetrahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![zero, zero, one],
        ],
        ReferenceCellType::Hexahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![one, one, zero],
            vec![zero, zero, one],
            vec![one, zero, one],
            vec![zero, one, one],
            vec![one, one, one],
        ],
        ReferenceCellType::Prism => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![zero, zero, one],
            vec![one, zero, one],
            vec![zero, one, one],
        ],
        ReferenceCellType::Pyramid => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![one, one, zero],
            vec![zero, zero, one],
        ],
    }
}

/// The midpoint of the cell
pub fn midpoint<T: RealScalar>(cell: ReferenceCellType) -> Vec<T> {
    let half = num::cast::<f64, T>(0.5).unwrap();
    let third = T::one() / num::cast::<f64, T>(3.0).unwrap();
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![half],
        ReferenceCellType::Triangle => vec![third; 2],
        ReferenceCellType::Quadrilateral => vec![half; 2],
        ReferenceCellType::Tetrahedron => vec![T::one() / num::cast::<f64, T>(4.0).unwrap(); 3],
        ReferenceCellType::Hexahedron => vec![half; 3],
        ReferenceCellType::Prism => vec![third, third, half],
        ReferenceCellType::Pyramid => vec![
            num::cast::<f64, T>(0.4).unwrap(),
            num::cast::<f64, T>(0.4).unwrap(),
            num::cast::<f64, T>(0.2).unwrap(),
        ],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    macro_rules! test_cell {
        ($cell:ident) => {
            paste! {
                #[test]
                fn [<test_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let v = vertices::<f64>(cell);
                    assert_eq!(v.len(), vertex_count(cell));
                    for p in &v {
                        assert_eq!(p.len(), dim(cell));
                    }
                    assert_eq!(from_corner_count(dim(cell), vertex_count(cell)), Some(cell));
                    assert_eq!(midpoint::<f64>(cell).len(), dim(cell));
                }
            }
        };
    }

    test_cell!(Interval);
    test_cell!(Triangle);
    test_cell!(Quadrilateral);
    test_cell!(Tetrahedron);
    test_cell!(Hexahedron);
    test_cell!(Prism);
    test_cell!(Pyramid);

    #[test]
    fn test_midpoints() {
        assert_relative_eq!(midpoint::<f64>(ReferenceCellType::Interval)[0], 0.5);
        for x in midpoint::<f64>(ReferenceCellType::Triangle) {
            assert_relative_eq!(x, 1.0 / 3.0);
        }
        for x in midpoint::<f64>(ReferenceCellType::Quadrilateral) {
            assert_relative_eq!(x, 0.5);
        }
    }

    #[test]
    fn test_unknown_corner_count() {
        assert_eq!(from_corner_count(2, 5), None);
        assert_eq!(from_corner_count(1, 3), None);
    }
}
