//! Regular sphere grid

use crate::grid::{SurfaceGrid, SurfaceGridBuilder};
use crate::types::{RealScalar, ReferenceCellType, Result};
use std::collections::{hash_map::Entry::Vacant, HashMap};

/// Create a regular sphere
///
/// A regular sphere is created by starting with a regular octahedron. The shape is then refined `refinement_level` times.
/// Each time the grid is refined, each triangle is split into four triangles (by adding lines connecting the midpoints of
/// each edge). The new points are then scaled so that they are a distance of 1 from the origin.
pub fn regular_sphere<T: RealScalar>(refinement_level: u32) -> Result<SurfaceGrid<T>> {
    let zero = T::zero();
    let one = T::one();
    let half = num::cast::<f64, T>(0.5).unwrap();
    let mut points = vec![
        [zero, zero, one],
        [one, zero, zero],
        [zero, one, zero],
        [-one, zero, zero],
        [zero, -one, zero],
        [zero, zero, -one],
    ];

    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for _ in 0..refinement_level {
        let mut edge_points = HashMap::new();
        let mut new_cells = Vec::with_capacity(4 * cells.len());
        for c in &cells {
            let edges = [[1, 2], [0, 2], [0, 1]]
                .iter()
                .map(|[i, j]| {
                    let pt_i = usize::min(c[*i], c[*j]);
                    let pt_j = usize::max(c[*i], c[*j]);
                    if let Vacant(e) = edge_points.entry((pt_i, pt_j)) {
                        let v_i = points[pt_i];
                        let v_j = points[pt_j];
                        let mut new_pt = [
                            half * (v_i[0] + v_j[0]),
                            half * (v_i[1] + v_j[1]),
                            half * (v_i[2] + v_j[2]),
                        ];
                        let size = num::Float::sqrt(
                            new_pt.iter().fold(zero, |a, x| a + *x * *x),
                        );
                        for x in new_pt.iter_mut() {
                            *x = *x / size;
                        }
                        e.insert(points.len());
                        points.push(new_pt);
                    }
                    edge_points[&(pt_i, pt_j)]
                })
                .collect::<Vec<_>>();
            new_cells.push([c[0], edges[2], edges[1]]);
            new_cells.push([c[1], edges[0], edges[2]]);
            new_cells.push([c[2], edges[1], edges[0]]);
            new_cells.push([edges[0], edges[1], edges[2]]);
        }
        cells = new_cells;
    }

    let mut b = SurfaceGridBuilder::new_with_capacity(3, points.len(), cells.len());
    for (i, p) in points.iter().enumerate() {
        b.add_point(i, p);
    }
    for (i, c) in cells.iter().enumerate() {
        b.add_cell(i, (c, ReferenceCellType::Triangle));
    }
    b.create_grid()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::{GeometryMap, Grid};
    use approx::assert_relative_eq;

    #[test]
    fn test_regular_spheres() {
        for level in 0..4 {
            let g = regular_sphere::<f64>(level).unwrap();
            assert_eq!(g.cell_count(), 8 * usize::pow(4, level));
            assert_eq!(g.vertex_count(), 2 + 4 * usize::pow(4, level));
        }
    }

    #[test]
    fn test_normal_is_outward() {
        for level in 0..3 {
            let g = regular_sphere::<f64>(level).unwrap();
            let points = vec![1.0 / 3.0, 1.0 / 3.0];
            let map = g.geometry_map(ReferenceCellType::Triangle, &points);
            let mut mapped = vec![0.0; 3];
            let mut jacobians = vec![0.0; 6];
            let mut jdets = vec![0.0];
            let mut normals = vec![0.0; 3];
            for cell in 0..g.cell_count() {
                map.physical_points(cell, &mut mapped);
                map.jacobians_dets_normals(cell, &mut jacobians, &mut jdets, &mut normals);
                let dot = mapped.iter().zip(&normals).map(|(a, b)| a * b).sum::<f64>();
                assert!(dot > 0.0);
                assert_relative_eq!(
                    normals.iter().map(|n| n * n).sum::<f64>(),
                    1.0,
                    epsilon = 1e-12
                );
            }
        }
    }
}
