//! Assembly options

use crate::types::ReferenceCellType;
use std::collections::HashMap;

/// Options used by the assemblers of a [crate::assembly::Context]
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    /// Number of Gauss points in each reference direction, per cell type
    quadrature_points: HashMap<ReferenceCellType, usize>,
    /// Maximum size of each batch of cells processed by one task
    batch_size: usize,
    /// Process batches in parallel
    parallel: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        use ReferenceCellType::{Interval, Quadrilateral, Triangle};
        Self {
            quadrature_points: HashMap::from([(Interval, 4), (Triangle, 4), (Quadrilateral, 4)]),
            batch_size: 128,
            parallel: true,
        }
    }
}

impl AssemblyOptions {
    /// Set the number of quadrature points per reference direction for a cell type
    pub fn set_quadrature_points(&mut self, cell: ReferenceCellType, npoints: usize) {
        self.quadrature_points.insert(cell, npoints);
    }

    /// Set the maximum size of a batch of cells
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size;
    }

    /// Enable or disable parallel assembly
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Number of quadrature points per reference direction for a cell type
    pub fn quadrature_points(&self, cell: ReferenceCellType) -> Option<usize> {
        self.quadrature_points.get(&cell).copied()
    }

    /// Maximum size of a batch of cells
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Is assembly parallel?
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_options() {
        let mut options = AssemblyOptions::default();
        assert_eq!(options.quadrature_points(ReferenceCellType::Triangle), Some(4));
        assert_eq!(options.quadrature_points(ReferenceCellType::Tetrahedron), None);
        assert_eq!(options.batch_size(), 128);
        assert!(options.parallel());

        options.set_quadrature_points(ReferenceCellType::Triangle, 7);
        options.set_batch_size(16);
        options.set_parallel(false);
        assert_eq!(options.quadrature_points(ReferenceCellType::Triangle), Some(7));
        assert_eq!(options.batch_size(), 16);
        assert!(!options.parallel());
    }
}
