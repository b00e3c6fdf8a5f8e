//! The two representations of a grid function
use crate::types::Result;
use std::sync::Arc;

/// Coefficients, projections, or both
///
/// A grid function always holds at least one of the two vectors.
#[derive(Debug, Clone)]
pub(crate) enum DualData<T> {
    Coefficients(Arc<[T]>),
    Projections(Arc<[T]>),
    Both {
        coefficients: Arc<[T]>,
        projections: Arc<[T]>,
    },
}

impl<T: Clone> DualData<T> {
    pub(crate) fn coefficients(&self) -> Option<&Arc<[T]>> {
        match self {
            DualData::Coefficients(c) | DualData::Both { coefficients: c, .. } => Some(c),
            DualData::Projections(_) => None,
        }
    }

    pub(crate) fn projections(&self) -> Option<&Arc<[T]>> {
        match self {
            DualData::Projections(p) | DualData::Both { projections: p, .. } => Some(p),
            DualData::Coefficients(_) => None,
        }
    }

    /// The state once the coefficients are known, computing them from the projections if needed
    pub(crate) fn with_coefficients(
        &self,
        compute: impl FnOnce(&[T]) -> Result<Vec<T>>,
    ) -> Result<Self> {
        Ok(match self {
            DualData::Projections(p) => DualData::Both {
                coefficients: compute(p)?.into(),
                projections: p.clone(),
            },
            _ => self.clone(),
        })
    }

    /// The state once the projections are known, computing them from the coefficients if needed
    pub(crate) fn with_projections(
        &self,
        compute: impl FnOnce(&[T]) -> Result<Vec<T>>,
    ) -> Result<Self> {
        Ok(match self {
            DualData::Coefficients(c) => DualData::Both {
                coefficients: c.clone(),
                projections: compute(c)?.into(),
            },
            _ => self.clone(),
        })
    }
}
