//! Gauss-Legendre rules and their tensor and collapsed extensions
use super::{QuadratureRule, QuadratureError};
use crate::types::ReferenceCellType;
use std::f64::consts::PI;

/// Legendre polynomial p_n and p_{n-1} at x, via
/// m p_m(x) = (2m - 1) x p_{m-1}(x) - (m - 1) p_{m-2}(x)
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for m in 1..=n {
        let m = m as f64;
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * m - 1.0) * x * p2 - (m - 1.0) * p3) / m;
    }
    (p1, p2)
}

/// Derivative of p_n, only valid in the open interval (-1, 1)
fn legendre_derivative(n: usize, x: f64, p1: f64, p2: f64) -> f64 {
    n as f64 * (x * p1 - p2) / (x * x - 1.0)
}

/// Gauss-Legendre points and weights on the interval [0, 1].
///
/// A rule with `npoints` points integrates polynomials of degree up to `2 * npoints - 1` exactly.
pub fn gauss_legendre_interval(npoints: usize) -> Result<(Vec<f64>, Vec<f64>), QuadratureError> {
    if npoints == 0 {
        return Err(QuadratureError::RuleNotFound {
            cell_type: ReferenceCellType::Interval,
            npoints,
        });
    }
    let n = npoints;
    let m = (n + 1) / 2;
    let mut points = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);

    // Newton iteration for the first half of the roots on [-1, 1]
    for i in 0..m {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let (p1, p2) = legendre(n, x);
        let mut p = p1;
        let mut dp = legendre_derivative(n, x, p1, p2);
        for _ in 0..100 {
            let dx = -p / dp;
            x += dx;
            let (p1, p2) = legendre(n, x);
            p = p1;
            dp = legendre_derivative(n, x, p1, p2);
            if dx.abs() <= 1e-15 {
                break;
            }
        }
        points.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }
    for i in m..n {
        let mirror = n - i - 1;
        points.push(-points[mirror]);
        weights.push(weights[mirror]);
    }

    Ok((
        points.iter().map(|x| 0.5 * (x + 1.0)).collect(),
        weights.iter().map(|w| 0.5 * w).collect(),
    ))
}

/// Quadrature rule on a reference cell with `npoints` Gauss points in each reference direction.
///
/// Quadrilateral rules are tensor products, triangle rules are collapsed from the square.
pub fn reference_rule(
    cell_type: ReferenceCellType,
    npoints: usize,
) -> Result<QuadratureRule, QuadratureError> {
    let (pts, wts) = gauss_legendre_interval(npoints)?;
    let order = 2 * npoints - 1;
    match cell_type {
        ReferenceCellType::Interval => Ok(QuadratureRule {
            dim: 1,
            order,
            npoints,
            weights: wts,
            points: pts,
        }),
        ReferenceCellType::Quadrilateral => {
            let mut points = Vec::with_capacity(2 * npoints * npoints);
            let mut weights = Vec::with_capacity(npoints * npoints);
            for (y, wy) in pts.iter().zip(&wts) {
                for (x, wx) in pts.iter().zip(&wts) {
                    points.push(*x);
                    points.push(*y);
                    weights.push(wx * wy);
                }
            }
            Ok(QuadratureRule {
                dim: 2,
                order,
                npoints: npoints * npoints,
                weights,
                points,
            })
        }
        ReferenceCellType::Triangle => {
            // Duffy collapse of the square onto the triangle: (u, v) -> (u, v (1 - u))
            let mut points = Vec::with_capacity(2 * npoints * npoints);
            let mut weights = Vec::with_capacity(npoints * npoints);
            for (u, wu) in pts.iter().zip(&wts) {
                for (v, wv) in pts.iter().zip(&wts) {
                    points.push(*u);
                    points.push(v * (1.0 - u));
                    weights.push(wu * wv * (1.0 - u));
                }
            }
            Ok(QuadratureRule {
                dim: 2,
                order: order - 1,
                npoints: npoints * npoints,
                weights,
                points,
            })
        }
        _ => Err(QuadratureError::RuleNotFound { cell_type, npoints }),
    }
}
