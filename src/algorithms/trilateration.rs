//! Planar trilateration against three anchors
//!
//! The two circle-difference equations (anchor 1 vs 2, anchor 2 vs 3) are
//! linearized and solved in closed form. The solution is exact only for
//! mutually consistent distances and non-collinear anchors. When the system is
//! singular the centroid of the anchors is returned instead; that fallback is
//! part of the observable behavior and is not reported as an error.

use crate::core::Point;

/// Result of a trilateration cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub position: Point,
    /// True when the linear system was singular and the centroid was used
    pub used_fallback: bool,
}

/// Closed-form three-anchor solver
#[derive(Debug, Clone, Copy, Default)]
pub struct Trilaterator;

impl Trilaterator {
    pub fn new() -> Self {
        Self
    }

    /// Solve for the position given three anchors and their distances.
    ///
    /// Distances must be real estimates; the "unknown" sentinel must be
    /// filtered out by the caller.
    pub fn solve(&self, p1: Point, d1: f64, p2: Point, d2: f64, p3: Point, d3: f64) -> Point {
        self.solve_detailed(p1, d1, p2, d2, p3, d3).position
    }

    /// Same as [`Trilaterator::solve`] but also reports whether the fallback applied
    pub fn solve_detailed(&self, p1: Point, d1: f64, p2: Point, d2: f64, p3: Point, d3: f64) -> Solution {
        let a = 2.0 * p2.x - 2.0 * p1.x;
        let b = 2.0 * p2.y - 2.0 * p1.y;
        let c = d1.powi(2) - d2.powi(2) - p1.x.powi(2) + p2.x.powi(2) - p1.y.powi(2) + p2.y.powi(2);
        let d = 2.0 * p3.x - 2.0 * p2.x;
        let e = 2.0 * p3.y - 2.0 * p2.y;
        let f = d2.powi(2) - d3.powi(2) - p2.x.powi(2) + p3.x.powi(2) - p2.y.powi(2) + p3.y.powi(2);

        let x = (c * e - f * b) / (e * a - b * d);
        let y = (c * d - a * f) / (b * d - a * e);

        // 0/0 yields NaN, n/0 yields an infinity; both mean the anchors are collinear
        if !x.is_finite() || !y.is_finite() {
            let centroid = Point::centroid(&[p1, p2, p3]);
            tracing::debug!(
                x = centroid.x,
                y = centroid.y,
                "trilateration system is singular, using anchor centroid"
            );
            return Solution {
                position: centroid,
                used_fallback: true,
            };
        }

        Solution {
            position: Point::new(x, y),
            used_fallback: false,
        }
    }
}
