//! Scalar root-finding primitives used by the lining solver.
//!
//! - [`Bisection`] narrows a bracket around the root of a black-box monotonic
//!   function. The caller only reports on which side of the root a probe lies.
//! - [`FixedPoint`] iterates `x ← g(x)` with an absolute step tolerance.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootFindingError {
    #[error("invalid bracket [{low}, {high}]")]
    InvalidBracket { low: f64, high: f64 },

    #[error("bracket did not close within {iterations} iterations (width {width})")]
    NotConverged { iterations: usize, width: f64 },
}

/// Position of a probe relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The root lies above the probe: the low end moves up.
    Below,
    /// The root lies at or below the probe: the high end moves down.
    Above,
}

/// Bisection on `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bisection {
    pub max_iterations: usize,
    /// Converged once the bracket is narrower than this.
    pub tolerance: f64,
}

/// Result of a converged bisection.
#[derive(Debug, Clone, PartialEq)]
pub struct Bracketed<T> {
    /// Last probe.
    pub x: f64,
    /// Evaluation at the last probe.
    pub value: T,
    pub iterations: usize,
    pub low: f64,
    pub high: f64,
}

impl Bisection {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Bisects until the bracket is narrower than the tolerance.
    ///
    /// `probe` is evaluated at each midpoint and returns the side of the root
    /// together with any payload; the payload of the final probe is returned.
    pub fn solve<T, F>(
        &self,
        low: f64,
        high: f64,
        mut probe: F,
    ) -> Result<Bracketed<T>, RootFindingError>
    where
        F: FnMut(f64) -> (Side, T),
    {
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(RootFindingError::InvalidBracket { low, high });
        }
        let (mut low, mut high) = (low, high);
        for i in 0..self.max_iterations {
            let x = 0.5 * (low + high);
            let (side, value) = probe(x);
            match side {
                Side::Below => low = x,
                Side::Above => high = x,
            }
            trace!(iteration = i + 1, x, low, high, "bisection step");
            if (high - low).abs() < self.tolerance {
                return Ok(Bracketed {
                    x,
                    value,
                    iterations: i + 1,
                    low,
                    high,
                });
            }
        }
        Err(RootFindingError::NotConverged {
            iterations: self.max_iterations,
            width: high - low,
        })
    }
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new(60, 0.05)
    }
}

/// Fixed-point iteration `x ← g(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    pub max_iterations: usize,
    /// Stops once successive estimates differ by less than this.
    pub tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointOutcome {
    pub value: f64,
    pub iterations: usize,
    /// False when the iteration cap was reached before the tolerance.
    pub converged: bool,
}

impl FixedPoint {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Iterates from `seed`. Reaching the cap is not an error: the last
    /// estimate is returned with `converged == false`.
    pub fn solve<G>(&self, seed: f64, mut g: G) -> FixedPointOutcome
    where
        G: FnMut(f64) -> f64,
    {
        let mut x = seed;
        for i in 0..self.max_iterations {
            let next = g(x);
            let step = (next - x).abs();
            x = next;
            if step < self.tolerance {
                return FixedPointOutcome {
                    value: x,
                    iterations: i + 1,
                    converged: true,
                };
            }
        }
        FixedPointOutcome {
            value: x,
            iterations: self.max_iterations,
            converged: false,
        }
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self::new(5, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bisection_finds_sqrt2() {
        let bisection = Bisection::new(100, 1e-9);
        let out = bisection
            .solve(0.0, 2.0, |x| {
                let side = if x * x < 2.0 { Side::Below } else { Side::Above };
                (side, x * x)
            })
            .unwrap();
        assert!((out.x - 2f64.sqrt()).abs() < 1e-8, "got {}", out.x);
        assert!(out.high - out.low < 1e-9);
        assert!((out.value - 2.0).abs() < 1e-7);
    }

    #[test]
    fn test_bisection_iteration_count() {
        // Width 1 halves each step: 2^-n < 0.05 first holds at n = 5.
        let out = Bisection::new(60, 0.05)
            .solve(0.0, 1.0, |_| (Side::Below, ()))
            .unwrap();
        assert_eq!(out.iterations, 5);
        assert_eq!(out.high, 1.0);
    }

    #[test]
    fn test_bisection_reports_non_convergence() {
        let err = Bisection::new(3, 1e-6)
            .solve(0.0, 1.0, |_| (Side::Above, ()))
            .unwrap_err();
        match err {
            RootFindingError::NotConverged { iterations, width } => {
                assert_eq!(iterations, 3);
                assert!((width - 0.125).abs() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bisection_rejects_degenerate_bracket() {
        let mut calls = 0;
        let err = Bisection::default()
            .solve(5.0, 5.0, |_| {
                calls += 1;
                (Side::Below, ())
            })
            .unwrap_err();
        assert!(matches!(err, RootFindingError::InvalidBracket { .. }));
        assert_eq!(calls, 0);
        let nan = Bisection::default().solve(1.0, f64::NAN, |_| (Side::Below, ()));
        assert!(nan.is_err());
    }

    #[test]
    fn test_fixed_point_converges() {
        // x = cos(x) has its fixed point near 0.739085.
        let out = FixedPoint::new(200, 1e-10).solve(1.0, f64::cos);
        assert!(out.converged);
        assert!((out.value - 0.739_085_133).abs() < 1e-8, "got {}", out.value);
    }

    #[test]
    fn test_fixed_point_cap_returns_last_estimate() {
        let out = FixedPoint::new(5, 0.1).solve(0.0, |x| x + 1.0);
        assert!(!out.converged);
        assert_eq!(out.iterations, 5);
        assert_eq!(out.value, 5.0);
    }

    #[test]
    fn test_fixed_point_constant_map_stops_on_second_step() {
        let out = FixedPoint::default().solve(10.0, |_| 42.0);
        assert!(out.converged);
        assert_eq!(out.iterations, 2);
        assert_eq!(out.value, 42.0);
    }
}
