use std::fmt;

use serde::Serialize;

use crate::math::notation::{
    fixed,
    scientific
};

/// Diagnostics of one refinement level at `n` subintervals.
///
/// * `k_delta` - `(I(2n) - I(n)) / (I(4n) - I(2n))`, tends to `2^K` for smooth
///   integrands. IEEE `NaN`/`Inf` is kept as computed when the denominator
///   vanishes.
/// * `delta_exact` - `|exact - I(n)|`, present iff an exact value was given.
/// * `delta_runge` - `(I(n) - I(n/2)) / (2^K - 1)`, signed.
/// * `delta_theory` - `|c · h^K|`, present iff `c` was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    n: usize,
    integral: f64,
    k_delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta_exact: Option<f64>,
    delta_runge: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta_theory: Option<f64>,
}

impl DiagnosticRecord {
    pub fn new(n: usize,
               integral: f64,
               k_delta: f64,
               delta_exact: Option<f64>,
               delta_runge: f64,
               delta_theory: Option<f64>) -> DiagnosticRecord {
        DiagnosticRecord {
            n,
            integral,
            k_delta,
            delta_exact,
            delta_runge,
            delta_theory
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn k_delta(&self) -> f64 {
        self.k_delta
    }

    pub fn delta_exact(&self) -> Option<f64> {
        self.delta_exact
    }

    pub fn delta_runge(&self) -> f64 {
        self.delta_runge
    }

    pub fn delta_theory(&self) -> Option<f64> {
        self.delta_theory
    }

    /// Whether refinement stops at this level. A `NaN` estimate stops it too,
    /// since it can never compare above the tolerance.
    pub fn is_within(&self, tolerance: f64) -> bool {
        !(self.delta_runge.abs() > tolerance)
    }
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n: {}\t| integral = {}\t| kDelta = {}",
               self.n,
               scientific(self.integral, 7),
               fixed(self.k_delta, 1))?;
        if let Some(delta_exact) = self.delta_exact {
            write!(f, "\t| deltaExact = {}", scientific(delta_exact, 5))?;
        }
        write!(f, "\t| deltaRunge = {}", scientific(self.delta_runge, 5))?;
        if let Some(delta_theory) = self.delta_theory {
            write!(f, "\t| deltaTheory = {}", scientific(delta_theory, 5))?;
        }
        Ok(())
    }
}
