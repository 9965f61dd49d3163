use std::fmt;
use std::sync::Arc;

use crate::refinement::refinementerror::RefinementError;

/// Shared, thread-safe real-valued integrand.
pub type Integrand = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A definite integral of `f` over `[a, b]`, plus optional reference values
/// used only for diagnostics.
///
/// `exact_integral` feeds the exact-error column of each record, `c` the
/// theoretical bound `|c · h^K|`. Absent references stay absent in the output.
#[derive(Clone)]
pub struct IntegrationProblem {
    integrand: Integrand,
    a: f64,
    b: f64,
    exact_integral: Option<f64>,
    c: Option<f64>,
    label: Option<String>,
}

impl IntegrationProblem {
    pub fn new<F>(f: F, a: f64, b: f64) -> IntegrationProblem
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        IntegrationProblem::from_integrand(Arc::new(f), a, b)
    }

    pub fn from_integrand(integrand: Integrand, a: f64, b: f64) -> IntegrationProblem {
        IntegrationProblem {
            integrand,
            a,
            b,
            exact_integral: None,
            c: None,
            label: None,
        }
    }

    pub fn with_exact_integral(mut self, exact_integral: f64) -> IntegrationProblem {
        self.exact_integral = Some(exact_integral);
        self
    }

    pub fn with_theory_constant(mut self, c: f64) -> IntegrationProblem {
        self.c = Some(c);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> IntegrationProblem {
        self.label = Some(label.into());
        self
    }

    pub fn integrand(&self) -> &(dyn Fn(f64) -> f64 + Send + Sync) {
        self.integrand.as_ref()
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn exact_integral(&self) -> Option<f64> {
        self.exact_integral
    }

    pub fn c(&self) -> Option<f64> {
        self.c
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn length(&self) -> f64 {
        self.b - self.a
    }

    /// Bounds must be finite with `a < b`.
    pub fn validate(&self) -> Result<(), RefinementError> {
        if self.a.is_finite() && self.b.is_finite() && self.a < self.b {
            Ok(())
        } else {
            Err(RefinementError::InvalidInterval { a: self.a, b: self.b })
        }
    }
}

impl fmt::Debug for IntegrationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationProblem")
            .field("label", &self.label)
            .field("a", &self.a)
            .field("b", &self.b)
            .field("exact_integral", &self.exact_integral)
            .field("c", &self.c)
            .finish_non_exhaustive()
    }
}
