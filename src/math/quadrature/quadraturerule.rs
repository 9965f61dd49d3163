/// Composite quadrature rule over `n` equal subintervals of `[a, b]`.
///
/// Implementations must be pure: identical inputs give bit-identical outputs,
/// which is what allows the refinement driver to memoize evaluations.
pub trait QuadratureRule: Send + Sync {
    /// Asymptotic error order `K` (error shrinks like `h^K`).
    fn order(&self) -> u32;

    fn evaluate(&self, f: &dyn Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64;

    /// `2^K`, the limit of the empirical order ratio for smooth integrands.
    fn order_ratio(&self) -> f64 {
        2.0_f64.powi(self.order() as i32)
    }

    /// `2^K - 1`, the Runge estimate denominator.
    fn runge_denominator(&self) -> f64 {
        self.order_ratio() - 1.0
    }
}
