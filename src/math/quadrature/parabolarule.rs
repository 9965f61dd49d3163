use crate::math::quadrature::quadraturerule::QuadratureRule;

// ─────────────────────────────────────────────────────────────────────────────
// ParabolaRule - composite Newton-Cotes rule of order 4
// ─────────────────────────────────────────────────────────────────────────────
//
//   I ≈ (h/6) · [f(a) + f(b) + 2·Σ_{i=1}^{n-1} f(x_i) + 4·Σ_{i=0}^{n-1} f(x_i + h/2)]
//
//   h = (b - a) / n,  x_i = a + i·h
//
// Both sums accumulate in ascending index order without compensation; the
// low-order bits of every refinement record depend on it.

pub const PARABOLA_ORDER: u32 = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParabolaRule;

impl ParabolaRule {
    pub fn new() -> ParabolaRule {
        ParabolaRule
    }
}

impl QuadratureRule for ParabolaRule {
    fn order(&self) -> u32 {
        PARABOLA_ORDER
    }

    fn evaluate(&self, f: &dyn Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        let node = |i: usize| a + i as f64 * h;

        let mut nodal_sum = 0.0;
        for i in 1..n {
            nodal_sum += f(node(i));
        }

        let mut midpoint_sum = 0.0;
        for i in 0..n {
            midpoint_sum += f(node(i) + h / 2.0);
        }

        (h / 6.0) * (f(a) + f(b) + 2.0 * nodal_sum + 4.0 * midpoint_sum)
    }
}
