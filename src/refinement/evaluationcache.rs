use std::collections::HashMap;

/// Per-run memo of quadrature results keyed by subdivision count.
///
/// Each level needs `I(n/2)`, `I(n)`, `I(2n)`, `I(4n)`; three of the four were
/// already computed by the previous level. The rule is pure, so a cached value
/// is bit-identical to a recomputation.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    cache: HashMap<usize, f64>,
    evaluations: usize,
}

impl EvaluationCache {
    pub fn new() -> EvaluationCache {
        EvaluationCache::default()
    }

    pub fn get_or_compute(&mut self, n: usize, compute: impl FnOnce() -> f64) -> f64 {
        let evaluations = &mut self.evaluations;
        *self.cache.entry(n).or_insert_with(|| {
            *evaluations += 1;
            compute()
        })
    }

    /// Number of rule evaluations actually performed.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Drops entries below `n`; refinement never looks back past `n/2`.
    pub fn evict_below(&mut self, n: usize) {
        self.cache.retain(|&key, _| key >= n);
    }
}
