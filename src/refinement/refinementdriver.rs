use std::sync::Arc;

use tracing::{
    debug,
    info,
    warn
};

use crate::configuration::{
    Configuration,
    NonFinitePolicy
};
use crate::math::quadrature::parabolarule::ParabolaRule;
use crate::math::quadrature::quadraturerule::QuadratureRule;
use crate::problem::integrationproblem::IntegrationProblem;
use crate::refinement::diagnosticrecord::DiagnosticRecord;
use crate::refinement::evaluationcache::EvaluationCache;
use crate::refinement::refinementerror::RefinementError;
use crate::refinement::refinementreport::RefinementReport;

// ─────────────────────────────────────────────────────────────────────────────
// RefinementDriver
// ─────────────────────────────────────────────────────────────────────────────
//
// Level loop, starting at n = initial subdivisions and doubling n each time:
//
//   runge  = (I(n) - I(n/2)) / (2^K - 1)
//   kDelta = (I(2n) - I(n)) / (I(4n) - I(2n))
//
// and stops after the first level with |runge| <= tolerance, which is the last
// record of the sequence.

pub struct RefinementDriver {
    configuration: Configuration,
    rule: Arc<dyn QuadratureRule>,
}

impl Default for RefinementDriver {
    fn default() -> Self {
        RefinementDriver::with_configuration(Configuration::default())
    }
}

impl RefinementDriver {
    pub fn new(configuration: Configuration, rule: Arc<dyn QuadratureRule>) -> RefinementDriver {
        RefinementDriver { configuration, rule }
    }

    /// Driver using the parabola rule.
    pub fn with_configuration(configuration: Configuration) -> RefinementDriver {
        RefinementDriver::new(configuration, Arc::new(ParabolaRule::new()))
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Runs the refinement loop to completion and returns every level's record
    /// in order of increasing `n`. Each call starts from scratch.
    pub fn refine(&self, problem: &IntegrationProblem) -> Result<Vec<DiagnosticRecord>, RefinementError> {
        problem.validate()?;

        let tolerance = self.configuration.tolerance();
        let mut cache = EvaluationCache::new();
        let mut records: Vec<DiagnosticRecord> = Vec::new();
        let mut n = self.configuration.initial_subdivisions();

        loop {
            if n.checked_mul(4).is_none() {
                let last_runge = records.last().map_or(f64::NAN, |record| record.delta_runge());
                warn!(levels = records.len(), last_runge, "subdivision count overflow");
                return Err(RefinementError::ConvergenceFailure { levels: records.len(), last_runge });
            }

            let record = self.compute_level(problem, n, &mut cache);
            debug!(
                n,
                integral = record.integral(),
                runge = record.delta_runge(),
                k_delta = record.k_delta(),
                "refinement level"
            );

            let finite = record.integral().is_finite() && record.delta_runge().is_finite();
            if !finite && self.configuration.non_finite_policy() == NonFinitePolicy::FailFast {
                warn!(n, integral = record.integral(), runge = record.delta_runge(), "non-finite quadrature result");
                return Err(RefinementError::NonFiniteResult {
                    n,
                    integral: record.integral(),
                    runge: record.delta_runge()
                });
            }

            records.push(record);

            if record.is_within(tolerance) {
                info!(
                    levels = records.len(),
                    n,
                    integral = record.integral(),
                    evaluations = cache.evaluations(),
                    "refinement converged"
                );
                return Ok(records);
            }

            if let Some(max_levels) = self.configuration.max_levels() {
                if records.len() >= max_levels {
                    warn!(levels = records.len(), last_runge = record.delta_runge(), "refinement did not converge");
                    return Err(RefinementError::ConvergenceFailure {
                        levels: records.len(),
                        last_runge: record.delta_runge()
                    });
                }
            }

            cache.evict_below(n);
            n *= 2;
        }
    }

    /// `refine` wrapped in a report carrying the problem label.
    pub fn run(&self, problem: &IntegrationProblem) -> Result<RefinementReport, RefinementError> {
        let records = self.refine(problem)?;
        Ok(RefinementReport::new(problem.label().map(str::to_owned), records))
    }

    fn compute_level(&self,
                     problem: &IntegrationProblem,
                     n: usize,
                     cache: &mut EvaluationCache) -> DiagnosticRecord {
        let rule = self.rule.as_ref();
        let f = problem.integrand();
        let (a, b) = (problem.a(), problem.b());
        let mut integral_at = |m: usize| cache.get_or_compute(m, || rule.evaluate(f, a, b, m));

        let integral = integral_at(n);
        let integral_h2 = integral_at(n * 2);
        let integral_h4 = integral_at(n * 4);
        let integral_div2 = integral_at(n / 2);

        let runge = (integral - integral_div2) / rule.runge_denominator();
        let k_delta = (integral_h2 - integral) / (integral_h4 - integral_h2);

        let delta_exact = problem.exact_integral()
            .map(|exact_integral| (exact_integral - integral).abs());
        let delta_theory = problem.c()
            .map(|c| (c * (problem.length() / n as f64).powf(rule.order() as f64)).abs());

        DiagnosticRecord::new(n, integral, k_delta, delta_exact, runge, delta_theory)
    }
}

/// Refines `problem` with the default configuration and the parabola rule.
pub fn refine(problem: &IntegrationProblem) -> Result<Vec<DiagnosticRecord>, RefinementError> {
    RefinementDriver::default().refine(problem)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn quintic() -> IntegrationProblem {
        IntegrationProblem::new(|x| 6.0 * x.powi(5), 0.0, 1.0)
            .with_exact_integral(1.0)
            .with_theory_constant(720.0 / 2880.0)
    }

    #[test]
    fn quintic_converges_at_sixty_four() {
        let records = refine(&quintic()).unwrap();
        let ns: Vec<usize> = records.iter().map(|record| record.n()).collect();
        assert_eq!(ns, vec![2, 4, 8, 16, 32, 64]);

        let last = records.last().unwrap();
        assert!(last.delta_runge().abs() <= 1e-7);
        assert!(last.delta_exact().unwrap() <= 1e-7);
        assert_abs_diff_eq!(last.integral(), 1.0, epsilon = 1e-7);
        for record in &records[..records.len() - 1] {
            assert!(record.delta_runge().abs() > 1e-7);
        }
    }

    #[test]
    fn first_level_uses_single_interval_baseline() {
        let problem = quintic();
        let rule = ParabolaRule::new();
        let records = refine(&problem).unwrap();
        let first = records[0];
        let i1 = rule.evaluate(problem.integrand(), 0.0, 1.0, 1);
        let i2 = rule.evaluate(problem.integrand(), 0.0, 1.0, 2);
        assert_eq!(first.n(), 2);
        assert_eq!(first.delta_runge().to_bits(), ((i2 - i1) / 15.0).to_bits());
    }

    #[test]
    fn quintic_diagnostics() {
        let records = refine(&quintic()).unwrap();
        let first = records[0];
        assert_abs_diff_eq!(first.integral(), 1.0078125, epsilon = 1e-13);
        assert_abs_diff_eq!(first.delta_exact().unwrap(), 0.0078125, epsilon = 1e-13);
        assert_abs_diff_eq!(first.delta_runge(), -0.0078125, epsilon = 1e-13);
        assert_abs_diff_eq!(first.delta_theory().unwrap(), 0.015625, epsilon = 1e-15);
        for record in &records {
            assert_abs_diff_eq!(record.k_delta(), 16.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn absent_references_stay_absent() {
        let problem = IntegrationProblem::new(|x: f64| x.exp(), 0.0, 1.0);
        let records = refine(&problem).unwrap();
        assert!(records.iter().all(|record| record.delta_exact().is_none()));
        assert!(records.iter().all(|record| record.delta_theory().is_none()));
    }

    #[test]
    fn invalid_interval_is_reported_before_any_evaluation() {
        let problem = IntegrationProblem::new(|_| panic!("must not be evaluated"), 1.0, 0.0);
        assert!(matches!(refine(&problem), Err(RefinementError::InvalidInterval { .. })));
    }

    #[test]
    fn non_finite_integrand_fails_fast() {
        let problem = IntegrationProblem::new(|x: f64| x.powf(1.0 / 3.0), -1.0, 1.0);
        match refine(&problem) {
            Err(RefinementError::NonFiniteResult { n, integral, .. }) => {
                assert_eq!(n, 2);
                assert!(integral.is_nan());
            },
            other => panic!("expected NonFiniteResult, got {:?}", other.map(|records| records.len())),
        }
    }

    #[test]
    fn propagated_nan_ends_the_loop() {
        let config = Configuration::default().with_non_finite_policy(NonFinitePolicy::Propagate);
        let driver = RefinementDriver::with_configuration(config);
        let problem = IntegrationProblem::new(|x: f64| x.powf(1.0 / 3.0), -1.0, 1.0);
        let records = driver.refine(&problem).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].integral().is_nan());
        assert!(records[0].delta_runge().is_nan());
    }

    #[test]
    fn level_cap_surfaces_convergence_failure() {
        let config = Configuration::default().with_max_levels(3).unwrap();
        let driver = RefinementDriver::with_configuration(config);
        let problem = IntegrationProblem::new(|x: f64| x.sqrt(), 0.0, 1.0);
        match driver.refine(&problem) {
            Err(RefinementError::ConvergenceFailure { levels, last_runge }) => {
                assert_eq!(levels, 3);
                assert!(last_runge.abs() > 1e-7);
            },
            other => panic!("expected ConvergenceFailure, got {:?}", other.map(|records| records.len())),
        }
    }

    #[test]
    fn level_cap_does_not_affect_converging_runs() {
        let config = Configuration::default().with_max_levels(6).unwrap();
        let driver = RefinementDriver::with_configuration(config);
        assert_eq!(driver.refine(&quintic()).unwrap().len(), 6);
    }

    #[test]
    fn linear_integrand_converges_on_first_level() {
        let problem = IntegrationProblem::new(|x| 3.0 * x + 1.0, 0.0, 2.0).with_exact_integral(8.0);
        let records = refine(&problem).unwrap();
        assert_eq!(records.len(), 1);
        assert_abs_diff_eq!(records[0].integral(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn vanishing_order_ratio_denominator_is_kept_as_nan() {
        // I(4n) and I(2n) agree to the last bit for a linear integrand
        let problem = IntegrationProblem::new(|x| 3.0 * x + 1.0, 0.0, 2.0);
        let records = refine(&problem).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].k_delta().is_nan());
        assert!(records[0].to_string().contains("kDelta = NaN"));
    }

    #[test]
    fn custom_tolerance_and_start() {
        let config = Configuration::new(1e-3, 8, None, NonFinitePolicy::FailFast).unwrap();
        let driver = RefinementDriver::with_configuration(config);
        let records = driver.refine(&quintic()).unwrap();
        assert_eq!(records[0].n(), 8);
        assert!(records.last().unwrap().delta_runge().abs() <= 1e-3);
    }

    #[test]
    fn run_carries_label() {
        let report = RefinementDriver::default().run(&quintic().with_label("6x^5")).unwrap();
        assert_eq!(report.label(), Some("6x^5"));
        assert_eq!(report.levels(), 6);
    }
}
