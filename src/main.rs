use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use compquad::configuration::Configuration;
use compquad::problem::integrationproblem::IntegrationProblem;
use compquad::refinement::refinementdriver::RefinementDriver;
use compquad::refinement::refinementerror::RefinementError;

fn root_weighted_hypot(x: f64) -> f64 {
    x.powf(1.0 / 30.0) * (1.0 + x * x).sqrt()
}

fn demo_problems() -> Vec<IntegrationProblem> {
    vec![
        IntegrationProblem::new(|x| 6.0 * x.powi(5), 0.0, 1.0)
            .with_exact_integral(1.0)
            .with_theory_constant(720.0 / 2880.0)
            .with_label("6*x^5 on [0, 1]"),
        IntegrationProblem::new(root_weighted_hypot, 0.0, 1.5)
            .with_label("x^(1/30)*sqrt(1+x^2) on [0, 1.5]"),
        IntegrationProblem::new(root_weighted_hypot, 0.001, 1.5)
            .with_label("x^(1/30)*sqrt(1+x^2) on [0.001, 1.5]"),
    ]
}

fn run(config_path: Option<String>) -> Result<(), RefinementError> {
    let configuration = match config_path {
        Some(path) => Configuration::from_reader(&path)?,
        None => Configuration::default(),
    };
    let driver = RefinementDriver::with_configuration(configuration);
    info!(
        tolerance = driver.configuration().tolerance(),
        max_levels = ?driver.configuration().max_levels(),
        policy = ?driver.configuration().non_finite_policy(),
        "refinement configuration"
    );

    for problem in demo_problems() {
        let report = driver.run(&problem)?;
        println!("{}", report);
        println!();
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
