use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefinementError {
    #[error("invalid interval [{a}, {b}]: bounds must be finite with a < b")]
    InvalidInterval { a: f64, b: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("non-finite result at n = {n}: integral = {integral}, runge = {runge}")]
    NonFiniteResult { n: usize, integral: f64, runge: f64 },

    #[error("no convergence after {levels} levels, last runge estimate = {last_runge:e}")]
    ConvergenceFailure { levels: usize, last_runge: f64 },

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),
}

impl RefinementError {
    pub fn invalid_configuration(message: impl Into<String>) -> RefinementError {
        RefinementError::InvalidConfiguration(message.into())
    }
}
