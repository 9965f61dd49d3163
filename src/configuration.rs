use std::fs::File;
use std::io::BufReader;

use serde::{
    Deserialize,
    Serialize
};

use crate::refinement::refinementerror::RefinementError;

pub const DEFAULT_TOLERANCE: f64 = 1e-7;
pub const DEFAULT_INITIAL_SUBDIVISIONS: usize = 2;

/// What the driver does when a level yields a non-finite integral or Runge
/// estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NonFinitePolicy {
    /// Stop with `RefinementError::NonFiniteResult`.
    #[default]
    FailFast,
    /// Keep the record and let the tolerance test decide, exactly as the
    /// plain loop would.
    Propagate,
}

#[derive(Deserialize)]
#[serde(default)]
struct ConfigurationJsonProp {
    tolerance: f64,
    initial_subdivisions: usize,
    max_levels: Option<usize>,
    non_finite_policy: NonFinitePolicy,
}

impl Default for ConfigurationJsonProp {
    fn default() -> Self {
        ConfigurationJsonProp {
            tolerance: DEFAULT_TOLERANCE,
            initial_subdivisions: DEFAULT_INITIAL_SUBDIVISIONS,
            max_levels: None,
            non_finite_policy: NonFinitePolicy::default(),
        }
    }
}

/// Immutable numeric settings of one refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Configuration {
    tolerance: f64,
    initial_subdivisions: usize,
    max_levels: Option<usize>,
    non_finite_policy: NonFinitePolicy,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            tolerance: DEFAULT_TOLERANCE,
            initial_subdivisions: DEFAULT_INITIAL_SUBDIVISIONS,
            max_levels: None,
            non_finite_policy: NonFinitePolicy::FailFast,
        }
    }
}

impl Configuration {
    pub fn new(tolerance: f64,
               initial_subdivisions: usize,
               max_levels: Option<usize>,
               non_finite_policy: NonFinitePolicy) -> Result<Configuration, RefinementError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(RefinementError::invalid_configuration(
                format!("tolerance must be finite and positive, got {}", tolerance)
            ));
        }
        // n / 2 must stay a valid subdivision count on the first level
        if initial_subdivisions < 2 || !initial_subdivisions.is_power_of_two() {
            return Err(RefinementError::invalid_configuration(
                format!("initial subdivisions must be a power of two >= 2, got {}", initial_subdivisions)
            ));
        }
        if max_levels == Some(0) {
            return Err(RefinementError::invalid_configuration("max levels must be at least 1"));
        }
        Ok(Configuration {
            tolerance,
            initial_subdivisions,
            max_levels,
            non_finite_policy
        })
    }

    pub fn with_max_levels(self, max_levels: usize) -> Result<Configuration, RefinementError> {
        Configuration::new(self.tolerance, self.initial_subdivisions, Some(max_levels), self.non_finite_policy)
    }

    pub fn with_non_finite_policy(self, non_finite_policy: NonFinitePolicy) -> Configuration {
        Configuration { non_finite_policy, ..self }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn initial_subdivisions(&self) -> usize {
        self.initial_subdivisions
    }

    pub fn max_levels(&self) -> Option<usize> {
        self.max_levels
    }

    pub fn non_finite_policy(&self) -> NonFinitePolicy {
        self.non_finite_policy
    }

    pub fn from_json_str(json: &str) -> Result<Configuration, RefinementError> {
        let json_prop: ConfigurationJsonProp = serde_json::from_str(json)?;
        Configuration::from_json_prop(json_prop)
    }

    pub fn from_reader(file_path: &str) -> Result<Configuration, RefinementError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        Configuration::from_json_prop(json_prop)
    }

    fn from_json_prop(json_prop: ConfigurationJsonProp) -> Result<Configuration, RefinementError> {
        Configuration::new(
            json_prop.tolerance,
            json_prop.initial_subdivisions,
            json_prop.max_levels,
            json_prop.non_finite_policy
        )
    }
}
