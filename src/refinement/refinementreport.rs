use std::fmt;

use serde::Serialize;

use crate::refinement::diagnosticrecord::DiagnosticRecord;
use crate::refinement::refinementerror::RefinementError;

/// Record sequence of a finished refinement run.
#[derive(Debug, Clone, Serialize)]
pub struct RefinementReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    records: Vec<DiagnosticRecord>,
}

impl RefinementReport {
    pub fn new(label: Option<String>, records: Vec<DiagnosticRecord>) -> RefinementReport {
        RefinementReport { label, records }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    pub fn levels(&self) -> usize {
        self.records.len()
    }

    pub fn last(&self) -> Option<&DiagnosticRecord> {
        self.records.last()
    }

    /// Integral of the converged (last) level.
    pub fn final_integral(&self) -> Option<f64> {
        self.last().map(|record| record.integral())
    }

    pub fn to_json(&self) -> Result<String, RefinementError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for RefinementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        if let Some(integral) = self.final_integral() {
            match &self.label {
                Some(label) => write!(f, "Integral of {} = {}", label, integral)?,
                None => write!(f, "Integral = {}", integral)?,
            }
        }
        Ok(())
    }
}
