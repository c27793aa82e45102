//! Domain error kinds shared by every pipeline step.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RunwayError {
    /// A required credential or setting is absent. Fatal at startup.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    /// The finance API answered with something other than HTTP 200.
    #[error("API request failed with status {status}: {body}")]
    ApiRequestFailed { status: u16, body: String },

    /// Runway inputs are unusable (non-numeric, non-finite, burn rate <= 0).
    #[error("invalid input data: {0}")]
    Validation(String),

    /// A tab, column or key row that a step depends on is absent.
    #[error("lookup failed in '{tab}': {detail}")]
    LookupNotFound { tab: String, detail: String },
}

impl RunwayError {
    /// Short, stable label used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RunwayError::ConfigurationMissing(_) => "configuration-missing",
            RunwayError::ApiRequestFailed { .. } => "api-request-failed",
            RunwayError::Validation(_) => "validation",
            RunwayError::LookupNotFound { .. } => "lookup-not-found",
        }
    }
}

pub type Result<T> = std::result::Result<T, RunwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = RunwayError::ApiRequestFailed {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(e.to_string(), "API request failed with status 401: unauthorized");
        assert_eq!(e.kind(), "api-request-failed");

        let e = RunwayError::LookupNotFound {
            tab: "Runway".to_string(),
            detail: "no row 'Last Until'".to_string(),
        };
        assert_eq!(e.to_string(), "lookup failed in 'Runway': no row 'Last Until'");
    }
}
