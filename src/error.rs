//! Errors that abort an evaluation.
//!
//! Per-check query failures are not errors at this level: they are folded
//! into that check's result as UNKNOWN. Everything here stops the whole run.

use std::path::PathBuf;

use influxwatch_types::{EndpointError, Severity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// A named item is missing from a collection of the check map.
    #[error("'{item}' not found in '{collection}'")]
    NotFound { item: String, collection: String },

    /// The data source address is not `<host>:<port>`.
    #[error(transparent)]
    MalformedEndpoint(#[from] EndpointError),

    /// The check map file is missing or cannot be parsed.
    #[error("cannot read check map '{}': {reason}", .path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    /// A level of the check map has an empty name.
    #[error("empty {field} in check map at '{location}'")]
    EmptyName {
        field: &'static str,
        location: String,
    },

    /// Runtime settings could not be loaded.
    #[error("invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    /// Nothing to aggregate: no runnable check was configured.
    #[error("no runnable checks configured for customer '{0}'")]
    NoChecks(String),

    /// Aggregation was attempted before every check finished.
    #[error("{0} check(s) not yet evaluated")]
    Incomplete(usize),
}

impl CheckError {
    pub fn not_found(item: impl Into<String>, collection: impl Into<String>) -> Self {
        CheckError::NotFound {
            item: item.into(),
            collection: collection.into(),
        }
    }

    /// Severity reported to the supervisor when the run aborts with this error.
    pub fn severity(&self) -> Severity {
        Severity::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CheckError::not_found("acme", "customers");
        assert_eq!(err.to_string(), "'acme' not found in 'customers'");
        assert_eq!(err.severity(), Severity::Unknown);
    }

    #[test]
    fn test_malformed_endpoint_message() {
        let err: CheckError = EndpointError::Malformed("influx".to_string()).into();
        assert_eq!(
            err.to_string(),
            "malformed endpoint 'influx': expected <host>:<port>"
        );
    }
}
