//! Check descriptors and the stages that produce and evaluate them.
//!
//! ## Pipeline
//!
//! ```text
//! CustomerConfig
//!        │
//!        ▼
//! expand()                 depth-first, configuration order
//!        │
//!        ▼
//! Vec<CheckDescriptor>     status = Pending | Unsupported
//!        │
//!        ▼
//! feature::evaluate()      one backend round-trip per check
//!        │
//!        ▼
//! aggregate()              worst-of, UNKNOWN folded into CRITICAL
//! ```

pub mod aggregate;
pub mod expand;
pub mod feature;

pub use aggregate::{aggregate, aggregate_checks};
pub use expand::expand;

use influxwatch_types::{CheckKind, Endpoint, Severity};

/// Outcome of evaluating one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub severity: Severity,
    /// Operator-facing explanation, e.g. `"3/12 samples ok"`.
    pub summary: String,
}

impl Evaluation {
    pub fn new(severity: Severity, summary: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
        }
    }
}

/// Result slot of a [`CheckDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Not evaluated yet.
    Pending,
    Evaluated(Evaluation),
    /// The definition cannot be run; kept for reporting, never aggregated.
    Unsupported(String),
}

/// A self-contained, executable check produced by the expander.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckDescriptor {
    pub endpoint: Endpoint,
    pub database: String,
    pub measurement: String,
    pub host: String,
    pub test_name: String,
    pub transaction_name: String,
    pub kind: CheckKind,
    pub status: CheckStatus,
}

impl CheckDescriptor {
    /// Name of the checked feature, or the check name for unsupported kinds.
    pub fn target(&self) -> &str {
        match &self.kind {
            CheckKind::FeatureAvailability(check) => &check.feature_name,
            CheckKind::Unsupported { check_name, .. } => check_name,
        }
    }

    /// `database/measurement/host/test/transaction/target`
    pub fn path(&self) -> String {
        [
            self.database.as_str(),
            self.measurement.as_str(),
            self.host.as_str(),
            self.test_name.as_str(),
            self.transaction_name.as_str(),
            self.target(),
        ]
        .join("/")
    }

    /// Severity once evaluated.
    pub fn severity(&self) -> Option<Severity> {
        match &self.status {
            CheckStatus::Evaluated(evaluation) => Some(evaluation.severity),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, CheckStatus::Pending)
    }
}
