//! Running every check of one customer, or of all customers.

use std::path::Path;

use tracing::info;

use influxwatch_adapters::QueryBackend;
use influxwatch_types::{CheckKind, CheckMap, Severity};

use crate::check::{self, feature, CheckDescriptor, CheckStatus};
use crate::checkmap::{load_check_map, CustomerConfig};
use crate::CheckError;

/// The checks of one customer and their aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRun {
    pub customer: String,
    /// Checks in configuration order.
    pub checks: Vec<CheckDescriptor>,
    pub aggregate: Severity,
}

/// Per-severity tally of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
    pub unknown: usize,
    pub unsupported: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.ok + self.warning + self.critical + self.unknown + self.unsupported
    }
}

impl CheckRun {
    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for check in &self.checks {
            match &check.status {
                CheckStatus::Evaluated(evaluation) => match evaluation.severity {
                    Severity::Ok => counts.ok += 1,
                    Severity::Warning => counts.warning += 1,
                    Severity::Critical => counts.critical += 1,
                    Severity::Unknown => counts.unknown += 1,
                },
                CheckStatus::Unsupported(_) => counts.unsupported += 1,
                CheckStatus::Pending => {}
            }
        }
        counts
    }

    /// Process exit code for a single-customer invocation.
    pub fn exit_code(&self) -> u8 {
        self.aggregate.exit_code()
    }
}

/// Aggregate across customers, with the same policy as within one.
pub fn overall(runs: &[CheckRun]) -> Option<Severity> {
    check::aggregate(runs.iter().map(|r| r.aggregate))
}

/// Evaluates check maps against a backend.
///
/// Checks run one at a time, in expansion order; a slow backend delays the
/// whole run.
#[derive(Debug)]
pub struct Runner<B> {
    backend: B,
}

impl<B: QueryBackend> Runner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run all checks of `customer`.
    ///
    /// Configuration problems abort with an error; a failing query only
    /// marks its own check UNKNOWN.
    pub async fn run_customer(&self, map: &CheckMap, customer: &str) -> Result<CheckRun, CheckError> {
        let config = CustomerConfig::from_check_map(map, customer)?;
        let mut checks = check::expand(&config)?;

        for descriptor in checks.iter_mut() {
            self.execute(descriptor).await;
        }

        let aggregate = check::aggregate_checks(&config.name, &checks)?;
        info!(customer = %config.name, checks = checks.len(), %aggregate, "customer evaluated");

        Ok(CheckRun {
            customer: config.name,
            checks,
            aggregate,
        })
    }

    /// Run every customer of `map`, in file order.
    ///
    /// The first configuration error aborts the whole evaluation.
    pub async fn run_all(&self, map: &CheckMap) -> Result<Vec<CheckRun>, CheckError> {
        let mut runs = Vec::with_capacity(map.customers.len());
        for name in map.customer_names() {
            runs.push(self.run_customer(map, name).await?);
        }
        Ok(runs)
    }

    /// Load `path` and run one customer, or all of them when `customer` is `None`.
    pub async fn run_file(
        &self,
        path: &Path,
        customer: Option<&str>,
    ) -> Result<Vec<CheckRun>, CheckError> {
        let map = load_check_map(path)?;
        match customer {
            Some(name) => Ok(vec![self.run_customer(&map, name).await?]),
            None => self.run_all(&map).await,
        }
    }

    /// Evaluate one pending descriptor in place.
    ///
    /// Descriptors that are already evaluated or were marked unsupported by
    /// the expander are left untouched.
    pub async fn execute(&self, descriptor: &mut CheckDescriptor) {
        let evaluation = match (&descriptor.status, &descriptor.kind) {
            (CheckStatus::Pending, CheckKind::FeatureAvailability(check)) => {
                feature::evaluate(&self.backend, descriptor, check).await
            }
            _ => return,
        };
        descriptor.status = CheckStatus::Evaluated(evaluation);
    }
}
