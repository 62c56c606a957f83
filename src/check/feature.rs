//! The feature-availability check.
//!
//! A feature is available when **at least one** sample inside the sanity
//! period reports it as `"ok"`. This is not a "latest sample" check: a
//! window holding one success among many failures is still OK, and the
//! order of the returned rows does not matter.
//!
//! | backend answer                         | severity |
//! |----------------------------------------|----------|
//! | no series for the measurement          | UNKNOWN  |
//! | feature column not returned            | UNKNOWN  |
//! | query failed                           | UNKNOWN  |
//! | at least one row with value `"ok"`     | OK       |
//! | rows, none `"ok"` (or zero rows)       | CRITICAL |

use serde_json::Value;
use tracing::{debug, warn};

use influxwatch_adapters::{Order, QueryBackend, QueryRequest, QueryResponse, SelectQuery};
use influxwatch_types::{FeatureCheck, Severity};

use super::{CheckDescriptor, Evaluation};

/// Columns requested for every feature-availability query.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "time",
    "host",
    "test_name",
    "transaction_name",
    "performance",
    "warning_threshold",
    "critical_threshold",
    "state",
];

/// Value marking a successful sample.
pub const OK_VALUE: &str = "ok";

/// Build the query for `check` in the context of `descriptor`.
pub fn build_request(descriptor: &CheckDescriptor, check: &FeatureCheck) -> QueryRequest {
    let query = SelectQuery::new(descriptor.measurement.as_str())
        .columns(FEATURE_COLUMNS)
        .lookback_secs(check.lookback_secs())
        .filter("host", descriptor.host.as_str())
        .filter("test_name", descriptor.test_name.as_str())
        .filter("transaction_name", descriptor.transaction_name.as_str())
        .order(Order::Descending);

    QueryRequest::new(
        descriptor.endpoint.clone(),
        descriptor.database.as_str(),
        query,
    )
}

/// Classify a backend answer for `feature`.
pub fn classify(response: &QueryResponse, feature: &str) -> Evaluation {
    let table = match response {
        QueryResponse::NoSeries => {
            return Evaluation::new(Severity::Unknown, "no series returned");
        }
        QueryResponse::Table(table) => table,
    };

    let Some(values) = table.column_values(feature) else {
        return Evaluation::new(
            Severity::Unknown,
            format!("column '{}' not returned", feature),
        );
    };

    let (total, ok) = values.fold((0usize, 0usize), |(total, ok), value| {
        (total + 1, ok + usize::from(is_ok(value)))
    });

    let severity = if ok > 0 {
        Severity::Ok
    } else {
        Severity::Critical
    };
    Evaluation::new(severity, format!("{}/{} samples ok", ok, total))
}

fn is_ok(value: &Value) -> bool {
    matches!(value, Value::String(s) if s == OK_VALUE)
}

/// Run one feature-availability check against `backend`.
///
/// Query failures are downgraded to UNKNOWN for this check only.
pub async fn evaluate<B: QueryBackend>(
    backend: &B,
    descriptor: &CheckDescriptor,
    check: &FeatureCheck,
) -> Evaluation {
    let request = build_request(descriptor, check);

    match backend.query(&request).await {
        Ok(response) => {
            let evaluation = classify(&response, &check.feature_name);
            debug!(
                check = %descriptor.path(),
                severity = %evaluation.severity,
                summary = %evaluation.summary,
                "evaluated feature availability"
            );
            evaluation
        }
        Err(e) => {
            warn!(check = %descriptor.path(), error = %e, "query failed");
            Evaluation::new(Severity::Unknown, format!("query failed: {}", e))
        }
    }
}
