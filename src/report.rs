//! Rendering check runs for a monitoring supervisor.
//!
//! The first line printed is the status line a Nagios-family poller shows;
//! detail lines are pipe-separated so they can be parsed without guessing:
//!
//! ```text
//! CRITICAL - acme: 3 checks, 2 ok, 0 critical, 1 unknown
//! OK|telegraf|probes|web01|shop|login|state|4/4 samples ok
//! UNKNOWN|telegraf|probes|web01|shop|search|state|no series returned
//! ```
//!
//! A literal `|` inside a field is written as `\|` and a backslash as `\\`,
//! so splitting on unescaped pipes always yields eight fields.

use serde_json::{json, Value};

use influxwatch_types::Severity;

use crate::check::CheckStatus;
use crate::run::CheckRun;

/// Label used for unsupported checks in detail lines.
pub const UNSUPPORTED: &str = "UNSUPPORTED";

/// One-line summary of a customer run.
pub fn status_line(run: &CheckRun) -> String {
    let counts = run.counts();
    let mut line = format!(
        "{} - {}: {} checks, {} ok, {} critical, {} unknown",
        run.aggregate,
        run.customer,
        counts.total(),
        counts.ok,
        counts.critical,
        counts.unknown
    );
    if counts.warning > 0 {
        line.push_str(&format!(", {} warning", counts.warning));
    }
    if counts.unsupported > 0 {
        line.push_str(&format!(", {} unsupported", counts.unsupported));
    }
    line
}

/// Status line for a run over several customers.
pub fn overall_line(overall: Severity, runs: &[CheckRun]) -> String {
    let failing = runs.iter().filter(|r| r.aggregate != Severity::Ok).count();
    format!(
        "{} - {} customers checked, {} failing",
        overall,
        runs.len(),
        failing
    )
}

/// One line per check, in run order.
pub fn detail_lines(run: &CheckRun) -> Vec<String> {
    run.checks
        .iter()
        .map(|check| {
            let (label, summary) = match &check.status {
                CheckStatus::Evaluated(evaluation) => {
                    (evaluation.severity.name(), evaluation.summary.as_str())
                }
                CheckStatus::Unsupported(reason) => (UNSUPPORTED, reason.as_str()),
                CheckStatus::Pending => ("PENDING", ""),
            };
            [
                label,
                check.database.as_str(),
                check.measurement.as_str(),
                check.host.as_str(),
                check.test_name.as_str(),
                check.transaction_name.as_str(),
                check.target(),
                summary,
            ]
            .map(escape_field)
            .join("|")
        })
        .collect()
}

fn escape_field(field: &str) -> String {
    field.replace('\\', "\\\\").replace('|', "\\|")
}

/// Full report as JSON, for `--export`.
pub fn to_json(runs: &[CheckRun], overall: Severity) -> Value {
    let customers: Vec<Value> = runs
        .iter()
        .map(|run| {
            let counts = run.counts();
            json!({
                "customer": run.customer,
                "aggregate": run.aggregate,
                "summary": {
                    "total": counts.total(),
                    "ok": counts.ok,
                    "warning": counts.warning,
                    "critical": counts.critical,
                    "unknown": counts.unknown,
                    "unsupported": counts.unsupported,
                },
                "checks": run.checks.iter().map(|check| {
                    let (severity, summary) = match &check.status {
                        CheckStatus::Evaluated(e) => (Some(e.severity), e.summary.as_str()),
                        CheckStatus::Unsupported(reason) => (None, reason.as_str()),
                        CheckStatus::Pending => (None, ""),
                    };
                    json!({
                        "endpoint": check.endpoint.to_string(),
                        "database": check.database,
                        "measurement": check.measurement,
                        "host": check.host,
                        "test_name": check.test_name,
                        "transaction_name": check.transaction_name,
                        "target": check.target(),
                        "supported": check.kind.is_supported(),
                        "severity": severity,
                        "summary": summary,
                    })
                }).collect::<Vec<_>>()
            })
        })
        .collect();

    json!({
        "overall": overall,
        "customers": customers,
    })
}
