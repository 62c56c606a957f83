//! Folding per-check severities into one customer severity.

use influxwatch_types::Severity;

use super::{CheckDescriptor, CheckStatus};
use crate::CheckError;

/// Customer-level severity of a set of check results.
///
/// Evaluated in order:
///
/// 1. any UNKNOWN  → CRITICAL
/// 2. any CRITICAL → CRITICAL
/// 3. all OK       → OK
/// 4. otherwise    → CRITICAL
///
/// UNKNOWN is deliberately folded into CRITICAL so a supervisor always gets a
/// clear pass/fail at the top level. This is not `max()`, which would surface
/// UNKNOWN. Returns `None` for an empty input.
pub fn aggregate<I>(results: I) -> Option<Severity>
where
    I: IntoIterator<Item = Severity>,
{
    let mut seen = false;
    let mut all_ok = true;
    for severity in results {
        seen = true;
        all_ok &= severity == Severity::Ok;
    }

    match (seen, all_ok) {
        (false, _) => None,
        (true, true) => Some(Severity::Ok),
        (true, false) => Some(Severity::Critical),
    }
}

/// Aggregate a customer's descriptors once every runnable check is evaluated.
///
/// Unsupported checks are left out. Fails if any check is still pending, or
/// if nothing was evaluated.
pub fn aggregate_checks(customer: &str, checks: &[CheckDescriptor]) -> Result<Severity, CheckError> {
    let pending = checks.iter().filter(|c| c.is_pending()).count();
    if pending > 0 {
        return Err(CheckError::Incomplete(pending));
    }

    aggregate(checks.iter().filter_map(|c| match &c.status {
        CheckStatus::Evaluated(evaluation) => Some(evaluation.severity),
        _ => None,
    }))
    .ok_or_else(|| CheckError::NoChecks(customer.to_string()))
}
