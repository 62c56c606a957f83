//! Severity scale shared by checks and aggregates.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Result classification of a check or of a whole customer run.
///
/// Ranks follow the monitoring-plugin convention and double as process exit
/// codes: OK=0, WARNING=1, CRITICAL=2, UNKNOWN=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    #[cfg_attr(feature = "serde", serde(rename = "OK"))]
    Ok = 0,
    #[cfg_attr(feature = "serde", serde(rename = "WARNING"))]
    Warning = 1,
    #[cfg_attr(feature = "serde", serde(rename = "CRITICAL"))]
    Critical = 2,
    #[cfg_attr(feature = "serde", serde(rename = "UNKNOWN"))]
    Unknown = 3,
}

/// Fixed rank/name table, in rank order.
const NAMES: [(Severity, &str); 4] = [
    (Severity::Ok, "OK"),
    (Severity::Warning, "WARNING"),
    (Severity::Critical, "CRITICAL"),
    (Severity::Unknown, "UNKNOWN"),
];

impl Severity {
    /// All severities in rank order.
    pub const ALL: [Severity; 4] = [
        Severity::Ok,
        Severity::Warning,
        Severity::Critical,
        Severity::Unknown,
    ];

    /// Numeric rank (0..=3).
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Process exit code for this severity.
    pub const fn exit_code(self) -> u8 {
        self.rank()
    }

    /// Upper-case display name, e.g. `"CRITICAL"`.
    pub const fn name(self) -> &'static str {
        NAMES[self as usize].1
    }

    /// Look up a severity by rank.
    pub fn from_rank(rank: u8) -> Option<Self> {
        NAMES.get(rank as usize).map(|(severity, _)| *severity)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity '{0}'")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(severity, _)| *severity)
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}
