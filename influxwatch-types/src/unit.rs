//! Units used to express a check's sanity period.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Unit of a sanity period, as written in the check map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MeasureUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl MeasureUnit {
    /// Number of seconds in one unit.
    pub const fn seconds(self) -> u64 {
        match self {
            MeasureUnit::Seconds => 1,
            MeasureUnit::Minutes => 60,
            MeasureUnit::Hours => 3_600,
            MeasureUnit::Days => 86_400,
        }
    }

    /// Lookback window in whole seconds for `period` units.
    ///
    /// Fractional periods are rounded to the nearest second; negative or
    /// non-finite periods yield 0.
    pub fn lookback_secs(self, period: f64) -> u64 {
        // `as` saturates at the bounds and maps NaN to 0.
        (period * self.seconds() as f64).round().max(0.0) as u64
    }

    /// Name as written in the check map.
    pub const fn as_str(self) -> &'static str {
        match self {
            MeasureUnit::Seconds => "seconds",
            MeasureUnit::Minutes => "minutes",
            MeasureUnit::Hours => "hours",
            MeasureUnit::Days => "days",
        }
    }
}

impl fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a unit name outside seconds/minutes/hours/days.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measure_unit '{0}'")]
pub struct ParseMeasureUnitError(pub String);

impl FromStr for MeasureUnit {
    type Err = ParseMeasureUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seconds" => Ok(MeasureUnit::Seconds),
            "minutes" => Ok(MeasureUnit::Minutes),
            "hours" => Ok(MeasureUnit::Hours),
            "days" => Ok(MeasureUnit::Days),
            other => Err(ParseMeasureUnitError(other.to_string())),
        }
    }
}
