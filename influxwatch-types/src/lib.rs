//! # influxwatch-types
//!
//! Core types shared by the influxwatch crates: the [`Severity`] scale used
//! for per-check results and customer aggregates, and the check-map
//! configuration tree that describes what to check for each customer.
//!
//! ## Features
//!
//! - `serde`: (de)serialization of the check map and severities via serde
//!
//! ## Example
//!
//! ```rust
//! use influxwatch_types::{Endpoint, MeasureUnit, Severity};
//!
//! let endpoint: Endpoint = "10.0.0.5:8086".parse().unwrap();
//! assert_eq!(endpoint.port, 8086);
//!
//! assert_eq!(MeasureUnit::Minutes.lookback_secs(15.0), 900);
//! assert!(Severity::Critical > Severity::Ok);
//! ```

mod checkmap;
mod endpoint;
mod severity;
mod unit;

pub use checkmap::*;
pub use endpoint::*;
pub use severity::*;
pub use unit::*;

/// Name of the only data source the checks know how to query.
pub const INFLUXDB_SOURCE_NAME: &str = "influxdb";
