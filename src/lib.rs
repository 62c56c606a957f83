//! # influxwatch
//!
//! A monitoring-plugin check for feature availability recorded in InfluxDB.
//!
//! For a customer described in a check map, influxwatch queries recent
//! samples for every configured check, classifies each one, and folds the
//! results into a single severity whose rank is the process exit code
//! expected by Nagios-family pollers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Runner                                 │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌───────────────┐  │
//! │  │ checkmap │──▶│  expand  │──▶│ feature  │──▶│   aggregate   │  │
//! │  │ (config) │   │(flatten) │   │(evaluate)│   │ (worst-of)    │  │
//! │  └──────────┘   └──────────┘   └────┬─────┘   └───────┬───────┘  │
//! │                                     │                 ▼          │
//! │                                     ▼             ┌────────┐     │
//! │                              QueryBackend         │ report │     │
//! │                           (InfluxDbAdapter)       └────────┘     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`checkmap`]**: loading the check map and resolving a customer
//! - **[`check`]**: descriptors, the expander, the feature-availability check
//!   and the aggregation policy
//! - **[`run`]**: the [`Runner`] that ties them together per customer
//! - **[`report`]**: status/detail lines and the JSON export
//! - **[`settings`]**: backend connection settings
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Check one customer; exit code is the aggregate severity
//! influxwatch --config check_map.json --customer acme -v
//!
//! # Check every customer in the map
//! influxwatch --config check_map.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::path::Path;
//! use influxwatch::{Runner, Settings};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = Runner::new(Settings::default().adapter()?);
//! let runs = runner.run_file(Path::new("acme_check_map.json"), Some("acme")).await?;
//! println!("{}", influxwatch::report::status_line(&runs[0]));
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod checkmap;
pub mod error;
pub mod report;
pub mod run;
pub mod settings;

// Re-export main types for convenience
pub use check::{CheckDescriptor, CheckStatus, Evaluation};
pub use checkmap::{default_check_map_path, load_check_map, CustomerConfig};
pub use error::CheckError;
pub use run::{overall, CheckRun, Counts, Runner};
pub use settings::Settings;

pub use influxwatch_types::Severity;
