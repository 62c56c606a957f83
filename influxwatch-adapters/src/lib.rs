//! # influxwatch-adapters
//!
//! Time-series backends that influxwatch checks run against.
//!
//! The checks only rely on a narrow contract, [`QueryBackend`]: send one
//! [`QueryRequest`] (endpoint, database and an InfluxQL [`SelectQuery`]) and get
//! back either a [`Table`] of rows or an explicit [`QueryResponse::NoSeries`]
//! marker. Failures to talk to the backend are reported as [`AdapterError`]
//! so callers can tell "no data" apart from "query failed".
//!
//! ## Supported Systems
//!
//! - **InfluxDB 1.x** (`influxdb` feature) - queries the `/query` HTTP API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "influxdb")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use influxwatch_adapters::influxdb::InfluxDbAdapter;
//! use influxwatch_adapters::{Order, QueryBackend, QueryRequest, SelectQuery};
//!
//! let adapter = InfluxDbAdapter::builder().build()?;
//!
//! let query = SelectQuery::new("probes")
//!     .columns(["host", "state"])
//!     .lookback_secs(600)
//!     .filter("host", "web01")
//!     .order(Order::Descending);
//! let request = QueryRequest::new("127.0.0.1:8086".parse()?, "telegraf", query);
//!
//! let response = adapter.query(&request).await?;
//! println!("{} rows", response.row_count());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod query;

#[cfg(feature = "influxdb")]
pub mod influxdb;

pub use backend::{QueryBackend, QueryResponse, Table};
pub use error::AdapterError;
pub use query::{Order, QueryRequest, SelectQuery};

// Re-export types for convenience
pub use influxwatch_types::Endpoint;
