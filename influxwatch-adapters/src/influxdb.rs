//! InfluxDB 1.x adapter using the `/query` HTTP API.
//!
//! Each [`QueryRequest`] becomes one `GET /query?db=<database>&q=<influxql>`
//! against the request's endpoint, so a single adapter can serve checks for
//! any number of InfluxDB instances.
//!
//! ## Response handling
//!
//! InfluxDB wraps results in an envelope:
//!
//! ```json
//! {"results": [{"statement_id": 0, "series": [{"name": "...", "columns": [...], "values": [[...]]}]}]}
//! ```
//!
//! - a statement without `series` decodes to [`QueryResponse::NoSeries`]
//! - a statement or top-level `error` becomes [`AdapterError::Query`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use influxwatch_adapters::influxdb::InfluxDbAdapter;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = InfluxDbAdapter::builder()
//!     .credentials("monitor", "secret")
//!     .timeout(Duration::from_secs(5))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{AdapterError, QueryBackend, QueryRequest, QueryResponse, Table};

/// InfluxDB adapter for running check queries.
#[derive(Debug, Clone)]
pub struct InfluxDbAdapter {
    client: Client,
    scheme: String,
    username: Option<String>,
    password: Option<String>,
    epoch: String,
}

impl InfluxDbAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> InfluxDbAdapterBuilder {
        InfluxDbAdapterBuilder::default()
    }

    /// Run one query and decode the first statement's result.
    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse, AdapterError> {
        let url = format!(
            "{}://{}:{}/query",
            self.scheme, request.endpoint.host, request.endpoint.port
        );
        let influxql = request.query.to_influxql();
        debug!(%url, database = %request.database, query = %influxql, "querying influxdb");

        let mut builder = self.client.get(&url).query(&[
            ("db", request.database.as_str()),
            ("q", influxql.as_str()),
            ("epoch", self.epoch.as_str()),
        ]);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_ref());
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AdapterError::Auth("Invalid credentials".to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            // InfluxDB reports bad queries as 400 with an {"error": ...} body.
            if let Ok(QueryEnvelope {
                error: Some(error), ..
            }) = serde_json::from_str::<QueryEnvelope>(&body)
            {
                return Err(AdapterError::Query(error));
            }
            return Err(AdapterError::Http(format!("API returned status {}", status)));
        }

        decode_response(&body)
    }
}

impl QueryBackend for InfluxDbAdapter {
    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, AdapterError> {
        self.execute(request).await
    }
}

/// Builder for InfluxDbAdapter.
#[derive(Debug, Default)]
pub struct InfluxDbAdapterBuilder {
    scheme: Option<String>,
    username: Option<String>,
    password: Option<String>,
    epoch: Option<String>,
    timeout: Option<Duration>,
}

impl InfluxDbAdapterBuilder {
    /// Set the URL scheme (default: "http").
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Set the username and password for basic authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the timestamp precision of returned rows (default: "s").
    pub fn epoch(mut self, epoch: impl Into<String>) -> Self {
        self.epoch = Some(epoch.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<InfluxDbAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(InfluxDbAdapter {
            client,
            scheme: self.scheme.unwrap_or_else(|| "http".to_string()),
            username: self.username,
            password: self.password,
            epoch: self.epoch.unwrap_or_else(|| "s".to_string()),
        })
    }
}

/// Decode a successful `/query` response body.
fn decode_response(body: &str) -> Result<QueryResponse, AdapterError> {
    let envelope: QueryEnvelope =
        serde_json::from_str(body).map_err(|e| AdapterError::Parse(e.to_string()))?;

    if let Some(error) = envelope.error {
        return Err(AdapterError::Query(error));
    }

    let statement = envelope
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::Parse("response carried no statement results".to_string()))?;

    if let Some(error) = statement.error {
        return Err(AdapterError::Query(error));
    }

    match statement.series.and_then(|s| s.into_iter().next()) {
        Some(series) => Ok(QueryResponse::Table(Table::new(
            series.name,
            series.columns,
            series.values,
        ))),
        None => Ok(QueryResponse::NoSeries),
    }
}

/// Response envelope of the InfluxDB `/query` endpoint.
#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    #[allow(dead_code)]
    statement_id: u32,
    #[serde(default)]
    series: Option<Vec<Series>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}
