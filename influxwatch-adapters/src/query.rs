//! InfluxQL query construction.
//!
//! Building a query is pure: the same inputs always render the same string,
//! so the exact text sent to the backend can be asserted in tests.

use std::collections::BTreeMap;
use std::fmt;

use influxwatch_types::Endpoint;

/// The synthetic timestamp column, always selected first.
pub const TIME_COLUMN: &str = "time";

/// Sort direction on the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    fn keyword(self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }
}

/// A `SELECT` over a trailing time window.
///
/// ```rust
/// use influxwatch_adapters::{Order, SelectQuery};
///
/// let query = SelectQuery::new("probes")
///     .columns(["host", "state"])
///     .lookback_secs(300)
///     .filter("host", "web01")
///     .order(Order::Descending);
///
/// assert_eq!(
///     query.to_influxql(),
///     "SELECT time,\"host\",\"state\" FROM \"probes\" \
///      WHERE time > now() - 300s AND time < now() AND \"host\" = 'web01' \
///      ORDER BY time DESC"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    measurement: String,
    columns: Vec<String>,
    lookback_secs: u64,
    filters: BTreeMap<String, String>,
    order: Order,
}

impl SelectQuery {
    /// Start a query against `measurement`.
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            columns: Vec::new(),
            lookback_secs: 0,
            filters: BTreeMap::new(),
            order: Order::default(),
        }
    }

    /// Add columns to select. `time` is always selected and need not be listed.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            if column != TIME_COLUMN && !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self
    }

    /// Restrict to the last `secs` seconds.
    pub fn lookback_secs(mut self, secs: u64) -> Self {
        self.lookback_secs = secs;
        self
    }

    /// Require `column = 'value'`. A repeated column replaces the earlier value.
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Selected columns, including the leading `time`.
    pub fn selected_columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(TIME_COLUMN).chain(self.columns.iter().map(String::as_str))
    }

    pub fn window_secs(&self) -> u64 {
        self.lookback_secs
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn sort_order(&self) -> Order {
        self.order
    }

    /// Render the query as InfluxQL.
    pub fn to_influxql(&self) -> String {
        let mut fields = vec![TIME_COLUMN.to_string()];
        fields.extend(self.columns.iter().map(|c| quote_ident(c)));

        let mut conditions = vec![
            format!("time > now() - {}s", self.lookback_secs),
            "time < now()".to_string(),
        ];
        conditions.extend(
            self.filters
                .iter()
                .map(|(column, value)| format!("{} = {}", quote_ident(column), quote_literal(value))),
        );

        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY time {}",
            fields.join(","),
            quote_ident(&self.measurement),
            conditions.join(" AND "),
            self.order.keyword()
        )
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_influxql())
    }
}

/// One backend round-trip: where to send the query and what to ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub endpoint: Endpoint,
    pub database: String,
    pub query: SelectQuery,
}

impl QueryRequest {
    pub fn new(endpoint: Endpoint, database: impl Into<String>, query: SelectQuery) -> Self {
        Self {
            endpoint,
            database: database.into(),
            query,
        }
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('\\', "\\\\").replace('"', "\\\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
