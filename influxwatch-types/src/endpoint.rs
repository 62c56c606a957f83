//! Data source endpoint addresses.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Errors from parsing a `"<host>:<port>"` endpoint string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The string is not of the form `<host>:<port>`.
    #[error("malformed endpoint '{0}': expected <host>:<port>")]
    Malformed(String),
}

/// Host and port of a time-series backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    /// Splits on the first colon, so the port part must be numeric.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EndpointError::Malformed(s.to_string());
        let (host, port) = s.split_once(':').ok_or_else(malformed)?;
        let host = host.trim();
        if host.is_empty() {
            return Err(malformed());
        }
        let port = port.trim().parse::<u16>().map_err(|_| malformed())?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
