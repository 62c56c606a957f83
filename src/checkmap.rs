//! Loading the check map and resolving one customer's configuration.

use std::fs;
use std::path::{Path, PathBuf};

use influxwatch_types::{CheckMap, Customer, Database, Endpoint, INFLUXDB_SOURCE_NAME};

use crate::CheckError;

/// Check map path used when only a customer name is given.
pub fn default_check_map_path(customer: &str) -> PathBuf {
    PathBuf::from(format!("{}_check_map.json", customer))
}

/// Read and parse a check map file.
pub fn load_check_map(path: &Path) -> Result<CheckMap, CheckError> {
    let unreadable = |reason: String| CheckError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| unreadable(format!("Read error: {}", e)))?;
    serde_json::from_str(&content).map_err(|e| unreadable(format!("Parse error: {}", e)))
}

/// The InfluxDB part of one customer's check map.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerConfig {
    pub name: String,
    /// `<host>:<port>` as written in the check map; split by the expander.
    pub address: String,
    pub databases: Vec<Database>,
}

impl CustomerConfig {
    /// Resolve `name` to its InfluxDB configuration.
    ///
    /// The name must match exactly. Fails with `NotFound` if the customer or
    /// its `influxdb` data source is missing.
    pub fn from_check_map(map: &CheckMap, name: &str) -> Result<Self, CheckError> {
        let customer = map
            .customer(name)
            .ok_or_else(|| CheckError::not_found(name, "customers"))?;
        Self::from_customer(customer)
    }

    pub fn from_customer(customer: &Customer) -> Result<Self, CheckError> {
        let source = customer
            .influxdb()
            .ok_or_else(|| CheckError::not_found(INFLUXDB_SOURCE_NAME, "data_sources"))?;
        Ok(Self {
            name: customer.customer_name.clone(),
            address: source.data_source_ip_port.clone(),
            databases: source.databases.clone(),
        })
    }

    /// Parsed data source endpoint.
    pub fn endpoint(&self) -> Result<Endpoint, CheckError> {
        Ok(self.address.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "customers": [
                {
                    "customer_name": "acme",
                    "data_sources": [
                        { "data_source_name": "graphite", "data_source_ip_port": "10.0.0.9:2003", "databases": [] },
                        { "data_source_name": "influxdb", "data_source_ip_port": "10.0.0.1:8086", "databases": [
                            { "database": "telegraf", "measurements": [] }
                        ] }
                    ]
                },
                {
                    "customer_name": "globex",
                    "data_sources": [
                        { "data_source_name": "graphite", "data_source_ip_port": "10.0.0.9:2003", "databases": [] }
                    ]
                }
            ]
        }"#
    }

    fn sample_map() -> CheckMap {
        serde_json::from_str(sample_json()).unwrap()
    }

    #[test]
    fn test_default_check_map_path() {
        assert_eq!(
            default_check_map_path("acme"),
            PathBuf::from("acme_check_map.json")
        );
    }

    #[test]
    fn test_load_check_map() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let map = load_check_map(file.path()).unwrap();
        assert_eq!(map.customers.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_check_map(Path::new("/nonexistent/acme_check_map.json")).unwrap_err();
        match err {
            CheckError::ConfigUnreadable { reason, .. } => assert!(reason.contains("Read error")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let err = load_check_map(file.path()).unwrap_err();
        match err {
            CheckError::ConfigUnreadable { reason, .. } => assert!(reason.contains("Parse error")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_customer_config_lookup() {
        let config = CustomerConfig::from_check_map(&sample_map(), "acme").unwrap();
        assert_eq!(config.name, "acme");
        assert_eq!(config.address, "10.0.0.1:8086");
        assert_eq!(config.databases.len(), 1);
        assert_eq!(config.endpoint().unwrap(), Endpoint::new("10.0.0.1", 8086));
    }

    #[test]
    fn test_missing_customer() {
        let err = CustomerConfig::from_check_map(&sample_map(), "Acme").unwrap_err();
        assert_eq!(err.to_string(), "'Acme' not found in 'customers'");
    }

    #[test]
    fn test_missing_influxdb_source() {
        let err = CustomerConfig::from_check_map(&sample_map(), "globex").unwrap_err();
        assert_eq!(err.to_string(), "'influxdb' not found in 'data_sources'");
    }
}
