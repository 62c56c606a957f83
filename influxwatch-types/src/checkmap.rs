//! The check map: per-customer configuration of what to check and where.
//!
//! The tree is strictly nested and owned top-down:
//!
//! ```text
//! CheckMap
//!  └─ Customer ─ DataSource ─ Database ─ Measurement ─ Host ─ Test ─ Transaction ─ CheckDef
//! ```
//!
//! Every level keeps its children in file order. That order is significant:
//! it is the order in which checks are executed and reported.

use serde_json::{Map, Value};

use crate::{MeasureUnit, INFLUXDB_SOURCE_NAME};

/// Check name tag of the feature-availability check.
pub const FEATURE_AVAILABILITY: &str = "check_feature_availability";

/// Root of a check-map file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckMap {
    pub customers: Vec<Customer>,
}

impl CheckMap {
    /// Customer names in file order.
    pub fn customer_names(&self) -> impl Iterator<Item = &str> {
        self.customers.iter().map(|c| c.customer_name.as_str())
    }

    /// Find a customer by exact name.
    ///
    /// If several entries share the name, the last one wins.
    pub fn customer(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().rfind(|c| c.customer_name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    pub customer_name: String,
    pub data_sources: Vec<DataSource>,
}

impl Customer {
    /// The InfluxDB data source, last one wins if repeated.
    pub fn influxdb(&self) -> Option<&DataSource> {
        self.data_sources
            .iter()
            .rfind(|s| s.data_source_name == INFLUXDB_SOURCE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataSource {
    pub data_source_name: String,
    /// `<ip>:<port>` of the backend.
    pub data_source_ip_port: String,
    pub databases: Vec<Database>,
}

impl DataSource {
    /// Number of leaf check definitions below this source.
    pub fn check_count(&self) -> usize {
        self.databases
            .iter()
            .flat_map(|d| &d.measurements)
            .flat_map(|m| &m.hosts)
            .flat_map(|h| &h.tests)
            .flat_map(|t| &t.transactions)
            .map(|t| t.checks.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Database {
    pub database: String,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub measurement: String,
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Host {
    pub host: String,
    pub tests: Vec<Test>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Test {
    pub test_name: String,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub transaction_name: String,
    pub checks: Vec<CheckDef>,
}

/// A single configured check.
///
/// Everything besides `check_name` is kept as raw JSON so that check kinds
/// this version does not understand, or parameters of an unexpected type,
/// still load; [`CheckDef::kind`] decides whether the definition is runnable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckDef {
    pub check_name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub params: Map<String, Value>,
}

impl CheckDef {
    /// A definition with no parameters.
    pub fn new(check_name: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            params: Map::new(),
        }
    }

    /// Set a parameter, replacing any previous value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// A feature-availability definition.
    pub fn feature_availability(
        feature_name: impl Into<String>,
        measure_unit: MeasureUnit,
        sanity_period: f64,
    ) -> Self {
        Self::new(FEATURE_AVAILABILITY)
            .with_param("feature_name", feature_name.into())
            .with_param("measure_unit", measure_unit.as_str())
            .with_param("sanity_period", sanity_period)
    }

    /// Classify this definition into a runnable kind.
    pub fn kind(&self) -> CheckKind {
        if self.check_name != FEATURE_AVAILABILITY {
            return self.unsupported("unknown check kind".to_string());
        }

        match self.feature_check() {
            Ok(check) => CheckKind::FeatureAvailability(check),
            Err(reason) => self.unsupported(reason),
        }
    }

    fn unsupported(&self, reason: String) -> CheckKind {
        CheckKind::Unsupported {
            check_name: self.check_name.clone(),
            reason,
        }
    }

    fn feature_check(&self) -> Result<FeatureCheck, String> {
        let missing = ["feature_name", "measure_unit", "sanity_period"]
            .into_iter()
            .filter(|field| !self.params.contains_key(*field))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }

        let feature_name = match &self.params["feature_name"] {
            Value::String(name) if name.is_empty() => return Err("empty feature_name".to_string()),
            Value::String(name) => name.clone(),
            other => return Err(format!("feature_name must be a string, got {}", other)),
        };

        let measure_unit = match &self.params["measure_unit"] {
            Value::String(unit) => unit.parse::<MeasureUnit>().map_err(|e| e.to_string())?,
            other => return Err(format!("measure_unit must be a string, got {}", other)),
        };

        let sanity_period = match &self.params["sanity_period"] {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .filter(|period| period.is_finite() && *period >= 0.0)
        .ok_or_else(|| {
            format!(
                "sanity_period must be a non-negative number, got {}",
                self.params["sanity_period"]
            )
        })?;

        Ok(FeatureCheck {
            feature_name,
            measure_unit,
            sanity_period,
        })
    }
}

/// What a [`CheckDef`] asks for, once validated.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckKind {
    /// At least one sample within the sanity period reports the feature as "ok".
    FeatureAvailability(FeatureCheck),
    /// A definition that cannot be run: unknown kind or unusable parameters.
    Unsupported { check_name: String, reason: String },
}

impl CheckKind {
    pub fn is_supported(&self) -> bool {
        !matches!(self, CheckKind::Unsupported { .. })
    }
}

/// Parameters of a feature-availability check.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCheck {
    pub feature_name: String,
    pub measure_unit: MeasureUnit,
    /// Number of `measure_unit`s to look back; may be fractional.
    pub sanity_period: f64,
}

impl FeatureCheck {
    /// Lookback window in whole seconds.
    pub fn lookback_secs(&self) -> u64 {
        self.measure_unit.lookback_secs(self.sanity_period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(name: &str, sources: &[(&str, &str)]) -> Customer {
        Customer {
            customer_name: name.to_string(),
            data_sources: sources
                .iter()
                .map(|(source, addr)| DataSource {
                    data_source_name: source.to_string(),
                    data_source_ip_port: addr.to_string(),
                    databases: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_customer_lookup_exact_and_last_wins() {
        let map = CheckMap {
            customers: vec![
                customer("acme", &[("influxdb", "10.0.0.1:8086")]),
                customer("globex", &[]),
                customer("acme", &[("influxdb", "10.0.0.2:8086")]),
            ],
        };

        let names: Vec<_> = map.customer_names().collect();
        assert_eq!(names, vec!["acme", "globex", "acme"]);

        let acme = map.customer("acme").unwrap();
        assert_eq!(acme.data_sources[0].data_source_ip_port, "10.0.0.2:8086");
        assert!(map.customer("ACME").is_none());
        assert!(map.customer("acm").is_none());
    }

    #[test]
    fn test_influxdb_source_lookup() {
        let c = customer("acme", &[("graphite", "g:2003"), ("influxdb", "i:8086")]);
        assert_eq!(c.influxdb().unwrap().data_source_ip_port, "i:8086");

        let c = customer("acme", &[("graphite", "g:2003")]);
        assert!(c.influxdb().is_none());
    }

    #[test]
    fn test_feature_availability_kind() {
        let def = CheckDef::feature_availability("state", MeasureUnit::Minutes, 30.0);
        match def.kind() {
            CheckKind::FeatureAvailability(check) => {
                assert_eq!(check.feature_name, "state");
                assert_eq!(check.lookback_secs(), 1_800);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let def = CheckDef::new("check_latency");
        let kind = def.kind();
        assert!(!kind.is_supported());
        assert_eq!(
            kind,
            CheckKind::Unsupported {
                check_name: "check_latency".to_string(),
                reason: "unknown check kind".to_string(),
            }
        );
    }

    #[test]
    fn test_incomplete_feature_check_is_unsupported() {
        let def = CheckDef::new(FEATURE_AVAILABILITY).with_param("feature_name", "state");
        match def.kind() {
            CheckKind::Unsupported { reason, .. } => {
                assert_eq!(reason, "missing measure_unit, sanity_period");
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    fn reason(def: &CheckDef) -> String {
        match def.kind() {
            CheckKind::Unsupported { reason, .. } => reason,
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    fn period(value: Value) -> CheckDef {
        CheckDef::new(FEATURE_AVAILABILITY)
            .with_param("feature_name", "state")
            .with_param("measure_unit", "hours")
            .with_param("sanity_period", value)
    }

    #[test]
    fn test_float_sanity_period() {
        let whole = period(serde_json::json!(10.0));
        match whole.kind() {
            CheckKind::FeatureAvailability(check) => assert_eq!(check.lookback_secs(), 36_000),
            other => panic!("unexpected kind: {:?}", other),
        }

        let fractional = period(serde_json::json!(1.5));
        match fractional.kind() {
            CheckKind::FeatureAvailability(check) => assert_eq!(check.lookback_secs(), 5_400),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_bad_sanity_period_is_unsupported() {
        assert_eq!(
            reason(&period(serde_json::json!(-1))),
            "sanity_period must be a non-negative number, got -1"
        );
        assert_eq!(
            reason(&period(serde_json::json!("5m"))),
            "sanity_period must be a non-negative number, got \"5m\""
        );
    }

    #[test]
    fn test_bad_unit_and_name_are_unsupported() {
        let weeks = period(serde_json::json!(2)).with_param("measure_unit", "weeks");
        assert_eq!(reason(&weeks), "unknown measure_unit 'weeks'");

        let numeric = period(serde_json::json!(2)).with_param("measure_unit", 60);
        assert_eq!(reason(&numeric), "measure_unit must be a string, got 60");

        let empty = period(serde_json::json!(2)).with_param("feature_name", "");
        assert_eq!(reason(&empty), "empty feature_name");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_check_map() {
        let json = r#"{
            "customers": [{
                "customer_name": "acme",
                "data_sources": [{
                    "data_source_name": "influxdb",
                    "data_source_ip_port": "127.0.0.1:8086",
                    "databases": [{
                        "database": "telegraf",
                        "measurements": [{
                            "measurement": "probes",
                            "hosts": [{
                                "host": "web01",
                                "tests": [{
                                    "test_name": "login",
                                    "transactions": [{
                                        "transaction_name": "open_page",
                                        "checks": [
                                            {
                                                "check_name": "check_feature_availability",
                                                "feature_name": "state",
                                                "measure_unit": "minutes",
                                                "sanity_period": 15
                                            },
                                            {
                                                "check_name": "check_latency",
                                                "sanity_period": "5m",
                                                "measure_unit": "weeks"
                                            },
                                            {
                                                "check_name": "check_feature_availability",
                                                "feature_name": "state",
                                                "measure_unit": "hours",
                                                "sanity_period": 1.5
                                            }
                                        ]
                                    }]
                                }]
                            }]
                        }]
                    }]
                }]
            }]
        }"#;

        let map: CheckMap = serde_json::from_str(json).unwrap();
        let source = map.customer("acme").unwrap().influxdb().unwrap();
        assert_eq!(source.check_count(), 3);

        let checks = &source.databases[0].measurements[0].hosts[0].tests[0].transactions[0].checks;
        assert!(checks[0].kind().is_supported());
        assert_eq!(checks[1].params["sanity_period"], "5m");
        assert_eq!(reason(&checks[1]), "unknown check kind");
        assert!(checks[2].kind().is_supported());
    }
}
