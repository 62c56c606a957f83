//! Flattening a customer's check map into descriptors.

use tracing::{debug, warn};

use influxwatch_types::CheckKind;

use super::{CheckDescriptor, CheckStatus};
use crate::checkmap::CustomerConfig;
use crate::CheckError;

/// Expand `customer` into one descriptor per check definition.
///
/// Traversal is depth-first over database, measurement, host, test,
/// transaction and check, keeping file order at every level; report order
/// depends on it. Unsupported definitions are kept in place with an
/// [`CheckStatus::Unsupported`] status so they stay visible in reports.
pub fn expand(customer: &CustomerConfig) -> Result<Vec<CheckDescriptor>, CheckError> {
    let endpoint = customer.endpoint()?;
    let mut checks = Vec::new();

    for database in &customer.databases {
        require("database", &database.database, &customer.name)?;
        for measurement in &database.measurements {
            let location = format!("{}/{}", database.database, measurement.measurement);
            require("measurement", &measurement.measurement, &location)?;
            for host in &measurement.hosts {
                require("host", &host.host, &location)?;
                for test in &host.tests {
                    let location = format!("{}/{}", location, host.host);
                    require("test_name", &test.test_name, &location)?;
                    for transaction in &test.transactions {
                        let location = format!("{}/{}", location, test.test_name);
                        require("transaction_name", &transaction.transaction_name, &location)?;
                        for def in &transaction.checks {
                            let kind = def.kind();
                            let status = match &kind {
                                CheckKind::FeatureAvailability(_) => CheckStatus::Pending,
                                CheckKind::Unsupported { check_name, reason } => {
                                    warn!(
                                        customer = %customer.name,
                                        check = %check_name,
                                        %reason,
                                        "skipping unsupported check"
                                    );
                                    CheckStatus::Unsupported(reason.clone())
                                }
                            };
                            checks.push(CheckDescriptor {
                                endpoint: endpoint.clone(),
                                database: database.database.clone(),
                                measurement: measurement.measurement.clone(),
                                host: host.host.clone(),
                                test_name: test.test_name.clone(),
                                transaction_name: transaction.transaction_name.clone(),
                                kind,
                                status,
                            });
                        }
                    }
                }
            }
        }
    }

    debug!(customer = %customer.name, checks = checks.len(), "expanded check map");
    Ok(checks)
}

fn require(field: &'static str, value: &str, location: &str) -> Result<(), CheckError> {
    if value.trim().is_empty() {
        return Err(CheckError::EmptyName {
            field,
            location: location.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use influxwatch_types::{
        CheckDef, Database, Host, MeasureUnit, Measurement, Test, Transaction,
    };

    fn transaction(name: &str, features: &[&str]) -> Transaction {
        Transaction {
            transaction_name: name.to_string(),
            checks: features
                .iter()
                .map(|f| CheckDef::feature_availability(*f, MeasureUnit::Minutes, 10.0))
                .collect(),
        }
    }

    fn host(name: &str, transactions: Vec<Transaction>) -> Host {
        Host {
            host: name.to_string(),
            tests: vec![Test {
                test_name: "login".to_string(),
                transactions,
            }],
        }
    }

    fn customer(databases: Vec<Database>) -> CustomerConfig {
        CustomerConfig {
            name: "acme".to_string(),
            address: "10.0.0.1:8086".to_string(),
            databases,
        }
    }

    fn sample() -> CustomerConfig {
        customer(vec![
            Database {
                database: "db1".to_string(),
                measurements: vec![Measurement {
                    measurement: "probes".to_string(),
                    hosts: vec![
                        host("web01", vec![transaction("t1", &["a", "b"])]),
                        host("web02", vec![transaction("t2", &["c"])]),
                    ],
                }],
            },
            Database {
                database: "db2".to_string(),
                measurements: vec![Measurement {
                    measurement: "probes".to_string(),
                    hosts: vec![host(
                        "web03",
                        vec![transaction("t3", &["d"]), transaction("t4", &["e"])],
                    )],
                }],
            },
        ])
    }

    #[test]
    fn test_expand_preserves_depth_first_order() {
        let checks = expand(&sample()).unwrap();

        let targets: Vec<_> = checks.iter().map(|c| c.target()).collect();
        assert_eq!(targets, vec!["a", "b", "c", "d", "e"]);

        let paths: Vec<_> = checks.iter().map(|c| c.path()).collect();
        assert_eq!(paths[0], "db1/probes/web01/login/t1/a");
        assert_eq!(paths[2], "db1/probes/web02/login/t2/c");
        assert_eq!(paths[4], "db2/probes/web03/login/t4/e");
    }

    #[test]
    fn test_expand_count_matches_leaf_definitions() {
        let config = sample();
        let leaves: usize = config
            .databases
            .iter()
            .flat_map(|d| &d.measurements)
            .flat_map(|m| &m.hosts)
            .flat_map(|h| &h.tests)
            .flat_map(|t| &t.transactions)
            .map(|t| t.checks.len())
            .sum();
        assert_eq!(expand(&config).unwrap().len(), leaves);
    }

    #[test]
    fn test_expand_carries_context() {
        let checks = expand(&sample()).unwrap();
        let first = &checks[0];
        assert_eq!(first.endpoint.host, "10.0.0.1");
        assert_eq!(first.endpoint.port, 8086);
        assert_eq!(first.database, "db1");
        assert_eq!(first.measurement, "probes");
        assert_eq!(first.host, "web01");
        assert_eq!(first.test_name, "login");
        assert_eq!(first.transaction_name, "t1");
        assert!(checks.iter().all(|c| c.is_pending()));
    }

    #[test]
    fn test_expand_keeps_unsupported_in_place() {
        let mut config = sample();
        let checks = &mut config.databases[0].measurements[0].hosts[0].tests[0].transactions[0].checks;
        checks.insert(
            1,
            CheckDef::new("check_latency"),
        );

        let expanded = expand(&config).unwrap();
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[1].target(), "check_latency");
        assert_eq!(
            expanded[1].status,
            CheckStatus::Unsupported("unknown check kind".to_string())
        );
        assert!(expanded[2].is_pending());
    }

    #[test]
    fn test_expand_malformed_endpoint() {
        let mut config = sample();
        config.address = "10.0.0.1".to_string();
        assert!(matches!(
            expand(&config),
            Err(CheckError::MalformedEndpoint(_))
        ));
    }

    #[test]
    fn test_expand_rejects_empty_names() {
        let mut config = sample();
        config.databases[1].measurements[0].hosts[0].host = String::new();
        match expand(&config) {
            Err(CheckError::EmptyName { field, location }) => {
                assert_eq!(field, "host");
                assert_eq!(location, "db2/probes");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_expand_empty_config() {
        assert!(expand(&customer(Vec::new())).unwrap().is_empty());
    }
}
