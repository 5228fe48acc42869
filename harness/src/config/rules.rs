//! Selection rule configuration
//!
//! Static exclusion and inclusion policies consumed by the test selector.
//! Defaults reflect the current state of the emulator: services that are too
//! resource-heavy or unstable to run, individual tests that are too expensive,
//! and suites whose file names do not follow the `test_{service}` convention.

use serde::{Deserialize, Serialize};

/// Suites of one package whose file names don't follow `test_{service}`.
/// Every file in the package runs for the designated service, except the
/// listed helper files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOverride {
    pub package: String,
    pub service: String,
    pub excluded_files: Vec<String>,
}

impl PackageOverride {
    pub fn new<P, S>(package: P, service: S, excluded_files: &[&str]) -> Self
    where
        P: Into<String>,
        S: Into<String>,
    {
        Self {
            package: package.into(),
            service: service.into(),
            excluded_files: excluded_files.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// The `test_ec2` package: any suite runs for `ec2` except helpers and
    /// suites that hold only empty tests
    pub fn ec2() -> Self {
        Self::new(
            "test_ec2",
            "ec2",
            &[
                "test_vm_export.py",
                "test_vm_import.py",
                "test_utils.py",
                "test_server.py",
                "test_reserved_instances.py",
                "test_monitoring.py",
                "test_ip_addresses.py",
                "helpers.py",
                "test_amazon_dev_pay.py",
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRules {
    /// Service substrings that always deselect a suite file
    pub excluded_services: Vec<String>,
    /// Service substrings excluded only when services are discovered
    pub discovery_excluded_services: Vec<String>,
    /// Services not yet implemented by the emulator; excluded unless the
    /// session explicitly targets them
    pub unimplemented_services: Vec<String>,
    /// Node-path substrings of individual tests that never run
    pub excluded_test_cases: Vec<String>,
    /// Suite files that run whenever all services are discovered
    pub included_tests: Vec<String>,
    pub package_overrides: Vec<PackageOverride>,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self {
            // eks needs far more resources than a test host has
            excluded_services: vec!["eks".to_string()],
            // lambda suites fail on iam policy evaluation
            discovery_excluded_services: vec!["lambda".to_string()],
            unimplemented_services: vec!["acmpca".to_string(), "emr-serverless".to_string()],
            // creates 51 databases
            excluded_test_cases: vec!["test_rds.py::test_get_databases_paginated".to_string()],
            included_tests: vec!["test_policies.py".to_string()],
            package_overrides: vec![PackageOverride::ec2()],
        }
    }
}

impl SelectionRules {
    /// Rules with no exclusions, inclusions or overrides
    pub fn empty() -> Self {
        Self {
            excluded_services: Vec::new(),
            discovery_excluded_services: Vec::new(),
            unimplemented_services: Vec::new(),
            excluded_test_cases: Vec::new(),
            included_tests: Vec::new(),
            package_overrides: Vec::new(),
        }
    }

    pub fn with_excluded_service<S: Into<String>>(mut self, service: S) -> Self {
        self.excluded_services.push(service.into());
        self
    }

    pub fn with_excluded_test_case<S: Into<String>>(mut self, test_case: S) -> Self {
        self.excluded_test_cases.push(test_case.into());
        self
    }

    pub fn with_included_test<S: Into<String>>(mut self, file: S) -> Self {
        self.included_tests.push(file.into());
        self
    }
}
