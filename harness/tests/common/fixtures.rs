//! Static test data: node ids, health reports and metric payloads

use serde_json::{Value, json};

pub struct TestFixtures;

impl TestFixtures {
    pub const S3_CREATE: &'static str = "tests/test_s3.py::test_create_bucket";
    pub const S3_FAILING: &'static str = "tests/test_s3.py::test_put_object_fail";
    pub const LAMBDA_INVOKE: &'static str = "tests/test_lambda.py::test_invoke";
    pub const RDS_PAGINATED: &'static str = "tests/test_rds.py::test_get_databases_paginated";
    pub const RDS_CREATE: &'static str = "tests/test_rds.py::test_create_database";
    pub const POLICIES: &'static str = "tests/test_core/test_policies.py::test_allow";
    pub const EC2_INSTANCES: &'static str = "tests/test_ec2/test_instances.py::test_run";
    pub const EC2_HELPERS: &'static str = "tests/test_ec2/helpers.py::test_nothing";

    /// Health report of an emulator offering `services`
    pub fn health_report(services: &[&str]) -> Value {
        let services: serde_json::Map<String, Value> = services
            .iter()
            .map(|s| (s.to_string(), json!("available")))
            .collect();
        json!({ "services": services, "edition": "community", "version": "3.0.0" })
    }

    /// `/metrics/raw` body with `count` S3 interactions
    pub fn metrics(count: usize) -> Value {
        let metrics: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "service": "s3",
                    "operation": "PutObject",
                    "parameters": { "Bucket": "bucket", "Key": format!("key-{i}") },
                    "response_code": 200,
                    "response_data": null,
                    "exception": null,
                    "origin": "internal"
                })
            })
            .collect();
        json!({ "metrics": metrics })
    }
}
