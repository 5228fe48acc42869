//! Client profile for the test processes
//!
//! Everything a test needs to talk to the emulator instead of the real cloud:
//! the endpoint, a fixed account identity and tight client retry caps. The
//! profile is handed to the runner and rendered as environment for every test
//! process it spawns.

use url::Url;

/// Account id the test suite asserts on in returned ARNs
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub endpoint: Url,
    pub account_id: String,
    pub secret_access_key: String,
    pub region: String,
    /// Total attempts per client call, first try included
    pub max_attempts: u32,
}

impl ClientProfile {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            secret_access_key: "test".to_string(),
            region: "us-east-1".to_string(),
            max_attempts: 2,
        }
    }

    pub fn with_account_id<S: Into<String>>(mut self, account_id: S) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Environment variables for a test process
    pub fn environment(&self) -> Vec<(String, String)> {
        let endpoint = self.endpoint.as_str().trim_end_matches('/').to_string();
        vec![
            ("TEST_SERVER_MODE".to_string(), "true".to_string()),
            ("TEST_SERVER_MODE_ENDPOINT".to_string(), endpoint),
            ("MOTO_CALL_RESET_API".to_string(), "false".to_string()),
            ("AWS_ACCESS_KEY_ID".to_string(), self.account_id.clone()),
            ("AWS_SECRET_ACCESS_KEY".to_string(), self.secret_access_key.clone()),
            ("AWS_DEFAULT_REGION".to_string(), self.region.clone()),
            ("AWS_MAX_ATTEMPTS".to_string(), self.max_attempts.to_string()),
            ("AWS_RETRY_MODE".to_string(), "standard".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(env: &'a [(String, String)], key: &str) -> Option<&'a str> {
        env.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_environment_defaults() {
        let profile = ClientProfile::new(Url::parse("http://localhost:4566").unwrap());
        let env = profile.environment();

        assert_eq!(lookup(&env, "TEST_SERVER_MODE_ENDPOINT"), Some("http://localhost:4566"));
        assert_eq!(lookup(&env, "AWS_ACCESS_KEY_ID"), Some(DEFAULT_ACCOUNT_ID));
        assert_eq!(lookup(&env, "AWS_MAX_ATTEMPTS"), Some("2"));
        assert_eq!(lookup(&env, "MOTO_CALL_RESET_API"), Some("false"));
    }

    #[test]
    fn test_profile_overrides() {
        let profile = ClientProfile::new(Url::parse("https://emu.local:8443/").unwrap())
            .with_account_id("000000000000")
            .with_max_attempts(5);
        let env = profile.environment();

        assert_eq!(lookup(&env, "TEST_SERVER_MODE_ENDPOINT"), Some("https://emu.local:8443"));
        assert_eq!(lookup(&env, "AWS_ACCESS_KEY_ID"), Some("000000000000"));
        assert_eq!(lookup(&env, "AWS_MAX_ATTEMPTS"), Some("5"));
    }
}
