//! Test Selector
//!
//! Partitions the collected inventory into the items a session runs and the
//! items it reports as skipped. Every item lands in exactly one of the two,
//! and both keep inventory order.

use std::fmt;

use crate::config::SelectionRules;
use shared::{Component, ServiceSet, TestItem, component_debug, component_info};

/// Why an item was deselected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File name contains an excluded service
    ExcludedService(String),
    /// Node path contains an excluded test case
    ExcludedTestCase(String),
    /// Helper file of a package whose suites otherwise all run
    ExcludedHelper(String),
    NoMatchingService,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ExcludedService(service) => write!(f, "service '{service}' is excluded"),
            SkipReason::ExcludedTestCase(case) => write!(f, "test case '{case}' is excluded"),
            SkipReason::ExcludedHelper(file) => write!(f, "'{file}' is an excluded helper"),
            SkipReason::NoMatchingService => f.write_str("no targeted service matches"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected: Vec<TestItem>,
    pub deselected: Vec<(TestItem, SkipReason)>,
}

impl Selection {
    pub fn total(&self) -> usize {
        self.selected.len() + self.deselected.len()
    }
}

pub struct TestSelector;

impl TestSelector {
    pub fn select(items: Vec<TestItem>, services: &ServiceSet, rules: &SelectionRules) -> Selection {
        let mut selection = Selection::default();

        for item in items {
            match Self::decide(&item, services, rules) {
                None => selection.selected.push(item),
                Some(reason) => {
                    component_debug!(Component::Selector, "⏭️ Deselected {}: {}", item, reason);
                    selection.deselected.push((item, reason));
                }
            }
        }

        component_info!(
            Component::Selector,
            "✂️ Selected {} of {} test item(s)",
            selection.selected.len(),
            selection.total()
        );
        selection
    }

    /// `None` selects the item, `Some` deselects it
    pub fn decide(item: &TestItem, services: &ServiceSet, rules: &SelectionRules) -> Option<SkipReason> {
        let file_name = item.file_name();

        if let Some(service) = rules
            .excluded_services
            .iter()
            .find(|service| file_name.contains(service.as_str()))
        {
            return Some(SkipReason::ExcludedService(service.clone()));
        }

        if let Some(case) = rules
            .excluded_test_cases
            .iter()
            .find(|case| item.node_id().contains(case.as_str()))
        {
            return Some(SkipReason::ExcludedTestCase(case.clone()));
        }

        for service in services.iter() {
            if matches_service(file_name, service) {
                return None;
            }

            if rules.included_tests.iter().any(|included| file_name.contains(included.as_str())) {
                return None;
            }

            let package_override = rules
                .package_overrides
                .iter()
                .find(|o| o.service == service && item.package_name() == Some(o.package.as_str()));
            if let Some(package_override) = package_override {
                return package_override
                    .excluded_files
                    .iter()
                    .find(|helper| file_name.contains(helper.as_str()))
                    .map(|helper| SkipReason::ExcludedHelper(helper.clone()));
            }
        }

        Some(SkipReason::NoMatchingService)
    }
}

/// `test_{service}`, also without hyphens (`emr-serverless` → `test_emrserverless`)
fn matches_service(file_name: &str, service: &str) -> bool {
    file_name.contains(&format!("test_{service}")) || file_name.contains(&format!("test_{}", service.replace('-', "")))
}
