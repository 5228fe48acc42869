//! Service Catalog Resolver
//!
//! Decides which services a session targets: the explicit `--services` list
//! when one is given, otherwise whatever the running emulator reports.

use crate::config::SelectionRules;
use crate::error::HarnessResult;
use crate::runtime::LifecycleManager;
use shared::{Component, ServiceSet, ServiceSource, component_info};

/// Override value meaning "discover from the emulator"
pub const ALL_SERVICES: &str = "all";

/// Services targeted by a session together with the rules that apply to them
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub services: ServiceSet,
    pub rules: SelectionRules,
}

pub struct ServiceCatalogResolver {
    rules: SelectionRules,
}

impl ServiceCatalogResolver {
    pub fn new(rules: SelectionRules) -> Self {
        Self { rules }
    }

    /// Parse an explicit override; `None` means discovery is needed
    pub fn explicit_services(explicit_override: Option<&str>) -> Option<ServiceSet> {
        let value = explicit_override?.trim();
        if value.is_empty() || value == ALL_SERVICES {
            return None;
        }
        Some(ServiceSet::new(value.split(','), ServiceSource::Explicit))
    }

    /// Resolve the target services, starting the emulator if discovery needs it
    pub async fn resolve(
        &self,
        explicit_override: Option<&str>,
        lifecycle: &mut LifecycleManager,
    ) -> HarnessResult<Resolution> {
        let services = match Self::explicit_services(explicit_override) {
            Some(services) => services,
            None => {
                lifecycle.ensure_running().await?;
                let report = lifecycle.prober().client().health_report().await?;
                ServiceSet::new(report.services.keys().cloned(), ServiceSource::Discovered)
            }
        };

        let rules = self.effective_rules(&services);
        component_info!(
            Component::Catalog,
            "🎯 Targeting {} service(s) ({:?}): {}",
            services.len(),
            services.source(),
            services
        );
        Ok(Resolution { services, rules })
    }

    /// Rules for one resolved set
    ///
    /// Discovery brings its own exclusions and the non-conforming suites that
    /// only run when every service is targeted. Unimplemented services are
    /// excluded unless the set names them.
    pub fn effective_rules(&self, services: &ServiceSet) -> SelectionRules {
        let mut rules = self.rules.clone();

        match services.source() {
            ServiceSource::Discovered => {
                let extra = rules.discovery_excluded_services.clone();
                rules.excluded_services.extend(extra);
            }
            ServiceSource::Explicit => rules.included_tests.clear(),
        }

        let unimplemented: Vec<String> = rules
            .unimplemented_services
            .iter()
            .filter(|service| !services.contains(service))
            .cloned()
            .collect();
        rules.excluded_services.extend(unimplemented);

        rules
    }
}
