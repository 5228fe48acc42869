//! Test Selection
//!
//! Inventory loading, service resolution and the selector that combines the two.

pub mod catalog;
pub mod inventory;
pub mod selector;

// Re-export main types
pub use catalog::{ALL_SERVICES, Resolution, ServiceCatalogResolver};
pub use inventory::{collect_inventory, load_inventory_file, parse_inventory};
pub use selector::{Selection, SkipReason, TestSelector};
