//! # Domain Event Model
//!
//! Synchronization events exchanged over the broker. The source hierarchy
//! (event → tenant-group event → tenant event) is expressed as composition:
//! base field structs flattened by value into each concrete payload, with
//! PascalCase wire names matching the published JSON shape.

pub mod hr;
pub mod masterdata;
pub mod partner;

use serde::{Deserialize, Serialize};

pub const VERSION_1: &str = "1";

pub const OPERATION_ADD: &str = "Add";
pub const OPERATION_ADD_OR_SET: &str = "AddOrSet";
pub const OPERATION_REMOVE: &str = "Remove";

/// Fields shared by every synchronization event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub r#type: String,
    pub version: String,
    pub operation: String,
    pub timestamp: String,
}

impl Event {
    pub fn new(
        r#type: impl Into<String>,
        version: impl Into<String>,
        operation: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Event {
            r#type: r#type.into(),
            version: version.into(),
            operation: operation.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Event scoped to a tenant group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TenantGroupEvent {
    #[serde(flatten)]
    pub event: Event,
    pub tenant_group_name: String,
}

/// Event scoped to a single tenant within a tenant group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TenantEvent {
    #[serde(flatten)]
    pub tenant_group: TenantGroupEvent,
    pub tenant_name: String,
}
