use serde::{Deserialize, Serialize};

/// Order in which discovered candidates are validated and inserted.
///
/// Duplicate diagnostics name the earlier candidate as the existing entry,
/// so the order decides which side of a conflict is reported first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryOrder {
    /// Sort by ID, then by type name. Independent of link order.
    #[default]
    ById,
    /// Keep the order the discovery source produced.
    AsDiscovered,
}

/// Controls registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub order: DiscoveryOrder,
}

impl RegistryConfig {
    pub const fn new() -> Self {
        Self {
            order: DiscoveryOrder::ById,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
