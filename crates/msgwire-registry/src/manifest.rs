use serde::{Deserialize, Serialize};

/// Serializable snapshot of a registry's identifier space.
///
/// Peers that exchange tagged messages must agree on every ID they share;
/// comparing manifests exposes disagreements before traffic flows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: u16,
    pub type_name: String,
}

impl Manifest {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// IDs present in both manifests but bound to different type names.
    pub fn conflicts(&self, other: &Manifest) -> Vec<u16> {
        let mut ids: Vec<u16> = self
            .entries
            .iter()
            .filter(|entry| {
                other
                    .entries
                    .iter()
                    .any(|theirs| theirs.id == entry.id && theirs.type_name != entry.type_name)
            })
            .map(|entry| entry.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
