use std::any::Any;
use std::collections::HashMap;

use msgwire_message::{Message, Result, Serializable, TypeHandle, WireError};
use tracing::{debug, error, info};

use crate::candidate::{Candidate, Codec};
use crate::config::{DiscoveryOrder, RegistryConfig};
use crate::discovery::Discovery;
use crate::manifest::{Manifest, ManifestEntry};

/// One accepted registration.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub id: u16,
    pub handle: TypeHandle,
    /// Module that declared the registration, if known.
    pub origin: &'static str,
    codec: Codec,
}

impl Descriptor {
    pub fn codec(&self) -> Codec {
        self.codec
    }
}

/// Bijective mapping between message IDs and serializable types.
///
/// A registry is only ever observed fully built: construction either accepts
/// every candidate or fails without returning anything.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_id: HashMap<u16, Descriptor>,
    by_type: HashMap<TypeHandle, u16>,
}

impl TypeRegistry {
    /// Build from explicit candidates with the default config.
    pub fn build(candidates: impl IntoIterator<Item = Candidate>) -> Result<Self> {
        Self::build_with_config(candidates, RegistryConfig::default())
    }

    /// Build from explicit candidates.
    pub fn build_with_config(
        candidates: impl IntoIterator<Item = Candidate>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let mut candidates: Vec<Candidate> = candidates.into_iter().collect();
        if config.order == DiscoveryOrder::ById {
            candidates.sort_by(|a, b| {
                a.id()
                    .cmp(&b.id())
                    .then_with(|| a.handle().name().cmp(b.handle().name()))
            });
        }

        let mut registry = Self::default();
        for candidate in candidates {
            registry.insert(candidate)?;
        }
        Ok(registry)
    }

    /// Run one discovery pass and build from its candidates.
    pub fn discover<D: Discovery + ?Sized>(discovery: &D, config: RegistryConfig) -> Result<Self> {
        let candidates = discovery.discover();
        debug!(
            candidates = candidates.len(),
            "discovered serializable candidates"
        );

        match Self::build_with_config(candidates, config) {
            Ok(registry) => {
                info!(types = registry.len(), "serializable type registry built");
                Ok(registry)
            }
            Err(err) => {
                error!(%err, "serializable type registry construction failed");
                Err(err)
            }
        }
    }

    fn insert(&mut self, candidate: Candidate) -> Result<()> {
        let id = candidate.id();
        let handle = candidate.handle();

        let codec = candidate
            .codec()
            .ok_or(WireError::SerializableCapabilityMissing { handle })?;

        if let Some(existing) = self.by_id.get(&id) {
            return Err(WireError::DuplicateSerializableId {
                id,
                existing: existing.handle,
                candidate: handle,
            });
        }

        if let Some(&existing_id) = self.by_type.get(&handle) {
            return Err(WireError::DuplicateSerializableType {
                handle,
                existing_id,
                candidate_id: id,
            });
        }

        debug!(
            id,
            type_name = handle.name(),
            origin = candidate.origin(),
            "registered serializable type"
        );
        self.by_id.insert(
            id,
            Descriptor {
                id,
                handle,
                origin: candidate.origin(),
                codec,
            },
        );
        self.by_type.insert(handle, id);
        Ok(())
    }

    /// Type registered under `id`.
    pub fn resolve_type(&self, id: u16) -> Result<TypeHandle> {
        self.by_id
            .get(&id)
            .map(|descriptor| descriptor.handle)
            .ok_or(WireError::InvalidSerializableId { id })
    }

    /// ID registered for `handle`.
    pub fn resolve_id(&self, handle: TypeHandle) -> Result<u16> {
        self.by_type
            .get(&handle)
            .copied()
            .ok_or(WireError::InvalidSerializableType { handle })
    }

    /// ID registered for `T`.
    pub fn id_of<T: 'static>(&self) -> Result<u16> {
        self.resolve_id(TypeHandle::of::<T>())
    }

    pub fn descriptor(&self, id: u16) -> Option<&Descriptor> {
        self.by_id.get(&id)
    }

    /// All descriptors, ordered by ID.
    pub fn descriptors(&self) -> Vec<&Descriptor> {
        let mut descriptors: Vec<&Descriptor> = self.by_id.values().collect();
        descriptors.sort_unstable_by_key(|descriptor| descriptor.id);
        descriptors
    }

    pub fn contains_id(&self, id: u16) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn contains_type(&self, handle: TypeHandle) -> bool {
        self.by_type.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Write `value` prefixed with its registered ID.
    ///
    /// Nothing is written if the type is unregistered or the message lacks
    /// capacity.
    pub fn write_tagged<T: Serializable>(&self, value: &T, message: &mut Message) -> Result<()> {
        let id = self.id_of::<T>()?;
        message.add_tagged(id, value)?;
        Ok(())
    }

    /// Read an ID-prefixed value written by [`TypeRegistry::write_tagged`].
    ///
    /// The read cursor is restored on failure.
    pub fn read_tagged(&self, message: &mut Message) -> Result<(u16, Box<dyn Any + Send>)> {
        message.read_atomic(|message| {
            let id = message.get::<u16>()?;
            let descriptor = self
                .by_id
                .get(&id)
                .ok_or(WireError::InvalidSerializableId { id })?;
            let value = descriptor.codec.decode(message)?;
            Ok((id, value))
        })
    }

    /// Snapshot of the identifier space, ordered by ID.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            entries: self
                .descriptors()
                .into_iter()
                .map(|descriptor| ManifestEntry {
                    id: descriptor.id,
                    type_name: descriptor.handle.name().to_string(),
                })
                .collect(),
        }
    }
}
