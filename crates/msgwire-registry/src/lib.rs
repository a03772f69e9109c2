//! Bijective registry between 16-bit message IDs and serializable payload
//! types.
//!
//! Types declare their ID with [`register_serializable!`]; the declarations
//! are collected at link time and validated once, on first use of the
//! process-wide registry. Duplicate IDs, types declared twice, and types
//! without a codec abort construction before any message is encoded.
//!
//! Applications that prefer an explicit startup phase can build a
//! [`TypeRegistry`] from [`Candidate`]s directly and pass it by reference.

pub mod candidate;
pub mod config;
pub mod discovery;
pub mod lazy;
pub mod manifest;
pub mod registry;

pub use candidate::{Candidate, Codec};
pub use config::{DiscoveryOrder, RegistryConfig};
pub use discovery::{Discovery, ExplicitTypes, LinkedTypes};
pub use lazy::{global, id_of, initialize, resolve_id, resolve_type, LazyRegistry};
pub use manifest::{Manifest, ManifestEntry};
pub use msgwire_message::{Result, TypeHandle, WireError};
pub use registry::{Descriptor, TypeRegistry};

#[doc(hidden)]
pub use inventory;
