//! Wire-stable message IDs for networked payload types.
//!
//! - [`Message`]: bit-packed buffer with remaining-capacity accounting
//! - [`TypeRegistry`]: bijection between 16-bit IDs and [`Serializable`] types
//! - [`HandlerTable`]: validated handler bindings, one per ID and shape
//! - [`Protocol`]: startup phase that builds both and fails fast on any
//!   configuration defect, before a socket is opened
//!
//! ```ignore
//! use msgwire::{register_serializable, HandlerDecl, Protocol};
//!
//! register_serializable!(PlayerMoved, 12);
//!
//! let protocol = Protocol::prepare([HandlerDecl::client(12, "World", "on_player_moved")])?;
//! let message = protocol.encode(&PlayerMoved { x: 3, y: 4 })?;
//! ```

#[cfg(feature = "logging")]
pub mod logging;
pub mod protocol;

pub use msgwire_handler::{HandlerBinding, HandlerDecl, HandlerShape, HandlerTable, Param, Receiver};
pub use msgwire_message::{
    bit_unit, element_unit, Message, Primitive, Result, Serializable, TypeHandle, WireError,
    ARRAY_LENGTH_BITS, DEFAULT_CAPACITY_BITS, MAX_ARRAY_LENGTH,
};
pub use msgwire_registry::{
    register_serializable, Candidate, Codec, Descriptor, Discovery, DiscoveryOrder, ExplicitTypes,
    LazyRegistry, LinkedTypes, Manifest, ManifestEntry, RegistryConfig, TypeRegistry,
};
pub use protocol::Protocol;

/// The process-wide registry and its lookups.
pub mod registry {
    pub use msgwire_registry::{global, id_of, initialize, resolve_id, resolve_type};
}
