//! Bit-packed message buffer and the structured error taxonomy shared by
//! every msgwire crate.
//!
//! The buffer tracks its remaining capacity in bits; every write that would
//! exceed it fails with a [`WireError`] that quotes the counter verbatim.

pub mod error;
pub mod handle;
pub mod message;
pub mod serializable;

pub use error::{bit_unit, element_unit, Result, WireError};
pub use handle::TypeHandle;
pub use message::{
    Message, Primitive, ARRAY_LENGTH_BITS, DEFAULT_CAPACITY_BITS, MAX_ARRAY_LENGTH,
};
pub use serializable::Serializable;
