//! Message handler registration.
//!
//! Handlers are described by metadata: the declaring type, the method name,
//! whether the method takes a receiver, and its parameter list. Each
//! declaration is classified into one of two shapes and bound to a message
//! ID; at most one handler may exist per ID and shape.

pub mod binding;
pub mod table;

pub use binding::{HandlerBinding, HandlerDecl, HandlerShape, Param, Receiver};
pub use msgwire_message::{Result, WireError};
pub use table::HandlerTable;
