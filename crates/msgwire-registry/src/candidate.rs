use std::any::Any;
use std::fmt;

use msgwire_message::{Message, Result, Serializable, TypeHandle};

/// Type-erased decoder for one registered type.
#[derive(Clone, Copy)]
pub struct Codec {
    decode: fn(&mut Message) -> Result<Box<dyn Any + Send>>,
}

impl Codec {
    /// Codec backed by `T`'s [`Serializable`] implementation.
    pub const fn of<T: Serializable>() -> Self {
        Self {
            decode: decode_boxed::<T>,
        }
    }

    /// Read one value from the message. The read cursor is restored on failure.
    pub fn decode(&self, message: &mut Message) -> Result<Box<dyn Any + Send>> {
        (self.decode)(message)
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Codec")
    }
}

fn decode_boxed<T: Serializable>(message: &mut Message) -> Result<Box<dyn Any + Send>> {
    let value = message.get_serializable::<T>()?;
    Ok(Box::new(value))
}

/// A type's declaration of its message ID, as seen before validation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    id: u16,
    handle: fn() -> TypeHandle,
    codec: Option<Codec>,
    origin: &'static str,
}

impl Candidate {
    /// Declare `T` under `id`. The serialization capability is enforced by
    /// the trait bound.
    pub const fn new<T: Serializable>(id: u16) -> Self {
        Self {
            id,
            handle: TypeHandle::of::<T>,
            codec: Some(Codec::of::<T>()),
            origin: "",
        }
    }

    /// Declare a type by handle only, as external metadata does.
    ///
    /// Such a candidate has no codec and is rejected at build time with
    /// `SerializableCapabilityMissing`.
    pub const fn declared(id: u16, handle: fn() -> TypeHandle) -> Self {
        Self {
            id,
            handle,
            codec: None,
            origin: "",
        }
    }

    /// Record the module that made the declaration.
    pub const fn declared_in(self, origin: &'static str) -> Self {
        Self { origin, ..self }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn handle(&self) -> TypeHandle {
        (self.handle)()
    }

    pub fn codec(&self) -> Option<Codec> {
        self.codec
    }

    /// Declaring module path, or an empty string if unknown.
    pub fn origin(&self) -> &'static str {
        self.origin
    }
}

inventory::collect!(Candidate);

/// Register a [`Serializable`] type under a message ID.
///
/// The declaration is collected at link time and validated when the global
/// registry is first used.
///
/// ```ignore
/// msgwire_registry::register_serializable!(PlayerMoved, 12);
/// ```
#[macro_export]
macro_rules! register_serializable {
    ($ty:ty, $id:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::Candidate::new::<$ty>($id).declared_in(::core::module_path!())
        }
    };
}
