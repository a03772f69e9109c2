use crate::handle::TypeHandle;

/// Every failure condition raised by message capacity accounting, type
/// registration and handler registration.
///
/// Rendering is a pure function of each variant's fields, so two errors that
/// compare equal always print the same diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A bit reservation does not fit in the message's remaining capacity.
    #[error(
        "Cannot reserve {required_bits} {} in a message with {available_bits} {} of remaining capacity!",
        bit_unit(.required_bits),
        bit_unit(.available_bits)
    )]
    ReserveCapacityExceeded {
        required_bits: usize,
        available_bits: usize,
    },

    /// A single value does not fit in the message's remaining capacity.
    #[error(
        "Cannot add a value of type '{type_name}' (requires {required_bits} {}) to a message with {available_bits} {} of remaining capacity!",
        bit_unit(.required_bits),
        bit_unit(.available_bits)
    )]
    ValueCapacityExceeded {
        type_name: &'static str,
        required_bits: usize,
        available_bits: usize,
    },

    /// An array (including its length prefix) does not fit in the message's
    /// remaining capacity.
    #[error(
        "Cannot add an array of type '{type_name}[]' with {array_length} {} (requires {required_bits_total} {}) to a message with {available_bits} {} of remaining capacity!",
        element_unit(.array_length),
        bit_unit(.required_bits_total),
        bit_unit(.available_bits)
    )]
    ArrayCapacityExceeded {
        type_name: &'static str,
        array_length: usize,
        required_bits_total: usize,
        available_bits: usize,
    },

    /// An array has more elements than its 16-bit length prefix can count.
    #[error(
        "Cannot add an array of type '{type_name}[]' with {array_length} {}; the length prefix allows at most {max_length} {}!",
        element_unit(.array_length),
        element_unit(.max_length)
    )]
    ArrayTooLong {
        type_name: &'static str,
        array_length: usize,
        max_length: usize,
    },

    /// A read ran past the data written into the message.
    #[error(
        "Message contains insufficient unread data to retrieve a value of type '{type_name}' (requires {required_bits} {}, {unread_bits} {} unread)!",
        bit_unit(.required_bits),
        bit_unit(.unread_bits)
    )]
    InsufficientData {
        type_name: &'static str,
        required_bits: usize,
        unread_bits: usize,
    },

    /// A handler was declared on an instance method.
    #[error(
        "'{declaring_type}.{method_name}' is an instance method, but message handler methods must be static!"
    )]
    NonStaticHandler {
        declaring_type: String,
        method_name: String,
    },

    /// A handler's parameters match neither accepted shape.
    #[error(
        "'{declaring_type}.{method_name}' doesn't match any acceptable message handler signature! Server handlers take (id, payload); client handlers take (payload) only."
    )]
    InvalidHandlerSignature {
        declaring_type: String,
        method_name: String,
    },

    /// Two handlers of the same shape claim one message ID.
    #[error(
        "Message handler methods '{declaring_type_a}.{method_a}' and '{declaring_type_b}.{method_b}' are both set to handle messages with ID {message_id}! Only one handler is allowed per message ID!"
    )]
    DuplicateHandler {
        message_id: u16,
        declaring_type_a: String,
        method_a: String,
        declaring_type_b: String,
        method_b: String,
    },

    /// A type declared an ID without providing the serialization capability.
    #[error(
        "Type '{handle}' is marked serializable but does not implement the required serialization capability!"
    )]
    SerializableCapabilityMissing { handle: TypeHandle },

    /// Two types declare the same ID.
    #[error(
        "Types '{existing}' and '{candidate}' both declare the same ID {id}! Only one type is allowed per ID."
    )]
    DuplicateSerializableId {
        id: u16,
        existing: TypeHandle,
        candidate: TypeHandle,
    },

    /// One type declares two IDs.
    #[error(
        "IDs '{existing_id}' and '{candidate_id}' are both declared on the same type {handle}. A type may declare only one ID."
    )]
    DuplicateSerializableType {
        handle: TypeHandle,
        existing_id: u16,
        candidate_id: u16,
    },

    /// No type is registered under the ID.
    #[error("The ID {id} is not currently registered with a serializable type.")]
    InvalidSerializableId { id: u16 },

    /// The type is not registered.
    #[error("The type '{handle}' is not a registered serializable.")]
    InvalidSerializableType { handle: TypeHandle },
}

impl WireError {
    /// Whether the error reflects a configuration defect discoverable from
    /// static metadata.
    ///
    /// Fatal errors must stop startup before the network layer opens.
    /// Everything else is reported to the immediate caller, which decides
    /// how to proceed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WireError::NonStaticHandler { .. }
                | WireError::InvalidHandlerSignature { .. }
                | WireError::DuplicateHandler { .. }
                | WireError::SerializableCapabilityMissing { .. }
                | WireError::DuplicateSerializableId { .. }
                | WireError::DuplicateSerializableType { .. }
        )
    }

    /// Whether the error was raised by message capacity accounting.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            WireError::ReserveCapacityExceeded { .. }
                | WireError::ValueCapacityExceeded { .. }
                | WireError::ArrayCapacityExceeded { .. }
        )
    }
}

/// "bit" for exactly one, "bits" otherwise (including zero).
pub fn bit_unit(count: &usize) -> &'static str {
    if *count == 1 {
        "bit"
    } else {
        "bits"
    }
}

/// "element" for exactly one, "elements" otherwise (including zero).
pub fn element_unit(count: &usize) -> &'static str {
    if *count == 1 {
        "element"
    } else {
        "elements"
    }
}

pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    struct Velocity;

    #[test]
    fn reserve_message_singular_and_plural() {
        let err = WireError::ReserveCapacityExceeded {
            required_bits: 1,
            available_bits: 0,
        };
        assert_eq!(
            err.to_string(),
            "Cannot reserve 1 bit in a message with 0 bits of remaining capacity!"
        );

        let err = WireError::ReserveCapacityExceeded {
            required_bits: 8,
            available_bits: 3,
        };
        assert_eq!(
            err.to_string(),
            "Cannot reserve 8 bits in a message with 3 bits of remaining capacity!"
        );

        let err = WireError::ReserveCapacityExceeded {
            required_bits: 2,
            available_bits: 1,
        };
        assert_eq!(
            err.to_string(),
            "Cannot reserve 2 bits in a message with 1 bit of remaining capacity!"
        );
    }

    #[test]
    fn value_message() {
        let err = WireError::ValueCapacityExceeded {
            type_name: "u16",
            required_bits: 16,
            available_bits: 1,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add a value of type 'u16' (requires 16 bits) to a message with 1 bit of remaining capacity!"
        );
    }

    #[test]
    fn array_message_pluralizes_elements() {
        let err = WireError::ArrayCapacityExceeded {
            type_name: "u8",
            array_length: 1,
            required_bits_total: 24,
            available_bits: 10,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add an array of type 'u8[]' with 1 element (requires 24 bits) to a message with 10 bits of remaining capacity!"
        );

        let err = WireError::ArrayCapacityExceeded {
            type_name: "u32",
            array_length: 0,
            required_bits_total: 16,
            available_bits: 0,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add an array of type 'u32[]' with 0 elements (requires 16 bits) to a message with 0 bits of remaining capacity!"
        );
    }

    #[test]
    fn array_length_limit_message() {
        let err = WireError::ArrayTooLong {
            type_name: "bool",
            array_length: 65_536,
            max_length: 65_535,
        };
        assert_eq!(
            err.to_string(),
            "Cannot add an array of type 'bool[]' with 65536 elements; the length prefix allows at most 65535 elements!"
        );
        assert!(!err.is_fatal());
        assert!(!err.is_capacity());
    }

    #[test]
    fn handler_messages() {
        let err = WireError::NonStaticHandler {
            declaring_type: "Lobby".into(),
            method_name: "on_join".into(),
        };
        assert_eq!(
            err.to_string(),
            "'Lobby.on_join' is an instance method, but message handler methods must be static!"
        );

        let err = WireError::InvalidHandlerSignature {
            declaring_type: "Lobby".into(),
            method_name: "on_leave".into(),
        };
        assert_eq!(
            err.to_string(),
            "'Lobby.on_leave' doesn't match any acceptable message handler signature! Server handlers take (id, payload); client handlers take (payload) only."
        );

        let err = WireError::DuplicateHandler {
            message_id: 7,
            declaring_type_a: "Lobby".into(),
            method_a: "on_chat".into(),
            declaring_type_b: "Match".into(),
            method_b: "on_chat".into(),
        };
        assert_eq!(
            err.to_string(),
            "Message handler methods 'Lobby.on_chat' and 'Match.on_chat' are both set to handle messages with ID 7! Only one handler is allowed per message ID!"
        );
    }

    #[test]
    fn registry_messages_use_type_names() {
        let position = TypeHandle::of::<Position>();
        let velocity = TypeHandle::of::<Velocity>();

        let err = WireError::DuplicateSerializableId {
            id: 5,
            existing: position,
            candidate: velocity,
        };
        assert_eq!(
            err.to_string(),
            format!(
                "Types '{}' and '{}' both declare the same ID 5! Only one type is allowed per ID.",
                position.name(),
                velocity.name()
            )
        );

        let err = WireError::DuplicateSerializableType {
            handle: position,
            existing_id: 5,
            candidate_id: 6,
        };
        assert_eq!(
            err.to_string(),
            format!(
                "IDs '5' and '6' are both declared on the same type {}. A type may declare only one ID.",
                position.name()
            )
        );

        assert_eq!(
            WireError::InvalidSerializableId { id: 42 }.to_string(),
            "The ID 42 is not currently registered with a serializable type."
        );
        assert!(WireError::InvalidSerializableType { handle: velocity }
            .to_string()
            .ends_with("' is not a registered serializable."));
    }

    #[test]
    fn fatal_classification() {
        let handle = TypeHandle::of::<Position>();
        assert!(WireError::SerializableCapabilityMissing { handle }.is_fatal());
        assert!(WireError::DuplicateHandler {
            message_id: 1,
            declaring_type_a: String::new(),
            method_a: String::new(),
            declaring_type_b: String::new(),
            method_b: String::new(),
        }
        .is_fatal());

        let capacity = WireError::ReserveCapacityExceeded {
            required_bits: 1,
            available_bits: 0,
        };
        assert!(!capacity.is_fatal());
        assert!(capacity.is_capacity());
        assert!(!WireError::InvalidSerializableId { id: 1 }.is_fatal());
    }
}
