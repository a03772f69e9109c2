use std::any::Any;

use msgwire_handler::{HandlerBinding, HandlerDecl, HandlerShape, HandlerTable};
use msgwire_message::{Message, Result, Serializable};
use msgwire_registry::TypeRegistry;
use tracing::{error, info};

/// The validated message vocabulary of one process: the type registry and
/// the handler table.
///
/// Constructing a `Protocol` is the startup phase. Every configuration
/// defect (duplicate IDs, types registered twice, malformed or duplicate
/// handlers) surfaces here, so a network layer that requires a `Protocol`
/// can never open with a broken vocabulary.
#[derive(Debug)]
pub struct Protocol<'r> {
    registry: &'r TypeRegistry,
    handlers: HandlerTable,
}

impl Protocol<'static> {
    /// Build the process-wide registry and validate `handlers` against it.
    pub fn prepare(handlers: impl IntoIterator<Item = HandlerDecl>) -> Result<Self> {
        let registry = msgwire_registry::initialize()?;
        Self::with_registry(registry, handlers)
    }

    /// Install the configured subscriber, then [`prepare`](Self::prepare), so
    /// registry construction is logged.
    #[cfg(feature = "logging")]
    pub fn prepare_logged(
        logging: &crate::logging::LoggingConfig,
        handlers: impl IntoIterator<Item = HandlerDecl>,
    ) -> Result<Self> {
        logging.install();
        Self::prepare(handlers)
    }
}

impl<'r> Protocol<'r> {
    /// Validate `handlers` alongside an explicitly constructed registry.
    pub fn with_registry(
        registry: &'r TypeRegistry,
        handlers: impl IntoIterator<Item = HandlerDecl>,
    ) -> Result<Self> {
        let handlers = match HandlerTable::from_decls(handlers) {
            Ok(handlers) => handlers,
            Err(err) => {
                error!(%err, "message handler registration failed");
                return Err(err);
            }
        };

        info!(
            types = registry.len(),
            handlers = handlers.len(),
            "message protocol prepared"
        );
        Ok(Self { registry, handlers })
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn handler(&self, shape: HandlerShape, message_id: u16) -> Option<&HandlerBinding> {
        self.handlers.binding(shape, message_id)
    }

    /// Encode `value` into a fresh message, prefixed with its registered ID.
    pub fn encode<T: Serializable>(&self, value: &T) -> Result<Message> {
        let mut message = Message::new();
        self.registry.write_tagged(value, &mut message)?;
        Ok(message)
    }

    /// Decode an ID-prefixed value from received bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<(u16, Box<dyn Any + Send>)> {
        let mut message = Message::from_bytes(bytes);
        self.registry.read_tagged(&mut message)
    }
}
