use std::collections::HashMap;

use msgwire_message::{Result, WireError};
use tracing::debug;

use crate::binding::{HandlerBinding, HandlerDecl, HandlerShape};

/// Validated handlers keyed by shape and message ID.
#[derive(Debug, Default, Clone)]
pub struct HandlerTable {
    bindings: HashMap<(HandlerShape, u16), HandlerBinding>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every declaration in order, stopping at the first failure.
    pub fn from_decls(decls: impl IntoIterator<Item = HandlerDecl>) -> Result<Self> {
        let mut table = Self::new();
        for decl in decls {
            table.register(decl)?;
        }
        Ok(table)
    }

    /// Validate a declaration and bind it.
    ///
    /// A second handler for the same message ID and shape is rejected; the
    /// same ID may be bound once per shape.
    pub fn register(&mut self, decl: HandlerDecl) -> Result<&HandlerBinding> {
        let binding = decl.bind()?;
        let key = (binding.shape, binding.message_id);

        if let Some(existing) = self.bindings.get(&key) {
            return Err(WireError::DuplicateHandler {
                message_id: binding.message_id,
                declaring_type_a: existing.declaring_type.clone(),
                method_a: existing.method_name.clone(),
                declaring_type_b: binding.declaring_type,
                method_b: binding.method_name,
            });
        }

        debug!(
            message_id = binding.message_id,
            shape = %binding.shape,
            declaring_type = %binding.declaring_type,
            method = %binding.method_name,
            "registered message handler"
        );
        Ok(&*self.bindings.entry(key).or_insert(binding))
    }

    pub fn binding(&self, shape: HandlerShape, message_id: u16) -> Option<&HandlerBinding> {
        self.bindings.get(&(shape, message_id))
    }

    /// Bindings of one shape, ordered by message ID.
    pub fn bindings(&self, shape: HandlerShape) -> Vec<&HandlerBinding> {
        let mut bindings: Vec<&HandlerBinding> = self
            .bindings
            .values()
            .filter(|binding| binding.shape == shape)
            .collect();
        bindings.sort_unstable_by_key(|binding| binding.message_id);
        bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
