use std::fmt;

use msgwire_message::{Result, WireError};
use serde::{Deserialize, Serialize};

/// Accepted handler parameter shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerShape {
    /// `(message_id, payload)`: server side, receives the 16-bit message ID with the payload.
    IdAndPayload,
    /// `(payload)`: client side.
    PayloadOnly,
}

impl fmt::Display for HandlerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerShape::IdAndPayload => f.write_str("(id, payload)"),
            HandlerShape::PayloadOnly => f.write_str("(payload)"),
        }
    }
}

/// Whether the handler method is associated (static) or takes `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Static,
    Instance,
}

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// 16-bit unsigned message ID.
    MessageId,
    /// The message being handled.
    Payload,
    /// Any other parameter type, by name.
    Other(String),
}

/// Handler metadata as declared, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDecl {
    pub message_id: u16,
    pub declaring_type: String,
    pub method_name: String,
    pub receiver: Receiver,
    pub params: Vec<Param>,
}

impl HandlerDecl {
    /// Static handler taking `(message_id, payload)`.
    pub fn server(
        message_id: u16,
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            message_id,
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            receiver: Receiver::Static,
            params: vec![Param::MessageId, Param::Payload],
        }
    }

    /// Static handler taking `(payload)`.
    pub fn client(
        message_id: u16,
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            message_id,
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            receiver: Receiver::Static,
            params: vec![Param::Payload],
        }
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    /// Classify the declaration.
    ///
    /// Instance methods are rejected before the parameter list is looked at.
    pub fn shape(&self) -> Result<HandlerShape> {
        if self.receiver == Receiver::Instance {
            return Err(WireError::NonStaticHandler {
                declaring_type: self.declaring_type.clone(),
                method_name: self.method_name.clone(),
            });
        }

        match self.params.as_slice() {
            [Param::MessageId, Param::Payload] => Ok(HandlerShape::IdAndPayload),
            [Param::Payload] => Ok(HandlerShape::PayloadOnly),
            _ => Err(WireError::InvalidHandlerSignature {
                declaring_type: self.declaring_type.clone(),
                method_name: self.method_name.clone(),
            }),
        }
    }

    /// Validate and produce the binding.
    pub fn bind(self) -> Result<HandlerBinding> {
        let shape = self.shape()?;
        Ok(HandlerBinding {
            message_id: self.message_id,
            declaring_type: self.declaring_type,
            method_name: self.method_name,
            shape,
        })
    }
}

/// A validated handler bound to a message ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerBinding {
    pub message_id: u16,
    pub declaring_type: String,
    pub method_name: String,
    pub shape: HandlerShape,
}

impl fmt::Display for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{} <- {}",
            self.declaring_type, self.method_name, self.shape, self.message_id
        )
    }
}
