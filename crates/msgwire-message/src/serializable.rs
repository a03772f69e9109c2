use crate::error::Result;
use crate::message::Message;

/// Capability required of every type registered under a message ID: the
/// ability to write itself to, and read itself from, a [`Message`].
pub trait Serializable: Sized + Send + 'static {
    fn serialize(&self, message: &mut Message) -> Result<()>;

    fn deserialize(message: &mut Message) -> Result<Self>;
}
