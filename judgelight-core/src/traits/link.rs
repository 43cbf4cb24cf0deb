//! Radio link trait

use judgelight_protocol::Message;

/// Errors reported by a link implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The message could not be sent or queued
    Unavailable,
    /// A frame arrived intact but did not decode into a valid message
    Malformed,
}

/// Addressed, unreliable message link
///
/// Loss, duplication and reordering are all possible; the protocol above
/// copes with them. `send` must not block on the medium: it either hands
/// the message off or fails with `Unavailable`.
pub trait Transport {
    /// Hand a message to the link
    fn send(&mut self, message: &Message) -> Result<(), LinkError>;

    /// Take the next received message, if any, without blocking
    fn try_receive(&mut self) -> Result<Option<Message>, LinkError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, message: &Message) -> Result<(), LinkError> {
        (**self).send(message)
    }

    fn try_receive(&mut self) -> Result<Option<Message>, LinkError> {
        (**self).try_receive()
    }
}
