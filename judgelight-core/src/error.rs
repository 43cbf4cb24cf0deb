//! Protocol error kinds
//!
//! None of these is fatal. Each one resolves to a retry, a give-up-and-continue,
//! or a discarded message, and is reported back to the caller as a notice.

use judgelight_protocol::NodeAddress;

use crate::traits::LinkError;

/// Errors surfaced by the host and module controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// The link refused or could not queue an outgoing message
    LinkUnavailable,
    /// No acknowledgment arrived before the deadline
    AckTimeout,
    /// Message from an address that is not part of this deployment
    UnknownModule(NodeAddress),
    /// Malformed event code, or an event the receiving node never expects
    ProtocolViolation,
}

impl From<LinkError> for ProtocolError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Unavailable => ProtocolError::LinkUnavailable,
            LinkError::Malformed => ProtocolError::ProtocolViolation,
        }
    }
}
