//! Channel-backed radio link

use judgelight_core::traits::{LinkError, Transport};
use judgelight_protocol::Message;

use crate::channels::{INBOUND, OUTBOUND};

/// `Transport` over the radio task channels
///
/// `send` only queues; a full queue means the radio is falling behind and
/// is reported as `Unavailable`.
pub struct ChannelLink;

impl Transport for ChannelLink {
    fn send(&mut self, message: &Message) -> Result<(), LinkError> {
        OUTBOUND
            .try_send(message.clone())
            .map_err(|_| LinkError::Unavailable)
    }

    fn try_receive(&mut self) -> Result<Option<Message>, LinkError> {
        match INBOUND.try_receive() {
            Ok(received) => received.map(Some),
            Err(_) => Ok(None),
        }
    }
}
