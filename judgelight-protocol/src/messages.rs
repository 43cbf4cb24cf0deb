//! Addressed messages exchanged between the host and the judge modules
//!
//! Message flow:
//! - Module → Host: `module_ready`, `white_button`, `red_button`
//! - Host → Module: `startup_ack`, `button_ack`, and the broadcast
//!   `module_reset` / `module_clear` commands

use heapless::Vec;

use crate::address::NodeAddress;
use crate::events::EventCode;
use crate::frame::{Frame, FrameError};

pub use crate::frame::MAX_PAYLOAD_SIZE;

/// Owned, bounds-checked message payload
pub type Payload = Vec<u8, MAX_PAYLOAD_SIZE>;

/// One message on the link
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub event: EventCode,
    pub source: NodeAddress,
    pub dest: NodeAddress,
    pub payload: Payload,
}

impl Message {
    /// Create a message with no payload
    pub fn new(event: EventCode, source: NodeAddress, dest: NodeAddress) -> Self {
        Self {
            event,
            source,
            dest,
            payload: Vec::new(),
        }
    }

    /// Create a message carrying `payload`
    pub fn with_payload(
        event: EventCode,
        source: NodeAddress,
        dest: NodeAddress,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            event,
            source,
            dest,
            payload,
        })
    }

    /// Host → every module
    pub fn broadcast(event: EventCode) -> Self {
        Self::new(event, NodeAddress::HOST, NodeAddress::BROADCAST)
    }

    /// Payload length in bytes
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn is_broadcast(&self) -> bool {
        self.dest.is_broadcast()
    }

    /// Check the addressing rules of the link
    ///
    /// Broadcast is reserved for reset/clear, a node never addresses
    /// itself, and nothing is sent from the broadcast address.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.source.is_broadcast() || self.source == self.dest {
            return Err(FrameError::InvalidFrame);
        }
        if self.dest.is_broadcast() && !self.event.allows_broadcast() {
            return Err(FrameError::InvalidFrame);
        }
        Ok(())
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        self.validate()?;
        Frame::new(
            self.dest.raw(),
            self.source.raw(),
            self.event.to_byte(),
            &self.payload,
        )
    }

    /// Parse a message from a received frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let event =
            EventCode::from_byte(frame.msg_type).ok_or(FrameError::UnknownEvent(frame.msg_type))?;
        let message = Self {
            event,
            source: NodeAddress::from_raw(frame.source),
            dest: NodeAddress::from_raw(frame.dest),
            payload: frame.payload.clone(),
        };
        message.validate()?;
        Ok(message)
    }
}
