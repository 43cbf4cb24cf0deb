//! judgelight radio link protocol
//!
//! This crate defines the vocabulary shared by the host and the three judge
//! modules, plus the frame format used on the XBee serial link.
//!
//! # Protocol Overview
//!
//! Every message is point-to-point or broadcast and carries a single event
//! code. On the wire a message travels as one frame:
//! ```text
//! ┌───────┬──────┬──────┬────────┬──────┬─────────┬──────────┐
//! │ START │ DEST │ SRC  │ LENGTH │ TYPE │ PAYLOAD │ CHECKSUM │
//! │ 1B    │ 2B   │ 2B   │ 1B     │ 1B   │ 0–8B    │ 1B       │
//! └───────┴──────┴──────┴────────┴──────┴─────────┴──────────┘
//! ```
//!
//! The broadcast address is reserved for `module_reset` and `module_clear`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod events;
pub mod frame;
pub mod messages;

pub use address::{ModuleId, NodeAddress, NUM_MODULES};
pub use events::{ButtonColor, EventCode};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE};
pub use messages::{Message, Payload, MAX_PAYLOAD_SIZE};
