//! Board-agnostic core logic for the judgelight referee lights
//!
//! This crate contains the coordination protocol between the host and the
//! judge modules, independent of any hardware:
//!
//! - Protocol timings and node configuration
//! - Collaborator traits (link, buttons, indicators)
//! - Module state machine with bounded, acknowledged retries
//! - Host state machine with per-module records and press arbitration
//!
//! Both controllers are driven by a single cooperative loop calling
//! `poll(now_ms, ...)`. They never block and never log; everything worth
//! reporting comes back as a notice.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod module;
pub mod retry;
pub mod traits;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod testing;

pub use error::ProtocolError;
