//! Build-time node configuration
//!
//! Timing and link constants come from node.toml via build.rs; the role
//! comes from the `role-*` feature.

use judgelight_core::config::{AckTimeoutRevision, ProtocolTimings};

include!(concat!(env!("OUT_DIR"), "/node_config.rs"));

/// Protocol timings for every node in the fleet
pub const TIMINGS: ProtocolTimings = ProtocolTimings::for_revision(ACK_REVISION);

/// Node loop period
pub const NODE_TICK_MS: u64 = 10;

#[cfg(feature = "role-left")]
pub const SEAT: judgelight_protocol::ModuleId = judgelight_protocol::ModuleId::Left;
#[cfg(feature = "role-right")]
pub const SEAT: judgelight_protocol::ModuleId = judgelight_protocol::ModuleId::Right;
#[cfg(feature = "role-center")]
pub const SEAT: judgelight_protocol::ModuleId = judgelight_protocol::ModuleId::Center;
