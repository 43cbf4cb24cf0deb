//! Configuration types
//!
//! All values are fixed per deployment and handed to the controllers at
//! construction; nothing here is negotiated over the link.

pub mod node;
pub mod timings;

pub use node::{HostConfig, ModuleConfig};
pub use timings::{AckTimeoutRevision, ProtocolTimings};
