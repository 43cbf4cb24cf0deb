//! Judge module side of the protocol
//!
//! The module owns its two buttons and its lights, asks the host to
//! acknowledge every press, and retries a bounded number of times.

pub mod controller;
pub mod events;
pub mod machine;

pub use controller::{ModuleController, ModuleNotice, ModuleNotices};
pub use events::ModuleEvent;
pub use machine::{ClearReason, ModulePattern, ModuleState};
