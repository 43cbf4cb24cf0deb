//! Host side of the protocol
//!
//! The host answers every module, keeps one record per module, shows the
//! most recent press, and fans out reset/clear to the whole fleet.

pub mod controller;
pub mod events;
pub mod machine;
pub mod queue;
pub mod records;

pub use controller::{HostController, HostNotice, HostNotices};
pub use events::{HostEvent, OperatorCommand};
pub use machine::{HostPattern, HostState};
pub use queue::{Press, PressQueue};
pub use records::{LinkStatus, ModuleRecord, ModuleTable, RemoteState};
