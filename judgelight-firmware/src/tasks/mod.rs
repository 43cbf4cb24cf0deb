//! Embassy async tasks
//!
//! The radio tasks own the UART; the node task runs the protocol loop for
//! whichever role this build was made for.

#[cfg(feature = "role-host")]
pub mod host;
#[cfg(not(feature = "role-host"))]
pub mod module;
pub mod radio_rx;
pub mod radio_tx;

#[cfg(feature = "role-host")]
pub use host::host_task;
#[cfg(not(feature = "role-host"))]
pub use module::module_task;
pub use radio_rx::radio_rx_task;
pub use radio_tx::radio_tx_task;
