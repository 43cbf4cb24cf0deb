//! Events that drive module state transitions

use judgelight_protocol::ButtonColor;

/// Events that can trigger module state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleEvent {
    /// Host accepted the handshake
    StartupAck,
    /// Debounced press of a local button
    ButtonEdge(ButtonColor),
    /// Press handed to the send path, retry counter armed
    Dispatch,
    /// Request handed to the link
    Sent,
    /// Host acknowledged the outstanding press
    ButtonAck,
    /// Ack deadline passed with attempts left
    Retry,
    /// Ack deadline passed on the last attempt
    GiveUp,
    /// Host ordered a reset
    ResetCommand,
    /// Host ordered a clear
    ClearCommand,
    /// A transient reset/clear state has done its work
    Settled,
}
