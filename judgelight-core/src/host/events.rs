//! Events that drive host state transitions

/// Events that can trigger host state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostEvent {
    /// Every module has completed the handshake
    ModulesReady,
    /// Bring-up window closed with modules still missing
    BringUpExpired,
    /// A press was taken from the queue for display
    PressDequeued,
    /// The press is on the lamps
    Displayed,
    /// The display time ran out
    DelayElapsed,
    /// Operator or power-up asked for a reset
    ResetRequested,
    /// Operator asked for a clear
    ClearRequested,
    /// A transient reset/clear state has done its work
    Settled,
}

/// Command from the host's own operator button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatorCommand {
    /// Clear every light, keep the links
    Clear,
    /// Drop every link and re-run the handshake
    Reset,
}

impl From<OperatorCommand> for HostEvent {
    fn from(command: OperatorCommand) -> Self {
        match command {
            OperatorCommand::Clear => HostEvent::ClearRequested,
            OperatorCommand::Reset => HostEvent::ResetRequested,
        }
    }
}
