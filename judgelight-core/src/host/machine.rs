//! Host state machine definition

use judgelight_protocol::{ButtonColor, ModuleId};

use super::events::HostEvent;

/// Host states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostState {
    /// Waiting for modules to check in
    Startup,
    /// Idle, presses accepted
    Normal,
    /// A press was picked for display
    ButtonPressed,
    /// Showing a press for `LED_ON_DELAY`
    Waiting,
    /// Broadcasting `module_reset`
    Reset,
    /// Broadcasting `module_clear`
    Clear,
}

/// What the host lamps show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostPattern {
    /// Everything dark
    Off,
    /// Handshake window open
    BringUp,
    /// Nothing to show; `degraded` when a module never checked in
    Idle { degraded: bool },
    /// The most recent press
    Showing { module: ModuleId, color: ButtonColor },
}

impl HostState {
    /// Check if queued presses may be put on display
    pub fn displays_presses(&self) -> bool {
        matches!(self, HostState::Normal | HostState::Waiting)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: HostEvent) -> Self {
        use HostEvent::*;
        use HostState::*;

        match (self, event) {
            // Operator commands pre-empt everything
            (_, ResetRequested) => Reset,
            (_, ClearRequested) => Clear,

            // Bring-up
            (Startup, ModulesReady) => Normal,
            (Startup, BringUpExpired) => Normal,

            // Press display; a newer press supersedes the one shown
            (Normal, PressDequeued) => ButtonPressed,
            (Waiting, PressDequeued) => ButtonPressed,
            (ButtonPressed, Displayed) => Waiting,
            (Waiting, DelayElapsed) => Normal,

            // Transient states
            (Reset, Settled) => Startup,
            (Clear, Settled) => Normal,

            // Default: stay in current state
            _ => self,
        }
    }
}
