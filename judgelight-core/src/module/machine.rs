//! Module state machine definition
//!
//! The indicator pattern and every transition are pure functions of the
//! current state and an event; the controller performs the side effects.

use judgelight_protocol::ButtonColor;

use super::events::ModuleEvent;

/// Module states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleState {
    /// Announcing `module_ready` until the host answers
    Startup,
    /// Linked and idle, buttons live
    Normal,
    /// W_BUTTON_PRESSED / R_BUTTON_PRESSED
    ButtonPressed(ButtonColor),
    /// W_BUTTON_SEND / R_BUTTON_SEND
    ButtonSend(ButtonColor),
    /// Request sent, waiting for `button_ack`
    Waiting(ButtonColor),
    /// Host ordered a reset; the handshake restarts
    Reset,
    /// Indicators cleared, by command or after giving up
    Clear(ClearReason),
}

/// Why a module entered CLEAR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClearReason {
    /// `module_clear` from the host
    Commanded,
    /// Every send attempt went unacknowledged
    GaveUp,
}

/// What the module lights show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModulePattern {
    /// Everything dark
    Off,
    /// Handshake in progress
    Connecting,
    /// Linked and idle
    Ready,
    /// A press of this color is in flight
    Pending(ButtonColor),
    /// The last press was never acknowledged
    SendFailed,
    /// The handshake ran out of attempts
    LinkDown,
}

impl ModuleState {
    /// Check if a new button press may start a request
    pub fn accepts_press(&self) -> bool {
        matches!(self, ModuleState::Normal)
    }

    /// Check if a request is in flight
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ModuleState::ButtonPressed(_) | ModuleState::ButtonSend(_) | ModuleState::Waiting(_)
        )
    }

    /// Color of the press in flight
    pub fn pending_color(&self) -> Option<ButtonColor> {
        match self {
            ModuleState::ButtonPressed(c) | ModuleState::ButtonSend(c) | ModuleState::Waiting(c) => {
                Some(*c)
            }
            _ => None,
        }
    }

    /// Indicator pattern for this state
    pub fn pattern(&self) -> ModulePattern {
        match self {
            ModuleState::Startup => ModulePattern::Connecting,
            ModuleState::Normal => ModulePattern::Ready,
            ModuleState::ButtonPressed(c) | ModuleState::ButtonSend(c) | ModuleState::Waiting(c) => {
                ModulePattern::Pending(*c)
            }
            ModuleState::Clear(ClearReason::GaveUp) => ModulePattern::SendFailed,
            ModuleState::Reset | ModuleState::Clear(ClearReason::Commanded) => ModulePattern::Off,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: ModuleEvent) -> Self {
        use ModuleEvent::*;
        use ModuleState::*;

        match (self, event) {
            // Host commands pre-empt everything
            (_, ResetCommand) => Reset,
            (_, ClearCommand) => Clear(ClearReason::Commanded),

            // Handshake
            (Startup, StartupAck) => Normal,

            // Press path
            (Normal, ButtonEdge(color)) => ButtonPressed(color),
            (ButtonPressed(color), Dispatch) => ButtonSend(color),
            (ButtonSend(color), Sent) => Waiting(color),
            (Waiting(_), ButtonAck) => Normal,
            (Waiting(color), Retry) => ButtonSend(color),
            (Waiting(_), GiveUp) => Clear(ClearReason::GaveUp),

            // Transient states
            (Reset, Settled) => Startup,
            (Clear(_), Settled) => Normal,

            // Default: stay in current state
            _ => self,
        }
    }
}
