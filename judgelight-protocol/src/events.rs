//! Event codes carried by every message

/// Event code of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventCode {
    /// Module → host: handshake request after power-up or reset
    ModuleReady,
    /// Module → host: white button pressed
    WhiteButton,
    /// Module → host: red button pressed
    RedButton,
    /// Host → modules: clear indicators, keep the link up
    ModuleClear,
    /// Host → modules: drop everything and re-run the handshake
    ModuleReset,
    /// Host → module: button press received
    ButtonAck,
    /// Host → module: handshake accepted
    StartupAck,
}

// Wire format values
const EVENT_MODULE_READY: u8 = 1;
const EVENT_WHITE_BUTTON: u8 = 2;
const EVENT_RED_BUTTON: u8 = 3;
const EVENT_MODULE_CLEAR: u8 = 4;
const EVENT_MODULE_RESET: u8 = 5;
const EVENT_BUTTON_ACK: u8 = 6;
const EVENT_STARTUP_ACK: u8 = 7;

impl EventCode {
    /// Parse an event from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            EVENT_MODULE_READY => Some(EventCode::ModuleReady),
            EVENT_WHITE_BUTTON => Some(EventCode::WhiteButton),
            EVENT_RED_BUTTON => Some(EventCode::RedButton),
            EVENT_MODULE_CLEAR => Some(EventCode::ModuleClear),
            EVENT_MODULE_RESET => Some(EventCode::ModuleReset),
            EVENT_BUTTON_ACK => Some(EventCode::ButtonAck),
            EVENT_STARTUP_ACK => Some(EventCode::StartupAck),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            EventCode::ModuleReady => EVENT_MODULE_READY,
            EventCode::WhiteButton => EVENT_WHITE_BUTTON,
            EventCode::RedButton => EVENT_RED_BUTTON,
            EventCode::ModuleClear => EVENT_MODULE_CLEAR,
            EventCode::ModuleReset => EVENT_MODULE_RESET,
            EventCode::ButtonAck => EVENT_BUTTON_ACK,
            EventCode::StartupAck => EVENT_STARTUP_ACK,
        }
    }

    /// Returns true if a module sends this event to the host
    pub fn is_module_request(&self) -> bool {
        matches!(
            self,
            EventCode::ModuleReady | EventCode::WhiteButton | EventCode::RedButton
        )
    }

    /// Returns true if the host sends this event to modules
    pub fn is_host_command(&self) -> bool {
        !self.is_module_request()
    }

    /// Returns true if this event may be addressed to `BROADCAST`
    pub fn allows_broadcast(&self) -> bool {
        matches!(self, EventCode::ModuleClear | EventCode::ModuleReset)
    }

    /// Button color for press events
    pub fn button_color(&self) -> Option<ButtonColor> {
        match self {
            EventCode::WhiteButton => Some(ButtonColor::White),
            EventCode::RedButton => Some(ButtonColor::Red),
            _ => None,
        }
    }
}

/// The two judge buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonColor {
    White,
    Red,
}

impl ButtonColor {
    /// Event code a module sends for this button
    pub fn event(self) -> EventCode {
        match self {
            ButtonColor::White => EventCode::WhiteButton,
            ButtonColor::Red => EventCode::RedButton,
        }
    }
}
