//! Protocol timing constants

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One second in milliseconds
pub const ONE_SEC_MS: u32 = 1000;

/// Send attempts per request before a module gives up
pub const BUTTON_SEND_ATTEMPTS: u8 = 20;

/// How long the host shows a press, and a module shows a failed send
pub const LED_ON_DELAY_MS: u32 = 8 * ONE_SEC_MS;

/// How long the host waits for every module to check in
pub const STARTUP_TIMEOUT_MS: u32 = 30 * ONE_SEC_MS;

/// Which revision of the ack timeout to use
///
/// Early boards waited 10 s for an ack; later boards were tuned to 25 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AckTimeoutRevision {
    /// 10 s
    Early,
    /// 25 s
    #[default]
    Late,
}

impl AckTimeoutRevision {
    pub const fn button_press_timeout_ms(self) -> u32 {
        match self {
            AckTimeoutRevision::Early => 10 * ONE_SEC_MS,
            AckTimeoutRevision::Late => 25 * ONE_SEC_MS,
        }
    }
}

/// Timeouts and attempt counts shared by host and modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolTimings {
    /// Wait for `button_ack` / `startup_ack` before resending (ms)
    pub button_press_timeout_ms: u32,
    /// Sends per request, first one included
    pub button_send_attempts: u8,
    /// Press display time on the host, failure display time on a module (ms)
    pub led_on_delay_ms: u32,
    /// Host bring-up window (ms)
    pub startup_timeout_ms: u32,
}

impl ProtocolTimings {
    /// Timings for a given ack timeout revision
    pub const fn for_revision(revision: AckTimeoutRevision) -> Self {
        Self {
            button_press_timeout_ms: revision.button_press_timeout_ms(),
            button_send_attempts: BUTTON_SEND_ATTEMPTS,
            led_on_delay_ms: LED_ON_DELAY_MS,
            startup_timeout_ms: STARTUP_TIMEOUT_MS,
        }
    }
}

impl Default for ProtocolTimings {
    fn default() -> Self {
        Self::for_revision(AckTimeoutRevision::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_revision_is_default() {
        let timings = ProtocolTimings::default();
        assert_eq!(timings.button_press_timeout_ms, 25_000);
        assert_eq!(timings.button_send_attempts, 20);
        assert_eq!(timings.led_on_delay_ms, 8_000);
    }

    #[test]
    fn test_early_revision() {
        let timings = ProtocolTimings::for_revision(AckTimeoutRevision::Early);
        assert_eq!(timings.button_press_timeout_ms, 10_000);
        assert_eq!(timings.button_send_attempts, BUTTON_SEND_ATTEMPTS);
    }
}
