//! Button and indicator traits

use judgelight_protocol::ButtonColor;

/// Debounced button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounced judge buttons
pub trait ButtonInput {
    /// Next debounced transition of `button`, if one happened since the last poll
    fn poll_button(&mut self, button: ButtonColor) -> Option<Edge>;
}

/// Light output driven from a pattern value
///
/// The mapping from pattern to pins, and any blink timing, belongs to the
/// implementation.
pub trait Indicator<P> {
    fn set_indicator(&mut self, pattern: P);
}
