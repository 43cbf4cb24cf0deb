//! Debounced push buttons
//!
//! Buttons are sampled from the node loop, once per tick. An edge is
//! reported only after the pin has held its new level for a fixed number
//! of consecutive samples.

use embedded_hal::digital::InputPin;
use judgelight_core::host::OperatorCommand;
use judgelight_core::traits::{ButtonInput, Edge};
use judgelight_protocol::ButtonColor;

/// Consecutive equal samples needed to accept a level change
pub const DEFAULT_STABLE_SAMPLES: u8 = 3;

/// How long the operator button must be held to reset the fleet
pub const RESET_HOLD_MS: u64 = 2_000;

/// A push button with sample-count debouncing
pub struct DebouncedButton<P> {
    pin: P,
    /// If true, pressed = pin LOW (button to ground with pull-up)
    active_low: bool,
    stable_samples: u8,
    /// Debounced level (true = pressed)
    pressed: bool,
    /// Samples seen at the opposite level so far
    run: u8,
}

impl<P: InputPin> DebouncedButton<P> {
    /// Create a debounced button
    ///
    /// The button starts released; holding it through power-up reports a
    /// press once the samples settle.
    pub fn new(pin: P, active_low: bool, stable_samples: u8) -> Self {
        Self {
            pin,
            active_low,
            stable_samples: stable_samples.max(1),
            pressed: false,
            run: 0,
        }
    }

    /// Button wired to ground with a pull-up
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true, DEFAULT_STABLE_SAMPLES)
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Take one sample; returns the edge once the new level is stable
    ///
    /// A failed pin read counts as no sample.
    pub fn sample(&mut self) -> Option<Edge> {
        let high = self.pin.is_high().ok()?;
        let level = high != self.active_low;

        if level == self.pressed {
            self.run = 0;
            return None;
        }

        self.run += 1;
        if self.run < self.stable_samples {
            return None;
        }

        self.run = 0;
        self.pressed = level;
        Some(if level { Edge::Pressed } else { Edge::Released })
    }
}

/// The white and red buttons of a judge module
pub struct ModuleButtons<P> {
    white: DebouncedButton<P>,
    red: DebouncedButton<P>,
}

impl<P: InputPin> ModuleButtons<P> {
    pub fn new(white: DebouncedButton<P>, red: DebouncedButton<P>) -> Self {
        Self { white, red }
    }
}

impl<P: InputPin> ButtonInput for ModuleButtons<P> {
    fn poll_button(&mut self, button: ButtonColor) -> Option<Edge> {
        match button {
            ButtonColor::White => self.white.sample(),
            ButtonColor::Red => self.red.sample(),
        }
    }
}

/// The host's blue operator button
///
/// A short press clears the lights. Holding it for `RESET_HOLD_MS` resets
/// the fleet as soon as the hold time is reached; the release that follows
/// is swallowed.
pub struct OperatorButton<P> {
    button: DebouncedButton<P>,
    pressed_at_ms: Option<u64>,
    reset_fired: bool,
}

impl<P: InputPin> OperatorButton<P> {
    pub fn new(button: DebouncedButton<P>) -> Self {
        Self {
            button,
            pressed_at_ms: None,
            reset_fired: false,
        }
    }

    /// Sample the button; returns a command when one is complete
    pub fn poll(&mut self, now_ms: u64) -> Option<OperatorCommand> {
        match self.button.sample() {
            Some(Edge::Pressed) => {
                self.pressed_at_ms = Some(now_ms);
                self.reset_fired = false;
                None
            }
            Some(Edge::Released) => {
                self.pressed_at_ms = None;
                (!self.reset_fired).then_some(OperatorCommand::Clear)
            }
            None => {
                let held_since = self.pressed_at_ms?;
                if !self.reset_fired && now_ms.saturating_sub(held_since) >= RESET_HOLD_MS {
                    self.reset_fired = true;
                    Some(OperatorCommand::Reset)
                } else {
                    None
                }
            }
        }
    }
}
