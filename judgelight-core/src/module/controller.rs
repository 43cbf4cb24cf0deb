//! Module controller
//!
//! Wraps the module state machine with its retry counter and drives the
//! link, the buttons and the lights from a single `poll` call per loop
//! iteration.

use heapless::Vec;
use judgelight_protocol::{ButtonColor, EventCode, Message, NodeAddress};

use super::events::ModuleEvent;
use super::machine::{ModulePattern, ModuleState};
use crate::config::ModuleConfig;
use crate::error::ProtocolError;
use crate::retry::RetryCounter;
use crate::traits::{ButtonInput, Edge, Indicator, Transport};

/// Upper bound on notices produced by one poll
pub const MAX_NOTICES: usize = 16;

/// Notices from one poll, in the order they happened
pub type ModuleNotices = Vec<ModuleNotice, MAX_NOTICES>;

/// Something the caller may want to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleNotice {
    /// State changed
    Transition { from: ModuleState, to: ModuleState },
    /// A request was handed to the link
    Sent { event: EventCode, attempts_remaining: u8 },
    /// A request ran out of attempts
    GaveUp { event: EventCode },
    /// Non-fatal protocol error
    Error(ProtocolError),
}

/// Judge module controller
pub struct ModuleController {
    config: ModuleConfig,
    state: ModuleState,
    /// At most one request in flight
    retry: Option<RetryCounter>,
    /// End of the failure display after giving up
    hold_until_ms: Option<u64>,
    /// Handshake ran out of attempts; only a reset re-arms it
    handshake_failed: bool,
    started: bool,
}

impl ModuleController {
    /// Create a controller; nothing is sent until the first poll
    pub fn new(config: ModuleConfig) -> Self {
        Self {
            config,
            state: ModuleState::Startup,
            retry: None,
            hold_until_ms: None,
            handshake_failed: false,
            started: false,
        }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn address(&self) -> NodeAddress {
        self.config.address()
    }

    /// Get current state
    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// The retry counter of the request in flight, if any
    pub fn retry(&self) -> Option<&RetryCounter> {
        self.retry.as_ref()
    }

    pub fn attempts_remaining(&self) -> Option<u8> {
        self.retry.map(|r| r.attempts_remaining())
    }

    pub fn is_handshake_failed(&self) -> bool {
        self.handshake_failed
    }

    /// Pattern currently shown
    pub fn pattern(&self) -> ModulePattern {
        if self.handshake_failed {
            ModulePattern::LinkDown
        } else {
            self.state.pattern()
        }
    }

    /// Light the indicator and send the first `module_ready`
    ///
    /// Called by the first `poll` if the caller did not do it earlier.
    pub fn start<T, I>(&mut self, now_ms: u64, link: &mut T, indicator: &mut I) -> ModuleNotices
    where
        T: Transport,
        I: Indicator<ModulePattern>,
    {
        let mut notices = ModuleNotices::new();
        self.started = true;
        indicator.set_indicator(self.pattern());
        self.begin_handshake(now_ms, link, &mut notices);
        notices
    }

    /// Run one loop iteration: timers, then one message, then buttons
    pub fn poll<T, B, I>(
        &mut self,
        now_ms: u64,
        link: &mut T,
        buttons: &mut B,
        indicator: &mut I,
    ) -> ModuleNotices
    where
        T: Transport,
        B: ButtonInput,
        I: Indicator<ModulePattern>,
    {
        let mut notices = if self.started {
            ModuleNotices::new()
        } else {
            self.start(now_ms, link, indicator)
        };

        self.check_timers(now_ms, link, indicator, &mut notices);

        match link.try_receive() {
            Ok(Some(message)) => {
                self.handle_message(&message, now_ms, link, indicator, &mut notices)
            }
            Ok(None) => {}
            Err(err) => note(&mut notices, ModuleNotice::Error(err.into())),
        }

        // Poll both buttons so a stale edge never lingers in the driver
        for color in [ButtonColor::White, ButtonColor::Red] {
            if buttons.poll_button(color) == Some(Edge::Pressed) {
                self.handle_press(color, now_ms, link, indicator, &mut notices);
            }
        }

        notices
    }

    /// Handle a debounced button press
    ///
    /// Ignored unless the module is idle; a press never queues behind
    /// another one.
    pub fn handle_press<T, I>(
        &mut self,
        color: ButtonColor,
        now_ms: u64,
        link: &mut T,
        indicator: &mut I,
        notices: &mut ModuleNotices,
    ) where
        T: Transport,
        I: Indicator<ModulePattern>,
    {
        if !self.state.accepts_press() {
            return;
        }

        self.apply(ModuleEvent::ButtonEdge(color), indicator, notices);
        debug_assert!(self.retry.is_none());
        self.retry = Some(RetryCounter::new(self.config.timings.button_send_attempts));
        self.apply(ModuleEvent::Dispatch, indicator, notices);
        self.send_press(color, now_ms, link, indicator, notices);
    }

    /// Handle one received message
    pub fn handle_message<T, I>(
        &mut self,
        message: &Message,
        now_ms: u64,
        link: &mut T,
        indicator: &mut I,
        notices: &mut ModuleNotices,
    ) where
        T: Transport,
        I: Indicator<ModulePattern>,
    {
        // Shared medium: traffic for other nodes is not ours to judge
        if message.dest != self.address() && !message.is_broadcast() {
            return;
        }
        if !message.source.is_host() {
            note(
                notices,
                ModuleNotice::Error(ProtocolError::UnknownModule(message.source)),
            );
            return;
        }
        if message.validate().is_err() {
            note(notices, ModuleNotice::Error(ProtocolError::ProtocolViolation));
            return;
        }

        match message.event {
            EventCode::StartupAck => {
                if self.state == ModuleState::Startup {
                    self.retry = None;
                    self.handshake_failed = false;
                    self.apply(ModuleEvent::StartupAck, indicator, notices);
                }
            }
            EventCode::ButtonAck => {
                // A duplicate ack after the press completed changes nothing
                if matches!(self.state, ModuleState::Waiting(_)) {
                    self.retry = None;
                    self.apply(ModuleEvent::ButtonAck, indicator, notices);
                }
            }
            EventCode::ModuleReset => {
                self.retry = None;
                self.hold_until_ms = None;
                self.handshake_failed = false;
                self.apply(ModuleEvent::ResetCommand, indicator, notices);
                self.apply(ModuleEvent::Settled, indicator, notices);
                self.begin_handshake(now_ms, link, notices);
            }
            EventCode::ModuleClear => {
                // From STARTUP this abandons the handshake; the host resyncs
                // the module with a directed reset on its next press
                self.retry = None;
                self.hold_until_ms = None;
                self.handshake_failed = false;
                self.apply(ModuleEvent::ClearCommand, indicator, notices);
                self.apply(ModuleEvent::Settled, indicator, notices);
            }
            EventCode::ModuleReady | EventCode::WhiteButton | EventCode::RedButton => {
                note(notices, ModuleNotice::Error(ProtocolError::ProtocolViolation));
            }
        }
    }

    fn check_timers<T, I>(
        &mut self,
        now_ms: u64,
        link: &mut T,
        indicator: &mut I,
        notices: &mut ModuleNotices,
    ) where
        T: Transport,
        I: Indicator<ModulePattern>,
    {
        if let Some(until) = self.hold_until_ms {
            if now_ms >= until {
                self.hold_until_ms = None;
                self.apply(ModuleEvent::Settled, indicator, notices);
            }
        }

        let Some(retry) = self.retry else {
            return;
        };
        if !retry.is_expired(now_ms) {
            return;
        }
        note(notices, ModuleNotice::Error(ProtocolError::AckTimeout));

        match self.state {
            ModuleState::Startup if retry.is_exhausted() => {
                self.retry = None;
                self.handshake_failed = true;
                indicator.set_indicator(self.pattern());
                note(notices, ModuleNotice::GaveUp { event: EventCode::ModuleReady });
            }
            ModuleState::Startup => self.send_request(EventCode::ModuleReady, now_ms, link, notices),
            ModuleState::Waiting(color) if retry.is_exhausted() => {
                self.retry = None;
                self.apply(ModuleEvent::GiveUp, indicator, notices);
                self.hold_until_ms = Some(now_ms + self.config.timings.led_on_delay_ms as u64);
                note(notices, ModuleNotice::GaveUp { event: color.event() });
            }
            ModuleState::Waiting(color) => {
                self.apply(ModuleEvent::Retry, indicator, notices);
                self.send_press(color, now_ms, link, indicator, notices);
            }
            _ => self.retry = None,
        }
    }

    /// Arm a fresh handshake and send the first `module_ready`
    fn begin_handshake<T: Transport>(
        &mut self,
        now_ms: u64,
        link: &mut T,
        notices: &mut ModuleNotices,
    ) {
        self.handshake_failed = false;
        self.retry = Some(RetryCounter::new(self.config.timings.button_send_attempts));
        self.send_request(EventCode::ModuleReady, now_ms, link, notices);
    }

    fn send_press<T, I>(
        &mut self,
        color: ButtonColor,
        now_ms: u64,
        link: &mut T,
        indicator: &mut I,
        notices: &mut ModuleNotices,
    ) where
        T: Transport,
        I: Indicator<ModulePattern>,
    {
        self.send_request(color.event(), now_ms, link, notices);
        self.apply(ModuleEvent::Sent, indicator, notices);
    }

    /// Consume one attempt and hand the request to the link
    ///
    /// A refused send still uses up the attempt; the ack timeout drives
    /// the next one.
    fn send_request<T: Transport>(
        &mut self,
        event: EventCode,
        now_ms: u64,
        link: &mut T,
        notices: &mut ModuleNotices,
    ) {
        let Some(retry) = self.retry.as_mut() else {
            return;
        };
        if !retry.record_send(now_ms, self.config.timings.button_press_timeout_ms) {
            return;
        }
        let attempts_remaining = retry.attempts_remaining();

        let message = Message::new(event, self.address(), NodeAddress::HOST);
        if link.send(&message).is_err() {
            note(notices, ModuleNotice::Error(ProtocolError::LinkUnavailable));
        }
        note(notices, ModuleNotice::Sent { event, attempts_remaining });
    }

    /// Apply an event; on a state change, redraw the lights
    fn apply<I: Indicator<ModulePattern>>(
        &mut self,
        event: ModuleEvent,
        indicator: &mut I,
        notices: &mut ModuleNotices,
    ) {
        let from = self.state;
        let to = from.transition(event);
        if to != from {
            self.state = to;
            indicator.set_indicator(self.pattern());
            note(notices, ModuleNotice::Transition { from, to });
        }
    }
}

fn note(notices: &mut ModuleNotices, notice: ModuleNotice) {
    // Dropping the overflow only loses log lines, never protocol state
    let _ = notices.push(notice);
}
