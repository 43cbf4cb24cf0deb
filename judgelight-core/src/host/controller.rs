//! Host controller
//!
//! Owns the host state machine, the module table and the press queue.
//! Acks are sent once and never retried; the modules own retransmission.

use heapless::Vec;
use judgelight_protocol::{ButtonColor, EventCode, Message, ModuleId, NodeAddress};

use super::events::{HostEvent, OperatorCommand};
use super::machine::{HostPattern, HostState};
use super::queue::{Press, PressQueue};
use super::records::{LinkStatus, ModuleRecord, ModuleTable, RemoteState};
use crate::config::HostConfig;
use crate::error::ProtocolError;
use crate::traits::{Indicator, Transport};

/// Upper bound on notices produced by one poll
pub const MAX_NOTICES: usize = 16;

/// Notices from one poll, in the order they happened
pub type HostNotices = Vec<HostNotice, MAX_NOTICES>;

/// Something the caller may want to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostNotice {
    /// State changed
    Transition { from: HostState, to: HostState },
    /// A module completed the handshake
    Connected(ModuleId),
    /// A module missed the bring-up window
    Degraded(ModuleId),
    /// A press arrived and was acked
    PressReceived { module: ModuleId, color: ButtonColor },
    /// A press went up on the lamps
    Showing { module: ModuleId, color: ButtonColor },
    /// A module pressed without a handshake and was told to reset
    Resync(ModuleId),
    /// Non-fatal protocol error
    Error(ProtocolError),
}

/// Host controller
pub struct HostController {
    config: HostConfig,
    state: HostState,
    records: ModuleTable,
    queue: PressQueue,
    /// Press currently on the lamps
    showing: Option<Press>,
    bring_up_deadline_ms: Option<u64>,
    display_until_ms: Option<u64>,
    /// Some module missed bring-up; sticky until the next reset
    degraded: bool,
    started: bool,
}

impl HostController {
    /// Create a controller; the power-up reset goes out on the first poll
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            state: HostState::Startup,
            records: ModuleTable::new(),
            queue: PressQueue::new(),
            showing: None,
            bring_up_deadline_ms: None,
            display_until_ms: None,
            degraded: false,
            started: false,
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Get current state
    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn records(&self) -> &ModuleTable {
        &self.records
    }

    pub fn record(&self, module: ModuleId) -> &ModuleRecord {
        self.records.get(module)
    }

    pub fn queue(&self) -> &PressQueue {
        &self.queue
    }

    pub fn showing(&self) -> Option<Press> {
        self.showing
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Pattern currently on the lamps
    pub fn pattern(&self) -> HostPattern {
        match self.state {
            HostState::Startup => HostPattern::BringUp,
            HostState::Normal => HostPattern::Idle {
                degraded: self.degraded,
            },
            HostState::ButtonPressed | HostState::Waiting => match self.showing {
                Some(press) => HostPattern::Showing {
                    module: press.module,
                    color: press.color,
                },
                None => HostPattern::Idle {
                    degraded: self.degraded,
                },
            },
            HostState::Reset | HostState::Clear => HostPattern::Off,
        }
    }

    /// Power-up: reset the whole fleet and open the bring-up window
    ///
    /// Called by the first `poll` if the caller did not do it earlier.
    pub fn start<T, I>(&mut self, now_ms: u64, link: &mut T, indicator: &mut I) -> HostNotices
    where
        T: Transport,
        I: Indicator<HostPattern>,
    {
        let mut notices = HostNotices::new();
        self.started = true;
        self.reset(now_ms, link, indicator, &mut notices);
        notices
    }

    /// Run one loop iteration: timers, one message, the operator command,
    /// then put the next queued press on display
    pub fn poll<T, I>(
        &mut self,
        now_ms: u64,
        link: &mut T,
        command: Option<OperatorCommand>,
        indicator: &mut I,
    ) -> HostNotices
    where
        T: Transport,
        I: Indicator<HostPattern>,
    {
        let mut notices = if self.started {
            HostNotices::new()
        } else {
            self.start(now_ms, link, indicator)
        };

        self.check_timers(now_ms, indicator, &mut notices);

        match link.try_receive() {
            Ok(Some(message)) => self.handle_message(&message, link, &mut notices),
            Ok(None) => {}
            Err(err) => note(&mut notices, HostNotice::Error(err.into())),
        }

        match command {
            Some(OperatorCommand::Reset) => self.reset(now_ms, link, indicator, &mut notices),
            Some(OperatorCommand::Clear) => self.clear(link, indicator, &mut notices),
            None => {}
        }

        self.advance(now_ms, indicator, &mut notices);
        notices
    }

    /// Handle one received message
    ///
    /// Only updates records and the queue; display changes happen in the
    /// same poll once the message is processed.
    pub fn handle_message<T: Transport>(
        &mut self,
        message: &Message,
        link: &mut T,
        notices: &mut HostNotices,
    ) {
        // Module-to-module traffic and broadcasts are not for the host
        if message.dest != NodeAddress::HOST {
            return;
        }
        let Some(module) = message.source.module() else {
            note(
                notices,
                HostNotice::Error(ProtocolError::UnknownModule(message.source)),
            );
            return;
        };
        if message.validate().is_err() {
            note(notices, HostNotice::Error(ProtocolError::ProtocolViolation));
            return;
        }

        match message.event {
            EventCode::ModuleReady => self.handle_ready(module, link, notices),
            EventCode::WhiteButton => self.handle_button(module, ButtonColor::White, link, notices),
            EventCode::RedButton => self.handle_button(module, ButtonColor::Red, link, notices),
            EventCode::ModuleClear
            | EventCode::ModuleReset
            | EventCode::ButtonAck
            | EventCode::StartupAck => {
                note(notices, HostNotice::Error(ProtocolError::ProtocolViolation));
            }
        }
    }

    /// Answer `module_ready`, in any state
    fn handle_ready<T: Transport>(
        &mut self,
        module: ModuleId,
        link: &mut T,
        notices: &mut HostNotices,
    ) {
        let ack = Message::new(EventCode::StartupAck, NodeAddress::HOST, module.address());
        if link.send(&ack).is_err() {
            // The module resends until an ack gets through
            note(notices, HostNotice::Error(ProtocolError::LinkUnavailable));
            return;
        }

        let record = self.records.get_mut(module);
        let newly_connected = !record.is_connected();
        record.link_status = LinkStatus::Connected;
        record.last_known_state = RemoteState::Ready;
        record.pending_ack = false;
        if newly_connected {
            note(notices, HostNotice::Connected(module));
        }
    }

    fn handle_button<T: Transport>(
        &mut self,
        module: ModuleId,
        color: ButtonColor,
        link: &mut T,
        notices: &mut HostNotices,
    ) {
        if !self.records.get(module).is_connected() {
            let reset = Message::new(EventCode::ModuleReset, NodeAddress::HOST, module.address());
            if link.send(&reset).is_err() {
                note(notices, HostNotice::Error(ProtocolError::LinkUnavailable));
            }
            note(notices, HostNotice::Resync(module));
            return;
        }

        let ack = Message::new(EventCode::ButtonAck, NodeAddress::HOST, module.address());
        let acked = link.send(&ack).is_ok();
        if !acked {
            note(notices, HostNotice::Error(ProtocolError::LinkUnavailable));
        }

        let record = self.records.get_mut(module);
        record.pending_ack = !acked;
        record.last_known_state = RemoteState::Pressed(color);
        self.queue.push(Press { module, color });
        note(notices, HostNotice::PressReceived { module, color });
    }

    fn check_timers<I: Indicator<HostPattern>>(
        &mut self,
        now_ms: u64,
        indicator: &mut I,
        notices: &mut HostNotices,
    ) {
        if self.state == HostState::Startup && expired(self.bring_up_deadline_ms, now_ms) {
            self.mark_missing_degraded(notices);
            self.apply(HostEvent::BringUpExpired, indicator, notices);
        }

        if self.state == HostState::Waiting && expired(self.display_until_ms, now_ms) {
            self.display_until_ms = None;
            self.showing = None;
            self.apply(HostEvent::DelayElapsed, indicator, notices);
        }
    }

    /// Leave bring-up if everyone checked in, then show the next press
    fn advance<I: Indicator<HostPattern>>(
        &mut self,
        now_ms: u64,
        indicator: &mut I,
        notices: &mut HostNotices,
    ) {
        if self.state == HostState::Startup && self.records.all_connected() {
            self.bring_up_deadline_ms = None;
            self.apply(HostEvent::ModulesReady, indicator, notices);
        }

        if !self.state.displays_presses() {
            return;
        }
        let Some(press) = self.queue.pop() else {
            return;
        };

        // A newer press replaces the one shown and restarts the delay
        self.showing = Some(press);
        self.apply(HostEvent::PressDequeued, indicator, notices);
        self.apply(HostEvent::Displayed, indicator, notices);
        self.display_until_ms = Some(now_ms + self.config.timings.led_on_delay_ms as u64);
        note(
            notices,
            HostNotice::Showing {
                module: press.module,
                color: press.color,
            },
        );
    }

    /// Broadcast `module_reset`, forget every module and re-open bring-up
    fn reset<T, I>(&mut self, now_ms: u64, link: &mut T, indicator: &mut I, notices: &mut HostNotices)
    where
        T: Transport,
        I: Indicator<HostPattern>,
    {
        self.apply(HostEvent::ResetRequested, indicator, notices);
        broadcast(EventCode::ModuleReset, link, notices);

        self.records.reset_all();
        self.queue.clear();
        self.showing = None;
        self.display_until_ms = None;
        self.degraded = false;
        self.bring_up_deadline_ms = Some(now_ms + self.config.timings.startup_timeout_ms as u64);

        self.apply(HostEvent::Settled, indicator, notices);
    }

    /// Broadcast `module_clear` and drop everything shown or queued
    fn clear<T, I>(&mut self, link: &mut T, indicator: &mut I, notices: &mut HostNotices)
    where
        T: Transport,
        I: Indicator<HostPattern>,
    {
        // Cutting bring-up short leaves the stragglers as degraded
        if self.state == HostState::Startup {
            self.mark_missing_degraded(notices);
        }

        self.apply(HostEvent::ClearRequested, indicator, notices);
        broadcast(EventCode::ModuleClear, link, notices);

        self.records.clear_indicators();
        self.queue.clear();
        self.showing = None;
        self.display_until_ms = None;

        self.apply(HostEvent::Settled, indicator, notices);
    }

    fn mark_missing_degraded(&mut self, notices: &mut HostNotices) {
        self.bring_up_deadline_ms = None;
        for module in self.records.missing() {
            self.degraded = true;
            note(notices, HostNotice::Degraded(module));
        }
    }

    /// Apply an event; on a state change, redraw the lamps
    fn apply<I: Indicator<HostPattern>>(
        &mut self,
        event: HostEvent,
        indicator: &mut I,
        notices: &mut HostNotices,
    ) {
        let from = self.state;
        let to = from.transition(event);
        if to != from {
            self.state = to;
            indicator.set_indicator(self.pattern());
            note(notices, HostNotice::Transition { from, to });
        }
    }
}

fn broadcast<T: Transport>(event: EventCode, link: &mut T, notices: &mut HostNotices) {
    if link.send(&Message::broadcast(event)).is_err() {
        note(notices, HostNotice::Error(ProtocolError::LinkUnavailable));
    }
}

fn expired(deadline_ms: Option<u64>, now_ms: u64) -> bool {
    deadline_ms.is_some_and(|deadline| now_ms >= deadline)
}

fn note(notices: &mut HostNotices, notice: HostNotice) {
    let _ = notices.push(notice);
}
