//! In-memory collaborators for unit and scenario tests

use std::collections::VecDeque;
use std::vec::Vec;

use judgelight_protocol::{ButtonColor, EventCode, Message};

use crate::traits::{ButtonInput, Edge, Indicator, LinkError, Transport};

/// Link that records sends and replays queued receives
#[derive(Debug, Default)]
pub struct MockLink {
    /// Every message accepted by `send`
    pub sent: Vec<Message>,
    inbox: VecDeque<Result<Message, LinkError>>,
    /// Refuse every send with `LinkError::Unavailable`
    pub fail_sends: bool,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the next `try_receive`
    pub fn deliver(&mut self, message: Message) {
        self.inbox.push_back(Ok(message));
    }

    /// Queue a frame that fails to decode
    pub fn deliver_malformed(&mut self) {
        self.inbox.push_back(Err(LinkError::Malformed));
    }

    /// Messages not yet taken by `try_receive`
    pub fn pending_receives(&self) -> usize {
        self.inbox.len()
    }

    /// Event codes of every sent message, in order
    pub fn sent_events(&self) -> Vec<EventCode> {
        self.sent.iter().map(|m| m.event).collect()
    }

    /// Take everything sent so far
    pub fn drain_sent(&mut self) -> Vec<Message> {
        core::mem::take(&mut self.sent)
    }
}

impl Transport for MockLink {
    fn send(&mut self, message: &Message) -> Result<(), LinkError> {
        if self.fail_sends {
            return Err(LinkError::Unavailable);
        }
        self.sent.push(message.clone());
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<Message>, LinkError> {
        self.inbox.pop_front().transpose()
    }
}

/// Buttons that report queued edges
#[derive(Debug, Default)]
pub struct MockButtons {
    white: VecDeque<Edge>,
    red: VecDeque<Edge>,
}

impl MockButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a press-and-release of `color`
    pub fn press(&mut self, color: ButtonColor) {
        let queue = match color {
            ButtonColor::White => &mut self.white,
            ButtonColor::Red => &mut self.red,
        };
        queue.push_back(Edge::Pressed);
        queue.push_back(Edge::Released);
    }
}

impl ButtonInput for MockButtons {
    fn poll_button(&mut self, button: ButtonColor) -> Option<Edge> {
        let queue = match button {
            ButtonColor::White => &mut self.white,
            ButtonColor::Red => &mut self.red,
        };
        // Skip releases so one poll sees the press
        while queue.front() == Some(&Edge::Released) {
            queue.pop_front();
        }
        queue.pop_front()
    }
}

/// Indicator that remembers every pattern it was given
#[derive(Debug)]
pub struct RecordingIndicator<P> {
    pub history: Vec<P>,
}

impl<P: Copy> RecordingIndicator<P> {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<P> {
        self.history.last().copied()
    }
}

impl<P> Indicator<P> for RecordingIndicator<P> {
    fn set_indicator(&mut self, pattern: P) {
        self.history.push(pattern);
    }
}
