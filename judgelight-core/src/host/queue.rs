//! Arrival-order queue of presses waiting for display

use heapless::Deque;
use judgelight_protocol::{ButtonColor, ModuleId, NUM_MODULES};

/// A press received from a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Press {
    pub module: ModuleId,
    pub color: ButtonColor,
}

/// Presses in arrival order, at most one per module
///
/// A module retransmits until it sees an ack, so the same press can arrive
/// more than once. A repeat replaces that module's queued entry in place
/// rather than queueing twice, which also bounds the queue by the fleet size.
#[derive(Debug, Clone, Default)]
pub struct PressQueue {
    presses: Deque<Press, NUM_MODULES>,
}

impl PressQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a press, or refresh the module's queued one
    pub fn push(&mut self, press: Press) {
        if let Some(queued) = self.presses.iter_mut().find(|p| p.module == press.module) {
            queued.color = press.color;
            return;
        }
        // One slot per module, so there is always room
        let _ = self.presses.push_back(press);
    }

    /// Oldest press
    pub fn pop(&mut self) -> Option<Press> {
        self.presses.pop_front()
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }

    pub fn clear(&mut self) {
        self.presses.clear();
    }
}
