//! End-to-end runs of a host and three modules sharing one simulated medium

use std::vec::Vec;

use judgelight_protocol::{ButtonColor, EventCode, Message, ModuleId, NodeAddress};

use crate::config::{HostConfig, ModuleConfig};
use crate::host::{HostController, HostPattern, HostState, OperatorCommand};
use crate::module::{ClearReason, ModuleController, ModulePattern, ModuleState};
use crate::testing::{MockButtons, MockLink, RecordingIndicator};

const TICK: u64 = 10;

struct Node {
    controller: ModuleController,
    link: MockLink,
    buttons: MockButtons,
    lights: RecordingIndicator<ModulePattern>,
    online: bool,
}

/// Every node plus the medium between them
struct Field {
    now: u64,
    host: HostController,
    host_link: MockLink,
    lamps: RecordingIndicator<HostPattern>,
    nodes: Vec<Node>,
    /// Every frame that made it onto the medium
    wire: Vec<Message>,
    /// Frames for which this returns true are lost in transit
    lose: fn(&Message) -> bool,
}

impl Field {
    fn new() -> Self {
        let nodes = ModuleId::ALL
            .into_iter()
            .map(|module| Node {
                controller: ModuleController::new(ModuleConfig::new(module)),
                link: MockLink::new(),
                buttons: MockButtons::new(),
                lights: RecordingIndicator::new(),
                online: true,
            })
            .collect();

        Self {
            now: 0,
            host: HostController::new(HostConfig::default()),
            host_link: MockLink::new(),
            lamps: RecordingIndicator::new(),
            nodes,
            wire: Vec::new(),
            lose: |_| false,
        }
    }

    /// Power everything up and run until the fleet is connected
    fn linked() -> Self {
        let mut field = Self::new();
        field.run_for(500);
        assert_eq!(field.host.state(), HostState::Normal);
        for module in ModuleId::ALL {
            assert_eq!(field.module(module).state(), ModuleState::Normal);
        }
        field.wire.clear();
        field
    }

    fn module(&self, module: ModuleId) -> &ModuleController {
        &self.nodes[module.index()].controller
    }

    fn node_mut(&mut self, module: ModuleId) -> &mut Node {
        &mut self.nodes[module.index()]
    }

    fn press(&mut self, module: ModuleId, color: ButtonColor) {
        self.node_mut(module).buttons.press(color);
    }

    /// Poll every node once at the current time, then carry their frames
    fn step_with(&mut self, command: Option<OperatorCommand>) {
        self.host
            .poll(self.now, &mut self.host_link, command, &mut self.lamps);
        for node in self.nodes.iter_mut().filter(|n| n.online) {
            node.controller
                .poll(self.now, &mut node.link, &mut node.buttons, &mut node.lights);
        }
        self.carry();
        self.now += TICK;
    }

    fn step(&mut self) {
        self.step_with(None);
    }

    fn run_for(&mut self, ms: u64) {
        let until = self.now + ms;
        while self.now < until {
            self.step();
        }
    }

    /// Jump the clock without polling in between
    fn skip(&mut self, ms: u64) {
        self.now += ms;
        self.step();
    }

    fn carry(&mut self) {
        let mut in_flight = self.host_link.drain_sent();
        for node in &mut self.nodes {
            in_flight.extend(node.link.drain_sent());
        }

        for message in in_flight {
            self.wire.push(message.clone());
            if (self.lose)(&message) {
                continue;
            }
            if message.dest == NodeAddress::HOST {
                self.host_link.deliver(message.clone());
            }
            for node in self.nodes.iter_mut().filter(|n| n.online) {
                if message.is_broadcast() || message.dest == node.controller.address() {
                    node.link.deliver(message.clone());
                }
            }
        }
    }

    fn count_on_wire(&self, event: EventCode, source: NodeAddress) -> usize {
        self.wire
            .iter()
            .filter(|m| m.event == event && m.source == source)
            .count()
    }
}

#[test]
fn test_fleet_comes_up() {
    let field = Field::linked();
    assert!(!field.host.is_degraded());
    assert_eq!(field.lamps.last(), Some(HostPattern::Idle { degraded: false }));
}

#[test]
fn test_left_white_press_round_trip() {
    let mut field = Field::linked();
    field.press(ModuleId::Left, ButtonColor::White);
    field.run_for(100);

    assert_eq!(field.count_on_wire(EventCode::WhiteButton, NodeAddress::LEFT), 1);
    assert_eq!(field.count_on_wire(EventCode::ButtonAck, NodeAddress::HOST), 1);
    assert_eq!(field.module(ModuleId::Left).state(), ModuleState::Normal);
    assert_eq!(field.host.state(), HostState::Waiting);
    assert_eq!(
        field.lamps.last(),
        Some(HostPattern::Showing {
            module: ModuleId::Left,
            color: ButtonColor::White,
        })
    );

    field.run_for(8_000);
    assert_eq!(field.host.state(), HostState::Normal);
    assert_eq!(field.lamps.last(), Some(HostPattern::Idle { degraded: false }));
}

#[test]
fn test_unacked_right_press_gives_up() {
    let mut field = Field::linked();
    field.lose = |m| m.event == EventCode::ButtonAck;
    field.press(ModuleId::Right, ButtonColor::Red);
    field.step();

    for _ in 0..19 {
        field.skip(25_000);
        assert_eq!(
            field.module(ModuleId::Right).state(),
            ModuleState::Waiting(ButtonColor::Red)
        );
    }
    assert_eq!(field.count_on_wire(EventCode::RedButton, NodeAddress::RIGHT), 20);

    field.skip(25_000);
    let right = field.module(ModuleId::Right);
    assert_eq!(right.state(), ModuleState::Clear(ClearReason::GaveUp));
    assert!(right.retry().is_none());

    field.skip(25_000);
    assert_eq!(field.count_on_wire(EventCode::RedButton, NodeAddress::RIGHT), 20);
    assert_eq!(field.module(ModuleId::Right).state(), ModuleState::Normal);
}

#[test]
fn test_reset_cancels_press_in_flight() {
    let mut field = Field::linked();
    field.lose = |m| m.event == EventCode::ButtonAck;
    field.press(ModuleId::Left, ButtonColor::White);
    field.step();
    while field.module(ModuleId::Left).attempts_remaining() != Some(5) {
        field.skip(25_000);
    }
    assert_eq!(field.count_on_wire(EventCode::WhiteButton, NodeAddress::LEFT), 15);

    // The ack for the last resend is still lost in transit
    field.step_with(Some(OperatorCommand::Reset));
    field.lose = |_| false;
    field.step();

    let left = field.module(ModuleId::Left);
    assert_eq!(left.state(), ModuleState::Startup);
    // The counter now belongs to the fresh handshake
    assert_eq!(left.attempts_remaining(), Some(19));

    field.run_for(500);
    assert_eq!(field.module(ModuleId::Left).state(), ModuleState::Normal);
    assert!(field.module(ModuleId::Left).retry().is_none());
    assert_eq!(field.host.state(), HostState::Normal);

    // The abandoned press is never sent again
    field.skip(25_000);
    assert_eq!(field.count_on_wire(EventCode::WhiteButton, NodeAddress::LEFT), 15);
}

#[test]
fn test_simultaneous_presses_both_acked() {
    let mut field = Field::linked();
    field.press(ModuleId::Left, ButtonColor::White);
    field.press(ModuleId::Right, ButtonColor::Red);
    field.run_for(100);

    assert_eq!(field.count_on_wire(EventCode::ButtonAck, NodeAddress::HOST), 2);
    assert_eq!(field.module(ModuleId::Left).state(), ModuleState::Normal);
    assert_eq!(field.module(ModuleId::Right).state(), ModuleState::Normal);

    // Both were shown, the second one last
    let shown: Vec<HostPattern> = field
        .lamps
        .history
        .iter()
        .copied()
        .filter(|p| matches!(p, HostPattern::Showing { .. }))
        .collect();
    assert!(shown.contains(&HostPattern::Showing {
        module: ModuleId::Left,
        color: ButtonColor::White,
    }));
    assert_eq!(
        field.lamps.last(),
        Some(HostPattern::Showing {
            module: ModuleId::Right,
            color: ButtonColor::Red,
        })
    );
}

#[test]
fn test_late_ack_is_harmless() {
    let mut field = Field::linked();
    field.press(ModuleId::Center, ButtonColor::White);
    field.run_for(100);
    assert_eq!(field.module(ModuleId::Center).state(), ModuleState::Normal);

    field
        .node_mut(ModuleId::Center)
        .link
        .deliver(Message::new(EventCode::ButtonAck, NodeAddress::HOST, NodeAddress::CENTER));
    field.run_for(100);

    assert_eq!(field.module(ModuleId::Center).state(), ModuleState::Normal);
    assert_eq!(field.count_on_wire(EventCode::WhiteButton, NodeAddress::CENTER), 1);
}

#[test]
fn test_missing_module_degrades_then_joins() {
    let mut field = Field::new();
    field.node_mut(ModuleId::Center).online = false;
    field.run_for(1_000);
    assert_eq!(field.host.state(), HostState::Startup);

    field.run_for(29_100);
    assert_eq!(field.host.state(), HostState::Normal);
    assert!(field.host.is_degraded());
    assert!(!field.host.record(ModuleId::Center).is_connected());

    field.node_mut(ModuleId::Center).online = true;
    field.run_for(500);
    assert!(field.host.record(ModuleId::Center).is_connected());
    assert_eq!(field.module(ModuleId::Center).state(), ModuleState::Normal);
}

#[test]
fn test_clear_keeps_links_reset_drops_them() {
    let mut field = Field::linked();
    field.press(ModuleId::Left, ButtonColor::Red);
    field.run_for(100);

    field.step_with(Some(OperatorCommand::Clear));
    field.run_for(100);
    assert_eq!(field.host.state(), HostState::Normal);
    assert!(field.host.records().all_connected());
    assert_eq!(field.count_on_wire(EventCode::ModuleReady, NodeAddress::LEFT), 0);
    for module in ModuleId::ALL {
        assert_eq!(field.module(module).state(), ModuleState::Normal);
    }

    field.step_with(Some(OperatorCommand::Reset));
    assert_eq!(field.host.records().connected_count(), 0);
    field.run_for(500);
    assert!(field.host.records().all_connected());
    for module in ModuleId::ALL {
        assert!(field.count_on_wire(EventCode::ModuleReady, module.address()) >= 1);
    }
}

#[test]
fn test_module_cleared_before_handshake_is_resynced() {
    let mut field = Field::new();
    field.lose = |m| m.event == EventCode::ModuleReady && m.source == NodeAddress::CENTER;
    field.run_for(1_000);
    assert!(!field.host.record(ModuleId::Center).is_connected());

    field.step_with(Some(OperatorCommand::Clear));
    field.lose = |_| false;
    field.step();
    assert_eq!(field.host.state(), HostState::Normal);
    assert!(field.host.is_degraded());
    assert_eq!(field.module(ModuleId::Center).state(), ModuleState::Normal);

    field.wire.clear();
    field.press(ModuleId::Center, ButtonColor::White);
    field.run_for(200);

    assert_eq!(field.count_on_wire(EventCode::ButtonAck, NodeAddress::HOST), 0);
    assert!(field
        .wire
        .iter()
        .any(|m| m.event == EventCode::ModuleReset && m.dest == NodeAddress::CENTER));
    assert!(field.host.record(ModuleId::Center).is_connected());
    assert_eq!(field.module(ModuleId::Center).state(), ModuleState::Normal);
    assert!(!field.lamps.history.iter().any(|p| matches!(
        p,
        HostPattern::Showing {
            module: ModuleId::Center,
            ..
        }
    )));
}
