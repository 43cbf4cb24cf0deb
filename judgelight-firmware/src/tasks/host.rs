//! Host node loop

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use judgelight_core::config::HostConfig;
use judgelight_core::host::{HostController, HostNotice};
use judgelight_core::ProtocolError;
use judgelight_drivers::{HostLamps, OperatorButton};

use crate::config::NODE_TICK_MS;
use crate::link::ChannelLink;

/// Host task - polls the operator button and the controller every tick
#[embassy_executor::task]
pub async fn host_task(
    config: HostConfig,
    mut operator: OperatorButton<Input<'static>>,
    mut lamps: HostLamps<Output<'static>>,
) {
    info!("Host task started");

    let mut controller = HostController::new(config);
    let mut link = ChannelLink;
    let mut ticker = Ticker::every(Duration::from_millis(NODE_TICK_MS));

    loop {
        let now_ms = Instant::now().as_millis();
        let command = operator.poll(now_ms);
        if let Some(command) = command {
            info!("Operator: {:?}", command);
        }

        for notice in controller.poll(now_ms, &mut link, command, &mut lamps) {
            log_notice(&notice);
        }
        if lamps.take_fault() {
            warn!("Lamp write failed");
        }

        ticker.next().await;
    }
}

fn log_notice(notice: &HostNotice) {
    match notice {
        HostNotice::Transition { from, to } => info!("State: {:?} -> {:?}", from, to),
        HostNotice::Connected(module) => info!("{:?} connected", module),
        HostNotice::Degraded(module) => warn!("{:?} missed bring-up", module),
        HostNotice::PressReceived { module, color } => {
            debug!("Press from {:?}: {:?}", module, color)
        }
        HostNotice::Showing { module, color } => info!("Showing {:?} {:?}", module, color),
        HostNotice::Resync(module) => warn!("{:?} pressed without handshake, resetting it", module),
        // Other radios share the channel
        HostNotice::Error(ProtocolError::UnknownModule(source)) => {
            trace!("Ignoring frame from {:?}", source)
        }
        HostNotice::Error(e) => warn!("Protocol error: {:?}", e),
    }
}
