//! Judge module node loop

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Duration, Instant, Ticker};

use judgelight_core::config::ModuleConfig;
use judgelight_core::module::{ModuleController, ModuleNotice};
use judgelight_core::ProtocolError;
use judgelight_drivers::{ModuleButtons, ModuleLeds};

use crate::config::NODE_TICK_MS;
use crate::link::ChannelLink;

/// Module task - polls the controller every tick
#[embassy_executor::task]
pub async fn module_task(
    config: ModuleConfig,
    mut buttons: ModuleButtons<Input<'static>>,
    mut leds: ModuleLeds<Output<'static>>,
) {
    info!("Module task started as {:?}", config.module);

    let mut controller = ModuleController::new(config);
    let mut link = ChannelLink;
    let mut ticker = Ticker::every(Duration::from_millis(NODE_TICK_MS));

    loop {
        let now_ms = Instant::now().as_millis();
        for notice in controller.poll(now_ms, &mut link, &mut buttons, &mut leds) {
            log_notice(&notice);
        }
        if leds.take_fault() {
            warn!("LED write failed");
        }

        ticker.next().await;
    }
}

fn log_notice(notice: &ModuleNotice) {
    match notice {
        ModuleNotice::Transition { from, to } => info!("State: {:?} -> {:?}", from, to),
        ModuleNotice::Sent {
            event,
            attempts_remaining,
        } => debug!("Sent {:?}, {} attempts left", event, attempts_remaining),
        ModuleNotice::GaveUp { event } => warn!("Gave up on {:?}", event),
        // Other radios share the channel
        ModuleNotice::Error(ProtocolError::UnknownModule(source)) => {
            trace!("Ignoring frame from {:?}", source)
        }
        ModuleNotice::Error(e) => warn!("Protocol error: {:?}", e),
    }
}
