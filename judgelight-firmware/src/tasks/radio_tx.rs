//! Radio UART transmit task
//!
//! Sole writer of the XBee UART.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use judgelight_protocol::MAX_FRAME_SIZE;

use crate::channels::OUTBOUND;

/// Radio TX task - encodes queued messages and writes them out
#[embassy_executor::task]
pub async fn radio_tx_task(mut tx: BufferedUartTx) {
    info!("Radio TX task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];

    loop {
        let message = OUTBOUND.receive().await;

        let len = match message.to_frame().and_then(|frame| frame.encode(&mut buf)) {
            Ok(len) => len,
            Err(e) => {
                warn!("Refusing to send {:?}: {:?}", message.event, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("UART write error: {:?}", e);
        } else {
            trace!("TX {:?} -> {:#x}", message.event, message.dest.raw());
        }
    }
}
