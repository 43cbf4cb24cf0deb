//! Radio UART receive task
//!
//! Reassembles frames from the XBee byte stream and hands decoded messages
//! to the node loop.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use judgelight_core::traits::LinkError;
use judgelight_protocol::{FrameError, FrameParser, Message};

use crate::channels::INBOUND;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Radio RX task - receives and parses frames from the XBee
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: BufferedUartRx) {
    info!("Radio RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match Message::from_frame(&frame) {
                            Ok(message) => forward(Ok(message)),
                            Err(e) => {
                                debug!("Undecodable frame: {:?}", e);
                                forward(Err(LinkError::Malformed));
                            }
                        },
                        Ok(None) => {}
                        // Line noise; the parser has already resynchronised
                        Err(FrameError::InvalidChecksum) => trace!("Checksum mismatch"),
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn forward(received: Result<Message, LinkError>) {
    // Dropping here is the same as loss on the air; modules retry
    if INBOUND.try_send(received).is_err() {
        warn!("Inbound channel full, dropping message");
    }
}
