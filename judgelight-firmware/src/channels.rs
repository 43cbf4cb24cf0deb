//! Inter-task communication channels
//!
//! The radio tasks own the UART halves; the node loop talks to them only
//! through these channels, so the medium is never written re-entrantly.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use judgelight_core::traits::LinkError;
use judgelight_protocol::Message;

/// Channel capacity for decoded inbound messages
const INBOUND_CHANNEL_SIZE: usize = 8;

/// Channel capacity for messages waiting for the UART
const OUTBOUND_CHANNEL_SIZE: usize = 8;

/// Messages decoded by the RX task, or frames that decoded to garbage
pub static INBOUND: Channel<CriticalSectionRawMutex, Result<Message, LinkError>, INBOUND_CHANNEL_SIZE> =
    Channel::new();

/// Messages queued by the node loop for the TX task
pub static OUTBOUND: Channel<CriticalSectionRawMutex, Message, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();
