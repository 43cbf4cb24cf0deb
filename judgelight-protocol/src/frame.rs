//! Frame encoding and decoding for the radio link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - DEST (2 bytes, big-endian): destination node address
//! - SRC (2 bytes, big-endian): source node address
//! - LENGTH (1 byte): payload length (0-8)
//! - TYPE (1 byte): event code
//! - PAYLOAD (0-8 bytes): event-specific data
//! - CHECKSUM (1 byte): XOR of every byte from DEST through PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 8;

/// Bytes before the payload (START + DEST + SRC + LENGTH + TYPE)
const HEADER_SIZE: usize = 7;

/// Maximum complete frame size (header + MAX_PAYLOAD + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Invalid frame structure or addressing
    InvalidFrame,
    /// Event code not in the catalog
    UnknownEvent(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Destination address (raw)
    pub dest: u16,
    /// Source address (raw)
    pub source: u16,
    /// Event code byte
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given addressing, type and payload
    pub fn new(dest: u16, source: u16, msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            dest,
            source,
            msg_type,
            payload,
        })
    }

    /// Number of bytes `encode` writes for this frame
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len() + 1
    }

    fn calculate_checksum(header: &[u8], payload: &[u8]) -> u8 {
        header.iter().chain(payload).fold(0, |acc, &b| acc ^ b)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let [dest_hi, dest_lo] = self.dest.to_be_bytes();
        let [src_hi, src_lo] = self.source.to_be_bytes();
        let header = [
            dest_hi,
            dest_lo,
            src_hi,
            src_lo,
            self.payload.len() as u8,
            self.msg_type,
        ];

        buffer[0] = FRAME_START;
        buffer[1..HEADER_SIZE].copy_from_slice(&header);
        buffer[HEADER_SIZE..HEADER_SIZE + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - 1] = Self::calculate_checksum(&header, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// State machine for parsing incoming frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    /// DEST, SRC, LENGTH, TYPE as received
    header: Vec<u8, { HEADER_SIZE - 1 }>,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// Every byte taken in since the last START
    raw: Vec<u8, { MAX_FRAME_SIZE - 1 }>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for START byte
    WaitingForStart,
    /// Collecting DEST, SRC, LENGTH and TYPE
    ReadingHeader,
    /// Reading payload bytes
    ReadingPayload,
    /// Waiting for CHECKSUM
    WaitingForChecksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            header: Vec::new(),
            payload: Vec::new(),
            raw: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.header.clear();
        self.payload.clear();
        self.raw.clear();
    }

    fn expected_length(&self) -> usize {
        self.header[4] as usize
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    ///
    /// A rejected frame's bytes are scanned again for a START, so a
    /// truncated frame does not swallow the one behind it. If that rescan
    /// completes a frame, the frame is returned instead of the error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        if self.state != ParseState::WaitingForStart {
            // Capacity covers header, payload and checksum
            let _ = self.raw.push(byte);
        }

        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    self.reset();
                    self.state = ParseState::ReadingHeader;
                }
                // Silently ignore non-START bytes while waiting
                Ok(None)
            }
            ParseState::ReadingHeader => {
                // Capacity equals the header length, so this cannot overflow
                let _ = self.header.push(byte);
                if self.header.len() == 5 && self.expected_length() > MAX_PAYLOAD_SIZE {
                    return self.resync(FrameError::InvalidFrame);
                }
                if self.header.is_full() {
                    self.state = if self.expected_length() == 0 {
                        ParseState::WaitingForChecksum
                    } else {
                        ParseState::ReadingPayload
                    };
                }
                Ok(None)
            }
            ParseState::ReadingPayload => {
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected_length() {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = Frame::calculate_checksum(&self.header, &self.payload);
                if byte != expected {
                    return self.resync(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    dest: u16::from_be_bytes([self.header[0], self.header[1]]),
                    source: u16::from_be_bytes([self.header[2], self.header[3]]),
                    msg_type: self.header[5],
                    payload: self.payload.clone(),
                };

                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Drop the current frame and replay its bytes from just after START
    fn resync(&mut self, error: FrameError) -> Result<Option<Frame>, FrameError> {
        let raw = core::mem::take(&mut self.raw);
        self.reset();

        let mut found = None;
        for &byte in &raw {
            // Each nested rejection replays a strictly shorter run
            if let Ok(Some(frame)) = self.feed(byte) {
                found = Some(frame);
            }
        }
        found.map(Some).ok_or(error)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
