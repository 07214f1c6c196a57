//! Frame classification and stream framing for the sensor array's serial protocol
//!
//! A frame starts with the `0x24` marker, carries a 16-byte body protected by
//! an 8-bit wrapping sum at byte 16, and may be followed by a 3-byte pressure
//! block with its own checksum at byte 20.

use crate::types::PacketKind;
use thiserror::Error;
use tracing::{debug, warn};

pub const START_MARKER: u8 = 0x24;

/// Length of a frame without the pressure block
pub const BASIC_FRAME_LEN: usize = 17;

/// Length of a frame carrying the pressure block
pub const PRESSURE_FRAME_LEN: usize = 21;

const BODY: std::ops::Range<usize> = 0..16;
const BODY_CHECKSUM: usize = 16;
const PRESSURE_BODY: std::ops::Range<usize> = 17..20;
const PRESSURE_CHECKSUM: usize = 20;

/// Upper bound on bytes held while waiting for a frame to complete
const MAX_PENDING: usize = 256;

/// Serial link parameters of the sensor array (receive-only)
pub mod link {
    pub const BAUD_RATE: u32 = 9600;
    pub const DATA_BITS: u8 = 8;
    pub const STOP_BITS: u8 = 1;
}

/// Reason a byte buffer was rejected by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Frame too short: {0} bytes")]
    TooShort(usize),

    #[error("Bad start marker: 0x{0:02X}")]
    BadMarker(u8),

    #[error("Checksum mismatch: computed 0x{computed:02X}, frame carries 0x{carried:02X}")]
    ChecksumMismatch { computed: u8, carried: u8 },
}

/// Unsigned 8-bit wrapping sum
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Classify a buffer, reporting why it is invalid
pub fn inspect(bytes: &[u8]) -> Result<PacketKind, FrameError> {
    if bytes.len() < BASIC_FRAME_LEN {
        return Err(FrameError::TooShort(bytes.len()));
    }
    if bytes[0] != START_MARKER {
        return Err(FrameError::BadMarker(bytes[0]));
    }
    let computed = checksum(&bytes[BODY]);
    if computed != bytes[BODY_CHECKSUM] {
        return Err(FrameError::ChecksumMismatch {
            computed,
            carried: bytes[BODY_CHECKSUM],
        });
    }
    if bytes.len() < PRESSURE_FRAME_LEN {
        return Ok(PacketKind::Basic);
    }
    if checksum(&bytes[PRESSURE_BODY]) != bytes[PRESSURE_CHECKSUM] {
        debug!(
            len = bytes.len(),
            "Pressure checksum mismatch, treating as basic frame"
        );
        return Ok(PacketKind::Basic);
    }
    Ok(PacketKind::BasicWithPressure)
}

/// Classify a buffer as a packet kind
pub fn classify(bytes: &[u8]) -> PacketKind {
    inspect(bytes).unwrap_or(PacketKind::Invalid)
}

/// Format bytes as `24.1A.0F (3)` for logs
pub fn format_hex_pretty(bytes: &[u8]) -> String {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!("{} ({})", hex.join("."), bytes.len())
}

/// Stream framing state machine
///
/// Bytes are appended as they are drained from the transport. Complete frames
/// are cut at the marker, partial frames stay buffered across polls, and
/// bytes that cannot start a valid frame are discarded.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: Vec<u8>,
    discarded: usize,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly received bytes
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        if self.pending.len() > MAX_PENDING {
            let excess = self.pending.len() - MAX_PENDING;
            warn!(dropped = excess, "Frame buffer full, dropping oldest bytes");
            self.discard(excess);
        }
    }

    /// Next complete frame
    ///
    /// A valid basic frame is held back while fewer than 21 bytes are
    /// buffered, since its pressure block may still be in flight. A tail
    /// starting with the marker is only taken as a pressure block once the
    /// bytes after the frame are known not to form the next frame.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        self.take(false)
    }

    /// Next frame once the line has gone quiet
    ///
    /// Releases a held basic frame, together with up to 3 trailing bytes;
    /// no pressure block is coming for it.
    pub fn flush(&mut self) -> Option<Vec<u8>> {
        self.take(true)
    }

    /// Bytes currently buffered
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Bytes discarded since the last call
    pub fn take_discarded(&mut self) -> usize {
        std::mem::take(&mut self.discarded)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn take(&mut self, idle: bool) -> Option<Vec<u8>> {
        loop {
            self.skip_to_marker();
            if self.pending.len() < BASIC_FRAME_LEN {
                return None;
            }
            if checksum(&self.pending[BODY]) != self.pending[BODY_CHECKSUM] {
                // Marker byte inside payload, resync past it
                self.discard(1);
                continue;
            }
            if self.pending.len() < PRESSURE_FRAME_LEN {
                return idle.then(|| self.take_basic());
            }
            if checksum(&self.pending[PRESSURE_BODY]) != self.pending[PRESSURE_CHECKSUM] {
                return Some(self.take_basic());
            }
            if self.pending[BASIC_FRAME_LEN] == START_MARKER {
                // Tail may be the head of the next frame rather than a pressure block
                let next = &self.pending[BASIC_FRAME_LEN..];
                if next.len() < BASIC_FRAME_LEN {
                    if !idle {
                        return None;
                    }
                } else if checksum(&next[BODY]) == next[BODY_CHECKSUM] {
                    return Some(self.take_basic());
                }
            }
            return Some(self.pending.drain(..PRESSURE_FRAME_LEN).collect());
        }
    }

    /// Cut a basic frame, keeping up to 3 trailing bytes before the next marker
    fn take_basic(&mut self) -> Vec<u8> {
        let limit = self.pending.len().min(PRESSURE_FRAME_LEN - 1);
        let len = self.pending[BASIC_FRAME_LEN..limit]
            .iter()
            .position(|&b| b == START_MARKER)
            .map_or(limit, |offset| BASIC_FRAME_LEN + offset);
        self.pending.drain(..len).collect()
    }

    fn skip_to_marker(&mut self) {
        let skip = self
            .pending
            .iter()
            .position(|&b| b == START_MARKER)
            .unwrap_or(self.pending.len());
        if skip > 0 {
            debug!(
                skipped = skip,
                bytes = %format_hex_pretty(&self.pending[..skip]),
                "Discarding bytes before start marker"
            );
            self.discard(skip);
        }
    }

    fn discard(&mut self, count: usize) {
        self.pending.drain(..count);
        self.discarded += count;
    }
}
