//! Wire-level constants and frame decoding for the ILX526A Teensy firmware.
//!
//! Per-frame layout, in transmission order:
//!
//! | Field       | Size               | Encoding                     |
//! |-------------|--------------------|------------------------------|
//! | Marker      | 37 bytes           | ASCII UUID + `\n`            |
//! | Payload     | 2 × pixel count    | u16 samples, little-endian   |
//! | Delimiter 1 | 1 byte             | consumed, never inspected    |
//! | Timing      | 4 bytes            | u32, little-endian           |
//! | Delimiter 2 | 1 byte             | consumed, never inspected    |
//!
//! The marker is the firmware's start-of-transmission constant; it is the
//! only synchronization point the stream offers (no lengths or checksums
//! precede it), so matching is byte-exact.

use spectro_core::Frame;

/// Start-of-transmission marker, including the terminating newline.
///
/// Matches the UUID string compiled into the Teensy firmware. 37 bytes.
pub const START_MARKER: &[u8; 37] = b"7eae261d-dde2-4eed-a293-a7cd17e4379a\n";

/// Detector pixels per frame in the stock firmware configuration.
pub const DEFAULT_PIXEL_COUNT: usize = 3100;

/// Bytes per sample on the wire.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Bytes in the trailing timing field.
pub const TIMING_LEN: usize = 4;

/// Bytes in each framing delimiter.
pub const DELIMITER_LEN: usize = 1;

/// Raw frame bytes as read off the wire, before decoding.
///
/// Produced by [`crate::framing::read_raw_frame`], which guarantees the
/// payload is exactly `2 * pixel_count` bytes. Delimiter bytes never appear
/// here; the reader consumes and drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Sample bytes, two per pixel, device order.
    pub payload: Vec<u8>,
    /// The four trailing timing bytes.
    pub timing: [u8; TIMING_LEN],
}

impl RawFrame {
    /// Pixel count implied by the payload length.
    pub fn pixel_count(&self) -> usize {
        self.payload.len() / BYTES_PER_SAMPLE
    }

    /// Decode into a typed [`Frame`].
    ///
    /// Total over correctly-sized input: the reader already guaranteed the
    /// payload length, so decoding cannot fail. Samples and timing are
    /// little-endian, the Teensy's native transmission order.
    pub fn decode(&self) -> Frame {
        let samples = self
            .payload
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Frame {
            samples,
            timing: u32::from_le_bytes(self.timing),
        }
    }
}
