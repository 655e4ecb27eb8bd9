//! Stream synchronization and raw frame reading.
//!
//! The device emits arbitrary preamble after reset and between frames; the
//! only way back onto a frame boundary is to scan line-by-line for the exact
//! start-of-transmission marker. Everything before the marker is discarded.
//! Once synchronized, the frame body is a fixed byte count, read with
//! `read_exact` so a short read can never hand a partial frame downstream.

use std::time::Duration;

use spectro_core::{Result, SpectroError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt};

use crate::protocol::{RawFrame, BYTES_PER_SAMPLE, DELIMITER_LEN, START_MARKER, TIMING_LEN};

/// Scan the stream until the start-of-transmission marker is found.
///
/// Reads newline-terminated lines and compares each one byte-for-byte
/// against [`START_MARKER`]. Non-matching lines (noise, partial lines,
/// device log output) are discarded silently without bound; only the wait
/// for each individual line is bounded by `idle_timeout`, so a silent or
/// unplugged device surfaces as an error instead of hanging forever.
///
/// # Errors
/// - [`SpectroError::Timeout`] if no line arrives within `idle_timeout`
/// - [`SpectroError::UnexpectedEof`] if the stream ends
/// - [`SpectroError::Io`] on transport failure
pub async fn synchronize<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    idle_timeout: Duration,
) -> Result<()> {
    let mut line = Vec::with_capacity(START_MARKER.len());
    loop {
        line.clear();
        let n = tokio::time::timeout(idle_timeout, reader.read_until(b'\n', &mut line))
            .await
            .map_err(|_| SpectroError::Timeout {
                operation: "marker synchronization",
            })??;

        if n == 0 {
            return Err(SpectroError::UnexpectedEof);
        }
        if line.as_slice() == START_MARKER {
            tracing::trace!("synchronized to start-of-transmission marker");
            return Ok(());
        }
        tracing::trace!(len = n, "discarded non-marker line");
    }
}

/// Read one frame body following a successful synchronization.
///
/// Byte counts are fixed: `2 * pixel_count` payload bytes, one delimiter,
/// four timing bytes, one delimiter. The delimiters are consumed but never
/// inspected; their only job is to keep the stream position advanced for
/// the next marker scan. If any read fails or the stream ends short, the
/// whole frame fails and every byte read so far is dropped.
pub async fn read_raw_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    pixel_count: usize,
) -> Result<RawFrame> {
    let mut payload = vec![0u8; pixel_count * BYTES_PER_SAMPLE];
    reader.read_exact(&mut payload).await.map_err(map_read_err)?;

    let mut delimiter = [0u8; DELIMITER_LEN];
    reader
        .read_exact(&mut delimiter)
        .await
        .map_err(map_read_err)?;

    let mut timing = [0u8; TIMING_LEN];
    reader.read_exact(&mut timing).await.map_err(map_read_err)?;

    reader
        .read_exact(&mut delimiter)
        .await
        .map_err(map_read_err)?;

    Ok(RawFrame { payload, timing })
}

fn map_read_err(e: std::io::Error) -> SpectroError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        SpectroError::UnexpectedEof
    } else {
        SpectroError::Io(e)
    }
}
