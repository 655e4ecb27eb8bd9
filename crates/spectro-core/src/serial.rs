//! Async serial-port abstractions for driver crates.
//!
//! The acquisition core never names a concrete port type. Anything that is
//! `AsyncRead + AsyncWrite + Unpin + Send` qualifies as a byte source:
//! `tokio_serial::SerialStream` on real hardware, `tokio::io::DuplexStream`
//! in tests. Drivers hold the port exclusively while acquiring; there is no
//! shared-port locking here because the protocol is strictly single-owner.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, BufReader};

use crate::error::{Result, SpectroError};

/// Trait alias for async serial port I/O.
///
/// Implemented by any `AsyncRead + AsyncWrite + Unpin + Send` type, which
/// covers real serial streams, duplex test streams, and custom mocks.
pub trait SerialPortIO: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> SerialPortIO for T {}

/// Type-erased boxed serial port.
pub type DynSerial = Box<dyn SerialPortIO>;

/// Exclusively-owned serial port with buffered reading.
///
/// The `BufReader` wrapper enables `read_until` for line-delimited marker
/// scanning while leaving `read_exact` available for the binary payload.
pub type BufferedPort = BufReader<DynSerial>;

/// Wrap a type-erased port for buffered reading.
pub fn wrap_buffered(port: DynSerial) -> BufferedPort {
    BufReader::new(port)
}

/// Open a serial port asynchronously using `spawn_blocking`.
///
/// Applies the device's standard settings: 8 data bits, no parity, one stop
/// bit, no flow control. Opening takes exclusive ownership of the OS handle;
/// dropping the returned stream releases it.
///
/// # Errors
/// Returns [`SpectroError::PortUnavailable`] if the port cannot be opened,
/// carrying the requested path for the caller's retry logic.
pub async fn open_serial_async(
    port_path: &str,
    baud_rate: u32,
) -> Result<tokio_serial::SerialStream> {
    use tokio_serial::SerialPortBuilderExt;

    let path = port_path.to_string();
    let opened = tokio::task::spawn_blocking(move || {
        let stream = tokio_serial::new(&path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async();
        (path, stream)
    })
    .await
    .map_err(|e| SpectroError::Io(std::io::Error::other(e)))?;

    match opened {
        (_, Ok(stream)) => Ok(stream),
        (port, Err(source)) => Err(SpectroError::PortUnavailable { port, source }),
    }
}

/// Drain stale bytes buffered on a serial port.
///
/// Reads and discards until no more data arrives within `timeout_ms`.
/// Called once right after opening, so a session never starts by consuming
/// the tail of a frame the device transmitted before we were listening.
///
/// Returns the number of bytes discarded. Read errors end the drain quietly;
/// they will resurface on the first real read.
pub async fn drain_serial_buffer<R: AsyncRead + Unpin>(port: &mut R, timeout_ms: u64) -> usize {
    let mut scratch = [0u8; 256];
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    let mut discarded = 0usize;

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, port.read(&mut scratch)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => discarded += n,
            Ok(Err(_)) | Err(_) => break,
        }
    }

    if discarded > 0 {
        tracing::debug!(discarded, "drained stale serial input");
    }
    discarded
}
