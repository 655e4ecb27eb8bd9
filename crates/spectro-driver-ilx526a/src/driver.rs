//! ILX526A spectrometer driver.

use spectro_core::serial::{drain_serial_buffer, open_serial_async, wrap_buffered, BufferedPort, DynSerial};
use spectro_core::{Frame, Result};
use tracing::instrument;

use crate::acquisition::{self, acquire_cycle, AcquisitionTask};
use crate::config::Ilx526aConfig;

/// Milliseconds to spend draining stale input after opening the port.
const DRAIN_TIMEOUT_MS: u64 = 50;

/// A connected ILX526A Teensy spectrometer.
///
/// Holds the serial connection exclusively. While this value exists the
/// port is open; dropping it (or the [`AcquisitionTask`] it was handed to)
/// closes the port. There is no half-open state: a failed
/// [`connect`](Self::connect) returns an error and nothing to close.
pub struct Ilx526aSpectrometer {
    reader: BufferedPort,
    config: Ilx526aConfig,
}

impl Ilx526aSpectrometer {
    /// Open the configured port and prepare it for acquisition.
    ///
    /// Any bytes the device transmitted before we were listening are
    /// drained immediately, so the first synchronization never starts in
    /// the middle of a stale frame.
    ///
    /// # Errors
    /// [`spectro_core::SpectroError::PortUnavailable`] if the port cannot
    /// be opened; [`spectro_core::SpectroError::Configuration`] for invalid
    /// config values.
    #[instrument(skip(config), fields(port = %config.port), err)]
    pub async fn connect(config: Ilx526aConfig) -> Result<Self> {
        config.validate()?;

        let port = open_serial_async(&config.port, config.baud_rate).await?;
        tracing::info!(port = %config.port, "serial port opened");

        let mut reader = wrap_buffered(Box::new(port));
        drain_serial_buffer(reader.get_mut(), DRAIN_TIMEOUT_MS).await;

        Ok(Self { reader, config })
    }

    /// Build a driver over an arbitrary byte source.
    ///
    /// Lets tests and simulators substitute an in-memory stream (for
    /// example one half of `tokio::io::duplex`) for real hardware. No
    /// draining is performed; the caller controls the stream contents.
    pub fn from_port(port: DynSerial, config: Ilx526aConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader: wrap_buffered(port),
            config,
        })
    }

    pub fn config(&self) -> &Ilx526aConfig {
        &self.config
    }

    /// Acquire a single frame: synchronize, read, decode.
    ///
    /// Blocks (asynchronously) until the next marker arrives or the read
    /// timeout elapses. Intended for interactive and diagnostic use; for
    /// continuous readout use [`start`](Self::start).
    #[instrument(skip(self), err)]
    pub async fn acquire_frame(&mut self) -> Result<Frame> {
        let timeout = self.config.read_timeout();
        acquire_cycle(&mut self.reader, &self.config, timeout).await
    }

    /// Start continuous acquisition on a background task.
    ///
    /// Consumes the driver; the task takes over exclusive ownership of the
    /// connection and closes it when it finishes.
    pub fn start(self) -> AcquisitionTask {
        tracing::info!(
            pixel_count = self.config.pixel_count,
            "starting continuous acquisition"
        );
        acquisition::spawn(self.reader, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::START_MARKER;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn from_port_rejects_invalid_config() {
        let (_host, device) = tokio::io::duplex(64);
        let mut cfg = Ilx526aConfig::new("test");
        cfg.pixel_count = 0;
        assert!(Ilx526aSpectrometer::from_port(Box::new(device), cfg).is_err());
    }

    #[tokio::test]
    async fn acquire_frame_over_duplex() {
        let (mut host, device) = tokio::io::duplex(1024);
        let mut cfg = Ilx526aConfig::new("test");
        cfg.pixel_count = 2;
        cfg.read_timeout_ms = 500;

        let mut driver = Ilx526aSpectrometer::from_port(Box::new(device), cfg).unwrap();

        host.write_all(START_MARKER).await.unwrap();
        host.write_all(&[0x2A, 0x00, 0x2B, 0x00]).await.unwrap();
        host.write_all(&[0x00]).await.unwrap();
        host.write_all(&9u32.to_le_bytes()).await.unwrap();
        host.write_all(&[0x00]).await.unwrap();

        let frame = driver.acquire_frame().await.unwrap();
        assert_eq!(frame.samples, vec![42, 43]);
        assert_eq!(frame.timing, 9);
    }
}
