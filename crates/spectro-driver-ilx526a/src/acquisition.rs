//! Continuous acquisition task.
//!
//! The loop alternates between two states: synchronizing to the next marker
//! and reading the frame body. Each decoded frame is fanned out to
//! subscribers over a broadcast channel; a slow subscriber lags and loses
//! frames rather than stalling acquisition.
//!
//! Any timeout or transport error is fatal to the task. A short read from a
//! serial device usually means the device reset or disconnected, and reading
//! on at the wrong stream offset would corrupt all subsequent framing, so
//! the task stops and reports the cause. Restarting means reconnecting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use spectro_core::serial::BufferedPort;
use spectro_core::{Frame, Result, SpectroError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::config::Ilx526aConfig;
use crate::framing::{read_raw_frame, synchronize};

/// Frames buffered per subscriber before the oldest are dropped.
const FRAME_CHANNEL_CAPACITY: usize = 16;

/// Handle to a running acquisition task.
///
/// The task exclusively owns the serial connection until it finishes. It
/// finishes in one of two ways, distinguishable via [`join`](Self::join):
/// `Ok(())` after a [`stop`](Self::stop) request, or `Err` when a read
/// failed and acquisition died. "Still synchronizing" is not an error and
/// produces neither.
pub struct AcquisitionTask {
    frame_tx: broadcast::Sender<Arc<Frame>>,
    frame_count: Arc<AtomicU64>,
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<Result<()>>,
}

impl AcquisitionTask {
    /// Subscribe to decoded frames.
    ///
    /// Each subscriber sees every frame emitted after it subscribed, up to
    /// the channel capacity; frames emitted with no subscribers are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Frame>> {
        self.frame_tx.subscribe()
    }

    /// Frames decoded and emitted so far.
    pub fn frames_acquired(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Request a stop. Honored at the next state boundary, or immediately
    /// if the task is waiting on the device; partially read frame bytes are
    /// discarded with the connection.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the task to finish and return its outcome.
    pub async fn join(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| SpectroError::Io(std::io::Error::other(e)))?
    }
}

/// Spawn the acquisition loop on its own tokio task.
pub(crate) fn spawn(reader: BufferedPort, config: Ilx526aConfig) -> AcquisitionTask {
    let (frame_tx, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
    let (stop_tx, stop_rx) = watch::channel(false);
    let frame_count = Arc::new(AtomicU64::new(0));

    let handle = tokio::spawn(run_loop(
        reader,
        config,
        frame_tx.clone(),
        frame_count.clone(),
        stop_rx,
    ));

    AcquisitionTask {
        frame_tx,
        frame_count,
        stop_tx,
        handle,
    }
}

async fn run_loop(
    mut reader: BufferedPort,
    config: Ilx526aConfig,
    frame_tx: broadcast::Sender<Arc<Frame>>,
    frame_count: Arc<AtomicU64>,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<()> {
    let timeout = config.read_timeout();

    loop {
        if *stop_rx.borrow() {
            break;
        }

        tokio::select! {
            _ = stop_rx.changed() => break,
            cycle = acquire_cycle(&mut reader, &config, timeout) => match cycle {
                Ok(frame) => {
                    let n = frame_count.fetch_add(1, Ordering::Relaxed) + 1;
                    log::debug!("frame {}: {} samples, timing {}", n, frame.pixel_count(), frame.timing);
                    let _ = frame_tx.send(Arc::new(frame));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "acquisition terminated");
                    return Err(e);
                }
            },
        }
    }

    tracing::info!(
        frames = frame_count.load(Ordering::Relaxed),
        "acquisition stopped on request"
    );
    Ok(())
}

/// One full acquisition cycle: synchronize, read, decode.
pub(crate) async fn acquire_cycle(
    reader: &mut BufferedPort,
    config: &Ilx526aConfig,
    timeout: Duration,
) -> Result<Frame> {
    synchronize(reader, timeout).await?;

    let raw = tokio::time::timeout(timeout, read_raw_frame(reader, config.pixel_count))
        .await
        .map_err(|_| SpectroError::Timeout {
            operation: "frame body read",
        })??;

    Ok(raw.decode())
}
