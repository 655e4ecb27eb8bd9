//! Error types for the acquisition stack.
//!
//! [`SpectroError`] consolidates the failure kinds the driver can surface:
//! port open failures, bounded-read timeouts, transport errors, and device
//! disconnects. Non-matching lines seen while scanning for the start-of-frame
//! marker are deliberately *not* errors; the synchronizer discards them
//! silently because arbitrary preamble between frames is expected behavior.
//!
//! All I/O-level errors are fatal to the acquisition cycle that hit them.
//! Recovery (reopening the port, restarting the loop) belongs to the caller.

use thiserror::Error;

/// Convenience alias for results using the acquisition error type.
pub type Result<T> = std::result::Result<T, SpectroError>;

/// Primary error type for spectrometer acquisition.
#[derive(Error, Debug)]
pub enum SpectroError {
    /// Opening the serial port failed.
    ///
    /// The port may be missing, busy, or lack permissions. Recoverable by
    /// retrying with the same or a different port path; the driver is never
    /// left half-open after this error.
    #[error("failed to open serial port {port}")]
    PortUnavailable {
        port: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// A bounded read did not complete in the allotted time.
    ///
    /// Fatal to the current acquisition cycle. A timeout mid-frame almost
    /// always means a desynchronized or disconnected device; re-reading at
    /// the wrong stream offset would corrupt all subsequent framing.
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    /// Underlying transport failure (device unplugged, OS-level error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial stream ended mid-communication.
    ///
    /// Typically the device was unplugged or powered off. Fatal; the caller
    /// must reconnect before acquiring again.
    #[error("unexpected EOF from serial port")]
    UnexpectedEof,

    /// Configuration values parsed but failed semantic validation.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_names_operation() {
        let err = SpectroError::Timeout {
            operation: "marker synchronization",
        };
        assert_eq!(err.to_string(), "marker synchronization timed out");
    }

    #[test]
    fn eof_maps_distinctly_from_io() {
        let err = SpectroError::UnexpectedEof;
        assert!(err.to_string().contains("EOF"));
    }
}
