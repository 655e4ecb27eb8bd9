//! ILX526A Teensy Spectrometer Driver
//!
//! Acquires spectral intensity frames from an ILX526A CCD spectrometer
//! driven by a Teensy microcontroller over USB-CDC serial.
//!
//! Protocol overview:
//! - The firmware prefixes every frame with a fixed 37-byte
//!   start-of-transmission marker (an ASCII UUID plus newline).
//! - The frame body is `2 * pixel_count` bytes of little-endian u16
//!   samples, a one-byte delimiter, a little-endian u32 timing value, and a
//!   second one-byte delimiter.
//! - There are no lengths or checksums; resynchronization after noise or a
//!   device reset is done by scanning for the exact marker line.
//!
//! # Usage
//!
//! ```rust,ignore
//! use spectro_driver_ilx526a::{Ilx526aConfig, Ilx526aSpectrometer};
//!
//! let config = Ilx526aConfig::new("/dev/ttyACM0");
//! let driver = Ilx526aSpectrometer::connect(config).await?;
//!
//! let task = driver.start();
//! let mut frames = task.subscribe();
//! while let Ok(frame) = frames.recv().await {
//!     println!("mean intensity {:.1}", frame.mean());
//! }
//! ```

pub mod acquisition;
pub mod config;
pub mod driver;
pub mod framing;
pub mod protocol;

pub use acquisition::AcquisitionTask;
pub use config::Ilx526aConfig;
pub use driver::Ilx526aSpectrometer;
pub use protocol::{RawFrame, DEFAULT_PIXEL_COUNT, START_MARKER};

// Re-export the shared data types driver consumers handle directly.
pub use spectro_core::{CalibrationTable, Frame, Result, SpectroError};
