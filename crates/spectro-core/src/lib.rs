//! `spectro-core`
//!
//! Shared building blocks for the spectro-daq acquisition stack.
//!
//! This crate holds everything the device driver and its consumers have in
//! common: the application error type, the decoded [`Frame`] data type, the
//! pixel-to-wavelength [`CalibrationTable`], and the async serial-port
//! abstractions driver crates build on.
//!
//! ## Key Types
//!
//! - [`Frame`]: one acquisition cycle's decoded samples plus device timing
//! - [`SpectroError`]: typed error for port, timeout, and transport failures
//! - [`serial::DynSerial`]: type-erased async serial port (real hardware or
//!   an in-memory duplex stream in tests)

pub mod data;
pub mod error;
pub mod serial;

pub use data::{CalibrationTable, Frame};
pub use error::{Result, SpectroError};
