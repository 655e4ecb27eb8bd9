//! Decoded acquisition data types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectroError};

/// One complete acquisition cycle from the spectrometer.
///
/// Holds one intensity sample per detector pixel, in device transmission
/// order, plus the elapsed-time value the firmware reports at the end of
/// each frame. Both fields are decoded little-endian from the wire.
///
/// A `Frame` is constructed once per cycle and handed to the consumer; the
/// acquisition core keeps no history of past frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// One intensity reading per detector pixel.
    pub samples: Vec<u16>,

    /// Device-reported timing value (microsecond delay counter).
    pub timing: u32,
}

impl Frame {
    /// Number of detector pixels in this frame.
    pub fn pixel_count(&self) -> usize {
        self.samples.len()
    }

    /// Mean intensity across all pixels.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.samples.iter().map(|&v| u64::from(v)).sum();
        sum as f64 / self.samples.len() as f64
    }

    /// Peak intensity and the pixel index it occurred at.
    pub fn peak(&self) -> Option<(usize, u16)> {
        self.samples
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|&(_, v)| v)
    }
}

/// Pixel-index to wavelength mapping.
///
/// Owned by the calibration layer; the acquisition core only ever emits raw
/// pixel samples and never consults this table. Kept here so driver
/// consumers and the calibration editor share one representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    wavelengths_nm: Vec<f64>,
}

impl CalibrationTable {
    /// Build a table from per-pixel wavelengths.
    ///
    /// # Errors
    /// Returns a configuration error if the table is empty.
    pub fn new(wavelengths_nm: Vec<f64>) -> Result<Self> {
        if wavelengths_nm.is_empty() {
            return Err(SpectroError::Configuration(
                "calibration table must map at least one pixel".into(),
            ));
        }
        Ok(Self { wavelengths_nm })
    }

    /// Number of calibrated pixels.
    pub fn len(&self) -> usize {
        self.wavelengths_nm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths_nm.is_empty()
    }

    /// Wavelength assigned to a pixel, if the pixel is in calibrated range.
    pub fn wavelength(&self, pixel: usize) -> Option<f64> {
        self.wavelengths_nm.get(pixel).copied()
    }

    /// Iterate `(pixel, wavelength)` pairs in pixel order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.wavelengths_nm.iter().copied().enumerate()
    }
}
