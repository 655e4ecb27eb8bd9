//! Driver configuration.

use std::time::Duration;

use serde::Deserialize;
use spectro_core::{Result, SpectroError};

use crate::protocol::DEFAULT_PIXEL_COUNT;

/// Configuration for the ILX526A spectrometer driver.
///
/// Deserializable from TOML:
///
/// ```toml
/// port = "/dev/ttyACM0"
/// baud_rate = 9600
/// pixel_count = 3100
/// read_timeout_ms = 5000
/// ```
///
/// Only `port` is required. The pixel count is a firmware build parameter,
/// not a protocol constant; it must match what the device actually
/// transmits or every frame read will land off-boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct Ilx526aConfig {
    /// Serial port path (e.g. "/dev/ttyACM0").
    pub port: String,

    /// Line rate; USB-CDC on the Teensy ignores this but serialport
    /// requires a value.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Detector pixels per frame.
    #[serde(default = "default_pixel_count")]
    pub pixel_count: usize,

    /// Bound on each blocking read. Applied per marker-scan line and per
    /// frame body, so synchronization can wait through any number of noise
    /// lines without the loop ever hanging unbounded.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_pixel_count() -> usize {
    DEFAULT_PIXEL_COUNT
}

fn default_read_timeout_ms() -> u64 {
    5000
}

impl Ilx526aConfig {
    /// Config for `port` with stock firmware defaults.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: default_baud_rate(),
            pixel_count: default_pixel_count(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)
            .map_err(|e| SpectroError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Semantic validation beyond what deserialization checks.
    pub fn validate(&self) -> Result<()> {
        if self.pixel_count == 0 {
            return Err(SpectroError::Configuration(
                "pixel_count must be at least 1".into(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(SpectroError::Configuration(
                "read_timeout_ms must be nonzero".into(),
            ));
        }
        Ok(())
    }

    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_firmware() {
        let cfg = Ilx526aConfig::new("/dev/ttyACM0");
        assert_eq!(cfg.baud_rate, 9600);
        assert_eq!(cfg.pixel_count, 3100);
        assert_eq!(cfg.read_timeout(), Duration::from_millis(5000));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_with_only_port_uses_defaults() {
        let cfg = Ilx526aConfig::from_toml_str(r#"port = "/dev/ttyACM1""#).unwrap();
        assert_eq!(cfg.port, "/dev/ttyACM1");
        assert_eq!(cfg.pixel_count, 3100);
    }

    #[test]
    fn toml_overrides_apply() {
        let cfg = Ilx526aConfig::from_toml_str(
            r#"
            port = "/dev/ttyACM0"
            pixel_count = 2048
            read_timeout_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.pixel_count, 2048);
        assert_eq!(cfg.read_timeout_ms, 250);
    }

    #[test]
    fn missing_port_is_rejected() {
        assert!(Ilx526aConfig::from_toml_str("pixel_count = 3100").is_err());
    }

    #[test]
    fn zero_pixel_count_is_rejected() {
        let mut cfg = Ilx526aConfig::new("/dev/ttyACM0");
        cfg.pixel_count = 0;
        assert!(matches!(
            cfg.validate(),
            Err(SpectroError::Configuration(_))
        ));
    }
}
