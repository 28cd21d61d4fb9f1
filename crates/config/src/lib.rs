//! packrat - Configuration
//!
//! TOML-based configuration with sensible defaults: a minimal config is an
//! empty file, and every section only needs the fields that differ from
//! the defaults. Parsing always validates, so a `Config` value in hand is
//! an activatable configuration.
//!
//! # Parsing
//!
//! ```
//! use packrat_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[recorder]\nenabled = true").unwrap();
//! assert!(config.recorder.enabled);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [recorder]
//! tick_interval_secs = 1
//!
//! [source]
//! udp_port = 5800
//!
//! [recovery]
//! path = "packrat.snap"
//!
//! [[destination]]
//! path = "/data/rec"
//! base = "tlm"
//! extension = ".pkt"
//! max_size = 1048576
//!
//! [[packet]]
//! mid = 0x08A1
//!
//! [[packet.filter]]
//! dest = 0
//! n = 1
//! x = 10
//! ```

mod error;
mod log;
mod recorder;
mod tables;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use error::{ConfigError, Result};
pub use log::{LogConfig, LogFormat, LogLevel};
pub use recorder::{RecorderConfig, RecoveryConfig, SourceConfig};
pub use tables::{DestinationConfig, FilterConfig, FilterKindConfig, NamingConfig, PacketConfig};

/// Main configuration structure
///
/// All sections are optional with defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine-level settings
    pub recorder: RecorderConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Packet source settings
    pub source: SourceConfig,

    /// Recovery snapshot settings
    pub recovery: RecoveryConfig,

    /// Destination file definitions
    #[serde(rename = "destination")]
    pub destinations: Vec<DestinationConfig>,

    /// Packet stream definitions
    #[serde(rename = "packet")]
    pub packets: Vec<PacketConfig>,
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Self::from_str(&contents)
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        validation::validate_config(&config)?;
        Ok(config)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
