//! Recorder, source and recovery sections

use serde::Deserialize;

/// Engine-level settings
///
/// # Example
///
/// ```toml
/// [recorder]
/// enabled = true
/// tick_interval_secs = 1
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Initial engine enable state (a recovered snapshot overrides this)
    pub enabled: bool,

    /// Seconds between age/growth-rate ticks
    pub tick_interval_secs: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_secs: 1,
        }
    }
}

/// Packet source settings
///
/// # Example
///
/// ```toml
/// [source]
/// bind = "0.0.0.0"
/// udp_port = 5800
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Bind address for the UDP packet source
    pub bind: String,

    /// UDP port packets arrive on
    pub udp_port: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            udp_port: 5800,
        }
    }
}

/// Recovery snapshot settings
///
/// # Example
///
/// ```toml
/// [recovery]
/// enabled = true
/// path = "packrat.snap"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Persist and restore engine state across restarts
    pub enabled: bool,

    /// Snapshot file path
    pub path: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "packrat.snap".into(),
        }
    }
}
