//! Destination and packet table sections
//!
//! These are pure configuration records. The engine converts them into its
//! runtime tables at activation; validation happens before that, never on
//! the per-packet path.

use serde::Deserialize;

/// Filename suffix style
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamingConfig {
    /// Eight-digit sequence count suffix (default)
    #[default]
    Count,
    /// UTC timestamp suffix
    Time,
}

/// One destination file definition
///
/// # Example
///
/// ```toml
/// [[destination]]
/// path = "/data/rec"
/// base = "tlm"
/// extension = ".pkt"
/// naming = "count"
/// max_size = 1048576
/// max_age = 3600
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    /// Directory files are written into
    pub path: String,

    /// Filename stem
    pub base: String,

    /// Filename extension
    pub extension: String,

    /// Filename suffix style
    pub naming: NamingConfig,

    /// Size limit in bytes; 0 = unbounded
    pub max_size: u32,

    /// Age limit in seconds; 0 = unbounded
    pub max_age: u32,

    /// Starting filename sequence count
    pub sequence_count: u32,

    /// Destination enable state
    pub enabled: bool,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            base: String::new(),
            extension: String::new(),
            naming: NamingConfig::Count,
            max_size: 0,
            max_age: 0,
            sequence_count: 0,
            enabled: true,
        }
    }
}

/// Counter source for a filter
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterKindConfig {
    /// Duty cycle over the occurrence counter (default)
    #[default]
    Count,
    /// Duty cycle over the packet's embedded timestamp
    Time,
}

/// One filter slot definition
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Destination file index the slot writes to
    pub dest: usize,

    /// Counter source
    pub kind: FilterKindConfig,

    /// Packets admitted per block
    pub n: u16,

    /// Block length
    pub x: u16,

    /// Phase offset
    pub o: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        // Matches the filter table's drop-everything default slot
        Self {
            dest: 0,
            kind: FilterKindConfig::Count,
            n: 0,
            x: 1,
            o: 0,
        }
    }
}

/// One packet stream definition: a MID and its filter slots
///
/// # Example
///
/// ```toml
/// [[packet]]
/// mid = 0x08A1
///
/// [[packet.filter]]
/// dest = 0
/// n = 1
/// x = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PacketConfig {
    /// Message ID of the stream
    pub mid: u16,

    /// Filter slots, applied in order to the entry's slots
    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterConfig>,
}
