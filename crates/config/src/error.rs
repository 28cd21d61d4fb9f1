//! Configuration error types

use std::io;

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
///
/// Every variant is raised before any engine state exists: a rejected
/// configuration never partially activates.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required field is missing or empty
    #[error("{component} '{name}' is missing required field '{field}'")]
    MissingField {
        /// Component type (e.g. "destination", "packet")
        component: &'static str,
        /// Name or index of the component
        name: String,
        /// Missing field name
        field: &'static str,
    },

    /// A field value is out of range or malformed
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        /// Component type
        component: &'static str,
        /// Name or index of the component
        name: String,
        /// Field name
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// More entries than the fixed table capacity
    #[error("too many {component} entries: {count} configured, capacity is {capacity}")]
    OverCapacity {
        /// Component type
        component: &'static str,
        /// Entries configured
        count: usize,
        /// Fixed table capacity
        capacity: usize,
    },

    /// The same MID appears in more than one packet section
    #[error("MID 0x{mid:04X} is configured more than once")]
    DuplicateMid {
        /// The duplicated MID value
        mid: u16,
    },

    /// A filter references a destination index that is not configured
    #[error("packet 0x{mid:04X} filter {slot} references destination {dest}, only {count} configured")]
    DanglingDestination {
        /// MID owning the filter
        mid: u16,
        /// Filter slot index
        slot: usize,
        /// Referenced destination index
        dest: usize,
        /// Configured destination count
        count: usize,
    },
}

impl ConfigError {
    /// Create an Io error
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::MissingField {
            component,
            name: name.into(),
            field,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}
