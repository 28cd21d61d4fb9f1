//! Configuration validation
//!
//! Validates config consistency before activation:
//! - Table sections fit their fixed capacities
//! - Enabled destinations have a path and base name
//! - Size/age/sequence limits are within bounds
//! - Filter (N, X, O) parameters satisfy the invariant
//! - No duplicate MIDs
//! - No filter references a destination that is not configured
//!
//! The engine performs none of these checks at use time: a configuration
//! that passes here is trusted on the per-packet path.

use packrat_filter::{FilterParams, FILTERS_PER_PACKET, PACKET_TABLE_CAPACITY};
use packrat_storage::{verify_age, verify_count, verify_size, DEST_FILE_COUNT};

use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_destinations(config)?;
    validate_packets(config)?;
    Ok(())
}

/// Validate destination file definitions
fn validate_destinations(config: &Config) -> Result<()> {
    if config.destinations.len() > DEST_FILE_COUNT {
        return Err(ConfigError::OverCapacity {
            component: "destination",
            count: config.destinations.len(),
            capacity: DEST_FILE_COUNT,
        });
    }

    for (index, dest) in config.destinations.iter().enumerate() {
        let name = index.to_string();

        if dest.enabled {
            if dest.path.is_empty() {
                return Err(ConfigError::missing_field("destination", &name, "path"));
            }
            if dest.base.is_empty() {
                return Err(ConfigError::missing_field("destination", &name, "base"));
            }
        }

        if !verify_size(dest.max_size) {
            return Err(ConfigError::invalid_value(
                "destination",
                &name,
                "max_size",
                format!("{} is below the minimum non-zero limit", dest.max_size),
            ));
        }
        if !verify_age(dest.max_age) {
            return Err(ConfigError::invalid_value(
                "destination",
                &name,
                "max_age",
                format!("{} is below the minimum non-zero limit", dest.max_age),
            ));
        }
        if !verify_count(dest.sequence_count) {
            return Err(ConfigError::invalid_value(
                "destination",
                &name,
                "sequence_count",
                format!("{} exceeds the eight-digit ceiling", dest.sequence_count),
            ));
        }
    }

    Ok(())
}

/// Validate packet stream definitions
fn validate_packets(config: &Config) -> Result<()> {
    if config.packets.len() > PACKET_TABLE_CAPACITY {
        return Err(ConfigError::OverCapacity {
            component: "packet",
            count: config.packets.len(),
            capacity: PACKET_TABLE_CAPACITY,
        });
    }

    let mut seen = std::collections::HashSet::new();

    for packet in &config.packets {
        if !seen.insert(packet.mid) {
            return Err(ConfigError::DuplicateMid { mid: packet.mid });
        }

        let name = format!("0x{:04X}", packet.mid);

        if packet.filters.len() > FILTERS_PER_PACKET {
            return Err(ConfigError::invalid_value(
                "packet",
                &name,
                "filter",
                format!(
                    "{} filter slots configured, limit is {}",
                    packet.filters.len(),
                    FILTERS_PER_PACKET
                ),
            ));
        }

        for (slot, filter) in packet.filters.iter().enumerate() {
            // Dangling destination references are rejected here, not at
            // use time
            if filter.dest >= config.destinations.len() {
                return Err(ConfigError::DanglingDestination {
                    mid: packet.mid,
                    slot,
                    dest: filter.dest,
                    count: config.destinations.len(),
                });
            }

            if !FilterParams::new(filter.n, filter.x, filter.o).verify() {
                return Err(ConfigError::invalid_value(
                    "packet",
                    &name,
                    "filter",
                    format!(
                        "slot {} parameters N = {}, X = {}, O = {} violate X > 0, N <= X, O < X",
                        slot, filter.n, filter.x, filter.o
                    ),
                ));
            }
        }
    }

    Ok(())
}
