// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use thiserror::Error;

use crate::trust::{ConfigEntry, EventFlags};

/// Why a single config entry failed validation (§4.D).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("event_flags 0x{0:02x} includes bits outside the known set")]
    UnknownEventFlags(u8),
    #[error("TIME flag set but time_sec is 0")]
    TimeFlagWithoutDuration,
    #[error("TIME flag clear but time_sec is {0}")]
    DurationWithoutTimeFlag(u16),
    #[error("upper_limit does not exceed lower_limit")]
    LimitsNotAscending,
}

/// Validate one config entry against the rules in §4.D.
fn validate_entry(entry: &ConfigEntry) -> Result<(), ConfigValidationError> {
    if entry.event_flags.bits() != EventFlags::NONE.bits()
        && !EventFlags::all().contains(entry.event_flags)
    {
        return Err(ConfigValidationError::UnknownEventFlags(
            entry.event_flags.bits(),
        ));
    }

    if entry.event_flags.contains(EventFlags::TIME) {
        if entry.time_sec == 0 {
            return Err(ConfigValidationError::TimeFlagWithoutDuration);
        }
    } else if entry.time_sec != 0 {
        return Err(ConfigValidationError::DurationWithoutTimeFlag(
            entry.time_sec,
        ));
    }

    let has_threshold = entry.event_flags.intersects(
        EventFlags::LOWER_THRESHOLD | EventFlags::UPPER_THRESHOLD,
    );
    if has_threshold && entry.upper_limit <= entry.lower_limit {
        return Err(ConfigValidationError::LimitsNotAscending);
    }

    Ok(())
}

/// Validate a whole list of config entries: success only if every entry is
/// valid, otherwise the first failure encountered (§4.D).
pub fn validate_config(entries: &[ConfigEntry]) -> Result<(), ConfigValidationError> {
    entries.iter().try_for_each(validate_entry)
}
