//! Internal helpers for validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so the adapter enforces consistent invariants.

use api_types::Period;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a user-supplied name; empty names are invalid.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(normalized)
}

/// Reject months outside `1..=12` before the round trip.
pub(crate) fn validate_period(period: &Period) -> ResultEngine<()> {
    if !(1..=12).contains(&period.month) {
        return Err(EngineError::InvalidDate(format!(
            "invalid month: {}",
            period.month
        )));
    }
    Ok(())
}
