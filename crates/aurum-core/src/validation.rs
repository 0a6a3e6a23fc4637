//! # Validation Module
//!
//! Field-level validation for scheme specs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (API / frontend)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + template parser                                │
//! │  ├── Field constraints (name, affixes, counter value)                  │
//! │  └── Template parse (fail fast, before anything is written)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (tenant_id, name)                                          │
//! │  ├── CHECK (current_sequence >= 1)                                     │
//! │  └── Partial unique index on the per-tenant default                    │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreResult, ValidationError};
use crate::template::CompiledTemplate;
use crate::types::{NewScheme, SchemeUpdate};
use crate::{MAX_AFFIX_LEN, MAX_FORMAT_LEN, MAX_PREVIEW_COUNT, MAX_SCHEME_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a scheme name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
///
/// Uniqueness within the tenant is checked by the registry against the
/// store, not here.
pub fn validate_scheme_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_SCHEME_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_SCHEME_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a prefix or suffix value.
///
/// ## Rules
/// - May be empty (affixes are optional)
/// - Must be at most 50 characters
/// - Must not contain braces: the template grammar has no escape for a
///   literal `{`/`}`, so an affix containing one would render a string the
///   parser could never round-trip. Rejected rather than left undefined.
pub fn validate_affix(field: &str, value: &str) -> ValidationResult<()> {
    if value.len() > MAX_AFFIX_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_AFFIX_LEN,
        });
    }

    if value.contains(['{', '}']) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain '{' or '}'".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
///
/// ## Example
/// ```rust
/// use aurum_core::validation::validate_uuid;
///
/// assert!(validate_uuid("tenant_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("tenant_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates the length of a format string (parsing is separate).
pub fn validate_format_length(format: &str) -> ValidationResult<()> {
    if format.len() > MAX_FORMAT_LEN {
        return Err(ValidationError::TooLong {
            field: "number_format".to_string(),
            max: MAX_FORMAT_LEN,
        });
    }

    Ok(())
}

/// Validates an operator-supplied sequence value.
///
/// ## Rules
/// - Must be >= 1 ("next number to issue" can never be 0 or negative)
pub fn validate_sequence_value(value: i64) -> ValidationResult<()> {
    if value < 1 {
        return Err(ValidationError::MustBePositive {
            field: "current_sequence".to_string(),
        });
    }

    Ok(())
}

/// Validates a preview count.
///
/// ## Rules
/// - Must be between 1 and 100: a preview of 0 numbers is meaningless and
///   an unbounded count would let one call render arbitrarily much output
pub fn validate_preview_count(count: u32) -> ValidationResult<()> {
    if count < 1 || count as usize > MAX_PREVIEW_COUNT {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: MAX_PREVIEW_COUNT as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Spec Validators
// =============================================================================

/// Validates everything about a creation spec except name uniqueness.
///
/// Runs the template parser, so a scheme with an invalid `number_format`
/// is rejected before anything is written.
pub fn validate_new_scheme(new: &NewScheme) -> CoreResult<()> {
    validate_uuid("tenant_id", &new.tenant_id)?;
    validate_scheme_name(&new.name)?;
    validate_affix("prefix", &new.prefix)?;
    validate_affix("suffix", &new.suffix)?;
    validate_format_length(&new.number_format)?;
    CompiledTemplate::parse(&new.number_format)?;
    Ok(())
}

/// Validates an update spec, including an optional counter override.
pub fn validate_scheme_update(update: &SchemeUpdate) -> CoreResult<()> {
    validate_scheme_name(&update.name)?;
    validate_affix("prefix", &update.prefix)?;
    validate_affix("suffix", &update.suffix)?;
    validate_format_length(&update.number_format)?;
    CompiledTemplate::parse(&update.number_format)?;

    if let Some(value) = update.current_sequence {
        validate_sequence_value(value)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::sequence::ResetFrequency;
    use crate::DEFAULT_TENANT_ID;

    fn new_scheme(format: &str) -> NewScheme {
        NewScheme {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Invoices".to_string(),
            prefix: "INV-".to_string(),
            suffix: String::new(),
            number_format: format.to_string(),
            sequence_reset_frequency: ResetFrequency::Never,
            is_active: true,
            is_default: false,
        }
    }

    #[test]
    fn test_validate_scheme_name() {
        assert!(validate_scheme_name("Invoices 2024").is_ok());
        assert!(validate_scheme_name("").is_err());
        assert!(validate_scheme_name("   ").is_err());
        assert!(validate_scheme_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_affix() {
        assert!(validate_affix("prefix", "INV-").is_ok());
        assert!(validate_affix("prefix", "").is_ok());
        assert!(validate_affix("prefix", "INV{").is_err());
        assert!(validate_affix("suffix", "}X").is_err());
        assert!(validate_affix("prefix", &"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("tenant_id", DEFAULT_TENANT_ID).is_ok());
        assert!(validate_uuid("tenant_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("tenant_id", "").is_err());
        assert!(validate_uuid("tenant_id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_new_scheme_rejects_bad_tenant_id() {
        let mut new = new_scheme("{sequence}");
        new.tenant_id = "garbage".to_string();

        let err = validate_new_scheme(&new).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_validate_sequence_value() {
        assert!(validate_sequence_value(1).is_ok());
        assert!(validate_sequence_value(1000).is_ok());
        assert!(validate_sequence_value(0).is_err());
        assert!(validate_sequence_value(-5).is_err());
    }

    #[test]
    fn test_validate_preview_count() {
        assert!(validate_preview_count(1).is_ok());
        assert!(validate_preview_count(100).is_ok());
        assert!(validate_preview_count(0).is_err());
        assert!(validate_preview_count(101).is_err());
    }

    #[test]
    fn test_validate_new_scheme_rejects_bad_template() {
        let err = validate_new_scheme(&new_scheme("{widget}")).unwrap_err();
        assert!(matches!(err, CoreError::Format(_)));

        assert!(validate_new_scheme(&new_scheme("{prefix}{sequence:04d}")).is_ok());
    }

    #[test]
    fn test_validate_update_rejects_bad_counter() {
        let update = SchemeUpdate {
            name: "Invoices".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            number_format: "{sequence}".to_string(),
            sequence_reset_frequency: ResetFrequency::Never,
            is_active: true,
            is_default: false,
            current_sequence: Some(0),
        };

        let err = validate_scheme_update(&update).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
