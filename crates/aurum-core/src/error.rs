//! # Error Types
//!
//! Domain-specific error types for aurum-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aurum-core errors (this file)                                         │
//! │  ├── FormatError      - number_format template fails to parse          │
//! │  ├── ValidationError  - Scheme field constraint violations             │
//! │  └── CoreError        - General domain errors (wraps the two above)    │
//! │                                                                         │
//! │  aurum-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: FormatError/ValidationError → CoreError → DbError → Caller      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (scheme name, position, etc.)
//! 3. Errors are enum variants, never String
//! 4. FormatError only ever surfaces at create/update time: a scheme is
//!    never persisted with a template that does not parse

use thiserror::Error;

// =============================================================================
// Format Error
// =============================================================================

/// A `number_format` template string failed to parse.
///
/// Positions are byte offsets into the format string, pointing at the
/// opening brace of the offending placeholder (or the stray brace itself).
///
/// ## When This Occurs
/// - Only at scheme create/update time, where formats are validated before
///   anything is written. Issuance and preview operate on already-validated
///   templates and cannot hit this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The format string is empty.
    #[error("number format must not be empty")]
    Empty,

    /// A `{` with no matching `}`.
    #[error("unmatched '{{' at position {position}")]
    UnmatchedOpenBrace { position: usize },

    /// A `}` with no matching `{`.
    #[error("unmatched '}}' at position {position}")]
    UnmatchedCloseBrace { position: usize },

    /// A `{}` or `{:02d}` placeholder with no variable name.
    #[error("empty placeholder at position {position}")]
    EmptyPlaceholder { position: usize },

    /// A placeholder naming a variable outside the recognized set.
    #[error("unknown variable '{name}' at position {position}")]
    UnknownVariable { name: String, position: usize },

    /// A width specifier that is not of the form `0Wd` with W >= 1.
    #[error("invalid width specifier '{spec}' at position {position}: expected '0Wd' with a positive W")]
    InvalidWidth { spec: String, position: usize },

    /// A width specifier on a string variable (prefix/suffix).
    /// Zero-padding is only defined for numeric placeholders.
    #[error("width specifier not allowed on '{name}' at position {position}")]
    WidthNotAllowed { name: String, position: usize },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a scheme spec doesn't meet field-level
/// requirements. Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., braces in a prefix, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate scheme name within a tenant).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Numbering scheme cannot be found.
    ///
    /// ## When This Occurs
    /// - Scheme ID doesn't exist in the store
    /// - Scheme was deleted (hard delete)
    #[error("Numbering scheme not found: {0}")]
    SchemeNotFound(String),

    /// Issuance requested on a deactivated scheme.
    ///
    /// ## When This Occurs
    /// - `issue_next` called with `is_active = false`
    ///
    /// Preview and update remain allowed on inactive schemes; only
    /// issuance is rejected.
    #[error("Numbering scheme '{name}' ({id}) is inactive and cannot issue numbers")]
    SchemeInactive { id: String, name: String },

    /// Template parse error (wraps FormatError).
    #[error("Invalid number format: {0}")]
    Format(#[from] FormatError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_messages() {
        let err = FormatError::UnknownVariable {
            name: "widget".to_string(),
            position: 5,
        };
        assert_eq!(err.to_string(), "unknown variable 'widget' at position 5");

        let err = FormatError::UnmatchedOpenBrace { position: 0 };
        assert_eq!(err.to_string(), "unmatched '{' at position 0");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "name".to_string(),
            value: "Default".to_string(),
        };
        assert_eq!(err.to_string(), "name 'Default' already exists");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let format_err = FormatError::Empty;
        let core_err: CoreError = format_err.into();
        assert!(matches!(core_err, CoreError::Format(_)));

        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
