//! # Domain Types
//!
//! Core domain types for the invoice numbering engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ NumberingScheme  │   │    NewScheme     │   │   SchemeUpdate   │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id (UUID)       │   │  name            │   │  name            │    │
//! │  │  name (business) │   │  number_format   │   │  number_format   │    │
//! │  │  number_format   │   │  prefix/suffix   │   │  current_sequence│    │
//! │  │  current_sequence│   │  reset frequency │   │  (operator reset)│    │
//! │  │  last_epoch_key  │   └──────────────────┘   └──────────────────┘    │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐                           │
//! │  │   IssuedNumber   │   │   PreviewBatch   │                           │
//! │  │  ──────────────  │   │  ──────────────  │                           │
//! │  │  number: String  │   │  numbers: [Str]  │                           │
//! │  │  sequence: i64   │   │  next_sequence   │                           │
//! │  └──────────────────┘   └──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every scheme has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `name`: human-readable business identifier, unique per tenant

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::sequence::{EpochKey, ResetFrequency, SequenceState};
use crate::template::{CompiledTemplate, RenderContext};
use crate::validation::validate_preview_count;
use crate::DEFAULT_TENANT_ID;

// =============================================================================
// Numbering Scheme
// =============================================================================

/// A named, persisted invoice numbering policy.
///
/// Combines a render template (`prefix`, `suffix`, `number_format`) with the
/// sequence state (`current_sequence`, `last_epoch_key`) and a reset rule.
///
/// ## Invariants
/// - `current_sequence >= 1` and means "next number to issue"
/// - `number_format` always parses (enforced before persisting)
/// - At most one scheme per tenant has `is_default = true`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct NumberingScheme {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this scheme belongs to.
    pub tenant_id: String,

    /// Human-readable name, unique within the tenant.
    pub name: String,

    /// Substituted verbatim for `{prefix}` (may be empty).
    pub prefix: String,

    /// Substituted verbatim for `{suffix}` (may be empty).
    pub suffix: String,

    /// The template string, e.g. `"{prefix}{year}{month:02d}-{sequence:04d}"`.
    pub number_format: String,

    /// The next sequence number to issue. Always >= 1.
    pub current_sequence: i64,

    /// How often the counter returns to 1.
    pub sequence_reset_frequency: ResetFrequency,

    /// Epoch marker of the last issuance; absent until first use.
    /// Managed by the engine, never user-editable.
    #[ts(as = "Option<String>")]
    pub last_epoch_key: Option<EpochKey>,

    /// Inactive schemes reject issuance but stay previewable and editable.
    pub is_active: bool,

    /// Whether this is the tenant's default scheme.
    pub is_default: bool,

    /// When the scheme was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the scheme was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl NumberingScheme {
    /// Returns the scheme's sequence state as a value.
    #[inline]
    pub fn sequence_state(&self) -> SequenceState {
        SequenceState {
            current_sequence: self.current_sequence,
            last_epoch_key: self.last_epoch_key.clone(),
        }
    }

    /// Compiles the scheme's template.
    ///
    /// Persisted schemes always hold a valid format, so this only fails on
    /// a scheme constructed by hand with an unvalidated string.
    pub fn compiled_template(&self) -> CoreResult<CompiledTemplate> {
        Ok(CompiledTemplate::parse(&self.number_format)?)
    }

    /// Computes one issuance at the given instant.
    ///
    /// Pure: returns the rendered number, the raw sequence value, and the
    /// state that must be persisted for the issuance to take effect. The
    /// caller (the repository) owns atomicity of the write-back.
    ///
    /// ## Errors
    /// - [`CoreError::SchemeInactive`] when `is_active` is false
    pub fn issue_at(&self, now: DateTime<Utc>) -> CoreResult<Issuance> {
        if !self.is_active {
            return Err(CoreError::SchemeInactive {
                id: self.id.clone(),
                name: self.name.clone(),
            });
        }

        let template = self.compiled_template()?;
        let date = now.date_naive();
        let advance = self
            .sequence_state()
            .advance(self.sequence_reset_frequency, date);

        let number = template.render(&RenderContext {
            prefix: &self.prefix,
            suffix: &self.suffix,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            sequence: advance.issued,
        });

        Ok(Issuance {
            number,
            sequence: advance.issued,
            next_state: advance.next,
        })
    }

    /// Simulates the next `count` issuances without any state change.
    ///
    /// Allowed on inactive schemes: previewing is harmless.
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] when `count` is out of range
    pub fn preview_at(&self, now: DateTime<Utc>, count: u32) -> CoreResult<PreviewBatch> {
        validate_preview_count(count)?;

        let template = self.compiled_template()?;
        let date = now.date_naive();
        let simulation = self
            .sequence_state()
            .simulate(self.sequence_reset_frequency, date, count);

        let numbers = simulation
            .sequences
            .iter()
            .map(|&sequence| {
                template.render(&RenderContext {
                    prefix: &self.prefix,
                    suffix: &self.suffix,
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                    sequence,
                })
            })
            .collect();

        Ok(PreviewBatch {
            numbers,
            next_sequence: simulation.next_sequence,
        })
    }
}

// =============================================================================
// Issuance Results
// =============================================================================

/// The full outcome of one issuance, including the state to persist.
///
/// Internal to the engine: the repository persists `next_state` and hands
/// callers an [`IssuedNumber`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuance {
    /// The rendered invoice number.
    pub number: String,
    /// The raw sequence value behind it.
    pub sequence: i64,
    /// The sequence state after this issuance.
    pub next_state: SequenceState,
}

/// What callers receive from `issue_next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IssuedNumber {
    /// The rendered invoice number, e.g. `"INV-202403-0001"`.
    pub number: String,
    /// The raw sequence value behind it.
    pub sequence: i64,
}

impl From<Issuance> for IssuedNumber {
    fn from(issuance: Issuance) -> Self {
        IssuedNumber {
            number: issuance.number,
            sequence: issuance.sequence,
        }
    }
}

/// What callers receive from `preview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviewBatch {
    /// The rendered numbers, in issuance order.
    pub numbers: Vec<String>,
    /// The `current_sequence` that would persist after all of them.
    pub next_sequence: i64,
}

// =============================================================================
// Scheme Specs (create / update)
// =============================================================================

fn default_tenant() -> String {
    DEFAULT_TENANT_ID.to_string()
}

fn default_true() -> bool {
    true
}

/// Request payload for creating a scheme.
///
/// The engine initializes `current_sequence = 1` and no epoch key; those
/// are not caller-settable at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewScheme {
    /// Owning tenant (defaults to the single-tenant runtime constant).
    #[serde(default = "default_tenant")]
    pub tenant_id: String,

    /// Scheme name, unique within the tenant.
    pub name: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,

    /// Template string; validated before anything is written.
    pub number_format: String,

    #[serde(default)]
    pub sequence_reset_frequency: ResetFrequency,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_default: bool,
}

/// Request payload for updating a scheme.
///
/// Template/prefix/suffix changes apply to the NEXT issuance; numbers
/// already issued are never renumbered.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SchemeUpdate {
    pub name: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,

    pub number_format: String,

    #[serde(default)]
    pub sequence_reset_frequency: ResetFrequency,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_default: bool,

    /// Operator override for the counter (must be >= 1 when present).
    /// Leaves `last_epoch_key` untouched: the new value takes effect
    /// within the current epoch.
    #[serde(default)]
    pub current_sequence: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scheme() -> NumberingScheme {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        NumberingScheme {
            id: "scheme-1".to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Default Invoices".to_string(),
            prefix: "INV-".to_string(),
            suffix: String::new(),
            number_format: "{prefix}{year}{month:02d}-{sequence:04d}".to_string(),
            current_sequence: 1,
            sequence_reset_frequency: ResetFrequency::Monthly,
            last_epoch_key: None,
            is_active: true,
            is_default: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_issuances_within_month() {
        let mut scheme = scheme();

        let first = scheme.issue_at(at(2024, 3, 15)).unwrap();
        assert_eq!(first.number, "INV-202403-0001");
        assert_eq!(first.sequence, 1);

        scheme.current_sequence = first.next_state.current_sequence;
        scheme.last_epoch_key = first.next_state.last_epoch_key.clone();

        let second = scheme.issue_at(at(2024, 3, 20)).unwrap();
        assert_eq!(second.number, "INV-202403-0002");
        assert_eq!(second.sequence, 2);
    }

    #[test]
    fn test_monthly_reset_produces_fresh_number() {
        let mut scheme = scheme();
        let march = scheme.issue_at(at(2024, 3, 15)).unwrap();
        scheme.current_sequence = march.next_state.current_sequence;
        scheme.last_epoch_key = march.next_state.last_epoch_key;

        let april = scheme.issue_at(at(2024, 4, 1)).unwrap();
        assert_eq!(april.number, "INV-202404-0001");
        assert_eq!(april.sequence, 1);
    }

    #[test]
    fn test_bare_sequence_template() {
        let mut scheme = scheme();
        scheme.number_format = "{sequence}".to_string();
        scheme.sequence_reset_frequency = ResetFrequency::Never;

        let mut numbers = Vec::new();
        for _ in 0..5 {
            let issuance = scheme.issue_at(at(2024, 3, 15)).unwrap();
            numbers.push(issuance.number.clone());
            scheme.current_sequence = issuance.next_state.current_sequence;
            scheme.last_epoch_key = issuance.next_state.last_epoch_key;
        }

        assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_inactive_scheme_rejects_issuance() {
        let mut scheme = scheme();
        scheme.is_active = false;

        let err = scheme.issue_at(at(2024, 3, 15)).unwrap_err();
        assert!(matches!(err, CoreError::SchemeInactive { .. }));
    }

    #[test]
    fn test_inactive_scheme_still_previews() {
        let mut scheme = scheme();
        scheme.is_active = false;

        let preview = scheme.preview_at(at(2024, 3, 15), 2).unwrap();
        assert_eq!(preview.numbers, vec!["INV-202403-0001", "INV-202403-0002"]);
    }

    #[test]
    fn test_preview_matches_future_issuances() {
        let scheme = scheme();

        let preview = scheme.preview_at(at(2024, 3, 15), 3).unwrap();
        assert_eq!(
            preview.numbers,
            vec!["INV-202403-0001", "INV-202403-0002", "INV-202403-0003"]
        );
        assert_eq!(preview.next_sequence, 4);

        // Previewing changed nothing: the real issuance still starts at 1
        let issuance = scheme.issue_at(at(2024, 3, 15)).unwrap();
        assert_eq!(issuance.number, "INV-202403-0001");
    }

    #[test]
    fn test_preview_count_out_of_range() {
        let scheme = scheme();
        assert!(scheme.preview_at(at(2024, 3, 15), 0).is_err());
        assert!(scheme.preview_at(at(2024, 3, 15), 10_000).is_err());
    }

    #[test]
    fn test_issuance_converts_to_dto() {
        let scheme = scheme();
        let issuance = scheme.issue_at(at(2024, 3, 15)).unwrap();
        let dto: IssuedNumber = issuance.clone().into();
        assert_eq!(dto.number, issuance.number);
        assert_eq!(dto.sequence, issuance.sequence);
    }

    #[test]
    fn test_new_scheme_deserializes_with_defaults() {
        let new: NewScheme = serde_json::from_str(
            r#"{"name": "Invoices", "number_format": "{sequence}"}"#,
        )
        .unwrap();

        assert_eq!(new.tenant_id, DEFAULT_TENANT_ID);
        assert_eq!(new.prefix, "");
        assert_eq!(new.sequence_reset_frequency, ResetFrequency::Never);
        assert!(new.is_active);
        assert!(!new.is_default);
    }
}
