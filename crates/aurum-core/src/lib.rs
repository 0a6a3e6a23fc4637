//! # aurum-core: Pure Business Logic for Aurum Billing
//!
//! This crate is the **heart** of Aurum Billing's invoice numbering engine.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Aurum Billing Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Callers (API server / desktop app)                │   │
//! │  │    create_scheme, issue_next, preview, set_default, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aurum-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ template  │  │ sequence  │  │ validation│  │   │
//! │  │   │  Scheme   │  │  Parser   │  │ EpochKey  │  │   rules   │  │   │
//! │  │   │  Specs    │  │ Renderer  │  │  State    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    aurum-db (Database Layer)                    │   │
//! │  │        SQLite scheme store, conditional issuance writes         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (NumberingScheme, specs, issuance results)
//! - [`template`] - Format string parser and renderer
//! - [`sequence`] - Epoch keys and the sequence state machine
//! - [`error`] - Domain error types
//! - [`validation`] - Scheme spec validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Compiled Templates**: Formats parse once into tagged tokens, never
//!    regex-substituted at render time
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use aurum_core::template::{CompiledTemplate, RenderContext};
//! use aurum_core::sequence::{ResetFrequency, SequenceState};
//! use chrono::NaiveDate;
//!
//! // Compile once at scheme create/update time
//! let template = CompiledTemplate::parse("{prefix}{year}{month:02d}-{sequence:04d}").unwrap();
//!
//! // Advance the counter for one issuance
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let advance = SequenceState::new().advance(ResetFrequency::Monthly, date);
//! assert_eq!(advance.issued, 1);
//!
//! // Render the final number
//! let number = template.render(&RenderContext {
//!     prefix: "INV-",
//!     suffix: "",
//!     year: 2024,
//!     month: 3,
//!     day: 15,
//!     sequence: advance.issued,
//! });
//! assert_eq!(number, "INV-202403-0001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod sequence;
pub mod template;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use aurum_core::NumberingScheme` instead of
// `use aurum_core::types::NumberingScheme`

pub use error::{CoreError, CoreResult, FormatError, ValidationError};
pub use sequence::{EpochKey, ResetFrequency, SequenceState};
pub use template::{CompiledTemplate, RenderContext};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for v0.1 (single-tenant runtime with multi-tenant schema)
///
/// ## Why a constant?
/// v0.1 is single-tenant, but the scheme store is keyed by tenant_id for
/// future multi-tenancy. This constant is used throughout the codebase and
/// will be replaced with dynamic tenant resolution later.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum length of a scheme name.
pub const MAX_SCHEME_NAME_LEN: usize = 100;

/// Maximum length of a prefix or suffix.
pub const MAX_AFFIX_LEN: usize = 50;

/// Maximum length of a number format string.
pub const MAX_FORMAT_LEN: usize = 200;

/// Maximum numbers a single preview call may simulate.
///
/// ## Business Reason
/// Previews are for "what will my invoices look like" screens; a handful
/// of numbers is plenty, and a bound keeps one call from rendering
/// arbitrarily much output.
pub const MAX_PREVIEW_COUNT: usize = 100;
