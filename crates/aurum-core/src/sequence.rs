//! # Sequence Module
//!
//! The per-scheme sequence state machine: decides whether an issuance
//! resets or increments the counter, based on epoch boundaries.
//!
//! ## Epoch Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RESET FREQUENCY      EPOCH KEY FOR 2024-03-15     RESETS WHEN          │
//! │  ───────────────      ────────────────────────     ──────────           │
//! │  Never                "*"                          never                │
//! │  Yearly               "2024"                       the year changes     │
//! │  Monthly              "2024-03"                    the month changes    │
//! │  Daily                "2024-03-15"                 the day changes      │
//! │                                                                         │
//! │  A reset fires exactly when the key computed from "now" differs from    │
//! │  the stored key of the last issuance (or no issuance happened yet).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! Transitions here are value-to-value: `(state, frequency, date)` in,
//! `(issued number, next state)` out. Nothing is persisted and no clock is
//! read. Atomicity against concurrent issuers is the repository's job,
//! which writes the next state back with a conditional update.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Reset Frequency
// =============================================================================

/// How often a scheme's sequence counter returns to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ResetFrequency {
    /// The counter never resets.
    Never,
    /// The counter resets on January 1st.
    Yearly,
    /// The counter resets on the 1st of each month.
    Monthly,
    /// The counter resets every day.
    Daily,
}

impl Default for ResetFrequency {
    fn default() -> Self {
        ResetFrequency::Never
    }
}

// =============================================================================
// Epoch Key
// =============================================================================

/// A marker derived from `(reset_frequency, date)` that changes exactly
/// when a sequence reset should occur.
///
/// Persisted as TEXT alongside the counter; compared on every issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct EpochKey(String);

impl EpochKey {
    /// Computes the epoch key for a date under a reset frequency.
    pub fn for_date(frequency: ResetFrequency, date: NaiveDate) -> Self {
        let key = match frequency {
            // Constant key: a date-derived key can never equal it, so the
            // only "reset" a Never scheme sees is its very first issuance
            ResetFrequency::Never => "*".to_string(),
            ResetFrequency::Yearly => format!("{:04}", date.year()),
            ResetFrequency::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            ResetFrequency::Daily => {
                format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
            }
        };
        EpochKey(key)
    }

    /// Wraps a stored key read back from persistence.
    pub fn from_stored(key: impl Into<String>) -> Self {
        EpochKey(key.into())
    }

    /// The stored representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Sequence State
// =============================================================================

/// The mutable state of one scheme's counter.
///
/// `current_sequence` is the NEXT number to issue, not the last one
/// issued: a freshly created scheme holds `(1, None)` and issues 1 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    /// The next number to issue within the current epoch. Always >= 1.
    pub current_sequence: i64,

    /// Epoch key of the last issuance; `None` until the scheme has issued
    /// at least once.
    pub last_epoch_key: Option<EpochKey>,
}

/// The outcome of one issuance transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// The raw sequence number to issue.
    pub issued: i64,
    /// The state to persist after issuing.
    pub next: SequenceState,
}

/// The outcome of a read-only preview simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// The raw sequence numbers that would be issued, in order.
    pub sequences: Vec<i64>,
    /// The `current_sequence` that would persist after all of them.
    pub next_sequence: i64,
}

impl SequenceState {
    /// State of a freshly created scheme: next number 1, no epoch yet.
    pub fn new() -> Self {
        SequenceState {
            current_sequence: 1,
            last_epoch_key: None,
        }
    }

    /// Computes one issuance transition.
    ///
    /// ## Transition Rules
    /// ```text
    /// key = EpochKey(frequency, date)
    ///
    /// last_epoch_key absent or != key  =>  RESET:     issue 1,
    ///                                                 next = (2, Some(key))
    /// last_epoch_key matches key       =>  INCREMENT: issue current_sequence,
    ///                                                 next = (current + 1, key)
    /// ```
    pub fn advance(&self, frequency: ResetFrequency, date: NaiveDate) -> Advance {
        let key = EpochKey::for_date(frequency, date);

        if self.last_epoch_key.as_ref() != Some(&key) {
            // New epoch (or first ever issuance): the counter restarts
            Advance {
                issued: 1,
                next: SequenceState {
                    current_sequence: 2,
                    last_epoch_key: Some(key),
                },
            }
        } else {
            Advance {
                issued: self.current_sequence,
                next: SequenceState {
                    current_sequence: self.current_sequence + 1,
                    last_epoch_key: self.last_epoch_key.clone(),
                },
            }
        }
    }

    /// Simulates `count` consecutive issuances without persisting anything.
    ///
    /// All simulated issuances share the same `date`, so only the first one
    /// can cross an epoch boundary; the rest increment within that epoch.
    pub fn simulate(&self, frequency: ResetFrequency, date: NaiveDate, count: u32) -> Simulation {
        let mut state = self.clone();
        let mut sequences = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let advance = state.advance(frequency, date);
            sequences.push(advance.issued);
            state = advance.next;
        }

        Simulation {
            sequences,
            next_sequence: state.current_sequence,
        }
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        SequenceState::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_key_formats() {
        let d = date(2024, 3, 15);
        assert_eq!(EpochKey::for_date(ResetFrequency::Never, d).as_str(), "*");
        assert_eq!(EpochKey::for_date(ResetFrequency::Yearly, d).as_str(), "2024");
        assert_eq!(
            EpochKey::for_date(ResetFrequency::Monthly, d).as_str(),
            "2024-03"
        );
        assert_eq!(
            EpochKey::for_date(ResetFrequency::Daily, d).as_str(),
            "2024-03-15"
        );
    }

    #[test]
    fn test_first_issuance_starts_at_one() {
        // current_sequence is "next to issue": a fresh scheme issues 1
        let state = SequenceState::new();
        let advance = state.advance(ResetFrequency::Never, date(2024, 3, 15));

        assert_eq!(advance.issued, 1);
        assert_eq!(advance.next.current_sequence, 2);
        assert!(advance.next.last_epoch_key.is_some());
    }

    #[test]
    fn test_never_reset_is_monotonic() {
        let mut state = SequenceState::new();
        let mut issued = Vec::new();

        for day in 1..=5 {
            // Dates move but a Never scheme ignores them
            let advance = state.advance(ResetFrequency::Never, date(2024, 3, day));
            issued.push(advance.issued);
            state = advance.next;
        }

        assert_eq!(issued, vec![1, 2, 3, 4, 5]);
        assert_eq!(state.current_sequence, 6);
    }

    #[test]
    fn test_monthly_reset_on_boundary() {
        let mut state = SequenceState::new();

        // Two issuances in March
        let first = state.advance(ResetFrequency::Monthly, date(2024, 3, 15));
        state = first.next;
        let second = state.advance(ResetFrequency::Monthly, date(2024, 3, 20));
        state = second.next;
        assert_eq!((first.issued, second.issued), (1, 2));

        // April: the boundary fires and the counter restarts at 1
        let april = state.advance(ResetFrequency::Monthly, date(2024, 4, 1));
        assert_eq!(april.issued, 1);
        assert_eq!(april.next.current_sequence, 2);
        assert_eq!(april.next.last_epoch_key.unwrap().as_str(), "2024-04");
    }

    #[test]
    fn test_yearly_reset_ignores_month_changes() {
        let mut state = SequenceState::new();

        let a = state.advance(ResetFrequency::Yearly, date(2024, 3, 15));
        state = a.next;
        let b = state.advance(ResetFrequency::Yearly, date(2024, 11, 2));
        state = b.next;
        assert_eq!((a.issued, b.issued), (1, 2));

        let c = state.advance(ResetFrequency::Yearly, date(2025, 1, 1));
        assert_eq!(c.issued, 1);
    }

    #[test]
    fn test_daily_reset_every_day() {
        let mut state = SequenceState::new();

        let a = state.advance(ResetFrequency::Daily, date(2024, 3, 15));
        state = a.next;
        let b = state.advance(ResetFrequency::Daily, date(2024, 3, 15));
        state = b.next;
        let c = state.advance(ResetFrequency::Daily, date(2024, 3, 16));

        assert_eq!((a.issued, b.issued, c.issued), (1, 2, 1));
    }

    #[test]
    fn test_same_epoch_keeps_key_untouched() {
        let state = SequenceState {
            current_sequence: 7,
            last_epoch_key: Some(EpochKey::from_stored("2024-03")),
        };

        let advance = state.advance(ResetFrequency::Monthly, date(2024, 3, 31));
        assert_eq!(advance.issued, 7);
        assert_eq!(advance.next.current_sequence, 8);
        assert_eq!(advance.next.last_epoch_key.unwrap().as_str(), "2024-03");
    }

    #[test]
    fn test_simulate_does_not_mutate() {
        let state = SequenceState::new();
        let simulation = state.simulate(ResetFrequency::Monthly, date(2024, 3, 15), 3);

        assert_eq!(simulation.sequences, vec![1, 2, 3]);
        assert_eq!(simulation.next_sequence, 4);

        // The input state is untouched
        assert_eq!(state, SequenceState::new());
    }

    #[test]
    fn test_simulate_crosses_boundary_on_first_issuance() {
        // State left over from March; preview happens in April
        let state = SequenceState {
            current_sequence: 9,
            last_epoch_key: Some(EpochKey::from_stored("2024-03")),
        };

        let simulation = state.simulate(ResetFrequency::Monthly, date(2024, 4, 2), 3);
        assert_eq!(simulation.sequences, vec![1, 2, 3]);
        assert_eq!(simulation.next_sequence, 4);
    }

    #[test]
    fn test_simulate_zero_count() {
        let state = SequenceState {
            current_sequence: 5,
            last_epoch_key: Some(EpochKey::from_stored("*")),
        };

        let simulation = state.simulate(ResetFrequency::Never, date(2024, 1, 1), 0);
        assert!(simulation.sequences.is_empty());
        assert_eq!(simulation.next_sequence, 5);
    }
}
