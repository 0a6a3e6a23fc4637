//! # Scheme Repository
//!
//! The numbering scheme registry: CRUD, issuance, and preview.
//!
//! ## Issuance Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      issue_next(id)                                     │
//! │                                                                         │
//! │  1. READ      fetch the scheme row (one consistent snapshot)           │
//! │  2. COMPUTE   aurum-core decides reset-or-increment and renders        │
//! │  3. WRITE     conditional update:                                      │
//! │                 UPDATE ... WHERE id = ?                                │
//! │                   AND current_sequence = <value we read>               │
//! │                   AND last_epoch_key IS <key we read>                  │
//! │  4. CHECK     0 rows affected? A concurrent issuer won the race        │
//! │               → re-read and retry (bounded)                            │
//! │                                                                         │
//! │  The guard makes the read-compute-write cycle atomic without any       │
//! │  process-local mutable state: the same logic is correct whether one    │
//! │  process owns the store or several share it.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Default Scheme Swap
//! Setting `is_default = true` clears the tenant's previous default inside
//! the same transaction that persists the new one, so no reader ever sees
//! two defaults. A partial unique index backs the invariant in the schema.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use aurum_core::{
    validation, CoreError, IssuedNumber, NewScheme, NumberingScheme, PreviewBatch, SchemeUpdate,
    ValidationError,
};

/// Bounded retries for the issuance read-compute-write cycle.
///
/// Conflicts are only possible when another writer updates the same scheme
/// between our read and our conditional write; a handful of retries absorbs
/// realistic contention.
const MAX_ISSUE_RETRIES: u32 = 5;

/// Column list shared by every scheme SELECT.
const SCHEME_COLUMNS: &str = "id, tenant_id, name, prefix, suffix, number_format, \
     current_sequence, sequence_reset_frequency, last_epoch_key, \
     is_active, is_default, created_at, updated_at";

/// Repository for numbering scheme operations (the registry).
///
/// ## Usage
/// ```rust,ignore
/// let repo = SchemeRepository::new(pool);
///
/// let scheme = repo.create(&new_scheme).await?;
/// let issued = repo.issue_next(&scheme.id).await?;
/// let preview = repo.preview(&scheme.id, 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SchemeRepository {
    pool: SqlitePool,
}

impl SchemeRepository {
    /// Creates a new SchemeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SchemeRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a scheme by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(scheme))` - Scheme found
    /// * `Ok(None)` - Scheme not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<NumberingScheme>> {
        let scheme = sqlx::query_as::<_, NumberingScheme>(&format!(
            "SELECT {SCHEME_COLUMNS} FROM numbering_schemes WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(scheme)
    }

    /// Lists all schemes for a tenant, sorted by name.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<NumberingScheme>> {
        let schemes = sqlx::query_as::<_, NumberingScheme>(&format!(
            "SELECT {SCHEME_COLUMNS} FROM numbering_schemes WHERE tenant_id = ?1 ORDER BY name"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(schemes)
    }

    /// Gets the tenant's default scheme, if one is set.
    pub async fn get_default(&self, tenant_id: &str) -> DbResult<Option<NumberingScheme>> {
        let scheme = sqlx::query_as::<_, NumberingScheme>(&format!(
            "SELECT {SCHEME_COLUMNS} FROM numbering_schemes \
             WHERE tenant_id = ?1 AND is_default = 1"
        ))
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(scheme)
    }

    // =========================================================================
    // Create / Update / Delete
    // =========================================================================

    /// Creates a new scheme.
    ///
    /// ## What This Does
    /// 1. Validates the spec (including a template parse - fail fast)
    /// 2. Rejects a duplicate name within the tenant
    /// 3. Initializes `current_sequence = 1`, no epoch key
    /// 4. If `is_default` is requested, clears the previous default in the
    ///    same transaction
    pub async fn create(&self, new: &NewScheme) -> DbResult<NumberingScheme> {
        validation::validate_new_scheme(new)?;

        debug!(name = %new.name, tenant_id = %new.tenant_id, "Creating numbering scheme");

        let now = Utc::now();
        let scheme = NumberingScheme {
            id: Uuid::new_v4().to_string(),
            tenant_id: new.tenant_id.clone(),
            name: new.name.trim().to_string(),
            prefix: new.prefix.clone(),
            suffix: new.suffix.clone(),
            number_format: new.number_format.clone(),
            current_sequence: 1,
            sequence_reset_frequency: new.sequence_reset_frequency,
            last_epoch_key: None,
            is_active: new.is_active,
            is_default: new.is_default,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        ensure_name_free(&mut tx, &scheme.tenant_id, &scheme.name, &scheme.id).await?;

        if scheme.is_default {
            clear_default(&mut tx, &scheme.tenant_id, &scheme.id, now).await?;
        }

        sqlx::query(
            "INSERT INTO numbering_schemes ( \
                 id, tenant_id, name, prefix, suffix, number_format, \
                 current_sequence, sequence_reset_frequency, last_epoch_key, \
                 is_active, is_default, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&scheme.id)
        .bind(&scheme.tenant_id)
        .bind(&scheme.name)
        .bind(&scheme.prefix)
        .bind(&scheme.suffix)
        .bind(&scheme.number_format)
        .bind(scheme.current_sequence)
        .bind(scheme.sequence_reset_frequency)
        .bind(&scheme.last_epoch_key)
        .bind(scheme.is_active)
        .bind(scheme.is_default)
        .bind(scheme.created_at)
        .bind(scheme.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(scheme)
    }

    /// Updates an existing scheme.
    ///
    /// Template, prefix, and suffix changes apply to the NEXT issuance;
    /// nothing already issued is renumbered. An explicit
    /// `current_sequence` in the spec overrides the counter (operator
    /// reset); the epoch key is left untouched.
    pub async fn update(&self, id: &str, update: &SchemeUpdate) -> DbResult<NumberingScheme> {
        validation::validate_scheme_update(update)?;

        debug!(id = %id, "Updating numbering scheme");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let current = fetch_scheme(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::scheme_not_found(id))?;

        let name = update.name.trim().to_string();
        ensure_name_free(&mut tx, &current.tenant_id, &name, id).await?;

        if update.is_default {
            clear_default(&mut tx, &current.tenant_id, id, now).await?;
        }

        let current_sequence = update.current_sequence.unwrap_or(current.current_sequence);

        sqlx::query(
            "UPDATE numbering_schemes SET \
                 name = ?2, \
                 prefix = ?3, \
                 suffix = ?4, \
                 number_format = ?5, \
                 sequence_reset_frequency = ?6, \
                 is_active = ?7, \
                 is_default = ?8, \
                 current_sequence = ?9, \
                 updated_at = ?10 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&name)
        .bind(&update.prefix)
        .bind(&update.suffix)
        .bind(&update.number_format)
        .bind(update.sequence_reset_frequency)
        .bind(update.is_active)
        .bind(update.is_default)
        .bind(current_sequence)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let updated = fetch_scheme(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::scheme_not_found(id))?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Hard-deletes a scheme.
    ///
    /// ## Errors
    /// - Scheme-not-found when the ID doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting numbering scheme");

        let result = sqlx::query("DELETE FROM numbering_schemes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::scheme_not_found(id));
        }

        Ok(())
    }

    // =========================================================================
    // Issuance & Preview
    // =========================================================================

    /// Issues the next invoice number for a scheme.
    ///
    /// Captures "now" exactly once and delegates to [`issue_next_at`].
    ///
    /// [`issue_next_at`]: SchemeRepository::issue_next_at
    pub async fn issue_next(&self, id: &str) -> DbResult<IssuedNumber> {
        self.issue_next_at(id, Utc::now()).await
    }

    /// Issues the next invoice number as of a given instant.
    ///
    /// Public for deterministic tests and backdated imports; regular
    /// callers use [`issue_next`](SchemeRepository::issue_next).
    ///
    /// ## Concurrency
    /// The counter is never mutated in place: we read the stored state,
    /// let aurum-core compute the successor, and write it back only if the
    /// stored state still matches what we read. Losing that race means a
    /// concurrent issuer got the number first; we re-read and retry up to
    /// [`MAX_ISSUE_RETRIES`] times. No two callers can ever receive the
    /// same rendered number, and no value is skipped except across a
    /// legitimate epoch reset.
    ///
    /// ## Errors
    /// - Scheme-not-found, scheme-inactive (domain errors, not retried)
    /// - [`DbError::Conflict`] after retry exhaustion
    pub async fn issue_next_at(&self, id: &str, now: DateTime<Utc>) -> DbResult<IssuedNumber> {
        for attempt in 1..=MAX_ISSUE_RETRIES {
            let mut tx = self.pool.begin().await?;

            let scheme = fetch_scheme(&mut tx, id)
                .await?
                .ok_or_else(|| DbError::scheme_not_found(id))?;

            // Domain errors (inactive scheme) abort immediately - retrying
            // cannot fix them
            let issuance = scheme.issue_at(now)?;

            let result = sqlx::query(
                "UPDATE numbering_schemes SET \
                     current_sequence = ?2, \
                     last_epoch_key = ?3, \
                     updated_at = ?4 \
                 WHERE id = ?1 \
                   AND current_sequence = ?5 \
                   AND last_epoch_key IS ?6",
            )
            .bind(id)
            .bind(issuance.next_state.current_sequence)
            .bind(&issuance.next_state.last_epoch_key)
            .bind(now)
            .bind(scheme.current_sequence)
            .bind(&scheme.last_epoch_key)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 1 {
                tx.commit().await?;
                debug!(
                    id = %id,
                    sequence = issuance.sequence,
                    number = %issuance.number,
                    "Issued invoice number"
                );
                return Ok(issuance.into());
            }

            // A concurrent issuer updated the row between our read and our
            // conditional write; roll back and retry from a fresh read
            drop(tx);
            debug!(id = %id, attempt, "Issuance write conflicted, retrying");
        }

        Err(DbError::Conflict {
            attempts: MAX_ISSUE_RETRIES,
        })
    }

    /// Previews the next `count` numbers without issuing anything.
    pub async fn preview(&self, id: &str, count: u32) -> DbResult<PreviewBatch> {
        self.preview_at(id, Utc::now(), count).await
    }

    /// Previews as of a given instant.
    ///
    /// Read-only: one consistent row snapshot, no writes, safe to run
    /// concurrently with issuance. Allowed on inactive schemes.
    pub async fn preview_at(
        &self,
        id: &str,
        now: DateTime<Utc>,
        count: u32,
    ) -> DbResult<PreviewBatch> {
        let scheme = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::scheme_not_found(id))?;

        Ok(scheme.preview_at(now, count)?)
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

/// Fetches a scheme row on the given connection (inside a transaction).
async fn fetch_scheme(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<NumberingScheme>> {
    let scheme = sqlx::query_as::<_, NumberingScheme>(&format!(
        "SELECT {SCHEME_COLUMNS} FROM numbering_schemes WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(scheme)
}

/// Rejects a (tenant, name) pair already used by another scheme.
///
/// Friendlier than waiting for the UNIQUE index: callers get a typed
/// duplicate-name validation error instead of a raw constraint message.
async fn ensure_name_free(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    name: &str,
    except_id: &str,
) -> DbResult<()> {
    let clash: Option<String> = sqlx::query_scalar(
        "SELECT id FROM numbering_schemes \
         WHERE tenant_id = ?1 AND name = ?2 AND id <> ?3",
    )
    .bind(tenant_id)
    .bind(name)
    .bind(except_id)
    .fetch_optional(conn)
    .await?;

    if clash.is_some() {
        return Err(CoreError::from(ValidationError::Duplicate {
            field: "name".to_string(),
            value: name.to_string(),
        })
        .into());
    }

    Ok(())
}

/// Clears the tenant's current default scheme (if any) other than `except_id`.
///
/// Must run in the same transaction that sets the new default so there is
/// no window where two schemes both read as default.
async fn clear_default(
    conn: &mut SqliteConnection,
    tenant_id: &str,
    except_id: &str,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        "UPDATE numbering_schemes SET is_default = 0, updated_at = ?3 \
         WHERE tenant_id = ?1 AND is_default = 1 AND id <> ?2",
    )
    .bind(tenant_id)
    .bind(except_id)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use aurum_core::{CoreError, ResetFrequency, DEFAULT_TENANT_ID};
    use chrono::TimeZone;
    use std::collections::HashSet;

    async fn repo() -> SchemeRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.schemes()
    }

    fn monthly_invoices() -> NewScheme {
        NewScheme {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            name: "Monthly Invoices".to_string(),
            prefix: "INV-".to_string(),
            suffix: String::new(),
            number_format: "{prefix}{year}{month:02d}-{sequence:04d}".to_string(),
            sequence_reset_frequency: ResetFrequency::Monthly,
            is_active: true,
            is_default: false,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_initializes_sequence_state() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        assert_eq!(scheme.current_sequence, 1);
        assert!(scheme.last_epoch_key.is_none());

        let stored = repo.get_by_id(&scheme.id).await.unwrap().unwrap();
        assert_eq!(stored.current_sequence, 1);
        assert!(stored.last_epoch_key.is_none());
        assert_eq!(stored.name, "Monthly Invoices");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_template() {
        let repo = repo().await;
        let mut new = monthly_invoices();
        new.number_format = "{widget}".to_string();

        let err = repo.create(&new).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Format(_))));

        // Nothing was written
        assert!(repo.list(DEFAULT_TENANT_ID).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let repo = repo().await;
        repo.create(&monthly_invoices()).await.unwrap();

        let err = repo.create(&monthly_invoices()).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_default_swap_is_exclusive() {
        let repo = repo().await;

        let mut a = monthly_invoices();
        a.name = "Scheme A".to_string();
        a.is_default = true;
        let a = repo.create(&a).await.unwrap();

        let mut b = monthly_invoices();
        b.name = "Scheme B".to_string();
        b.is_default = true;
        let b = repo.create(&b).await.unwrap();

        // B is now the default; A was atomically demoted
        let default = repo.get_default(DEFAULT_TENANT_ID).await.unwrap().unwrap();
        assert_eq!(default.id, b.id);

        let a = repo.get_by_id(&a.id).await.unwrap().unwrap();
        assert!(!a.is_default);
    }

    #[tokio::test]
    async fn test_issue_and_monthly_reset() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        let first = repo.issue_next_at(&scheme.id, at(2024, 3, 15)).await.unwrap();
        assert_eq!(first.number, "INV-202403-0001");
        assert_eq!(first.sequence, 1);

        let second = repo.issue_next_at(&scheme.id, at(2024, 3, 20)).await.unwrap();
        assert_eq!(second.number, "INV-202403-0002");

        // April: the monthly boundary fires and the counter restarts
        let april = repo.issue_next_at(&scheme.id, at(2024, 4, 1)).await.unwrap();
        assert_eq!(april.number, "INV-202404-0001");
        assert_eq!(april.sequence, 1);

        let stored = repo.get_by_id(&scheme.id).await.unwrap().unwrap();
        assert_eq!(stored.current_sequence, 2);
        assert_eq!(stored.last_epoch_key.unwrap().as_str(), "2024-04");
    }

    #[tokio::test]
    async fn test_never_reset_is_gapless() {
        let repo = repo().await;
        let mut new = monthly_invoices();
        new.name = "Plain".to_string();
        new.number_format = "{sequence}".to_string();
        new.sequence_reset_frequency = ResetFrequency::Never;
        let scheme = repo.create(&new).await.unwrap();

        let mut numbers = Vec::new();
        for day in 1..=5 {
            let issued = repo.issue_next_at(&scheme.id, at(2024, 3, day)).await.unwrap();
            numbers.push(issued.number);
        }

        assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_preview_is_pure() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        // Preview any number of times...
        for _ in 0..3 {
            let preview = repo.preview_at(&scheme.id, at(2024, 3, 15), 3).await.unwrap();
            assert_eq!(
                preview.numbers,
                vec!["INV-202403-0001", "INV-202403-0002", "INV-202403-0003"]
            );
            assert_eq!(preview.next_sequence, 4);
        }

        // ...the real issuance is unaffected
        let issued = repo.issue_next_at(&scheme.id, at(2024, 3, 15)).await.unwrap();
        assert_eq!(issued.number, "INV-202403-0001");
    }

    #[tokio::test]
    async fn test_inactive_scheme_rejects_issuance_allows_preview() {
        let repo = repo().await;
        let mut new = monthly_invoices();
        new.is_active = false;
        let scheme = repo.create(&new).await.unwrap();

        let err = repo.issue_next_at(&scheme.id, at(2024, 3, 15)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::SchemeInactive { .. })
        ));

        let preview = repo.preview_at(&scheme.id, at(2024, 3, 15), 1).await.unwrap();
        assert_eq!(preview.numbers, vec!["INV-202403-0001"]);
    }

    #[tokio::test]
    async fn test_missing_scheme_errors() {
        let repo = repo().await;

        let err = repo.issue_next("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SchemeNotFound(_))));

        let err = repo.preview("no-such-id", 3).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SchemeNotFound(_))));

        let err = repo.delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SchemeNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_scheme() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        repo.delete(&scheme.id).await.unwrap();
        assert!(repo.get_by_id(&scheme.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_applies_to_next_issuance() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        let first = repo.issue_next_at(&scheme.id, at(2024, 3, 15)).await.unwrap();
        assert_eq!(first.number, "INV-202403-0001");

        // Re-template the scheme; already-issued numbers stay as they were
        let update = SchemeUpdate {
            name: "Monthly Invoices".to_string(),
            prefix: "JWL/".to_string(),
            suffix: String::new(),
            number_format: "{prefix}{sequence:03d}".to_string(),
            sequence_reset_frequency: ResetFrequency::Monthly,
            is_active: true,
            is_default: false,
            current_sequence: None,
        };
        repo.update(&scheme.id, &update).await.unwrap();

        let second = repo.issue_next_at(&scheme.id, at(2024, 3, 16)).await.unwrap();
        assert_eq!(second.number, "JWL/002");
    }

    #[tokio::test]
    async fn test_update_operator_sequence_reset() {
        let repo = repo().await;
        let scheme = repo.create(&monthly_invoices()).await.unwrap();

        // Establish the March epoch
        repo.issue_next_at(&scheme.id, at(2024, 3, 15)).await.unwrap();

        // Operator jumps the counter within the current epoch
        let update = SchemeUpdate {
            name: "Monthly Invoices".to_string(),
            prefix: "INV-".to_string(),
            suffix: String::new(),
            number_format: "{prefix}{year}{month:02d}-{sequence:04d}".to_string(),
            sequence_reset_frequency: ResetFrequency::Monthly,
            is_active: true,
            is_default: false,
            current_sequence: Some(100),
        };
        repo.update(&scheme.id, &update).await.unwrap();

        let issued = repo.issue_next_at(&scheme.id, at(2024, 3, 20)).await.unwrap();
        assert_eq!(issued.number, "INV-202403-0100");
        assert_eq!(issued.sequence, 100);
    }

    #[tokio::test]
    async fn test_update_missing_scheme() {
        let repo = repo().await;
        let update = SchemeUpdate {
            name: "Ghost".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            number_format: "{sequence}".to_string(),
            sequence_reset_frequency: ResetFrequency::Never,
            is_active: true,
            is_default: false,
            current_sequence: None,
        };

        let err = repo.update("no-such-id", &update).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SchemeNotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_issuance_yields_distinct_numbers() {
        let repo = repo().await;
        let mut new = monthly_invoices();
        new.name = "Contended".to_string();
        new.number_format = "{sequence:04d}".to_string();
        new.sequence_reset_frequency = ResetFrequency::Never;
        let scheme = repo.create(&new).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let repo = repo.clone();
            let id = scheme.id.clone();
            handles.push(tokio::spawn(async move {
                let mut numbers = Vec::new();
                for _ in 0..5 {
                    numbers.push(repo.issue_next(&id).await.unwrap().number);
                }
                numbers
            }));
        }

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }

        // 20 issuances, 20 distinct numbers, no gaps
        let distinct: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(all.len(), 20);
        assert_eq!(distinct.len(), 20);
        for sequence in 1..=20 {
            assert!(distinct.contains(&format!("{:04}", sequence)));
        }
    }
}
