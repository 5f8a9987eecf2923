use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use kharcha_core::{DomainError, IdempotencyKey};
use kharcha_ledger::{Expense, ExpenseDraft, ExpenseFilter};

/// Ledger store operation error.
///
/// These are **infrastructure errors** (storage availability, internal state)
/// plus the defensive normalization failure the store performs on its own
/// input. A duplicate idempotency key is deliberately *not* represented
/// here: replaying a key is the success path, not a conflict.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed normalization (bad amount, blank category). The gateway
    /// validates first with friendlier messages; this is the safety net.
    #[error("invalid expense input: {0}")]
    Invalid(#[from] DomainError),

    /// The backing storage is unreachable or timed out. Retryable; no
    /// partial write is left behind.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store's own state is broken (poisoned lock, undecodable row).
    #[error("internal storage fault: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Append-only expense store with exactly-once-per-key write semantics.
///
/// ## Write semantics
///
/// `record()`:
/// - normalizes the draft (trim, rupees -> paise) and rejects unsafe input
/// - if `key` already maps to an expense, returns that expense **unchanged**;
///   the new draft is discarded entirely and no mapping is altered
/// - otherwise persists a fresh record (and the key mapping, if keyed)
///   atomically: a concurrent caller with the same key can never observe
///   record-without-mapping or mapping-without-record, and one key can never
///   yield two records
///
/// ## Read semantics
///
/// `query()`:
/// - exact-match category filter (blank/absent means everything)
/// - ordered newest-date-first, same-day ties by creation time descending
/// - an empty match is an empty vector, never an error
/// - side-effect free; reads see either the pre- or post-state of any
///   write, never a half-written record
///
/// ## Implementation requirements
///
/// Implementations must serialize the check-then-act sequence in `record`
/// per key (a coarse store-wide lock is acceptable at this write volume, as
/// is a unique constraint on the key index) and must keep the record set
/// append-only: no update, no delete.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Record an expense, idempotently when `key` is supplied.
    async fn record(
        &self,
        draft: ExpenseDraft,
        key: Option<IdempotencyKey>,
    ) -> Result<Expense, StoreError>;

    /// List expenses matching `filter`, newest first.
    async fn query(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn record(
        &self,
        draft: ExpenseDraft,
        key: Option<IdempotencyKey>,
    ) -> Result<Expense, StoreError> {
        (**self).record(draft, key).await
    }

    async fn query(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        (**self).query(filter).await
    }
}
