use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use kharcha_core::{ExpenseId, IdempotencyKey};
use kharcha_ledger::{newest_first, Expense, ExpenseDraft, ExpenseFilter};

use super::r#trait::{LedgerStore, StoreError};

#[derive(Debug, Default)]
struct State {
    expenses: Vec<Expense>,
    by_key: HashMap<IdempotencyKey, ExpenseId>,
    last_created_at: Option<DateTime<Utc>>,
}

impl State {
    /// Next `created_at` stamp, strictly after the previous one so that
    /// same-day tie-breaks stay deterministic even on a coarse clock.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_created_at {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_created_at = Some(now);
        now
    }

    fn find(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }
}

/// In-memory append-only ledger store.
///
/// The single `RwLock` is the mutual-exclusion discipline: the write lock
/// covers the whole check-then-act sequence in `record`, so two concurrent
/// writes with the same key serialize and exactly one creates the record.
/// Reads share the read lock and never block each other.
///
/// Data lives for the process lifetime only. Intended for tests, dev, and
/// deployments that accept ephemeral records.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: RwLock<State>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn record(
        &self,
        draft: ExpenseDraft,
        key: Option<IdempotencyKey>,
    ) -> Result<Expense, StoreError> {
        let normalized = draft.normalize()?;

        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::internal("lock poisoned"))?;

        if let Some(key) = &key {
            if let Some(id) = state.by_key.get(key).copied() {
                // Replay: the original record wins verbatim; the new draft
                // is discarded without comparison.
                let existing = state.find(id).cloned().ok_or_else(|| {
                    StoreError::internal("idempotency mapping points at a missing expense")
                })?;
                tracing::debug!(key = %key, id = %existing.id, "replayed idempotent write");
                return Ok(existing);
            }
        }

        let id = ExpenseId::new();
        let created_at = state.next_created_at();
        let expense = normalized.into_expense(id, created_at);

        // Record and mapping land under the same write lock, so no caller
        // can see one without the other.
        state.expenses.push(expense.clone());
        if let Some(key) = key {
            state.by_key.insert(key, id);
        }

        tracing::debug!(
            id = %expense.id,
            category = %expense.category,
            amount = %expense.amount,
            "recorded expense"
        );
        Ok(expense)
    }

    async fn query(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::internal("lock poisoned"))?;

        let mut matched: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        matched.sort_by(newest_first);
        Ok(matched)
    }
}
