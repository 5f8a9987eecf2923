//! Postgres-backed ledger store.
//!
//! Durable layout: an `expenses` table keyed by unique id and an
//! `idempotency_keys` index with a foreign key back to the expense it
//! created. The primary-key constraint on the index is the idempotency
//! mechanism: a losing concurrent writer hits the conflict, rolls back its
//! own insert, and returns the winner's record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use kharcha_core::{ExpenseId, IdempotencyKey, Paise};
use kharcha_ledger::{Expense, ExpenseDraft, ExpenseFilter};

use super::r#trait::{LedgerStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id           UUID PRIMARY KEY,
    amount_paise BIGINT NOT NULL CHECK (amount_paise >= 0),
    category     TEXT NOT NULL,
    description  TEXT NOT NULL,
    date         TEXT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS expenses_newest_first
    ON expenses (date DESC, created_at DESC);

CREATE TABLE IF NOT EXISTS idempotency_keys (
    key        TEXT PRIMARY KEY,
    expense_id UUID NOT NULL REFERENCES expenses (id),
    created_at TIMESTAMPTZ NOT NULL
);
"#;

/// Durable ledger store on PostgreSQL.
///
/// ## Thread safety
///
/// `PgPool` is `Send + Sync`; every `record` runs inside one transaction,
/// so readers see either the pre- or post-state of a write, never a record
/// without its key mapping.
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables and index if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_key(&self, key: &IdempotencyKey) -> Result<Option<Expense>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.amount_paise, e.category, e.description, e.date, e.created_at
            FROM idempotency_keys k
            JOIN expenses e ON e.id = k.expense_id
            WHERE k.key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(row_to_expense).transpose()
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn record(
        &self,
        draft: ExpenseDraft,
        key: Option<IdempotencyKey>,
    ) -> Result<Expense, StoreError> {
        let normalized = draft.normalize()?;

        // Fast path: a previously completed keyed write replays directly.
        if let Some(key) = &key {
            if let Some(existing) = self.find_by_key(key).await? {
                tracing::debug!(key = %key, id = %existing.id, "replayed idempotent write");
                return Ok(existing);
            }
        }

        let id = ExpenseId::new();
        let created_at = Utc::now();
        let amount_paise = i64::try_from(normalized.amount.as_minor())
            .map_err(|_| StoreError::internal("amount exceeds storage range"))?;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            INSERT INTO expenses (id, amount_paise, category, description, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.as_uuid())
        .bind(amount_paise)
        .bind(&normalized.category)
        .bind(&normalized.description)
        .bind(&normalized.date)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if let Some(key) = &key {
            let claimed = sqlx::query(
                r#"
                INSERT INTO idempotency_keys (key, expense_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (key) DO NOTHING
                "#,
            )
            .bind(key.as_str())
            .bind(id.as_uuid())
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            if claimed.rows_affected() == 0 {
                // A concurrent writer won the key. Drop our insert and
                // return the record they created.
                tx.rollback().await.map_err(db_err)?;
                return self.find_by_key(key).await?.ok_or_else(|| {
                    StoreError::internal("idempotency key claimed but expense not found")
                });
            }
        }

        tx.commit().await.map_err(db_err)?;

        let expense = normalized.into_expense(id, created_at);
        tracing::debug!(
            id = %expense.id,
            category = %expense.category,
            amount = %expense.amount,
            "recorded expense"
        );
        Ok(expense)
    }

    async fn query(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        let rows = match filter.category_filter() {
            Some(category) => {
                sqlx::query(
                    r#"
                    SELECT id, amount_paise, category, description, date, created_at
                    FROM expenses
                    WHERE category = $1
                    ORDER BY date DESC, created_at DESC
                    "#,
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, amount_paise, category, description, date, created_at
                    FROM expenses
                    ORDER BY date DESC, created_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.into_iter().map(row_to_expense).collect()
    }
}

fn row_to_expense(row: PgRow) -> Result<Expense, StoreError> {
    let id: Uuid = row.try_get("id").map_err(decode_err)?;
    let amount_paise: i64 = row.try_get("amount_paise").map_err(decode_err)?;
    let amount = u64::try_from(amount_paise)
        .map_err(|_| StoreError::internal("negative amount_paise in storage"))?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode_err)?;

    Ok(Expense {
        id: ExpenseId::from_uuid(id),
        amount: Paise::from_minor(amount),
        category: row.try_get("category").map_err(decode_err)?,
        description: row.try_get("description").map_err(decode_err)?,
        date: row.try_get("date").map_err(decode_err)?,
        created_at,
    })
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::unavailable(e.to_string())
}

fn decode_err(e: sqlx::Error) -> StoreError {
    StoreError::internal(e.to_string())
}
