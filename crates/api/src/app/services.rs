use std::sync::Arc;

use kharcha_store::{InMemoryLedgerStore, LedgerStore};

#[cfg(feature = "postgres")]
use kharcha_store::PostgresLedgerStore;

/// Shared application services handed to every handler.
///
/// The store is an explicitly constructed instance injected here (never
/// ambient global state), so tests get isolation by building a fresh one.
pub struct AppServices {
    pub ledger: Arc<dyn LedgerStore>,
}

impl AppServices {
    /// Process-local store; records live for the process lifetime only.
    pub fn in_memory() -> Self {
        Self {
            ledger: Arc::new(InMemoryLedgerStore::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(store: PostgresLedgerStore) -> Self {
        Self {
            ledger: Arc::new(store),
        }
    }
}

/// Select the backend from the environment.
///
/// With the `postgres` feature enabled and `DATABASE_URL` set, records go
/// to Postgres; otherwise the in-memory store serves (dev/test default).
pub async fn build_services() -> AppServices {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let pool = sqlx::PgPool::connect(&url)
            .await
            .expect("failed to connect to DATABASE_URL");
        let store = PostgresLedgerStore::new(pool);
        store
            .ensure_schema()
            .await
            .expect("failed to prepare expense schema");
        tracing::info!("using postgres ledger store");
        return AppServices::postgres(store);
    }

    tracing::info!("using in-memory ledger store (records are ephemeral)");
    AppServices::in_memory()
}
