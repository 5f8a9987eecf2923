//! Infrastructure layer: ledger store backends.

pub mod ledger_store;

pub use ledger_store::{InMemoryLedgerStore, LedgerStore, StoreError};

#[cfg(feature = "postgres")]
pub use ledger_store::PostgresLedgerStore;
