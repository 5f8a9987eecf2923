//! Append-only expense store boundary.
//!
//! This module defines the storage-facing abstraction for recording and
//! querying expenses without making any storage assumptions: the same
//! contract holds for the in-memory backend and the Postgres backend.

pub mod in_memory;
pub mod r#trait;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerStore, StoreError};

#[cfg(feature = "postgres")]
pub use postgres::PostgresLedgerStore;
