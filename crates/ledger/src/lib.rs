//! Expense ledger domain (append-only expense records).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod expense;

pub use expense::{
    newest_first, Expense, ExpenseDraft, ExpenseFilter, NormalizedDraft, SortOrder,
};
