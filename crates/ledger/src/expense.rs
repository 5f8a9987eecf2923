use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kharcha_core::{DomainError, DomainResult, ExpenseId, Paise};

/// A recorded expense (immutable once created).
///
/// `created_at` is assigned by the store and is monotonically non-decreasing
/// per store instance. It is an ordering tie-breaker only, never
/// authoritative event time; the caller-supplied `date` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Amount in paise. The wire carries decimal rupees; conversion happens
    /// at the edges, never in storage.
    pub amount: Paise,
    pub category: String,
    pub description: String,
    /// `YYYY-MM-DD`, caller-supplied. Not validated against the calendar;
    /// lexicographic order on this form is chronological order.
    pub date: String,
    pub created_at: DateTime<Utc>,
}

/// Raw write input as it arrives from the gateway: rupees and untrimmed
/// strings. `normalize` turns it into something the store may persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// Major units (rupees), to be converted to paise.
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
}

/// A draft that has passed normalization: amount in paise, strings trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDraft {
    pub amount: Paise,
    pub category: String,
    pub description: String,
    pub date: String,
}

impl ExpenseDraft {
    /// Trim the string fields and convert the amount to paise
    /// (nearest paisa, ties away from zero).
    ///
    /// Rejects a blank category and unsafe numeric input. The gateway
    /// validates earlier with friendlier messages; this is the last line
    /// before persistence and must never panic.
    pub fn normalize(self) -> DomainResult<NormalizedDraft> {
        let amount = Paise::from_major(self.amount)?;
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation("category must not be empty"));
        }
        Ok(NormalizedDraft {
            amount,
            category,
            description: self.description.trim().to_string(),
            date: self.date.trim().to_string(),
        })
    }
}

impl NormalizedDraft {
    /// Materialize the record the store will persist.
    pub fn into_expense(self, id: ExpenseId, created_at: DateTime<Utc>) -> Expense {
        Expense {
            id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            date: self.date,
            created_at,
        }
    }
}

/// Supported orderings for `query`. There is exactly one today.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest date first, most recently created first among same-day records.
    #[default]
    DateDesc,
}

impl SortOrder {
    /// Parse a wire-level sort parameter. `date_desc` is the only
    /// recognized value; anything else falls back silently to the default
    /// rather than erroring.
    pub fn from_param(_param: Option<&str>) -> Self {
        SortOrder::DateDesc
    }
}

/// Read-side filter for `query`. The zero value selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Exact-match category filter; blank or absent means no filter.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl ExpenseFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// The effective category filter, trimmed; `None` when blank/absent.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        match self.category_filter() {
            Some(c) => expense.category == c,
            None => true,
        }
    }
}

/// `date` descending (lexicographic is chronological for `YYYY-MM-DD`),
/// ties broken by `created_at` descending. Every backend sorts query
/// results with this one comparator so orderings cannot diverge.
pub fn newest_first(a: &Expense, b: &Expense) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
