use serde::Deserialize;
use serde_json::json;

use kharcha_ledger::Expense;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /expenses`. Fields are optional so that missing ones can
/// be reported as a 400 with a useful message instead of a bare
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Query string of `GET /expenses`.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

/// Wire shape: `amount` is decimal rupees, `created_at` RFC3339 UTC.
pub fn expense_to_json(expense: &Expense) -> serde_json::Value {
    json!({
        "id": expense.id.to_string(),
        "amount": expense.amount.to_major(),
        "category": expense.category,
        "description": expense.description,
        "date": expense.date,
        "created_at": expense.created_at.to_rfc3339(),
    })
}
