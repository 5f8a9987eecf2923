use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use kharcha_core::IdempotencyKey;
use kharcha_ledger::{ExpenseDraft, ExpenseFilter, SortOrder};
use kharcha_store::LedgerStore;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

pub fn router() -> Router {
    Router::new().route("/", post(create_expense).get(list_expenses))
}

pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CreateExpenseRequest>,
) -> axum::response::Response {
    let mut missing = Vec::new();
    if body.amount.is_none() {
        missing.push("amount");
    }
    if body.category.is_none() {
        missing.push("category");
    }
    if body.date.is_none() {
        missing.push("date");
    }
    if !missing.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            format!("missing required fields: {}", missing.join(", ")),
        );
    }

    let amount = body.amount.unwrap_or_default();
    if !amount.is_finite() || amount < 0.0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "amount must be a non-negative number",
        );
    }

    let category = body.category.unwrap_or_default();
    if category.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_category",
            "category must not be empty",
        );
    }

    let date = body.date.unwrap_or_default();
    if date.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            "date must not be empty",
        );
    }

    // A blank header counts the same as no header at all.
    let key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(IdempotencyKey::new);

    let draft = ExpenseDraft {
        amount,
        category,
        description: body.description.unwrap_or_default(),
        date,
    };

    match services.ledger.record(draft, key).await {
        Ok(expense) => (StatusCode::CREATED, Json(dto::expense_to_json(&expense))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListExpensesQuery>,
) -> axum::response::Response {
    let filter = ExpenseFilter {
        category: params.category,
        sort: SortOrder::from_param(params.sort.as_deref()),
    };

    match services.ledger.query(filter).await {
        Ok(expenses) => {
            let items: Vec<_> = expenses.iter().map(dto::expense_to_json).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
