//! API Routes
//!
//! HTTP endpoint definitions. Handlers decode the request, call one ledger
//! operation and encode the result; every failure is reported to the error
//! sink before the response is built.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EventOutcome, EventRequest, OperationType, Transaction, TransactionId};
use crate::error::AppError;
use crate::services::{AccountRef, CreateTransactionCommand};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub document_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub account_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdraftRequest {
    pub account_id: String,
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub account_id: String,
    pub operation_type_id: i32,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeQuery {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

type ApiResult<T> = Result<T, AppError>;

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/accounts", post(create_account))
        .route("/accounts/balance", get(get_balance))
        .route("/accounts/overdraft", post(set_overdraft))
        .route("/accounts/reset", post(reset_accounts))
        .route("/accounts/:account_id", get(get_account))
        // Transactions
        .route("/transactions", post(create_transaction))
        .route("/transactions/event", post(handle_event))
        .route("/transactions/today", get(get_transactions_today))
        .route("/transactions/range", get(get_transactions_in_range))
        .route("/transactions/reset", post(reset_transactions))
        .route(
            "/transactions/type/:operation_type_id",
            get(get_transactions_by_type),
        )
        .route("/transactions/:transaction_id", get(get_transaction))
}

// =========================================================================
// Accounts
// =========================================================================

/// POST /accounts
async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AccountRef>)> {
    let Json(request) = payload.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Failed to decode request.")
    })?;

    let account = state
        .ledger
        .accounts
        .create_account(&request.document_number)
        .map_err(|e| state.report(e, "Failed to create account."))?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /accounts/:account_id
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<AccountRef>> {
    let account = state
        .ledger
        .accounts
        .get_account(&account_id)
        .map_err(|e| state.report(e, "Failed to get account."))?;

    Ok(Json(account))
}

/// GET /accounts/balance?account_id=
async fn get_balance(
    State(state): State<AppState>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> ApiResult<Json<BalanceResponse>> {
    let Query(query) = query.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Failed to recover account_id.")
    })?;

    let balance = state
        .ledger
        .accounts
        .get_balance(&query.account_id)
        .map_err(|e| state.report(e, "Failed to get balance."))?;

    Ok(Json(BalanceResponse { balance }))
}

/// POST /accounts/overdraft
async fn set_overdraft(
    State(state): State<AppState>,
    payload: Result<Json<OverdraftRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(request) = payload.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Failed to decode request.")
    })?;

    state
        .ledger
        .accounts
        .set_overdraft_limit(&request.account_id, request.limit)
        .map_err(|e| state.report(e, "Failed to set overdraft limit."))?;

    Ok(StatusCode::OK)
}

/// POST /accounts/reset
async fn reset_accounts(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state
        .ledger
        .accounts
        .reset()
        .map_err(|e| state.report(e, "Failed to reset accounts."))?;

    Ok(StatusCode::OK)
}

// =========================================================================
// Transactions
// =========================================================================

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = payload.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Invalid request body.")
    })?;

    // Codes outside the closed set must never reach the service
    OperationType::try_from(request.operation_type_id).map_err(|e| {
        state.report(AppError::InvalidRequest(e.to_string()), "Invalid operation type.")
    })?;

    let command =
        CreateTransactionCommand::new(request.account_id, request.operation_type_id, request.amount);

    let transaction = state
        .ledger
        .transactions
        .create_transaction(command)
        .map_err(|e| state.report(e, "Failed to create transaction."))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// POST /transactions/event
async fn handle_event(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EventOutcome>)> {
    let Json(request) = payload.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Invalid request body.")
    })?;

    let outcome = state
        .ledger
        .transactions
        .handle_transaction(request)
        .map_err(|e| state.report(e, "Failed to handle transaction event."))?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /transactions/:transaction_id
async fn get_transaction(
    State(state): State<AppState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(transaction_id) = transaction_id.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Failed to parse transaction id.")
    })?;

    let transaction = state
        .ledger
        .transactions
        .get_transaction_by_id(transaction_id)
        .map_err(|e| state.report(e, "Failed to recover transaction by id."))?;

    Ok(Json(transaction))
}

/// GET /transactions/today
async fn get_transactions_today(State(state): State<AppState>) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state
        .ledger
        .transactions
        .get_transactions_today()
        .map_err(|e| state.report(e, "Failed to recover today's transactions."))?;

    Ok(Json(transactions))
}

/// GET /transactions/range?begin=&end= (RFC 3339)
async fn get_transactions_in_range(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let Query(range) = query.map_err(|e| {
        state.report(
            AppError::InvalidRequest(e.body_text()),
            "Failed to parse begin or end date.",
        )
    })?;

    let transactions = state
        .ledger
        .transactions
        .get_transactions_in_range(range.begin, range.end)
        .map_err(|e| state.report(e, "Failed to recover transactions in range."))?;

    Ok(Json(transactions))
}

/// GET /transactions/type/:operation_type_id
async fn get_transactions_by_type(
    State(state): State<AppState>,
    operation_type_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let Path(operation_type_id) = operation_type_id.map_err(|e| {
        state.report(AppError::InvalidRequest(e.body_text()), "Failed to parse operation type.")
    })?;

    let transactions = state
        .ledger
        .transactions
        .get_transactions_by_type(operation_type_id)
        .map_err(|e| state.report(e, "Failed to recover transactions by type."))?;

    Ok(Json(transactions))
}

/// POST /transactions/reset
async fn reset_transactions(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state
        .ledger
        .transactions
        .reset()
        .map_err(|e| state.report(e, "Failed to reset transactions."))?;

    Ok(StatusCode::OK)
}
