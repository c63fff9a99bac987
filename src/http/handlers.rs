//! Route handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::contract::types::{Quantity, TransactionHandle};
use crate::http::request::DepositRequest;
use crate::http::response::{ApiError, ApiResult};
use crate::http::server::AppState;

/// `GET /balance`
pub async fn balance(State(state): State<AppState>) -> ApiResult<Quantity> {
    Ok(Json(state.service.balance().await?))
}

/// `GET /admin`, as a checksummed address.
pub async fn admin(State(state): State<AppState>) -> ApiResult<String> {
    let admin = state.service.admin().await?;
    Ok(Json(admin.to_checksum(None)))
}

/// `POST /deposit/{amount}`
pub async fn deposit(
    State(state): State<AppState>,
    amount: Result<Path<String>, PathRejection>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> ApiResult<TransactionHandle> {
    let (amount, request) = write_params(amount, payload)?;
    let handle = state
        .service
        .deposit(request.account_private_key, amount)
        .await?;
    Ok(Json(handle))
}

/// `POST /withdrawal/{amount}`
pub async fn withdrawal(
    State(state): State<AppState>,
    amount: Result<Path<String>, PathRejection>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> ApiResult<TransactionHandle> {
    let (amount, request) = write_params(amount, payload)?;
    let handle = state
        .service
        .withdraw(request.account_private_key, amount)
        .await?;
    Ok(Json(handle))
}

/// `GET /health`: 200 while the chain answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.service.chain_id().await {
        Ok(chain_id) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "chain_id": chain_id.0 })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded" })),
            )
                .into_response()
        }
    }
}

/// The amount is checked before the body so a bad amount never reaches
/// credential handling.
fn write_params(
    amount: Result<Path<String>, PathRejection>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<(Quantity, DepositRequest), ApiError> {
    let Path(raw) = amount?;
    let amount: Quantity = raw.parse()?;
    let Json(request) = payload?;
    Ok((amount, request))
}
