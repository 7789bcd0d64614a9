//! Transfer handler (Access Gate in front of the transfer engine)

use std::sync::Arc;

use axum::{Json, extract::State};
use validator::Validate;

use super::super::access::authorize_transfer;
use super::super::state::AppState;
use super::super::types::{ApiResult, CreateTransferRequest, ok};
use crate::auth::AuthenticatedUser;
use crate::transfer::{TransferError, TransferTxParams, TransferTxResult};

/// Move money from one of the caller's accounts to another account
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferTxResult),
        (status = 400, description = "Invalid parameters or currency mismatch"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Source account belongs to another user"),
        (status = 404, description = "Account not found"),
        (status = 500, description = "Transfer failed and was rolled back")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(req): Json<CreateTransferRequest>,
) -> ApiResult<TransferTxResult> {
    req.validate()?;
    if req.from_account_id == req.to_account_id {
        return Err(TransferError::SameAccount.into());
    }

    authorize_transfer(
        state.store.as_ref(),
        &user.username,
        req.from_account_id,
        req.to_account_id,
        &req.currency,
    )
    .await?;

    let result = state
        .engine
        .execute_transfer(TransferTxParams {
            from_account_id: req.from_account_id,
            to_account_id: req.to_account_id,
            amount: req.amount,
        })
        .await?;

    tracing::info!(
        transfer_id = result.transfer.id,
        username = %user.username,
        "Transfer request served"
    );
    ok(result)
}
