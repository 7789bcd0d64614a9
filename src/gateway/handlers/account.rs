//! Account handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use super::super::access::check_owner;
use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateAccountRequest, ListAccountsQuery, ok,
};
use crate::auth::AuthenticatedUser;
use crate::store::{Account, CreateAccountParams, ListAccountsParams};

/// Open an account for the caller with a zero balance
///
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = Account),
        (status = 400, description = "Unsupported currency"),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Caller already has an account in this currency")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<Account> {
    req.validate()?;

    let account = state
        .store
        .create_account(CreateAccountParams {
            owner: user.username,
            balance: 0,
            currency: req.currency,
        })
        .await?;

    tracing::info!(account_id = account.id, owner = %account.owner, currency = %account.currency, "Account created");
    ok(account)
}

/// Get one of the caller's accounts
///
/// GET /api/v1/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = Account),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Account belongs to another user"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> ApiResult<Account> {
    if id < 1 {
        return ApiError::bad_request("id must be positive").into_err();
    }

    let account = state.store.get_account(id).await?;
    check_owner(&account, &user.username)?;
    ok(account)
}

/// List the caller's accounts, one page at a time
///
/// GET /api/v1/accounts?page_id=1&page_size=5
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts", body = Vec<Account>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 401, description = "Authentication failed")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Query(query): Query<ListAccountsQuery>,
) -> ApiResult<Vec<Account>> {
    query.validate()?;

    let accounts = state
        .store
        .list_accounts(ListAccountsParams {
            owner: user.username,
            limit: i64::from(query.page_size),
            offset: query.offset(),
        })
        .await?;
    ok(accounts)
}
