//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateAccountRequest, CreateTransferRequest, CreateUserRequest, LoginUserRequest,
    LoginUserResponse, UpdateUserRequest, UserResponse,
};
use crate::store::{Account, Entry, Transfer};
use crate::transfer::TransferTxResult;

/// Bearer access-token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let mut scheme = Http::new(HttpAuthScheme::Bearer);
            scheme.description = Some(
                "Access token from POST /api/v1/users/login: `Authorization: Bearer <token>`"
                    .to_string(),
            );
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Simple Bank API",
        version = "1.0.0",
        description = "Accounts, double-entry ledger and atomic transfers between accounts.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::user::create_user,
        crate::gateway::handlers::user::login_user,
        crate::gateway::handlers::user::update_user,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::transfer::create_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            CreateUserRequest,
            LoginUserRequest,
            LoginUserResponse,
            UpdateUserRequest,
            UserResponse,
            CreateAccountRequest,
            CreateTransferRequest,
            Account,
            Entry,
            Transfer,
            TransferTxResult,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and profile updates"),
        (name = "Accounts", description = "Account management (auth required)"),
        (name = "Transfers", description = "Atomic transfers between accounts (auth required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
