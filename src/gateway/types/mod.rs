//! Gateway types module
//!
//! - [`response`]: `ApiResponse<T>`, `error_codes`, `ApiError`
//! - [`requests`]: validated request DTOs and response bodies

pub mod requests;
pub mod response;

pub use requests::{
    CreateAccountRequest, CreateTransferRequest, CreateUserRequest, ListAccountsQuery,
    LoginUserRequest, LoginUserResponse, UpdateUserRequest, UserResponse,
};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
