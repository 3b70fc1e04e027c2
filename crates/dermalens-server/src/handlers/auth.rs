//! Authentication endpoints: login, signup, current user.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use dermalens_auth::{AccountView, BearerAuth, NewAccount};

use crate::error::ApiError;
use crate::state::AppState;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Signup form body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

/// Successful signup response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: AccountView,
}

/// `POST /api/token` — authenticate and mint a bearer token.
///
/// Accepts a username or email in the `username` field.
pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let service = &state.auth.service;

    let account = service.authenticate(&form.username, &form.password).await?;
    let access_token = service.issue_token(&account, None)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// `POST /api/signup` — register a new account.
pub async fn signup_handler(
    State(state): State<AppState>,
    Form(form): Form<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let account = state
        .auth
        .service
        .register(NewAccount {
            username: form.username,
            password: form.password,
            email: form.email,
            full_name: form.full_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user: AccountView::from(&account),
        }),
    ))
}

/// `GET /api/users/me` — the account behind the presented token.
pub async fn me_handler(BearerAuth(account): BearerAuth) -> Json<AccountView> {
    Json(AccountView::from(&account))
}
