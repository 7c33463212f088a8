use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use kanban_core::session::Account;
use serde::{Deserialize, Serialize};

use super::{auth_error, bearer_token, current_account, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    account: Account,
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let account = state
        .accounts
        .register(body.email.trim(), &body.password)
        .map_err(|e| auth_error("kanban.api.register", e))?;
    let token = state.sessions.open(&account.id);
    Ok((StatusCode::CREATED, Json(SessionResponse { account, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<SessionResponse>, ApiError> {
    let account = state
        .accounts
        .login(body.email.trim(), &body.password)
        .map_err(|e| auth_error("kanban.api.login", e))?;
    let token = state.sessions.open(&account.id);
    log::info!("Account {} logged in", account.id);
    Ok(Json(SessionResponse { account, token }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    current_account(&state, &headers, "kanban.api.logout")?;
    if let Some(token) = bearer_token(&headers) {
        state.sessions.close(token);
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
