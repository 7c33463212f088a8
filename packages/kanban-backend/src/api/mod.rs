use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use kanban_core::session::{require_auth, AuthError};
use kanban_core::storage::StorageError;
use kanban_core::types::AccountId;
use serde::Serialize;

mod board;
mod session;

use crate::state::AppState;

/// Axum REST API routes. Everything except /register, /login and /status
/// needs `Authorization: Bearer <token>`.
///
///   POST   /register                    -> create account, open session
///   POST   /login                       -> open session
///   POST   /logout                      -> close session
///   GET    /boards                      -> boards of the account
///   POST   /boards                      -> create board
///   GET    /boards/:boardId             -> board snapshot (board, columns, notes)
///   PUT    /boards/:boardId             -> rename board
///   DELETE /boards/:boardId             -> delete board with columns and notes
///   POST   /boards/:boardId/mutations   -> apply one mutation, return snapshot
///   GET    /status                      -> health check
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(session::register))
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/boards", get(board::list_boards).post(board::create_board))
        .route(
            "/boards/{board_id}",
            get(board::get_board)
                .put(board::rename_board)
                .delete(board::delete_board),
        )
        .route("/boards/{board_id}/mutations", post(board::apply_mutation))
        .route("/status", get(status))
}

async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "port": state.port,
        "bind_address": state.bind_address,
    }))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn api_error(status: StatusCode, target: &'static str, error: String) -> ApiError {
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

fn storage_error(target: &'static str, e: StorageError) -> ApiError {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    api_error(status, target, e.to_string())
}

fn auth_error(target: &'static str, e: AuthError) -> ApiError {
    let status = match e {
        AuthError::InvalidEmail(_) | AuthError::InvalidPassword(_) => StatusCode::BAD_REQUEST,
        AuthError::AccountExists => StatusCode::CONFLICT,
        AuthError::Unauthenticated | AuthError::AccountNotFound | AuthError::WrongPassword => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, target, e.to_string())
}

/// Pick up edits other processes made to the data file. A failed reload
/// keeps serving the last good tables.
fn refresh_storage(state: &AppState, target: &'static str) {
    if let Err(e) = state.storage.reload() {
        log::warn!(target: target, "Reload failed, serving cached boards: {}", e);
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Account behind the request's session token, or 401.
fn current_account(
    state: &AppState,
    headers: &HeaderMap,
    target: &'static str,
) -> Result<AccountId, ApiError> {
    require_auth(state.sessions.as_ref(), bearer_token(headers)).map_err(|e| auth_error(target, e))
}
