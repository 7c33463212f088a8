use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use kanban_core::mutation::Mutation;
use kanban_core::types::{Board, BoardData};
use serde::Deserialize;

use super::{current_account, refresh_storage, storage_error, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateBoardBody {
    title: String,
    #[serde(default)]
    color: String,
}

#[derive(Deserialize)]
pub struct RenameBoardBody {
    title: String,
}

pub async fn list_boards(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account = current_account(&state, &headers, "kanban.api.list_boards")?;
    refresh_storage(&state, "kanban.api.list_boards");
    let boards = state.storage.list_boards(&account);
    Ok(Json(serde_json::json!({ "boards": boards })))
}

pub async fn create_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateBoardBody>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let account = current_account(&state, &headers, "kanban.api.create_board")?;
    let board = state
        .storage
        .create_board(&account, &body.title, &body.color)
        .map_err(|e| storage_error("kanban.api.create_board", e))?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BoardData>, ApiError> {
    let account = current_account(&state, &headers, "kanban.api.get_board")?;
    refresh_storage(&state, "kanban.api.get_board");
    state
        .storage
        .fetch_board(&account, &board_id)
        .map(Json)
        .map_err(|e| storage_error("kanban.api.get_board", e))
}

pub async fn rename_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<RenameBoardBody>,
) -> Result<Json<Board>, ApiError> {
    let account = current_account(&state, &headers, "kanban.api.rename_board")?;
    state
        .storage
        .rename_board(&account, &board_id, &body.title)
        .map(Json)
        .map_err(|e| storage_error("kanban.api.rename_board", e))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account = current_account(&state, &headers, "kanban.api.delete_board")?;
    state
        .storage
        .delete_board(&account, &board_id)
        .map_err(|e| storage_error("kanban.api.delete_board", e))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Apply one mutation and answer with the board as it is now, so the caller
/// can reconcile without a second round trip.
pub async fn apply_mutation(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    headers: HeaderMap,
    Json(mutation): Json<Mutation>,
) -> Result<Json<BoardData>, ApiError> {
    let account = current_account(&state, &headers, "kanban.api.mutation")?;
    refresh_storage(&state, "kanban.api.mutation");
    log::debug!(
        target: "kanban.api.mutation",
        "{} on {} in board {}",
        mutation.kind(),
        mutation.target(),
        board_id
    );
    state
        .storage
        .apply_mutation(&account, &board_id, &mutation)
        .and_then(|_| state.storage.fetch_board(&account, &board_id))
        .map(Json)
        .map_err(|e| storage_error("kanban.api.mutation", e))
}
