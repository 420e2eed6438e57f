// Administrative surface: list/inspect any entity, flip its active flag.
// Hard delete is refused here, at the boundary - the store itself stays
// capable of real deletes for operator jobs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::store::ListQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    Toggle,
    Delete,
}

/// Deletes are always denied through the admin surface; everything else is
/// allowed. Records are deactivated, never removed.
pub fn permits(capability: Capability) -> bool {
    !matches!(capability, Capability::Delete)
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/{entity}", get(list_entity))
        .route("/admin/{entity}/{id}", get(get_entity).delete(delete_entity))
        .route("/admin/{entity}/{id}/activate", post(activate_entity))
        .route("/admin/{entity}/{id}/deactivate", post(deactivate_entity))
}

async fn list_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<serde_json::Value>>> {
    if !permits(Capability::View) {
        return Err(AppError::Forbidden("viewing is disabled".to_string()));
    }
    let query = ListQuery {
        is_active: params.is_active,
        limit: params.limit,
        offset: params.offset,
    };
    let rows = state.store.list_rows(&entity, &query)?;
    Ok(Json(rows))
}

async fn get_entity(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    if !permits(Capability::View) {
        return Err(AppError::Forbidden("viewing is disabled".to_string()));
    }
    let row = state.store.get_row(&entity, &id)?.ok_or(AppError::NotFound)?;
    Ok(Json(row))
}

async fn activate_entity(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    set_active(&state, &entity, &id, true).await
}

async fn deactivate_entity(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    set_active(&state, &entity, &id, false).await
}

async fn set_active(state: &AppState, entity: &str, id: &str, active: bool) -> AppResult<StatusCode> {
    if !permits(Capability::Toggle) {
        return Err(AppError::Forbidden("toggling is disabled".to_string()));
    }
    state.store.set_active_in(entity, id, active)?;
    tracing::info!(entity, id, active, "admin toggled active flag");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_entity(
    Path((entity, id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if !permits(Capability::Delete) {
        tracing::warn!(entity = %entity, id = %id, "admin delete refused");
        return Err(AppError::Forbidden(
            "Deleting records is disabled; deactivate them instead".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
