use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::error::AppResult;
use crate::state::AppState;
use crate::store::ListQuery;

/// The field set exposed by the public listing.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_trainer: bool,
    pub created_at: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            is_trainer: user.is_trainer,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users", get(list_users))
}

/// Read-only listing. Without parameters it returns every user, active and
/// inactive alike.
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let query = ListQuery {
        is_active: params.is_active,
        limit: params.limit,
        offset: params.offset,
    };
    let users: Vec<User> = state.store.list(&query)?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
