use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Deserializer};
use service::users::{User, UserId, UserInput};
use tracing::info;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::metrics::{USERS_CREATED_TOTAL, USERS_DELETED_TOTAL, USERS_LIVE, USERS_UPDATED_TOTAL};
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Target user id; `?id=` with no value counts as absent
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<u64>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl IdQuery {
    fn required(self) -> Result<UserId, ApiError> {
        self.id.ok_or_else(|| ApiError::Validation("User id is required".into()))
    }
}

async fn refresh_live_gauge(state: &ServerState) {
    USERS_LIVE.set(state.users.count().await as i64);
}

/// List every user, or fetch one when `?id=` is given.
#[utoipa::path(
    get, path = "/users", tag = "users",
    params(IdQuery),
    responses(
        (status = 200, description = "User list, or a single user when id is given", body = [crate::openapi::UserDoc]),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_or_get(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    match q.id {
        Some(id) => Ok(Json(state.users.get(id).await?).into_response()),
        None => Ok(Json(state.users.list().await).into_response()),
    }
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserDoc),
        (status = 400, description = "Missing or invalid field")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(input) = body?;
    let user = state.users.create(input).await?;
    info!(user_id = user.id, name = %user.name, line_status = %user.line_status, "user created");
    USERS_CREATED_TOTAL.inc();
    refresh_live_gauge(&state).await;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Overwrite `name` and/or `lineStatus`; absent fields are kept.
#[utoipa::path(
    patch, path = "/users", tag = "users",
    params(IdQuery),
    request_body = crate::openapi::UserInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid id or body"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Query(q) = query?;
    let id = q.required()?;
    let Json(input) = body?;
    let user = state.users.update(id, input).await?;
    info!(user_id = user.id, line_status = %user.line_status, "user updated");
    USERS_UPDATED_TOTAL.inc();
    Ok(Json(user))
}

#[utoipa::path(
    post, path = "/users/toggle", tag = "users",
    params(IdQuery),
    responses(
        (status = 200, description = "Status flipped", body = crate::openapi::UserDoc),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<User>, ApiError> {
    let Query(q) = query?;
    let user = state.users.toggle(q.required()?).await?;
    info!(user_id = user.id, line_status = %user.line_status, "user toggled");
    USERS_UPDATED_TOTAL.inc();
    Ok(Json(user))
}

#[utoipa::path(
    delete, path = "/users", tag = "users",
    params(IdQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(q) = query?;
    let id = q.required()?;
    state.users.delete(id).await?;
    info!(user_id = id, "user deleted");
    USERS_DELETED_TOTAL.inc();
    refresh_live_gauge(&state).await;
    Ok(StatusCode::NO_CONTENT)
}
