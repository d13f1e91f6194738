use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{method_not_allowed, AppError, AppResult},
    extractors::{UserId, ValidatedJson},
    state::AppState,
    users::{
        dto::{CreatedResponse, MessageResponse, NewUser, SearchParams, UserUpdate},
        repo_types::User,
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users)
                .post(create_user)
                .fallback(method_not_allowed),
        )
        .route(
            "/user/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(method_not_allowed),
        )
        .route("/search", get(search_users).fallback(method_not_allowed))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let mut conn = state.acquire().await?;
    let users = services::list_users(&mut conn).await?;
    Ok(Json(users))
}

#[instrument(skip(state, id), fields(user_id = id.0))]
pub async fn get_user(State(state): State<AppState>, id: UserId) -> AppResult<Json<User>> {
    let mut conn = state.acquire().await?;
    let user = services::get_user(&mut conn, id.0).await?;
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NewUser>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let mut conn = state.acquire().await?;
    let id = services::create_user(&mut conn, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User created successfully",
            id,
        }),
    ))
}

#[instrument(skip(state, id, body), fields(user_id = id.0))]
pub async fn update_user(
    State(state): State<AppState>,
    id: UserId,
    ValidatedJson(body): ValidatedJson<UserUpdate>,
) -> AppResult<Json<MessageResponse>> {
    let mut conn = state.acquire().await?;
    services::update_user(&mut conn, id.0, body).await?;
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

#[instrument(skip(state, id), fields(user_id = id.0))]
pub async fn delete_user(State(state): State<AppState>, id: UserId) -> AppResult<StatusCode> {
    let mut conn = state.acquire().await?;
    services::delete_user(&mut conn, id.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, params))]
pub async fn search_users(
    State(state): State<AppState>,
    params: Option<Query<SearchParams>>,
) -> AppResult<Json<Vec<User>>> {
    let fragment = params
        .and_then(|Query(p)| p.name)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Name parameter is required for search".into()))?;

    let mut conn = state.acquire().await?;
    let users = services::search_users(&mut conn, &fragment).await?;
    Ok(Json(users))
}
