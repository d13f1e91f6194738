use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        services::verify_credentials,
    },
    error::{method_not_allowed, AppResult},
    extractors::ValidatedJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login).fallback(method_not_allowed))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut conn = state.acquire().await?;
    let user_id = verify_credentials(&mut conn, &body.name, &body.password).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        user_id,
    }))
}
