use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use nutriplan_user::{LoginInput, RegisterInput, User};
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/user/register
#[tracing::instrument(skip_all)]
pub async fn register(
    State(app): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = nutriplan_user::Command::new(app.state)
        .register(input)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/user/login, answers a bearer token for the other routes
#[tracing::instrument(skip_all)]
pub async fn login(
    State(app): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = nutriplan_user::Command::new(app.state).login(input).await?;
    let token = nutriplan_user::jwt::generate(
        &user.id,
        &user.username,
        &app.jwt_secret,
        app.jwt_lifetime,
    )?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { token, user }))
}

/// GET /api/user/all-users
pub async fn all_users(State(app): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(nutriplan_user::Query::new(app.state).list().await?))
}
