use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutriplan_meal::{Meal, MealInput};

use super::AppState;
use crate::{auth::AuthUser, error::ApiError};

async fn load(app: &AppState, id: &str, user_id: &str) -> Result<Meal, ApiError> {
    nutriplan_meal::Query::new(app.state.clone())
        .find(id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal"))
}

/// GET /api/meal/meals, the caller's meals with their recipes
pub async fn list(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Meal>>, ApiError> {
    Ok(Json(
        nutriplan_meal::Query::new(app.state)
            .fetch_for_user(&auth.user_id)
            .await?,
    ))
}

/// GET /api/meal/meals/{id}
pub async fn get(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Meal>, ApiError> {
    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// POST /api/meal/meals
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<MealInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = nutriplan_meal::Command::new(app.state.clone())
        .create(input, &auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(load(&app, &id, &auth.user_id).await?)))
}

/// PUT /api/meal/meals/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, meal_id = %id))]
pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<MealInput>,
) -> Result<Json<Meal>, ApiError> {
    nutriplan_meal::Command::new(app.state.clone())
        .update(&id, input, &auth.user_id)
        .await?;

    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// DELETE /api/meal/meals/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, meal_id = %id))]
pub async fn delete(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    nutriplan_meal::Command::new(app.state)
        .delete(&id, &auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
