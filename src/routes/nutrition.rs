use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutriplan_nutrition::{Nutrition, NutritionInput};

use super::AppState;
use crate::{auth::AuthUser, error::ApiError};

async fn load(app: &AppState, id: &str, user_id: &str) -> Result<Nutrition, ApiError> {
    nutriplan_nutrition::Query::new(app.state.clone())
        .find(id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Nutrition"))
}

/// GET /api/nutrition/nutritions
pub async fn list(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Nutrition>>, ApiError> {
    Ok(Json(
        nutriplan_nutrition::Query::new(app.state)
            .list(&auth.user_id)
            .await?,
    ))
}

/// GET /api/nutrition/nutritions/{id}
pub async fn get(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Nutrition>, ApiError> {
    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// POST /api/nutrition/nutritions
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<NutritionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = nutriplan_nutrition::Command::new(app.state.clone())
        .create(input, &auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(load(&app, &id, &auth.user_id).await?)))
}

/// PUT /api/nutrition/nutritions/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, nutrition_id = %id))]
pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<NutritionInput>,
) -> Result<Json<Nutrition>, ApiError> {
    nutriplan_nutrition::Command::new(app.state.clone())
        .update(&id, input, &auth.user_id)
        .await?;

    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// DELETE /api/nutrition/nutritions/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, nutrition_id = %id))]
pub async fn delete(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    nutriplan_nutrition::Command::new(app.state)
        .delete(&id, &auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
