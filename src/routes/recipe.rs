use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutriplan_recipe::{Recipe, RecipeInput};

use super::AppState;
use crate::{auth::AuthUser, error::ApiError};

async fn load(app: &AppState, id: &str) -> Result<Recipe, ApiError> {
    nutriplan_recipe::Query::new(app.state.clone())
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe"))
}

/// GET /api/recipe/recipes
pub async fn list(State(app): State<AppState>) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(nutriplan_recipe::Query::new(app.state).list().await?))
}

/// GET /api/recipe/recipes/{id}
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    Ok(Json(load(&app, &id).await?))
}

/// POST /api/recipe/recipes
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<RecipeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = nutriplan_recipe::Command::new(app.state.clone())
        .create(input, &auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(load(&app, &id).await?)))
}

/// PUT /api/recipe/recipes/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, recipe_id = %id))]
pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> Result<Json<Recipe>, ApiError> {
    nutriplan_recipe::Command::new(app.state.clone())
        .update(&id, input, &auth.user_id)
        .await?;

    Ok(Json(load(&app, &id).await?))
}

/// DELETE /api/recipe/recipes/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, recipe_id = %id))]
pub async fn delete(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    nutriplan_recipe::Command::new(app.state)
        .delete(&id, &auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
