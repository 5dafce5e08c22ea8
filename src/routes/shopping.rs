use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use nutriplan_shopping::{CreateInput, ShoppingList, UpdateInput};

use super::AppState;
use crate::{auth::AuthUser, error::ApiError};

fn command(app: &AppState) -> nutriplan_shopping::Command {
    nutriplan_shopping::Command::new(app.state.clone()).with_policy(app.key_policy)
}

async fn load(app: &AppState, id: &str, user_id: &str) -> Result<ShoppingList, ApiError> {
    nutriplan_shopping::Query::new(app.state.clone())
        .find(id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shopping list"))
}

/// GET /api/shopping/shopping-lists
pub async fn list(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ShoppingList>>, ApiError> {
    Ok(Json(
        nutriplan_shopping::Query::new(app.state)
            .list(&auth.user_id)
            .await?,
    ))
}

/// GET /api/shopping/shopping-lists/{id}
pub async fn get(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ShoppingList>, ApiError> {
    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// POST /api/shopping/shopping-lists, aggregates the selected meals into a new list
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn create(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateInput>,
) -> Result<impl IntoResponse, ApiError> {
    let id = command(&app).create(input, &auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(load(&app, &id, &auth.user_id).await?)))
}

/// PUT /api/shopping/shopping-lists/{id}, merges the selected meals into the list
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, shopping_list_id = %id))]
pub async fn update(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<UpdateInput>,
) -> Result<Json<ShoppingList>, ApiError> {
    command(&app).update(&id, input, &auth.user_id).await?;

    Ok(Json(load(&app, &id, &auth.user_id).await?))
}

/// DELETE /api/shopping/shopping-lists/{id}
#[tracing::instrument(skip_all, fields(user_id = %auth.user_id, shopping_list_id = %id))]
pub async fn delete(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    command(&app).delete(&id, &auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
