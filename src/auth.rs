//! Bearer token authentication for the API routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use nutriplan_shared::Error;

use crate::{error::ApiError, routes::AppState};

/// Identity of the caller, inserted as a request extension.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        tracing::warn!("Missing bearer token");
        return unauthorized("Authentication required");
    };

    let claims = match nutriplan_user::jwt::validate(bearer.token(), &state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid or expired token");
            return unauthorized("Invalid or expired token");
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        username: claims.username,
    });

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    ApiError(Error::Unauthorized(message.to_owned())).into_response()
}
