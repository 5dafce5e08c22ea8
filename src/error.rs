use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nutriplan_shared::Error;
use serde_json::json;

/// JSON error answered by every API handler.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self(Error::NotFound(format!("{what} not found")))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self(Error::Unknown(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, details) = match self.0 {
            Error::Validate(errors) => {
                let details: HashMap<String, String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        let message = errors
                            .first()
                            .and_then(|e| e.message.as_ref())
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string());
                        (field.to_string(), message)
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    "ValidationFailed",
                    "Invalid input provided.".to_string(),
                    Some(details),
                )
            }
            Error::User(msg) => (StatusCode::BAD_REQUEST, "ValidationFailed", msg, None),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg, None),
            Error::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg, None),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "Unauthorized", msg, None),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You do not have permission to access this resource.".to_string(),
                None,
            ),
            Error::Server(msg) => {
                tracing::error!("Internal server error: {}", msg);
                internal_error()
            }
            Error::Unknown(e) => {
                tracing::error!("Internal server error: {:?}", e);
                internal_error()
            }
        };

        let mut body = json!({
            "error": error,
            "message": message,
        });

        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

fn internal_error() -> (
    StatusCode,
    &'static str,
    String,
    Option<HashMap<String, String>>,
) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "InternalServerError",
        "Something went wrong. Please try again later.".to_string(),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    async fn body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_details() {
        let errors = Input {
            name: "".to_string(),
        }
        .validate()
        .unwrap_err();

        let response = ApiError(Error::Validate(errors)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body(response).await;
        assert_eq!(body["error"], "ValidationFailed");
        assert_eq!(body["details"]["name"], "Name is required");
    }

    #[tokio::test]
    async fn test_status_codes() {
        let cases = [
            (Error::User("Please select at least one meal".into()), StatusCode::BAD_REQUEST),
            (Error::NotFound("Meal not found".into()), StatusCode::NOT_FOUND),
            (Error::Conflict("Meal already exists".into()), StatusCode::CONFLICT),
            (Error::Unauthorized("Invalid password".into()), StatusCode::UNAUTHORIZED),
            (Error::Forbidden, StatusCode::FORBIDDEN),
            (Error::Server("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError(error).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_server_error_hides_message() {
        let response = ApiError::from(anyhow::anyhow!("disk is on fire")).into_response();
        let body = body(response).await;

        assert_eq!(body["error"], "InternalServerError");
        assert!(!body["message"].as_str().unwrap().contains("disk"));
    }

    #[tokio::test]
    async fn test_conflict_message() {
        let response =
            ApiError(Error::Conflict("Shopping list already exists".into())).into_response();
        let body = body(response).await;

        assert_eq!(body["error"], "Conflict");
        assert_eq!(body["message"], "Shopping list already exists");
        assert!(body.get("details").is_none());
    }
}
