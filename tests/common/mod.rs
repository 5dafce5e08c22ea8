use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use nutriplan::AppState;
use nutriplan_shopping::KeyPolicy;
use serde_json::Value;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test_secret_key_minimum_32_characters_long";

pub struct TestApp {
    pub router: Router,
    #[allow(dead_code)]
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn create_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    nutriplan::migrate::run_migrations(&pool).await?;

    let state = AppState {
        state: nutriplan_shared::State::new(pool.clone()),
        jwt_secret: JWT_SECRET.to_owned(),
        jwt_lifetime: 3600,
        key_policy: KeyPolicy::Exact,
    };

    Ok(TestApp {
        router: nutriplan::router(state),
        pool,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Registers `username` and answers a bearer token for it.
    #[allow(dead_code)]
    pub async fn login(&self, username: &str) -> String {
        let (status, _) = self
            .request(
                "POST",
                "/api/user/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@nutriplan.localhost"),
                    "password": "my_password",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .request(
                "POST",
                "/api/user/login",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": "my_password",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        body["token"].as_str().unwrap().to_owned()
    }
}
