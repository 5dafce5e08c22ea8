pub mod health;
pub mod meal;
pub mod nutrition;
pub mod recipe;
pub mod shopping;
pub mod user;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use nutriplan_shopping::KeyPolicy;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;

#[derive(Clone)]
pub struct AppState {
    pub state: nutriplan_shared::State,
    pub jwt_secret: String,
    pub jwt_lifetime: u64,
    pub key_policy: KeyPolicy,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/user/all-users", get(user::all_users))
        .route("/recipe/recipes", get(recipe::list).post(recipe::create))
        .route(
            "/recipe/recipes/{id}",
            get(recipe::get).put(recipe::update).delete(recipe::delete),
        )
        .route("/meal/meals", get(meal::list).post(meal::create))
        .route(
            "/meal/meals/{id}",
            get(meal::get).put(meal::update).delete(meal::delete),
        )
        .route(
            "/shopping/shopping-lists",
            get(shopping::list).post(shopping::create),
        )
        .route(
            "/shopping/shopping-lists/{id}",
            get(shopping::get)
                .put(shopping::update)
                .delete(shopping::delete),
        )
        .route(
            "/nutrition/nutritions",
            get(nutrition::list).post(nutrition::create),
        )
        .route(
            "/nutrition/nutritions/{id}",
            get(nutrition::get)
                .put(nutrition::update)
                .delete(nutrition::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
