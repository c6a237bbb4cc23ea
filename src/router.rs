use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
};

/// 公开路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/users", post(routes::user::create_user))
}

/// 需要认证的用户路由
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/me", get(routes::user::get_me))
        .route("/users/by-email", get(routes::user::get_user_by_email))
        .route(
            "/users/{id}",
            get(routes::user::get_user)
                .put(routes::user::update_user)
                .delete(routes::user::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

/// 创建主路由，所有路由挂在 `api_base_uri` 下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()));

    let router = if state.config.api_base_uri.is_empty() || state.config.api_base_uri == "/" {
        api
    } else {
        Router::new().nest(&state.config.api_base_uri, api)
    };

    router
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(log_errors)))
        .with_state(state)
}
