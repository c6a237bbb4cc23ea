use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{AppState, result::ApiResult};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`、`degraded`（缓存不可用）或 `unavailable`（数据库不可用）
    pub status: &'static str,
    pub store: bool,
    pub cache: bool,
    pub cache_backend: &'static str,
}

/// 缓存不可用只算降级，查询仍可直接走数据库
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResult<HealthResponse>>) {
    let lookup = state.users.cache();

    let store = match lookup.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Health check: user store unreachable: {}", e);
            false
        }
    };
    let cache = match lookup.cache().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check: cache unreachable: {}", e);
            false
        }
    };

    let (code, status) = match (store, cache) {
        (true, true) => (StatusCode::OK, "ok"),
        (true, false) => (StatusCode::OK, "degraded"),
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
    };

    (
        code,
        Json(ApiResult::success(HealthResponse {
            status,
            store,
            cache,
            cache_backend: lookup.cache().backend(),
        })),
    )
}
