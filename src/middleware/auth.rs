use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, error::UserError, models::User, utils::verify_token};

/// 已认证的当前用户，由认证中间件放入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 校验 Bearer 令牌并通过用户缓存解析当前用户
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_token(token, &state.config).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::Unauthorized
    })?;

    let user = match state.users.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!("Token subject no longer exists: {}", claims.sub);
            return Err(AppError::Unauthorized);
        }
        Err(UserError::Validation(_)) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
