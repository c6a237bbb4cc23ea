use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};

use crate::{
    AppState,
    error::AppError,
    middleware::CurrentUser,
    models::{NewUser, Role, User, UserUpdate},
    result::ApiResult,
    utils::{generate_token, success_to_api_response},
};

use super::model::{CreateUserResponse, EmailQuery};

type ApiResponse<T> = Result<Json<ApiResult<T>>, AppError>;

/// 只有本人或管理员可以修改、删除用户
fn ensure_can_modify(current: &User, target_id: &str) -> Result<(), AppError> {
    if current.id == target_id || current.role.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> ApiResponse<CreateUserResponse> {
    // 注册不需要登录，只能注册为普通成员
    if req.role.is_some_and(|role| role != Role::Member) {
        tracing::warn!("Rejected sign-up for {} requesting role {:?}", req.email, req.role);
        return Err(AppError::Forbidden);
    }

    let user = state.users.create_user(req).await?;

    let (token, expires_at) = generate_token(&user.id, &state.config).map_err(|e| {
        tracing::error!("Failed to sign token for {}: {}", user.id, e);
        AppError::Internal("token signing failed".into())
    })?;

    Ok(success_to_api_response(CreateUserResponse {
        user,
        token,
        expires_at,
    }))
}

#[axum::debug_handler]
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResponse<User> {
    Ok(success_to_api_response(user))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<User> {
    let user = state
        .users
        .get_user_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_to_api_response(user))
}

#[axum::debug_handler]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResponse<User> {
    let email = query
        .email
        .ok_or_else(|| AppError::Validation("email is required".into()))?;
    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(success_to_api_response(user))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UserUpdate>,
) -> ApiResponse<User> {
    ensure_can_modify(&current, &id)?;
    if req.role.is_some() && !current.role.can_manage_users() {
        return Err(AppError::Forbidden);
    }

    let user = state.users.update_user(&id, req).await?;
    Ok(success_to_api_response(user))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResponse<User> {
    ensure_can_modify(&current, &id)?;

    let user = state.users.delete_user(&id).await?;
    Ok(success_to_api_response(user))
}
