use chrono::Utc;
use uuid::Uuid;

use crate::cache::operations::user::UserLookupCache;
use crate::error::UserError;
use crate::models::user::{NewUser, User, UserUpdate};

/// 用户服务
///
/// 写操作先写数据库，成功后才失效缓存；写失败时不动缓存。
/// 新邮箱键只失效、不预填，下一次读取时再从数据库回填。
#[derive(Clone)]
pub struct UserService {
    cache: UserLookupCache,
}

impl UserService {
    pub fn new(cache: UserLookupCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &UserLookupCache {
        &self.cache
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        self.cache.get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.cache.get_by_email(email).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserError> {
        new_user.validate()?;

        let user = new_user.into_user(Uuid::new_v4().to_string(), Utc::now());
        let created = self.cache.store().create(&user).await?;

        // 清掉此前可能缓存的“不存在”
        self.cache
            .invalidate(&created.id, Some(created.email.as_str()))
            .await;

        tracing::info!("Created user: {}", created.id);
        Ok(created)
    }

    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Result<User, UserError> {
        let id = require_id(id)?;
        update.validate()?;
        if update.is_empty() {
            return Err(UserError::Validation("no fields to update".into()));
        }

        // 旧邮箱以数据库为准，不信任缓存
        let current = self
            .cache
            .store()
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let updated = update.apply_to(&current, Utc::now());
        let saved = self.cache.store().update(&updated).await?;

        self.cache
            .invalidate_many(&saved.id, [current.email.as_str(), saved.email.as_str()])
            .await;

        if current.email != saved.email {
            tracing::info!("Updated user {} with email change", saved.id);
        } else {
            tracing::info!("Updated user: {}", saved.id);
        }
        Ok(saved)
    }

    pub async fn delete_user(&self, id: &str) -> Result<User, UserError> {
        let id = require_id(id)?;

        let deleted = self.cache.store().delete(id).await?;
        self.cache
            .invalidate(&deleted.id, Some(deleted.email.as_str()))
            .await;

        tracing::info!("Deleted user: {}", deleted.id);
        Ok(deleted)
    }
}

fn require_id(id: &str) -> Result<&str, UserError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(UserError::Validation("user id must not be empty".into()));
    }
    Ok(id)
}
