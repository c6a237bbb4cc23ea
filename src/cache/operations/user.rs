use std::sync::Arc;

use crate::cache::keys::user_keys;
use crate::cache::models::user::{CacheLookup, CachedUserEntry};
use crate::cache::store::CacheStore;
use crate::database::repositories::user::UserStore;
use crate::error::UserError;
use crate::models::user::{User, normalize_email};

/// 缓存过期时间
#[derive(Debug, Clone, Copy)]
pub struct CacheTtl {
    /// 用户快照的过期秒数
    pub present_secs: u64,
    /// 负缓存的过期秒数
    pub absent_secs: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            present_secs: 3600,
            absent_secs: 300,
        }
    }
}

/// 读穿透的用户缓存
///
/// 按ID和按邮箱两种视图缓存用户，也缓存“用户不存在”。缓存故障只会
/// 退化为查询数据库，不会让查询失败；数据库错误原样返回给调用方。
#[derive(Clone)]
pub struct UserLookupCache {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn UserStore>,
    ttl: CacheTtl,
}

impl UserLookupCache {
    pub fn new(cache: Arc<dyn CacheStore>, store: Arc<dyn UserStore>, ttl: CacheTtl) -> Self {
        Self { cache, store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// 按ID查找用户，`Ok(None)` 表示用户不存在
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, UserError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(UserError::Validation("user id must not be empty".into()));
        }

        let key = user_keys::user_id_key(id);
        match self.read(&key).await {
            CacheLookup::Present(user) => {
                tracing::debug!("User cache hit: {}", key);
                Ok(Some(user))
            }
            CacheLookup::Absent => {
                tracing::debug!("User cache negative hit: {}", key);
                Ok(None)
            }
            CacheLookup::Unknown => {
                tracing::debug!("User cache miss: {}", key);
                let user = self.store.find_by_id(id).await?;
                self.populate(&key, user.clone()).await;
                Ok(user)
            }
        }
    }

    /// 按邮箱查找用户，邮箱不区分大小写
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(UserError::Validation("email must not be empty".into()));
        }

        let key = user_keys::user_email_key(&email);
        match self.read(&key).await {
            CacheLookup::Present(user) => {
                tracing::debug!("User cache hit: {}", key);
                Ok(Some(user))
            }
            CacheLookup::Absent => {
                tracing::debug!("User cache negative hit: {}", key);
                Ok(None)
            }
            CacheLookup::Unknown => {
                tracing::debug!("User cache miss: {}", key);
                let user = self.store.find_by_email(&email).await?;
                self.populate(&key, user.clone()).await;
                Ok(user)
            }
        }
    }

    /// 删除ID键和（若提供）邮箱键，不论当前缓存状态
    pub async fn invalidate(&self, id: &str, email: Option<&str>) {
        self.invalidate_many(id, email.into_iter()).await;
    }

    /// 删除ID键和多个邮箱键，用于邮箱变更时同时清除新旧邮箱
    pub async fn invalidate_many<'a, I>(&self, id: &str, emails: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys = vec![user_keys::user_id_key(id.trim())];
        for email in emails {
            let key = user_keys::user_email_key(email);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        match self.cache.del(&keys).await {
            Ok(()) => tracing::debug!("Invalidated user cache keys: {:?}", keys),
            Err(e) => tracing::warn!(
                "Failed to invalidate user cache keys {:?} on {}: {}",
                keys,
                self.cache.backend(),
                e
            ),
        }
    }

    async fn read(&self, key: &str) -> CacheLookup {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Unknown,
            Err(e) => {
                tracing::warn!(
                    "User cache read failed on {}, falling back to store: {}",
                    self.cache.backend(),
                    e
                );
                return CacheLookup::Unknown;
            }
        };

        match serde_json::from_str::<CachedUserEntry>(&raw) {
            Ok(entry) => entry.into(),
            Err(e) => {
                tracing::warn!("Undecodable user cache entry {}: {}", key, e);
                CacheLookup::Unknown
            }
        }
    }

    async fn populate(&self, key: &str, user: Option<User>) {
        let ttl = if user.is_some() {
            self.ttl.present_secs
        } else {
            self.ttl.absent_secs
        };
        let entry = CachedUserEntry::from(user);

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize user cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.cache.set_ex(key, &json, ttl).await {
            tracing::warn!(
                "Failed to populate user cache {} on {}: {}",
                key,
                self.cache.backend(),
                e
            );
        }
    }
}
