use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient, aio::MultiplexedConnection};

use super::CacheStore;
use crate::error::CacheError;

/// 基于 Redis 的缓存存储
#[derive(Clone)]
pub struct RedisCacheStore {
    redis: Arc<RedisClient>,
    timeout: Duration,
}

impl RedisCacheStore {
    pub fn new(redis: Arc<RedisClient>, timeout: Duration) -> Self {
        Self { redis, timeout }
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        self.bounded(async {
            Ok::<_, CacheError>(self.redis.get_multiplexed_async_connection().await?)
        })
            .await
    }

    /// Redis 挂起时不能拖住请求，超时即视为不可用
    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Unavailable(format!(
                "redis did not respond within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let value: Option<String> = conn.get(key).await?;
            Ok::<_, CacheError>(value)
        })
        .await
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let _: () = conn.set_ex(key, value, ttl_secs).await?;
            Ok::<_, CacheError>(())
        })
        .await
    }

    async fn del(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        self.bounded(async {
            let _: () = conn.del(keys).await?;
            Ok::<_, CacheError>(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        self.bounded(async {
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, CacheError>(())
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
