/// 缓存存储
/// 键值存储的抽象及其 Redis / 内存实现
mod memory_store;
mod redis_store;

use async_trait::async_trait;

use crate::error::CacheError;

pub use self::memory_store::MemoryCacheStore;
pub use self::redis_store::RedisCacheStore;

/// 带过期时间的键值存储，值为 JSON 字符串
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// 删除键，不存在的键忽略
    async fn del(&self, keys: &[String]) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;

    /// 日志中使用的后端名称
    fn backend(&self) -> &'static str;
}
