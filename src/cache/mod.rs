// 缓存模块
// 包含缓存键、缓存数据结构、存储后端和读穿透逻辑

pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

pub use models::user::{CacheLookup, CachedUserEntry};
pub use operations::user::{CacheTtl, UserLookupCache};
pub use store::{CacheStore, MemoryCacheStore, RedisCacheStore};
