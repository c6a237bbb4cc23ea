#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use user_cache::{
    AppState,
    cache::{CacheStore, CacheTtl, MemoryCacheStore, UserLookupCache},
    config::Config,
    database::UserStore,
    error::{CacheError, StoreError},
    models::{Plan, Role, User},
    user::UserService,
};

/// 内存用户存储，统计查询次数，可模拟写入或读取失败
#[derive(Default)]
pub struct CountingUserStore {
    users: Mutex<HashMap<String, User>>,
    pub find_by_id_calls: AtomicUsize,
    pub find_by_email_calls: AtomicUsize,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
}

impl CountingUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn email_calls(&self) -> usize {
        self.find_by_email_calls.load(Ordering::SeqCst)
    }

    /// 绕过服务直接写入，模拟其他进程的修改
    pub fn put(&self, user: User) {
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn remove(&self, id: &str) {
        self.users.lock().unwrap().remove(id);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Corrupt("simulated read failure".into()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Corrupt("simulated write failure".into()));
        }
        Ok(())
    }

    fn email_taken_by_other(users: &HashMap<String, User>, user: &User) -> bool {
        users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
    }
}

#[async_trait]
impl UserStore for CountingUserStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_by_email_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<User, StoreError> {
        self.check_writes()?;
        let mut users = self.users.lock().unwrap();
        if Self::email_taken_by_other(&users, user) {
            return Err(StoreError::Conflict(user.email.clone()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        self.check_writes()?;
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        if Self::email_taken_by_other(&users, user) {
            return Err(StoreError::Conflict(user.email.clone()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> Result<User, StoreError> {
        self.check_writes()?;
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reads()
    }
}

/// 始终不可用的缓存，模拟 Redis 宕机
pub struct DownCacheStore;

#[async_trait]
impl CacheStore for DownCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn del(&self, _keys: &[String]) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    fn backend(&self) -> &'static str {
        "down"
    }
}

pub struct Harness {
    pub service: UserService,
    pub store: Arc<CountingUserStore>,
    pub cache: Arc<MemoryCacheStore>,
}

pub fn harness() -> Harness {
    harness_with_ttl(CacheTtl::default())
}

pub fn harness_with_ttl(ttl: CacheTtl) -> Harness {
    let store = Arc::new(CountingUserStore::new());
    let cache = Arc::new(MemoryCacheStore::new());
    let lookup = UserLookupCache::new(cache.clone(), store.clone(), ttl);
    Harness {
        service: UserService::new(lookup),
        store,
        cache,
    }
}

/// 缓存宕机时的服务
pub fn harness_with_cache_down() -> (UserService, Arc<CountingUserStore>) {
    let store = Arc::new(CountingUserStore::new());
    let lookup = UserLookupCache::new(Arc::new(DownCacheStore), store.clone(), CacheTtl::default());
    (UserService::new(lookup), store)
}

pub fn user(id: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: format!("User {}", id),
        role: Role::Member,
        plan: Plan::Free,
        organization_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        redis_url: None,
        jwt_secret: "test-secret".into(),
        jwt_expiration_secs: 3600,
        user_cache_ttl_secs: 3600,
        user_negative_cache_ttl_secs: 300,
        cache_timeout_ms: 500,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: "/api".into(),
    }
}

pub fn app_state(service: UserService) -> AppState {
    AppState {
        config: test_config(),
        users: service,
    }
}
