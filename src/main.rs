use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_cache::{
    AppState,
    cache::{CacheStore, MemoryCacheStore, RedisCacheStore, UserLookupCache},
    config::Config,
    database::PgUserStore,
    router::create_router,
    user::UserService,
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'user_cache';").await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    let store = PgUserStore::new(pool.clone());
    store.migrate().await.expect("Failed to run migrations");

    // 设置缓存，未配置 Redis 时退回进程内缓存
    let cache: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).expect("Failed to create Redis client");
            let redis_store = RedisCacheStore::new(Arc::new(client), config.cache_timeout());
            if let Err(e) = redis_store.ping().await {
                // Redis 暂不可用时照常启动，查询会直接走数据库
                tracing::warn!("Redis unreachable at startup, lookups will hit the store: {}", e);
            }
            Arc::new(redis_store)
        }
        None => {
            tracing::warn!("REDIS_URL not set, using in-process user cache");
            Arc::new(MemoryCacheStore::new())
        }
    };

    let lookup = UserLookupCache::new(cache, Arc::new(store), config.cache_ttl());
    let state = AppState {
        config: config.clone(),
        users: UserService::new(lookup),
    };

    let router = create_router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");

    // 关闭数据库连接池
    pool.close().await;
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
