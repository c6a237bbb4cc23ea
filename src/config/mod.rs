use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::operations::user::CacheTtl;

/// JWT 有效期上限（小时），约十年
const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    /// 未配置时使用进程内缓存
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub user_cache_ttl_secs: u64,
    pub user_negative_cache_ttl_secs: u64,
    pub cache_timeout_ms: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_expiration_secs: jwt_expiration_secs(env::var("JWT_EXPIRATION").ok().as_deref()),
            user_cache_ttl_secs: parse_or("USER_CACHE_TTL_SECS", 3600),
            user_negative_cache_ttl_secs: parse_or("USER_NEGATIVE_CACHE_TTL_SECS", 300),
            cache_timeout_ms: parse_or("CACHE_TIMEOUT_MS", 500),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".to_string()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".to_string()),
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    pub fn cache_ttl(&self) -> CacheTtl {
        CacheTtl {
            present_secs: self.user_cache_ttl_secs,
            absent_secs: self.user_negative_cache_ttl_secs,
        }
    }
}

/// `JWT_EXPIRATION` 以小时计，可带 `h` 后缀；超出上限按格式错误处理
fn jwt_expiration_secs(raw: Option<&str>) -> u64 {
    let hours = match raw {
        Some(raw) => raw
            .trim()
            .trim_end_matches('h')
            .parse::<u64>()
            .ok()
            .filter(|h| *h <= MAX_JWT_EXPIRATION_HOURS)
            .unwrap_or_else(|| {
                tracing::warn!("Invalid JWT_EXPIRATION={:?}, using default", raw);
                24
            }),
        None => 24,
    };
    hours * 3600
}

/// 读取数值型环境变量，缺失或格式错误时使用默认值
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        // 变量名只在本测试中使用，避免与其他测试互相干扰
        unsafe { env::set_var("USER_CACHE_TEST_PARSE_OR", "not-a-number") };
        assert_eq!(parse_or("USER_CACHE_TEST_PARSE_OR", 42u64), 42);

        unsafe { env::set_var("USER_CACHE_TEST_PARSE_OR", " 7 ") };
        assert_eq!(parse_or("USER_CACHE_TEST_PARSE_OR", 42u64), 7);

        assert_eq!(parse_or("USER_CACHE_TEST_UNSET", 9u16), 9);
    }

    #[test]
    fn jwt_expiration_is_bounded() {
        assert_eq!(jwt_expiration_secs(None), 24 * 3600);
        assert_eq!(jwt_expiration_secs(Some("48h")), 48 * 3600);
        assert_eq!(jwt_expiration_secs(Some("18446744073709551615")), 24 * 3600);
        assert_eq!(jwt_expiration_secs(Some("soon")), 24 * 3600);
    }
}
