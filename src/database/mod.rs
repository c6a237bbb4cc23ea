// 数据库模块
// 用户存储接口及其 Postgres 实现

pub mod repositories;

pub use repositories::user::{PgUserStore, UserStore};
