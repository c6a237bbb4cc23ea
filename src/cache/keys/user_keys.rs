use crate::models::user::normalize_email;

/// 用户ID缓存键前缀
const USER_ID_PREFIX: &str = "user:id:";

/// 用户邮箱缓存键前缀
const USER_EMAIL_PREFIX: &str = "user:email:";

/// 生成用户ID缓存键
pub fn user_id_key(user_id: &str) -> String {
    format!("{}{}", USER_ID_PREFIX, user_id)
}

/// 生成用户邮箱缓存键，大小写不同的同一邮箱落在同一个键上
pub fn user_email_key(email: &str) -> String {
    format!("{}{}", USER_EMAIL_PREFIX, normalize_email(email))
}
