use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// 写入缓存的用户条目
///
/// `Absent` 为负缓存：确认用户不存在，命中时不再查询数据库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CachedUserEntry {
    Present { user: User },
    Absent,
}

/// 读取缓存的三态结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// 缓存中有用户快照
    Present(User),
    /// 缓存确认用户不存在
    Absent,
    /// 缓存没有意见（未命中、过期、无法解码或缓存不可用），必须查询数据库
    Unknown,
}

impl From<CachedUserEntry> for CacheLookup {
    fn from(entry: CachedUserEntry) -> Self {
        match entry {
            CachedUserEntry::Present { user } => CacheLookup::Present(user),
            CachedUserEntry::Absent => CacheLookup::Absent,
        }
    }
}

impl From<Option<User>> for CachedUserEntry {
    fn from(user: Option<User>) -> Self {
        match user {
            Some(user) => CachedUserEntry::Present { user },
            None => CachedUserEntry::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Plan, Role};
    use chrono::Utc;

    #[test]
    fn absent_entry_wire_format() {
        let json = serde_json::to_string(&CachedUserEntry::Absent).unwrap();
        assert_eq!(json, r#"{"state":"absent"}"#);
    }

    #[test]
    fn present_entry_decodes_to_present_lookup() {
        let now = Utc::now();
        let user = User {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "Ada".into(),
            role: Role::Admin,
            plan: Plan::Team,
            organization_id: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&CachedUserEntry::from(Some(user.clone()))).unwrap();
        assert!(json.starts_with(r#"{"state":"present""#));

        let entry: CachedUserEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(CacheLookup::from(entry), CacheLookup::Present(user));
    }
}
