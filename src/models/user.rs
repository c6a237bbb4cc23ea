use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UserError;

/// 名称最大长度（字符数）
pub const MAX_NAME_LEN: usize = 100;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// 是否可以管理其他用户
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 订阅套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Team,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Team => "team",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "team" => Ok(Plan::Team),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(format!("unknown plan: {}", other)),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户记录，以存储层为准
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub plan: Plan,
    pub organization_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 创建用户的输入
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), UserError> {
        validate_email(&self.email)?;
        validate_name(&self.name)
    }

    /// 生成带新ID的用户记录，邮箱统一为小写
    pub fn into_user(self, id: String, now: DateTime<Utc>) -> User {
        User {
            id,
            email: normalize_email(&self.email),
            name: self.name.trim().to_string(),
            role: self.role.unwrap_or_default(),
            plan: self.plan.unwrap_or_default(),
            organization_id: self.organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 更新用户的输入，缺省字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub plan: Option<Plan>,
    /// `null` 表示清除组织关联
    #[serde(default, deserialize_with = "deserialize_some")]
    pub organization_id: Option<Option<String>>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), UserError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.plan.is_none()
            && self.organization_id.is_none()
    }

    /// 在现有记录上应用修改
    pub fn apply_to(self, current: &User, now: DateTime<Utc>) -> User {
        let mut user = current.clone();
        if let Some(email) = self.email {
            user.email = normalize_email(&email);
        }
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(plan) = self.plan {
            user.plan = plan;
        }
        if let Some(organization_id) = self.organization_id {
            user.organization_id = organization_id;
        }
        user.updated_at = now;
        user
    }
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// 邮箱规范化：去除首尾空白并转为小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), UserError> {
    let email = email.trim();
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(UserError::Validation(format!("invalid email: {}", email))),
    }
}

pub fn validate_name(name: &str) -> Result<(), UserError> {
    let len = name.trim().chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(UserError::Validation(format!(
            "name must be between 1 and {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}
