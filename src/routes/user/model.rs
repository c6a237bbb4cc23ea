use serde::{Deserialize, Serialize};

use crate::models::User;

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: User,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}
