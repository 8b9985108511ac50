use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// bcrypt digest; never sent to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}
