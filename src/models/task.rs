use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task category. Tasks reference one by id; categories themselves are not
/// managed yet, so responses always carry `"category": null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Input structure for creating or updating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Completion flag. Defaults to not completed.
    #[serde(default)]
    pub status: bool,

    /// Optional category reference.
    pub category_id: Option<i64>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Auto-assigned identifier.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// `true` once the task is completed.
    pub status: bool,
    pub created_at: DateTime<Utc>,
    /// Identifier of the user who owns the task.
    pub owner_id: i64,
    pub category_id: Option<i64>,
    #[sqlx(skip)]
    #[serde(default)]
    pub category: Option<Category>,
}

/// Pagination parameters for listing tasks.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Number of tasks to skip.
    pub skip: Option<i64>,
    /// Maximum number of tasks to return.
    pub limit: Option<i64>,
}

impl TaskQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn offset(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(0, Self::MAX_LIMIT)
    }
}
