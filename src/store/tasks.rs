use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Task, TaskInput};

const TASK_COLUMNS: &str = "id, title, description, status, created_at, owner_id, category_id";

/// Task persistence. Every operation is scoped to an owner, so another user's
/// task behaves exactly like a missing one.
#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, input: &TaskInput) -> Result<Task, sqlx::Error> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, created_at, owner_id, category_id)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(Utc::now())
            .bind(owner_id)
            .bind(input.category_id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn list(&self, owner_id: i64, skip: i64, limit: i64) -> Result<Vec<Task>, sqlx::Error> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ? ORDER BY id LIMIT ? OFFSET ?"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, owner_id: i64, id: i64) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND owner_id = ?");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn update(
        &self,
        owner_id: i64,
        id: i64,
        input: &TaskInput,
    ) -> Result<Option<Task>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks SET title = ?, description = ?, status = ?, category_id = ?
             WHERE id = ? AND owner_id = ?
             RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.category_id)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete(&self, owner_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
