use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{TaskInput, TaskQuery},
    store::TaskStore,
};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `skip` (optional): number of tasks to skip, default 0.
/// - `limit` (optional): page size, default 10, at most 100.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects ordered by id.
/// - `401 Unauthorized`: missing or invalid token.
pub async fn get_tasks(
    tasks: web::Data<TaskStore>,
    query: web::Query<TaskQuery>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(user_id.0, query.offset(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: body is not valid JSON for `TaskInput`.
/// - `422 Unprocessable Entity`: title or description length out of range.
pub async fn create_task(
    tasks: web::Data<TaskStore>,
    task_data: web::Json<TaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create(user_id.0, &task_data).await?;
    log::info!("user id {} created task {}", user_id.0, task.id);
    Ok(HttpResponse::Created().json(task))
}

#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<i64>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    match tasks.get(user_id.0, task_id.into_inner()).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Replaces a task's editable fields. `404` when the task does not exist or
/// belongs to someone else.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    match tasks
        .update(user_id.0, task_id.into_inner(), &task_data)
        .await?
    {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskStore>,
    task_id: web::Path<i64>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    if !tasks.delete(user_id.0, task_id.into_inner()).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
