use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::task::driving_ports::{TaskError, TaskPort};
use crate::domain::user::driven_ports::DetectUser;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_task_driven_ports::{DbTaskReader, DbTaskWriter};
use crate::persistence::db_user_driven_ports::DbDetectUser;
use crate::routing_utils::{
    GenericErrorResponse, Json, NotFoundResponse, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(
    get_tasks_for_user,
    get_task_for_user,
    add_task_for_user,
    update_task,
    toggle_task,
    delete_task
))]
/// Defines the OpenAPI documentation for the task API
pub struct TaskApi;

/// Adds routes for user-owned tasks. Paths are relative to "/users".
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/:user_id/tasks",
            get(
                |State(app_state): AppState, Path(user_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    get_tasks_for_user(
                        &user_id,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskReader,
                    )
                    .await
                },
            )
            .post(
                |State(app_state): AppState,
                 Path(user_id): Path<String>,
                 Json(new_task): Json<dto::NewTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    add_task_for_user(
                        &user_id,
                        new_task,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/:user_id/tasks/:task_id",
            get(
                |State(app_state): AppState,
                 Path((user_id, task_id)): Path<(String, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    get_task_for_user(
                        &user_id,
                        task_id,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskReader,
                    )
                    .await
                },
            )
            .patch(
                |State(app_state): AppState,
                 Path((user_id, task_id)): Path<(String, i32)>,
                 Json(update): Json<dto::UpdateTask>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    update_task(
                        &user_id,
                        task_id,
                        update,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskWriter,
                    )
                    .await
                },
            )
            .delete(
                |State(app_state): AppState,
                 Path((user_id, task_id)): Path<(String, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    delete_task(
                        &user_id,
                        task_id,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskWriter,
                    )
                    .await
                },
            ),
        )
        .route(
            "/:user_id/tasks/:task_id/toggle",
            post(
                |State(app_state): AppState,
                 Path((user_id, task_id)): Path<(String, i32)>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    toggle_task(
                        &user_id,
                        task_id,
                        &mut ext_cxn,
                        &domain::task::TaskService,
                        &DbDetectUser,
                        &DbTaskWriter,
                    )
                    .await
                },
            ),
        )
}

/// Maps task domain failures onto HTTP responses
fn task_error_response(err: TaskError) -> Response {
    match err {
        TaskError::UserDoesNotExist | TaskError::TaskDoesNotExist => {
            info!("Task request for missing data: {err}");
            NotFoundResponse.into_response()
        }
        TaskError::PortError(cause) => GenericErrorResponse(cause).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/tasks",
    tag = "Tasks",
    params(("user_id" = String, Path, description = "ID of the owning user")),
    responses(
        (status = 200, description = "Every task owned by the user", body = [dto::TodoTask]),
        (status = 404, description = "No such user", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Retrieves the set of tasks owned by a user
async fn get_tasks_for_user(
    user_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_reader: &impl TaskReader,
) -> Result<Json<Vec<dto::TodoTask>>, ErrorResponse> {
    info!("Get tasks for user {user_id}");
    let tasks = task_service
        .tasks_for_user(user_id, ext_cxn, user_detect, task_reader)
        .await
        .map_err(task_error_response)?;

    Ok(Json(tasks.into_iter().map(dto::TodoTask::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/tasks/{task_id}",
    tag = "Tasks",
    params(
        ("user_id" = String, Path, description = "ID of the owning user"),
        ("task_id" = i32, Path, description = "ID of the task"),
    ),
    responses(
        (status = 200, description = "The task", body = dto::TodoTask),
        (status = 404, description = "No such user or task", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Retrieves a specific task owned by a user
async fn get_task_for_user(
    user_id: &str,
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_reader: &impl TaskReader,
) -> Result<Json<dto::TodoTask>, ErrorResponse> {
    info!("Get task {task_id} for user {user_id}");
    let task = task_service
        .user_task_by_id(user_id, task_id, ext_cxn, user_detect, task_reader)
        .await
        .map_err(task_error_response)?
        .ok_or(NotFoundResponse)?;

    Ok(Json(dto::TodoTask::from(task)))
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/tasks",
    tag = "Tasks",
    params(("user_id" = String, Path, description = "ID of the owning user")),
    request_body = dto::NewTask,
    responses(
        (status = 201, description = "Task created", body = dto::InsertedTask),
        (status = 400, description = "Invalid input", body = BasicErrorResponse),
        (status = 404, description = "No such user", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Adds a new task for a user
async fn add_task_for_user(
    user_id: &str,
    task_data: dto::NewTask,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_writer: &impl TaskWriter,
) -> Result<(StatusCode, Json<dto::InsertedTask>), ErrorResponse> {
    info!("Adding task for user {user_id}");
    task_data
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let new_task = domain::task::NewTask::from(task_data);
    let id = task_service
        .create_task_for_user(user_id, &new_task, ext_cxn, user_detect, task_writer)
        .await
        .map_err(task_error_response)?;

    Ok((StatusCode::CREATED, Json(dto::InsertedTask { id })))
}

#[utoipa::path(
    patch,
    path = "/users/{user_id}/tasks/{task_id}",
    tag = "Tasks",
    params(
        ("user_id" = String, Path, description = "ID of the owning user"),
        ("task_id" = i32, Path, description = "ID of the task"),
    ),
    request_body = dto::UpdateTask,
    responses(
        (status = 200, description = "Task updated"),
        (status = 400, description = "Invalid input", body = BasicErrorResponse),
        (status = 404, description = "No such user or task", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Updates the title and/or description of a task
async fn update_task(
    user_id: &str,
    task_id: i32,
    update: dto::UpdateTask,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_writer: &impl TaskWriter,
) -> Result<StatusCode, ErrorResponse> {
    info!("Updating task {task_id} for user {user_id}");
    update.validate().map_err(ValidationErrorResponse::from)?;

    let domain_update = domain::task::UpdateTask::from(update);
    task_service
        .update_task(
            user_id,
            task_id,
            &domain_update,
            ext_cxn,
            user_detect,
            task_writer,
        )
        .await
        .map_err(task_error_response)?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/tasks/{task_id}/toggle",
    tag = "Tasks",
    params(
        ("user_id" = String, Path, description = "ID of the owning user"),
        ("task_id" = i32, Path, description = "ID of the task"),
    ),
    responses(
        (status = 200, description = "Completion flag flipped", body = dto::TaskCompletion),
        (status = 404, description = "No such user or task", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Flips a task between pending and completed
async fn toggle_task(
    user_id: &str,
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_writer: &impl TaskWriter,
) -> Result<Json<dto::TaskCompletion>, ErrorResponse> {
    info!("Toggling task {task_id} for user {user_id}");
    let completed = task_service
        .toggle_complete(user_id, task_id, ext_cxn, user_detect, task_writer)
        .await
        .map_err(task_error_response)?;

    Ok(Json(dto::TaskCompletion { completed }))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}/tasks/{task_id}",
    tag = "Tasks",
    params(
        ("user_id" = String, Path, description = "ID of the owning user"),
        ("task_id" = i32, Path, description = "ID of the task"),
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "No such user or task", body = BasicErrorResponse),
        (status = 500, description = "Storage failure", body = BasicErrorResponse),
    ),
)]
/// Deletes a task
async fn delete_task(
    user_id: &str,
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
    user_detect: &impl DetectUser,
    task_writer: &impl TaskWriter,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting task {task_id} for user {user_id}");
    task_service
        .delete_task(user_id, task_id, ext_cxn, user_detect, task_writer)
        .await
        .map_err(task_error_response)?;

    Ok(StatusCode::OK)
}
