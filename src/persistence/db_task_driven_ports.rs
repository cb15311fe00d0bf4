use crate::domain;
use crate::domain::task::{NewTask, TodoTask, UpdateTask};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar};

pub struct DbTaskReader;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i32,
    user_id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for domain::task::TodoTask {
    fn from(value: TaskRow) -> Self {
        TodoTask {
            id: value.id,
            owner_user_id: value.user_id,
            title: value.title,
            description: value.description,
            completed: value.completed,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl domain::task::driven_ports::TaskReader for DbTaskReader {
    async fn tasks_for_user(
        &self,
        user_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoTask>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks: Vec<TodoTask> =
            query_as::<_, TaskRow>("SELECT t.* FROM tasks t WHERE t.user_id = $1 ORDER BY t.id")
                .bind(user_id)
                .fetch_all(cxn.borrow_connection())
                .await
                .context("trying to fetch tasks for a user")?
                .into_iter()
                .map(domain::task::TodoTask::from)
                .collect();

        Ok(tasks)
    }

    async fn user_task_by_id(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoTask>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let task: Option<TodoTask> =
            query_as::<_, TaskRow>("SELECT t.* FROM tasks t WHERE t.user_id = $1 AND t.id = $2")
                .bind(user_id)
                .bind(task_id)
                .fetch_optional(cxn.borrow_connection())
                .await
                .context("trying to fetch a task by ID")?
                .map(domain::task::TodoTask::from);

        Ok(task)
    }
}

pub struct DbTaskWriter;

impl domain::task::driven_ports::TaskWriter for DbTaskWriter {
    async fn create_task_for_user(
        &self,
        user_id: &str,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO tasks(user_id, title, description) VALUES ($1, $2, $3) RETURNING tasks.id",
        )
        .bind(user_id)
        .bind(&new_task.title)
        .bind(&new_task.description)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(new_id.id)
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // COALESCE leaves a column alone when its new value is NULL
        let result = query(
            "UPDATE tasks SET title = COALESCE($1, title), \
             description = COALESCE($2, description), updated_at = now() \
             WHERE id = $3 AND user_id = $4",
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(task_id)
        .bind(user_id)
        .execute(cxn.borrow_connection())
        .await
        .context("trying to update a task in the database")?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_completed(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<bool>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let new_state: Option<bool> = query_scalar(
            "UPDATE tasks SET completed = NOT completed, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING completed",
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to toggle a task's completion")?;

        Ok(new_state)
    }

    async fn delete_task(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let result = query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        Ok(result.rows_affected() > 0)
    }
}
