use crate::domain;
use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::task::driving_ports::TaskError;
use crate::domain::user::driven_ports::DetectUser;
use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoTask {
    pub id: i32,
    pub owner_user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Changes to a task. Missing or blank fields keep the task's current value.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(Clone, PartialEq, Eq))]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateTask {
    /// Copy of this update where blank fields have been dropped
    fn without_blanks(&self) -> UpdateTask {
        UpdateTask {
            title: domain::non_blank(&self.title),
            description: domain::non_blank(&self.description),
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader {
        async fn tasks_for_user(
            &self,
            user_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoTask>, anyhow::Error>;
        async fn user_task_by_id(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoTask>, anyhow::Error>;
    }

    /// Write operations on a user's tasks. Each one only touches tasks owned by `user_id`.
    pub trait TaskWriter {
        async fn create_task_for_user(
            &self,
            user_id: &str,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;

        /// Applies the non-empty fields of `update`. Returns false if the task was not found.
        async fn update_task(
            &self,
            user_id: &str,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        /// Flips the completion flag, returning the new value or [None] if the task was not found
        async fn toggle_completed(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<bool>, anyhow::Error>;

        /// Returns false if the task was not found
        async fn delete_task(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;
    use tracing::warn;

    #[derive(Debug, Error)]
    pub enum TaskError {
        #[error("The specified user did not exist.")]
        UserDoesNotExist,
        #[error("The specified task did not exist.")]
        TaskDoesNotExist,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<domain::user::UserExistsErr> for TaskError {
        fn from(value: domain::user::UserExistsErr) -> Self {
            match value {
                domain::user::UserExistsErr::UserDoesNotExist(user_id) => {
                    warn!("User {user_id} didn't exist when working with tasks.");
                    TaskError::UserDoesNotExist
                }
                domain::user::UserExistsErr::PortError(err) => {
                    TaskError::from(err.context("Verifying task owner"))
                }
            }
        }
    }

    pub trait TaskPort {
        async fn tasks_for_user(
            &self,
            user_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<Vec<TodoTask>, TaskError>;
        async fn user_task_by_id(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_read: &impl driven_ports::TaskReader,
        ) -> Result<Option<TodoTask>, TaskError>;
        async fn create_task_for_user(
            &self,
            user_id: &str,
            task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<i32, TaskError>;
        async fn update_task(
            &self,
            user_id: &str,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<(), TaskError>;
        async fn toggle_complete(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<bool, TaskError>;
        async fn delete_task(
            &self,
            user_id: &str,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_detect: &impl DetectUser,
            task_write: &impl driven_ports::TaskWriter,
        ) -> Result<(), TaskError>;
    }

}

pub struct TaskService;

impl driving_ports::TaskPort for TaskService {
    async fn tasks_for_user(
        &self,
        user_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_read: &impl TaskReader,
    ) -> Result<Vec<TodoTask>, TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let tasks = task_read
            .tasks_for_user(user_id, &mut *ext_cxn)
            .await
            .context("fetching tasks for a user")?;

        Ok(tasks)
    }

    async fn user_task_by_id(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_read: &impl TaskReader,
    ) -> Result<Option<TodoTask>, TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let task = task_read
            .user_task_by_id(user_id, task_id, &mut *ext_cxn)
            .await
            .context("fetching a single task")?;

        Ok(task)
    }

    async fn create_task_for_user(
        &self,
        user_id: &str,
        task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<i32, TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let created_task_id = task_write
            .create_task_for_user(user_id, task, &mut *ext_cxn)
            .await
            .context("creating a task")?;
        info!("Created task {created_task_id} for user {user_id}");

        Ok(created_task_id)
    }

    async fn update_task(
        &self,
        user_id: &str,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;

        let effective_update = update.without_blanks();
        if effective_update.is_empty() {
            debug!("Update for task {task_id} carried no changes");
        }

        let found = task_write
            .update_task(user_id, task_id, &effective_update, &mut *ext_cxn)
            .await
            .context("updating a task")?;
        if !found {
            return Err(TaskError::TaskDoesNotExist);
        }

        Ok(())
    }

    async fn toggle_complete(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<bool, TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let new_state = task_write
            .toggle_completed(user_id, task_id, &mut *ext_cxn)
            .await
            .context("toggling task completion")?;

        new_state.ok_or(TaskError::TaskDoesNotExist)
    }

    async fn delete_task(
        &self,
        user_id: &str,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_detect: &impl DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        domain::user::verify_user_exists(user_id, &mut *ext_cxn, u_detect).await?;
        let found = task_write
            .delete_task(user_id, task_id, &mut *ext_cxn)
            .await
            .context("deleting a task")?;
        if !found {
            return Err(TaskError::TaskDoesNotExist);
        }

        Ok(())
    }
}
