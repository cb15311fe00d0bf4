//! In-memory task list used by the `todo-cli` binary. Nothing here touches the database.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("Task with ID {0} not found.")]
    TaskNotFound(u32),
}

/// Owns the lifecycle of tasks held in memory. IDs start at 1 and are never reused.
pub struct TaskManager {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskManager {
    pub fn new() -> TaskManager {
        TaskManager {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_task(&mut self, title: &str, description: &str) -> &Task {
        let task = Task {
            id: self.next_id,
            title: title.to_owned(),
            description: description.to_owned(),
            is_completed: false,
        };
        self.next_id += 1;
        debug!(task_id = task.id, "Added task");

        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn view_tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    pub fn get_task_by_id(&self, task_id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    fn task_mut(&mut self, task_id: u32) -> Result<&mut Task, ManagerError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or(ManagerError::TaskNotFound(task_id))
    }

    /// Replaces the title and/or description. Fields that are [None] or empty keep their value.
    pub fn update_task(
        &mut self,
        task_id: u32,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), ManagerError> {
        let task = self.task_mut(task_id)?;
        if let Some(new_title) = title.filter(|t| !t.is_empty()) {
            task.title = new_title.to_owned();
        }
        if let Some(new_description) = description.filter(|d| !d.is_empty()) {
            task.description = new_description.to_owned();
        }

        Ok(())
    }

    /// Flips the completion flag and returns its new value
    pub fn toggle_complete(&mut self, task_id: u32) -> Result<bool, ManagerError> {
        let task = self.task_mut(task_id)?;
        task.is_completed = !task.is_completed;

        Ok(task.is_completed)
    }

    pub fn delete_task(&mut self, task_id: u32) -> Result<Task, ManagerError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(ManagerError::TaskNotFound(task_id))?;
        debug!(task_id, "Deleted task");

        Ok(self.tasks.remove(index))
    }
}
