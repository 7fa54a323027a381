//! Board API Layer
//!
//! REST contract of the board backend, with an HTTP client and an
//! in-memory server used by tests and offline demos.

mod endpoint;
mod http;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Column, ColumnPosition, Subtask, Task, TaskUpdate, UserSummary};

pub use endpoint::{Endpoint, HttpMethod};
pub use http::HttpBoardApi;
pub use memory::InMemoryBoardApi;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        ApiError::Http { status: 404, message: format!("{} not found", what) }
    }
}

/// Board backend operations.
///
/// Every position argument is absolute, so calls can complete in any order.
#[async_trait(?Send)]
pub trait BoardApi {
    // Columns
    async fn fetch_columns(&self, project_id: &str) -> ApiResult<Vec<Column>>;
    async fn create_column(&self, project_id: &str, title: &str, position: u32) -> ApiResult<Column>;
    async fn rename_column(&self, project_id: &str, column_id: &str, title: &str) -> ApiResult<()>;
    async fn delete_column(&self, project_id: &str, column_id: &str) -> ApiResult<()>;
    async fn update_column_positions(&self, project_id: &str, positions: &[ColumnPosition]) -> ApiResult<()>;

    // Tasks
    async fn create_task(&self, project_id: &str, column_id: &str, content: Option<&str>) -> ApiResult<Task>;
    async fn move_task(
        &self,
        project_id: &str,
        from_column: &str,
        task_id: &str,
        to_column: &str,
        new_position: u32,
    ) -> ApiResult<()>;
    async fn reorder_task(&self, project_id: &str, column_id: &str, task_id: &str, new_position: u32) -> ApiResult<()>;
    async fn update_task(&self, project_id: &str, column_id: &str, task_id: &str, update: &TaskUpdate) -> ApiResult<()>;
    async fn delete_task(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<()>;

    // Subtasks
    async fn fetch_subtasks(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<Vec<Subtask>>;
    /// Returns the task's full subtask list after the insert
    async fn create_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        content: &str,
    ) -> ApiResult<Vec<Subtask>>;
    async fn set_subtask_completion(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> ApiResult<()>;
    async fn rename_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        content: &str,
    ) -> ApiResult<()>;
    async fn delete_subtask(&self, project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> ApiResult<()>;

    // Users
    async fn fetch_assignable_users(&self) -> ApiResult<Vec<UserSummary>>;
}
