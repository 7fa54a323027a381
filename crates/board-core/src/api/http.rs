//! HTTP Board API client
//!
//! reqwest-based implementation. Works natively and in the browser (fetch).

use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::endpoint::{Endpoint, HttpMethod};
use super::{ApiError, ApiResult, BoardApi};
use crate::domain::{Column, ColumnPosition, Subtask, Task, TaskUpdate, UserSummary};

#[derive(Debug, Clone)]
pub struct HttpBoardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoardApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, endpoint: &Endpoint) -> ApiResult<String> {
        let url = endpoint.url(&self.base_url);
        debug!("[API] {}", endpoint);

        let mut request = match endpoint.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("[API] {} failed: {}", endpoint, e);
            ApiError::Network(e.to_string())
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if !status.is_success() {
            error!("[API] {} returned {}", endpoint, status);
            return Err(ApiError::Http { status: status.as_u16(), message: text });
        }
        Ok(text)
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ApiResult<T> {
        let text = self.send(&endpoint).await?;
        decode(&text)
    }

    async fn call(&self, endpoint: Endpoint) -> ApiResult<()> {
        self.send(&endpoint).await.map(|_| ())
    }
}

// ========================
// Response envelopes
// ========================

fn decode<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `{data: T}` or a bare `T`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnList {
    Keyed { columns: Vec<Column> },
    Bare(Vec<Column>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserList {
    Keyed { users: Vec<UserSummary> },
    Bare(Vec<UserSummary>),
}

/// Subtask create answers with the parent task
#[derive(Deserialize)]
#[serde(untagged)]
enum SubtaskList {
    Parent { task: SubtaskParent },
    Bare(Vec<Subtask>),
}

#[derive(Deserialize)]
struct SubtaskParent {
    #[serde(default, alias = "subtasks", alias = "subTasks")]
    sub_tasks: Vec<Subtask>,
}

impl SubtaskList {
    fn into_vec(self) -> Vec<Subtask> {
        match self {
            SubtaskList::Parent { task } => task.sub_tasks,
            SubtaskList::Bare(list) => list,
        }
    }
}

fn decode_columns(text: &str) -> ApiResult<Vec<Column>> {
    Ok(match decode::<Envelope<ColumnList>>(text)?.into_inner() {
        ColumnList::Keyed { columns } => columns,
        ColumnList::Bare(columns) => columns,
    })
}

fn decode_users(text: &str) -> ApiResult<Vec<UserSummary>> {
    Ok(match decode::<Envelope<UserList>>(text)?.into_inner() {
        UserList::Keyed { users } => users,
        UserList::Bare(users) => users,
    })
}

fn decode_subtasks(text: &str) -> ApiResult<Vec<Subtask>> {
    Ok(decode::<Envelope<SubtaskList>>(text)?.into_inner().into_vec())
}

#[async_trait(?Send)]
impl BoardApi for HttpBoardApi {
    async fn fetch_columns(&self, project_id: &str) -> ApiResult<Vec<Column>> {
        let text = self.send(&Endpoint::fetch_columns(project_id)).await?;
        decode_columns(&text)
    }

    async fn create_column(&self, project_id: &str, title: &str, position: u32) -> ApiResult<Column> {
        let created: Envelope<Column> = self.fetch(Endpoint::create_column(project_id, title, position)).await?;
        Ok(created.into_inner())
    }

    async fn rename_column(&self, project_id: &str, column_id: &str, title: &str) -> ApiResult<()> {
        self.call(Endpoint::rename_column(project_id, column_id, title)).await
    }

    async fn delete_column(&self, project_id: &str, column_id: &str) -> ApiResult<()> {
        self.call(Endpoint::delete_column(project_id, column_id)).await
    }

    async fn update_column_positions(&self, project_id: &str, positions: &[ColumnPosition]) -> ApiResult<()> {
        self.call(Endpoint::update_column_positions(project_id, positions)).await
    }

    async fn create_task(&self, project_id: &str, column_id: &str, content: Option<&str>) -> ApiResult<Task> {
        let created: Envelope<Task> = self.fetch(Endpoint::create_task(project_id, column_id, content)).await?;
        Ok(created.into_inner())
    }

    async fn move_task(
        &self,
        project_id: &str,
        from_column: &str,
        task_id: &str,
        to_column: &str,
        new_position: u32,
    ) -> ApiResult<()> {
        self.call(Endpoint::move_task(project_id, from_column, task_id, to_column, new_position))
            .await
    }

    async fn reorder_task(&self, project_id: &str, column_id: &str, task_id: &str, new_position: u32) -> ApiResult<()> {
        self.call(Endpoint::reorder_task(project_id, column_id, task_id, new_position)).await
    }

    async fn update_task(&self, project_id: &str, column_id: &str, task_id: &str, update: &TaskUpdate) -> ApiResult<()> {
        self.call(Endpoint::update_task(project_id, column_id, task_id, update)).await
    }

    async fn delete_task(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<()> {
        self.call(Endpoint::delete_task(project_id, column_id, task_id)).await
    }

    async fn fetch_subtasks(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<Vec<Subtask>> {
        let text = self.send(&Endpoint::fetch_subtasks(project_id, column_id, task_id)).await?;
        decode_subtasks(&text)
    }

    async fn create_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        content: &str,
    ) -> ApiResult<Vec<Subtask>> {
        let text = self
            .send(&Endpoint::create_subtask(project_id, column_id, task_id, content))
            .await?;
        decode_subtasks(&text)
    }

    async fn set_subtask_completion(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> ApiResult<()> {
        self.call(Endpoint::set_subtask_completion(project_id, column_id, task_id, subtask_id, completed))
            .await
    }

    async fn rename_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        content: &str,
    ) -> ApiResult<()> {
        self.call(Endpoint::rename_subtask(project_id, column_id, task_id, subtask_id, content))
            .await
    }

    async fn delete_subtask(&self, project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> ApiResult<()> {
        self.call(Endpoint::delete_subtask(project_id, column_id, task_id, subtask_id)).await
    }

    async fn fetch_assignable_users(&self) -> ApiResult<Vec<UserSummary>> {
        let text = self.send(&Endpoint::assignable_users()).await?;
        decode_users(&text)
    }
}
