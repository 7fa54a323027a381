//! Board API route table
//!
//! Builds method, path and JSON body for every backend call. Shared by the
//! HTTP client and the in-memory server's call log.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{json, Value};

use crate::domain::{ColumnPosition, TaskUpdate};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn seg(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

fn project(project_id: &str) -> String {
    format!("/projects/{}", seg(project_id))
}

fn task_path(project_id: &str, column_id: &str, task_id: &str) -> String {
    format!("{}/columns/{}/tasks/{}", project(project_id), seg(column_id), seg(task_id))
}

fn subtask_path(project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> String {
    format!("{}/subtasks/{}", task_path(project_id, column_id, task_id), seg(subtask_id))
}

impl Endpoint {
    fn new(method: HttpMethod, path: String, body: Option<Value>) -> Self {
        Self { method, path, body }
    }

    /// Absolute URL against a base such as `http://localhost:3000/api`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    // ========================
    // Columns
    // ========================

    pub fn fetch_columns(project_id: &str) -> Self {
        Self::new(HttpMethod::Get, format!("{}/columns", project(project_id)), None)
    }

    pub fn create_column(project_id: &str, title: &str, position: u32) -> Self {
        Self::new(
            HttpMethod::Post,
            format!("{}/newcolumn", project(project_id)),
            Some(json!({ "title": title, "position": position })),
        )
    }

    pub fn rename_column(project_id: &str, column_id: &str, title: &str) -> Self {
        Self::new(
            HttpMethod::Patch,
            format!("{}/columns/{}", project(project_id), seg(column_id)),
            Some(json!({ "title": title })),
        )
    }

    pub fn delete_column(project_id: &str, column_id: &str) -> Self {
        Self::new(HttpMethod::Delete, format!("{}/columns/{}", project(project_id), seg(column_id)), None)
    }

    pub fn update_column_positions(project_id: &str, positions: &[ColumnPosition]) -> Self {
        Self::new(
            HttpMethod::Patch,
            format!("{}/updateColumnPositions", project(project_id)),
            Some(json!({ "columnPositions": positions })),
        )
    }

    // ========================
    // Tasks
    // ========================

    pub fn create_task(project_id: &str, column_id: &str, content: Option<&str>) -> Self {
        Self::new(
            HttpMethod::Post,
            format!("{}/columns/{}/tasks", project(project_id), seg(column_id)),
            Some(json!({ "content": content.unwrap_or_default() })),
        )
    }

    pub fn move_task(project_id: &str, from_column: &str, task_id: &str, to_column: &str, new_position: u32) -> Self {
        Self::new(
            HttpMethod::Post,
            format!("{}/move/{}", task_path(project_id, from_column, task_id), seg(to_column)),
            Some(json!({ "newPosition": new_position })),
        )
    }

    pub fn reorder_task(project_id: &str, column_id: &str, task_id: &str, new_position: u32) -> Self {
        Self::new(
            HttpMethod::Post,
            format!("{}/reorder", task_path(project_id, column_id, task_id)),
            Some(json!({ "newPosition": new_position })),
        )
    }

    pub fn update_task(project_id: &str, column_id: &str, task_id: &str, update: &TaskUpdate) -> Self {
        let base = task_path(project_id, column_id, task_id);
        let (path, body) = match update {
            TaskUpdate::Completion(done) => (base, json!({ "isCompleted": done })),
            TaskUpdate::Title(title) => (format!("{}/title", base), json!({ "title": title })),
            TaskUpdate::Description(text) => (format!("{}/description", base), json!({ "description": text })),
            TaskUpdate::DueDate(date) => (
                format!("{}/date", base),
                json!({ "date": date.map(|d| d.format("%Y-%m-%d").to_string()) }),
            ),
            TaskUpdate::Assignees(ids) => (format!("{}/assign", base), json!({ "userIds": ids })),
        };
        Self::new(HttpMethod::Patch, path, Some(body))
    }

    pub fn delete_task(project_id: &str, column_id: &str, task_id: &str) -> Self {
        Self::new(
            HttpMethod::Delete,
            format!("{}/columns/{}/tasksDelete/{}", project(project_id), seg(column_id), seg(task_id)),
            None,
        )
    }

    // ========================
    // Subtasks
    // ========================

    pub fn fetch_subtasks(project_id: &str, column_id: &str, task_id: &str) -> Self {
        Self::new(HttpMethod::Get, format!("{}/subtasks", task_path(project_id, column_id, task_id)), None)
    }

    pub fn create_subtask(project_id: &str, column_id: &str, task_id: &str, content: &str) -> Self {
        Self::new(
            HttpMethod::Post,
            format!("{}/subtasks", task_path(project_id, column_id, task_id)),
            Some(json!({ "content": content })),
        )
    }

    pub fn set_subtask_completion(
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> Self {
        Self::new(
            HttpMethod::Patch,
            format!("{}/updateCompletion", subtask_path(project_id, column_id, task_id, subtask_id)),
            Some(json!({ "isCompleted": completed })),
        )
    }

    pub fn rename_subtask(project_id: &str, column_id: &str, task_id: &str, subtask_id: &str, content: &str) -> Self {
        Self::new(
            HttpMethod::Patch,
            format!("{}/updateTitle", subtask_path(project_id, column_id, task_id, subtask_id)),
            Some(json!({ "content": content })),
        )
    }

    pub fn delete_subtask(project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> Self {
        Self::new(
            HttpMethod::Delete,
            format!("{}/delete", subtask_path(project_id, column_id, task_id, subtask_id)),
            None,
        )
    }

    // ========================
    // Users
    // ========================

    pub fn assignable_users() -> Self {
        Self::new(HttpMethod::Get, "/users/getallusers?role=developer".to_string(), None)
    }
}
