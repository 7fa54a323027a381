//! In-memory Board API
//!
//! Simulates the backend for tests and offline demos. Every call is
//! recorded as the `Endpoint` it would have hit.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use super::endpoint::{Endpoint, HttpMethod};
use super::{ApiError, ApiResult, BoardApi};
use crate::domain::{index_of, Column, ColumnPosition, Subtask, Task, TaskUpdate, UserSummary};

#[derive(Debug, Default)]
struct ServerState {
    projects: HashMap<String, Vec<Column>>,
    users: Vec<UserSummary>,
    calls: Vec<Endpoint>,
    next_id: u64,
    offline: bool,
    /// Calls whose path contains one of these fragments fail with HTTP 500
    failing: Vec<String>,
}

impl ServerState {
    fn mint(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn columns(&mut self, project_id: &str) -> &mut Vec<Column> {
        self.projects.entry(project_id.to_string()).or_default()
    }

    fn column(&mut self, project_id: &str, column_id: &str) -> ApiResult<&mut Column> {
        self.columns(project_id)
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| ApiError::not_found(format!("column {}", column_id)))
    }

    fn task(&mut self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<&mut Task> {
        self.column(project_id, column_id)?
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ApiError::not_found(format!("task {}", task_id)))
    }

    fn subtask(&mut self, project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> ApiResult<&mut Subtask> {
        self.task(project_id, column_id, task_id)?
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| ApiError::not_found(format!("subtask {}", subtask_id)))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryBoardApi {
    state: RefCell<ServerState>,
}

impl InMemoryBoardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project. Columns are stored as given; positions are kept.
    pub fn with_columns(self, project_id: &str, columns: Vec<Column>) -> Self {
        let mut columns = columns;
        for column in &mut columns {
            column.normalize_tasks();
        }
        self.state.borrow_mut().projects.insert(project_id.to_string(), columns);
        self
    }

    pub fn with_users(self, users: Vec<UserSummary>) -> Self {
        self.state.borrow_mut().users = users;
        self
    }

    /// Server-side view of a project, ordered by position
    pub fn snapshot(&self, project_id: &str) -> Vec<Column> {
        let mut columns = self.state.borrow().projects.get(project_id).cloned().unwrap_or_default();
        columns.sort_by_key(|c| c.position);
        columns
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<Endpoint> {
        self.state.borrow().calls.clone()
    }

    /// Calls other than reads
    pub fn writes(&self) -> Vec<Endpoint> {
        self.calls().into_iter().filter(|c| c.method != HttpMethod::Get).collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    /// Fail every call whose path contains `fragment`
    pub fn fail_matching(&self, fragment: &str) {
        self.state.borrow_mut().failing.push(fragment.to_string());
    }

    pub fn recover(&self) {
        let mut state = self.state.borrow_mut();
        state.failing.clear();
        state.offline = false;
    }

    /// Log the call, then run `f` against server state unless it is set to fail
    fn handle<T, F>(&self, endpoint: Endpoint, f: F) -> ApiResult<T>
    where
        F: FnOnce(&mut ServerState) -> ApiResult<T>,
    {
        let mut state = self.state.borrow_mut();
        debug!("[API] (memory) {}", endpoint);
        let path = endpoint.path.clone();
        state.calls.push(endpoint);
        if state.offline {
            return Err(ApiError::Network("offline".to_string()));
        }
        if state.failing.iter().any(|fragment| path.contains(fragment.as_str())) {
            return Err(ApiError::Http { status: 500, message: "Internal Server Error".to_string() });
        }
        f(&mut state)
    }
}

fn place_task(column: &mut Column, task: Task, new_position: u32) {
    let index = (new_position as usize).min(column.tasks.len());
    column.tasks.insert(index, task);
    column.normalize_tasks();
}

#[async_trait(?Send)]
impl BoardApi for InMemoryBoardApi {
    async fn fetch_columns(&self, project_id: &str) -> ApiResult<Vec<Column>> {
        self.handle(Endpoint::fetch_columns(project_id), |_| Ok(()))?;
        Ok(self.snapshot(project_id))
    }

    async fn create_column(&self, project_id: &str, title: &str, position: u32) -> ApiResult<Column> {
        self.handle(Endpoint::create_column(project_id, title, position), |state| {
            let column = Column::new(state.mint("col"), title, position);
            state.columns(project_id).push(column.clone());
            Ok(column)
        })
    }

    async fn rename_column(&self, project_id: &str, column_id: &str, title: &str) -> ApiResult<()> {
        self.handle(Endpoint::rename_column(project_id, column_id, title), |state| {
            state.column(project_id, column_id)?.title = title.to_string();
            Ok(())
        })
    }

    async fn delete_column(&self, project_id: &str, column_id: &str) -> ApiResult<()> {
        self.handle(Endpoint::delete_column(project_id, column_id), |state| {
            let columns = state.columns(project_id);
            let index = index_of(columns, column_id).ok_or_else(|| ApiError::not_found(format!("column {}", column_id)))?;
            columns.remove(index);
            Ok(())
        })
    }

    async fn update_column_positions(&self, project_id: &str, positions: &[ColumnPosition]) -> ApiResult<()> {
        self.handle(Endpoint::update_column_positions(project_id, positions), |state| {
            for entry in positions {
                state.column(project_id, &entry.id)?.position = entry.position;
            }
            Ok(())
        })
    }

    async fn create_task(&self, project_id: &str, column_id: &str, content: Option<&str>) -> ApiResult<Task> {
        self.handle(Endpoint::create_task(project_id, column_id, content), |state| {
            let id = state.mint("task");
            let column = state.column(project_id, column_id)?;
            column.tasks.push(Task::new(id, content.unwrap_or_default(), column_id));
            column.normalize_tasks();
            Ok(column.tasks[column.tasks.len() - 1].clone())
        })
    }

    async fn move_task(
        &self,
        project_id: &str,
        from_column: &str,
        task_id: &str,
        to_column: &str,
        new_position: u32,
    ) -> ApiResult<()> {
        let endpoint = Endpoint::move_task(project_id, from_column, task_id, to_column, new_position);
        self.handle(endpoint, |state| {
            state.column(project_id, to_column)?;
            let source = state.column(project_id, from_column)?;
            let index = source
                .task_index(task_id)
                .ok_or_else(|| ApiError::not_found(format!("task {}", task_id)))?;
            let task = source.tasks.remove(index);
            source.normalize_tasks();
            place_task(state.column(project_id, to_column)?, task, new_position);
            Ok(())
        })
    }

    async fn reorder_task(&self, project_id: &str, column_id: &str, task_id: &str, new_position: u32) -> ApiResult<()> {
        self.handle(Endpoint::reorder_task(project_id, column_id, task_id, new_position), |state| {
            let column = state.column(project_id, column_id)?;
            let index = column
                .task_index(task_id)
                .ok_or_else(|| ApiError::not_found(format!("task {}", task_id)))?;
            let task = column.tasks.remove(index);
            place_task(column, task, new_position);
            Ok(())
        })
    }

    async fn update_task(&self, project_id: &str, column_id: &str, task_id: &str, update: &TaskUpdate) -> ApiResult<()> {
        self.handle(Endpoint::update_task(project_id, column_id, task_id, update), |state| {
            state.task(project_id, column_id, task_id)?.apply(update);
            Ok(())
        })
    }

    async fn delete_task(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<()> {
        self.handle(Endpoint::delete_task(project_id, column_id, task_id), |state| {
            let column = state.column(project_id, column_id)?;
            let index = column
                .task_index(task_id)
                .ok_or_else(|| ApiError::not_found(format!("task {}", task_id)))?;
            column.tasks.remove(index);
            column.normalize_tasks();
            Ok(())
        })
    }

    async fn fetch_subtasks(&self, project_id: &str, column_id: &str, task_id: &str) -> ApiResult<Vec<Subtask>> {
        self.handle(Endpoint::fetch_subtasks(project_id, column_id, task_id), |state| {
            Ok(state.task(project_id, column_id, task_id)?.subtasks.clone())
        })
    }

    async fn create_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        content: &str,
    ) -> ApiResult<Vec<Subtask>> {
        self.handle(Endpoint::create_subtask(project_id, column_id, task_id, content), |state| {
            let id = state.mint("sub");
            let task = state.task(project_id, column_id, task_id)?;
            task.subtasks.push(Subtask { id, content: content.to_string(), is_completed: false });
            Ok(task.subtasks.clone())
        })
    }

    async fn set_subtask_completion(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> ApiResult<()> {
        let endpoint = Endpoint::set_subtask_completion(project_id, column_id, task_id, subtask_id, completed);
        self.handle(endpoint, |state| {
            state.subtask(project_id, column_id, task_id, subtask_id)?.is_completed = completed;
            Ok(())
        })
    }

    async fn rename_subtask(
        &self,
        project_id: &str,
        column_id: &str,
        task_id: &str,
        subtask_id: &str,
        content: &str,
    ) -> ApiResult<()> {
        let endpoint = Endpoint::rename_subtask(project_id, column_id, task_id, subtask_id, content);
        self.handle(endpoint, |state| {
            state.subtask(project_id, column_id, task_id, subtask_id)?.content = content.to_string();
            Ok(())
        })
    }

    async fn delete_subtask(&self, project_id: &str, column_id: &str, task_id: &str, subtask_id: &str) -> ApiResult<()> {
        self.handle(Endpoint::delete_subtask(project_id, column_id, task_id, subtask_id), |state| {
            let task = state.task(project_id, column_id, task_id)?;
            let index = index_of(&task.subtasks, subtask_id)
                .ok_or_else(|| ApiError::not_found(format!("subtask {}", subtask_id)))?;
            task.subtasks.remove(index);
            Ok(())
        })
    }

    async fn fetch_assignable_users(&self) -> ApiResult<Vec<UserSummary>> {
        self.handle(Endpoint::assignable_users(), |state| Ok(state.users.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryBoardApi {
        let mut todo = Column::new("A", "Todo", 0);
        todo.tasks = vec![Task::new("t1", "One", "A"), Task::new("t2", "Two", "A")];
        InMemoryBoardApi::new().with_columns("p1", vec![todo, Column::new("B", "Done", 1)])
    }

    #[tokio::test]
    async fn test_move_task_between_columns() {
        let api = seeded();
        api.move_task("p1", "A", "t1", "B", 0).await.unwrap();

        let columns = api.snapshot("p1");
        assert_eq!(columns[0].tasks.len(), 1);
        assert_eq!(columns[1].tasks[0].id, "t1");
        assert_eq!(columns[1].tasks[0].column_id, "B");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_reorder_clamps_position() {
        let api = seeded();
        api.reorder_task("p1", "A", "t1", 99).await.unwrap();
        let ids: Vec<_> = api.snapshot("p1")[0].tasks.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn test_offline_records_but_fails() {
        let api = seeded();
        api.set_offline(true);
        let result = api.delete_column("p1", "B").await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(api.calls().len(), 1);
        assert_eq!(api.snapshot("p1").len(), 2);
    }

    #[tokio::test]
    async fn test_fail_matching_only_hits_matching_paths() {
        let api = seeded();
        api.fail_matching("/title");
        let title = api
            .update_task("p1", "A", "t1", &TaskUpdate::Title("x".into()))
            .await;
        let done = api
            .update_task("p1", "A", "t1", &TaskUpdate::Completion(true))
            .await;
        assert!(matches!(title, Err(ApiError::Http { status: 500, .. })));
        assert!(done.is_ok());
        assert!(api.snapshot("p1")[0].tasks[0].is_completed);
    }

    #[tokio::test]
    async fn test_unknown_column_is_not_found() {
        let api = seeded();
        let err = api.rename_column("p1", "Z", "x").await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_create_subtask_returns_full_list() {
        let api = seeded();
        api.create_subtask("p1", "A", "t1", "first").await.unwrap();
        let list = api.create_subtask("p1", "A", "t1", "second").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].content, "second");
    }
}
