//! Local Board State
//!
//! Ordered columns with their ordered tasks, authoritative for rendering.
//! Every mutation is synchronous and keeps positions equal to array order.

use serde::{Deserialize, Serialize};

use super::positioning::{array_move, next_position, positions_of, renumber};
use crate::domain::{
    index_of, BoardError, BoardResult, Column, ColumnPosition, EntityKind, Subtask, Task, TaskUpdate,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    project_id: String,
    columns: Vec<Column>,
}

impl BoardState {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            columns: Vec::new(),
        }
    }

    /// Build a board from a server snapshot
    pub fn with_columns(project_id: impl Into<String>, columns: Vec<Column>) -> Self {
        let mut board = Self::new(project_id);
        board.load(columns);
        board
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Replace the entire board with a snapshot, ordered by position
    pub fn load(&mut self, mut columns: Vec<Column>) {
        columns.sort_by_key(|c| c.position);
        for column in columns.iter_mut() {
            column.normalize_tasks();
        }
        self.columns = columns;
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        index_of(&self.columns, column_id)
    }

    /// (column index, task index) of a task
    pub fn find_task(&self, task_id: &str) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, col)| col.task_index(task_id).map(|ti| (ci, ti)))
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.find_task(task_id)
            .map(|(ci, ti)| &self.columns[ci].tasks[ti])
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    // ========================
    // Columns
    // ========================

    /// Move the column at `from` to `to` and renumber every column
    pub fn move_column(&mut self, from: usize, to: usize) -> BoardResult<()> {
        let len = self.columns.len();
        if from >= len {
            return Err(BoardError::OutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(BoardError::OutOfBounds { index: to, len });
        }
        array_move(&mut self.columns, from, to);
        renumber(&mut self.columns);
        Ok(())
    }

    /// Append a column, or replace the one with the same id
    pub fn insert_column(&mut self, mut column: Column) {
        column.normalize_tasks();
        match self.columns.iter_mut().find(|c| c.is_persisted() && c.id == column.id) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Remove a column and renumber the rest to `0..n-1`
    pub fn remove_column(&mut self, column_id: &str) -> BoardResult<Column> {
        let index = self
            .column_index(column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, column_id))?;
        let removed = self.columns.remove(index);
        renumber(&mut self.columns);
        Ok(removed)
    }

    pub fn rename_column(&mut self, column_id: &str, title: &str) -> BoardResult<()> {
        let column = self.column_mut(column_id)?;
        column.title = title.to_string();
        Ok(())
    }

    /// Position for a new column: current max + 1
    pub fn next_column_position(&self) -> u32 {
        next_position(self.columns.iter().map(|c| c.position))
    }

    pub fn column_positions(&self) -> Vec<ColumnPosition> {
        positions_of(&self.columns)
    }

    pub fn renumber_columns(&mut self) {
        renumber(&mut self.columns);
    }

    // ========================
    // Tasks
    // ========================

    /// Move a task, inserting at `to_index` clamped to the destination length.
    /// Returns the index the task landed at.
    pub fn move_task(
        &mut self,
        task_id: &str,
        from_column_id: &str,
        to_column_id: &str,
        to_index: usize,
    ) -> BoardResult<usize> {
        let from = self
            .column_index(from_column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, from_column_id))?;
        let to = self
            .column_index(to_column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, to_column_id))?;
        let task_index = self.columns[from]
            .task_index(task_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Task, task_id))?;

        let task = self.columns[from].tasks.remove(task_index);
        let dest = &mut self.columns[to].tasks;
        let landed = to_index.min(dest.len());
        dest.insert(landed, task);

        self.columns[from].normalize_tasks();
        if from != to {
            self.columns[to].normalize_tasks();
        }
        Ok(landed)
    }

    /// Append a task to a column, or replace it if already present there
    pub fn insert_task(&mut self, column_id: &str, task: Task) -> BoardResult<()> {
        let column = self.column_mut(column_id)?;
        match column.tasks.iter_mut().find(|t| !t.id.is_empty() && t.id == task.id) {
            Some(existing) => *existing = task,
            None => column.tasks.push(task),
        }
        column.normalize_tasks();
        Ok(())
    }

    pub fn remove_task(&mut self, task_id: &str) -> BoardResult<Task> {
        let (ci, ti) = self
            .find_task(task_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Task, task_id))?;
        let removed = self.columns[ci].tasks.remove(ti);
        self.columns[ci].normalize_tasks();
        Ok(removed)
    }

    pub fn update_task_fields(&mut self, task_id: &str, update: &TaskUpdate) -> BoardResult<()> {
        self.task_mut(task_id)?.apply(update);
        Ok(())
    }

    // ========================
    // Subtasks
    // ========================

    pub fn replace_subtasks(&mut self, task_id: &str, subtasks: Vec<Subtask>) -> BoardResult<()> {
        self.task_mut(task_id)?.subtasks = subtasks;
        Ok(())
    }

    pub fn update_subtask<F>(&mut self, task_id: &str, subtask_id: &str, f: F) -> BoardResult<()>
    where
        F: FnOnce(&mut Subtask),
    {
        let task = self.task_mut(task_id)?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Subtask, subtask_id))?;
        f(subtask);
        Ok(())
    }

    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> BoardResult<Subtask> {
        let task = self.task_mut(task_id)?;
        let index = index_of(&task.subtasks, subtask_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Subtask, subtask_id))?;
        Ok(task.subtasks.remove(index))
    }

    fn column_mut(&mut self, column_id: &str) -> BoardResult<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, column_id))
    }

    fn task_mut(&mut self, task_id: &str) -> BoardResult<&mut Task> {
        let (ci, ti) = self
            .find_task(task_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Task, task_id))?;
        Ok(&mut self.columns[ci].tasks[ti])
    }
}
