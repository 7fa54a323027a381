//! Column Entity
//!
//! An ordered lane of tasks. Display order is defined by `position`.

use serde::{Deserialize, Serialize};

use super::entity::{index_of, Entity, EntityKind};
use super::task::Task;
use super::wire::nullable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    /// Relative display order; gaps are tolerated
    #[serde(default)]
    pub position: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
            tasks: Vec::new(),
        }
    }

    /// A column has a server id once the create call settled
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Stable key for rendering, falling back to the array index
    pub fn render_key(&self, index: usize) -> String {
        if self.is_persisted() {
            self.id.clone()
        } else {
            format!("column-{}", index)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        index_of(&self.tasks, task_id)
    }

    /// Re-derive task positions and membership from array order
    pub fn normalize_tasks(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.position = index as u32;
            task.column_id = self.id.clone();
        }
    }
}

impl Entity for Column {
    const KIND: EntityKind = EntityKind::Column;

    fn id(&self) -> &str {
        &self.id
    }
}

/// One entry of the absolute column order sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPosition {
    pub id: String,
    pub position: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_key_falls_back_to_index() {
        assert_eq!(Column::new("", "Draft", 0).render_key(3), "column-3");
        assert_eq!(Column::new("c1", "Todo", 0).render_key(3), "c1");
    }

    #[test]
    fn test_normalize_tasks() {
        let mut col = Column::new("c1", "Todo", 0);
        col.tasks = vec![Task::new("t1", "a", "old"), Task::new("t2", "b", "old")];
        col.tasks[0].position = 7;
        col.normalize_tasks();
        assert_eq!(col.tasks[0].position, 0);
        assert_eq!(col.tasks[1].position, 1);
        assert!(col.tasks.iter().all(|t| t.column_id == "c1"));
    }
}
