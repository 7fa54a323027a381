//! Task Entity
//!
//! A card on the board. Belongs to exactly one column at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::role::Capability;
use super::subtask::Subtask;
use super::wire::{assignee_ids, due_date, nullable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "dueDate", with = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, rename = "isCompleted", deserialize_with = "nullable")]
    pub is_completed: bool,
    /// Assigned user ids, in assignment order
    #[serde(default, rename = "assignedTo", deserialize_with = "assignee_ids")]
    pub assignees: Vec<String>,
    #[serde(default, rename = "columnId", deserialize_with = "nullable")]
    pub column_id: String,
    /// Index within the containing column, kept equal to array order
    #[serde(default)]
    pub position: u32,
    /// Loaded on demand by the task detail view
    #[serde(skip)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            due_date: None,
            is_completed: false,
            assignees: Vec::new(),
            column_id: column_id.into(),
            position: 0,
            subtasks: Vec::new(),
        }
    }

    /// Freshly created tasks have no title yet and open in the inline editor
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Apply one field group update in place
    pub fn apply(&mut self, update: &TaskUpdate) {
        match update {
            TaskUpdate::Completion(done) => self.is_completed = *done,
            TaskUpdate::Title(title) => self.title = title.clone(),
            TaskUpdate::Description(text) => self.description = Some(text.clone()),
            TaskUpdate::DueDate(date) => self.due_date = *date,
            TaskUpdate::Assignees(ids) => self.assignees = ids.clone(),
        }
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Independently persisted task field groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskUpdate {
    Completion(bool),
    Title(String),
    Description(String),
    DueDate(Option<NaiveDate>),
    Assignees(Vec<String>),
}

impl TaskUpdate {
    pub fn capability(&self) -> Capability {
        match self {
            TaskUpdate::Completion(_) => Capability::UpdateTaskStatus,
            TaskUpdate::Title(_) | TaskUpdate::Description(_) => Capability::EditTaskDetails,
            TaskUpdate::DueDate(_) => Capability::SetDueDates,
            TaskUpdate::Assignees(_) => Capability::AssignTasks,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            TaskUpdate::Completion(_) => "status",
            TaskUpdate::Title(_) => "title",
            TaskUpdate::Description(_) => "description",
            TaskUpdate::DueDate(_) => "due date",
            TaskUpdate::Assignees(_) => "assignees",
        }
    }
}
