//! Backend commands
//!
//! Every command carries absolute targets, so any arrival order at the
//! server converges on the last one received.

use crate::domain::{Column, ColumnPosition, Subtask, Task, TaskUpdate, UserSummary};
use crate::drag::TaskMove;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    FetchColumns,
    CreateColumn { title: String, position: u32 },
    RenameColumn { column_id: String, title: String },
    DeleteColumn { column_id: String },
    ReorderColumns { positions: Vec<ColumnPosition> },
    CreateTask { column_id: String, content: Option<String> },
    MoveTask { from_column: String, to_column: String, task_id: String, new_position: u32 },
    ReorderTask { column_id: String, task_id: String, new_position: u32 },
    UpdateTask { column_id: String, task_id: String, update: TaskUpdate },
    DeleteTask { column_id: String, task_id: String },
    FetchSubtasks { column_id: String, task_id: String },
    CreateSubtask { column_id: String, task_id: String, content: String },
    SetSubtaskCompletion { column_id: String, task_id: String, subtask_id: String, completed: bool },
    RenameSubtask { column_id: String, task_id: String, subtask_id: String, content: String },
    DeleteSubtask { column_id: String, task_id: String, subtask_id: String },
    FetchAssignableUsers,
}

impl BoardCommand {
    /// Cross-column moves become `MoveTask`, same-column ones `ReorderTask`
    pub fn from_move(step: &TaskMove) -> Self {
        let new_position = step.new_position as u32;
        if step.is_reorder() {
            BoardCommand::ReorderTask {
                column_id: step.to_column.clone(),
                task_id: step.task_id.clone(),
                new_position,
            }
        } else {
            BoardCommand::MoveTask {
                from_column: step.from_column.clone(),
                to_column: step.to_column.clone(),
                task_id: step.task_id.clone(),
                new_position,
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoardCommand::FetchColumns => "fetch columns",
            BoardCommand::CreateColumn { .. } => "create column",
            BoardCommand::RenameColumn { .. } => "rename column",
            BoardCommand::DeleteColumn { .. } => "delete column",
            BoardCommand::ReorderColumns { .. } => "reorder columns",
            BoardCommand::CreateTask { .. } => "create task",
            BoardCommand::MoveTask { .. } => "move task",
            BoardCommand::ReorderTask { .. } => "reorder task",
            BoardCommand::UpdateTask { .. } => "update task",
            BoardCommand::DeleteTask { .. } => "delete task",
            BoardCommand::FetchSubtasks { .. } => "fetch subtasks",
            BoardCommand::CreateSubtask { .. } => "create subtask",
            BoardCommand::SetSubtaskCompletion { .. } => "update subtask",
            BoardCommand::RenameSubtask { .. } => "rename subtask",
            BoardCommand::DeleteSubtask { .. } => "delete subtask",
            BoardCommand::FetchAssignableUsers => "fetch users",
        }
    }

    /// Commands that change column or task membership and order
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BoardCommand::CreateColumn { .. }
                | BoardCommand::DeleteColumn { .. }
                | BoardCommand::ReorderColumns { .. }
                | BoardCommand::CreateTask { .. }
                | BoardCommand::MoveTask { .. }
                | BoardCommand::ReorderTask { .. }
                | BoardCommand::DeleteTask { .. }
        )
    }

    /// User-facing message when this command fails, if any
    pub fn failure_notice(&self) -> Option<&'static str> {
        match self {
            BoardCommand::CreateColumn { .. } => Some("Failed to create column."),
            BoardCommand::DeleteColumn { .. } => Some("Failed to delete column."),
            BoardCommand::CreateTask { .. } => Some("Failed to create task."),
            BoardCommand::DeleteTask { .. } => Some("Failed to delete task."),
            BoardCommand::UpdateTask { update, .. } => match update {
                TaskUpdate::Completion(_) => Some("Failed to update task status."),
                TaskUpdate::Assignees(_) => Some("Failed to assign users."),
                TaskUpdate::DueDate(_) => Some("Failed to update due date."),
                TaskUpdate::Description(_) => Some("Failed to update description."),
                TaskUpdate::Title(_) => None,
            },
            BoardCommand::CreateSubtask { .. } => Some("Failed to add subtask."),
            _ => None,
        }
    }

    /// User-facing message when this command succeeds, if any
    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            BoardCommand::CreateColumn { .. } => Some("New column created!"),
            BoardCommand::RenameColumn { .. } => Some("Column title updated successfully!"),
            BoardCommand::DeleteColumn { .. } => Some("Column deleted successfully!"),
            BoardCommand::UpdateTask { update, .. } => match update {
                TaskUpdate::Completion(true) => Some("Task marked as completed!"),
                TaskUpdate::Completion(false) => Some("Task marked as incomplete!"),
                TaskUpdate::DueDate(_) => Some("Due date updated!"),
                TaskUpdate::Assignees(_) => Some("Users assigned successfully!"),
                TaskUpdate::Description(_) => Some("Description updated successfully!"),
                TaskUpdate::Title(_) => None,
            },
            BoardCommand::CreateSubtask { .. } => Some("New subtask added!"),
            BoardCommand::SetSubtaskCompletion { completed: true, .. } => Some("Subtask marked as completed!"),
            BoardCommand::SetSubtaskCompletion { completed: false, .. } => Some("Subtask marked as incomplete!"),
            BoardCommand::DeleteSubtask { .. } => Some("Subtask deleted successfully!"),
            _ => None,
        }
    }
}

impl std::fmt::Display for BoardCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardCommand::MoveTask { from_column, to_column, task_id, new_position } => {
                write!(f, "move task {} {} -> {} @{}", task_id, from_column, to_column, new_position)
            }
            BoardCommand::ReorderTask { column_id, task_id, new_position } => {
                write!(f, "reorder task {} in {} @{}", task_id, column_id, new_position)
            }
            BoardCommand::ReorderColumns { positions } => write!(f, "reorder {} columns", positions.len()),
            other => f.write_str(other.label()),
        }
    }
}

/// Successful outcome of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Done,
    Columns(Vec<Column>),
    Column(Column),
    Task(Task),
    Subtasks(Vec<Subtask>),
    Users(Vec<UserSummary>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(from: &str, to: &str, index: usize) -> TaskMove {
        TaskMove {
            task_id: "t1".into(),
            from_column: from.into(),
            to_column: to.into(),
            new_position: index,
        }
    }

    #[test]
    fn test_from_move_cross_column() {
        let cmd = BoardCommand::from_move(&step("A", "B", 0));
        assert_eq!(
            cmd,
            BoardCommand::MoveTask {
                from_column: "A".into(),
                to_column: "B".into(),
                task_id: "t1".into(),
                new_position: 0
            }
        );
        assert!(cmd.is_structural());
    }

    #[test]
    fn test_from_move_same_column_is_reorder() {
        let cmd = BoardCommand::from_move(&step("A", "A", 2));
        assert!(matches!(cmd, BoardCommand::ReorderTask { new_position: 2, .. }));
    }

    #[test]
    fn test_title_failure_is_silent() {
        let title = BoardCommand::UpdateTask {
            column_id: "A".into(),
            task_id: "t1".into(),
            update: TaskUpdate::Title("x".into()),
        };
        let done = BoardCommand::UpdateTask {
            column_id: "A".into(),
            task_id: "t1".into(),
            update: TaskUpdate::Completion(true),
        };
        assert_eq!(title.failure_notice(), None);
        assert_eq!(done.failure_notice(), Some("Failed to update task status."));
        assert!(!done.is_structural());
    }
}
