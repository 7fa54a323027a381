//! Runs a command against a `BoardApi`

use log::debug;

use super::command::{BoardCommand, Reply};
use crate::api::{ApiResult, BoardApi};

/// Execute one command. The caller settles the result back into the session.
pub async fn execute<A>(api: &A, project_id: &str, command: &BoardCommand) -> ApiResult<Reply>
where
    A: BoardApi + ?Sized,
{
    debug!("[SYNC] Executing {}", command);
    let reply = match command {
        BoardCommand::FetchColumns => Reply::Columns(api.fetch_columns(project_id).await?),
        BoardCommand::CreateColumn { title, position } => {
            Reply::Column(api.create_column(project_id, title, *position).await?)
        }
        BoardCommand::RenameColumn { column_id, title } => {
            api.rename_column(project_id, column_id, title).await?;
            Reply::Done
        }
        BoardCommand::DeleteColumn { column_id } => {
            api.delete_column(project_id, column_id).await?;
            Reply::Done
        }
        BoardCommand::ReorderColumns { positions } => {
            api.update_column_positions(project_id, positions).await?;
            Reply::Done
        }
        BoardCommand::CreateTask { column_id, content } => {
            Reply::Task(api.create_task(project_id, column_id, content.as_deref()).await?)
        }
        BoardCommand::MoveTask { from_column, to_column, task_id, new_position } => {
            api.move_task(project_id, from_column, task_id, to_column, *new_position).await?;
            Reply::Done
        }
        BoardCommand::ReorderTask { column_id, task_id, new_position } => {
            api.reorder_task(project_id, column_id, task_id, *new_position).await?;
            Reply::Done
        }
        BoardCommand::UpdateTask { column_id, task_id, update } => {
            api.update_task(project_id, column_id, task_id, update).await?;
            Reply::Done
        }
        BoardCommand::DeleteTask { column_id, task_id } => {
            api.delete_task(project_id, column_id, task_id).await?;
            Reply::Done
        }
        BoardCommand::FetchSubtasks { column_id, task_id } => {
            Reply::Subtasks(api.fetch_subtasks(project_id, column_id, task_id).await?)
        }
        BoardCommand::CreateSubtask { column_id, task_id, content } => {
            Reply::Subtasks(api.create_subtask(project_id, column_id, task_id, content).await?)
        }
        BoardCommand::SetSubtaskCompletion { column_id, task_id, subtask_id, completed } => {
            api.set_subtask_completion(project_id, column_id, task_id, subtask_id, *completed)
                .await?;
            Reply::Done
        }
        BoardCommand::RenameSubtask { column_id, task_id, subtask_id, content } => {
            api.rename_subtask(project_id, column_id, task_id, subtask_id, content).await?;
            Reply::Done
        }
        BoardCommand::DeleteSubtask { column_id, task_id, subtask_id } => {
            api.delete_subtask(project_id, column_id, task_id, subtask_id).await?;
            Reply::Done
        }
        BoardCommand::FetchAssignableUsers => Reply::Users(api.fetch_assignable_users().await?),
    };
    Ok(reply)
}
