//! Board Session
//!
//! The single writer over board state, drag session and sync journal.
//! Operations mutate local state synchronously and return the commands the
//! host must execute; results come back through [`BoardSession::settle`].

use log::{debug, error, info, warn};

use crate::api::ApiResult;
use crate::board::BoardState;
use crate::config::{BoardConfig, SyncMode};
use crate::domain::{
    BoardError, BoardResult, Capability, Column, EntityKind, Permissions, Role, TaskUpdate, UserSummary,
};
use crate::drag::{DragKey, DragSession, DropOutcome};
use crate::sync::{BoardCommand, Dispatch, Reply, SyncHealth, SyncJournal};

/// Message rejected client-side when a developer deletes a non-empty column
pub const NON_EMPTY_COLUMN_NOTICE: &str = "Developers can only delete empty columns.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub struct BoardSession {
    board: BoardState,
    drag: DragSession,
    journal: SyncJournal,
    permissions: Permissions,
    sync_mode: SyncMode,
    notices: Vec<Notice>,
    assignable_users: Vec<UserSummary>,
    refetch_requested: bool,
    loaded: bool,
}

impl BoardSession {
    pub fn new(project_id: impl Into<String>, role: Role, config: &BoardConfig) -> Self {
        Self {
            board: BoardState::new(project_id),
            drag: DragSession::new(),
            journal: SyncJournal::new(config.journal_capacity),
            permissions: Permissions::for_role(role),
            sync_mode: config.sync_mode,
            notices: Vec::new(),
            assignable_users: Vec::new(),
            refetch_requested: false,
            loaded: false,
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn project_id(&self) -> &str {
        self.board.project_id()
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        self.board.columns()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn journal(&self) -> &SyncJournal {
        &self.journal
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn role(&self) -> Role {
        self.permissions.role()
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.permissions.allows(capability)
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    pub fn health(&self) -> SyncHealth {
        self.journal.health()
    }

    /// True once a snapshot has been applied
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn assignable_users(&self) -> &[UserSummary] {
        &self.assignable_users
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// A refetch was requested and nothing structural or a drag is pending
    pub fn needs_refetch(&self) -> bool {
        self.refetch_requested && !self.journal.structural_in_flight() && self.drag.is_idle()
    }

    fn dispatch(&mut self, command: BoardCommand) -> Dispatch {
        let dispatch = self.journal.record(command);
        debug!("[SYNC] #{} {}", dispatch.seq, dispatch.command);
        dispatch
    }

    fn column_of(&self, task_id: &str) -> BoardResult<String> {
        let (ci, _) = self
            .board
            .find_task(task_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Task, task_id))?;
        Ok(self.board.columns()[ci].id.clone())
    }

    // ========================
    // Loading
    // ========================

    /// Request a full snapshot of the board
    pub fn load(&mut self) -> Dispatch {
        self.refetch_requested = false;
        self.dispatch(BoardCommand::FetchColumns)
    }

    pub fn load_assignable_users(&mut self) -> Dispatch {
        self.dispatch(BoardCommand::FetchAssignableUsers)
    }

    // ========================
    // Drag and drop
    // ========================

    pub fn drag_start(&mut self, key: DragKey) -> BoardResult<()> {
        self.drag.start(&self.board, key)
    }

    pub fn drag_over(&mut self, over: DragKey) -> Vec<Dispatch> {
        let Some(step) = self.drag.over(&mut self.board, &over) else {
            return Vec::new();
        };
        match self.sync_mode {
            SyncMode::PerHover => vec![self.dispatch(BoardCommand::from_move(&step))],
            SyncMode::OnDrop => Vec::new(),
        }
    }

    pub fn drag_end(&mut self, over: Option<DragKey>) -> Vec<Dispatch> {
        match self.drag.drop(&mut self.board, over.as_ref()) {
            DropOutcome::ColumnsReordered { from, to } => {
                info!("[DND] Column moved {} -> {}", from, to);
                let positions = self.board.column_positions();
                vec![self.dispatch(BoardCommand::ReorderColumns { positions })]
            }
            DropOutcome::TaskSettled { net: Some(net) } if self.sync_mode == SyncMode::OnDrop => {
                vec![self.dispatch(BoardCommand::from_move(&net))]
            }
            _ => Vec::new(),
        }
    }

    /// Abort the drag. Calls already issued are not cancelled; in on-drop
    /// mode nothing was issued, so the task returns to its origin.
    pub fn drag_cancel(&mut self) {
        let restore = self.sync_mode == SyncMode::OnDrop;
        if let Some(net) = self.drag.cancel(&mut self.board, restore) {
            debug!("[DND] Drag of {} cancelled (restored: {})", net.task_id, restore);
        }
    }

    pub fn lock_for_edit(&mut self, key: DragKey) {
        self.drag.lock_for_edit(key);
    }

    pub fn unlock(&mut self, key: &DragKey) {
        self.drag.unlock(key);
    }

    // ========================
    // Columns
    // ========================

    /// Create a column after the last one. Merged when the call settles.
    pub fn create_column(&mut self, title: Option<&str>) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::AddColumns)?;
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("Column {}", self.board.columns().len() + 1),
        };
        let position = self.board.next_column_position();
        Ok(self.dispatch(BoardCommand::CreateColumn { title, position }))
    }

    /// Rename locally at once. Empty or unchanged titles are no-ops.
    pub fn rename_column(&mut self, column_id: &str, title: &str) -> BoardResult<Option<Dispatch>> {
        self.permissions.require(Capability::RenameColumns)?;
        let title = title.trim();
        let column = self
            .board
            .column(column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, column_id))?;
        if title.is_empty() || column.title == title {
            return Ok(None);
        }
        self.board.rename_column(column_id, title)?;
        Ok(Some(self.dispatch(BoardCommand::RenameColumn {
            column_id: column_id.to_string(),
            title: title.to_string(),
        })))
    }

    /// Delete a column. Removed locally when the call succeeds.
    pub fn delete_column(&mut self, column_id: &str) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::DeleteColumns)?;
        let column = self
            .board
            .column(column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, column_id))?;
        if !column.is_empty() && !self.can(Capability::DeleteNonEmptyColumns) {
            warn!("[BOARD] {} refused to delete non-empty column {}", self.role(), column_id);
            self.notices.push(Notice::error(NON_EMPTY_COLUMN_NOTICE));
            return Err(BoardError::Validation(NON_EMPTY_COLUMN_NOTICE.to_string()));
        }
        Ok(self.dispatch(BoardCommand::DeleteColumn { column_id: column_id.to_string() }))
    }

    // ========================
    // Tasks
    // ========================

    /// Create an empty task at the end of a column. Appended on settle.
    pub fn create_task(&mut self, column_id: &str) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::CreateTasks)?;
        let column = self
            .board
            .column(column_id)
            .ok_or_else(|| BoardError::stale(EntityKind::Column, column_id))?;
        if !column.is_persisted() {
            return Err(BoardError::Validation("Column is not saved yet".to_string()));
        }
        Ok(self.dispatch(BoardCommand::CreateTask { column_id: column_id.to_string(), content: None }))
    }

    /// Optimistically update one field group. Returns None for a no-op title edit.
    pub fn update_task(&mut self, task_id: &str, update: TaskUpdate) -> BoardResult<Option<Dispatch>> {
        self.permissions.require(update.capability())?;
        let column_id = self.column_of(task_id)?;
        let update = match update {
            TaskUpdate::Title(title) => {
                let title = title.trim().to_string();
                let unchanged = self.board.task(task_id).is_some_and(|t| t.title == title);
                if title.is_empty() || unchanged {
                    return Ok(None);
                }
                TaskUpdate::Title(title)
            }
            other => other,
        };
        self.board.update_task_fields(task_id, &update)?;
        Ok(Some(self.dispatch(BoardCommand::UpdateTask {
            column_id,
            task_id: task_id.to_string(),
            update,
        })))
    }

    /// Delete a task. Removed locally when the call succeeds.
    pub fn delete_task(&mut self, task_id: &str) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::DeleteTasks)?;
        let column_id = self.column_of(task_id)?;
        Ok(self.dispatch(BoardCommand::DeleteTask { column_id, task_id: task_id.to_string() }))
    }

    // ========================
    // Subtasks
    // ========================

    pub fn load_subtasks(&mut self, task_id: &str) -> BoardResult<Dispatch> {
        let column_id = self.column_of(task_id)?;
        Ok(self.dispatch(BoardCommand::FetchSubtasks { column_id, task_id: task_id.to_string() }))
    }

    /// Add a subtask. The server answers with the full list.
    pub fn add_subtask(&mut self, task_id: &str, content: &str) -> BoardResult<Option<Dispatch>> {
        self.permissions.require(Capability::EditTaskDetails)?;
        let column_id = self.column_of(task_id)?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.dispatch(BoardCommand::CreateSubtask {
            column_id,
            task_id: task_id.to_string(),
            content: content.to_string(),
        })))
    }

    pub fn set_subtask_completed(&mut self, task_id: &str, subtask_id: &str, completed: bool) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::UpdateTaskStatus)?;
        let column_id = self.column_of(task_id)?;
        self.board
            .update_subtask(task_id, subtask_id, |s| s.is_completed = completed)?;
        Ok(self.dispatch(BoardCommand::SetSubtaskCompletion {
            column_id,
            task_id: task_id.to_string(),
            subtask_id: subtask_id.to_string(),
            completed,
        }))
    }

    pub fn rename_subtask(&mut self, task_id: &str, subtask_id: &str, content: &str) -> BoardResult<Option<Dispatch>> {
        self.permissions.require(Capability::EditTaskDetails)?;
        let column_id = self.column_of(task_id)?;
        let content = content.trim().to_string();
        if content.is_empty() {
            return Ok(None);
        }
        self.board
            .update_subtask(task_id, subtask_id, |s| s.content = content.clone())?;
        Ok(Some(self.dispatch(BoardCommand::RenameSubtask {
            column_id,
            task_id: task_id.to_string(),
            subtask_id: subtask_id.to_string(),
            content,
        })))
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> BoardResult<Dispatch> {
        self.permissions.require(Capability::EditTaskDetails)?;
        let column_id = self.column_of(task_id)?;
        self.board.remove_subtask(task_id, subtask_id)?;
        Ok(self.dispatch(BoardCommand::DeleteSubtask {
            column_id,
            task_id: task_id.to_string(),
            subtask_id: subtask_id.to_string(),
        }))
    }

    // ========================
    // Settling
    // ========================

    /// Fold the outcome of an executed dispatch back into the session
    pub fn settle(&mut self, seq: u64, result: ApiResult<Reply>) {
        let Some(command) = self.journal.entry(seq).map(|e| e.command.clone()) else {
            warn!("[SYNC] Settle for unknown #{}", seq);
            return;
        };

        match result {
            Ok(reply) => {
                debug!("[SYNC] #{} {} ok", seq, command.label());
                self.journal.complete(seq);
                self.apply_reply(seq, &command, reply);
                if let Some(message) = command.success_notice() {
                    self.notices.push(Notice::success(message));
                }
            }
            Err(err) => {
                error!("[SYNC] #{} {} failed: {}", seq, command, err);
                if command == BoardCommand::FetchColumns {
                    if self.snapshot_is_stale(seq) {
                        debug!("[SYNC] Stale snapshot #{} failed, keeping local board", seq);
                    } else {
                        self.board.clear();
                    }
                }
                self.journal.fail(seq, err.to_string());
                if let Some(message) = command.failure_notice() {
                    self.notices.push(Notice::error(message));
                }
            }
        }
    }

    /// A later structural command or an active drag supersedes snapshot `seq`
    fn snapshot_is_stale(&self, seq: u64) -> bool {
        self.journal.structural_after(seq) || !self.drag.is_idle()
    }

    fn apply_reply(&mut self, seq: u64, command: &BoardCommand, reply: Reply) {
        match (command, reply) {
            (BoardCommand::FetchColumns, Reply::Columns(columns)) => {
                if self.snapshot_is_stale(seq) {
                    debug!("[SYNC] Snapshot #{} is stale, requesting another", seq);
                    self.refetch_requested = true;
                    return;
                }
                info!("[BOARD] Loaded {} columns", columns.len());
                self.board.load(columns);
                self.journal.mark_reloaded();
                self.loaded = true;
            }
            (BoardCommand::CreateColumn { .. }, Reply::Column(column)) => {
                self.board.insert_column(column);
                self.refetch_requested = true;
            }
            (BoardCommand::DeleteColumn { column_id }, Reply::Done) => {
                if let Err(err) = self.board.remove_column(column_id) {
                    debug!("[BOARD] {}", err);
                }
                self.refetch_requested = true;
            }
            (BoardCommand::CreateTask { column_id, .. }, Reply::Task(task)) => {
                if let Err(err) = self.board.insert_task(column_id, task) {
                    warn!("[BOARD] Created task dropped: {}", err);
                }
            }
            (BoardCommand::DeleteTask { task_id, .. }, Reply::Done) => {
                if let Err(err) = self.board.remove_task(task_id) {
                    debug!("[BOARD] {}", err);
                }
                self.refetch_requested = true;
            }
            (
                BoardCommand::FetchSubtasks { task_id, .. } | BoardCommand::CreateSubtask { task_id, .. },
                Reply::Subtasks(subtasks),
            ) => {
                if let Err(err) = self.board.replace_subtasks(task_id, subtasks) {
                    debug!("[BOARD] {}", err);
                }
            }
            (BoardCommand::FetchAssignableUsers, Reply::Users(users)) => {
                self.assignable_users = users;
            }
            (_, Reply::Done) => {}
            (command, reply) => {
                warn!("[SYNC] Unexpected reply to {}: {:?}", command.label(), reply);
                self.refetch_requested = true;
            }
        }
    }
}
