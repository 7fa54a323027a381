//! Drag Session Controller
//!
//! Tracks the dragged entity and reorders the local board while hovering.
//! Tasks move live on every hover step; columns only move on drop.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::domain::{BoardError, BoardResult, Column, EntityKind, Task};

/// Identifies a draggable element or a hover target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragKey {
    Column(String),
    Task(String),
}

impl DragKey {
    pub fn id(&self) -> &str {
        match self {
            DragKey::Column(id) | DragKey::Task(id) => id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            DragKey::Column(_) => EntityKind::Column,
            DragKey::Task(_) => EntityKind::Task,
        }
    }
}

/// Drag state with the captured entity used for the preview
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingColumn(Column),
    DraggingTask(Task),
}

/// One task relocation with an absolute target index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskMove {
    pub task_id: String,
    pub from_column: String,
    pub to_column: String,
    pub new_position: usize,
}

impl TaskMove {
    pub fn is_reorder(&self) -> bool {
        self.from_column == self.to_column
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Columns were swapped on drop; positions are already renumbered
    ColumnsReordered { from: usize, to: usize },
    /// A task drag ended; `net` is its relocation since drag start
    TaskSettled { net: Option<TaskMove> },
    /// The drag ended without committing anything new
    Nothing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    state: DragState,
    /// Column id and index the dragged task started from
    origin: Option<(String, usize)>,
    /// Entities currently being edited inline
    edit_locks: HashSet<DragKey>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Key of the entity being dragged
    pub fn active(&self) -> Option<DragKey> {
        match &self.state {
            DragState::Idle => None,
            DragState::DraggingColumn(column) => Some(DragKey::Column(column.id.clone())),
            DragState::DraggingTask(task) => Some(DragKey::Task(task.id.clone())),
        }
    }

    pub fn lock_for_edit(&mut self, key: DragKey) {
        self.edit_locks.insert(key);
    }

    pub fn unlock(&mut self, key: &DragKey) {
        self.edit_locks.remove(key);
    }

    pub fn is_locked(&self, key: &DragKey) -> bool {
        self.edit_locks.contains(key)
    }

    /// Idle -> Dragging*. Captures the full entity for the preview.
    pub fn start(&mut self, board: &BoardState, key: DragKey) -> BoardResult<()> {
        if self.is_locked(&key) {
            return Err(BoardError::DragLocked { kind: key.kind(), id: key.id().to_string() });
        }
        let (state, origin) = match &key {
            DragKey::Column(id) => {
                let column = board
                    .column(id)
                    .ok_or_else(|| BoardError::stale(EntityKind::Column, id.as_str()))?;
                if !column.is_persisted() {
                    return Err(BoardError::Validation("Column is not saved yet".to_string()));
                }
                (DragState::DraggingColumn(column.clone()), None)
            }
            DragKey::Task(id) => {
                let (ci, ti) = board
                    .find_task(id)
                    .ok_or_else(|| BoardError::stale(EntityKind::Task, id.as_str()))?;
                let column = &board.columns()[ci];
                (DragState::DraggingTask(column.tasks[ti].clone()), Some((column.id.clone(), ti)))
            }
        };
        debug!("[DND] Drag start: {:?}", key);
        self.state = state;
        self.origin = origin;
        Ok(())
    }

    /// Live reorder while a task hovers `over`.
    /// Returns the move applied to the board, or None for a no-op step.
    pub fn over(&mut self, board: &mut BoardState, over: &DragKey) -> Option<TaskMove> {
        let active_id = match &self.state {
            DragState::DraggingTask(task) => task.id.clone(),
            _ => return None,
        };
        if matches!(over, DragKey::Task(id) if *id == active_id) {
            return None;
        }

        let Some((from_ci, from_ti)) = board.find_task(&active_id) else {
            debug!("[DND] Active task {} vanished from the board", active_id);
            return None;
        };
        let (to_ci, target) = match over {
            DragKey::Task(id) => board.find_task(id)?,
            DragKey::Column(id) => {
                let ci = board.column_index(id)?;
                let len = board.columns()[ci].tasks.len();
                // Own column body: end of the sequence once the task is lifted out
                (ci, if ci == from_ci { len - 1 } else { len })
            }
        };
        if to_ci == from_ci && target == from_ti {
            return None;
        }

        let from_column = board.columns()[from_ci].id.clone();
        let to_column = board.columns()[to_ci].id.clone();
        let landed = board.move_task(&active_id, &from_column, &to_column, target).ok()?;
        debug!("[DND] Live move {} {} -> {} @{}", active_id, from_column, to_column, landed);
        Some(TaskMove { task_id: active_id, from_column, to_column, new_position: landed })
    }

    /// Dragging* -> Idle on drop.
    pub fn drop(&mut self, board: &mut BoardState, over: Option<&DragKey>) -> DropOutcome {
        let origin = self.origin.take();
        match std::mem::take(&mut self.state) {
            DragState::Idle => DropOutcome::Nothing,
            DragState::DraggingColumn(column) => {
                // A card in the target column stands for its column
                let to = match over {
                    Some(DragKey::Column(id)) => board.column_index(id),
                    Some(DragKey::Task(id)) => board.find_task(id).map(|(ci, _)| ci),
                    None => None,
                };
                let (Some(from), Some(to)) = (board.column_index(&column.id), to) else {
                    return DropOutcome::Nothing;
                };
                if from == to {
                    return DropOutcome::Nothing;
                }
                match board.move_column(from, to) {
                    Ok(()) => DropOutcome::ColumnsReordered { from, to },
                    Err(_) => DropOutcome::Nothing,
                }
            }
            DragState::DraggingTask(task) => DropOutcome::TaskSettled { net: net_move(board, &task.id, origin) },
        }
    }

    /// Dragging* -> Idle without a drop target. With `restore`, a task
    /// that moved live is put back where the drag started.
    pub fn cancel(&mut self, board: &mut BoardState, restore: bool) -> Option<TaskMove> {
        let origin = self.origin.take();
        let DragState::DraggingTask(task) = std::mem::take(&mut self.state) else {
            return None;
        };
        let origin_index = origin.as_ref().map(|(_, index)| *index)?;
        let net = net_move(board, &task.id, origin)?;
        if restore {
            debug!("[DND] Cancel restores {} to {} @{}", net.task_id, net.from_column, origin_index);
            if let Err(err) = board.move_task(&net.task_id, &net.to_column, &net.from_column, origin_index) {
                debug!("[DND] Restore of {} skipped: {}", net.task_id, err);
            }
        }
        Some(net)
    }
}

/// Where a task is now relative to where it started
fn net_move(board: &BoardState, task_id: &str, origin: Option<(String, usize)>) -> Option<TaskMove> {
    let (origin_column, origin_index) = origin?;
    let (ci, ti) = board.find_task(task_id)?;
    let current_column = &board.columns()[ci].id;
    if *current_column == origin_column && ti == origin_index {
        return None;
    }
    Some(TaskMove {
        task_id: task_id.to_string(),
        from_column: origin_column,
        to_column: current_column.clone(),
        new_position: ti,
    })
}
