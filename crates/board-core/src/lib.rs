//! Kanban board ordering engine
//!
//! Columns of ordered tasks, drag sessions spanning columns, and
//! reconciliation of local order with a REST backend.

pub mod api;
pub mod board;
pub mod config;
pub mod domain;
pub mod drag;
pub mod sync;

mod session;

#[cfg(test)]
mod tests;

pub use api::{ApiError, ApiResult, BoardApi, HttpBoardApi, InMemoryBoardApi};
pub use board::{BoardState, TaskFilter};
pub use config::{BoardConfig, ConfigError, SyncMode, CONFIG_STORAGE_KEY};
pub use domain::{
    BoardError, BoardResult, Capability, Column, ColumnPosition, EntityKind, Permissions, Role, Subtask, Task,
    TaskUpdate, UserSummary,
};
pub use drag::{DragKey, DragState};
pub use session::{BoardSession, Notice, NoticeLevel, NON_EMPTY_COLUMN_NOTICE};
pub use sync::{execute, BoardCommand, Dispatch, Reply, SyncHealth};
