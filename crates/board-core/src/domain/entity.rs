//! Domain Layer - Core Entity Trait
//!
//! Basic contract shared by columns, tasks and subtasks, plus the
//! board-level error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::role::{Capability, Role};
use crate::api::ApiError;

/// Core trait for all board entities
pub trait Entity: Sized + Clone {
    /// Kind used in diagnostics
    const KIND: EntityKind;

    /// Returns the entity's server identifier (empty until persisted)
    fn id(&self) -> &str;
}

/// Find the index of an entity by id
pub fn index_of<T: Entity>(entities: &[T], id: &str) -> Option<usize> {
    entities.iter().position(|e| e.id() == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Column,
    Task,
    Subtask,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Column => write!(f, "Column"),
            EntityKind::Task => write!(f, "Task"),
            EntityKind::Subtask => write!(f, "Subtask"),
        }
    }
}

/// Common result type for board operations
pub type BoardResult<T> = Result<T, BoardError>;

/// Board-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("{kind} {id} no longer exists on this board")]
    StaleReference { kind: EntityKind, id: String },

    #[error("Permission denied: {role} cannot {capability}")]
    PermissionDenied { role: Role, capability: Capability },

    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} is being edited and cannot be dragged")]
    DragLocked { kind: EntityKind, id: String },

    #[error("Index {index} is out of bounds for {len} columns")]
    OutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BoardError {
    pub fn stale(kind: EntityKind, id: impl Into<String>) -> Self {
        BoardError::StaleReference { kind, id: id.into() }
    }
}
