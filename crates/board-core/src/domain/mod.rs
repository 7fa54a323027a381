//! Domain Layer
//!
//! Board entities, roles and the board error type.
//! This layer has no I/O.

mod entity;
mod column;
mod task;
mod subtask;
mod role;
mod user;
pub(crate) mod wire;

pub use entity::{index_of, BoardError, BoardResult, Entity, EntityKind};
pub use column::{Column, ColumnPosition};
pub use task::{Task, TaskUpdate};
pub use subtask::Subtask;
pub use role::{Capability, Permissions, Role};
pub use user::UserSummary;
