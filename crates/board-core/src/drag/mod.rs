//! Drag Session Layer
//!
//! State machine for dragging columns and tasks over the board.

mod session;

pub use session::{DragKey, DragSession, DragState, DropOutcome, TaskMove};
