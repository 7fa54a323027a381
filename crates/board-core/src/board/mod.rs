//! Board Layer
//!
//! Local board state and the positioning rules it relies on.

mod state;
mod positioning;
mod filter;

pub use state::BoardState;
pub use positioning::{array_move, next_position, positions_of, renumber};
pub use filter::{week_bounds, TaskFilter};
