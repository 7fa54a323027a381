//! UI Components
//!
//! Reusable Leptos components.

mod column_container;
mod delete_confirm_button;
mod filter_options;
mod kanban_board;
mod notice_toast;
mod task_card;
mod task_description;

pub use column_container::ColumnContainer;
pub use delete_confirm_button::DeleteConfirmButton;
pub use filter_options::FilterOptions;
pub use kanban_board::KanbanBoard;
pub use notice_toast::NoticeToast;
pub use task_card::TaskCard;
pub use task_description::TaskDescription;
