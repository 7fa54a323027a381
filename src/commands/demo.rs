//! Offline demo backend

use board_core::{Column, InMemoryBoardApi, Role, Task, UserSummary};
use chrono::{Duration, Local};

fn task(id: &str, title: &str, column_id: &str, days_due: Option<i64>, done: bool) -> Task {
    let mut task = Task::new(id, title, column_id);
    task.due_date = days_due.map(|d| Local::now().date_naive() + Duration::days(d));
    task.is_completed = done;
    task
}

fn user(id: &str, name: &str) -> UserSummary {
    UserSummary { id: id.to_string(), name: name.to_string(), role: Role::Developer }
}

/// In-memory backend seeded with a small board
pub fn demo_api(project_id: &str) -> InMemoryBoardApi {
    let mut todo = Column::new("todo", "To do", 0);
    todo.tasks = vec![
        task("t-1", "Sketch the landing page", "todo", Some(2), false),
        task("t-2", "Write onboarding copy", "todo", Some(9), false),
        task("t-3", "Collect customer quotes", "todo", None, false),
    ];
    let mut doing = Column::new("doing", "In progress", 1);
    doing.tasks = vec![task("t-4", "Set up CI pipeline", "doing", Some(0), false)];
    let mut done = Column::new("done", "Done", 2);
    done.tasks = vec![task("t-5", "Kick-off meeting", "done", Some(-3), true)];

    InMemoryBoardApi::new()
        .with_columns(project_id, vec![todo, doing, done])
        .with_users(vec![user("u-1", "Ada Lovelace"), user("u-2", "Alan Turing")])
}
