//! End-to-end board scenarios against the in-memory backend

use serde_json::json;

use crate::api::{ApiError, Endpoint, HttpMethod, InMemoryBoardApi};
use crate::config::{BoardConfig, SyncMode};
use crate::domain::{BoardError, Column, Role, Subtask, Task, TaskUpdate, UserSummary};
use crate::drag::DragKey;
use crate::session::{BoardSession, NoticeLevel, NON_EMPTY_COLUMN_NOTICE};
use crate::sync::{execute, BoardCommand, Dispatch, SyncHealth};

const PROJECT: &str = "p1";

fn column(id: &str, position: u32, tasks: &[&str]) -> Column {
    let mut col = Column::new(id, format!("Column {}", id), position);
    col.tasks = tasks.iter().map(|t| Task::new(*t, t.to_uppercase(), id)).collect();
    col
}

fn server(columns: Vec<Column>) -> InMemoryBoardApi {
    InMemoryBoardApi::new().with_columns(PROJECT, columns)
}

fn session(role: Role, mode: SyncMode) -> BoardSession {
    let config = BoardConfig { sync_mode: mode, ..Default::default() };
    BoardSession::new(PROJECT, role, &config)
}

/// Execute dispatches in the order given and settle each one
async fn run(session: &mut BoardSession, api: &InMemoryBoardApi, dispatches: Vec<Dispatch>) {
    for dispatch in dispatches {
        let result = execute(api, PROJECT, &dispatch.command).await;
        session.settle(dispatch.seq, result);
    }
}

async fn loaded(role: Role, mode: SyncMode, api: &InMemoryBoardApi) -> BoardSession {
    let mut session = session(role, mode);
    let load = session.load();
    run(&mut session, api, vec![load]).await;
    assert!(session.is_loaded());
    api.clear_calls();
    session
}

fn ids(session: &BoardSession, column_id: &str) -> Vec<String> {
    session.board().column(column_id).unwrap().tasks.iter().map(|t| t.id.clone()).collect()
}

fn column_ids(session: &BoardSession) -> Vec<String> {
    session.columns().iter().map(|c| c.id.clone()).collect()
}

fn task(id: &str) -> DragKey {
    DragKey::Task(id.to_string())
}

fn col(id: &str) -> DragKey {
    DragKey::Column(id.to_string())
}

// ============================================================================
// Column ordering
// ============================================================================

#[tokio::test]
async fn test_drop_column_on_next_column_swaps_and_persists_positions() {
    let api = server(vec![column("A", 0, &[]), column("B", 1, &[])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.drag_start(col("A")).unwrap();
    assert!(session.drag_over(col("B")).is_empty());
    let dispatches = session.drag_end(Some(col("B")));

    assert_eq!(column_ids(&session), vec!["B", "A"]);
    assert_eq!(dispatches.len(), 1);
    run(&mut session, &api, dispatches).await;

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/projects/p1/updateColumnPositions");
    assert_eq!(
        calls[0].body,
        Some(json!({ "columnPositions": [{ "id": "B", "position": 0 }, { "id": "A", "position": 1 }] }))
    );
    let server_order: Vec<_> = api.snapshot(PROJECT).into_iter().map(|c| c.id).collect();
    assert_eq!(server_order, vec!["B", "A"]);
}

#[tokio::test]
async fn test_drop_column_on_card_of_other_column_swaps() {
    let api = server(vec![column("A", 0, &["t1"]), column("B", 1, &["t4"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.drag_start(col("A")).unwrap();
    assert!(session.drag_over(task("t4")).is_empty());
    let dispatches = session.drag_end(Some(task("t4")));

    assert_eq!(column_ids(&session), vec!["B", "A"]);
    assert_eq!(dispatches.len(), 1);
    run(&mut session, &api, dispatches).await;
    let server_order: Vec<_> = api.snapshot(PROJECT).into_iter().map(|c| c.id).collect();
    assert_eq!(server_order, vec!["B", "A"]);
}

#[tokio::test]
async fn test_create_column_uses_max_position_plus_one() {
    let api = server(vec![column("A", 0, &[]), column("B", 5, &[])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;

    let dispatch = session.create_column(None).unwrap();
    assert_eq!(dispatch.command, BoardCommand::CreateColumn { title: "Column 3".into(), position: 6 });
    run(&mut session, &api, vec![dispatch]).await;

    assert_eq!(session.columns().len(), 3);
    assert_eq!(session.columns()[2].position, 6);
    assert!(session.needs_refetch());
    let notices = session.take_notices();
    assert_eq!(notices[0].message, "New column created!");
}

#[tokio::test]
async fn test_delete_column_renumbers_remaining() {
    let api = server(vec![column("A", 0, &[]), column("B", 1, &[]), column("C", 2, &[])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    let dispatch = session.delete_column("B").unwrap();
    run(&mut session, &api, vec![dispatch]).await;

    assert_eq!(column_ids(&session), vec!["A", "C"]);
    let positions: Vec<u32> = session.columns().iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert!(session.needs_refetch());
}

#[tokio::test]
async fn test_developer_cannot_delete_non_empty_column() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;

    let err = session.delete_column("A").unwrap_err();
    assert_eq!(err, BoardError::Validation(NON_EMPTY_COLUMN_NOTICE.to_string()));
    assert!(api.calls().is_empty());
    assert_eq!(column_ids(&session), vec!["A"]);

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Developers can only delete empty columns.");
}

#[tokio::test]
async fn test_rename_column_commits_locally_at_once() {
    let api = server(vec![column("A", 0, &[])]);
    let mut session = loaded(Role::PrManager, SyncMode::PerHover, &api).await;

    let dispatch = session.rename_column("A", "  Backlog ").unwrap().unwrap();
    assert_eq!(session.columns()[0].title, "Backlog");
    assert!(session.rename_column("A", "Backlog").unwrap().is_none());
    assert!(session.rename_column("A", "   ").unwrap().is_none());

    run(&mut session, &api, vec![dispatch]).await;
    assert_eq!(api.snapshot(PROJECT)[0].title, "Backlog");
}

// ============================================================================
// Task drags
// ============================================================================

#[tokio::test]
async fn test_drag_task_into_empty_column_issues_one_move() {
    let api = server(vec![column("A", 0, &["t1", "t2"]), column("B", 1, &[])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.drag_start(task("t1")).unwrap();
    let mut dispatches = session.drag_over(col("B"));
    dispatches.extend(session.drag_end(Some(col("B"))));

    assert_eq!(ids(&session, "A"), vec!["t2"]);
    assert_eq!(ids(&session, "B"), vec!["t1"]);
    assert_eq!(dispatches.len(), 1);
    assert_eq!(
        dispatches[0].command,
        BoardCommand::MoveTask {
            from_column: "A".into(),
            to_column: "B".into(),
            task_id: "t1".into(),
            new_position: 0
        }
    );

    run(&mut session, &api, dispatches).await;
    assert_eq!(
        api.calls(),
        vec![Endpoint {
            method: HttpMethod::Post,
            path: "/projects/p1/columns/A/tasks/t1/move/B".into(),
            body: Some(json!({ "newPosition": 0 })),
        }]
    );
    assert_eq!(session.health(), SyncHealth::InSync);
}

#[tokio::test]
async fn test_drop_task_on_itself_changes_nothing() {
    let api = server(vec![column("A", 0, &["t1", "t2"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;
    let before = session.board().clone();

    session.drag_start(task("t1")).unwrap();
    assert!(session.drag_over(task("t1")).is_empty());
    assert!(session.drag_end(Some(task("t1"))).is_empty());

    assert_eq!(session.board(), &before);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_task_positions_track_array_order() {
    let api = server(vec![column("A", 0, &["t1", "t2", "t3"]), column("B", 1, &["t4"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.drag_start(task("t3")).unwrap();
    let mut dispatches = session.drag_over(task("t1"));
    dispatches.extend(session.drag_over(task("t4")));
    dispatches.extend(session.drag_end(Some(task("t4"))));
    run(&mut session, &api, dispatches).await;

    for column in session.columns() {
        for (index, task) in column.tasks.iter().enumerate() {
            assert_eq!(task.position as usize, index);
            assert_eq!(task.column_id, column.id);
        }
    }
    assert_eq!(session.board().task_count(), 4);
    assert_eq!(ids(&session, "B"), vec!["t3", "t4"]);

    // Server converged on the same order
    let server = api.snapshot(PROJECT);
    let server_b: Vec<_> = server[1].tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(server_b, vec!["t3", "t4"]);
}

#[tokio::test]
async fn test_out_of_order_moves_leave_last_received_order() {
    let api = server(vec![column("A", 0, &["t1", "t2", "t3"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.drag_start(task("t1")).unwrap();
    let first = session.drag_over(task("t2")).remove(0);
    let second = session.drag_over(task("t3")).remove(0);
    session.drag_end(Some(task("t3")));
    assert_eq!(ids(&session, "A"), vec!["t2", "t3", "t1"]);

    // Network reorders: the later step arrives first
    run(&mut session, &api, vec![second, first]).await;

    let server: Vec<_> = api.snapshot(PROJECT)[0].tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(server, vec!["t2", "t1", "t3"]);
    assert_eq!(session.health(), SyncHealth::InSync);
}

#[tokio::test]
async fn test_on_drop_mode_emits_single_net_move() {
    let api = server(vec![column("A", 0, &["t1", "t2"]), column("B", 1, &["t3"])]);
    let mut session = loaded(Role::Admin, SyncMode::OnDrop, &api).await;

    session.drag_start(task("t1")).unwrap();
    assert!(session.drag_over(task("t2")).is_empty());
    assert!(session.drag_over(col("B")).is_empty());
    assert!(session.drag_over(task("t3")).is_empty());
    let dispatches = session.drag_end(Some(task("t3")));

    assert_eq!(dispatches.len(), 1);
    assert_eq!(
        dispatches[0].command,
        BoardCommand::MoveTask {
            from_column: "A".into(),
            to_column: "B".into(),
            task_id: "t1".into(),
            new_position: 0
        }
    );
    run(&mut session, &api, dispatches).await;
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_on_drop_cancel_restores_origin_without_calls() {
    let api = server(vec![column("A", 0, &["t1", "t2"]), column("B", 1, &[])]);
    let mut session = loaded(Role::Admin, SyncMode::OnDrop, &api).await;
    let before = session.board().clone();

    session.drag_start(task("t2")).unwrap();
    session.drag_over(col("B"));
    assert_eq!(ids(&session, "B"), vec!["t2"]);
    session.drag_cancel();

    assert_eq!(session.board(), &before);
    assert!(session.drag().is_idle());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_edit_lock_blocks_drag() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    session.lock_for_edit(col("A"));
    assert!(matches!(session.drag_start(col("A")), Err(BoardError::DragLocked { .. })));
    session.unlock(&col("A"));
    assert!(session.drag_start(col("A")).is_ok());
}

// ============================================================================
// Reconciliation
// ============================================================================

#[tokio::test]
async fn test_failed_move_diverges_until_reload() {
    let api = server(vec![column("A", 0, &["t1"]), column("B", 1, &[])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;
    api.fail_matching("/move/");

    session.drag_start(task("t1")).unwrap();
    let dispatches = session.drag_over(col("B"));
    session.drag_end(Some(col("B")));
    run(&mut session, &api, dispatches).await;

    // No rollback: the optimistic order stays until reload
    assert_eq!(ids(&session, "B"), vec!["t1"]);
    assert!(session.health().is_diverged());

    api.recover();
    let reload = session.load();
    run(&mut session, &api, vec![reload]).await;

    assert_eq!(ids(&session, "A"), vec!["t1"]);
    assert_eq!(session.health(), SyncHealth::InSync);
}

#[tokio::test]
async fn test_stale_snapshot_is_discarded() {
    let api = server(vec![column("A", 0, &["t1", "t2"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    // Snapshot fetched before the move reaches the server
    let reload = session.load();
    let snapshot = execute(&api, PROJECT, &reload.command).await;

    session.drag_start(task("t1")).unwrap();
    let moves = session.drag_over(task("t2"));
    session.drag_end(Some(task("t2")));

    session.settle(reload.seq, snapshot);
    assert_eq!(ids(&session, "A"), vec!["t2", "t1"]);
    assert!(!session.needs_refetch());

    run(&mut session, &api, moves).await;
    assert!(session.needs_refetch());

    let reload = session.load();
    run(&mut session, &api, vec![reload]).await;
    assert_eq!(ids(&session, "A"), vec!["t2", "t1"]);
    assert!(!session.needs_refetch());
}

#[tokio::test]
async fn test_failed_load_leaves_empty_board() {
    let api = server(vec![column("A", 0, &["t1"])]);
    api.set_offline(true);
    let mut session = session(Role::Admin, SyncMode::PerHover);

    let load = session.load();
    run(&mut session, &api, vec![load]).await;

    assert!(session.columns().is_empty());
    assert!(!session.is_loaded());
    assert!(matches!(
        session.health(),
        SyncHealth::Diverged { failures: 1, .. }
    ));
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn test_failed_stale_refetch_keeps_board_and_drag() {
    let api = server(vec![column("A", 0, &["t1", "t2"]), column("B", 1, &["t3"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    let refetch = session.load();
    session.drag_start(task("t1")).unwrap();
    let moves = session.drag_over(col("B"));
    assert_eq!(moves.len(), 1);

    session.settle(refetch.seq, Err(ApiError::Network("connection reset".into())));

    assert_eq!(ids(&session, "A"), vec!["t2"]);
    assert_eq!(ids(&session, "B"), vec!["t3", "t1"]);
    assert!(session.health().is_diverged());

    // The drag keeps working after the failed refetch
    assert_eq!(session.drag_over(task("t3")).len(), 1);
    assert_eq!(ids(&session, "B"), vec!["t1", "t3"]);
    session.drag_end(Some(task("t3")));
    run(&mut session, &api, moves).await;
    assert!(session.drag().is_idle());
}

#[tokio::test]
async fn test_create_task_appends_on_settle() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::PrManager, SyncMode::PerHover, &api).await;

    let dispatch = session.create_task("A").unwrap();
    assert_eq!(session.board().task_count(), 1);
    run(&mut session, &api, vec![dispatch]).await;

    let tasks = &session.board().column("A").unwrap().tasks;
    assert_eq!(tasks.len(), 2);
    assert!(tasks[1].is_blank());
    assert_eq!(tasks[1].position, 1);
}

#[tokio::test]
async fn test_delete_task_removes_on_success_only() {
    let api = server(vec![column("A", 0, &["t1", "t2"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    api.set_offline(true);
    let failed = session.delete_task("t1").unwrap();
    run(&mut session, &api, vec![failed]).await;
    assert_eq!(ids(&session, "A"), vec!["t1", "t2"]);
    assert_eq!(session.take_notices()[0].message, "Failed to delete task.");

    api.recover();
    let dispatch = session.delete_task("t1").unwrap();
    run(&mut session, &api, vec![dispatch]).await;
    assert_eq!(ids(&session, "A"), vec!["t2"]);
    assert_eq!(session.board().task("t2").unwrap().position, 0);
}

// ============================================================================
// Field updates and permissions
// ============================================================================

#[tokio::test]
async fn test_field_updates_are_optimistic_and_independent() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    let done = session.update_task("t1", TaskUpdate::Completion(true)).unwrap().unwrap();
    let assign = session
        .update_task("t1", TaskUpdate::Assignees(vec!["u1".into(), "u2".into()]))
        .unwrap()
        .unwrap();
    let task = session.board().task("t1").unwrap();
    assert!(task.is_completed);
    assert_eq!(task.assignees, vec!["u1", "u2"]);

    run(&mut session, &api, vec![done, assign]).await;
    let paths: Vec<_> = api.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/projects/p1/columns/A/tasks/t1", "/projects/p1/columns/A/tasks/t1/assign"]);
    let messages: Vec<_> = session.take_notices().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["Task marked as completed!", "Users assigned successfully!"]);
}

#[tokio::test]
async fn test_title_edits_are_trimmed_and_failures_silent() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;

    assert!(session.update_task("t1", TaskUpdate::Title("   ".into())).unwrap().is_none());
    assert!(session.update_task("t1", TaskUpdate::Title("T1".into())).unwrap().is_none());

    api.fail_matching("/title");
    let dispatch = session
        .update_task("t1", TaskUpdate::Title("  Renamed ".into()))
        .unwrap()
        .unwrap();
    assert_eq!(session.board().task("t1").unwrap().title, "Renamed");
    run(&mut session, &api, vec![dispatch]).await;

    assert!(session.take_notices().is_empty());
    assert!(session.health().is_diverged());
}

#[tokio::test]
async fn test_failed_status_update_raises_notice() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;
    api.set_offline(true);

    let dispatch = session.update_task("t1", TaskUpdate::Completion(true)).unwrap().unwrap();
    run(&mut session, &api, vec![dispatch]).await;

    // No rollback
    assert!(session.board().task("t1").unwrap().is_completed);
    let notices = session.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Failed to update task status.");
}

#[tokio::test]
async fn test_developer_restrictions() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;

    assert!(matches!(session.create_task("A"), Err(BoardError::PermissionDenied { .. })));
    assert!(matches!(session.delete_task("t1"), Err(BoardError::PermissionDenied { .. })));
    assert!(matches!(
        session.update_task("t1", TaskUpdate::Assignees(vec!["u1".into()])),
        Err(BoardError::PermissionDenied { .. })
    ));
    assert!(matches!(
        session.update_task("t1", TaskUpdate::DueDate(None)),
        Err(BoardError::PermissionDenied { .. })
    ));
    assert!(session.update_task("t1", TaskUpdate::Completion(true)).is_ok());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_task_is_stale_reference() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Admin, SyncMode::PerHover, &api).await;

    assert!(matches!(
        session.update_task("gone", TaskUpdate::Completion(true)),
        Err(BoardError::StaleReference { .. })
    ));
    assert!(matches!(session.delete_column("gone"), Err(BoardError::StaleReference { .. })));
}

// ============================================================================
// Subtasks and users
// ============================================================================

#[tokio::test]
async fn test_subtask_lifecycle() {
    let api = server(vec![column("A", 0, &["t1"])]);
    let mut session = loaded(Role::Developer, SyncMode::PerHover, &api).await;

    let add = session.add_subtask("t1", " Write tests ").unwrap().unwrap();
    run(&mut session, &api, vec![add]).await;
    let subtasks = &session.board().task("t1").unwrap().subtasks;
    assert_eq!(subtasks.len(), 1);
    let sub_id = subtasks[0].id.clone();

    let toggle = session.set_subtask_completed("t1", &sub_id, true).unwrap();
    let rename = session.rename_subtask("t1", &sub_id, "Write more tests").unwrap().unwrap();
    run(&mut session, &api, vec![toggle, rename]).await;

    let expected = Subtask { id: sub_id.clone(), content: "Write more tests".into(), is_completed: true };
    assert_eq!(session.board().task("t1").unwrap().subtasks, vec![expected]);

    let delete = session.delete_subtask("t1", &sub_id).unwrap();
    assert!(session.board().task("t1").unwrap().subtasks.is_empty());
    run(&mut session, &api, vec![delete]).await;

    let reload = session.load_subtasks("t1").unwrap();
    run(&mut session, &api, vec![reload]).await;
    assert!(session.board().task("t1").unwrap().subtasks.is_empty());
    assert_eq!(session.health(), SyncHealth::InSync);
}

#[tokio::test]
async fn test_assignable_users_are_loaded() {
    let users = vec![UserSummary { id: "u1".into(), name: "Grace Hopper".into(), role: Role::Developer }];
    let api = server(vec![]).with_users(users.clone());
    let mut session = session(Role::Admin, SyncMode::PerHover);

    let dispatch = session.load_assignable_users();
    run(&mut session, &api, vec![dispatch]).await;
    assert_eq!(session.assignable_users(), users.as_slice());
}

#[tokio::test]
async fn test_execute_surfaces_api_errors() {
    let api = server(vec![column("A", 0, &[])]);
    let result = execute(&api, PROJECT, &BoardCommand::DeleteColumn { column_id: "missing".into() }).await;
    assert!(matches!(result, Err(ApiError::Http { status: 404, .. })));
}
