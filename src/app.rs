//! Kanban Board App
//!
//! Builds the session, picks the backend and mounts the board.

use std::rc::Rc;

use board_core::{BoardApi, BoardSession, Capability, DragKey, HttpBoardApi};
use leptos::prelude::*;
use leptos_dragdrop::create_dnd_signals;
use reactive_stores::Store;

use crate::commands;
use crate::components::{KanbanBoard, NoticeToast, TaskDescription};
use crate::config::PageConfig;
use crate::context::BoardContext;
use crate::store::UiState;

#[component]
pub fn App(page: PageConfig) -> impl IntoView {
    let session = RwSignal::new(BoardSession::new(page.project_id.clone(), page.role, &page.board));
    let api: Rc<dyn BoardApi> = if page.demo {
        Rc::new(commands::demo_api(&page.project_id))
    } else {
        Rc::new(HttpBoardApi::new(page.board.api_base_url.clone()))
    };
    let store = Store::new(UiState::restored());
    let dnd = create_dnd_signals::<DragKey>(page.board.drag_threshold_px);

    let ctx = BoardContext::new(session, api, store, dnd);
    provide_context(ctx);
    provide_context(store);

    // Initial load
    ctx.reload();
    if session.with_untracked(|s| s.can(Capability::AssignTasks)) {
        ctx.act(|s| s.load_assignable_users());
    }

    let role = page.role;
    let project_id = page.project_id.clone();

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Kanban Board"</h1>
                <span class="project-name">{project_id}</span>
                <span class="role-badge">{role.as_str()}</span>
            </header>

            <KanbanBoard />
            <TaskDescription />
            <NoticeToast />
        </div>
    }
}
