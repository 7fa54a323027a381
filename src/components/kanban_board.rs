//! Kanban Board Component
//!
//! Column strip with drag-and-drop, sync status and the add-column button.

use board_core::{Capability, DragState, SyncHealth};
use leptos::prelude::*;
use leptos_dragdrop::make_on_mouseleave;

use crate::commands::bind_board_dnd;
use crate::components::{ColumnContainer, FilterOptions};
use crate::context::use_board;

#[component]
pub fn KanbanBoard() -> impl IntoView {
    let ctx = use_board();
    let session = ctx.session;
    let dnd = ctx.dnd;

    bind_board_dnd(ctx);

    let column_keys = move || {
        session.with(|s| {
            s.columns()
                .iter()
                .enumerate()
                .map(|(index, column)| (column.render_key(index), column.id.clone()))
                .collect::<Vec<_>>()
        })
    };

    let health = move || session.with(|s| s.health());
    let can_add_column = move || session.with(|s| s.can(Capability::AddColumns));

    let preview = move || {
        session.with(|s| match s.drag().state() {
            DragState::Idle => None,
            DragState::DraggingColumn(column) => Some(format!("Column: {}", column.title)),
            DragState::DraggingTask(task) => Some(format!("Task: {}", task.title)),
        })
    };

    view! {
        <div class="board-toolbar">
            <FilterOptions />
            {move || match health() {
                SyncHealth::Diverged { failures, .. } => view! {
                    <div class="sync-banner">
                        {format!("{} change(s) could not be saved. The board may be out of date.", failures)}
                        <button on:click=move |_| ctx.reload()>"Reload"</button>
                    </div>
                }
                .into_any(),
                SyncHealth::Syncing { in_flight } => view! {
                    <span class="sync-status">{format!("Saving {}…", in_flight)}</span>
                }
                .into_any(),
                SyncHealth::InSync => view! { <span class="sync-status">"Saved"</span> }.into_any(),
            }}
        </div>

        <div class="board" on:mouseleave=make_on_mouseleave(dnd)>
            <For
                each=column_keys
                key=|(render_key, _)| render_key.clone()
                children=move |(_, column_id)| view! { <ColumnContainer column_id=column_id /> }
            />

            <Show when=can_add_column>
                <button class="add-column-btn" on:click=move |_| ctx.act(|s| s.create_column(None))>
                    "+ Add Column"
                </button>
            </Show>
        </div>

        {move || preview().map(|label| view! { <div class="drag-preview">{label}</div> })}
    }
}
