//! Column Container Component
//!
//! One board column: editable title, task list and column actions.

use board_core::{Capability, DragKey};
use chrono::Local;
use leptos::prelude::*;
use leptos_dragdrop::{make_on_hover, make_on_mousedown};

use crate::commands::on_hover;
use crate::components::{DeleteConfirmButton, TaskCard};
use crate::context::use_board;
use crate::store::store_filter;

#[component]
pub fn ColumnContainer(column_id: String) -> impl IntoView {
    let ctx = use_board();
    let session = ctx.session;
    let store = ctx.store;
    let dnd = ctx.dnd;
    let key = DragKey::Column(column_id.clone());

    let column = {
        let id = column_id.clone();
        Memo::new(move |_| session.with(|s| s.board().column(&id).cloned()))
    };
    let title = move || column.get().map(|c| c.title).unwrap_or_default();
    let task_count = move || column.get().map(|c| c.tasks.len()).unwrap_or(0);

    let visible_tasks = move || {
        let filter = store_filter(&store);
        let today = Local::now().date_naive();
        column
            .get()
            .map(|c| {
                c.tasks
                    .into_iter()
                    .filter(|t| filter.matches(t, today))
                    .map(|t| t.id)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };

    // Inline title editing locks the column against dragging
    let (editing, set_editing) = signal(false);
    let start_edit = {
        let key = key.clone();
        move |_| {
            if session.with_untracked(|s| s.can(Capability::RenameColumns)) {
                session.update(|s| s.lock_for_edit(key.clone()));
                set_editing.set(true);
            }
        }
    };
    let commit_edit = {
        let key = key.clone();
        let id = column_id.clone();
        move |value: String| {
            set_editing.set(false);
            session.update(|s| s.unlock(&key));
            let id = id.clone();
            ctx.act(move |s| s.rename_column(&id, &value));
        }
    };
    let commit_on_key = commit_edit.clone();

    let is_dragging = {
        let key = key.clone();
        move || dnd.dragging_read.get().as_ref() == Some(&key)
    };
    let is_drop_target = {
        let key = key.clone();
        let id = column_id.clone();
        move || {
            if !matches!(dnd.dragging_read.get(), Some(DragKey::Column(_))) {
                return false;
            }
            match dnd.over_read.get() {
                Some(DragKey::Task(task_id)) => {
                    session.with(|s| s.board().task(&task_id).is_some_and(|t| t.column_id == id))
                }
                over => over.as_ref() == Some(&key),
            }
        }
    };
    let column_class = move || {
        let mut c = String::from("column");
        if is_dragging() {
            c.push_str(" dragging");
        }
        if is_drop_target() {
            c.push_str(" drop-target");
        }
        c
    };

    let can_delete = move || session.with(|s| s.can(Capability::DeleteColumns));
    let can_create_task = move || session.with(|s| s.can(Capability::CreateTasks));
    let delete_id = column_id.clone();
    let add_task_id = column_id.clone();

    view! {
        <div class=column_class on:mouseover=make_on_hover(dnd, key.clone(), on_hover(ctx))>
            <div class="column-header" on:mousedown=make_on_mousedown(dnd, key.clone())>
                <span class="task-count">{task_count}</span>
                <Show
                    when=move || editing.get()
                    fallback=move || view! { <h2 class="column-title" on:click=start_edit.clone()>{title}</h2> }
                >
                    <input
                        class="column-title-input"
                        prop:value=title
                        autofocus=true
                        on:blur={
                            let commit = commit_edit.clone();
                            move |ev| commit(event_target_value(&ev))
                        }
                        on:keydown={
                            let commit = commit_on_key.clone();
                            move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" {
                                    commit(event_target_value(&ev));
                                }
                            }
                        }
                    />
                </Show>
                <Show when=can_delete>
                    <DeleteConfirmButton
                        button_class="column-delete-btn"
                        on_confirm={
                            let id = delete_id.clone();
                            Callback::new(move |_| {
                                let id = id.clone();
                                ctx.act(move |s| s.delete_column(&id));
                            })
                        }
                    />
                </Show>
            </div>

            <div class="column-tasks">
                <For
                    each=visible_tasks
                    key=|task_id| task_id.clone()
                    children=move |task_id| view! { <TaskCard task_id=task_id /> }
                />
            </div>

            <button
                class="add-task-btn"
                disabled=move || !can_create_task()
                on:click=move |_| {
                    let id = add_task_id.clone();
                    ctx.act(move |s| s.create_task(&id));
                }
            >
                "+ Add task"
            </button>
        </div>
    }
}
