//! Task Card Component
//!
//! Draggable card with inline title editing, completion, due date and
//! assignees. Controls follow the caller's capabilities.

use board_core::{Capability, DragKey, TaskUpdate};
use chrono::NaiveDate;
use leptos::prelude::*;
use leptos_dragdrop::{make_on_hover, make_on_mousedown};

use crate::commands::on_hover;
use crate::components::DeleteConfirmButton;
use crate::context::use_board;
use crate::store::store_open_task;

#[component]
pub fn TaskCard(task_id: String) -> impl IntoView {
    let ctx = use_board();
    let session = ctx.session;
    let store = ctx.store;
    let dnd = ctx.dnd;
    let key = DragKey::Task(task_id.clone());

    let task = {
        let id = task_id.clone();
        Memo::new(move |_| session.with(|s| s.board().task(&id).cloned()))
    };
    let title = move || task.get().map(|t| t.title).unwrap_or_default();
    let completed = move || task.get().is_some_and(|t| t.is_completed);
    let due_value = move || {
        task.get()
            .and_then(|t| t.due_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    let can = move |capability: Capability| session.with(|s| s.can(capability));

    // Blank cards open straight into the title editor
    let starts_blank = task.get_untracked().is_some_and(|t| t.is_blank());
    let (editing, set_editing) = signal(starts_blank);
    if starts_blank {
        let key = key.clone();
        request_animation_frame(move || session.update(|s| s.lock_for_edit(key)));
    }

    let update = {
        let id = task_id.clone();
        move |update: TaskUpdate| {
            let id = id.clone();
            ctx.act(move |s| s.update_task(&id, update));
        }
    };

    let start_edit = {
        let key = key.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            session.update(|s| s.lock_for_edit(key.clone()));
            set_editing.set(true);
        }
    };
    let commit_title = {
        let key = key.clone();
        let update = update.clone();
        move |value: String| {
            set_editing.set(false);
            session.update(|s| s.unlock(&key));
            update(TaskUpdate::Title(value));
        }
    };

    let assigned = move || {
        let ids = task.get().map(|t| t.assignees).unwrap_or_default();
        session.with(|s| {
            ids.iter()
                .map(|id| {
                    let label = s
                        .assignable_users()
                        .iter()
                        .find(|u| &u.id == id)
                        .map(|u| u.initials())
                        .unwrap_or_else(|| "?".to_string());
                    (id.clone(), label)
                })
                .collect::<Vec<_>>()
        })
    };
    let unassigned_users = move || {
        let ids = task.get().map(|t| t.assignees).unwrap_or_default();
        session.with(|s| {
            s.assignable_users()
                .iter()
                .filter(|u| !ids.contains(&u.id))
                .map(|u| (u.id.clone(), u.name.clone()))
                .collect::<Vec<_>>()
        })
    };

    let is_dragging = {
        let key = key.clone();
        move || dnd.dragging_read.get().as_ref() == Some(&key)
    };
    let card_class = move || {
        let mut c = String::from("task-card");
        if completed() {
            c.push_str(" completed");
        }
        if is_dragging() {
            c.push_str(" dragging");
        }
        c
    };

    let open_id = task_id.clone();
    let delete_id = task_id.clone();
    let update_due = update.clone();
    let update_assign = update.clone();

    view! {
        <div
            class=card_class
            on:mousedown=make_on_mousedown(dnd, key.clone())
            on:mouseover=make_on_hover(dnd, key.clone(), on_hover(ctx))
            on:click=move |_| {
                if !dnd.drag_just_ended_read.get_untracked() && !editing.get_untracked() {
                    store_open_task(&store, Some(open_id.clone()));
                }
            }
        >
            <div class="task-row">
                <input
                    type="checkbox"
                    class="task-complete"
                    title="Mark as completed"
                    prop:checked=completed
                    disabled=move || !can(Capability::UpdateTaskStatus)
                    on:click=|ev| ev.stop_propagation()
                    on:change={
                        let update = update.clone();
                        move |ev| update(TaskUpdate::Completion(event_target_checked(&ev)))
                    }
                />
                <Show
                    when=move || editing.get()
                    fallback=move || view! {
                        <span class="task-title" on:dblclick=start_edit.clone()>{title}</span>
                    }
                >
                    <textarea
                        class="task-title-input"
                        placeholder="Task title"
                        prop:value=title
                        autofocus=true
                        on:click=|ev| ev.stop_propagation()
                        on:blur={
                            let commit = commit_title.clone();
                            move |ev| commit(event_target_value(&ev))
                        }
                        on:keydown={
                            let commit = commit_title.clone();
                            move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" && !ev.shift_key() {
                                    ev.prevent_default();
                                    commit(event_target_value(&ev));
                                }
                            }
                        }
                    />
                </Show>
                <Show when=move || can(Capability::DeleteTasks)>
                    <DeleteConfirmButton
                        button_class="task-delete-btn"
                        on_confirm={
                            let id = delete_id.clone();
                            Callback::new(move |_| {
                                let id = id.clone();
                                ctx.act(move |s| s.delete_task(&id));
                            })
                        }
                    />
                </Show>
            </div>

            <div class="task-meta">
                <Show
                    when=move || can(Capability::SetDueDates)
                    fallback=move || view! { <span class="task-due">{due_value}</span> }
                >
                    <input
                        type="date"
                        class="task-due-input"
                        prop:value=due_value
                        on:click=|ev| ev.stop_propagation()
                        on:change={
                            let update = update_due.clone();
                            move |ev| {
                                let raw = event_target_value(&ev);
                                let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok();
                                update(TaskUpdate::DueDate(date));
                            }
                        }
                    />
                </Show>

                <div class="task-assignees">
                    <For
                        each=assigned
                        key=|(id, _)| id.clone()
                        children={
                            let update = update.clone();
                            move |(user_id, initials)| {
                                let update = update.clone();
                                view! {
                                    <span
                                        class="avatar"
                                        title="Click to unassign"
                                        on:click=move |ev| {
                                            ev.stop_propagation();
                                            if !can(Capability::AssignTasks) {
                                                return;
                                            }
                                            let mut ids = task.get_untracked().map(|t| t.assignees).unwrap_or_default();
                                            ids.retain(|id| *id != user_id);
                                            update(TaskUpdate::Assignees(ids));
                                        }
                                    >
                                        {initials}
                                    </span>
                                }
                            }
                        }
                    />
                    <Show when=move || can(Capability::AssignTasks)>
                        <select
                            class="assign-select"
                            on:click=|ev| ev.stop_propagation()
                            on:change={
                                let update = update_assign.clone();
                                move |ev| {
                                    let user_id = event_target_value(&ev);
                                    if user_id.is_empty() {
                                        return;
                                    }
                                    let mut ids = task.get_untracked().map(|t| t.assignees).unwrap_or_default();
                                    ids.push(user_id);
                                    update(TaskUpdate::Assignees(ids));
                                }
                            }
                        >
                            <option value="" selected=true>"Assign…"</option>
                            <For
                                each=unassigned_users
                                key=|(id, _)| id.clone()
                                children=|(id, name)| view! { <option value=id>{name}</option> }
                            />
                        </select>
                    </Show>
                </div>
            </div>
        </div>
    }
}
