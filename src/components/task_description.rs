//! Task Description Component
//!
//! Detail panel for the open task: description and subtasks.

use board_core::{Capability, TaskUpdate};
use leptos::prelude::*;

use crate::context::use_board;
use crate::store::{store_open_task, store_opened_task};

#[component]
pub fn TaskDescription() -> impl IntoView {
    let ctx = use_board();
    let session = ctx.session;
    let store = ctx.store;

    // Fetch subtasks whenever another task is opened
    Effect::new(move |_| {
        if let Some(task_id) = store_opened_task(&store) {
            ctx.act(move |s| s.load_subtasks(&task_id));
        }
    });

    let task = Memo::new(move |_| {
        let id = store_opened_task(&store)?;
        session.with(|s| s.board().task(&id).cloned())
    });
    let can_edit = move || session.with(|s| s.can(Capability::EditTaskDetails));
    let can_toggle = move || session.with(|s| s.can(Capability::UpdateTaskStatus));

    let close = move |_| store_open_task(&store, None);
    let (draft, set_draft) = signal(String::new());

    view! {
        <Show when=move || task.get().is_some()>
            <div class="modal-backdrop" on:click=close>
                <div class="task-description" on:click=|ev| ev.stop_propagation()>
                    <header>
                        <h2>{move || task.get().map(|t| t.title).unwrap_or_default()}</h2>
                        <button class="close-btn" on:click=close>"×"</button>
                    </header>

                    <label>"Description"</label>
                    <textarea
                        class="description-input"
                        placeholder="Add a more detailed description…"
                        disabled=move || !can_edit()
                        prop:value=move || task.get().and_then(|t| t.description).unwrap_or_default()
                        on:blur=move |ev| {
                            let Some(current) = task.get_untracked() else {
                                return;
                            };
                            let text = event_target_value(&ev);
                            if current.description.as_deref().unwrap_or_default() != text {
                                ctx.act(move |s| s.update_task(&current.id, TaskUpdate::Description(text)));
                            }
                        }
                    />

                    <h3>"Subtasks"</h3>
                    <ul class="subtask-list">
                        <For
                            each=move || task.get().map(|t| t.subtasks).unwrap_or_default()
                            key=|sub| (sub.id.clone(), sub.content.clone(), sub.is_completed)
                            children=move |sub| {
                                let Some(task_id) = task.get_untracked().map(|t| t.id) else {
                                    return ().into_any();
                                };
                                let toggle_ids = (task_id.clone(), sub.id.clone());
                                let rename_ids = (task_id.clone(), sub.id.clone());
                                let delete_ids = (task_id, sub.id.clone());
                                let original = sub.content.clone();
                                view! {
                                    <li class="subtask" class:completed=sub.is_completed>
                                        <input
                                            type="checkbox"
                                            prop:checked=sub.is_completed
                                            disabled=move || !can_toggle()
                                            on:change=move |ev| {
                                                let (task_id, sub_id) = toggle_ids.clone();
                                                let done = event_target_checked(&ev);
                                                ctx.act(move |s| s.set_subtask_completed(&task_id, &sub_id, done));
                                            }
                                        />
                                        <input
                                            class="subtask-content"
                                            prop:value=sub.content.clone()
                                            disabled=move || !can_edit()
                                            on:blur=move |ev| {
                                                let content = event_target_value(&ev);
                                                if content.trim() == original {
                                                    return;
                                                }
                                                let (task_id, sub_id) = rename_ids.clone();
                                                ctx.act(move |s| s.rename_subtask(&task_id, &sub_id, &content));
                                            }
                                        />
                                        <Show when=can_edit>
                                            <button
                                                class="subtask-delete-btn"
                                                on:click={
                                                    let ids = delete_ids.clone();
                                                    move |_| {
                                                        let (task_id, sub_id) = ids.clone();
                                                        ctx.act(move |s| s.delete_subtask(&task_id, &sub_id));
                                                    }
                                                }
                                            >
                                                "×"
                                            </button>
                                        </Show>
                                    </li>
                                }
                                .into_any()
                            }
                        />
                    </ul>

                    <Show when=can_edit>
                        <form
                            class="subtask-add"
                            on:submit=move |ev| {
                                ev.prevent_default();
                                let Some(task_id) = task.get_untracked().map(|t| t.id) else {
                                    return;
                                };
                                let content = draft.get_untracked();
                                set_draft.set(String::new());
                                ctx.act(move |s| s.add_subtask(&task_id, &content));
                            }
                        >
                            <input
                                placeholder="New subtask"
                                prop:value=move || draft.get()
                                on:input=move |ev| set_draft.set(event_target_value(&ev))
                            />
                            <button type="submit">"Add"</button>
                        </form>
                    </Show>
                </div>
            </div>
        </Show>
    }
}
