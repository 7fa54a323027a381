//! Notice Toast Component

use board_core::NoticeLevel;
use leptos::prelude::*;

use crate::store::{store_dismiss_toast, store_toasts, use_ui_store};

#[component]
pub fn NoticeToast() -> impl IntoView {
    let store = use_ui_store();

    view! {
        <div class="toast-stack">
            <For
                each=move || store_toasts(&store)
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.notice.level {
                        NoticeLevel::Success => "toast toast-success",
                        NoticeLevel::Error => "toast toast-error",
                    };
                    view! {
                        <div class=class on:click=move |_| store_dismiss_toast(&store, id)>
                            {toast.notice.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
