//! Filter Options Component

use board_core::TaskFilter;
use leptos::prelude::*;

use crate::store::{store_filter, store_set_filter, use_ui_store};

/// Card filter selector. Filtering hides cards, it never reorders them.
#[component]
pub fn FilterOptions() -> impl IntoView {
    let store = use_ui_store();

    view! {
        <label class="filter-options">
            "Show "
            <select
                on:change=move |ev| {
                    if let Some(filter) = TaskFilter::from_label(&event_target_value(&ev)) {
                        store_set_filter(&store, filter);
                    }
                }
            >
                {TaskFilter::ALL
                    .into_iter()
                    .map(|filter| {
                        view! {
                            <option
                                value=filter.label()
                                selected=move || store_filter(&store) == filter
                            >
                                {filter.label()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </label>
    }
}
