//! UI State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Board data lives
//! in the session; this store only holds view state.

use board_core::{Notice, TaskFilter};
use leptos::prelude::*;
use reactive_stores::Store;

use crate::config::{read_storage, write_storage};

const FILTER_STORAGE_KEY: &str = "kanban.filter";

/// How long a toast stays on screen
const TOAST_MILLIS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Clone, Debug, Default, Store)]
pub struct UiState {
    /// Active card filter
    pub filter: TaskFilter,
    /// Visible notifications, oldest first
    pub toasts: Vec<Toast>,
    pub next_toast_id: u64,
    /// Task shown in the detail panel
    pub open_task: Option<String>,
}

impl UiState {
    /// Initial state with the last used filter
    pub fn restored() -> Self {
        let filter = read_storage(FILTER_STORAGE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { filter, ..Default::default() }
    }
}

pub type UiStore = Store<UiState>;

/// Get the UI store from context
pub fn use_ui_store() -> UiStore {
    expect_context::<UiStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_filter(store: &UiStore, filter: TaskFilter) {
    store.filter().set(filter);
    if let Ok(raw) = serde_json::to_string(&filter) {
        write_storage(FILTER_STORAGE_KEY, &raw);
    }
}

pub fn store_filter(store: &UiStore) -> TaskFilter {
    store.filter().get()
}

/// Show a toast and schedule its removal
pub fn store_push_notice(store: &UiStore, notice: Notice) {
    let id = {
        let field = store.next_toast_id();
        let mut next = field.write();
        *next += 1;
        *next
    };
    store.toasts().write().push(Toast { id, notice });

    let store = *store;
    gloo_timers::callback::Timeout::new(TOAST_MILLIS, move || store_dismiss_toast(&store, id)).forget();
}

pub fn store_dismiss_toast(store: &UiStore, id: u64) {
    store.toasts().write().retain(|t| t.id != id);
}

pub fn store_toasts(store: &UiStore) -> Vec<Toast> {
    store.toasts().get()
}

pub fn store_open_task(store: &UiStore, task_id: Option<String>) {
    store.open_task().set(task_id);
}

pub fn store_opened_task(store: &UiStore) -> Option<String> {
    store.open_task().get()
}
