//! Board Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use board_core::{BoardApi, BoardError, BoardResult, BoardSession, Dispatch, DragKey, Notice};
use leptos::prelude::*;
use leptos_dragdrop::DndSignals;
use log::{debug, warn};

use crate::commands;
use crate::store::{store_push_notice, UiStore};

/// Session operations return one, none or several dispatches
pub trait IntoDispatches {
    fn into_dispatches(self) -> BoardResult<Vec<Dispatch>>;
}

impl IntoDispatches for Dispatch {
    fn into_dispatches(self) -> BoardResult<Vec<Dispatch>> {
        Ok(vec![self])
    }
}

impl IntoDispatches for Option<Dispatch> {
    fn into_dispatches(self) -> BoardResult<Vec<Dispatch>> {
        Ok(self.into_iter().collect())
    }
}

impl IntoDispatches for Vec<Dispatch> {
    fn into_dispatches(self) -> BoardResult<Vec<Dispatch>> {
        Ok(self)
    }
}

impl<T: IntoDispatches> IntoDispatches for BoardResult<T> {
    fn into_dispatches(self) -> BoardResult<Vec<Dispatch>> {
        self?.into_dispatches()
    }
}

/// Board-wide handles provided via context
#[derive(Clone, Copy)]
pub struct BoardContext {
    /// The single writer over board state
    pub session: RwSignal<BoardSession>,
    api: StoredValue<Rc<dyn BoardApi>, LocalStorage>,
    pub store: UiStore,
    pub dnd: DndSignals<DragKey>,
}

impl BoardContext {
    pub fn new(
        session: RwSignal<BoardSession>,
        api: Rc<dyn BoardApi>,
        store: UiStore,
        dnd: DndSignals<DragKey>,
    ) -> Self {
        Self {
            session,
            api: StoredValue::new_local(api),
            store,
            dnd,
        }
    }

    pub fn api(&self) -> Rc<dyn BoardApi> {
        self.api.get_value()
    }

    pub fn project_id(&self) -> String {
        self.session.with_untracked(|s| s.project_id().to_string())
    }

    /// Run a session operation and execute whatever it dispatches
    pub fn act<F, R>(&self, f: F)
    where
        F: FnOnce(&mut BoardSession) -> R,
        R: IntoDispatches,
    {
        let Some(result) = self.session.try_update(f) else {
            return;
        };
        match result.into_dispatches() {
            Ok(dispatches) => commands::execute_all(*self, dispatches),
            Err(err @ BoardError::PermissionDenied { .. }) => {
                warn!("[BOARD] {}", err);
                store_push_notice(&self.store, Notice::error(err.to_string()));
            }
            Err(err) => debug!("[BOARD] Operation skipped: {}", err),
        }
        self.flush_notices();
    }

    /// Full reload from the backend
    pub fn reload(&self) {
        self.act(|s| s.load());
    }

    /// Move session notices into the toast list and honour refetch requests
    pub fn after_settle(&self) {
        self.flush_notices();
        if self.session.with_untracked(|s| s.needs_refetch()) {
            debug!("[SYNC] Refetching board");
            self.reload();
        }
    }

    fn flush_notices(&self) {
        if self.session.with_untracked(|s| s.notices().is_empty()) {
            return;
        }
        let notices = self.session.try_update(|s| s.take_notices()).unwrap_or_default();
        for notice in notices {
            store_push_notice(&self.store, notice);
        }
    }
}

/// Get the board context
pub fn use_board() -> BoardContext {
    expect_context::<BoardContext>()
}
