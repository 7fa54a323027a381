//! Backend Command Execution
//!
//! Runs session dispatches against the board API and settles the results.
//! The UI never awaits these; each dispatch runs on its own task.

mod demo;
mod drag;

use board_core::{execute, Dispatch};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::context::BoardContext;

pub use demo::demo_api;
pub use drag::{bind_board_dnd, on_hover};

pub fn execute_all(ctx: BoardContext, dispatches: Vec<Dispatch>) {
    for dispatch in dispatches {
        spawn_local(execute_one(ctx, dispatch));
    }
}

async fn execute_one(ctx: BoardContext, dispatch: Dispatch) {
    let api = ctx.api();
    let project_id = ctx.project_id();
    let result = execute(api.as_ref(), &project_id, &dispatch.command).await;
    debug!("[SYNC] #{} settled (ok: {})", dispatch.seq, result.is_ok());
    ctx.session.update(|s| s.settle(dispatch.seq, result));
    ctx.after_settle();
}
