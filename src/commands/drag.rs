//! Drag Handlers
//!
//! Wires document-level pointer events to the session's drag operations.

use board_core::DragKey;
use leptos::prelude::*;
use leptos_dragdrop::{bind_global_escape, bind_global_mousemove, bind_global_mouseup};
use log::debug;

use crate::context::BoardContext;

/// Hover callback for a drag target
pub fn on_hover(ctx: BoardContext) -> impl Fn(DragKey) + Clone + 'static {
    move |over: DragKey| ctx.act(move |s| s.drag_over(over))
}

/// Bind the document handlers once per board
pub fn bind_board_dnd(ctx: BoardContext) {
    let session = ctx.session;

    bind_global_mousemove(ctx.dnd, move |key: DragKey| {
        match session.try_update(|s| s.drag_start(key.clone())) {
            Some(Ok(())) => true,
            Some(Err(err)) => {
                debug!("[DND] Drag refused: {}", err);
                false
            }
            None => false,
        }
    });

    bind_global_mouseup(ctx.dnd, move |dragged: DragKey, over: Option<DragKey>| {
        debug!("[DND] Drop {:?} on {:?}", dragged, over);
        match over {
            Some(target) => ctx.act(move |s| s.drag_end(Some(target))),
            // Released outside every target
            None => session.update(|s| s.drag_cancel()),
        }
        ctx.after_settle();
    });

    bind_global_escape(ctx.dnd, move |dragged: DragKey| {
        debug!("[DND] Cancel {:?}", dragged);
        session.update(|s| s.drag_cancel());
        ctx.after_settle();
    });
}
