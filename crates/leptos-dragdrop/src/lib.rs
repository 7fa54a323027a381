//! Leptos DragDrop Utilities
//!
//! Pointer-driven drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag, and tracks the
//! element under the pointer while dragging.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Default movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 10;

/// DnD state signals, generic over the key identifying draggables and targets
pub struct DndSignals<K: 'static> {
    pub dragging_read: ReadSignal<Option<K>>,
    pub dragging_write: WriteSignal<Option<K>>,
    /// Element currently hovered while dragging
    pub over_read: ReadSignal<Option<K>>,
    pub over_write: WriteSignal<Option<K>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending key (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<K>>,
    pub pending_write: WriteSignal<Option<K>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
    pub threshold_px: i32,
}

impl<K: 'static> Clone for DndSignals<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: 'static> Copy for DndSignals<K> {}

pub fn create_dnd_signals<K>(threshold_px: i32) -> DndSignals<K>
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    let (dragging_read, dragging_write) = signal(None::<K>);
    let (over_read, over_write) = signal(None::<K>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<K>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_read,
        dragging_write,
        over_read,
        over_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
        threshold_px,
    }
}

/// True once the pointer travelled past the threshold on either axis
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32), threshold_px: i32) -> bool {
    (current.0 - start.0).abs() > threshold_px || (current.1 - start.1).abs() > threshold_px
}

/// End drag operation
pub fn end_drag<K>(dnd: &DndSignals<K>)
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    dnd.dragging_write.set(None);
    dnd.over_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    // Swallow the click that follows mouseup
    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

fn is_interactive(target: &web_sys::EventTarget) -> bool {
    target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlSelectElement>().is_some()
}

/// Create mousedown handler for a draggable element.
/// Records a pending drag with its start position; the innermost draggable wins.
pub fn make_on_mousedown<K>(dnd: DndSignals<K>, key: K) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if ev.target().as_ref().is_some_and(is_interactive) {
            return;
        }
        ev.stop_propagation();
        dnd.pending_write.set(Some(key.clone()));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Bind document mousemove: promotes a pending press to a drag once it
/// moves past the threshold and `on_start` accepts the key.
pub fn bind_global_mousemove<K, S>(dnd: DndSignals<K>, on_start: S)
where
    K: Clone + PartialEq + Send + Sync + 'static,
    S: Fn(K) -> bool + 'static,
{
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(pending) = dnd.pending_read.get_untracked() else {
            return;
        };
        if dnd.dragging_read.get_untracked().is_some() {
            return;
        }
        let start = (dnd.start_x_read.get_untracked(), dnd.start_y_read.get_untracked());
        if !exceeds_threshold(start, (ev.client_x(), ev.client_y()), dnd.threshold_px) {
            return;
        }
        if on_start(pending.clone()) {
            dnd.dragging_write.set(Some(pending));
        } else {
            dnd.pending_write.set(None);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseover handler for a hover target. Fires `on_over` once per
/// newly hovered key; inner targets shadow the ones containing them.
pub fn make_on_hover<K, F>(dnd: DndSignals<K>, key: K, on_over: F) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(K) + Clone + 'static,
{
    move |ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging_read.get_untracked() else {
            return;
        };
        ev.stop_propagation();
        if dnd.over_read.get_untracked().as_ref() == Some(&key) {
            return;
        }
        dnd.over_write.set(Some(key.clone()));
        // Hovering the dragged element itself does nothing
        if dragging != key {
            on_over(key.clone());
        }
    }
}

/// Create mouseleave handler for the drag area
pub fn make_on_mouseleave<K>(dnd: DndSignals<K>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    K: Clone + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.over_write.set(None);
        }
    }
}

/// Bind document mouseup for drop detection
pub fn bind_global_mouseup<K, D>(dnd: DndSignals<K>, on_drop: D)
where
    K: Clone + PartialEq + Send + Sync + 'static,
    D: Fn(K, Option<K>) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let over = dnd.over_read.get_untracked();

        // Not dragging means a plain click, which fires naturally on the element
        end_drag(&dnd);
        if let Some(dragged) = dragging {
            on_drop(dragged, over);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();
}

/// Bind document keydown: Escape cancels an active drag
pub fn bind_global_escape<K, C>(dnd: DndSignals<K>, on_cancel: C)
where
    K: Clone + PartialEq + Send + Sync + 'static,
    C: Fn(K) + 'static,
{
    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Escape" {
            return;
        }
        if let Some(dragged) = dnd.dragging_read.get_untracked() {
            end_drag(&dnd);
            on_cancel(dragged);
        } else {
            dnd.pending_write.set(None);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    }
    on_keydown.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!exceeds_threshold((0, 0), (10, 0), 10));
        assert!(!exceeds_threshold((5, 5), (-5, 15), 10));
        assert!(exceeds_threshold((0, 0), (0, 11), 10));
        assert!(exceeds_threshold((100, 100), (89, 100), 10));
    }
}
