//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop reordering for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Drop target types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Drop on an item (take its place, shifting it back)
    Item(u32),
    /// Drop after the last item
    End,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id: RwSignal<Option<u32>>,
    pub drop_target: RwSignal<Option<DropTarget>>,
    pub drag_just_ended: RwSignal<bool>,
    /// Pending item id (mousedown but not yet dragging)
    pub pending_id: RwSignal<Option<u32>>,
    /// Start position for movement detection
    pub start_pos: RwSignal<(i32, i32)>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging_id: RwSignal::new(None),
        drop_target: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
        pending_id: RwSignal::new(None),
        start_pos: RwSignal::new((0, 0)),
    }
}

/// True once the pointer moved far enough from the mousedown position
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    (current.0 - start.0).abs() > DRAG_THRESHOLD_PX || (current.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// New order of `ids` after dropping `dragged` on `target`.
/// Unknown ids and drops onto self leave the order unchanged.
pub fn reorder(ids: &[u32], dragged: u32, target: DropTarget) -> Vec<u32> {
    let Some(from) = ids.iter().position(|id| *id == dragged) else {
        return ids.to_vec();
    };
    let mut order = ids.to_vec();
    match target {
        DropTarget::Item(target_id) if target_id == dragged => order,
        DropTarget::Item(target_id) => {
            let Some(to) = ids.iter().position(|id| *id == target_id) else {
                return order;
            };
            let moved = order.remove(from);
            order.insert(to, moved);
            order
        }
        DropTarget::End => {
            let moved = order.remove(from);
            order.push(moved);
            order
        }
    }
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id.try_set(None);
    dnd.drop_target.try_set(None);
    dnd.pending_id.try_set(None);
    dnd.drag_just_ended.try_set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.try_set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, item_id: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Buttons inside the item keep their own click behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
        }
        ev.prevent_default();
        dnd.pending_id.set(Some(item_id));
        dnd.start_pos.set((ev.client_x(), ev.client_y()));
    }
}

/// Create mouseenter handler for items
pub fn make_on_item_mouseenter(dnd: DndSignals, item_id: u32) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if let Some(dragging) = dnd.dragging_id.get_untracked() {
            // Don't allow dropping on self
            if dragging != item_id {
                dnd.drop_target.set(Some(DropTarget::Item(item_id)));
            }
        }
    }
}

/// Create mouseenter handler for the trailing drop area
pub fn make_on_end_mouseenter(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_target.set(Some(DropTarget::End));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id.get_untracked().is_some() {
            dnd.drop_target.set(None);
        }
    }
}

/// Bind document-level mousemove/mouseup handlers.
///
/// The listeners outlive the component that installed them, so every
/// signal access goes through the `try_` variants and becomes a no-op once
/// the owning scope is disposed.
pub fn bind_global_handlers<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(u32, DropTarget) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(Some(pending)) = dnd.pending_id.try_get_untracked() else { return; };
        if dnd.dragging_id.try_get_untracked().flatten().is_some() {
            return;
        }
        let Some(start) = dnd.start_pos.try_get_untracked() else { return; };
        if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
            dnd.dragging_id.try_set(Some(pending));
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let Some(dragging) = dnd.dragging_id.try_get_untracked() else { return; };
        let drop_target = dnd.drop_target.try_get_untracked().flatten();
        end_drag(&dnd);
        // A plain click never became a drag; its click event fires normally
        if let (Some(dragged), Some(target)) = (dragging, drop_target) {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
    on_mouseup.forget();
}
