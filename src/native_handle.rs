/*
 * The platform-capability seam. `NativeScrollHandle` is the thin interface a
 * platform must implement for a scrollable container; the adapter in
 * `scroll_view` depends only on this trait, never on a concrete platform.
 * All lengths at this boundary are native device pixels.
 *
 * Listener registrations are token-based: a platform never holds a reference
 * to the owning widget, only an opaque `ListenerToken` resolved through a
 * thread-local side table of weak references. [SD-Listener-WeakTokenV1]
 * Native-side listener retention therefore cannot keep a logically disposed
 * widget alive; a dead entry is pruned on the next dispatch.
 */

use crate::scroll_view::ScrollViewState;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Weak;

/// Which native widget class backs the handle. The class is fixed per
/// handle; orientation changes recreate the handle with the other class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeScrollClass {
    HorizontalScrollView,
    VerticalScrollView,
}

/// Opaque identity of one native listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

impl ListenerToken {
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Reconstructs a token from its raw value. Used by platform callback
    /// entry points (e.g. JNI exports) that receive the token as an integer.
    pub fn from_raw(raw: u64) -> Self {
        ListenerToken(raw)
    }
}

/// Capability interface of a platform's native scrollable widget.
///
/// `set_scroll_change_listener` is the dedicated per-position-change
/// listener used by vertical containers; `add_scroll_observer` /
/// `remove_scroll_observer` is the generic content-scrolled observer used by
/// non-vertical containers, whose callbacks carry no position and require an
/// extra native query.
pub trait NativeScrollHandle {
    fn class(&self) -> NativeScrollClass;

    fn view_id(&self) -> i32;
    fn set_view_id(&mut self, id: i32);

    fn scroll_x(&self) -> i32;
    fn scroll_y(&self) -> i32;
    /// Scrollable extent along the handle's scroll axis, in device pixels.
    fn scrollable_length(&self) -> i32;

    fn scroll_to(&mut self, x: i32, y: i32);
    fn smooth_scroll_to(&mut self, x: i32, y: i32);

    fn scroll_enabled(&self) -> bool;
    fn set_scroll_enabled(&mut self, enabled: bool);

    /// Applies the platform's user-interaction toggle. Coupling differs per
    /// platform: Android-style widgets flip clickable, focusable and
    /// scroll-enabled together, iOS flips a single recursive flag. Callers
    /// must not assume either behavior.
    fn set_user_interaction_enabled(&mut self, enabled: bool);

    fn set_horizontal_scroll_bar_enabled(&mut self, enabled: bool);
    fn set_vertical_scroll_bar_enabled(&mut self, enabled: bool);

    fn set_scroll_change_listener(&mut self, token: Option<ListenerToken>);
    fn add_scroll_observer(&mut self, token: ListenerToken);
    fn remove_scroll_observer(&mut self, token: ListenerToken);
}

/*
 * Token registry. Thread-local because the whole adapter is UI-thread bound;
 * a multi-threaded host must funnel native callbacks through the UI thread
 * before they reach `dispatch_*`.
 */
thread_local! {
    static LISTENER_REGISTRY: RefCell<HashMap<ListenerToken, Weak<RefCell<ScrollViewState>>>> =
        RefCell::new(HashMap::new());
    static NEXT_TOKEN: Cell<u64> = const { Cell::new(1) };
}

pub(crate) fn allocate_token() -> ListenerToken {
    NEXT_TOKEN.with(|next| {
        let token = ListenerToken(next.get());
        next.set(next.get() + 1);
        token
    })
}

pub(crate) fn register_listener(token: ListenerToken, owner: Weak<RefCell<ScrollViewState>>) {
    LISTENER_REGISTRY.with(|registry| {
        registry.borrow_mut().insert(token, owner);
    });
}

/// Safe to call with an already-unregistered token; detach paths rely on it.
pub(crate) fn unregister_listener(token: ListenerToken) {
    LISTENER_REGISTRY.with(|registry| {
        registry.borrow_mut().remove(&token);
    });
}

fn resolve_owner(token: ListenerToken) -> Option<std::rc::Rc<RefCell<ScrollViewState>>> {
    LISTENER_REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        match registry.get(&token).and_then(Weak::upgrade) {
            Some(owner) => Some(owner),
            None => {
                // The widget is gone; drop the stale registration.
                registry.remove(&token);
                None
            }
        }
    })
}

/// Entry point for the dedicated scroll-change listener. `x`/`y` are the new
/// native positions in device pixels.
pub fn dispatch_scroll_change(token: ListenerToken, x: i32, y: i32) {
    if let Some(owner) = resolve_owner(token) {
        crate::scroll_view::deliver_scroll_change(&owner, x, y);
    } else {
        log::trace!("NativeHandle: scroll-change for dead token {token:?} dropped");
    }
}

/// Entry point for the generic content-scrolled observer. Carries no
/// position; the widget queries the native handle itself.
pub fn dispatch_scroll_changed(token: ListenerToken) {
    if let Some(owner) = resolve_owner(token) {
        crate::scroll_view::deliver_scroll_changed(&owner);
    } else {
        log::trace!("NativeHandle: scroll-changed for dead token {token:?} dropped");
    }
}

#[cfg(test)]
pub(crate) fn registered_listener_count() -> usize {
    LISTENER_REGISTRY.with(|registry| registry.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_thread() {
        let a = allocate_token();
        let b = allocate_token();
        assert_ne!(a, b);
        assert_eq!(ListenerToken::from_raw(a.raw()), a);
    }

    #[test]
    fn dispatch_to_unknown_token_is_a_no_op() {
        // Never registered: both dispatch paths must swallow the callback.
        let token = allocate_token();
        dispatch_scroll_change(token, 10, 20);
        dispatch_scroll_changed(token);
    }

    #[test]
    fn unregister_tolerates_unknown_tokens() {
        let token = allocate_token();
        unregister_listener(token);
        unregister_listener(token);
    }
}
