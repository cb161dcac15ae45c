/*
 * In-memory platform used on every target that is neither Android nor iOS.
 * It exists so host builds (and the test suite) can exercise the full
 * adapter logic against a faithful stand-in for a native widget: state that
 * lives outside the widget instance, listener registrations that must be
 * driven explicitly, and device-pixel units at the handle boundary.
 *
 * Native callbacks never fire spontaneously here; tests pump them through
 * `HeadlessScrollHandle::drive_scroll`, which plays the role of the platform
 * UI event loop delivering a scroll notification.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::native_handle::{
    self, ListenerToken, NativeScrollClass, NativeScrollHandle,
};
use crate::units::MIN_DISPLAY_DENSITY;

use std::cell::RefCell;
use std::rc::Rc;

/// How the most recent programmatic scroll reached the handle. Used by tests
/// to assert the animated/immediate split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    Immediate,
    Smooth,
}

#[derive(Debug)]
struct WidgetState {
    class: NativeScrollClass,
    view_id: i32,
    scroll: (i32, i32),
    scrollable_length: i32,
    scroll_enabled: bool,
    clickable: bool,
    focusable: bool,
    horizontal_scroll_bar: bool,
    vertical_scroll_bar: bool,
    change_listener: Option<ListenerToken>,
    observers: Vec<ListenerToken>,
    last_command: Option<ScrollCommand>,
}

/// Shared reference to one headless native widget. Clones alias the same
/// widget, the way multiple references to a native object would.
#[derive(Debug, Clone)]
pub struct HeadlessScrollHandle {
    state: Rc<RefCell<WidgetState>>,
}

impl HeadlessScrollHandle {
    fn new(class: NativeScrollClass) -> Self {
        Self {
            state: Rc::new(RefCell::new(WidgetState {
                class,
                view_id: -1,
                scroll: (0, 0),
                scrollable_length: 0,
                scroll_enabled: true,
                clickable: true,
                focusable: true,
                horizontal_scroll_bar: false,
                vertical_scroll_bar: false,
                change_listener: None,
                observers: Vec::new(),
                last_command: None,
            })),
        }
    }

    /// Simulates a native scroll to `(x, y)` device pixels and delivers the
    /// resulting callbacks, exactly as the platform event loop would: the
    /// dedicated listener first (with positions), then every generic
    /// observer (without).
    pub fn drive_scroll(&self, x: i32, y: i32) {
        let (change_listener, observers) = {
            let mut state = self.state.borrow_mut();
            state.scroll = (x, y);
            (state.change_listener, state.observers.clone())
        };
        if let Some(token) = change_listener {
            native_handle::dispatch_scroll_change(token, x, y);
        }
        for token in observers {
            native_handle::dispatch_scroll_changed(token);
        }
    }

    /// Sets the scrollable extent reported along the widget's scroll axis.
    pub fn set_scrollable_length(&self, px: i32) {
        self.state.borrow_mut().scrollable_length = px;
    }

    // Test inspectors. These read the same state the trait impl writes.

    pub fn scroll_position(&self) -> (i32, i32) {
        self.state.borrow().scroll
    }

    pub fn is_clickable(&self) -> bool {
        self.state.borrow().clickable
    }

    pub fn is_focusable(&self) -> bool {
        self.state.borrow().focusable
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.state.borrow().scroll_enabled
    }

    pub fn horizontal_scroll_bar_enabled(&self) -> bool {
        self.state.borrow().horizontal_scroll_bar
    }

    pub fn vertical_scroll_bar_enabled(&self) -> bool {
        self.state.borrow().vertical_scroll_bar
    }

    pub fn has_scroll_change_listener(&self) -> bool {
        self.state.borrow().change_listener.is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    pub fn last_scroll_command(&self) -> Option<ScrollCommand> {
        self.state.borrow().last_command
    }

    pub fn assigned_view_id(&self) -> i32 {
        self.state.borrow().view_id
    }

    pub fn widget_class(&self) -> NativeScrollClass {
        self.state.borrow().class
    }
}

impl NativeScrollHandle for HeadlessScrollHandle {
    fn class(&self) -> NativeScrollClass {
        self.state.borrow().class
    }

    fn view_id(&self) -> i32 {
        self.state.borrow().view_id
    }

    fn set_view_id(&mut self, id: i32) {
        self.state.borrow_mut().view_id = id;
    }

    fn scroll_x(&self) -> i32 {
        self.state.borrow().scroll.0
    }

    fn scroll_y(&self) -> i32 {
        self.state.borrow().scroll.1
    }

    fn scrollable_length(&self) -> i32 {
        self.state.borrow().scrollable_length
    }

    fn scroll_to(&mut self, x: i32, y: i32) {
        let mut state = self.state.borrow_mut();
        state.scroll = (x, y);
        state.last_command = Some(ScrollCommand::Immediate);
    }

    fn smooth_scroll_to(&mut self, x: i32, y: i32) {
        // Headless widgets have no animation clock; smooth scrolls land
        // immediately but are recorded as smooth for inspection.
        let mut state = self.state.borrow_mut();
        state.scroll = (x, y);
        state.last_command = Some(ScrollCommand::Smooth);
    }

    fn scroll_enabled(&self) -> bool {
        self.state.borrow().scroll_enabled
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().scroll_enabled = enabled;
    }

    fn set_user_interaction_enabled(&mut self, enabled: bool) {
        // Android-style coupling: the three flags move together.
        let mut state = self.state.borrow_mut();
        state.clickable = enabled;
        state.focusable = enabled;
        state.scroll_enabled = enabled;
    }

    fn set_horizontal_scroll_bar_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().horizontal_scroll_bar = enabled;
    }

    fn set_vertical_scroll_bar_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().vertical_scroll_bar = enabled;
    }

    fn set_scroll_change_listener(&mut self, token: Option<ListenerToken>) {
        self.state.borrow_mut().change_listener = token;
    }

    fn add_scroll_observer(&mut self, token: ListenerToken) {
        self.state.borrow_mut().observers.push(token);
    }

    fn remove_scroll_observer(&mut self, token: ListenerToken) {
        self.state.borrow_mut().observers.retain(|t| *t != token);
    }
}

#[derive(Debug)]
struct ContextState {
    density: f64,
    next_view_id: i32,
    created: Vec<HeadlessScrollHandle>,
}

/// Headless platform context: owns the display density and view-id
/// generation, and constructs headless widgets on request.
#[derive(Debug, Clone)]
pub struct PlatformContext {
    state: Rc<RefCell<ContextState>>,
}

impl PlatformContext {
    /// Context with density 1.0 (device pixels equal device-independent
    /// pixels).
    pub fn new() -> PlatformResult<Self> {
        Self::with_density(1.0)
    }

    pub fn with_density(density: f64) -> PlatformResult<Self> {
        if !density.is_finite() || density < MIN_DISPLAY_DENSITY {
            return Err(PlatformError::InitializationFailed(format!(
                "display density must be a positive finite number, got {density}"
            )));
        }
        Ok(Self {
            state: Rc::new(RefCell::new(ContextState {
                density,
                next_view_id: 1,
                created: Vec::new(),
            })),
        })
    }

    pub fn display_density(&self) -> f64 {
        self.state.borrow().density
    }

    pub(crate) fn generate_view_id(&self) -> i32 {
        let mut state = self.state.borrow_mut();
        let id = state.next_view_id;
        state.next_view_id += 1;
        id
    }

    pub(crate) fn new_scroll_view(
        &self,
        class: NativeScrollClass,
    ) -> PlatformResult<Box<dyn NativeScrollHandle>> {
        let handle = HeadlessScrollHandle::new(class);
        self.state.borrow_mut().created.push(handle.clone());
        log::debug!("HeadlessPlatform: created {class:?} widget");
        Ok(Box::new(handle))
    }

    /// The most recently created widget, if any. Test access to the "native"
    /// side of an attached adapter.
    pub fn last_created(&self) -> Option<HeadlessScrollHandle> {
        self.state.borrow().created.last().cloned()
    }

    /// Every widget this context has created, in creation order.
    pub fn created_widgets(&self) -> Vec<HeadlessScrollHandle> {
        self.state.borrow().created.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_density() {
        assert!(PlatformContext::with_density(0.0).is_err());
        assert!(PlatformContext::with_density(-1.0).is_err());
        assert!(PlatformContext::with_density(f64::NAN).is_err());
        assert!(PlatformContext::with_density(2.0).is_ok());
    }

    #[test]
    fn view_ids_are_generated_sequentially() {
        let ctx = PlatformContext::new().unwrap();
        assert_eq!(ctx.generate_view_id(), 1);
        assert_eq!(ctx.generate_view_id(), 2);
    }

    #[test]
    fn created_widgets_are_reachable_from_the_context() {
        let ctx = PlatformContext::new().unwrap();
        assert!(ctx.last_created().is_none());
        let _ = ctx
            .new_scroll_view(NativeScrollClass::VerticalScrollView)
            .unwrap();
        let widget = ctx.last_created().unwrap();
        assert_eq!(widget.widget_class(), NativeScrollClass::VerticalScrollView);
        assert_eq!(ctx.created_widgets().len(), 1);
    }

    #[test]
    fn interaction_toggle_couples_the_three_flags() {
        let widget = HeadlessScrollHandle::new(NativeScrollClass::VerticalScrollView);
        let mut handle: Box<dyn NativeScrollHandle> = Box::new(widget.clone());
        handle.set_user_interaction_enabled(false);
        assert!(!widget.is_clickable());
        assert!(!widget.is_focusable());
        assert!(!widget.is_scroll_enabled());
        handle.set_user_interaction_enabled(true);
        assert!(widget.is_clickable() && widget.is_focusable() && widget.is_scroll_enabled());
    }

    #[test]
    fn smooth_and_immediate_scrolls_are_distinguished() {
        let widget = HeadlessScrollHandle::new(NativeScrollClass::HorizontalScrollView);
        let mut handle: Box<dyn NativeScrollHandle> = Box::new(widget.clone());
        assert_eq!(widget.last_scroll_command(), None);
        handle.scroll_to(30, 0);
        assert_eq!(widget.last_scroll_command(), Some(ScrollCommand::Immediate));
        assert_eq!(widget.scroll_position(), (30, 0));
        handle.smooth_scroll_to(60, 0);
        assert_eq!(widget.last_scroll_command(), Some(ScrollCommand::Smooth));
        assert_eq!(widget.scroll_position(), (60, 0));
    }
}
