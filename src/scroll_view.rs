/*
 * The platform adapter for scrollable containers. Translates the
 * cross-platform scroll-view contract (observable properties, dip-valued
 * offsets, "scroll" events) into native widget operations through the
 * `NativeScrollHandle` seam, converting units and normalizing native
 * callbacks on the way back out.
 *
 * Lifecycle per attachment cycle:
 *   Detached -> NativeCreated -> Initialized -> ListenersAttached
 *            -> ListenersDetached -> Disposed (= Detached)
 * Reattachment restarts the cycle; an orientation change forces a full
 * detach + reattach because the native widget class differs per orientation
 * and cannot be mutated in place.
 *
 * [SD-Adapter-MissingHandleV1] Absence of a native handle is policy, not an
 * error: every handle-dependent operation degrades to a no-op or a
 * zero-valued read. Calls may race attachment and detachment; none of them
 * raise for it.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::events::{EventEmitter, SubscriptionId};
use crate::native_handle::{
    self, ListenerToken, NativeScrollClass, NativeScrollHandle,
};
use crate::platform::PlatformContext;
use crate::property::PropertyValue;
use crate::scroll_view_common::{
    IS_SCROLL_ENABLED, IS_USER_INTERACTION_ENABLED, ORIENTATION,
    SCROLL_BAR_INDICATOR_VISIBLE, hooks_for, native_property_hooks,
};
use crate::types::{Orientation, ScrollAxis, ScrollEventData, ViewId};
use crate::units::{to_device_independent_pixels, to_device_pixels};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Which native listener is currently registered, if any. At most one per
/// widget; the kind follows the orientation at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NativeListener {
    None,
    /// Dedicated per-position-change listener (vertical containers).
    ScrollChange(ListenerToken),
    /// Generic content-scrolled observer (non-vertical containers).
    Observer(ListenerToken),
}

/// Interior state of a scroll view. Shared between the public handle and the
/// listener dispatch path; touched only from the UI thread.
pub(crate) struct ScrollViewState {
    pub(crate) orientation: Orientation,
    pub(crate) native: Option<Box<dyn NativeScrollHandle>>,
    view_id: ViewId,
    listener: NativeListener,
    /// Last native position delivered through the generic observer path.
    /// Fresh native views start at the origin, so an initial (0, 0) read
    /// emits nothing.
    last_scroll: (i32, i32),
    /// Display density of the attached context; meaningless while detached
    /// (every getter that would use it zero-guards on `native` first).
    density: f64,
    ctx: Option<PlatformContext>,
    emitter: EventEmitter,
    user_interaction_enabled: bool,
    scroll_enabled: bool,
    scroll_bar_indicator_visible: bool,
    /// Native defaults captured by `get_default` hooks during init, keyed by
    /// property name; consulted by `reset_property`.
    native_defaults: HashMap<&'static str, PropertyValue>,
}

impl ScrollViewState {
    fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            native: None,
            view_id: ViewId::UNSET,
            listener: NativeListener::None,
            last_scroll: (0, 0),
            density: 1.0,
            ctx: None,
            emitter: EventEmitter::new(),
            user_interaction_enabled: IS_USER_INTERACTION_ENABLED.default_value(),
            scroll_enabled: IS_SCROLL_ENABLED.default_value(),
            scroll_bar_indicator_visible: SCROLL_BAR_INDICATOR_VISIBLE.default_value(),
            native_defaults: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(orientation: Orientation) -> Self {
        Self::new(orientation)
    }
}

impl Drop for ScrollViewState {
    fn drop(&mut self) {
        // Keeps the token registry free of entries for widgets dropped
        // without an explicit dispose.
        detach_listeners_locked(self);
    }
}

/// A scrollable container widget. Cloning yields another handle to the same
/// widget instance; the native handle itself is never shared between widget
/// instances.
#[derive(Clone)]
pub struct ScrollView {
    state: Rc<RefCell<ScrollViewState>>,
}

impl ScrollView {
    /// Name of the scroll event in the widget's event-notification
    /// mechanism.
    pub const SCROLL_EVENT: &'static str = "scroll";

    pub fn new(orientation: Orientation) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScrollViewState::new(orientation))),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.state.borrow().orientation
    }

    /// The stable native identity, `ViewId::UNSET` before the first attach.
    pub fn view_id(&self) -> ViewId {
        self.state.borrow().view_id
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().native.is_some()
    }

    /*
     * Attachment cycle: create the native view, initialize it, then attach
     * listeners. Creation is the only step that can fail; it surfaces the
     * platform error untouched. [SD-Adapter-LifecycleV1]
     */
    pub fn attach(&self, ctx: &PlatformContext) -> PlatformResult<()> {
        let weak = Rc::downgrade(&self.state);
        let mut state = self.state.borrow_mut();
        if state.native.is_some() {
            log::warn!(
                "ScrollView: attach called on an already-attached widget (view id {})",
                state.view_id.raw()
            );
            return Err(PlatformError::OperationFailed(
                "widget already owns a native view; dispose before reattaching".into(),
            ));
        }

        let native = create_native_view(ctx, state.orientation)?;
        state.density = ctx.display_density();
        state.ctx = Some(ctx.clone());
        state.last_scroll = (0, 0);
        state.native = Some(native);

        init_native_view_locked(&mut state, ctx);
        attach_listeners_locked(&mut state, weak);
        Ok(())
    }

    /// Detaches listeners, then releases the native handle and the platform
    /// context. Safe to call repeatedly, attached or not.
    pub fn dispose(&self) {
        let mut state = self.state.borrow_mut();
        detach_listeners_locked(&mut state);
        if state.native.take().is_some() {
            log::debug!(
                "ScrollView: disposed native view (view id {})",
                state.view_id.raw()
            );
        }
        state.ctx = None;
    }

    /// Registers the orientation-appropriate native listener. Idempotent:
    /// attaching again without an intervening detach never registers twice.
    /// [SD-Listener-IdempotentV1]
    pub fn attach_listeners(&self) {
        let weak = Rc::downgrade(&self.state);
        let mut state = self.state.borrow_mut();
        attach_listeners_locked(&mut state, weak);
    }

    /// Unregisters the native listener if one is registered. A no-op when
    /// never attached, already detached, or called repeatedly.
    pub fn detach_listeners(&self) {
        let mut state = self.state.borrow_mut();
        detach_listeners_locked(&mut state);
    }

    /*
     * Offset and extent getters. Zero when no native handle is present or
     * when the queried axis does not match the current orientation;
     * otherwise the native device-pixel reading divided by density.
     */

    pub fn horizontal_offset(&self) -> f64 {
        let state = self.state.borrow();
        match state.native.as_deref() {
            Some(native) if state.orientation == Orientation::Horizontal => {
                to_device_independent_pixels(native.scroll_x(), state.density)
            }
            _ => 0.0,
        }
    }

    pub fn vertical_offset(&self) -> f64 {
        let state = self.state.borrow();
        match state.native.as_deref() {
            Some(native) if state.orientation == Orientation::Vertical => {
                to_device_independent_pixels(native.scroll_y(), state.density)
            }
            _ => 0.0,
        }
    }

    pub fn scrollable_width(&self) -> f64 {
        let state = self.state.borrow();
        match state.native.as_deref() {
            Some(native) if state.orientation == Orientation::Horizontal => {
                to_device_independent_pixels(native.scrollable_length(), state.density)
            }
            _ => 0.0,
        }
    }

    pub fn scrollable_height(&self) -> f64 {
        let state = self.state.borrow();
        match state.native.as_deref() {
            Some(native) if state.orientation == Orientation::Vertical => {
                to_device_independent_pixels(native.scrollable_length(), state.density)
            }
            _ => 0.0,
        }
    }

    /// Axis-addressed programmatic scroll in device-independent pixels.
    pub fn scroll_to_offset(&self, axis: ScrollAxis, value: f64, animated: bool) {
        match axis {
            ScrollAxis::Horizontal => self.scroll_to_horizontal_offset(value, animated),
            ScrollAxis::Vertical => self.scroll_to_vertical_offset(value, animated),
        }
    }

    /// No-op unless a native handle exists, the widget is horizontal, and
    /// scrolling is enabled.
    pub fn scroll_to_horizontal_offset(&self, value: f64, animated: bool) {
        let mut state = self.state.borrow_mut();
        if state.orientation != Orientation::Horizontal || !state.scroll_enabled {
            return;
        }
        let density = state.density;
        let Some(native) = state.native.as_deref_mut() else {
            return;
        };
        let px = to_device_pixels(value, density);
        if animated {
            native.smooth_scroll_to(px, 0);
        } else {
            native.scroll_to(px, 0);
        }
    }

    /// No-op unless a native handle exists, the widget is vertical, and
    /// scrolling is enabled.
    pub fn scroll_to_vertical_offset(&self, value: f64, animated: bool) {
        let mut state = self.state.borrow_mut();
        if state.orientation != Orientation::Vertical || !state.scroll_enabled {
            return;
        }
        let density = state.density;
        let Some(native) = state.native.as_deref_mut() else {
            return;
        };
        let px = to_device_pixels(value, density);
        if animated {
            native.smooth_scroll_to(0, px);
        } else {
            native.scroll_to(0, px);
        }
    }

    /*
     * Property surface. Typed setters route through the same hook table the
     * dynamic `set_property` uses, so native syncing happens in one place.
     */

    pub fn is_user_interaction_enabled(&self) -> bool {
        self.state.borrow().user_interaction_enabled
    }

    pub fn set_user_interaction_enabled(&self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        let _ = apply_property_locked(
            &mut state,
            IS_USER_INTERACTION_ENABLED.name(),
            PropertyValue::Bool(enabled),
        );
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.state.borrow().scroll_enabled
    }

    pub fn set_scroll_enabled(&self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        let _ = apply_property_locked(
            &mut state,
            IS_SCROLL_ENABLED.name(),
            PropertyValue::Bool(enabled),
        );
    }

    pub fn scroll_bar_indicator_visible(&self) -> bool {
        self.state.borrow().scroll_bar_indicator_visible
    }

    pub fn set_scroll_bar_indicator_visible(&self, visible: bool) {
        let mut state = self.state.borrow_mut();
        let _ = apply_property_locked(
            &mut state,
            SCROLL_BAR_INDICATOR_VISIBLE.name(),
            PropertyValue::Bool(visible),
        );
    }

    /// Sets a property by descriptor name. Errors on unknown names or
    /// mismatched value kinds; orientation writes delegate to
    /// [`ScrollView::set_orientation`].
    pub fn set_property(&self, name: &str, value: PropertyValue) -> PlatformResult<()> {
        if name == ORIENTATION.name() {
            let Some(orientation) = value.as_orientation() else {
                return Err(PlatformError::OperationFailed(format!(
                    "property '{name}' expects an orientation value"
                )));
            };
            return self.set_orientation(orientation);
        }
        let mut state = self.state.borrow_mut();
        apply_property_locked(&mut state, name, value)
    }

    /// Restores a property to its platform default: the value captured by
    /// its `get_default` hook at init time, or the descriptor default if the
    /// widget has never been attached.
    pub fn reset_property(&self, name: &str) -> PlatformResult<()> {
        if name == ORIENTATION.name() {
            return self.set_orientation(ORIENTATION.default_value());
        }
        let mut state = self.state.borrow_mut();
        let value = state
            .native_defaults
            .get(name)
            .copied()
            .or_else(|| descriptor_default(name));
        let Some(value) = value else {
            return Err(PlatformError::OperationFailed(format!(
                "unknown property '{name}'"
            )));
        };
        apply_property_locked(&mut state, name, value)
    }

    /// Changes the scroll direction. A no-op when the orientation already
    /// matches; otherwise triggers [`ScrollView::on_orientation_changed`].
    pub fn set_orientation(&self, orientation: Orientation) -> PlatformResult<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.orientation == orientation {
                return Ok(());
            }
            state.orientation = orientation;
        }
        self.on_orientation_changed()
    }

    /// Forces recreation of the native view when attached, since the native
    /// widget class differs per orientation. Exactly one detach-and-reattach
    /// cycle; the stable view id survives. Detached widgets just keep the
    /// new orientation for the next attach.
    pub fn on_orientation_changed(&self) -> PlatformResult<()> {
        let ctx = {
            let state = self.state.borrow();
            if state.native.is_none() {
                return Ok(());
            }
            state.ctx.clone()
        };
        let Some(ctx) = ctx else {
            return Ok(());
        };
        log::debug!("ScrollView: orientation changed while attached, recreating native view");
        self.dispose();
        self.attach(&ctx)
    }

    /// Subscribes to a named widget event; see
    /// [`ScrollView::SCROLL_EVENT`].
    pub fn on(
        &self,
        event_name: &str,
        callback: impl Fn(&ScrollEventData) + 'static,
    ) -> SubscriptionId {
        self.state.borrow_mut().emitter.subscribe(event_name, callback)
    }

    pub fn off(&self, id: SubscriptionId) {
        self.state.borrow_mut().emitter.unsubscribe(id);
    }
}

impl std::fmt::Debug for ScrollView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ScrollView")
            .field("orientation", &state.orientation)
            .field("view_id", &state.view_id)
            .field("attached", &state.native.is_some())
            .finish()
    }
}

/*
 * Pure construction step: select the native class by orientation; vertical
 * containers get their native scrollbar enabled by default. No listener side
 * effects here.
 */
fn create_native_view(
    ctx: &PlatformContext,
    orientation: Orientation,
) -> PlatformResult<Box<dyn NativeScrollHandle>> {
    let class = match orientation {
        Orientation::Horizontal => NativeScrollClass::HorizontalScrollView,
        Orientation::Vertical => NativeScrollClass::VerticalScrollView,
    };
    let mut native = ctx.new_scroll_view(class)?;
    if orientation == Orientation::Vertical {
        native.set_vertical_scroll_bar_enabled(true);
    }
    Ok(native)
}

/*
 * Init step: assign the generate-once view id, capture native property
 * defaults through the `get_default` hooks, then replay the widget's local
 * property values through the `set_native` hooks so writes made while
 * detached reach the fresh native view.
 */
fn init_native_view_locked(state: &mut ScrollViewState, ctx: &PlatformContext) {
    if !state.view_id.is_set() {
        state.view_id = ViewId::new(ctx.generate_view_id());
    }
    let view_id = state.view_id;
    if let Some(native) = state.native.as_deref_mut() {
        native.set_view_id(view_id.raw());
    }
    log::debug!("ScrollView: init_native_view (view id {})", view_id.raw());

    let captured: Vec<(&'static str, PropertyValue)> = native_property_hooks()
        .iter()
        .filter_map(|hook| hook.get_default.map(|get| (hook.name, get(state))))
        .collect();
    for (name, value) in captured {
        state.native_defaults.insert(name, value);
    }

    for hook in native_property_hooks() {
        if let Some(value) = local_value_locked(state, hook.name) {
            (hook.set_native)(state, value);
        }
    }
}

fn attach_listeners_locked(
    state: &mut ScrollViewState,
    owner: std::rc::Weak<RefCell<ScrollViewState>>,
) {
    if state.native.is_none() {
        log::debug!("ScrollView: attach_listeners without a native view, skipping");
        return;
    }
    if state.listener != NativeListener::None {
        log::trace!("ScrollView: listeners already attached, skipping");
        return;
    }

    let token = native_handle::allocate_token();
    native_handle::register_listener(token, owner);
    let orientation = state.orientation;
    let Some(native) = state.native.as_deref_mut() else {
        return;
    };
    state.listener = if orientation == Orientation::Vertical {
        native.set_scroll_change_listener(Some(token));
        NativeListener::ScrollChange(token)
    } else {
        native.add_scroll_observer(token);
        NativeListener::Observer(token)
    };
    log::debug!("ScrollView: attached {orientation} listener as {token:?}");
}

fn detach_listeners_locked(state: &mut ScrollViewState) {
    match std::mem::replace(&mut state.listener, NativeListener::None) {
        NativeListener::None => {}
        NativeListener::ScrollChange(token) => {
            native_handle::unregister_listener(token);
            if let Some(native) = state.native.as_deref_mut() {
                native.set_scroll_change_listener(None);
            }
            log::debug!("ScrollView: detached scroll-change listener {token:?}");
        }
        NativeListener::Observer(token) => {
            native_handle::unregister_listener(token);
            if let Some(native) = state.native.as_deref_mut() {
                native.remove_scroll_observer(token);
            }
            log::debug!("ScrollView: detached scroll observer {token:?}");
        }
    }
}

fn local_value_locked(state: &ScrollViewState, name: &str) -> Option<PropertyValue> {
    if name == IS_USER_INTERACTION_ENABLED.name() {
        Some(PropertyValue::Bool(state.user_interaction_enabled))
    } else if name == IS_SCROLL_ENABLED.name() {
        Some(PropertyValue::Bool(state.scroll_enabled))
    } else if name == SCROLL_BAR_INDICATOR_VISIBLE.name() {
        Some(PropertyValue::Bool(state.scroll_bar_indicator_visible))
    } else {
        None
    }
}

fn descriptor_default(name: &str) -> Option<PropertyValue> {
    if name == IS_USER_INTERACTION_ENABLED.name() {
        Some(PropertyValue::Bool(IS_USER_INTERACTION_ENABLED.default_value()))
    } else if name == IS_SCROLL_ENABLED.name() {
        Some(PropertyValue::Bool(IS_SCROLL_ENABLED.default_value()))
    } else if name == SCROLL_BAR_INDICATOR_VISIBLE.name() {
        Some(PropertyValue::Bool(SCROLL_BAR_INDICATOR_VISIBLE.default_value()))
    } else {
        None
    }
}

fn apply_property_locked(
    state: &mut ScrollViewState,
    name: &str,
    value: PropertyValue,
) -> PlatformResult<()> {
    if local_value_locked(state, name).is_none() {
        log::warn!("ScrollView: unknown property '{name}' rejected");
        return Err(PlatformError::OperationFailed(format!(
            "unknown property '{name}'"
        )));
    }
    let Some(flag) = value.as_bool() else {
        return Err(PlatformError::OperationFailed(format!(
            "property '{name}' expects a boolean value"
        )));
    };

    if name == IS_USER_INTERACTION_ENABLED.name() {
        state.user_interaction_enabled = flag;
    } else if name == IS_SCROLL_ENABLED.name() {
        state.scroll_enabled = flag;
    } else if name == SCROLL_BAR_INDICATOR_VISIBLE.name() {
        state.scroll_bar_indicator_visible = flag;
    }

    if state.native.is_some()
        && let Some(hook) = hooks_for(name)
    {
        (hook.set_native)(state, value);
    }
    Ok(())
}

/*
 * Listener delivery. Called from `native_handle::dispatch_*` once the token
 * resolved to a live widget. Subscriber callbacks run after every interior
 * borrow is released, so they may re-enter the widget freely.
 */

/// Dedicated scroll-change path (vertical). Emits unconditionally: the
/// native listener already reports transitions, so no dedup cache is
/// consulted here.
pub(crate) fn deliver_scroll_change(owner: &Rc<RefCell<ScrollViewState>>, x: i32, y: i32) {
    let (event, callbacks) = {
        let state = owner.borrow();
        if state.native.is_none() || !state.emitter.has_subscribers(ScrollView::SCROLL_EVENT) {
            return;
        }
        let event = ScrollEventData {
            view_id: state.view_id,
            event_name: ScrollView::SCROLL_EVENT,
            scroll_x: to_device_independent_pixels(x, state.density),
            scroll_y: to_device_independent_pixels(y, state.density),
        };
        (event, state.emitter.snapshot(ScrollView::SCROLL_EVENT))
    };
    for callback in callbacks {
        callback(&event);
    }
}

/// Generic observer path (non-vertical). The callback carries no position,
/// so the widget queries the native handle and suppresses the event when the
/// position matches the last one delivered — a workaround for native
/// observers that fire without an actual position change.
/// [SD-Scroll-DedupV1]
pub(crate) fn deliver_scroll_changed(owner: &Rc<RefCell<ScrollViewState>>) {
    let (event, callbacks) = {
        let mut state = owner.borrow_mut();
        let Some(native) = state.native.as_deref() else {
            return;
        };
        let position = (native.scroll_x(), native.scroll_y());
        if position == state.last_scroll {
            return;
        }
        state.last_scroll = position;
        let event = ScrollEventData {
            view_id: state.view_id,
            event_name: ScrollView::SCROLL_EVENT,
            scroll_x: to_device_independent_pixels(position.0, state.density),
            scroll_y: to_device_independent_pixels(position.1, state.density),
        };
        (event, state.emitter.snapshot(ScrollView::SCROLL_EVENT))
    };
    for callback in callbacks {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_handle::registered_listener_count;
    use crate::platform::PlatformContext;
    use crate::platform_headless::ScrollCommand;

    fn collected_events(view: &ScrollView) -> Rc<RefCell<Vec<ScrollEventData>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        view.on(ScrollView::SCROLL_EVENT, move |e| {
            sink.borrow_mut().push(e.clone());
        });
        events
    }

    #[test]
    // [SD-Adapter-MissingHandleV1] Detached widgets read as zero everywhere.
    fn detached_getters_return_zero() {
        let view = ScrollView::new(Orientation::Vertical);
        assert_eq!(view.horizontal_offset(), 0.0);
        assert_eq!(view.vertical_offset(), 0.0);
        assert_eq!(view.scrollable_width(), 0.0);
        assert_eq!(view.scrollable_height(), 0.0);
        assert!(!view.is_attached());
        assert_eq!(view.view_id(), ViewId::UNSET);
    }

    #[test]
    fn off_axis_getters_return_zero_when_attached() {
        let ctx = PlatformContext::with_density(2.0).unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();

        let widget = ctx.last_created().unwrap();
        widget.set_scrollable_length(600);
        widget.drive_scroll(40, 80);

        assert_eq!(view.vertical_offset(), 40.0);
        assert_eq!(view.scrollable_height(), 300.0);
        // Off-axis reads stay neutral despite live native state.
        assert_eq!(view.horizontal_offset(), 0.0);
        assert_eq!(view.scrollable_width(), 0.0);
    }

    #[test]
    fn attach_selects_class_by_orientation_and_enables_vertical_scrollbar() {
        let ctx = PlatformContext::new().unwrap();
        let vertical = ScrollView::new(Orientation::Vertical);
        vertical.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();
        assert_eq!(widget.widget_class(), NativeScrollClass::VerticalScrollView);
        assert!(widget.vertical_scroll_bar_enabled());

        let horizontal = ScrollView::new(Orientation::Horizontal);
        horizontal.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();
        assert_eq!(
            widget.widget_class(),
            NativeScrollClass::HorizontalScrollView
        );
        assert!(!widget.vertical_scroll_bar_enabled());
    }

    #[test]
    fn double_attach_is_rejected() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        assert!(view.attach(&ctx).is_err());
        // Only one native view was ever created.
        assert_eq!(ctx.created_widgets().len(), 1);
    }

    #[test]
    // [SD-Listener-IdempotentV1]
    fn detach_listeners_is_idempotent_and_safe_before_attach() {
        let view = ScrollView::new(Orientation::Vertical);
        view.detach_listeners();
        view.detach_listeners();

        let ctx = PlatformContext::new().unwrap();
        view.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();
        assert!(widget.has_scroll_change_listener());
        assert_eq!(registered_listener_count(), 1);

        view.detach_listeners();
        view.detach_listeners();
        assert!(!widget.has_scroll_change_listener());
        assert_eq!(registered_listener_count(), 0);
    }

    #[test]
    fn attach_listeners_twice_registers_once() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Horizontal);
        view.attach(&ctx).unwrap();
        view.attach_listeners();
        view.attach_listeners();
        let widget = ctx.last_created().unwrap();
        assert_eq!(widget.observer_count(), 1);
        assert_eq!(registered_listener_count(), 1);
    }

    #[test]
    fn offset_round_trips_through_density_conversion() {
        let ctx = PlatformContext::with_density(2.0).unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        view.scroll_to_vertical_offset(100.0, false);
        assert_eq!(ctx.last_created().unwrap().scroll_position(), (0, 200));
        assert_eq!(view.vertical_offset(), 100.0);

        let ctx = PlatformContext::with_density(1.5).unwrap();
        let view = ScrollView::new(Orientation::Horizontal);
        view.attach(&ctx).unwrap();
        view.scroll_to_horizontal_offset(10.0, false);
        assert_eq!(ctx.last_created().unwrap().scroll_position(), (15, 0));
        assert_eq!(view.horizontal_offset(), 10.0);
    }

    #[test]
    fn animated_flag_selects_smooth_scroll() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();

        view.scroll_to_offset(ScrollAxis::Vertical, 50.0, false);
        assert_eq!(widget.last_scroll_command(), Some(ScrollCommand::Immediate));
        view.scroll_to_offset(ScrollAxis::Vertical, 80.0, true);
        assert_eq!(widget.last_scroll_command(), Some(ScrollCommand::Smooth));
        assert_eq!(widget.scroll_position(), (0, 80));
    }

    #[test]
    fn programmatic_scroll_requires_matching_axis_and_enabled_scrolling() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();

        // Wrong axis: no native command issued.
        view.scroll_to_horizontal_offset(25.0, false);
        assert_eq!(widget.last_scroll_command(), None);

        // Scrolling disabled: also a no-op.
        view.set_scroll_enabled(false);
        view.scroll_to_vertical_offset(25.0, false);
        assert_eq!(widget.last_scroll_command(), None);
        assert_eq!(widget.scroll_position(), (0, 0));

        view.set_scroll_enabled(true);
        view.scroll_to_vertical_offset(25.0, false);
        assert_eq!(widget.scroll_position(), (0, 25));
    }

    #[test]
    // [SD-Scroll-DedupV1] Postcondition of the generic observer path.
    fn generic_observer_path_dedups_repeated_positions() {
        let ctx = PlatformContext::with_density(2.0).unwrap();
        let view = ScrollView::new(Orientation::Horizontal);
        view.attach(&ctx).unwrap();
        let events = collected_events(&view);
        let widget = ctx.last_created().unwrap();

        for (x, y) in [(0, 0), (5, 10), (5, 10), (5, 10), (8, 10)] {
            widget.drive_scroll(x, y);
        }

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].scroll_x, events[0].scroll_y), (2.5, 5.0));
        assert_eq!((events[1].scroll_x, events[1].scroll_y), (4.0, 5.0));
        assert_eq!(events[0].view_id, view.view_id());
        assert_eq!(events[0].event_name, ScrollView::SCROLL_EVENT);
    }

    #[test]
    fn dedicated_scroll_change_path_does_not_dedup() {
        let ctx = PlatformContext::with_density(2.0).unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let events = collected_events(&view);
        let widget = ctx.last_created().unwrap();

        widget.drive_scroll(0, 50);
        widget.drive_scroll(0, 50);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!((events[0].scroll_x, events[0].scroll_y), (0.0, 25.0));
        assert_eq!((events[1].scroll_x, events[1].scroll_y), (0.0, 25.0));
    }

    #[test]
    fn orientation_change_recreates_native_view_once() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let first = ctx.last_created().unwrap();
        let original_id = view.view_id();
        assert!(original_id.is_set());

        view.set_orientation(Orientation::Horizontal).unwrap();

        let widgets = ctx.created_widgets();
        assert_eq!(widgets.len(), 2);
        assert_eq!(
            widgets[1].widget_class(),
            NativeScrollClass::HorizontalScrollView
        );
        // Old native view lost its listener; new one carries the observer.
        assert!(!first.has_scroll_change_listener());
        assert_eq!(widgets[1].observer_count(), 1);
        // Stable identity survives the recreation.
        assert_eq!(view.view_id(), original_id);
        assert_eq!(widgets[1].assigned_view_id(), original_id.raw());
    }

    #[test]
    fn orientation_change_while_detached_only_records_the_orientation() {
        let view = ScrollView::new(Orientation::Vertical);
        view.set_orientation(Orientation::Horizontal).unwrap();
        assert_eq!(view.orientation(), Orientation::Horizontal);
        assert!(!view.is_attached());
    }

    #[test]
    fn interaction_toggle_reaches_all_coupled_native_flags() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();

        view.set_user_interaction_enabled(false);
        assert!(!widget.is_clickable());
        assert!(!widget.is_focusable());
        assert!(!widget.is_scroll_enabled());
        assert!(!view.is_user_interaction_enabled());
    }

    #[test]
    fn dispose_is_repeatable_and_silences_callbacks() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let events = collected_events(&view);
        let widget = ctx.last_created().unwrap();

        view.dispose();
        view.dispose();
        assert!(!view.is_attached());
        assert_eq!(registered_listener_count(), 0);

        // The native widget may keep scrolling; nothing reaches the widget.
        widget.drive_scroll(0, 120);
        assert!(events.borrow().is_empty());
        assert_eq!(view.vertical_offset(), 0.0);
    }

    #[test]
    fn dropping_the_widget_clears_its_registration() {
        let ctx = PlatformContext::new().unwrap();
        let widget = {
            let view = ScrollView::new(Orientation::Horizontal);
            view.attach(&ctx).unwrap();
            ctx.last_created().unwrap()
        };
        assert_eq!(registered_listener_count(), 0);
        // Dispatching for the stale native-side token reaches nobody.
        widget.drive_scroll(3, 0);
    }

    #[test]
    fn reattach_after_dispose_keeps_view_id_and_restarts_cycle() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let id = view.view_id();
        view.dispose();
        view.attach(&ctx).unwrap();
        assert_eq!(view.view_id(), id);
        assert_eq!(ctx.created_widgets().len(), 2);
        assert!(ctx.last_created().unwrap().has_scroll_change_listener());
    }

    #[test]
    fn detached_property_writes_replay_on_attach() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.set_scroll_bar_indicator_visible(false);
        view.set_scroll_enabled(false);
        view.attach(&ctx).unwrap();

        let widget = ctx.last_created().unwrap();
        // Replay overrides the create-time scrollbar default.
        assert!(!widget.vertical_scroll_bar_enabled());
        assert!(!widget.is_scroll_enabled());
    }

    #[test]
    fn reset_property_restores_the_captured_native_default() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Vertical);
        view.attach(&ctx).unwrap();
        let widget = ctx.last_created().unwrap();

        view.set_scroll_enabled(false);
        assert!(!widget.is_scroll_enabled());
        view.reset_property(IS_SCROLL_ENABLED.name()).unwrap();
        assert!(view.is_scroll_enabled());
        assert!(widget.is_scroll_enabled());
    }

    #[test]
    fn set_property_validates_name_and_value_kind() {
        let view = ScrollView::new(Orientation::Vertical);
        assert!(view.set_property("noSuchProperty", PropertyValue::Bool(true)).is_err());
        assert!(
            view.set_property(IS_SCROLL_ENABLED.name(), PropertyValue::Number(1.0))
                .is_err()
        );
        view.set_property(IS_SCROLL_ENABLED.name(), PropertyValue::Bool(false))
            .unwrap();
        assert!(!view.is_scroll_enabled());

        view.set_property(
            ORIENTATION.name(),
            PropertyValue::Orientation(Orientation::Horizontal),
        )
        .unwrap();
        assert_eq!(view.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving_events() {
        let ctx = PlatformContext::new().unwrap();
        let view = ScrollView::new(Orientation::Horizontal);
        view.attach(&ctx).unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = view.on(ScrollView::SCROLL_EVENT, move |e| {
            sink.borrow_mut().push(e.clone());
        });
        let widget = ctx.last_created().unwrap();

        widget.drive_scroll(5, 0);
        view.off(id);
        widget.drive_scroll(9, 0);
        assert_eq!(events.borrow().len(), 1);
    }
}
