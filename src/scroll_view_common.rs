/*
 * Cross-platform scroll-view contract: the observable property descriptors a
 * scrollable container exposes, and the widget-type registration of their
 * native hooks. The hooks bind each property to the platform-capability
 * interface; they are looked up by property name in a table built exactly
 * once, not dispatched dynamically per call.
 */

use crate::property::{Property, PropertyValue};
use crate::scroll_view::ScrollViewState;
use crate::types::Orientation;

use std::sync::OnceLock;

/// Whether the user can interact with the widget at all. Platform coupling
/// differs: see `NativeScrollHandle::set_user_interaction_enabled`.
pub static IS_USER_INTERACTION_ENABLED: Property<bool> =
    Property::new("isUserInteractionEnabled", true);

/// Whether the container responds to scrolling (user or programmatic).
pub static IS_SCROLL_ENABLED: Property<bool> = Property::new("isScrollEnabled", true);

/// Whether the scrollbar for the current orientation's axis is shown.
pub static SCROLL_BAR_INDICATOR_VISIBLE: Property<bool> =
    Property::new("scrollBarIndicatorVisible", true);

/// Scroll direction. Not part of the native hook table: changing it requires
/// recreating the native view, which `ScrollView::set_orientation` drives.
pub static ORIENTATION: Property<Orientation> =
    Property::new("orientation", Orientation::Vertical);

/// Native get/set function pair for one property, keyed by property name.
pub(crate) struct NativePropertyHooks {
    pub name: &'static str,
    /// Reads the platform default so it can be restored on property reset.
    /// Absent when the default is not native-derived.
    pub get_default: Option<fn(&ScrollViewState) -> PropertyValue>,
    /// Pushes a property value into the native handle. Only invoked while a
    /// handle is present.
    pub set_native: fn(&mut ScrollViewState, PropertyValue),
}

fn user_interaction_set_native(state: &mut ScrollViewState, value: PropertyValue) {
    let Some(enabled) = value.as_bool() else {
        return;
    };
    if let Some(native) = state.native.as_deref_mut() {
        native.set_user_interaction_enabled(enabled);
    }
}

fn scroll_enabled_get_default(state: &ScrollViewState) -> PropertyValue {
    match state.native.as_deref() {
        Some(native) => PropertyValue::Bool(native.scroll_enabled()),
        None => PropertyValue::Bool(IS_SCROLL_ENABLED.default_value()),
    }
}

fn scroll_enabled_set_native(state: &mut ScrollViewState, value: PropertyValue) {
    let Some(enabled) = value.as_bool() else {
        return;
    };
    if let Some(native) = state.native.as_deref_mut() {
        native.set_scroll_enabled(enabled);
    }
}

fn scroll_bar_visible_get_default(_state: &ScrollViewState) -> PropertyValue {
    PropertyValue::Bool(true)
}

fn scroll_bar_visible_set_native(state: &mut ScrollViewState, value: PropertyValue) {
    let Some(visible) = value.as_bool() else {
        return;
    };
    let orientation = state.orientation;
    if let Some(native) = state.native.as_deref_mut() {
        match orientation {
            Orientation::Horizontal => native.set_horizontal_scroll_bar_enabled(visible),
            Orientation::Vertical => native.set_vertical_scroll_bar_enabled(visible),
        }
    }
}

/// The scroll-view hook table, built on first access (widget-type
/// registration) and immutable afterwards.
pub(crate) fn native_property_hooks() -> &'static [NativePropertyHooks] {
    static HOOKS: OnceLock<Vec<NativePropertyHooks>> = OnceLock::new();
    HOOKS.get_or_init(|| {
        vec![
            NativePropertyHooks {
                name: IS_USER_INTERACTION_ENABLED.name(),
                get_default: None,
                set_native: user_interaction_set_native,
            },
            NativePropertyHooks {
                name: IS_SCROLL_ENABLED.name(),
                get_default: Some(scroll_enabled_get_default),
                set_native: scroll_enabled_set_native,
            },
            NativePropertyHooks {
                name: SCROLL_BAR_INDICATOR_VISIBLE.name(),
                get_default: Some(scroll_bar_visible_get_default),
                set_native: scroll_bar_visible_set_native,
            },
        ]
    })
}

pub(crate) fn hooks_for(name: &str) -> Option<&'static NativePropertyHooks> {
    native_property_hooks().iter().find(|h| h.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_registers_exactly_the_hooked_properties() {
        let names: Vec<_> = native_property_hooks().iter().map(|h| h.name).collect();
        assert_eq!(
            names,
            vec![
                "isUserInteractionEnabled",
                "isScrollEnabled",
                "scrollBarIndicatorVisible"
            ]
        );
    }

    #[test]
    fn hooks_resolve_by_property_name() {
        assert!(hooks_for(IS_SCROLL_ENABLED.name()).is_some());
        assert!(hooks_for(ORIENTATION.name()).is_none());
        assert!(hooks_for("noSuchProperty").is_none());
    }

    #[test]
    fn scroll_bar_default_is_visible() {
        let hook = hooks_for(SCROLL_BAR_INDICATOR_VISIBLE.name()).unwrap();
        let get_default = hook.get_default.expect("scrollbar default is native-derived");
        let state = ScrollViewState::for_tests(Orientation::Vertical);
        assert_eq!(get_default(&state), PropertyValue::Bool(true));
    }

    #[test]
    fn descriptor_defaults_match_the_widget_contract() {
        assert!(IS_USER_INTERACTION_ENABLED.default_value());
        assert!(IS_SCROLL_ENABLED.default_value());
        assert!(SCROLL_BAR_INDICATOR_VISIBLE.default_value());
        assert_eq!(ORIENTATION.default_value(), Orientation::Vertical);
    }
}
