/*
 * Provides the public entry point for the scrollduct crate, a scroll-view
 * binding layer that exposes one observable property/event contract and maps
 * it onto platform-native widget trees. This module wires together the
 * platform-agnostic pieces (types, units, properties, events, the adapter)
 * with the platform-specific implementation for the current target.
 *
 * The library exposes only the safe API surface (`ScrollView`,
 * `PlatformContext`, the property descriptors) while keeping each platform's
 * native plumbing scoped to the crate. Conditional compilation keeps portable
 * pieces available on every platform, and selects the platform module the way
 * a logical widget tree selects a native widget: Android and iOS get their
 * native bindings, everything else gets the headless in-memory platform so
 * host builds can still compile and test the adapter logic.
 */
pub mod error;
pub mod events;
pub mod native_handle;
#[cfg(target_os = "android")]
pub mod platform_android;
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub mod platform_headless;
#[cfg(target_os = "ios")]
pub mod platform_ios;
pub mod property;
pub mod scroll_view;
pub mod scroll_view_common;
pub mod types;
pub mod units;

#[cfg(target_os = "android")]
pub(crate) use platform_android as platform;
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub(crate) use platform_headless as platform;
#[cfg(target_os = "ios")]
pub(crate) use platform_ios as platform;

pub use error::{PlatformError, Result as PlatformResult};
pub use events::SubscriptionId;
pub use native_handle::{ListenerToken, NativeScrollClass, NativeScrollHandle};
pub use platform::PlatformContext;
#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub use platform_headless::{HeadlessScrollHandle, ScrollCommand};
pub use property::{Property, PropertyValue};
pub use scroll_view::ScrollView;
pub use scroll_view_common::{
    IS_SCROLL_ENABLED, IS_USER_INTERACTION_ENABLED, ORIENTATION,
    SCROLL_BAR_INDICATOR_VISIBLE,
};
pub use types::{Orientation, ScrollAxis, ScrollEventData, ViewId};
