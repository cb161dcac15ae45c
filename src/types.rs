/*
 * Platform-agnostic types shared between the cross-platform widget contract
 * and the per-platform adapters. Everything here compiles on every target so
 * host builds can test logic that depends on these types.
 */

use std::fmt;

/// Scroll direction of a scrollable container. Fixed at native-view creation
/// time; changing it afterwards forces recreation of the native widget since
/// the native class differs per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The scroll axis a container of this orientation actually scrolls on.
    pub fn axis(self) -> ScrollAxis {
        match self {
            Orientation::Horizontal => ScrollAxis::Horizontal,
            Orientation::Vertical => ScrollAxis::Vertical,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// One of the two scroll axes. Offset setters are axis-addressed; reads and
/// writes on the axis not matching the current orientation are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

/// Stable identity assigned to a native view. Generated once per widget
/// instance and reused across reattachment cycles; `ViewId::UNSET` marks a
/// widget that has never been attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(i32);

impl ViewId {
    pub const UNSET: ViewId = ViewId(-1);

    pub fn new(raw: i32) -> Self {
        ViewId(raw)
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    pub fn is_set(self) -> bool {
        self.0 >= 0
    }
}

/// Payload of the cross-platform "scroll" event. Coordinates are in
/// device-independent pixels; the adapter converts from native device pixels
/// before emitting.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollEventData {
    /// Identity of the emitting widget's native view.
    pub view_id: ViewId,
    /// Always [`crate::scroll_view::ScrollView::SCROLL_EVENT`].
    pub event_name: &'static str,
    pub scroll_x: f64,
    pub scroll_y: f64,
}
