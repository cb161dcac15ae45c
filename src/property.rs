/*
 * Observable property descriptors. A `Property<T>` declares a named, typed
 * widget property with a default value; per-platform customization of its
 * native get/set behavior lives in an explicit hook table (see
 * `scroll_view_common`) that maps property names to function pairs. The
 * table is resolved once at widget-type registration time, never at call
 * time.
 */

use crate::types::Orientation;

/// A named, typed, observable widget property with a default value.
#[derive(Debug, Clone, Copy)]
pub struct Property<T: Copy> {
    name: &'static str,
    default: T,
}

impl<T: Copy> Property<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_value(&self) -> T {
        self.default
    }
}

/// Dynamically typed property value crossing the hook-table boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Orientation(Orientation),
}

impl PropertyValue {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_number(self) -> Option<f64> {
        match self {
            PropertyValue::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_orientation(self) -> Option<Orientation> {
        match self {
            PropertyValue::Orientation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<Orientation> for PropertyValue {
    fn from(v: Orientation) -> Self {
        PropertyValue::Orientation(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENABLED: Property<bool> = Property::new("enabled", true);

    #[test]
    fn descriptor_exposes_name_and_default() {
        assert_eq!(ENABLED.name(), "enabled");
        assert!(ENABLED.default_value());
    }

    #[test]
    fn value_accessors_reject_mismatched_kinds() {
        assert_eq!(PropertyValue::Bool(true).as_bool(), Some(true));
        assert_eq!(PropertyValue::Bool(true).as_number(), None);
        assert_eq!(PropertyValue::Number(1.5).as_number(), Some(1.5));
        assert_eq!(
            PropertyValue::Orientation(Orientation::Vertical).as_orientation(),
            Some(Orientation::Vertical)
        );
        assert_eq!(
            PropertyValue::Orientation(Orientation::Vertical).as_bool(),
            None
        );
    }
}
