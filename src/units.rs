/*
 * Conversion between device-independent pixels (the unit of the public API)
 * and native device pixels (the unit of every native handle call). The
 * conversion factor is the display density supplied by the platform context;
 * it is read once at context construction and read-only afterwards.
 */

/// Smallest density accepted by a platform context. Guards against a context
/// that would make every conversion divide by zero.
pub(crate) const MIN_DISPLAY_DENSITY: f64 = f64::MIN_POSITIVE;

/// Converts a device-independent length into whole device pixels, rounding
/// to the nearest pixel the way the native layer snaps coordinates.
pub fn to_device_pixels(dip: f64, density: f64) -> i32 {
    (dip * density).round() as i32
}

/// Converts a native device-pixel length back into device-independent
/// pixels.
pub fn to_device_independent_pixels(px: i32, density: f64) -> f64 {
    f64::from(px) / density
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_two_round_trips_exactly() {
        let px = to_device_pixels(100.0, 2.0);
        assert_eq!(px, 200);
        assert_eq!(to_device_independent_pixels(px, 2.0), 100.0);
    }

    #[test]
    fn density_one_and_a_half_round_trips_exactly() {
        let px = to_device_pixels(10.0, 1.5);
        assert_eq!(px, 15);
        assert_eq!(to_device_independent_pixels(px, 1.5), 10.0);
    }

    #[test]
    fn fractional_dips_round_to_nearest_device_pixel() {
        assert_eq!(to_device_pixels(10.3, 2.0), 21);
        assert_eq!(to_device_pixels(10.2, 2.0), 20);
        assert_eq!(to_device_pixels(0.0, 3.0), 0);
    }
}
