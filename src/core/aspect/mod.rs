//! # Aspect Module
//!
//! Decides whether pixel dimensions are 16:9.
//!
//! The tolerance absorbs off-by-one encodes such as 1920x1079 while still
//! rejecting 1920x1060.

/// 16:9 as a float (1.777...)
pub const ASPECT_RATIO_16_9: f64 = 16.0 / 9.0;

/// Maximum absolute difference from 16:9 that still counts as a match (exclusive)
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.01;

/// Width divided by height, or 0.0 when the height is zero
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        return 0.0;
    }
    width as f64 / height as f64
}

/// Check if an aspect ratio is within tolerance of 16:9
pub fn is_16_by_9(ratio: f64) -> bool {
    within_tolerance(ratio, ASPECT_RATIO_16_9, ASPECT_RATIO_TOLERANCE)
}

/// True when `ratio` lies strictly less than `tolerance` away from `target`
pub fn within_tolerance(ratio: f64, target: f64, tolerance: f64) -> bool {
    (ratio - target).abs() < tolerance
}

/// Evaluated aspect of a width/height pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aspect {
    pub ratio: f64,
    pub is_16_by_9: bool,
}

impl Aspect {
    pub fn of(width: u32, height: u32) -> Self {
        let ratio = aspect_ratio(width, height);
        Self {
            ratio,
            is_16_by_9: is_16_by_9(ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_is_16_by_9() {
        assert!(Aspect::of(1920, 1080).is_16_by_9);
        assert!(Aspect::of(3840, 2160).is_16_by_9);
        assert!(Aspect::of(1280, 720).is_16_by_9);
    }

    #[test]
    fn off_by_one_height_still_matches() {
        assert!(Aspect::of(1920, 1079).is_16_by_9);
        assert!(Aspect::of(1920, 1081).is_16_by_9);
    }

    #[test]
    fn nearby_ratios_outside_tolerance_do_not_match() {
        // 1920 / 1060 = 1.8113, 0.0336 away
        assert!(!Aspect::of(1920, 1060).is_16_by_9);
        assert!(!Aspect::of(1920, 1200).is_16_by_9);
        assert!(!Aspect::of(4032, 3024).is_16_by_9);
        assert!(!Aspect::of(1080, 1920).is_16_by_9);
    }

    #[test]
    fn difference_equal_to_tolerance_is_rejected() {
        // Dyadic values, so the difference is exactly the tolerance
        let (target, tolerance): (f64, f64) = (1.75, 0.25);
        for ratio in [2.0, 1.5] {
            assert_eq!((ratio - target).abs(), tolerance);
            assert!(!within_tolerance(ratio, target, tolerance));
        }
        assert!(within_tolerance(1.9375, target, tolerance));
    }

    #[test]
    fn closest_ratios_to_the_boundary_fall_on_the_right_side() {
        let above = ASPECT_RATIO_16_9 + ASPECT_RATIO_TOLERANCE;
        let below = ASPECT_RATIO_16_9 - ASPECT_RATIO_TOLERANCE;
        let step = |x: f64, by: i64| f64::from_bits((x.to_bits() as i64 + by) as u64);

        for (edge, inward) in [(above, -1), (below, 1)] {
            // Last representable ratio inside the tolerance, then the first one past it
            let mut outside = edge;
            while (outside - ASPECT_RATIO_16_9).abs() >= ASPECT_RATIO_TOLERANCE {
                outside = step(outside, inward);
            }
            while (outside - ASPECT_RATIO_16_9).abs() < ASPECT_RATIO_TOLERANCE {
                outside = step(outside, -inward);
            }
            let inside = step(outside, inward);

            assert!(!is_16_by_9(outside));
            assert!(is_16_by_9(inside));
        }
    }

    #[test]
    fn tolerance_boundary_is_exclusive() {
        assert!(!is_16_by_9(ASPECT_RATIO_16_9 + 0.0125));
        assert!(!is_16_by_9(ASPECT_RATIO_16_9 - 0.0125));
        assert!(is_16_by_9(ASPECT_RATIO_16_9 + 0.0099));
        assert!(is_16_by_9(ASPECT_RATIO_16_9 - 0.0099));
    }

    #[test]
    fn zero_height_yields_zero_ratio() {
        let aspect = Aspect::of(1920, 0);
        assert_eq!(aspect.ratio, 0.0);
        assert!(!aspect.is_16_by_9);
    }

    #[test]
    fn zero_width_is_not_a_match() {
        let aspect = Aspect::of(0, 1080);
        assert_eq!(aspect.ratio, 0.0);
        assert!(!aspect.is_16_by_9);
    }
}
