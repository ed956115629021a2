// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click versus drag disambiguation.
//!
//! A press becomes a drag when the pointer travels more than
//! `pixels` along either axis, or when it is held for `time_ms`. The distance
//! test lives here; the time test is a timer armed by the manager at
//! pointer-down, so a motionless press-and-hold still starts a drag.
//!
//! ```
//! use kurbo::Point;
//! use understory_drag::threshold::GestureThresholds;
//!
//! let t = GestureThresholds::new(3.0, 1_000);
//! let down = Point::new(10.0, 10.0);
//! assert!(!t.should_promote(down, Point::new(12.0, 11.0)));
//! assert!(t.should_promote(down, Point::new(14.0, 11.0)));
//! ```

use kurbo::Point;

/// Distance and time thresholds for promoting a press to a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureThresholds {
    /// Per-axis travel, in pixels, that must be exceeded.
    pub pixels: f64,
    /// Hold duration, in milliseconds, after which the press promotes.
    pub time_ms: u64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pixels: 3.0,
            time_ms: 1_000,
        }
    }
}

impl GestureThresholds {
    /// Creates a threshold pair.
    #[must_use]
    pub const fn new(pixels: f64, time_ms: u64) -> Self {
        Self { pixels, time_ms }
    }

    /// Returns `true` if `current` is strictly further than `pixels` from
    /// `start` along x or along y.
    #[must_use]
    pub fn should_promote(&self, start: Point, current: Point) -> bool {
        exceeds(current.x - start.x, self.pixels) || exceeds(current.y - start.y, self.pixels)
    }
}

fn exceeds(d: f64, limit: f64) -> bool {
    d > limit || d < -limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        let t = GestureThresholds::new(3.0, 0);
        let o = Point::ZERO;
        assert!(!t.should_promote(o, Point::new(3.0, 0.0)));
        assert!(!t.should_promote(o, Point::new(-3.0, 3.0)));
        assert!(t.should_promote(o, Point::new(3.5, 0.0)));
    }

    #[test]
    fn either_axis_suffices() {
        let t = GestureThresholds::new(3.0, 0);
        let o = Point::new(100.0, 100.0);
        assert!(t.should_promote(o, Point::new(100.0, 96.0)));
        assert!(t.should_promote(o, Point::new(95.0, 100.0)));
        // Diagonal below per-axis threshold does not promote even though the
        // Euclidean distance exceeds it.
        assert!(!t.should_promote(o, Point::new(102.9, 102.9)));
    }

    #[test]
    fn zero_threshold_promotes_on_any_motion() {
        let t = GestureThresholds::new(0.0, 0);
        assert!(!t.should_promote(Point::ZERO, Point::ZERO));
        assert!(t.should_promote(Point::ZERO, Point::new(0.1, 0.0)));
    }

    #[test]
    fn defaults() {
        assert_eq!(GestureThresholds::default(), GestureThresholds::new(3.0, 1_000));
    }
}
