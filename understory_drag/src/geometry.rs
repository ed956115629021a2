// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate tracking: pointer-to-surrogate offsets, deltas and regions.
//!
//! ## Usage
//!
//! 1) Call [`CoordinateTracker::begin`] on a valid pointer-down with the
//!    pointer position and the surrogate's bounding box.
//! 2) On every move, map the pointer to a surrogate origin with
//!    [`CoordinateTracker::align`].
//! 3) If the move is accepted, commit that origin with
//!    [`CoordinateTracker::commit`]; it returns the [`DragInfo`] for the move
//!    and updates `last`, `delta` and `region`.
//! 4) Call [`CoordinateTracker::reset`] when the gesture ends.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_drag::geometry::CoordinateTracker;
//!
//! let mut tracker = CoordinateTracker::default();
//!
//! // Press at (15, 12) on a 20×10 surrogate sitting at (10, 10).
//! tracker.begin(Point::new(15.0, 12.0), Rect::new(10.0, 10.0, 30.0, 20.0), true);
//! assert_eq!(tracker.offset(), Vec2::new(5.0, 2.0));
//!
//! // The surrogate keeps its grab offset while following the pointer.
//! let origin = tracker.align(Point::new(25.0, 22.0));
//! assert_eq!(origin, Point::new(20.0, 20.0));
//!
//! let info = tracker.commit(origin);
//! assert_eq!(info.delta, Vec2::new(10.0, 10.0));
//! assert_eq!(tracker.region(), Rect::new(20.0, 20.0, 40.0, 30.0));
//! ```
//!
//! This is plain arithmetic; nothing here needs a rendering surface.

use kurbo::{Point, Rect, Size, Vec2};

/// Per-move details reported with every `drag` event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragInfo {
    /// Surrogate origin when the gesture started.
    pub start: Point,
    /// Surrogate origin after this move.
    pub xy: Point,
    /// Movement since the previous accepted move.
    pub delta: Vec2,
    /// Total movement since the gesture started.
    pub offset: Vec2,
}

/// Tracks the geometry of one gesture.
#[derive(Copy, Clone, Debug, Default)]
pub struct CoordinateTracker {
    start: Point,
    node: Point,
    offset: Vec2,
    last: Point,
    delta: Vec2,
    size: Size,
    region: Rect,
}

impl CoordinateTracker {
    /// Starts tracking from a pointer-down at `pointer` on a surrogate whose
    /// page-space bounding box is `surrogate`.
    ///
    /// With `offset_from_pointer`, the surrogate keeps the grab offset
    /// `pointer - origin`; without it, the surrogate's origin snaps to the
    /// pointer.
    pub fn begin(&mut self, pointer: Point, surrogate: Rect, offset_from_pointer: bool) {
        self.node = surrogate.origin();
        self.size = surrogate.size();
        self.last = self.node;
        self.delta = Vec2::ZERO;
        self.set_start(pointer, offset_from_pointer);
        self.region = Rect::from_origin_size(self.node, self.size);
    }

    fn set_start(&mut self, start: Point, offset_from_pointer: bool) {
        self.start = start;
        self.offset = if offset_from_pointer {
            start - self.node
        } else {
            Vec2::ZERO
        };
    }

    /// Moves the start point to the surrogate's visual center.
    ///
    /// Afterwards the surrogate follows the pointer centered under it.
    pub fn recenter(&mut self, offset_from_pointer: bool) {
        let center = self.node + self.size.to_vec2() / 2.0;
        self.set_start(center, offset_from_pointer);
    }

    /// Recomputes the region at the gesture's starting origin.
    ///
    /// Used at promotion time, when the surrogate has not moved yet.
    pub fn start_region(&mut self, size: Size) -> Rect {
        self.size = size;
        self.region = Rect::from_origin_size(self.node, size);
        self.region
    }

    /// Maps a pointer position to a surrogate origin: `pointer - offset`.
    ///
    /// Does not modify the tracked state; [`commit`](Self::commit) does.
    #[must_use]
    pub fn align(&self, pointer: Point) -> Point {
        pointer - self.offset
    }

    /// Accepts `actual` as the surrogate's new origin.
    ///
    /// Updates `delta`, `region` and finally `last`.
    pub fn commit(&mut self, actual: Point) -> DragInfo {
        self.delta = actual - self.last;
        self.region = Rect::from_origin_size(actual, self.size);
        let info = DragInfo {
            start: self.node,
            xy: actual,
            delta: self.delta,
            offset: actual - self.node,
        };
        self.last = actual;
        info
    }

    /// Clears the per-gesture state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pointer position captured at pointer-down (or the recentered start).
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Surrogate origin at gesture start.
    #[must_use]
    pub fn node(&self) -> Point {
        self.node
    }

    /// Grab offset between the start point and the surrogate origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Origin committed by the last accepted move.
    #[must_use]
    pub fn last(&self) -> Point {
        self.last
    }

    /// Movement of the last accepted move.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Surrogate region: `x0` is left, `y0` top, `x1` right, `y1` bottom.
    #[must_use]
    pub fn region(&self) -> Rect {
        self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surrogate_at(x: f64, y: f64) -> Rect {
        Rect::from_origin_size((x, y), (40.0, 30.0))
    }

    #[test]
    fn begin_captures_offset() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(12.0, 15.0), surrogate_at(10.0, 10.0), true);
        assert_eq!(t.start(), Point::new(12.0, 15.0));
        assert_eq!(t.node(), Point::new(10.0, 10.0));
        assert_eq!(t.offset(), Vec2::new(2.0, 5.0));
        assert_eq!(t.last(), t.node());
    }

    #[test]
    fn offset_is_zero_without_offset_from_pointer() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(12.0, 15.0), surrogate_at(10.0, 10.0), false);
        assert_eq!(t.offset(), Vec2::ZERO);
        assert_eq!(t.align(Point::new(50.0, 60.0)), Point::new(50.0, 60.0));
    }

    #[test]
    fn delta_is_relative_to_previous_commit() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(0.0, 0.0), surrogate_at(0.0, 0.0), true);

        let p = t.align(Point::new(5.0, 3.0));
        let first = t.commit(p);
        assert_eq!(first.delta, Vec2::new(5.0, 3.0));

        let p = t.align(Point::new(8.0, 7.0));
        let second = t.commit(p);
        assert_eq!(second.delta, Vec2::new(3.0, 4.0));
        assert_eq!(second.offset, Vec2::new(8.0, 7.0));
        assert_eq!(second.start, Point::ZERO);
    }

    #[test]
    fn align_without_commit_keeps_last() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(0.0, 0.0), surrogate_at(0.0, 0.0), true);
        t.commit(Point::new(4.0, 4.0));

        let _ = t.align(Point::new(100.0, 100.0));
        assert_eq!(t.last(), Point::new(4.0, 4.0));

        let info = t.commit(Point::new(6.0, 4.0));
        assert_eq!(info.delta, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn region_follows_commits() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(10.0, 10.0), surrogate_at(10.0, 10.0), true);
        assert_eq!(t.region(), Rect::new(10.0, 10.0, 50.0, 40.0));

        t.commit(Point::new(-5.0, 20.0));
        let r = t.region();
        assert_eq!((r.y0, r.x0, r.x1, r.y1), (20.0, -5.0, 35.0, 50.0));
    }

    #[test]
    fn recenter_puts_pointer_at_center() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(11.0, 11.0), surrogate_at(10.0, 10.0), true);
        t.recenter(true);
        assert_eq!(t.start(), Point::new(30.0, 25.0));
        assert_eq!(t.offset(), Vec2::new(20.0, 15.0));
        assert_eq!(t.align(Point::new(100.0, 100.0)), Point::new(80.0, 85.0));
    }

    #[test]
    fn start_region_uses_fresh_size() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(0.0, 0.0), surrogate_at(3.0, 4.0), true);
        let r = t.start_region(Size::new(10.0, 10.0));
        assert_eq!(r, Rect::new(3.0, 4.0, 13.0, 14.0));
    }

    #[test]
    fn negative_and_fractional_movement() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(100.0, 100.0), surrogate_at(100.0, 100.0), true);
        let p = t.align(Point::new(90.5, 85.25));
        let info = t.commit(p);
        assert_eq!(info.delta, Vec2::new(-9.5, -14.75));
    }

    #[test]
    fn reset_clears_state() {
        let mut t = CoordinateTracker::default();
        t.begin(Point::new(1.0, 2.0), surrogate_at(3.0, 4.0), true);
        t.commit(Point::new(9.0, 9.0));
        t.reset();
        assert_eq!(t.last(), Point::ZERO);
        assert_eq!(t.region(), Rect::ZERO);
    }
}
