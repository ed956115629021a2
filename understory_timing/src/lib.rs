// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives.
//!
//! UI state machines frequently need "call me back in N milliseconds": a
//! press-and-hold recognizer, say, or a tooltip delay. This
//! crate provides the bookkeeping half of that contract without owning a clock
//! or an event loop:
//!
//! - The host supplies the current time (any monotonically increasing `u64`
//!   millisecond counter) on every call.
//! - [`TimerQueue::schedule`] records a deadline and a payload and returns a
//!   cancellable [`TimerId`].
//! - [`TimerQueue::pop_due`] hands back expired timers in deadline order.
//! - [`TimerQueue::next_deadline`] tells the host when it should wake up next.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let hold = timers.schedule(1_000, 500, "hold");
//! let tip = timers.schedule(1_000, 200, "tooltip");
//!
//! assert_eq!(timers.next_deadline(), Some(1_200));
//! assert_eq!(timers.pop_due(1_100), None);
//! assert_eq!(timers.pop_due(1_250), Some((tip, "tooltip")));
//!
//! // Cancelled timers never fire.
//! assert_eq!(timers.cancel(hold), Some("hold"));
//! assert_eq!(timers.pop_due(10_000), None);
//! ```
//!
//! ## Ordering
//!
//! Timers fire in deadline order. Timers sharing a deadline fire in the order
//! they were scheduled, so a host draining the queue gets a deterministic
//! sequence regardless of how coarse its clock is.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

/// Identifies a scheduled timer.
///
/// Ids are never reused by the queue that issued them.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw id value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TimerId").field(&self.0).finish()
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    deadline: u64,
    id: TimerId,
    payload: T,
}

/// A queue of pending one-shot timers.
///
/// Entries are kept sorted by `(deadline, id)` so popping the next due timer
/// is a removal from the front. Timer counts in UI code are tiny, so a sorted
/// `Vec` beats a heap here and keeps cancellation simple.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire `delay_ms` after `now`.
    ///
    /// The deadline saturates at `u64::MAX`.
    pub fn schedule(&mut self, now: u64, delay_ms: u64, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay_ms), payload)
    }

    /// Schedules `payload` to fire at the absolute time `deadline`.
    pub fn schedule_at(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let idx = self
            .entries
            .partition_point(|e| (e.deadline, e.id) <= (deadline, id));
        self.entries.insert(
            idx,
            Entry {
                deadline,
                id,
                payload,
            },
        );
        id
    }

    /// Cancels a pending timer, returning its payload.
    ///
    /// Returns `None` if the timer already fired or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx).payload)
    }

    /// Returns `true` if the timer is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Returns the deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.deadline)
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.first().map(|e| e.deadline)
    }

    /// Removes and returns the next timer whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerId, T)> {
        if self.entries.first()?.deadline > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.id, entry.payload))
    }

    /// Returns the number of pending timers.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cancels every pending timer whose payload matches `pred`.
    ///
    /// Returns the number of timers removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.payload));
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_queue_has_nothing_due() {
        let mut timers = TimerQueue::<u32>::new();
        assert!(timers.is_empty());
        assert_eq!(timers.next_deadline(), None);
        assert_eq!(timers.pop_due(u64::MAX), None);
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule(0, 300, 'c');
        let early = timers.schedule(0, 100, 'a');
        let mid = timers.schedule(0, 200, 'b');

        let mut fired = vec![];
        while let Some(t) = timers.pop_due(1_000) {
            fired.push(t);
        }
        assert_eq!(fired, vec![(early, 'a'), (mid, 'b'), (late, 'c')]);
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut timers = TimerQueue::new();
        let first = timers.schedule_at(50, 1);
        let second = timers.schedule_at(50, 2);
        assert_eq!(timers.pop_due(50), Some((first, 1)));
        assert_eq!(timers.pop_due(50), Some((second, 2)));
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(10, 500, ());
        assert_eq!(timers.deadline(id), Some(510));
        assert_eq!(timers.pop_due(509), None);
        assert_eq!(timers.pop_due(510), Some((id, ())));
    }

    #[test]
    fn cancel_removes_pending_timer_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(0, 10, "x");
        assert!(timers.is_pending(id));
        assert_eq!(timers.cancel(id), Some("x"));
        assert!(!timers.is_pending(id));
        assert_eq!(timers.cancel(id), None, "second cancel is a no-op");
        assert_eq!(timers.pop_due(100), None);
    }

    #[test]
    fn cancel_after_fire_is_none() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(0, 10, 7);
        assert_eq!(timers.pop_due(10), Some((id, 7)));
        assert_eq!(timers.cancel(id), None);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(0, 1, ());
        timers.cancel(a);
        let b = timers.schedule(0, 1, ());
        assert_ne!(a, b);
    }

    #[test]
    fn schedule_saturates() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(u64::MAX - 1, 10, ());
        assert_eq!(timers.deadline(id), Some(u64::MAX));
    }

    #[test]
    fn cancel_where_filters_by_payload() {
        let mut timers = TimerQueue::new();
        timers.schedule(0, 1, 1_u32);
        timers.schedule(0, 2, 2_u32);
        timers.schedule(0, 3, 1_u32);
        assert_eq!(timers.cancel_where(|p| *p == 1), 2);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(2));
    }
}
