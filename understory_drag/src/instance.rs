// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-draggable state.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use kurbo::{Point, Rect, Vec2};
use understory_attribute::{Attr, AttributeStore, Schema};
use understory_timing::TimerId;

use crate::event::{Listeners, TargetId};
use crate::geometry::CoordinateTracker;
use crate::groups::Groups;
use crate::host::Subscription;
use crate::threshold::GestureThresholds;
use crate::validate::{Handle, TargetValidator};

/// Identifies a draggable registered with a [`DragManager`](crate::DragManager).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DragId(u32);

impl DragId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DragId({})", self.0)
    }
}

/// Where a draggable is in its current gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No gesture.
    #[default]
    Idle,
    /// A valid press is waiting for the distance or time threshold.
    Armed,
    /// The surrogate follows the pointer.
    Dragging,
    /// The gesture is finishing; observed only by `End` listeners.
    Ended,
}

/// One draggable node and its gesture state.
///
/// Instances are owned by the manager; read them through
/// [`DragManager::instance`](crate::DragManager::instance).
pub struct DragInstance<N> {
    pub(crate) id: DragId,
    pub(crate) element: N,
    pub(crate) surrogate: N,
    pub(crate) validator: TargetValidator<N>,
    pub(crate) groups: Groups,
    pub(crate) attrs: AttributeStore,
    pub(crate) tracker: CoordinateTracker,
    pub(crate) thresholds: GestureThresholds,
    pub(crate) phase: Phase,
    pub(crate) active_handle: Option<N>,
    pub(crate) click_timer: Option<TimerId>,
    /// Press location, replayed as the first move on a hold promotion.
    pub(crate) down_point: Point,
    /// Raw pointer position of the last move seen, before alignment.
    pub(crate) last_pointer: Point,
    pub(crate) start_time: u64,
    pub(crate) end_time: u64,
    pub(crate) subscriptions: Vec<Subscription>,
    pub(crate) listeners: Listeners<N>,
    pub(crate) target: Option<TargetId>,
}

impl<N> DragInstance<N> {
    pub(crate) fn new(id: DragId, element: N, surrogate: N) -> Self
    where
        N: Clone + PartialEq,
    {
        Self {
            id,
            element,
            surrogate,
            validator: TargetValidator::new(),
            groups: Groups::default(),
            attrs: AttributeStore::new(),
            tracker: CoordinateTracker::default(),
            thresholds: GestureThresholds::default(),
            phase: Phase::Idle,
            active_handle: None,
            click_timer: None,
            down_point: Point::ZERO,
            last_pointer: Point::ZERO,
            start_time: 0,
            end_time: 0,
            subscriptions: Vec::new(),
            listeners: Listeners::default(),
            target: None,
        }
    }

    /// Effective attribute value, or `fallback` if the schema does not declare
    /// it with type `T`.
    pub(crate) fn attr_or<T: Clone + 'static>(&self, schema: &Schema, attr: Attr<T>, fallback: T) -> T {
        self.attrs.get(schema, attr).unwrap_or(fallback)
    }

    /// This instance's id.
    #[must_use]
    pub fn id(&self) -> DragId {
        self.id
    }

    /// The node made draggable.
    #[must_use]
    pub fn element(&self) -> &N {
        &self.element
    }

    /// The node moved during a drag.
    #[must_use]
    pub fn surrogate(&self) -> &N {
        &self.surrogate
    }

    /// Current gesture phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` while the surrogate follows the pointer.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    /// Start handles.
    #[must_use]
    pub fn handles(&self) -> &[Handle<N>]
    where
        N: Clone + PartialEq,
    {
        self.validator.handles()
    }

    /// Deny-list selectors.
    #[must_use]
    pub fn invalids(&self) -> &[String]
    where
        N: Clone + PartialEq,
    {
        self.validator.invalids()
    }

    /// The handle that accepted the current or most recent press.
    #[must_use]
    pub fn active_handle(&self) -> Option<&N> {
        self.active_handle.as_ref()
    }

    /// Group membership.
    #[must_use]
    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    /// Surrogate region after the last accepted move.
    #[must_use]
    pub fn region(&self) -> Rect {
        self.tracker.region()
    }

    /// Movement of the last accepted move.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.tracker.delta()
    }

    /// Surrogate origin committed by the last accepted move.
    #[must_use]
    pub fn last_point(&self) -> Point {
        self.tracker.last()
    }

    /// Pointer position the gesture started from.
    #[must_use]
    pub fn start_point(&self) -> Point {
        self.tracker.start()
    }

    /// Surrogate origin when the gesture started.
    #[must_use]
    pub fn node_point(&self) -> Point {
        self.tracker.node()
    }

    /// Thresholds captured when the current gesture armed.
    #[must_use]
    pub fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }

    /// Promotion timestamp of the current or most recent drag.
    #[must_use]
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Release timestamp of the most recent drag.
    #[must_use]
    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    /// The drop-target counterpart, if one was created.
    #[must_use]
    pub fn target(&self) -> Option<TargetId> {
        self.target
    }
}

impl<N: fmt::Debug> fmt::Debug for DragInstance<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragInstance")
            .field("id", &self.id)
            .field("element", &self.element)
            .field("surrogate", &self.surrogate)
            .field("phase", &self.phase)
            .field("groups", &self.groups)
            .field("region", &self.tracker.region())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
