// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture transitions: `Idle → Armed → Dragging → Ended → Idle`.
//!
//! ## Input routing
//!
//! - [`DragManager::pointer_down`] goes to one instance (the host knows which
//!   node it subscribed for).
//! - [`DragManager::pointer_move`] and [`DragManager::pointer_up`] are
//!   broadcast: the manager forwards them to the instance holding the active
//!   slot, or else to the armed candidate.
//! - [`DragManager::advance`] fires due hold timers. Hosts can use
//!   [`DragManager::next_deadline`] to schedule a wake-up.
//!
//! ## Ordering
//!
//! When a move and a due hold timer are both ready in one call, the move is
//! processed first, so a press that crossed the distance threshold starts at
//! the pointer rather than at the press location. A release fires timers that
//! fell due before it, then ends the gesture.

use kurbo::Point;
use understory_timing::TimerId;

use crate::config::{
    CLICK_PIXEL_THRESH, CLICK_TIME_THRESH, LOCK, MOVE, OFFSET_NODE, PRIMARY_BUTTON_ONLY,
    START_CENTERED,
};
use crate::event::{DragEventKind, DragPayload};
use crate::host::{DragHost, PointerButton, PointerEvent};
use crate::instance::{DragId, Phase};
use crate::manager::DragManager;
use crate::threshold::GestureThresholds;

impl<H: DragHost> DragManager<H> {
    /// Handles a press on the node of `id`.
    ///
    /// Emits `MouseDown`; unless a listener prevents it, validates the press
    /// and arms the gesture. `AfterMouseDown` follows either way. Returns
    /// `true` if the gesture armed.
    ///
    /// A second press on an instance already mid-gesture is ignored. A press
    /// while another instance holds the gesture is still announced through
    /// `MouseDown` and `AfterMouseDown`, but does not arm.
    pub fn pointer_down(&mut self, id: DragId, event: PointerEvent<H::Node>, now: u64) -> bool {
        self.now = now;
        let Some(inst) = self.instances.get(&id) else {
            log::warn!("pointer-down for unknown {id:?}");
            return false;
        };
        if matches!(inst.phase, Phase::Armed | Phase::Dragging) {
            log::trace!("{id:?} ignores a second press mid-gesture");
            return false;
        }

        let down = self.fire(
            id,
            DragEventKind::MouseDown,
            DragPayload::Pointer(event.clone()),
        );
        let armed = !down.is_default_prevented() && self.arm(id, &event, now);
        self.fire(id, DragEventKind::AfterMouseDown, DragPayload::Pointer(event));
        self.flush();
        armed
    }

    /// Broadcasts a pointer move to the gesture in progress, then fires due
    /// hold timers.
    pub fn pointer_move(&mut self, point: Point, now: u64) {
        self.now = now;
        if let Some(id) = self.gesture_owner() {
            self.process_move(id, point, now);
        }
        self.fire_due(now);
        self.flush();
    }

    /// Broadcasts a release to the gesture in progress.
    ///
    /// An armed gesture resets silently: it was a click. A drag whose last
    /// processed pointer position differs from `point` first moves there, then
    /// ends.
    pub fn pointer_up(&mut self, point: Point, now: u64) {
        self.now = now;
        self.fire_due(now);
        if let Some(id) = self.gesture_owner() {
            let final_move = self
                .instances
                .get(&id)
                .is_some_and(|inst| inst.phase == Phase::Dragging && inst.last_pointer != point);
            if final_move {
                self.process_move(id, point, now);
            }
            self.end_gesture(id, now);
        }
        self.flush();
    }

    /// Fires hold timers due at `now`.
    pub fn advance(&mut self, now: u64) {
        self.now = now;
        self.fire_due(now);
        self.flush();
    }

    /// Earliest pending hold-timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Ends the gesture of `id` as if the pointer had been released where the
    /// surrogate last moved. An armed gesture resets without events.
    ///
    /// Returns `false` if `id` had no gesture in progress. Listeners should use
    /// [`DragEvent::stop_drag`](crate::DragEvent::stop_drag) instead.
    pub fn stop_drag(&mut self, id: DragId, now: u64) -> bool {
        self.now = now;
        let stopped = self.stop_now(id);
        self.flush();
        stopped
    }

    pub(crate) fn stop_now(&mut self, id: DragId) -> bool {
        let in_progress = self
            .instances
            .get(&id)
            .is_some_and(|inst| matches!(inst.phase, Phase::Armed | Phase::Dragging));
        if !in_progress {
            return false;
        }
        log::debug!("{id:?} stopped");
        self.end_gesture(id, self.now);
        true
    }

    fn arm(&mut self, id: DragId, event: &PointerEvent<H::Node>, now: u64) -> bool {
        let Some(inst) = self.instances.get(&id) else {
            return false;
        };
        if inst.attr_or(&self.schema, PRIMARY_BUTTON_ONLY, true)
            && event.button != PointerButton::Primary
        {
            log::trace!("{id:?} ignores {:?} button", event.button);
            return false;
        }
        let Some(handle) = inst
            .validator
            .validate(&self.host, &inst.element, &event.target)
        else {
            log::trace!("{id:?} press at {:?} is not a valid start", event.point);
            return false;
        };
        let defaults = GestureThresholds::default();
        let thresholds = GestureThresholds::new(
            inst.attr_or(&self.schema, CLICK_PIXEL_THRESH, defaults.pixels),
            inst.attr_or(&self.schema, CLICK_TIME_THRESH, defaults.time_ms),
        );
        let offset = inst.attr_or(&self.schema, OFFSET_NODE, true);
        let surrogate = self.host.bounding_box(&inst.surrogate);

        if let Err(err) = self.register_candidate(id) {
            log::warn!("{id:?} cannot arm: {err}");
            return false;
        }
        let Some(inst) = self.instances.get_mut(&id) else {
            return false;
        };
        inst.active_handle = Some(handle);
        inst.tracker.begin(event.point, surrogate, offset);
        inst.thresholds = thresholds;
        inst.down_point = event.point;
        inst.last_pointer = event.point;
        inst.phase = Phase::Armed;
        inst.click_timer = Some(self.timers.schedule(now, thresholds.time_ms, id));
        log::debug!("{id:?} armed at {:?}", event.point);
        true
    }

    fn process_move(&mut self, id: DragId, point: Point, now: u64) {
        let Some(inst) = self.instances.get_mut(&id) else {
            return;
        };
        if inst.attr_or(&self.schema, LOCK, false) {
            log::trace!("{id:?} is locked; move ignored");
            return;
        }
        inst.last_pointer = point;
        let phase = inst.phase;
        match phase {
            Phase::Armed => {
                if inst.thresholds.should_promote(inst.tracker.start(), point)
                    && self.start_drag(id, now)
                {
                    self.align_node(id, point);
                }
            }
            Phase::Dragging => self.align_node(id, point),
            Phase::Idle | Phase::Ended => {}
        }
    }

    /// Hold timer for `id` fired.
    fn timeout_check(&mut self, id: DragId, timer: TimerId, now: u64) {
        let Some(inst) = self.instances.get_mut(&id) else {
            return;
        };
        if inst.click_timer != Some(timer) {
            return;
        }
        inst.click_timer = None;
        if inst.phase != Phase::Armed {
            return;
        }
        if inst.attr_or(&self.schema, LOCK, false) {
            log::debug!("{id:?} hold elapsed while locked");
            return;
        }
        let down = inst.down_point;
        inst.last_pointer = down;
        log::debug!("{id:?} hold threshold reached");
        if self.start_drag(id, now) {
            self.align_node(id, down);
        }
    }

    fn fire_due(&mut self, now: u64) {
        while let Some((timer, id)) = self.timers.pop_due(now) {
            self.timeout_check(id, timer, now);
        }
    }

    /// Promotion: `Armed → Dragging`.
    fn start_drag(&mut self, id: DragId, now: u64) -> bool {
        let ready = self.instances.get(&id).is_some_and(|inst| {
            inst.phase == Phase::Armed && !inst.attr_or(&self.schema, LOCK, false)
        });
        if !ready {
            return false;
        }
        if let Err(err) = self.promote(id) {
            log::warn!("{id:?} cannot start: {err}");
            return false;
        }
        let Some(inst) = self.instances.get_mut(&id) else {
            return false;
        };
        if let Some(timer) = inst.click_timer.take() {
            self.timers.cancel(timer);
        }
        let size = self.host.bounding_box(&inst.surrogate).size();
        let region = inst.tracker.start_region(size);
        if inst.attr_or(&self.schema, START_CENTERED, false) {
            let offset = inst.attr_or(&self.schema, OFFSET_NODE, true);
            inst.tracker.recenter(offset);
        }
        inst.phase = Phase::Dragging;
        inst.start_time = now;
        let page = inst.tracker.node();
        self.host.add_class(&inst.element, &self.classes.dragging);
        if let Some(c) = self.coordinator.as_mut() {
            c.drag_started(id, region);
        }
        log::debug!("{id:?} started at {page:?}");
        self.fire(
            id,
            DragEventKind::Start,
            DragPayload::Start {
                page,
                start_time: now,
            },
        );
        true
    }

    /// `Align`, then commit the move and `Drag`.
    fn align_node(&mut self, id: DragId, pointer: Point) {
        let align = self.fire(id, DragEventKind::Align, DragPayload::Align { page: pointer });
        if align.is_default_prevented() {
            log::trace!("{id:?} move to {pointer:?} rejected");
            return;
        }
        let page = align.page().unwrap_or(pointer);

        let Some(inst) = self.instances.get_mut(&id) else {
            return;
        };
        let actual = inst.tracker.align(page);
        let info = inst.tracker.commit(actual);
        let region = inst.tracker.region();
        log::trace!("{id:?} at {actual:?}, delta {:?}", info.delta);
        if let Some(c) = self.coordinator.as_mut() {
            c.drag_moved(id, region);
        }

        let drag = self.fire(
            id,
            DragEventKind::Drag,
            DragPayload::Drag { page: actual, info },
        );
        if drag.is_default_prevented() {
            return;
        }
        if let Some(inst) = self.instances.get(&id) {
            if inst.attr_or(&self.schema, MOVE, true) {
                self.host.set_position(&inst.surrogate, actual);
            }
        }
    }

    /// `Dragging → Ended → Idle`, or `Armed → Idle` for a click.
    fn end_gesture(&mut self, id: DragId, now: u64) {
        let Some(inst) = self.instances.get_mut(&id) else {
            return;
        };
        if let Some(timer) = inst.click_timer.take() {
            self.timers.cancel(timer);
        }
        let phase = inst.phase;
        match phase {
            Phase::Armed => log::debug!("{id:?} released before promotion"),
            Phase::Dragging => {
                inst.phase = Phase::Ended;
                inst.end_time = now;
                let page = inst.tracker.last();
                let start_time = inst.start_time;
                log::debug!("{id:?} ended at {page:?}");
                let end = self.fire(
                    id,
                    DragEventKind::End,
                    DragPayload::End {
                        page,
                        start_time,
                        end_time: now,
                    },
                );
                if end.is_default_prevented() {
                    if let Some(inst) = self.instances.get(&id) {
                        log::debug!("{id:?} end prevented; snapping back");
                        self.host.set_position(&inst.surrogate, inst.tracker.node());
                    }
                }
                if let Some(c) = self.coordinator.as_mut() {
                    c.drag_ended(id);
                }
            }
            Phase::Idle | Phase::Ended => return,
        }
        self.reset(id);
    }

    fn reset(&mut self, id: DragId) {
        if let Some(inst) = self.instances.get_mut(&id) {
            if matches!(inst.phase, Phase::Dragging | Phase::Ended) {
                self.host.remove_class(&inst.element, &self.classes.dragging);
            }
            inst.phase = Phase::Idle;
            if let Some(timer) = inst.click_timer.take() {
                self.timers.cancel(timer);
            }
        }
        self.release(id);
    }
}
