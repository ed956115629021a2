// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed lifecycle events and their listeners.
//!
//! Every event a draggable emits is a [`DragEvent`] tagged with a
//! [`DragEventKind`]. Listeners registered on the instance run first, then
//! listeners registered on the [`DragManager`](crate::DragManager), which acts
//! as the bubble target for every draggable.
//!
//! ## Default actions
//!
//! Some kinds carry a default action that runs after all listeners:
//!
//! | Kind | Default action | Effect of [`DragEvent::prevent_default`] |
//! |---|---|---|
//! | [`MouseDown`](DragEventKind::MouseDown) | validate and arm the gesture | the press is ignored |
//! | [`Align`](DragEventKind::Align) | map the (possibly adjusted) page point to the surrogate | the move is rejected |
//! | [`Drag`](DragEventKind::Drag) | reposition the surrogate | the surrogate stays put |
//! | [`End`](DragEventKind::End) | leave the surrogate at the drop point | the surrogate snaps back |
//!
//! ## Re-entrancy
//!
//! Listeners never get a handle on the manager. To stop the drag, destroy the
//! instance or toggle its lock from inside a listener, call
//! [`DragEvent::stop_drag`], [`DragEvent::destroy`] or
//! [`DragEvent::set_lock`]; the manager applies these once the current
//! transition has finished.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use kurbo::Point;
use smallvec::SmallVec;

use crate::geometry::DragInfo;
use crate::host::PointerEvent;
use crate::instance::DragId;
use crate::validate::Handle;

/// Opaque id of a drop target, issued by the external drop matcher.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// What happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    /// Pointer pressed on the draggable node.
    MouseDown,
    /// Fired after the press was handled, whether or not it armed.
    AfterMouseDown,
    /// A handle was added.
    AddHandle,
    /// A handle was removed.
    RemoveHandle,
    /// A deny-list selector was added.
    AddInvalid,
    /// A deny-list selector was removed.
    RemoveInvalid,
    /// The press was promoted to a drag.
    Start,
    /// The surrogate is about to move; listeners may adjust the page point.
    Align,
    /// The surrogate moved.
    Drag,
    /// The drag finished.
    End,
    /// Dropped on a target.
    DropHit,
    /// Dropped outside every target.
    DropMiss,
    /// Moving over a target.
    Over,
    /// Entered a target.
    Enter,
    /// Left a target.
    Exit,
}

impl DragEventKind {
    /// Returns `true` if [`DragEvent::prevent_default`] has an effect.
    #[must_use]
    pub const fn is_preventable(self) -> bool {
        matches!(self, Self::MouseDown | Self::Align | Self::Drag | Self::End)
    }

    /// Returns `true` for the kinds fired on behalf of the drop matcher.
    #[must_use]
    pub const fn is_drop_kind(self) -> bool {
        matches!(
            self,
            Self::DropHit | Self::DropMiss | Self::Over | Self::Enter | Self::Exit
        )
    }
}

/// Data carried by an event.
#[derive(Clone, Debug, PartialEq)]
pub enum DragPayload<N> {
    /// The raw press (`MouseDown`, `AfterMouseDown`).
    Pointer(PointerEvent<N>),
    /// The handle that was added or removed.
    Handle(Handle<N>),
    /// The deny-list selector that was added or removed.
    Invalid(String),
    /// Promotion: surrogate origin at gesture start, and the promotion time.
    Start {
        /// Surrogate origin when the gesture started.
        page: Point,
        /// Promotion timestamp in host milliseconds.
        start_time: u64,
    },
    /// Page point to align to.
    Align {
        /// Page point the surrogate origin is derived from.
        page: Point,
    },
    /// A committed move.
    Drag {
        /// New surrogate origin.
        page: Point,
        /// Start, position, per-move delta and total offset.
        info: DragInfo,
    },
    /// Gesture end.
    End {
        /// Last committed surrogate origin.
        page: Point,
        /// Promotion timestamp.
        start_time: u64,
        /// Release timestamp.
        end_time: u64,
    },
    /// Drop collaboration events name the target involved, if any.
    Drop {
        /// The target involved.
        target: Option<TargetId>,
    },
}

/// A deferred request made by a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragCommand {
    /// End the gesture as if the pointer had been released.
    StopDrag,
    /// Destroy the instance.
    Destroy,
    /// Lock or unlock the instance.
    SetLock(bool),
}

/// An event delivered to listeners.
#[derive(Clone, Debug)]
pub struct DragEvent<N> {
    drag: DragId,
    kind: DragEventKind,
    payload: DragPayload<N>,
    prevented: bool,
    commands: SmallVec<[DragCommand; 2]>,
}

impl<N> DragEvent<N> {
    pub(crate) fn new(drag: DragId, kind: DragEventKind, payload: DragPayload<N>) -> Self {
        Self {
            drag,
            kind,
            payload,
            prevented: false,
            commands: SmallVec::new(),
        }
    }

    /// The instance that emitted the event.
    #[must_use]
    pub fn drag(&self) -> DragId {
        self.drag
    }

    /// The event kind.
    #[must_use]
    pub fn kind(&self) -> DragEventKind {
        self.kind
    }

    /// The event data.
    #[must_use]
    pub fn payload(&self) -> &DragPayload<N> {
        &self.payload
    }

    /// The page point carried by `Start`, `Align`, `Drag` and `End` events.
    #[must_use]
    pub fn page(&self) -> Option<Point> {
        match self.payload {
            DragPayload::Start { page, .. }
            | DragPayload::Align { page }
            | DragPayload::Drag { page, .. }
            | DragPayload::End { page, .. } => Some(page),
            _ => None,
        }
    }

    /// Adjusts the page point of an `Align` event, e.g. to snap to a grid.
    ///
    /// Returns `false` and does nothing for any other kind.
    pub fn set_page(&mut self, point: Point) -> bool {
        match &mut self.payload {
            DragPayload::Align { page } => {
                *page = point;
                true
            }
            _ => false,
        }
    }

    /// Suppresses the default action, if the kind has one.
    pub fn prevent_default(&mut self) {
        if self.kind.is_preventable() {
            self.prevented = true;
        } else {
            log::debug!("{:?} cannot be prevented", self.kind);
        }
    }

    /// Returns `true` if a listener suppressed the default action.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.prevented
    }

    /// Requests that the gesture be stopped after this transition.
    pub fn stop_drag(&mut self) {
        self.commands.push(DragCommand::StopDrag);
    }

    /// Requests that the instance be destroyed after this transition.
    pub fn destroy(&mut self) {
        self.commands.push(DragCommand::Destroy);
    }

    /// Requests a lock change after this transition.
    pub fn set_lock(&mut self, lock: bool) {
        self.commands.push(DragCommand::SetLock(lock));
    }

    /// Commands requested so far.
    #[must_use]
    pub fn commands(&self) -> &[DragCommand] {
        &self.commands
    }

    pub(crate) fn take_commands(&mut self) -> SmallVec<[DragCommand; 2]> {
        core::mem::take(&mut self.commands)
    }
}

/// A boxed event listener.
pub type Listener<N> = Box<dyn FnMut(&mut DragEvent<N>)>;

/// Identifies a registered listener, for removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Listeners grouped by kind, run in registration order.
pub(crate) struct Listeners<N> {
    entries: Vec<(ListenerId, DragEventKind, Listener<N>)>,
}

impl<N> Default for Listeners<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N> Listeners<N> {
    pub(crate) fn add(&mut self, id: ListenerId, kind: DragEventKind, listener: Listener<N>) {
        self.entries.push((id, kind, listener));
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(lid, _, _)| *lid != id);
        before != self.entries.len()
    }

    pub(crate) fn dispatch(&mut self, event: &mut DragEvent<N>) {
        for (_, kind, listener) in &mut self.entries {
            if *kind == event.kind {
                listener(event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<N> fmt::Debug for Listeners<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    fn align_event() -> DragEvent<u32> {
        DragEvent::new(
            DragId::new(1),
            DragEventKind::Align,
            DragPayload::Align {
                page: Point::new(1.0, 2.0),
            },
        )
    }

    #[test]
    fn only_preventable_kinds_record_prevention() {
        let mut ev: DragEvent<u32> = DragEvent::new(
            DragId::new(1),
            DragEventKind::Start,
            DragPayload::Start {
                page: Point::ZERO,
                start_time: 0,
            },
        );
        ev.prevent_default();
        assert!(!ev.is_default_prevented());

        let mut ev = align_event();
        ev.prevent_default();
        assert!(ev.is_default_prevented());
    }

    #[test]
    fn set_page_only_applies_to_align() {
        let mut ev = align_event();
        assert!(ev.set_page(Point::new(10.0, 20.0)));
        assert_eq!(ev.page(), Some(Point::new(10.0, 20.0)));

        let mut ev: DragEvent<u32> = DragEvent::new(
            DragId::new(1),
            DragEventKind::End,
            DragPayload::End {
                page: Point::new(3.0, 3.0),
                start_time: 1,
                end_time: 2,
            },
        );
        assert!(!ev.set_page(Point::ZERO));
        assert_eq!(ev.page(), Some(Point::new(3.0, 3.0)));
    }

    #[test]
    fn commands_are_collected_and_taken() {
        let mut ev = align_event();
        ev.stop_drag();
        ev.set_lock(true);
        assert_eq!(
            ev.commands(),
            [DragCommand::StopDrag, DragCommand::SetLock(true)]
        );
        assert_eq!(ev.take_commands().len(), 2);
        assert!(ev.commands().is_empty());
    }

    #[test]
    fn listeners_filter_by_kind_and_keep_order() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut listeners = Listeners::default();
        for (i, kind) in [
            (1, DragEventKind::Align),
            (2, DragEventKind::Drag),
            (3, DragEventKind::Align),
        ] {
            let seen = seen.clone();
            listeners.add(
                ListenerId(i),
                kind,
                Box::new(move |_: &mut DragEvent<u32>| seen.borrow_mut().push(i)),
            );
        }
        listeners.dispatch(&mut align_event());
        assert_eq!(*seen.borrow(), [1, 3]);

        assert!(listeners.remove(ListenerId(1)));
        assert!(!listeners.remove(ListenerId(1)));
        assert_eq!(listeners.len(), 2);
    }
}
