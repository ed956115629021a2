// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag --heading-base-level=0

//! Understory Drag: pointer drag coordination for UI nodes.
//!
//! This crate turns raw pointer input into drag gestures. It decides whether a
//! press is a click or the start of a drag, tracks where the dragged surrogate
//! should be, checks that the press started on an allowed handle, and makes
//! sure only one drag is live at a time.
//!
//! ## Core Concepts
//!
//! - [`DragHost`]: the platform contract. Element geometry, containment,
//!   selector matching, positioning, style classes and input subscriptions.
//! - [`DragManager`]: owns every draggable ([`DragInstance`]), the hold timers
//!   and the single active-drag slot. Pointer moves and releases are broadcast
//!   to it and forwarded to the gesture in progress.
//! - [`geometry::CoordinateTracker`]: grab offset, per-move delta and the
//!   surrogate region. Pure arithmetic.
//! - [`threshold::GestureThresholds`]: click versus drag disambiguation by
//!   distance and hold time.
//! - [`TargetValidator`]: handle allow-list and selector deny-list.
//! - [`Groups`]: named groups consumed by an external drop matcher through
//!   [`DropCoordinator`].
//! - [`DragEvent`]: typed lifecycle events. `MouseDown`, `Align`, `Drag` and
//!   `End` can be prevented; `Align` can also be adjusted.
//!
//! Each instance runs `Idle → Armed → Dragging → Ended → Idle`. A press
//! arms; crossing the pixel threshold on either axis, or holding for the time
//! threshold, promotes to a drag; the release ends it. A release before
//! promotion is a click and fires no `Start` or `End`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_drag::{
//!     DragEventKind, DragHost, DragManager, DragOptions, ListenKind, PointerEvent, Subscription,
//! };
//!
//! /// A single 20×20 box.
//! struct OneBox(Point);
//!
//! impl DragHost for OneBox {
//!     type Node = u32;
//!     fn is_valid(&self, node: &u32) -> bool { *node == 0 }
//!     fn bounding_box(&self, _: &u32) -> Rect { Rect::from_origin_size(self.0, (20.0, 20.0)) }
//!     fn contains(&self, a: &u32, n: &u32) -> bool { a == n }
//!     fn matches_selector(&self, _: &u32, _: &str) -> bool { false }
//!     fn parent(&self, _: &u32) -> Option<u32> { None }
//!     fn query_all(&self, _: &u32, _: &str) -> Vec<u32> { Vec::new() }
//!     fn set_position(&mut self, _: &u32, p: Point) { self.0 = p; }
//!     fn add_class(&mut self, _: &u32, _: &str) {}
//!     fn remove_class(&mut self, _: &u32, _: &str) {}
//!     fn listen(&mut self, _: &u32, _: ListenKind) -> Subscription { Subscription(0) }
//!     fn unlisten(&mut self, _: Subscription) {}
//! }
//!
//! let mut drags = DragManager::new(OneBox(Point::new(10.0, 10.0))).unwrap();
//! let id = drags.register(DragOptions::new(0)).unwrap();
//!
//! // Snap the surrogate to a 10px grid.
//! drags.on(DragEventKind::Align, |ev| {
//!     let p = ev.page().unwrap();
//!     ev.set_page(Point::new((p.x / 10.0).round() * 10.0, (p.y / 10.0).round() * 10.0));
//! });
//!
//! drags.pointer_down(id, PointerEvent::primary((10.0, 10.0), 0), 0);
//! drags.pointer_move(Point::new(12.0, 11.0), 50);
//! assert!(!drags.instance(id).unwrap().is_dragging());
//!
//! drags.pointer_move(Point::new(27.0, 11.0), 80);
//! assert_eq!(drags.active_drag(), Some(id));
//! assert_eq!(drags.host().0, Point::new(30.0, 10.0));
//!
//! drags.pointer_up(Point::new(27.0, 11.0), 200);
//! assert_eq!(drags.active_drag(), None);
//! ```
//!
//! ## Re-entrancy
//!
//! Listeners receive the event, never the manager. Requests made through
//! [`DragEvent::stop_drag`], [`DragEvent::destroy`] and
//! [`DragEvent::set_lock`] are applied once the transition that fired the
//! event has finished.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or `libm` feature for Kurbo's float math.
//!
//! ## Logging
//!
//! Transitions are reported through the [`log`] facade: `debug` for arm,
//! promotion, end and reset, `trace` for individual moves, `warn` for rejected
//! registry operations. No logger is installed by this crate.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod event;
mod groups;
mod host;
mod instance;
mod lifecycle;
mod manager;
mod validate;

pub mod geometry;
pub mod threshold;

pub use config::{
    CLICK_PIXEL_THRESH, CLICK_TIME_THRESH, DragDefaults, DragOptions, LOCK, MOVE, OFFSET_NODE,
    PRIMARY_BUTTON_ONLY, START_CENTERED, drag_fragment, drag_schema, gesture_fragment,
};
pub use error::{DragError, SlotOccupied};
pub use event::{
    DragCommand, DragEvent, DragEventKind, DragPayload, Listener, ListenerId, TargetId,
};
pub use geometry::DragInfo;
pub use groups::{DEFAULT_GROUP, Groups};
pub use host::{
    DragHost, DropCoordinator, ListenKind, PointerButton, PointerEvent, Subscription,
};
pub use instance::{DragId, DragInstance, Phase};
pub use manager::DragManager;
pub use validate::{DEFAULT_INVALIDS, Handle, TargetValidator};
