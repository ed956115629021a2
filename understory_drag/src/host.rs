// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow platform contract the drag engine consumes.
//!
//! The engine never touches a document, a renderer or a clock directly. A host
//! (a DOM binding, a retained scene tree, a test double) implements
//! [`DragHost`] and forwards pointer input to the
//! [`DragManager`](crate::DragManager).

use alloc::vec::Vec;
use core::fmt;
use kurbo::{Point, Rect};

use crate::event::TargetId;
use crate::groups::Groups;
use crate::instance::DragId;

/// Which pointer button produced an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Usually the left mouse button, a pen tip, or a touch contact.
    #[default]
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Usually the middle mouse button.
    Auxiliary,
    /// Any other button, by platform index.
    Other(u8),
}

/// A pointer-down as delivered by the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<N> {
    /// Pointer position in page coordinates.
    pub point: Point,
    /// The deepest node under the pointer.
    pub target: N,
    /// The button that went down.
    pub button: PointerButton,
}

impl<N> PointerEvent<N> {
    /// A primary-button event at `point` on `target`.
    pub fn primary(point: impl Into<Point>, target: N) -> Self {
        Self {
            point: point.into(),
            target,
            button: PointerButton::Primary,
        }
    }
}

/// Input streams a draggable subscribes to on its node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenKind {
    /// Pointer pressed on the node.
    PointerDown,
    /// Pointer released after a press on the node.
    PointerUp,
    /// The platform's native drag-start, which the host should suppress.
    NativeDragStart,
}

/// A host-issued subscription handle, returned by [`DragHost::listen`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.0).finish()
    }
}

/// Element, style and subscription primitives provided by the platform.
///
/// Containment is inclusive: a node contains itself.
pub trait DragHost {
    /// Node handle type. Cheap to clone, compared by identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Returns `true` if `node` refers to a live element that can be dragged.
    fn is_valid(&self, node: &Self::Node) -> bool;

    /// Page-space bounding box of `node`.
    fn bounding_box(&self, node: &Self::Node) -> Rect;

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Returns `true` if `node` itself matches `selector`.
    fn matches_selector(&self, node: &Self::Node, selector: &str) -> bool;

    /// Parent of `node`, if any.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Descendants of `root` (inclusive) matching `selector`, in document order.
    fn query_all(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// Moves `node` so its top-left corner is at `point` in page space.
    fn set_position(&mut self, node: &Self::Node, point: Point);

    /// Adds a style class to `node`.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Removes a style class from `node`.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Starts delivering `kind` events for `node` to the manager.
    fn listen(&mut self, node: &Self::Node, kind: ListenKind) -> Subscription;

    /// Stops a subscription. Unknown handles are ignored.
    fn unlisten(&mut self, subscription: Subscription);

    /// Returns `true` if `node` or one of its ancestors matches `selector`.
    ///
    /// This is the `selector, selector *` test used by handle and deny-list
    /// matching.
    fn matches_or_within(&self, node: &Self::Node, selector: &str) -> bool {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if self.matches_selector(&n, selector) {
                return true;
            }
            current = self.parent(&n);
        }
        false
    }
}

/// The external drop-target matcher, as seen by the drag engine.
///
/// Hit-testing against drop targets happens outside this crate. The manager
/// only tells the coordinator which draggables exist, which groups they belong
/// to and where the active surrogate is; the coordinator reports results back
/// through [`DragManager::notify_drop`](crate::DragManager::notify_drop).
pub trait DropCoordinator<N> {
    /// Creates the drop-target counterpart of a draggable registered with
    /// `target` set.
    fn create_target(&mut self, drag: DragId, node: &N, groups: &Groups) -> TargetId;

    /// Destroys a counterpart created by [`create_target`](Self::create_target).
    fn destroy_target(&mut self, target: TargetId);

    /// Group membership of `drag` changed; eligible targets must be recomputed.
    fn groups_changed(&mut self, drag: DragId, groups: &Groups);

    /// `drag` became the active drag with its surrogate at `region`.
    fn drag_started(&mut self, drag: DragId, region: Rect) {
        let _ = (drag, region);
    }

    /// The active surrogate moved to `region`.
    fn drag_moved(&mut self, drag: DragId, region: Rect) {
        let _ = (drag, region);
    }

    /// The active drag finished.
    fn drag_ended(&mut self, drag: DragId) {
        let _ = drag;
    }
}
