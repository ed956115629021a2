// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;
use understory_attribute::AttributeError;

use crate::instance::DragId;

/// Errors returned by [`DragManager`](crate::DragManager) operations.
///
/// Registration errors are configuration mistakes and are never retried.
/// Gesture-level outcomes (an ineligible press, a prevented end) are not
/// errors and never show up here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DragError {
    /// The host does not recognise the node to make draggable.
    #[error("invalid node given")]
    InvalidNode,
    /// The host does not recognise the surrogate node.
    #[error("invalid drag node given")]
    InvalidDragNode,
    /// The node already has a draggable registered on it.
    #[error("node already in use by {0:?}")]
    NodeInUse(DragId),
    /// No live instance has this id.
    #[error("unknown draggable {0:?}")]
    UnknownInstance(DragId),
    /// An option failed attribute validation.
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Returned when the active-drag slot is held by another instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("active drag slot is held by {holder:?}")]
pub struct SlotOccupied {
    /// The current holder.
    pub holder: DragId,
}
