// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag configuration: process-wide defaults, per-instance options and the
//! attribute schema they resolve into.
//!
//! The schema for every draggable is resolved once per manager from two
//! fragments, in order:
//!
//! 1. `gesture`: disambiguation parameters whose defaults come from
//!    [`DragDefaults`].
//! 2. `drag`: per-instance behavior switches.
//!
//! [`DragOptions`] values are written into each instance's
//! [`AttributeStore`](understory_attribute::AttributeStore) at registration,
//! through the declared validators.

use alloc::string::String;
use alloc::vec::Vec;
use understory_attribute::{Attr, AttributeError, Schema, SchemaFragment};

use crate::validate::Handle;

/// Per-axis pixel travel that turns a press into a drag.
pub const CLICK_PIXEL_THRESH: Attr<f64> = Attr::new("clickPixelThresh");
/// Hold time, in milliseconds, that turns a press into a drag.
pub const CLICK_TIME_THRESH: Attr<u64> = Attr::new("clickTimeThresh");
/// Ignore presses from non-primary buttons.
pub const PRIMARY_BUTTON_ONLY: Attr<bool> = Attr::new("primaryButtonOnly");
/// Suppress new promotions and moves.
pub const LOCK: Attr<bool> = Attr::new("lock");
/// Reposition the surrogate on `drag` events.
pub const MOVE: Attr<bool> = Attr::new("move");
/// Keep the grab offset between pointer and surrogate origin.
pub const OFFSET_NODE: Attr<bool> = Attr::new("offsetNode");
/// Re-center the surrogate under the pointer when the drag starts.
pub const START_CENTERED: Attr<bool> = Attr::new("startCentered");

/// Process-wide defaults shared by every draggable of a manager.
#[derive(Clone, Debug, PartialEq)]
pub struct DragDefaults {
    /// Default for [`CLICK_PIXEL_THRESH`].
    pub click_pixel_thresh: f64,
    /// Default for [`CLICK_TIME_THRESH`].
    pub click_time_thresh: u64,
    /// Prefix for the style classes applied to draggable nodes.
    pub css_prefix: String,
}

impl Default for DragDefaults {
    fn default() -> Self {
        Self {
            click_pixel_thresh: 3.0,
            click_time_thresh: 1_000,
            css_prefix: String::from("dd"),
        }
    }
}

impl DragDefaults {
    pub(crate) fn class(&self, suffix: &str) -> String {
        let mut class = String::with_capacity(self.css_prefix.len() + suffix.len() + 1);
        class.push_str(&self.css_prefix);
        class.push('-');
        class.push_str(suffix);
        class
    }
}

fn valid_pixels(p: &f64) -> bool {
    p.is_finite() && *p >= 0.0
}

/// The `gesture` fragment, seeded from `defaults`.
#[must_use]
pub fn gesture_fragment(defaults: &DragDefaults) -> SchemaFragment {
    SchemaFragment::new("gesture")
        .validated(CLICK_PIXEL_THRESH, defaults.click_pixel_thresh, valid_pixels)
        .attr(CLICK_TIME_THRESH, defaults.click_time_thresh)
        .attr(PRIMARY_BUTTON_ONLY, true)
}

/// The `drag` fragment.
#[must_use]
pub fn drag_fragment() -> SchemaFragment {
    SchemaFragment::new("drag")
        .attr(LOCK, false)
        .attr(MOVE, true)
        .attr(OFFSET_NODE, true)
        .attr(START_CENTERED, false)
}

/// Resolves the draggable schema for `defaults`, followed by `extra`
/// fragments (later fragments override earlier ones).
///
/// # Errors
///
/// Fails if an extra fragment redeclares an attribute with another type.
pub fn drag_schema(
    defaults: &DragDefaults,
    extra: impl IntoIterator<Item = SchemaFragment>,
) -> Result<Schema, AttributeError> {
    Schema::resolve(
        [gesture_fragment(defaults), drag_fragment()]
            .into_iter()
            .chain(extra),
    )
}

/// Construction options for one draggable.
///
/// `None` fields fall back to the schema defaults.
#[derive(Clone, Debug)]
pub struct DragOptions<N> {
    /// The node made draggable.
    pub node: N,
    /// The node actually moved; defaults to `node`.
    pub drag_node: Option<N>,
    /// Start handles; empty means the whole node.
    pub handles: Vec<Handle<N>>,
    /// Replacement deny-list; `None` keeps the defaults.
    pub invalids: Option<Vec<String>>,
    /// Group membership; `None` means the default group.
    pub groups: Option<Vec<String>>,
    /// Keep the grab offset while dragging.
    pub offset_node: Option<bool>,
    /// Center the surrogate under the pointer on start.
    pub start_centered: Option<bool>,
    /// Per-axis pixel threshold.
    pub click_pixel_thresh: Option<f64>,
    /// Hold threshold in milliseconds.
    pub click_time_thresh: Option<u64>,
    /// Start locked.
    pub lock: Option<bool>,
    /// Reposition the surrogate on `drag`.
    pub move_node: Option<bool>,
    /// Ignore non-primary buttons.
    pub primary_button_only: Option<bool>,
    /// Ask the drop coordinator for a drop-target counterpart.
    pub target: bool,
}

impl<N> DragOptions<N> {
    /// Options for `node` with every other field defaulted.
    pub fn new(node: N) -> Self {
        Self {
            node,
            drag_node: None,
            handles: Vec::new(),
            invalids: None,
            groups: None,
            offset_node: None,
            start_centered: None,
            click_pixel_thresh: None,
            click_time_thresh: None,
            lock: None,
            move_node: None,
            primary_button_only: None,
            target: false,
        }
    }

    /// Moves `drag_node` instead of the node itself.
    #[must_use]
    pub fn drag_node(mut self, drag_node: N) -> Self {
        self.drag_node = Some(drag_node);
        self
    }

    /// Adds a start handle.
    #[must_use]
    pub fn handle(mut self, handle: Handle<N>) -> Self {
        self.handles.push(handle);
        self
    }

    /// Replaces the deny-list.
    #[must_use]
    pub fn invalids<S: Into<String>>(mut self, selectors: impl IntoIterator<Item = S>) -> Self {
        self.invalids = Some(selectors.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the group membership.
    #[must_use]
    pub fn groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Sets both thresholds.
    #[must_use]
    pub fn thresholds(mut self, pixels: f64, time_ms: u64) -> Self {
        self.click_pixel_thresh = Some(pixels);
        self.click_time_thresh = Some(time_ms);
        self
    }

    /// Sets whether the grab offset is kept.
    #[must_use]
    pub fn offset_node(mut self, offset: bool) -> Self {
        self.offset_node = Some(offset);
        self
    }

    /// Sets whether the surrogate re-centers on start.
    #[must_use]
    pub fn start_centered(mut self, centered: bool) -> Self {
        self.start_centered = Some(centered);
        self
    }

    /// Sets the initial lock state.
    #[must_use]
    pub fn lock(mut self, lock: bool) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Sets whether `drag` repositions the surrogate.
    #[must_use]
    pub fn move_node(mut self, move_node: bool) -> Self {
        self.move_node = Some(move_node);
        self
    }

    /// Sets whether non-primary buttons are ignored.
    #[must_use]
    pub fn primary_button_only(mut self, primary_only: bool) -> Self {
        self.primary_button_only = Some(primary_only);
        self
    }

    /// Requests a drop-target counterpart.
    #[must_use]
    pub fn target(mut self, target: bool) -> Self {
        self.target = target;
        self
    }
}
