// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding whether a pointer-down may start a gesture.
//!
//! A [`TargetValidator`] holds two independently mutable sets:
//!
//! - **Handles** (allow-list): node handles or selector strings. When the set
//!   is empty the whole draggable node is a handle.
//! - **Invalids** (deny-list): selector strings. A target matching, or sitting
//!   inside, any of them is rejected even under a valid handle. The default
//!   deny-list holds the usual form controls and links.
//!
//! Validation only runs at pointer-down, so edits to either set take effect on
//! the next press and never disturb a gesture in progress.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::host::DragHost;

/// Selectors rejected by default: text entry, links and buttons keep their
/// native behavior.
pub const DEFAULT_INVALIDS: [&str; 5] = ["textarea", "input", "a", "button", "select"];

/// A region of a draggable allowed to start a gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handle<N> {
    /// A specific node; presses inside it are eligible.
    Node(N),
    /// A selector; presses on a matching node, or inside one, are eligible.
    Selector(String),
}

impl<N> Handle<N> {
    /// Convenience constructor for a selector handle.
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }
}

/// Allow-list and deny-list for gesture start targets.
#[derive(Clone, Debug)]
pub struct TargetValidator<N> {
    handles: Vec<Handle<N>>,
    invalids: Vec<String>,
}

impl<N> Default for TargetValidator<N> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
            invalids: DEFAULT_INVALIDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl<N: Clone + PartialEq> TargetValidator<N> {
    /// A validator with no handles and the default deny-list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current handles, in insertion order.
    #[must_use]
    pub fn handles(&self) -> &[Handle<N>] {
        &self.handles
    }

    /// Replaces every handle.
    pub fn set_handles(&mut self, handles: impl IntoIterator<Item = Handle<N>>) {
        self.handles.clear();
        for h in handles {
            self.add_handle(h);
        }
    }

    /// Adds a handle. Returns `false` if it was already present.
    pub fn add_handle(&mut self, handle: Handle<N>) -> bool {
        if self.handles.contains(&handle) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Removes a handle. Returns `false` if it was not present.
    pub fn remove_handle(&mut self, handle: &Handle<N>) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| h != handle);
        before != self.handles.len()
    }

    /// Current deny-list selectors, in insertion order.
    #[must_use]
    pub fn invalids(&self) -> &[String] {
        &self.invalids
    }

    /// Replaces the whole deny-list.
    pub fn set_invalids<S: Into<String>>(&mut self, selectors: impl IntoIterator<Item = S>) {
        self.invalids.clear();
        for s in selectors {
            self.add_invalid(s);
        }
    }

    /// Adds a deny-list selector. Returns `false` if it was already present.
    pub fn add_invalid(&mut self, selector: impl Into<String>) -> bool {
        let selector = selector.into();
        if self.invalids.contains(&selector) {
            return false;
        }
        self.invalids.push(selector);
        true
    }

    /// Removes a deny-list selector. Returns `false` if it was not present.
    pub fn remove_invalid(&mut self, selector: &str) -> bool {
        let before = self.invalids.len();
        self.invalids.retain(|s| s != selector);
        before != self.invalids.len()
    }

    /// Validates a press on `target` for the draggable `element`.
    ///
    /// Returns the active handle on success: the matching node handle, the
    /// concrete node matching a selector handle, or `element` itself when no
    /// handles are configured.
    pub fn validate<H>(&self, host: &H, element: &N, target: &N) -> Option<N>
    where
        H: DragHost<Node = N>,
    {
        let mut matched_selector: Option<&str> = None;
        let mut active = None;

        if self.handles.is_empty() {
            if host.contains(element, target) {
                active = Some(element.clone());
            }
        } else {
            for handle in &self.handles {
                match handle {
                    Handle::Node(node) if host.contains(node, target) => {
                        active = Some(node.clone());
                    }
                    Handle::Selector(sel) if host.matches_or_within(target, sel) => {
                        matched_selector = Some(sel.as_str());
                        active = Some(element.clone());
                    }
                    _ => continue,
                }
                break;
            }
        }

        let active = active?;
        if let Some(invalid) = self
            .invalids
            .iter()
            .find(|sel| host.matches_or_within(target, sel))
        {
            log::trace!("press rejected by invalid selector `{invalid}`");
            return None;
        }

        // Several nodes may share one selector handle; the active handle is the
        // one actually under the pointer.
        if let Some(sel) = matched_selector {
            if let Some(concrete) = host
                .query_all(element, sel)
                .into_iter()
                .find(|n| host.contains(n, target))
            {
                return Some(concrete);
            }
        }
        Some(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{Point, Rect};

    use crate::host::{ListenKind, Subscription};

    /// Tiny tree: each node has a parent and a tag.
    struct Tree {
        nodes: Vec<(Option<usize>, &'static str)>,
    }

    impl DragHost for Tree {
        type Node = usize;

        fn is_valid(&self, node: &usize) -> bool {
            *node < self.nodes.len()
        }
        fn bounding_box(&self, _: &usize) -> Rect {
            Rect::ZERO
        }
        fn contains(&self, ancestor: &usize, node: &usize) -> bool {
            let mut cur = Some(*node);
            while let Some(n) = cur {
                if n == *ancestor {
                    return true;
                }
                cur = self.nodes[n].0;
            }
            false
        }
        fn matches_selector(&self, node: &usize, selector: &str) -> bool {
            self.nodes[*node].1 == selector
        }
        fn parent(&self, node: &usize) -> Option<usize> {
            self.nodes[*node].0
        }
        fn query_all(&self, root: &usize, selector: &str) -> Vec<usize> {
            (0..self.nodes.len())
                .filter(|n| self.contains(root, n) && self.matches_selector(n, selector))
                .collect()
        }
        fn set_position(&mut self, _: &usize, _: Point) {}
        fn add_class(&mut self, _: &usize, _: &str) {}
        fn remove_class(&mut self, _: &usize, _: &str) {}
        fn listen(&mut self, _: &usize, _: ListenKind) -> Subscription {
            Subscription(0)
        }
        fn unlisten(&mut self, _: Subscription) {}
    }

    // 0 div (draggable)
    // ├── 1 .grip
    // │   └── 2 span
    // ├── 3 .grip
    // ├── 4 input
    // └── 5 p
    //     └── 6 a
    //         └── 7 em
    // 8 div (outside)
    fn tree() -> Tree {
        Tree {
            nodes: vec![
                (None, "div"),
                (Some(0), ".grip"),
                (Some(1), "span"),
                (Some(0), ".grip"),
                (Some(0), "input"),
                (Some(0), "p"),
                (Some(5), "a"),
                (Some(6), "em"),
                (None, "div"),
            ],
        }
    }

    #[test]
    fn whole_element_without_handles() {
        let host = tree();
        let v = TargetValidator::new();
        assert_eq!(v.validate(&host, &0, &5), Some(0));
        assert_eq!(v.validate(&host, &0, &0), Some(0));
        assert_eq!(v.validate(&host, &0, &8), None);
    }

    #[test]
    fn default_invalids_reject_form_controls_and_link_descendants() {
        let host = tree();
        let v = TargetValidator::new();
        assert_eq!(v.validate(&host, &0, &4), None);
        assert_eq!(v.validate(&host, &0, &7), None, "inside an `a`");
    }

    #[test]
    fn node_handle_is_recorded() {
        let host = tree();
        let mut v = TargetValidator::new();
        v.add_handle(Handle::Node(1));
        assert_eq!(v.validate(&host, &0, &2), Some(1));
        assert_eq!(v.validate(&host, &0, &5), None);
    }

    #[test]
    fn selector_handle_resolves_concrete_node() {
        let host = tree();
        let mut v = TargetValidator::new();
        v.add_handle(Handle::selector(".grip"));
        assert_eq!(v.validate(&host, &0, &2), Some(1));
        assert_eq!(v.validate(&host, &0, &3), Some(3));
        assert_eq!(v.validate(&host, &0, &5), None);
    }

    #[test]
    fn invalid_overrides_handle() {
        let host = tree();
        let mut v = TargetValidator::new();
        v.add_handle(Handle::selector(".grip"));
        v.add_invalid("span");
        assert_eq!(v.validate(&host, &0, &2), None);
        assert_eq!(v.validate(&host, &0, &1), Some(1));
    }

    #[test]
    fn first_matching_handle_wins() {
        let host = tree();
        let mut v = TargetValidator::new();
        v.add_handle(Handle::Node(0));
        v.add_handle(Handle::Node(1));
        assert_eq!(v.validate(&host, &0, &2), Some(0));
    }

    #[test]
    fn set_mutations_report_presence() {
        let mut v: TargetValidator<usize> = TargetValidator::new();
        assert!(v.add_handle(Handle::Node(1)));
        assert!(!v.add_handle(Handle::Node(1)));
        assert!(v.remove_handle(&Handle::Node(1)));
        assert!(!v.remove_handle(&Handle::Node(1)));
        assert!(v.handles().is_empty());

        assert!(!v.add_invalid("input"));
        assert!(v.remove_invalid("input"));
        assert!(!v.remove_invalid("input"));
        v.set_invalids(["x", "y", "x"]);
        assert_eq!(v.invalids(), ["x", "y"]);
    }

    #[test]
    fn removing_invalid_allows_target() {
        let host = tree();
        let mut v = TargetValidator::new();
        v.remove_invalid("input");
        assert_eq!(v.validate(&host, &0, &4), Some(0));
    }
}
