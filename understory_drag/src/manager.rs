// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag registry: instance ownership, the single active-drag slot,
//! listeners and configuration mutation.
//!
//! Gesture transitions driven by pointer input and timers live in the
//! `lifecycle` module; this module holds everything else the manager exposes.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use understory_attribute::{
    Attr, AttrChange, AttributeError, AttributeStore, Schema, SchemaFragment,
};
use understory_timing::TimerQueue;

use crate::config::{DragDefaults, DragOptions, LOCK, drag_schema};
use crate::config::{
    CLICK_PIXEL_THRESH, CLICK_TIME_THRESH, MOVE, OFFSET_NODE, PRIMARY_BUTTON_ONLY,
    START_CENTERED,
};
use crate::error::{DragError, SlotOccupied};
use crate::event::{
    DragCommand, DragEvent, DragEventKind, DragPayload, ListenerId, Listeners, TargetId,
};
use crate::host::{DragHost, DropCoordinator, ListenKind};
use crate::instance::{DragId, DragInstance};
use crate::validate::Handle;

/// Style classes derived from [`DragDefaults::css_prefix`].
#[derive(Clone, Debug)]
pub(crate) struct Classes {
    pub(crate) draggable: String,
    pub(crate) dragging: String,
    pub(crate) locked: String,
}

/// Owns every draggable and routes pointer input to the one gesture in
/// progress.
///
/// At most one instance is armed or dragging at any time. The slot holding the
/// dragging instance is only written by promotion and release, and promotion
/// fails while another instance holds it.
///
/// The manager never reads a clock; every input method takes the host's
/// current time in milliseconds.
pub struct DragManager<H: DragHost> {
    pub(crate) host: H,
    defaults: DragDefaults,
    pub(crate) schema: Schema,
    pub(crate) classes: Classes,
    pub(crate) timers: TimerQueue<DragId>,
    pub(crate) instances: HashMap<DragId, DragInstance<H::Node>>,
    next_id: u32,
    next_listener: u64,
    candidate: Option<DragId>,
    active: Option<DragId>,
    listeners: Listeners<H::Node>,
    pub(crate) coordinator: Option<Box<dyn DropCoordinator<H::Node>>>,
    pending: Vec<(DragId, DragCommand)>,
    pub(crate) now: u64,
}

impl<H: DragHost> DragManager<H> {
    /// Creates a manager with [`DragDefaults::default`].
    ///
    /// # Errors
    ///
    /// See [`with_fragments`](Self::with_fragments).
    pub fn new(host: H) -> Result<Self, DragError> {
        Self::with_defaults(host, DragDefaults::default())
    }

    /// Creates a manager with custom process-wide defaults.
    ///
    /// # Errors
    ///
    /// See [`with_fragments`](Self::with_fragments).
    pub fn with_defaults(host: H, defaults: DragDefaults) -> Result<Self, DragError> {
        Self::with_fragments(host, defaults, core::iter::empty())
    }

    /// Creates a manager whose draggable schema is extended by `extra`
    /// fragments, applied after the built-in ones.
    ///
    /// # Errors
    ///
    /// [`DragError::Attribute`] if a fragment redeclares an attribute with a
    /// different type.
    pub fn with_fragments(
        host: H,
        defaults: DragDefaults,
        extra: impl IntoIterator<Item = SchemaFragment>,
    ) -> Result<Self, DragError> {
        let schema = drag_schema(&defaults, extra)?;
        let classes = Classes {
            draggable: defaults.class("draggable"),
            dragging: defaults.class("dragging"),
            locked: defaults.class("locked"),
        };
        Ok(Self {
            host,
            defaults,
            schema,
            classes,
            timers: TimerQueue::new(),
            instances: HashMap::new(),
            next_id: 1,
            next_listener: 1,
            candidate: None,
            active: None,
            listeners: Listeners::default(),
            coordinator: None,
            pending: Vec::new(),
            now: 0,
        })
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Process-wide defaults.
    #[must_use]
    pub fn defaults(&self) -> &DragDefaults {
        &self.defaults
    }

    /// The resolved draggable schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Installs the drop-target matcher.
    ///
    /// Instances registered earlier with `target` set keep no counterpart.
    pub fn set_drop_coordinator(&mut self, coordinator: impl DropCoordinator<H::Node> + 'static) {
        self.coordinator = Some(Box::new(coordinator));
    }

    /// Makes a node draggable.
    ///
    /// Subscribes to pointer-down, pointer-up and native drag-start on the
    /// node and applies the `draggable` class.
    ///
    /// # Errors
    ///
    /// - [`DragError::InvalidNode`] / [`DragError::InvalidDragNode`] if the
    ///   host rejects either node.
    /// - [`DragError::NodeInUse`] if the node is already draggable.
    /// - [`DragError::Attribute`] if an option fails validation.
    pub fn register(&mut self, options: DragOptions<H::Node>) -> Result<DragId, DragError> {
        let DragOptions {
            node,
            drag_node,
            handles,
            invalids,
            groups,
            offset_node,
            start_centered,
            click_pixel_thresh,
            click_time_thresh,
            lock,
            move_node,
            primary_button_only,
            target,
        } = options;

        if !self.host.is_valid(&node) {
            log::warn!("invalid node given: {node:?}");
            return Err(DragError::InvalidNode);
        }
        let surrogate = drag_node.unwrap_or_else(|| node.clone());
        if !self.host.is_valid(&surrogate) {
            log::warn!("invalid drag node given: {surrogate:?}");
            return Err(DragError::InvalidDragNode);
        }
        if let Some(existing) = self.instance_for(&node) {
            log::warn!("node {node:?} already in use by {existing:?}");
            return Err(DragError::NodeInUse(existing));
        }

        let id = DragId::new(self.next_id);
        let mut inst = DragInstance::new(id, node, surrogate);
        let attrs = &mut inst.attrs;
        init_option(attrs, &self.schema, OFFSET_NODE, offset_node)?;
        init_option(attrs, &self.schema, START_CENTERED, start_centered)?;
        init_option(attrs, &self.schema, CLICK_PIXEL_THRESH, click_pixel_thresh)?;
        init_option(attrs, &self.schema, CLICK_TIME_THRESH, click_time_thresh)?;
        init_option(attrs, &self.schema, LOCK, lock)?;
        init_option(attrs, &self.schema, MOVE, move_node)?;
        init_option(attrs, &self.schema, PRIMARY_BUTTON_ONLY, primary_button_only)?;
        inst.validator.set_handles(handles);
        if let Some(invalids) = invalids {
            inst.validator.set_invalids(invalids);
        }
        if let Some(groups) = groups {
            inst.groups.replace(groups);
        }
        self.next_id = self.next_id.wrapping_add(1);

        for kind in [
            ListenKind::PointerDown,
            ListenKind::PointerUp,
            ListenKind::NativeDragStart,
        ] {
            let sub = self.host.listen(&inst.element, kind);
            inst.subscriptions.push(sub);
        }
        self.host.add_class(&inst.element, &self.classes.draggable);
        if inst.attr_or(&self.schema, LOCK, false) {
            self.host.add_class(&inst.element, &self.classes.locked);
        }
        if target {
            match self.coordinator.as_mut() {
                Some(c) => inst.target = Some(c.create_target(id, &inst.element, &inst.groups)),
                None => log::warn!("{id:?} asked for a drop target without a coordinator"),
            }
        }

        log::debug!("registered {id:?} on {:?}", inst.element);
        self.instances.insert(id, inst);
        Ok(id)
    }

    /// Destroys an instance: ends its gesture silently, detaches every
    /// subscription, removes its classes and its drop-target counterpart.
    ///
    /// Returns `false` if the instance was already gone. Safe to call twice.
    pub fn destroy(&mut self, id: DragId) -> bool {
        let destroyed = self.destroy_now(id);
        self.flush();
        destroyed
    }

    pub(crate) fn destroy_now(&mut self, id: DragId) -> bool {
        let Some(mut inst) = self.instances.remove(&id) else {
            log::trace!("{id:?} already destroyed");
            return false;
        };
        if let Some(timer) = inst.click_timer.take() {
            self.timers.cancel(timer);
        }
        let was_active = self.active == Some(id);
        self.release(id);

        for class in [
            &self.classes.draggable,
            &self.classes.dragging,
            &self.classes.locked,
        ] {
            self.host.remove_class(&inst.element, class);
        }
        for sub in inst.subscriptions.drain(..) {
            self.host.unlisten(sub);
        }
        if let Some(c) = self.coordinator.as_mut() {
            if was_active {
                c.drag_ended(id);
            }
            if let Some(target) = inst.target.take() {
                c.destroy_target(target);
            }
        }
        log::debug!("destroyed {id:?}");
        true
    }

    /// Looks up an instance.
    #[must_use]
    pub fn instance(&self, id: DragId) -> Option<&DragInstance<H::Node>> {
        self.instances.get(&id)
    }

    /// Every live instance, in no particular order.
    pub fn instances(&self) -> impl Iterator<Item = &DragInstance<H::Node>> {
        self.instances.values()
    }

    /// The instance registered on `node`, if any.
    #[must_use]
    pub fn instance_for(&self, node: &H::Node) -> Option<DragId> {
        self.instances
            .values()
            .find(|inst| inst.element == *node)
            .map(|inst| inst.id)
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if no instance is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn instance_mut(&mut self, id: DragId) -> Result<&mut DragInstance<H::Node>, DragError> {
        self.instances
            .get_mut(&id)
            .ok_or(DragError::UnknownInstance(id))
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    /// Adds a listener for `kind` events from every instance.
    ///
    /// Manager listeners run after the emitting instance's own listeners.
    pub fn on(
        &mut self,
        kind: DragEventKind,
        listener: impl FnMut(&mut DragEvent<H::Node>) + 'static,
    ) -> ListenerId {
        let lid = self.next_listener_id();
        self.listeners.add(lid, kind, Box::new(listener));
        lid
    }

    /// Adds a listener for `kind` events from one instance.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn on_drag(
        &mut self,
        id: DragId,
        kind: DragEventKind,
        listener: impl FnMut(&mut DragEvent<H::Node>) + 'static,
    ) -> Result<ListenerId, DragError> {
        if !self.instances.contains_key(&id) {
            return Err(DragError::UnknownInstance(id));
        }
        let lid = self.next_listener_id();
        self.instance_mut(id)?
            .listeners
            .add(lid, kind, Box::new(listener));
        Ok(lid)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        self.listeners.remove(listener)
            || self
                .instances
                .values_mut()
                .any(|inst| inst.listeners.remove(listener))
    }

    /// Emits an event: instance listeners, then manager listeners.
    ///
    /// Commands requested by listeners are queued for [`flush`](Self::flush).
    pub(crate) fn fire(
        &mut self,
        id: DragId,
        kind: DragEventKind,
        payload: DragPayload<H::Node>,
    ) -> DragEvent<H::Node> {
        let mut event = DragEvent::new(id, kind, payload);
        if let Some(inst) = self.instances.get_mut(&id) {
            inst.listeners.dispatch(&mut event);
        }
        self.listeners.dispatch(&mut event);
        self.pending
            .extend(event.take_commands().into_iter().map(|cmd| (id, cmd)));
        event
    }

    /// Applies commands queued by listeners, including any queued while
    /// applying them.
    pub(crate) fn flush(&mut self) {
        while !self.pending.is_empty() {
            let batch = core::mem::take(&mut self.pending);
            for (id, command) in batch {
                log::trace!("{id:?} applying {command:?}");
                match command {
                    DragCommand::StopDrag => {
                        self.stop_now(id);
                    }
                    DragCommand::Destroy => {
                        self.destroy_now(id);
                    }
                    DragCommand::SetLock(lock) => {
                        if let Err(err) = self.set_attr(id, LOCK, lock) {
                            log::warn!("{id:?} lock request dropped: {err}");
                        }
                    }
                }
            }
        }
    }

    /// The instance currently dragging, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<DragId> {
        self.active
    }

    /// The instance armed and waiting for a threshold, if any.
    #[must_use]
    pub fn candidate(&self) -> Option<DragId> {
        self.candidate
    }

    /// The instance that receives broadcast moves and releases.
    pub(crate) fn gesture_owner(&self) -> Option<DragId> {
        self.active.or(self.candidate)
    }

    /// Claims the candidate slot for an arming gesture.
    pub(crate) fn register_candidate(&mut self, id: DragId) -> Result<(), SlotOccupied> {
        if let Some(holder) = [self.candidate, self.active]
            .into_iter()
            .flatten()
            .find(|holder| *holder != id)
        {
            return Err(SlotOccupied { holder });
        }
        self.candidate = Some(id);
        Ok(())
    }

    /// Compare-and-swap on the active slot.
    pub(crate) fn promote(&mut self, id: DragId) -> Result<(), SlotOccupied> {
        match self.active {
            Some(holder) if holder != id => Err(SlotOccupied { holder }),
            _ => {
                self.active = Some(id);
                if self.candidate == Some(id) {
                    self.candidate = None;
                }
                Ok(())
            }
        }
    }

    /// Clears whichever slots `id` holds.
    pub(crate) fn release(&mut self, id: DragId) {
        if self.candidate == Some(id) {
            self.candidate = None;
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Returns `true` if the instance is locked.
    #[must_use]
    pub fn is_locked(&self, id: DragId) -> bool {
        self.instances
            .get(&id)
            .is_some_and(|inst| inst.attr_or(&self.schema, LOCK, false))
    }

    /// Locks or unlocks an instance and updates its `locked` class.
    ///
    /// A lock blocks new promotions and moves; a drag in progress still ends
    /// normally on release.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn set_lock(&mut self, id: DragId, lock: bool) -> Result<bool, DragError> {
        Ok(self.set_attr(id, LOCK, lock)?.is_some())
    }

    /// Reads an attribute of an instance.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`] or [`DragError::Attribute`].
    pub fn attr<T: Clone + 'static>(&self, id: DragId, attr: Attr<T>) -> Result<T, DragError> {
        let inst = self
            .instances
            .get(&id)
            .ok_or(DragError::UnknownInstance(id))?;
        Ok(inst.attrs.get(&self.schema, attr)?)
    }

    /// Writes an attribute of an instance through its validator.
    ///
    /// Returns the change, or `None` if the effective value was already
    /// `value`. Threshold changes apply from the next press.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`] or [`DragError::Attribute`].
    pub fn set_attr<T: Clone + PartialEq + 'static>(
        &mut self,
        id: DragId,
        attr: Attr<T>,
        value: T,
    ) -> Result<Option<AttrChange<T>>, DragError> {
        let inst = self
            .instances
            .get_mut(&id)
            .ok_or(DragError::UnknownInstance(id))?;
        let change = inst.attrs.set(&self.schema, attr, value)?;
        if change.is_some() && attr.name() == LOCK.name() {
            let locked = inst.attr_or(&self.schema, LOCK, false);
            log::debug!("{id:?} lock = {locked}");
            if locked {
                self.host.add_class(&inst.element, &self.classes.locked);
            } else {
                self.host.remove_class(&inst.element, &self.classes.locked);
            }
        }
        Ok(change)
    }

    /// Adds a start handle and emits `AddHandle`.
    ///
    /// Returns `false` if the handle was already present.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn add_handle(&mut self, id: DragId, handle: Handle<H::Node>) -> Result<bool, DragError> {
        let added = self.instance_mut(id)?.validator.add_handle(handle.clone());
        if added {
            self.fire(id, DragEventKind::AddHandle, DragPayload::Handle(handle));
            self.flush();
        }
        Ok(added)
    }

    /// Removes a start handle and emits `RemoveHandle`.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn remove_handle(
        &mut self,
        id: DragId,
        handle: &Handle<H::Node>,
    ) -> Result<bool, DragError> {
        let removed = self.instance_mut(id)?.validator.remove_handle(handle);
        if removed {
            self.fire(
                id,
                DragEventKind::RemoveHandle,
                DragPayload::Handle(handle.clone()),
            );
            self.flush();
        }
        Ok(removed)
    }

    /// Adds a deny-list selector and emits `AddInvalid`.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn add_invalid(
        &mut self,
        id: DragId,
        selector: impl Into<String>,
    ) -> Result<bool, DragError> {
        let selector = selector.into();
        let added = self
            .instance_mut(id)?
            .validator
            .add_invalid(selector.clone());
        if added {
            self.fire(id, DragEventKind::AddInvalid, DragPayload::Invalid(selector));
            self.flush();
        }
        Ok(added)
    }

    /// Removes a deny-list selector and emits `RemoveInvalid`.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn remove_invalid(&mut self, id: DragId, selector: &str) -> Result<bool, DragError> {
        let removed = self.instance_mut(id)?.validator.remove_invalid(selector);
        if removed {
            self.fire(
                id,
                DragEventKind::RemoveInvalid,
                DragPayload::Invalid(String::from(selector)),
            );
            self.flush();
        }
        Ok(removed)
    }

    /// Adds the instance to a group and notifies the drop coordinator.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn add_to_group(&mut self, id: DragId, name: impl Into<String>) -> Result<bool, DragError> {
        let inst = self
            .instances
            .get_mut(&id)
            .ok_or(DragError::UnknownInstance(id))?;
        let added = inst.groups.add(name);
        if added {
            if let Some(c) = self.coordinator.as_mut() {
                c.groups_changed(id, &inst.groups);
            }
        }
        Ok(added)
    }

    /// Removes the instance from a group and notifies the drop coordinator.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn remove_from_group(&mut self, id: DragId, name: &str) -> Result<bool, DragError> {
        let inst = self
            .instances
            .get_mut(&id)
            .ok_or(DragError::UnknownInstance(id))?;
        let removed = inst.groups.remove(name);
        if removed {
            if let Some(c) = self.coordinator.as_mut() {
                c.groups_changed(id, &inst.groups);
            }
        }
        Ok(removed)
    }

    /// Replaces the instance's groups and notifies the drop coordinator.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn set_groups<S: Into<String>>(
        &mut self,
        id: DragId,
        names: impl IntoIterator<Item = S>,
    ) -> Result<(), DragError> {
        let inst = self
            .instances
            .get_mut(&id)
            .ok_or(DragError::UnknownInstance(id))?;
        inst.groups.replace(names);
        if let Some(c) = self.coordinator.as_mut() {
            c.groups_changed(id, &inst.groups);
        }
        Ok(())
    }

    /// Delivers a drop-matcher result (`DropHit`, `DropMiss`, `Over`, `Enter`
    /// or `Exit`) to the instance's listeners.
    ///
    /// Returns `false` without firing for any other kind.
    ///
    /// # Errors
    ///
    /// [`DragError::UnknownInstance`].
    pub fn notify_drop(
        &mut self,
        id: DragId,
        kind: DragEventKind,
        target: Option<TargetId>,
    ) -> Result<bool, DragError> {
        if !self.instances.contains_key(&id) {
            return Err(DragError::UnknownInstance(id));
        }
        if !kind.is_drop_kind() {
            log::warn!("{kind:?} is not a drop event");
            return Ok(false);
        }
        self.fire(id, kind, DragPayload::Drop { target });
        self.flush();
        Ok(true)
    }
}

fn init_option<T: Clone + PartialEq + 'static>(
    attrs: &mut AttributeStore,
    schema: &Schema,
    attr: Attr<T>,
    value: Option<T>,
) -> Result<(), AttributeError> {
    if let Some(value) = value {
        attrs.init(schema, attr, value)?;
    }
    Ok(())
}

impl<H: DragHost + fmt::Debug> fmt::Debug for DragManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragManager")
            .field("host", &self.host)
            .field("instances", &self.instances.len())
            .field("candidate", &self.candidate)
            .field("active", &self.active)
            .field("timers", &self.timers.len())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::{Point, Rect};

    use crate::host::Subscription;

    #[derive(Debug, Default)]
    struct Flat {
        live: Vec<u32>,
        classes: Vec<(u32, String)>,
        subs: u64,
        unlistened: Vec<Subscription>,
    }

    impl DragHost for Flat {
        type Node = u32;

        fn is_valid(&self, node: &u32) -> bool {
            self.live.contains(node)
        }
        fn bounding_box(&self, _: &u32) -> Rect {
            Rect::new(0.0, 0.0, 10.0, 10.0)
        }
        fn contains(&self, ancestor: &u32, node: &u32) -> bool {
            ancestor == node
        }
        fn matches_selector(&self, _: &u32, _: &str) -> bool {
            false
        }
        fn parent(&self, _: &u32) -> Option<u32> {
            None
        }
        fn query_all(&self, _: &u32, _: &str) -> Vec<u32> {
            Vec::new()
        }
        fn set_position(&mut self, _: &u32, _: Point) {}
        fn add_class(&mut self, node: &u32, class: &str) {
            self.classes.push((*node, String::from(class)));
        }
        fn remove_class(&mut self, node: &u32, class: &str) {
            self.classes.retain(|(n, c)| !(*n == *node && c == class));
        }
        fn listen(&mut self, _: &u32, _: ListenKind) -> Subscription {
            self.subs += 1;
            Subscription(self.subs)
        }
        fn unlisten(&mut self, sub: Subscription) {
            self.unlistened.push(sub);
        }
    }

    fn manager() -> DragManager<Flat> {
        DragManager::new(Flat {
            live: vec![1, 2, 3],
            ..Flat::default()
        })
        .unwrap()
    }

    #[test]
    fn registration_errors() {
        let mut m = manager();
        assert_eq!(
            m.register(DragOptions::new(9)).unwrap_err(),
            DragError::InvalidNode
        );
        assert_eq!(
            m.register(DragOptions::new(1).drag_node(9)).unwrap_err(),
            DragError::InvalidDragNode
        );
        let id = m.register(DragOptions::new(1)).unwrap();
        assert_eq!(
            m.register(DragOptions::new(1)).unwrap_err(),
            DragError::NodeInUse(id)
        );
        assert!(matches!(
            m.register(DragOptions::new(2).thresholds(-1.0, 10)),
            Err(DragError::Attribute(AttributeError::Rejected(_)))
        ));
        assert_eq!(m.len(), 1, "failed registrations leave nothing behind");
    }

    #[test]
    fn options_land_in_attributes() {
        let mut m = manager();
        let id = m
            .register(DragOptions::new(1).thresholds(8.0, 250).move_node(false))
            .unwrap();
        assert_eq!(m.attr(id, CLICK_PIXEL_THRESH), Ok(8.0));
        assert_eq!(m.attr(id, CLICK_TIME_THRESH), Ok(250));
        assert_eq!(m.attr(id, MOVE), Ok(false));
        assert_eq!(m.attr(id, OFFSET_NODE), Ok(true));
    }

    #[test]
    fn candidate_and_active_slots() {
        let mut m = manager();
        let a = DragId::new(1);
        let b = DragId::new(2);
        assert_eq!(m.register_candidate(a), Ok(()));
        assert_eq!(m.register_candidate(b), Err(SlotOccupied { holder: a }));
        assert_eq!(m.promote(a), Ok(()));
        assert_eq!(m.candidate(), None);
        assert_eq!(m.active_drag(), Some(a));
        assert_eq!(m.promote(b), Err(SlotOccupied { holder: a }));
        assert_eq!(m.register_candidate(b), Err(SlotOccupied { holder: a }));
        m.release(b);
        assert_eq!(m.active_drag(), Some(a), "release by a non-holder is a no-op");
        m.release(a);
        assert_eq!(m.active_drag(), None);
        assert_eq!(m.promote(b), Ok(()));
    }

    #[test]
    fn lock_toggles_class() {
        let mut m = manager();
        let id = m.register(DragOptions::new(1).lock(true)).unwrap();
        assert!(m.is_locked(id));
        assert!(m.host().classes.contains(&(1, String::from("dd-locked"))));
        assert_eq!(m.set_lock(id, false), Ok(true));
        assert_eq!(m.set_lock(id, false), Ok(false));
        assert!(!m.host().classes.contains(&(1, String::from("dd-locked"))));
    }

    #[test]
    fn destroy_is_idempotent_and_detaches() {
        let mut m = manager();
        let id = m.register(DragOptions::new(1)).unwrap();
        assert!(m.host().classes.contains(&(1, String::from("dd-draggable"))));
        assert!(m.destroy(id));
        assert!(!m.destroy(id));
        assert_eq!(m.host().unlistened.len(), 3);
        assert!(m.host().classes.is_empty());
        assert_eq!(m.set_lock(id, true), Err(DragError::UnknownInstance(id)));
    }

    #[test]
    fn off_finds_instance_and_manager_listeners() {
        let mut m = manager();
        let id = m.register(DragOptions::new(1)).unwrap();
        let global = m.on(DragEventKind::Start, |_| {});
        let local = m.on_drag(id, DragEventKind::Start, |_| {}).unwrap();
        assert!(m.off(local));
        assert!(m.off(global));
        assert!(!m.off(global));
    }

    #[test]
    fn custom_prefix_changes_classes() {
        let defaults = DragDefaults {
            css_prefix: String::from("yui"),
            ..DragDefaults::default()
        };
        let host = Flat {
            live: vec![1],
            ..Flat::default()
        };
        let mut m = DragManager::with_defaults(host, defaults).unwrap();
        m.register(DragOptions::new(1)).unwrap();
        assert_eq!(m.host().classes, [(1, String::from("yui-draggable"))]);
    }

    #[test]
    fn notify_drop_only_fires_drop_kinds() {
        let mut m = manager();
        let id = m.register(DragOptions::new(1)).unwrap();
        assert_eq!(m.notify_drop(id, DragEventKind::Start, None), Ok(false));
        assert_eq!(
            m.notify_drop(id, DragEventKind::DropMiss, None),
            Ok(true)
        );
        assert_eq!(
            m.notify_drop(DragId::new(42), DragEventKind::DropHit, None),
            Err(DragError::UnknownInstance(DragId::new(42)))
        );
    }
}
