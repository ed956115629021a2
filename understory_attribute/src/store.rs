// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object sparse attribute storage.
//!
//! Like a property store, an [`AttributeStore`] only holds values that were
//! explicitly written. Everything else reads through to the schema default.
//! Entries live in a sorted `SmallVec` keyed by [`AttrId`], so typical objects
//! with a handful of overrides never allocate.

use smallvec::SmallVec;

use crate::error::AttributeError;
use crate::id::{Attr, AttrId};
use crate::schema::{Schema, mismatch};
use crate::value::AttrValue;

const INLINE_CAPACITY: usize = 8;

/// Describes a write that changed an attribute's effective value.
#[derive(Clone, Debug, PartialEq)]
pub struct AttrChange<T> {
    /// Attribute name.
    pub name: &'static str,
    /// Effective value before the write.
    pub old: T,
    /// Effective value after the write.
    pub new: T,
}

/// Sparse attribute values for one object.
///
/// The store does not own its [`Schema`]; callers pass it in, so one schema
/// can serve every object of a kind.
///
/// ```rust
/// use understory_attribute::{Attr, AttributeError, AttributeStore, Schema, SchemaFragment};
///
/// const LOCK: Attr<bool> = Attr::new("lock");
/// const DRAGGING: Attr<bool> = Attr::new("dragging");
///
/// let schema = Schema::resolve([SchemaFragment::new("drag")
///     .attr(LOCK, false)
///     .read_only(DRAGGING, false)])
/// .unwrap();
/// let mut store = AttributeStore::new();
///
/// assert!(store.set(&schema, LOCK, true).unwrap().is_some());
/// // Writing the same value again is not a change.
/// assert!(store.set(&schema, LOCK, true).unwrap().is_none());
///
/// assert_eq!(
///     store.set(&schema, DRAGGING, true),
///     Err(AttributeError::ReadOnly("dragging"))
/// );
/// store.init(&schema, DRAGGING, true).unwrap();
/// assert_eq!(store.get(&schema, DRAGGING), Ok(true));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeStore {
    entries: SmallVec<[(AttrId, AttrValue); INLINE_CAPACITY]>,
}

impl AttributeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locally written attributes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was written locally.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn find(&self, id: AttrId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(aid, _)| *aid)
    }

    /// Returns `true` if the attribute has a local value.
    #[must_use]
    pub fn is_set<T: 'static>(&self, schema: &Schema, attr: Attr<T>) -> bool {
        schema
            .lookup(attr)
            .is_ok_and(|(id, _)| self.find(id).is_ok())
    }

    /// Borrows the effective value: local value, else the schema default.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`] or [`AttributeError::TypeMismatch`].
    pub fn get_ref<'a, T: 'static>(
        &'a self,
        schema: &'a Schema,
        attr: Attr<T>,
    ) -> Result<&'a T, AttributeError> {
        let (id, decl) = schema.lookup(attr)?;
        let value = match self.find(id) {
            Ok(idx) => &self.entries[idx].1,
            Err(_) => decl.default_value(),
        };
        value
            .downcast_ref()
            .ok_or_else(|| mismatch::<T>(attr.name(), decl))
    }

    /// Returns a copy of the effective value.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`] or [`AttributeError::TypeMismatch`].
    pub fn get<T: Clone + 'static>(
        &self,
        schema: &Schema,
        attr: Attr<T>,
    ) -> Result<T, AttributeError> {
        self.get_ref(schema, attr).cloned()
    }

    /// Writes a local value.
    ///
    /// Returns `Ok(Some(change))` if the effective value changed and
    /// `Ok(None)` if the write was a no-op.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`], [`AttributeError::TypeMismatch`],
    /// [`AttributeError::ReadOnly`], or [`AttributeError::Rejected`].
    pub fn set<T: Clone + PartialEq + 'static>(
        &mut self,
        schema: &Schema,
        attr: Attr<T>,
        value: T,
    ) -> Result<Option<AttrChange<T>>, AttributeError> {
        self.write(schema, attr, value, false)
    }

    /// Writes a local value on behalf of the owner, ignoring the read-only flag.
    ///
    /// Validators still run.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`], [`AttributeError::TypeMismatch`], or
    /// [`AttributeError::Rejected`].
    pub fn init<T: Clone + PartialEq + 'static>(
        &mut self,
        schema: &Schema,
        attr: Attr<T>,
        value: T,
    ) -> Result<Option<AttrChange<T>>, AttributeError> {
        self.write(schema, attr, value, true)
    }

    fn write<T: Clone + PartialEq + 'static>(
        &mut self,
        schema: &Schema,
        attr: Attr<T>,
        value: T,
        owner: bool,
    ) -> Result<Option<AttrChange<T>>, AttributeError> {
        let (id, decl) = schema.lookup(attr)?;
        if decl.is_read_only() && !owner {
            return Err(AttributeError::ReadOnly(attr.name()));
        }
        let erased = AttrValue::new(value.clone());
        if !decl.accepts(&erased) {
            return Err(AttributeError::Rejected(attr.name()));
        }
        let old = self.get(schema, attr)?;
        match self.find(id) {
            Ok(idx) => self.entries[idx].1 = erased,
            Err(idx) => self.entries.insert(idx, (id, erased)),
        }
        if old == value {
            return Ok(None);
        }
        Ok(Some(AttrChange {
            name: attr.name(),
            old,
            new: value,
        }))
    }

    /// Removes a local value so reads fall back to the default.
    ///
    /// Returns `true` if a local value was removed.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`] or [`AttributeError::TypeMismatch`].
    pub fn reset<T: 'static>(
        &mut self,
        schema: &Schema,
        attr: Attr<T>,
    ) -> Result<bool, AttributeError> {
        let (id, _) = schema.lookup(attr)?;
        match self.find(id) {
            Ok(idx) => {
                self.entries.remove(idx);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaFragment;
    use alloc::string::String;

    const LOCK: Attr<bool> = Attr::new("lock");
    const THRESH: Attr<f64> = Attr::new("thresh");
    const LABEL: Attr<String> = Attr::new("label");
    const INITIALIZED: Attr<bool> = Attr::new("initialized");

    fn schema() -> Schema {
        Schema::resolve([
            SchemaFragment::new("base").read_only(INITIALIZED, false),
            SchemaFragment::new("drag")
                .attr(LOCK, false)
                .validated(THRESH, 3.0, |t: &f64| t.is_finite() && *t >= 0.0)
                .attr(LABEL, String::new()),
        ])
        .unwrap()
    }

    #[test]
    fn get_falls_back_to_default() {
        let schema = schema();
        let store = AttributeStore::new();
        assert_eq!(store.get(&schema, THRESH), Ok(3.0));
        assert!(!store.is_set(&schema, THRESH));
        assert!(store.is_empty());
    }

    #[test]
    fn set_reports_change() {
        let schema = schema();
        let mut store = AttributeStore::new();
        let change = store.set(&schema, THRESH, 8.0).unwrap();
        assert_eq!(
            change,
            Some(AttrChange {
                name: "thresh",
                old: 3.0,
                new: 8.0
            })
        );
        assert_eq!(store.get(&schema, THRESH), Ok(8.0));
        assert!(store.is_set(&schema, THRESH));
    }

    #[test]
    fn writing_default_explicitly_is_not_a_change() {
        let schema = schema();
        let mut store = AttributeStore::new();
        assert_eq!(store.set(&schema, LOCK, false), Ok(None));
        assert!(store.is_set(&schema, LOCK), "value is still stored locally");
    }

    #[test]
    fn validator_rejects_and_keeps_old_value() {
        let schema = schema();
        let mut store = AttributeStore::new();
        assert_eq!(
            store.set(&schema, THRESH, f64::NAN),
            Err(AttributeError::Rejected("thresh"))
        );
        assert_eq!(
            store.set(&schema, THRESH, -2.0),
            Err(AttributeError::Rejected("thresh"))
        );
        assert_eq!(store.get(&schema, THRESH), Ok(3.0));
    }

    #[test]
    fn read_only_requires_init() {
        let schema = schema();
        let mut store = AttributeStore::new();
        assert_eq!(
            store.set(&schema, INITIALIZED, true),
            Err(AttributeError::ReadOnly("initialized"))
        );
        assert!(store.init(&schema, INITIALIZED, true).unwrap().is_some());
        assert_eq!(store.get(&schema, INITIALIZED), Ok(true));
    }

    #[test]
    fn unknown_and_mismatched_keys() {
        let schema = schema();
        let mut store = AttributeStore::new();
        let missing: Attr<bool> = Attr::new("missing");
        let wrong: Attr<u8> = Attr::new("lock");
        assert_eq!(store.get(&schema, missing), Err(AttributeError::Unknown("missing")));
        assert!(matches!(
            store.set(&schema, wrong, 1),
            Err(AttributeError::TypeMismatch { name: "lock", .. })
        ));
    }

    #[test]
    fn reset_restores_default() {
        let schema = schema();
        let mut store = AttributeStore::new();
        store.set(&schema, LABEL, String::from("proxy")).unwrap();
        assert_eq!(store.get_ref(&schema, LABEL).map(String::as_str), Ok("proxy"));
        assert_eq!(store.reset(&schema, LABEL), Ok(true));
        assert_eq!(store.reset(&schema, LABEL), Ok(false));
        assert_eq!(store.get(&schema, LABEL), Ok(String::new()));
    }

    #[test]
    fn entries_stay_sorted() {
        let schema = schema();
        let mut store = AttributeStore::new();
        store.set(&schema, LABEL, String::from("x")).unwrap();
        store.set(&schema, LOCK, true).unwrap();
        store.set(&schema, THRESH, 1.0).unwrap();
        let ids: alloc::vec::Vec<_> = store.entries.iter().map(|(id, _)| *id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(store.len(), 3);
    }
}
