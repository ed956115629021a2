// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute identification types.
//!
//! [`Attr<T>`] is the typed, name-based key used by callers; [`AttrId`] is the
//! compact slot a [`Schema`](crate::Schema) assigns to each name on resolution.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A resolved attribute slot within one [`Schema`](crate::Schema).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrId(u16);

impl AttrId {
    /// Creates an id from a raw slot index.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the slot index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttrId").field(&self.0).finish()
    }
}

/// A typed attribute key.
///
/// Keys are identified by name, so the same constant works against any schema
/// that declares the name with the matching value type:
///
/// ```rust
/// use understory_attribute::Attr;
///
/// const LOCK: Attr<bool> = Attr::new("lock");
/// assert_eq!(LOCK.name(), "lock");
/// ```
pub struct Attr<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Attr<T> {
    /// Creates a key for the attribute called `name`.
    #[must_use]
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the attribute name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

// Manual impls so `T` needs no bounds.

impl<T> Copy for Attr<T> {}

impl<T> Clone for Attr<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Attr<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Attr<T> {}

impl<T> Hash for Attr<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> fmt::Debug for Attr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attr")
            .field("name", &self.name)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}
