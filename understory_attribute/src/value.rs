// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased attribute value storage.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased attribute value.
///
/// ```rust
/// use understory_attribute::AttrValue;
///
/// let value = AttrValue::new(3.0_f64);
/// assert!(value.is::<f64>());
/// assert_eq!(value.downcast_ref::<f64>(), Some(&3.0));
/// assert_eq!(value.downcast_ref::<u64>(), None);
/// ```
pub struct AttrValue {
    inner: Box<dyn ErasedAttr>,
    type_id: TypeId,
    type_name: &'static str,
}

impl AttrValue {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the contained value.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the contained value is a `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrows the value as a `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref()
    }
}

impl Clone for AttrValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

trait ErasedAttr: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ErasedAttr>;
}

impl<T: Clone + 'static> ErasedAttr for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ErasedAttr> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn clone_keeps_value_and_type() {
        let value = AttrValue::new(String::from("default"));
        let cloned = value.clone();
        assert_eq!(
            cloned.downcast_ref::<String>().map(String::as_str),
            Some("default")
        );
        assert_eq!(cloned.type_id(), TypeId::of::<String>());
    }

    #[test]
    fn debug_names_the_type() {
        let debug = format!("{:?}", AttrValue::new(1_u64));
        assert!(debug.contains("u64"));
    }
}
