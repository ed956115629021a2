// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Schema fragments and their flattened resolution.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use hashbrown::HashMap;

use crate::error::AttributeError;
use crate::id::{Attr, AttrId};
use crate::value::AttrValue;

type Validator = Rc<dyn Fn(&AttrValue) -> bool>;

/// One attribute declaration inside a fragment or a resolved schema.
#[derive(Clone)]
pub struct AttrDecl {
    name: &'static str,
    origin: &'static str,
    default: AttrValue,
    read_only: bool,
    validator: Option<Validator>,
}

impl AttrDecl {
    /// Attribute name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the fragment that supplied the effective declaration.
    #[must_use]
    #[inline]
    pub fn origin(&self) -> &'static str {
        self.origin
    }

    /// Default value used when an object has no local value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &AttrValue {
        &self.default
    }

    /// Whether only the owner may write the attribute (see
    /// [`AttributeStore::init`](crate::AttributeStore::init)).
    #[must_use]
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Runs the validator, if any, against a candidate value.
    #[must_use]
    pub fn accepts(&self, value: &AttrValue) -> bool {
        self.validator.as_ref().is_none_or(|v| v(value))
    }

    #[must_use]
    pub(crate) fn type_id(&self) -> TypeId {
        self.default.type_id()
    }
}

impl fmt::Debug for AttrDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrDecl")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("type", &self.default.type_name())
            .field("read_only", &self.read_only)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// A named layer of attribute declarations.
///
/// Fragments are plain data; nothing happens until a list of them is handed to
/// [`Schema::resolve`].
#[derive(Clone, Debug)]
pub struct SchemaFragment {
    name: &'static str,
    decls: Vec<AttrDecl>,
}

impl SchemaFragment {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            decls: Vec::new(),
        }
    }

    /// Returns the fragment name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declarations in this fragment.
    #[must_use]
    pub fn decls(&self) -> &[AttrDecl] {
        &self.decls
    }

    /// Declares a writable attribute.
    #[must_use]
    pub fn attr<T: Clone + 'static>(self, attr: Attr<T>, default: T) -> Self {
        self.push(attr.name(), AttrValue::new(default), false, None)
    }

    /// Declares an attribute only its owner may write.
    #[must_use]
    pub fn read_only<T: Clone + 'static>(self, attr: Attr<T>, default: T) -> Self {
        self.push(attr.name(), AttrValue::new(default), true, None)
    }

    /// Declares a writable attribute whose values must pass `validator`.
    #[must_use]
    pub fn validated<T, F>(self, attr: Attr<T>, default: T, validator: F) -> Self
    where
        T: Clone + 'static,
        F: Fn(&T) -> bool + 'static,
    {
        let erased: Validator = Rc::new(move |value: &AttrValue| {
            value.downcast_ref::<T>().is_some_and(&validator)
        });
        self.push(attr.name(), AttrValue::new(default), false, Some(erased))
    }

    fn push(
        mut self,
        name: &'static str,
        default: AttrValue,
        read_only: bool,
        validator: Option<Validator>,
    ) -> Self {
        let decl = AttrDecl {
            name,
            origin: self.name,
            default,
            read_only,
            validator,
        };
        match self.decls.iter_mut().find(|d| d.name == name) {
            Some(existing) => *existing = decl,
            None => self.decls.push(decl),
        }
        self
    }
}

/// A flattened attribute schema.
///
/// Built once from an ordered list of fragments:
///
/// - Names keep the slot of their first declaration.
/// - A later redeclaration replaces the default and the read-only flag; a
///   validator is only replaced when the later declaration brings one.
/// - A redeclaration may not change the value type.
///
/// ```rust
/// use understory_attribute::{Attr, Schema, SchemaFragment};
///
/// const MOVE: Attr<bool> = Attr::new("move");
///
/// let schema = Schema::resolve([
///     SchemaFragment::new("drag").attr(MOVE, true),
///     SchemaFragment::new("proxy").attr(MOVE, false),
/// ])
/// .unwrap();
///
/// assert_eq!(schema.default_of(MOVE), Ok(&false));
/// assert_eq!(schema.decl(MOVE.name()).unwrap().origin(), "proxy");
/// assert_eq!(schema.fragments(), ["drag", "proxy"]);
/// ```
pub struct Schema {
    decls: Vec<AttrDecl>,
    by_name: HashMap<&'static str, AttrId>,
    fragments: Vec<&'static str>,
}

impl Schema {
    /// Resolves `fragments`, in order, into one flat schema.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::TypeMismatch`] if a fragment redeclares an
    /// attribute with a different value type.
    ///
    /// # Panics
    ///
    /// Panics if more than `u16::MAX` attributes are declared.
    pub fn resolve(
        fragments: impl IntoIterator<Item = SchemaFragment>,
    ) -> Result<Self, AttributeError> {
        let mut schema = Self {
            decls: Vec::new(),
            by_name: HashMap::new(),
            fragments: Vec::new(),
        };
        for fragment in fragments {
            schema.fragments.push(fragment.name);
            for decl in fragment.decls {
                schema.merge(decl)?;
            }
        }
        Ok(schema)
    }

    fn merge(&mut self, decl: AttrDecl) -> Result<(), AttributeError> {
        if let Some(id) = self.by_name.get(decl.name) {
            let slot = &mut self.decls[id.index() as usize];
            if slot.type_id() != decl.type_id() {
                return Err(AttributeError::TypeMismatch {
                    name: decl.name,
                    declared: slot.default.type_name(),
                    requested: decl.default.type_name(),
                });
            }
            let validator = decl.validator.or_else(|| slot.validator.take());
            *slot = AttrDecl { validator, ..decl };
            return Ok(());
        }
        assert!(
            self.decls.len() < u16::MAX as usize,
            "Too many attributes declared (max {})",
            u16::MAX
        );
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = AttrId::new(self.decls.len() as u16);
        self.by_name.insert(decl.name, id);
        self.decls.push(decl);
        Ok(())
    }

    /// Number of declared attributes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Names of the resolved fragments, in resolution order.
    #[must_use]
    pub fn fragments(&self) -> &[&'static str] {
        &self.fragments
    }

    /// Looks up the slot of an attribute name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<AttrId> {
        self.by_name.get(name).copied()
    }

    /// Returns the effective declaration for `name`.
    #[must_use]
    pub fn decl(&self, name: &str) -> Option<&AttrDecl> {
        self.id(name).map(|id| &self.decls[id.index() as usize])
    }

    /// Returns the declaration in slot `id`.
    #[must_use]
    pub fn decl_at(&self, id: AttrId) -> Option<&AttrDecl> {
        self.decls.get(id.index() as usize)
    }

    /// Returns the default value of a typed attribute.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Unknown`] or [`AttributeError::TypeMismatch`].
    pub fn default_of<T: 'static>(&self, attr: Attr<T>) -> Result<&T, AttributeError> {
        let (_, decl) = self.lookup(attr)?;
        decl.default
            .downcast_ref()
            .ok_or_else(|| mismatch::<T>(attr.name(), decl))
    }

    /// Resolves a typed key to its slot and declaration, checking the type.
    pub(crate) fn lookup<T: 'static>(
        &self,
        attr: Attr<T>,
    ) -> Result<(AttrId, &AttrDecl), AttributeError> {
        let id = self
            .id(attr.name())
            .ok_or(AttributeError::Unknown(attr.name()))?;
        let decl = &self.decls[id.index() as usize];
        if decl.type_id() != TypeId::of::<T>() {
            return Err(mismatch::<T>(attr.name(), decl));
        }
        Ok((id, decl))
    }

    /// Iterates over declarations in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &AttrDecl> {
        self.decls.iter()
    }
}

pub(crate) fn mismatch<T>(name: &'static str, decl: &AttrDecl) -> AttributeError {
    AttributeError::TypeMismatch {
        name,
        declared: decl.default.type_name(),
        requested: core::any::type_name::<T>(),
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fragments", &self.fragments)
            .field("decls", &self.decls)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    const LOCK: Attr<bool> = Attr::new("lock");
    const THRESH: Attr<f64> = Attr::new("thresh");
    const WRONG: Attr<u32> = Attr::new("lock");

    #[test]
    fn resolve_keeps_first_position() {
        let schema = Schema::resolve([
            SchemaFragment::new("a").attr(LOCK, false).attr(THRESH, 3.0),
            SchemaFragment::new("b").attr(LOCK, true),
        ])
        .unwrap();

        let names: Vec<_> = schema.iter().map(AttrDecl::name).collect();
        assert_eq!(names, vec!["lock", "thresh"]);
        assert_eq!(schema.default_of(LOCK), Ok(&true));
        assert_eq!(schema.decl("lock").unwrap().origin(), "b");
    }

    #[test]
    fn redeclaration_keeps_validator_unless_replaced() {
        let schema = Schema::resolve([
            SchemaFragment::new("base").validated(THRESH, 3.0, |t: &f64| *t >= 0.0),
            SchemaFragment::new("override").attr(THRESH, 5.0),
        ])
        .unwrap();
        let decl = schema.decl("thresh").unwrap();
        assert!(!decl.accepts(&AttrValue::new(-1.0_f64)));
        assert!(decl.accepts(&AttrValue::new(1.0_f64)));
    }

    #[test]
    fn redeclaration_cannot_change_type() {
        let err = Schema::resolve([
            SchemaFragment::new("a").attr(LOCK, false),
            SchemaFragment::new("b").attr(WRONG, 1),
        ])
        .unwrap_err();
        assert!(matches!(err, AttributeError::TypeMismatch { name: "lock", .. }));
    }

    #[test]
    fn duplicate_inside_fragment_replaces() {
        let fragment = SchemaFragment::new("a").attr(LOCK, false).read_only(LOCK, true);
        assert_eq!(fragment.decls().len(), 1);
        assert!(fragment.decls()[0].is_read_only());
    }

    #[test]
    fn lookup_errors() {
        let schema = Schema::resolve([SchemaFragment::new("a").attr(LOCK, false)]).unwrap();
        assert_eq!(
            schema.default_of(THRESH),
            Err(AttributeError::Unknown("thresh"))
        );
        assert!(matches!(
            schema.default_of(WRONG),
            Err(AttributeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn empty_schema() {
        let schema = Schema::resolve(Vec::new()).unwrap();
        assert!(schema.is_empty());
        assert!(format!("{schema:?}").contains("Schema"));
    }
}
