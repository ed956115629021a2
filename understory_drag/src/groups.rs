// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named groups a draggable participates in.
//!
//! Drop-target matching happens outside this crate; it reads these names to
//! decide which targets a drag may interact with. Membership is a set, but
//! iteration follows insertion order so listeners see stable output.

use alloc::string::String;
use smallvec::SmallVec;

/// Group every draggable joins unless configured otherwise.
pub const DEFAULT_GROUP: &str = "default";

/// Insertion-ordered set of group names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groups {
    names: SmallVec<[String; 2]>,
}

impl Default for Groups {
    fn default() -> Self {
        let mut groups = Self::empty();
        groups.add(DEFAULT_GROUP);
        groups
    }
}

impl Groups {
    /// A set containing no groups.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: SmallVec::new(),
        }
    }

    /// Adds `name`. Returns `false` if it was already a member.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Removes `name`. Returns `false` if it was not a member.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(idx) => {
                self.names.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Replaces the membership, dropping duplicates.
    pub fn replace<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.names.clear();
        for n in names {
            self.add(n);
        }
    }

    /// Membership test; independent of insertion order.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns `true` if the two sets share at least one group.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.names.iter().any(|n| other.contains(n))
    }

    /// Group names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Group names as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the draggable is in no group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut groups = Self::empty();
        groups.replace(iter);
        groups
    }
}
