// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_attribute --heading-base-level=0

//! Understory Attribute: flattened attribute schemas for UI objects.
//!
//! Widget toolkits traditionally describe configuration with a per-class
//! attribute table and merge the tables of every ancestor class when an object
//! is constructed. This crate keeps the useful part of that model (layered
//! declarations where a more specific layer may override defaults) while
//! resolving the layers exactly once into a flat [`Schema`].
//!
//! ## Core Concepts
//!
//! - [`Attr<T>`]: a typed attribute key, constructible in `const` context.
//! - [`SchemaFragment`]: one named layer of declarations (default value,
//!   read-only flag, optional validator).
//! - [`Schema`]: the result of resolving an ordered list of fragments.
//!   A later fragment redeclaring a name overrides it in place.
//! - [`AttributeStore`]: sparse per-object values over a schema. Reads fall
//!   back to the schema default; writes are type checked and validated.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_attribute::{Attr, AttributeStore, Schema, SchemaFragment};
//!
//! const VISIBLE: Attr<bool> = Attr::new("visible");
//! const WIDTH: Attr<f64> = Attr::new("width");
//!
//! let base = SchemaFragment::new("base")
//!     .attr(VISIBLE, true)
//!     .validated(WIDTH, 0.0, |w: &f64| *w >= 0.0);
//! let panel = SchemaFragment::new("panel").attr(WIDTH, 240.0);
//!
//! let schema = Schema::resolve([base, panel]).unwrap();
//! let mut store = AttributeStore::new();
//!
//! assert_eq!(store.get(&schema, WIDTH), Ok(240.0));
//! let change = store.set(&schema, WIDTH, 300.0).unwrap().unwrap();
//! assert_eq!((change.old, change.new), (240.0, 300.0));
//!
//! // The validator declared by the base layer still applies.
//! assert!(store.set(&schema, WIDTH, -1.0).is_err());
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod id;
mod schema;
mod store;
mod value;

pub use error::AttributeError;
pub use id::{Attr, AttrId};
pub use schema::{AttrDecl, Schema, SchemaFragment};
pub use store::{AttrChange, AttributeStore};
pub use value::AttrValue;
