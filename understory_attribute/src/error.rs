// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors produced while resolving schemas or reading and writing attributes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// No fragment of the schema declares this attribute.
    #[error("unknown attribute `{0}`")]
    Unknown(&'static str),
    /// The attribute exists but holds a different value type.
    #[error("attribute `{name}` holds `{declared}`, not `{requested}`")]
    TypeMismatch {
        /// Attribute name.
        name: &'static str,
        /// Type the schema declares.
        declared: &'static str,
        /// Type the caller asked for.
        requested: &'static str,
    },
    /// The attribute can only be written by its owner during initialisation.
    #[error("attribute `{0}` is read-only")]
    ReadOnly(&'static str),
    /// The declared validator refused the value.
    #[error("value rejected for attribute `{0}`")]
    Rejected(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_attribute() {
        assert_eq!(
            AttributeError::Unknown("lock").to_string(),
            "unknown attribute `lock`"
        );
        assert_eq!(
            AttributeError::TypeMismatch {
                name: "lock",
                declared: "bool",
                requested: "f64",
            }
            .to_string(),
            "attribute `lock` holds `bool`, not `f64`"
        );
    }
}
