//! Strong identifier types for Elara.
//!
//! All row identifiers are newtypes over the backend's opaque string ids,
//! to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new id from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the id is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a construction project.
    ProjectId
}

string_id! {
    /// Identifier of a node in a project's resource tree.
    ResourceId
}

string_id! {
    /// Identifier of a permission grant.
    GrantId
}

string_id! {
    /// Identifier of a user account.
    UserId
}

string_id! {
    /// Identifier of an empresa (contractor company).
    EmpresaId
}

string_id! {
    /// Identifier of a payment request (solicitud de pago).
    RequestId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_construction() {
        let id = ResourceId::new("res-01");
        assert_eq!(id.as_str(), "res-01");
        assert_eq!(id, ResourceId::from("res-01"));
    }

    #[test]
    fn test_id_display() {
        let id = UserId::new("U1");
        assert_eq!(format!("{}", id), "U1");
        assert_eq!(format!("{:?}", id), "UserId(U1)");
    }

    #[test]
    fn test_default_is_empty() {
        let id = EmpresaId::default();
        assert!(id.is_empty());
        assert_eq!(id.as_str(), "");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProjectId::new("P1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"P1\"");
        let back: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
