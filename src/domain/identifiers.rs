// Copyright (c) 2025 - Cowboy AI, Inc.
//! Typed Identifiers and Names
//!
//! Every entity the engine touches is referred to by a dedicated newtype
//! rather than a bare `Uuid` or `String`. This prevents the classic
//! mixup bugs (passing an image id where a revision id is expected) at
//! compile time and keeps the store's key types self-documenting.
//!
//! Id types wrap UUIDs (v7 for time ordering, like event ids). Name
//! types wrap validated strings and are serialized transparently.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} must not exceed {max} characters: {len}")]
    TooLong {
        kind: &'static str,
        max: usize,
        len: usize,
    },
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a fresh identifier (UUID v7, time-ordered)
            pub fn random() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type! {
    /// Identifier of an inventory element (device). The element record
    /// itself is owned by the inventory boundary; the engine only keys
    /// artifacts by it.
    ElementId
}

id_type! {
    /// Identifier of a configuration revision
    RevisionId
}

id_type! {
    /// Identifier of a firmware/software image
    ImageId
}

id_type! {
    /// Identifier of a release record (referential-integrity guard only)
    ReleaseId
}

macro_rules! name_type {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum accepted length (matches the persisted column width)
            pub const MAX_LENGTH: usize = 255;

            /// Create a validated name
            ///
            /// # Invariants
            /// - Non-empty
            /// - At most [`Self::MAX_LENGTH`] characters
            pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
                let name = name.into();
                if name.is_empty() {
                    return Err(NameError::Empty($label));
                }
                if name.len() > Self::MAX_LENGTH {
                    return Err(NameError::TooLong {
                        kind: $label,
                        max: Self::MAX_LENGTH,
                        len: name.len(),
                    });
                }
                Ok(Self(name))
            }

            /// View as string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

name_type! {
    /// Name of a configuration on an element (e.g. `running-config`,
    /// `startup-config`). Together with the element id it identifies one
    /// revision history.
    ConfigName, "configuration name"
}

name_type! {
    /// Human-readable image name
    ImageName, "image name"
}

name_type! {
    /// Element role a role-wide image applies to (e.g. `leaf`, `spine`)
    RoleName, "role name"
}

name_type! {
    /// Platform chipset the image was built for
    ChipsetName, "chipset name"
}

name_type! {
    /// Artifact type discriminator of an image (e.g. `lxc`, `onl`,
    /// `docker`). Part of every promotion scope key.
    ImageType, "image type"
}

name_type! {
    /// Authenticated user recorded as creator of a revision
    UserName, "user name"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rejects_empty() {
        assert_eq!(
            ConfigName::new(""),
            Err(NameError::Empty("configuration name"))
        );
    }

    #[test]
    fn test_name_rejects_oversized() {
        let oversized = "x".repeat(ConfigName::MAX_LENGTH + 1);
        assert!(matches!(
            ConfigName::new(oversized),
            Err(NameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_name_roundtrip() {
        let name = ConfigName::new("running-config").unwrap();
        assert_eq!(name.as_str(), "running-config");
        assert_eq!(name.to_string(), "running-config");
    }

    #[test]
    fn test_id_display_matches_uuid() {
        let raw = Uuid::parse_str("01934f4a-1000-7000-8000-000000001000").unwrap();
        let id = ImageId::from_uuid(raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Compile-time property really; keep a witness that conversion
        // is explicit.
        let raw = Uuid::now_v7();
        let element = ElementId::from(raw);
        let image = ImageId::from(raw);
        assert_eq!(element.as_uuid(), image.as_uuid());
    }
}
