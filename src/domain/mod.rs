// Copyright (c) 2025 - Cowboy AI, Inc.
//! Lifecycle Engine Domain Models
//!
//! Core domain concepts for the versioned-artifact lifecycle engine:
//! typed identifiers, the version value object with its total ordering,
//! content-addressed payload records, the persisted artifact records and
//! the promotion scope predicate.
//!
//! # Value Objects with Invariants
//!
//! - [`ImageVersion`] - `major.minor.patch[-prerelease]` with the
//!   promotion ordering (stable sorts above any pre-release)
//! - [`ContentHash`] - SHA-256 content address of a payload
//! - Typed ids ([`ElementId`], [`RevisionId`], [`ImageId`], ...) and
//!   validated names ([`ConfigName`], [`RoleName`], ...)
//!
//! # Records
//!
//! - [`ConfigRevision`] - one entry in a configuration history
//! - [`ImageRecord`] - a firmware/software image and its lifecycle state
//! - [`ElementImageBinding`] - installation record of an image on an
//!   element
//!
//! All cross-aggregate relationships are id fields resolved through the
//! store; there are no in-memory back-pointers.

pub mod artifacts;
pub mod content;
pub mod identifiers;
pub mod scope;
pub mod version;

// Re-export value objects and records
pub use artifacts::{
    ConfigRevision, ConfigState, ElementImageBinding, ImageRecord, ImageState,
    InstallationState, PackageRef, ReleaseRecord,
};
pub use content::{ChecksumAlgorithm, ContentHash, ContentRecord};
pub use identifiers::{
    ChipsetName, ConfigName, ElementId, ImageId, ImageName, ImageType, NameError, ReleaseId,
    RevisionId, RoleName, UserName,
};
pub use scope::{ImageScopeQuery, PromotionScope, VersionBound};
pub use version::{ImageVersion, UpgradeType, VersionParseError};
