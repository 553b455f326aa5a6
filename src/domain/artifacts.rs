// Copyright (c) 2025 - Cowboy AI, Inc.
//! Persisted Artifact Records
//!
//! The records the lifecycle engine reads and writes: configuration
//! revisions, images, element-image bindings and release references.
//! All cross-aggregate references are id fields resolved through the
//! store; records never hold back-pointers to their owners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::content::{ChecksumAlgorithm, ContentHash};
use super::identifiers::{
    ChipsetName, ConfigName, ElementId, ImageId, ImageName, ImageType, ReleaseId, RevisionId,
    RoleName, UserName,
};
use super::version::ImageVersion;

/// Lifecycle state of a configuration revision
///
/// At most one `Active` and at most one `Candidate` revision exist per
/// (element, configuration name) at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfigState {
    /// Uploaded but not yet authoritative
    Candidate,

    /// The configuration currently applied on the element
    Active,

    /// Displaced by a newer active configuration; restorable
    Superseded,
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigState::Candidate => "CANDIDATE",
            ConfigState::Active => "ACTIVE",
            ConfigState::Superseded => "SUPERSEDED",
        };
        f.write_str(name)
    }
}

/// One revision in a configuration history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRevision {
    /// Unique revision id
    pub revision_id: RevisionId,

    /// Owning element
    pub element: ElementId,

    /// Configuration name on that element
    pub name: ConfigName,

    /// Reference into the content store
    pub content_hash: ContentHash,

    /// Media type of the referenced payload
    pub content_type: String,

    /// Lifecycle state
    pub state: ConfigState,

    /// User who created the revision
    pub creator: UserName,

    /// Optional operator comment; the only mutable field besides `state`
    pub comment: Option<String>,

    /// Last modification timestamp; drives "latest revision" selection
    pub modified_at: DateTime<Utc>,
}

impl ConfigRevision {
    pub fn is_candidate(&self) -> bool {
        self.state == ConfigState::Candidate
    }

    pub fn is_active(&self) -> bool {
        self.state == ConfigState::Active
    }
}

/// Lifecycle state of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageState {
    /// Registered, eligible for release
    Candidate,

    /// The authoritative version for its scope
    Release,

    /// Displaced by the release of a newer version; re-promotable
    Superseded,

    /// Withdrawn; excluded from all promotion and rollback scope matching
    Revoked,
}

impl fmt::Display for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageState::Candidate => "CANDIDATE",
            ImageState::Release => "RELEASE",
            ImageState::Superseded => "SUPERSEDED",
            ImageState::Revoked => "REVOKED",
        };
        f.write_str(name)
    }
}

/// Reference to a package shipped with an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    /// Package name
    pub name: String,

    /// Package version
    pub version: ImageVersion,
}

/// A firmware/software image known to the inventory
///
/// Role-wide images (`owner == None`) apply to every element whose role
/// intersects `roles`; element-private images (`owner == Some(_)`) apply
/// to exactly one element and form their own promotion scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Unique image id
    pub image_id: ImageId,

    /// Artifact type discriminator (part of the scope key)
    pub image_type: ImageType,

    /// Human-readable name
    pub name: ImageName,

    /// Platform chipset the image was built for (part of the scope key)
    pub chipset: ChipsetName,

    /// Element roles the image applies to; non-empty unless
    /// element-private
    pub roles: BTreeSet<RoleName>,

    /// Owning element for element-private images
    pub owner: Option<ElementId>,

    /// Image version
    pub version: ImageVersion,

    /// Lifecycle state
    pub state: ImageState,

    /// Checksums of the image binary, keyed by algorithm
    pub checksums: BTreeMap<ChecksumAlgorithm, String>,

    /// Build metadata
    pub build_id: Option<String>,
    pub build_date: Option<DateTime<Utc>>,

    /// Packages shipped with the image
    pub packages: Vec<PackageRef>,

    /// Applications provided by the image
    pub applications: Vec<String>,

    /// File extension of the image binary
    pub extension: Option<String>,

    /// Free-form grouping attributes
    pub category: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
}

impl ImageRecord {
    pub fn is_revoked(&self) -> bool {
        self.state == ImageState::Revoked
    }

    /// Whether the image is private to a single element
    pub fn is_element_private(&self) -> bool {
        self.owner.is_some()
    }
}

/// Installation state of an image on an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstallationState {
    /// Not yet on the element; to be fetched
    Pull,

    /// Present on the element but not booted
    Cached,

    /// The image the element currently runs
    Active,
}

impl fmt::Display for InstallationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallationState::Pull => "PULL",
            InstallationState::Cached => "CACHED",
            InstallationState::Active => "ACTIVE",
        };
        f.write_str(name)
    }
}

/// Installation record of an image on an element
///
/// At most one binding per element carries `auto_provision = true`. A
/// `Pull` binding without the flag carries no information and is removed
/// rather than kept around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementImageBinding {
    /// Element the image is bound to
    pub element: ElementId,

    /// The bound image
    pub image: ImageId,

    /// How far the installation has progressed
    pub installation_state: InstallationState,

    /// Whether this image is the element's auto-provision target
    pub auto_provision: bool,

    /// When the element reported the installation
    pub installed_at: Option<DateTime<Utc>>,
}

impl ElementImageBinding {
    pub fn is_active(&self) -> bool {
        self.installation_state == InstallationState::Active
    }

    /// A pure designation stub: not installed, only marked for
    /// auto-provisioning
    pub fn is_designation_stub(&self) -> bool {
        self.auto_provision && self.installation_state == InstallationState::Pull
    }
}

/// A release record grouping images
///
/// Release management itself lives at the boundary; the engine consults
/// these records only as a deletion guard for images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub release_id: ReleaseId,
    pub name: String,
    pub images: BTreeSet<ImageId>,
}
