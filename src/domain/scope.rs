// Copyright (c) 2025 - Cowboy AI, Inc.
//! Promotion Scope Matching
//!
//! Releasing an image supersedes older versions and restores newer
//! candidates *within the image's scope*. The scope predicate is an
//! explicit, parameterized value - every state transition runs the same
//! matching rules instead of assembling its own query text.
//!
//! # Scope Rules
//!
//! - Element-private images (owner set) match only images owned by the
//!   same element, with the same chipset and artifact type.
//! - Role-wide images (no owner) match only other role-wide images with
//!   the same chipset and artifact type whose role sets intersect.
//! - Revoked images never match, in either direction.
//! - Element-private and role-wide images over the same chipset/type are
//!   independent scopes; no cross-scope precedence exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::artifacts::ImageRecord;
use super::identifiers::{ChipsetName, ElementId, ImageType, RoleName};
use super::version::ImageVersion;

/// The scope an image competes in for promotion and rollback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionScope {
    /// Platform chipset
    pub chipset: ChipsetName,

    /// Artifact type
    pub image_type: ImageType,

    /// Owning element for element-private scopes
    pub owner: Option<ElementId>,

    /// Role set; relevant for role-wide scopes only
    pub roles: BTreeSet<RoleName>,
}

impl PromotionScope {
    /// Derive the scope an image belongs to
    pub fn of(image: &ImageRecord) -> Self {
        Self {
            chipset: image.chipset.clone(),
            image_type: image.image_type.clone(),
            owner: image.owner,
            roles: image.roles.clone(),
        }
    }

    /// Whether `candidate` lies in this scope
    ///
    /// Revoked images are excluded here because every caller excludes
    /// them; the scope is only ever consulted for promotion, rollback
    /// and upgrade matching.
    pub fn matches(&self, candidate: &ImageRecord) -> bool {
        if candidate.is_revoked() {
            return false;
        }
        if candidate.chipset != self.chipset || candidate.image_type != self.image_type {
            return false;
        }
        match self.owner {
            // Element-private scope: same element, nothing else.
            Some(owner) => candidate.owner == Some(owner),
            // Role-wide scope: role-wide images with intersecting roles.
            None => {
                candidate.owner.is_none()
                    && self.roles.iter().any(|role| candidate.roles.contains(role))
            }
        }
    }
}

/// Version comparison direction for a scope query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionBound {
    /// Versions strictly less than the pivot
    StrictlyOlder,

    /// Versions strictly greater than the pivot
    StrictlyNewer,
}

/// A typed query over images: scope membership plus an optional version
/// bound relative to a pivot version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageScopeQuery {
    pub scope: PromotionScope,
    pub version: Option<(VersionBound, ImageVersion)>,
}

impl ImageScopeQuery {
    /// All images in a scope
    pub fn in_scope(scope: PromotionScope) -> Self {
        Self {
            scope,
            version: None,
        }
    }

    /// Restrict to versions strictly below `pivot`
    pub fn strictly_older(mut self, pivot: ImageVersion) -> Self {
        self.version = Some((VersionBound::StrictlyOlder, pivot));
        self
    }

    /// Restrict to versions strictly above `pivot`
    pub fn strictly_newer(mut self, pivot: ImageVersion) -> Self {
        self.version = Some((VersionBound::StrictlyNewer, pivot));
        self
    }

    /// Whether `candidate` satisfies scope and version bound
    pub fn matches(&self, candidate: &ImageRecord) -> bool {
        if !self.scope.matches(candidate) {
            return false;
        }
        match &self.version {
            None => true,
            Some((VersionBound::StrictlyOlder, pivot)) => candidate.version < *pivot,
            Some((VersionBound::StrictlyNewer, pivot)) => candidate.version > *pivot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifacts::ImageState;
    use crate::domain::identifiers::{ImageId, ImageName};
    use std::collections::BTreeMap;

    fn role_wide_image(roles: &[&str], version: &str, state: ImageState) -> ImageRecord {
        ImageRecord {
            image_id: ImageId::random(),
            image_type: ImageType::new("lxc").unwrap(),
            name: ImageName::new("leaf-os").unwrap(),
            chipset: ChipsetName::new("qmx").unwrap(),
            roles: roles
                .iter()
                .map(|r| RoleName::new(*r).unwrap())
                .collect(),
            owner: None,
            version: version.parse().unwrap(),
            state,
            checksums: BTreeMap::new(),
            build_id: None,
            build_date: None,
            packages: Vec::new(),
            applications: Vec::new(),
            extension: None,
            category: None,
            organization: None,
            description: None,
        }
    }

    #[test]
    fn test_role_wide_scope_requires_role_intersection() {
        let target = role_wide_image(&["leaf", "spine"], "1.0.0", ImageState::Candidate);
        let scope = PromotionScope::of(&target);

        let leaf_only = role_wide_image(&["leaf"], "0.9.0", ImageState::Release);
        let border = role_wide_image(&["border"], "0.9.0", ImageState::Release);

        assert!(scope.matches(&leaf_only));
        assert!(!scope.matches(&border));
    }

    #[test]
    fn test_revoked_images_never_match() {
        let target = role_wide_image(&["leaf"], "1.0.0", ImageState::Candidate);
        let scope = PromotionScope::of(&target);
        let revoked = role_wide_image(&["leaf"], "0.9.0", ImageState::Revoked);
        assert!(!scope.matches(&revoked));
    }

    #[test]
    fn test_element_private_scope_ignores_roles() {
        let element = ElementId::random();
        let mut target = role_wide_image(&[], "1.0.0", ImageState::Candidate);
        target.owner = Some(element);
        let scope = PromotionScope::of(&target);

        let mut same_element = role_wide_image(&[], "0.9.0", ImageState::Release);
        same_element.owner = Some(element);
        assert!(scope.matches(&same_element));

        // Role-wide image over the same chipset/type is a different scope.
        let role_wide = role_wide_image(&["leaf"], "0.9.0", ImageState::Release);
        assert!(!scope.matches(&role_wide));
    }

    #[test]
    fn test_version_bounds_are_strict() {
        let target = role_wide_image(&["leaf"], "1.1.0", ImageState::Candidate);
        let older = role_wide_image(&["leaf"], "1.0.0", ImageState::Release);
        let equal = role_wide_image(&["leaf"], "1.1.0", ImageState::Superseded);
        let newer = role_wide_image(&["leaf"], "1.2.0", ImageState::Superseded);

        let below = ImageScopeQuery::in_scope(PromotionScope::of(&target))
            .strictly_older(target.version.clone());
        assert!(below.matches(&older));
        assert!(!below.matches(&equal));
        assert!(!below.matches(&newer));

        let above = ImageScopeQuery::in_scope(PromotionScope::of(&target))
            .strictly_newer(target.version.clone());
        assert!(!above.matches(&older));
        assert!(!above.matches(&equal));
        assert!(above.matches(&newer));
    }
}
