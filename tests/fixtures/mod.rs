// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for inventory-lifecycle
//!
//! Deterministic test data for the manager integration suites. All
//! UUIDs and timestamps are fixed constants so tests are reproducible;
//! fixtures are the only place that constructs records directly.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use inventory_lifecycle::domain::{
    ChipsetName, ConfigName, ElementId, ImageId, ImageName, ImageRecord, ImageState, ImageType,
    ImageVersion, ReleaseId, ReleaseRecord, RoleName, UserName,
};
use inventory_lifecycle::OperationContext;

/// Initialize test logging; `RUST_LOG` controls verbosity
///
/// Safe to call from every test; only the first call wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Fixed test UUIDs (UUID v7 format, but deterministic for testing)
pub const ELEMENT_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";
pub const ELEMENT_ID_2: &str = "01934f4a-1000-7000-8000-000000002000";

pub const IMAGE_ID_1: &str = "01934f4a-2000-7000-8000-000000000001";
pub const IMAGE_ID_2: &str = "01934f4a-2000-7000-8000-000000000002";
pub const IMAGE_ID_3: &str = "01934f4a-2000-7000-8000-000000000003";
pub const IMAGE_ID_4: &str = "01934f4a-2000-7000-8000-000000000004";

pub fn element_1() -> ElementId {
    ElementId::from_uuid(Uuid::parse_str(ELEMENT_ID_1).unwrap())
}

pub fn element_2() -> ElementId {
    ElementId::from_uuid(Uuid::parse_str(ELEMENT_ID_2).unwrap())
}

pub fn image_id(raw: &str) -> ImageId {
    ImageId::from_uuid(Uuid::parse_str(raw).unwrap())
}

pub fn test_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-19T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn later_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-19T13:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Context of the operator driving a test request
pub fn operator_context() -> OperationContext {
    OperationContext::new(UserName::new("operator").unwrap(), test_timestamp())
}

/// Context of a device confirming state, one hour later
pub fn device_context() -> OperationContext {
    OperationContext::new(UserName::new("device-agent").unwrap(), later_timestamp())
}

/// Operator context at a given hour offset from the base timestamp
///
/// Ordering-sensitive tests give every mutation its own timestamp.
pub fn offset_context(hours: i64) -> OperationContext {
    OperationContext::new(
        UserName::new("operator").unwrap(),
        test_timestamp() + chrono::Duration::hours(hours),
    )
}

pub fn config_name(name: &str) -> ConfigName {
    ConfigName::new(name).unwrap()
}

pub fn version(s: &str) -> ImageVersion {
    s.parse().unwrap()
}

/// A role-wide image with the given roles and version
pub fn role_wide_image(id: &str, roles: &[&str], version_str: &str) -> ImageRecord {
    ImageRecord {
        image_id: image_id(id),
        image_type: ImageType::new("lxc").unwrap(),
        name: ImageName::new("leaf-os").unwrap(),
        chipset: ChipsetName::new("qmx").unwrap(),
        roles: roles.iter().map(|r| RoleName::new(*r).unwrap()).collect(),
        owner: None,
        version: version(version_str),
        state: ImageState::Candidate,
        checksums: BTreeMap::new(),
        build_id: Some("build-7".to_string()),
        build_date: Some(test_timestamp()),
        packages: Vec::new(),
        applications: Vec::new(),
        extension: Some("tar.gz".to_string()),
        category: None,
        organization: Some("example.net".to_string()),
        description: None,
    }
}

/// An image privately owned by an element
pub fn element_private_image(id: &str, owner: ElementId, version_str: &str) -> ImageRecord {
    ImageRecord {
        owner: Some(owner),
        roles: BTreeSet::new(),
        ..role_wide_image(id, &[], version_str)
    }
}

/// A release record referencing the given images
pub fn release_record(images: &[ImageId]) -> ReleaseRecord {
    ReleaseRecord {
        release_id: ReleaseId::random(),
        name: "spring-release".to_string(),
        images: images.iter().copied().collect(),
    }
}
