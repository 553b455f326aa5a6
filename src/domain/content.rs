// Copyright (c) 2025 - Cowboy AI, Inc.
//! Content-Addressed Payload Records
//!
//! Configuration payloads are stored once per distinct byte sequence and
//! referenced by hash from any number of revisions. The hash is the
//! SHA-256 digest of the payload, rendered as lowercase hex.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Content hash of a stored payload (SHA-256, lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Compute the hash of a payload
    pub fn of(payload: &[u8]) -> Self {
        let digest = Sha256::digest(payload);
        Self(hex::encode(digest))
    }

    /// View as string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deduplicated payload record
///
/// Immutable once created. Many revisions may reference one record; the
/// engine never deletes records (garbage collection of unreferenced
/// content is an external concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Hash of `payload`, unique per record
    pub hash: ContentHash,

    /// Media type of the payload (e.g. `application/json`)
    pub content_type: String,

    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl ContentRecord {
    /// Create a record from a payload, computing its hash
    pub fn new(payload: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            hash: ContentHash::of(&payload),
            content_type: content_type.into(),
            payload,
        }
    }
}

/// Checksum algorithms reported alongside image binaries
///
/// These checksums describe the image file itself (for download
/// verification); they are carried as metadata and are distinct from the
/// config content hash above.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChecksumAlgorithm::Md5 => "MD5",
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
        };
        f.write_str(name)
    }
}
