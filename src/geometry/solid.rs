// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Opaque Brep handle

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// rhino3dm `CommonObject` JSON envelope.
///
/// `data` is a base64 opennurbs archive. It is never decoded here; the
/// envelope goes back to the kernel exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub version: u32,
    pub archive3dm: u32,
    pub opennurbs: i64,
    pub data: String,
}

impl Archive {
    /// Envelope around `data` with the version stamps rhino3dm 8 writes
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            version: 10000,
            archive3dm: 80,
            opennurbs: 0,
            data: data.into(),
        }
    }
}

/// Boundary-representation solid owned by the remote kernel.
///
/// `bounds` and `valid` are filled in by the client when the solid arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub archive: Archive,
    pub bounds: BoundingBox,
    pub valid: bool,
}

impl Solid {
    pub fn new(data: impl Into<String>, bounds: BoundingBox, valid: bool) -> Self {
        Self::from_archive(Archive::new(data), bounds, valid)
    }

    pub fn from_archive(archive: Archive, bounds: BoundingBox, valid: bool) -> Self {
        Self {
            archive,
            bounds,
            valid,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Valid as reported by the kernel and with usable bounds
    pub fn is_valid(&self) -> bool {
        self.valid && self.bounds.is_valid()
    }
}
