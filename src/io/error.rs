// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported face type at face {face}: faces must be triangles or quads, got {len} vertices")]
    UnsupportedFace { face: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move temporary file into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Scene archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Scene manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Failed to encode scene object: {0}")]
    Encode(String),

    #[error("Not a scene file: {0}")]
    InvalidScene(String),
}

impl ExportError {
    /// Malformed input data, as opposed to a filesystem failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedFace { .. })
    }
}
