// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Request-level errors

use crate::compute::ComputeError;
use crate::io::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unsupported mesh type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to create a mesh from the Brep")]
    NoMesh,

    #[error("Kernel error: {0}")]
    Compute(#[from] ComputeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl ServiceError {
    /// Caller mistakes; everything else is a server-side failure
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::UnsupportedType(_) | Self::UnsupportedFormat(_) | Self::InvalidInput(_) => true,
            Self::Compute(e) => e.is_client_error(),
            Self::Export(e) => e.is_client_error(),
            Self::NoMesh => false,
        }
    }

    /// HTTP-style status for the error class
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}
