// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Kernel and transport errors

use thiserror::Error;

/// Failure of a call to the geometry kernel
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("Compute server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Kernel returned no result for {0}")]
    EmptyResult(&'static str),

    #[error("Invalid encoded geometry: {0}")]
    Codec(String),
}

impl ComputeError {
    /// True for errors caused by the caller's payload rather than the kernel
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Codec(_) => true,
            Self::Server { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

/// Result type alias for kernel calls
pub type Result<T> = std::result::Result<T, ComputeError>;
