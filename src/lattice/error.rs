// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for lattice generation.

use thiserror::Error;

/// Errors that end a lattice build.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LatticeError {
    /// The solid to fill is not a valid Brep.
    #[error("invalid Brep provided to lattice generation")]
    InvalidSolid,

    /// The element size is zero, negative or not finite.
    #[error("element size must be positive, got {0}")]
    InvalidElementSize(f64),

    /// Not a single strut survived; there is nothing to return.
    #[error("failed to generate lattice structure: no valid strut in {attempted} grid cells")]
    NoStruts {
        /// Grid cells visited.
        attempted: usize,
    },

    /// The joined lattice came back invalid from the kernel.
    #[error("kernel produced an invalid lattice solid")]
    InvalidLattice,
}
