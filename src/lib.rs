// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Compute
//!
//! Orchestrates geometry requests against a remote CAD kernel. Solids stay on
//! the kernel side; this crate drives primitive construction, lattice flexure
//! carving and mesh export through the [`compute::GeometryClient`] boundary.

pub mod cli;
pub mod compute;
pub mod config;
pub mod geometry;
pub mod io;
pub mod lattice;
pub mod service;

pub use compute::{GeometryClient, GeometryObject, HttpComputeClient, InMemoryKernel};
pub use config::ComputeConfig;
pub use geometry::{BoundingBox, Mesh, Primitive, Solid};
pub use lattice::{apply_lattice_flexures, create_strut, generate_lattice, Density, FlexureRegion};
pub use service::{MeshArtifacts, MeshParams, MeshService, ServiceError};
