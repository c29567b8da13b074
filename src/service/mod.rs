// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Service module - request handling on top of the kernel client

mod error;
mod mesh_service;
mod params;

pub use error::ServiceError;
pub use mesh_service::{primitive_for, MeshService};
pub use params::{
    BrepToMeshParams, Center, ConvertResponse, ExportParams, ExportResponse, MeshArtifacts,
    MeshParams, SphereParams, SphereResponse, TransformParams, TransformResponse,
};
