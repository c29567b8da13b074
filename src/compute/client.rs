// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry kernel boundary

use super::codec::{self, GeometryObject};
use super::Result;
use crate::geometry::{Mesh, Primitive, Solid};
use nalgebra::Matrix4;

/// Operations the orchestration layer needs from a solid-modeling kernel.
///
/// Every call is a blocking round trip. Implementations never retry; a failed
/// call is reported once and the caller decides whether to skip or abort.
pub trait GeometryClient {
    /// Build a Brep from a primitive description
    fn build_primitive(&self, primitive: &Primitive) -> Result<Solid>;

    /// Split `solid` by `cutter`, returning the fragments
    fn split(&self, solid: &Solid, cutter: &Solid, tolerance: f64) -> Result<Vec<Solid>>;

    /// Join several solids; the kernel may return more than one piece
    fn join_breps(&self, solids: &[Solid], tolerance: f64) -> Result<Vec<Solid>>;

    /// Mesh a Brep; the kernel returns one mesh per face group
    fn mesh_from_brep(&self, solid: &Solid) -> Result<Vec<Mesh>>;

    /// Apply an affine transform and return the moved solid
    fn transform(&self, solid: &Solid, matrix: &Matrix4<f64>) -> Result<Solid>;

    fn encode(&self, object: &GeometryObject) -> Result<String> {
        codec::encode(object)
    }

    fn decode(&self, encoded: &str) -> Result<GeometryObject> {
        codec::decode(encoded)
    }
}

impl<C: GeometryClient + ?Sized> GeometryClient for &C {
    fn build_primitive(&self, primitive: &Primitive) -> Result<Solid> {
        (**self).build_primitive(primitive)
    }

    fn split(&self, solid: &Solid, cutter: &Solid, tolerance: f64) -> Result<Vec<Solid>> {
        (**self).split(solid, cutter, tolerance)
    }

    fn join_breps(&self, solids: &[Solid], tolerance: f64) -> Result<Vec<Solid>> {
        (**self).join_breps(solids, tolerance)
    }

    fn mesh_from_brep(&self, solid: &Solid) -> Result<Vec<Mesh>> {
        (**self).mesh_from_brep(solid)
    }

    fn transform(&self, solid: &Solid, matrix: &Matrix4<f64>) -> Result<Solid> {
        (**self).transform(solid, matrix)
    }

    fn encode(&self, object: &GeometryObject) -> Result<String> {
        (**self).encode(object)
    }

    fn decode(&self, encoded: &str) -> Result<GeometryObject> {
        (**self).decode(encoded)
    }
}

impl<C: GeometryClient + ?Sized> GeometryClient for Box<C> {
    fn build_primitive(&self, primitive: &Primitive) -> Result<Solid> {
        (**self).build_primitive(primitive)
    }

    fn split(&self, solid: &Solid, cutter: &Solid, tolerance: f64) -> Result<Vec<Solid>> {
        (**self).split(solid, cutter, tolerance)
    }

    fn join_breps(&self, solids: &[Solid], tolerance: f64) -> Result<Vec<Solid>> {
        (**self).join_breps(solids, tolerance)
    }

    fn mesh_from_brep(&self, solid: &Solid) -> Result<Vec<Mesh>> {
        (**self).mesh_from_brep(solid)
    }

    fn transform(&self, solid: &Solid, matrix: &Matrix4<f64>) -> Result<Solid> {
        (**self).transform(solid, matrix)
    }

    fn encode(&self, object: &GeometryObject) -> Result<String> {
        (**self).encode(object)
    }

    fn decode(&self, encoded: &str) -> Result<GeometryObject> {
        (**self).decode(encoded)
    }
}
