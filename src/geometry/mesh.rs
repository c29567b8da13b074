// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh returned by the kernel's meshing call

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Mesh face as zero-based vertex indices.
///
/// The kernel produces triangles and quads; any other arity is malformed and
/// rejected by the exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self::new(vec![a, b, c])
    }

    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new(vec![a, b, c, d])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Triangle/quad mesh with optional per-vertex normals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    #[serde(default)]
    pub normals: Vec<Vector3<f64>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    pub fn add_normal(&mut self, normal: Vector3<f64>) {
        self.normals.push(normal);
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh is usable when it has geometry and every face index is in range
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.faces.is_empty()
            && self
                .faces
                .iter()
                .all(|f| !f.is_empty() && f.indices.iter().all(|&i| i < self.vertices.len()))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter())
    }

    /// Six-quad mesh of an axis-aligned box with one outward normal per vertex
    pub fn from_box(bounds: &BoundingBox) -> Self {
        let corners = bounds.corners();
        let sides: [([usize; 4], Vector3<f64>); 6] = [
            ([0, 3, 2, 1], -Vector3::z()),
            ([4, 5, 6, 7], Vector3::z()),
            ([0, 1, 5, 4], -Vector3::y()),
            ([3, 7, 6, 2], Vector3::y()),
            ([0, 4, 7, 3], -Vector3::x()),
            ([1, 2, 6, 5], Vector3::x()),
        ];

        let mut mesh = Mesh::new();
        for (corner_ids, normal) in sides {
            let ids = corner_ids.map(|c| {
                let index = mesh.add_vertex(corners[c]);
                mesh.add_normal(normal);
                index
            });
            mesh.add_face(Face::quad(ids[0], ids[1], ids[2], ids[3]));
        }
        mesh
    }
}
