// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Offline kernel that models every solid by its bounding box.
//!
//! Used for dry runs, where it answers how many round trips a request would
//! cost, and as the kernel in tests and benches. Splits intersect boxes, joins
//! take the hull, and meshing emits a six-quad box.

use super::client::GeometryClient;
use super::{ComputeError, Result};
use crate::geometry::{BoundingBox, Mesh, Primitive, Solid};
use nalgebra::Matrix4;
use std::cell::RefCell;

/// Failures the in-memory kernel can be told to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// Cylinders come back flagged invalid
    pub invalid_cylinders: bool,
    /// Split calls fail with a server error
    pub split_errors: bool,
    /// Join calls return an empty list
    pub empty_joins: bool,
    /// Meshing returns an empty list
    pub empty_meshes: bool,
}

/// One recorded join call
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCall {
    pub inputs: Vec<BoundingBox>,
    pub tolerance: f64,
}

/// Everything the kernel was asked to do
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    pub primitives: Vec<Primitive>,
    pub splits: Vec<(BoundingBox, BoundingBox)>,
    pub joins: Vec<JoinCall>,
    pub meshes: usize,
    pub transforms: usize,
}

impl CallLog {
    pub fn round_trips(&self) -> usize {
        self.primitives.len() + self.splits.len() + self.joins.len() + self.meshes + self.transforms
    }

    pub fn cylinders(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Cylinder { .. }))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryKernel {
    faults: Faults,
    log: RefCell<CallLog>,
}

impl InMemoryKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            log: RefCell::default(),
        }
    }

    /// Snapshot of the calls made so far
    pub fn calls(&self) -> CallLog {
        self.log.borrow().clone()
    }

    /// Number of primitive solids folded into `solid` by joins
    pub fn part_count(solid: &Solid) -> Option<usize> {
        solid.archive.data.strip_prefix("mem:")?.parse().ok()
    }

    fn solid(parts: usize, bounds: BoundingBox, valid: bool) -> Solid {
        Solid::new(format!("mem:{}", parts), bounds, valid)
    }
}

impl GeometryClient for InMemoryKernel {
    fn build_primitive(&self, primitive: &Primitive) -> Result<Solid> {
        self.log.borrow_mut().primitives.push(primitive.clone());

        let valid = match primitive {
            Primitive::Box { bounds } => bounds.is_valid() && bounds.volume() > 0.0,
            Primitive::Sphere { radius, .. } => *radius > 0.0,
            Primitive::Cylinder { radius, height, .. } => {
                !self.faults.invalid_cylinders && *radius > 0.0 && *height > 0.0
            }
        };
        Ok(Self::solid(1, primitive.bounds(), valid))
    }

    fn split(&self, solid: &Solid, cutter: &Solid, _tolerance: f64) -> Result<Vec<Solid>> {
        self.log.borrow_mut().splits.push((solid.bounds, cutter.bounds));

        if self.faults.split_errors {
            return Err(ComputeError::Server {
                status: 500,
                body: "split failed".into(),
            });
        }

        let parts = Self::part_count(solid).unwrap_or(1);
        match solid.bounds.intersection(&cutter.bounds) {
            Some(inside) if inside == solid.bounds => Ok(vec![solid.clone()]),
            Some(inside) => Ok(vec![
                Self::solid(parts, inside, solid.valid),
                Self::solid(parts, solid.bounds, solid.valid),
            ]),
            None => Ok(Vec::new()),
        }
    }

    fn join_breps(&self, solids: &[Solid], tolerance: f64) -> Result<Vec<Solid>> {
        self.log.borrow_mut().joins.push(JoinCall {
            inputs: solids.iter().map(|s| s.bounds).collect(),
            tolerance,
        });

        if self.faults.empty_joins || solids.is_empty() {
            return Ok(Vec::new());
        }

        let bounds = solids
            .iter()
            .fold(BoundingBox::empty(), |acc, s| acc.union(&s.bounds));
        let parts = solids
            .iter()
            .map(|s| Self::part_count(s).unwrap_or(1))
            .sum();
        let valid = solids.iter().all(|s| s.valid);
        Ok(vec![Self::solid(parts, bounds, valid)])
    }

    fn mesh_from_brep(&self, solid: &Solid) -> Result<Vec<Mesh>> {
        self.log.borrow_mut().meshes += 1;

        if self.faults.empty_meshes || !solid.is_valid() {
            return Ok(Vec::new());
        }
        Ok(vec![Mesh::from_box(&solid.bounds)])
    }

    fn transform(&self, solid: &Solid, matrix: &Matrix4<f64>) -> Result<Solid> {
        self.log.borrow_mut().transforms += 1;

        let mut moved = solid.clone();
        moved.bounds = solid.bounds.transformed(matrix);
        Ok(moved)
    }
}
