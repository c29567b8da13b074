// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Primitive solid descriptions sent to the kernel

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Geometric primitives the kernel can turn into a Brep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Box {
        bounds: BoundingBox,
    },
    Sphere {
        center: Point3<f64>,
        radius: f64,
    },
    Cylinder {
        /// Centre of the base circle
        base: Point3<f64>,
        /// Unit axis direction from the base circle towards the top
        axis: Vector3<f64>,
        radius: f64,
        height: f64,
        capped: bool,
    },
}

impl Primitive {
    pub fn cuboid(bounds: BoundingBox) -> Self {
        Self::Box { bounds }
    }

    /// Box spanning the origin to `(length, width, height)`
    pub fn origin_box(length: f64, width: f64, height: f64) -> Self {
        Self::cuboid(BoundingBox::new(
            Point3::origin(),
            Point3::new(length, width, height),
        ))
    }

    pub fn sphere(center: Point3<f64>, radius: f64) -> Self {
        Self::Sphere { center, radius }
    }

    /// Capped cylinder standing on `base` along +Z
    pub fn upright_cylinder(base: Point3<f64>, radius: f64, height: f64) -> Self {
        Self::Cylinder {
            base,
            axis: Vector3::z(),
            radius,
            height,
            capped: true,
        }
    }

    /// Capped cylinder whose axis runs from `start` to `end`.
    ///
    /// Coincident endpoints produce a zero-height cylinder along +Z, which the
    /// kernel reports as invalid.
    pub fn cylinder_between(start: Point3<f64>, end: Point3<f64>, radius: f64) -> Self {
        let span = end - start;
        let height = span.norm();
        let axis = span
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::z);
        Self::Cylinder {
            base: start,
            axis,
            radius,
            height,
            capped: true,
        }
    }

    /// Conservative axis-aligned bounds of the primitive
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Self::Box { bounds } => *bounds,
            Self::Sphere { center, radius } => {
                let r = Vector3::repeat(*radius);
                BoundingBox::new(center - r, center + r)
            }
            Self::Cylinder {
                base,
                axis,
                radius,
                height,
                ..
            } => {
                let top = base + axis * *height;
                let mut bbox = BoundingBox::from_points([base, &top]);
                let r = Vector3::repeat(*radius);
                bbox.min -= r;
                bbox.max += r;
                bbox
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Cylinder { .. } => "cylinder",
        }
    }
}
