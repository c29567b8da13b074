// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flexure regions

use crate::geometry::BoundingBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Caller-supplied axis-aligned sub-volume.
///
/// Both x bounds are required. Missing y and z bounds take the extent of the
/// solid the region is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexureRegion {
    #[serde(default)]
    pub x_min: Option<f64>,
    #[serde(default)]
    pub x_max: Option<f64>,
    #[serde(default)]
    pub y_min: Option<f64>,
    #[serde(default)]
    pub y_max: Option<f64>,
    #[serde(default)]
    pub z_min: Option<f64>,
    #[serde(default)]
    pub z_max: Option<f64>,
}

impl FlexureRegion {
    /// Region spanning `x_min..x_max` and the full y/z extent
    pub fn x_band(x_min: f64, x_max: f64) -> Self {
        Self {
            x_min: Some(x_min),
            x_max: Some(x_max),
            ..Default::default()
        }
    }

    /// Box for this region inside `base`, or `None` when an x bound is missing
    pub fn resolve(&self, base: &BoundingBox) -> Option<BoundingBox> {
        let (x_min, x_max) = (self.x_min?, self.x_max?);
        Some(BoundingBox::new(
            Point3::new(
                x_min,
                self.y_min.unwrap_or(base.min.y),
                self.z_min.unwrap_or(base.min.z),
            ),
            Point3::new(
                x_max,
                self.y_max.unwrap_or(base.max.y),
                self.z_max.unwrap_or(base.max.z),
            ),
        ))
    }
}
