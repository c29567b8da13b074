// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Single strut construction

use crate::compute::{GeometryClient, Result};
use crate::geometry::{Primitive, Solid};
use nalgebra::Point3;

/// Radius of every lattice strut
pub const STRUT_RADIUS: f64 = 0.1;

/// Build a capped cylinder of radius [`STRUT_RADIUS`] running from `start` to `end`.
///
/// Coincident points are passed through; the kernel flags the result invalid.
pub fn create_strut<C: GeometryClient + ?Sized>(
    client: &C,
    start: Point3<f64>,
    end: Point3<f64>,
) -> Result<Solid> {
    client.build_primitive(&Primitive::cylinder_between(start, end, STRUT_RADIUS))
}
