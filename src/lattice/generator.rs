// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Strut lattice generation.
//!
//! The bounding box of a solid is walked as a regular grid with step
//! `element_size`. Every cell gets one space-diagonal strut from `(x, y, z)` to
//! `(x + s, y + s, z + s)`. Struts are folded into a single solid one join at a
//! time, so the cost is one kernel round trip per cell.

use super::error::LatticeError;
use super::strut::create_strut;
use crate::compute::GeometryClient;
use crate::geometry::{BoundingBox, Solid};
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

/// Tolerance passed to every join
pub const JOIN_TOLERANCE: f64 = 0.01;

/// What happened to one strut offered to the accumulator
#[derive(Debug, Clone, PartialEq)]
pub enum StrutFold {
    /// First valid strut; it became the accumulator
    Seeded,
    /// Joined into the accumulator
    Joined,
    /// Join failed; the accumulator is unchanged and the strut is dropped
    Dropped(String),
}

/// Grid coordinates `min + i * step` strictly below `max`
fn axis_steps(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> + Clone {
    (0u32..)
        .map(move |i| min + f64::from(i) * step)
        .take_while(move |&v| v < max)
}

/// Lower corners of every grid cell, x outermost and z innermost
pub fn grid_cells(bounds: &BoundingBox, step: f64) -> impl Iterator<Item = Point3<f64>> {
    let ys = axis_steps(bounds.min.y, bounds.max.y, step);
    let zs = axis_steps(bounds.min.z, bounds.max.z, step);
    axis_steps(bounds.min.x, bounds.max.x, step).flat_map(move |x| {
        let zs = zs.clone();
        ys.clone()
            .flat_map(move |y| zs.clone().map(move |z| Point3::new(x, y, z)))
    })
}

/// Cells per axis for a grid over `bounds`.
///
/// The product is the number of struts, and of join round trips, a lattice
/// over these bounds costs.
pub fn grid_cell_count(bounds: &BoundingBox, step: f64) -> [usize; 3] {
    [
        axis_count(bounds.min.x, bounds.max.x, step),
        axis_count(bounds.min.y, bounds.max.y, step),
        axis_count(bounds.min.z, bounds.max.z, step),
    ]
}

/// Length of `axis_steps(min, max, step)` without walking it
fn axis_count(min: f64, max: f64, step: f64) -> usize {
    if !(min < max && min.is_finite() && max.is_finite() && step > 0.0 && step.is_finite()) {
        return 0;
    }

    let at = |i: usize| min + i as f64 * step;
    let mut n = ((max - min) / step).ceil().min(usize::MAX as f64) as usize;
    while n > 0 && at(n - 1) >= max {
        n -= 1;
    }
    while at(n) < max {
        n += 1;
    }
    n
}

/// Offer one strut to the accumulator.
///
/// An empty accumulator is seeded with the strut. Otherwise the pair is
/// joined and the first result replaces the accumulator; a failed or empty
/// join keeps the previous accumulator.
pub fn fold_strut<C: GeometryClient + ?Sized>(
    client: &C,
    accumulator: Option<Solid>,
    strut: Solid,
) -> (Option<Solid>, StrutFold) {
    let Some(current) = accumulator else {
        return (Some(strut), StrutFold::Seeded);
    };

    let pair = [current, strut];
    let joined = client.join_breps(&pair, JOIN_TOLERANCE);
    let [current, _] = pair;

    match joined.map(|solids| solids.into_iter().next()) {
        Ok(Some(next)) => (Some(next), StrutFold::Joined),
        Ok(None) => (
            Some(current),
            StrutFold::Dropped("join returned no result".to_string()),
        ),
        Err(e) => (Some(current), StrutFold::Dropped(e.to_string())),
    }
}

#[derive(Debug, Default)]
struct FoldCounts {
    cells: usize,
    invalid: usize,
    joined: usize,
    dropped: usize,
}

/// Fill the bounding box of `solid` with a space-diagonal strut lattice.
///
/// Invalid struts and failed joins are logged and skipped. Fails only when
/// the input is unusable or no strut at all could be built.
pub fn generate_lattice<C: GeometryClient + ?Sized>(
    client: &C,
    solid: &Solid,
    element_size: f64,
) -> Result<Solid, LatticeError> {
    if !solid.is_valid() {
        return Err(LatticeError::InvalidSolid);
    }
    if !(element_size.is_finite() && element_size > 0.0) {
        return Err(LatticeError::InvalidElementSize(element_size));
    }

    let bounds = solid.bounding_box();
    let diagonal = Vector3::repeat(element_size);
    debug!(
        cells = ?grid_cell_count(&bounds, element_size),
        element_size,
        "generating lattice"
    );

    let mut counts = FoldCounts::default();
    let lattice = grid_cells(&bounds, element_size).fold(None, |accumulator, start| {
        counts.cells += 1;
        let end = start + diagonal;

        let strut = match create_strut(client, start, end) {
            Ok(strut) if strut.is_valid() => strut,
            Ok(_) => {
                counts.invalid += 1;
                warn!(?start, ?end, "skipping invalid strut");
                return accumulator;
            }
            Err(e) => {
                counts.invalid += 1;
                warn!(?start, ?end, error = %e, "strut construction failed");
                return accumulator;
            }
        };

        let (next, step) = fold_strut(client, accumulator, strut);
        match step {
            StrutFold::Seeded => {}
            StrutFold::Joined => counts.joined += 1,
            StrutFold::Dropped(reason) => {
                counts.dropped += 1;
                warn!(?start, %reason, "failed to join strut");
            }
        }
        next
    });

    info!(
        cells = counts.cells,
        joined = counts.joined,
        invalid = counts.invalid,
        dropped = counts.dropped,
        "lattice generated"
    );

    lattice.ok_or(LatticeError::NoStruts {
        attempted: counts.cells,
    })
}
