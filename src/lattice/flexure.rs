// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lattice flexures carved into regions of a base solid

use super::density::element_size_for;
use super::error::LatticeError;
use super::generator::{generate_lattice, grid_cell_count, JOIN_TOLERANCE};
use super::region::FlexureRegion;
use crate::compute::GeometryClient;
use crate::geometry::{BoundingBox, Primitive, Solid};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Tolerance used when splitting the base solid by a region box
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Default cap on struts per region
pub const DEFAULT_MAX_STRUTS: usize = 10_000;

/// Which split fragment receives the lattice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentPolicy {
    /// Always the first fragment the kernel returns
    #[default]
    First,
    /// The first fragment whose bounding-box centre lies in the region box,
    /// falling back to the first fragment
    ContainedInRegion,
}

/// Knobs for [`apply_lattice_flexures`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexureSettings {
    pub fragment_policy: FragmentPolicy,
    /// Regions whose grid holds more cells than this are skipped before any
    /// strut is built. Each strut costs a build and a join round trip.
    pub max_struts: usize,
}

impl Default for FlexureSettings {
    fn default() -> Self {
        Self {
            fragment_policy: FragmentPolicy::default(),
            max_struts: DEFAULT_MAX_STRUTS,
        }
    }
}

impl FlexureSettings {
    pub fn with_fragment_policy(mut self, policy: FragmentPolicy) -> Self {
        self.fragment_policy = policy;
        self
    }

    pub fn with_max_struts(mut self, max_struts: usize) -> Self {
        self.max_struts = max_struts;
        self
    }
}

/// Why a region left the base solid untouched
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegionSkip {
    #[error("region is missing x_min or x_max")]
    InvalidRegion,

    #[error("split failed: {0}")]
    SplitFailed(String),

    #[error("region needs {struts} struts, limit is {limit}")]
    TooManyStruts { struts: usize, limit: usize },

    #[error("lattice failed: {0}")]
    LatticeFailed(#[from] LatticeError),

    #[error("join failed: {0}")]
    JoinFailed(String),
}

/// Per-region result recorded in a [`FlexureReport`]
#[derive(Debug, Clone, PartialEq)]
pub enum RegionStatus {
    Applied,
    Skipped(RegionSkip),
}

/// Final solid plus what happened to each region, in input order
#[derive(Debug, Clone)]
pub struct FlexureReport {
    pub solid: Solid,
    pub regions: Vec<RegionStatus>,
}

impl FlexureReport {
    pub fn applied(&self) -> usize {
        self.regions
            .iter()
            .filter(|s| matches!(s, RegionStatus::Applied))
            .count()
    }
}

/// Pick the fragment to fill from a split result
pub fn select_fragment(
    fragments: Vec<Solid>,
    region_box: &BoundingBox,
    policy: FragmentPolicy,
) -> Option<Solid> {
    match policy {
        FragmentPolicy::First => fragments.into_iter().next(),
        FragmentPolicy::ContainedInRegion => {
            let inside = fragments
                .iter()
                .position(|f| region_box.contains(&f.bounds.center()))
                .unwrap_or(0);
            fragments.into_iter().nth(inside)
        }
    }
}

/// Cells in the lattice grid over `bounds`, saturating on overflow
fn strut_count(bounds: &BoundingBox, element_size: f64) -> usize {
    grid_cell_count(bounds, element_size)
        .into_iter()
        .fold(1usize, usize::saturating_mul)
}

/// Carve one region: split, fill with a lattice, join back into `base`.
///
/// Returns the new base solid. Any failure leaves `base` as it was.
pub fn process_region<C: GeometryClient + ?Sized>(
    client: &C,
    base: &Solid,
    region: &FlexureRegion,
    element_size: f64,
    settings: FlexureSettings,
) -> Result<Solid, RegionSkip> {
    let region_box = region
        .resolve(&base.bounding_box())
        .ok_or(RegionSkip::InvalidRegion)?;

    let cutter = client
        .build_primitive(&Primitive::cuboid(region_box))
        .map_err(|e| RegionSkip::SplitFailed(format!("region box: {}", e)))?;

    let fragments = client
        .split(base, &cutter, SPLIT_TOLERANCE)
        .map_err(|e| RegionSkip::SplitFailed(e.to_string()))?;
    let region_solid = select_fragment(fragments, &region_box, settings.fragment_policy)
        .ok_or_else(|| RegionSkip::SplitFailed("split returned no fragments".to_string()))?;

    let struts = strut_count(&region_solid.bounding_box(), element_size);
    if struts > settings.max_struts {
        return Err(RegionSkip::TooManyStruts {
            struts,
            limit: settings.max_struts,
        });
    }

    let lattice = generate_lattice(client, &region_solid, element_size)?;
    if !lattice.is_valid() {
        return Err(LatticeError::InvalidLattice.into());
    }

    let joined = client
        .join_breps(&[base.clone(), lattice], JOIN_TOLERANCE)
        .map_err(|e| RegionSkip::JoinFailed(e.to_string()))?;
    match joined.into_iter().next() {
        Some(solid) if solid.is_valid() => Ok(solid),
        Some(_) => Err(RegionSkip::JoinFailed(
            "join returned an invalid solid".to_string(),
        )),
        None => Err(RegionSkip::JoinFailed(
            "join returned no result".to_string(),
        )),
    }
}

/// Apply lattice flexures to each region in order.
///
/// Each region sees the solid produced by the regions before it, so y/z
/// defaults come from the evolving solid rather than the input. Skipped
/// regions are logged and do not stop the remaining ones.
pub fn apply_lattice_flexures<C: GeometryClient + ?Sized>(
    client: &C,
    base: Solid,
    regions: &[FlexureRegion],
    density: &str,
    settings: FlexureSettings,
) -> FlexureReport {
    let element_size = element_size_for(density);
    info!(
        regions = regions.len(),
        density,
        element_size,
        "generating lattice flexures"
    );

    let (solid, statuses) = regions.iter().enumerate().fold(
        (base, Vec::with_capacity(regions.len())),
        |(current, mut statuses), (index, region)| {
            match process_region(client, &current, region, element_size, settings) {
                Ok(next) => {
                    statuses.push(RegionStatus::Applied);
                    (next, statuses)
                }
                Err(skip) => {
                    warn!(index, ?region, reason = %skip, "skipping flexure region");
                    statuses.push(RegionStatus::Skipped(skip));
                    (current, statuses)
                }
            }
        },
    );

    let report = FlexureReport {
        solid,
        regions: statuses,
    };
    info!(applied = report.applied(), "generated lattice flexures");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Faults, InMemoryKernel};
    use nalgebra::Point3;

    fn block(kernel: &InMemoryKernel, size: f64) -> Solid {
        kernel
            .build_primitive(&Primitive::origin_box(size, size, size))
            .unwrap()
    }

    #[test]
    fn test_missing_x_bound_leaves_base_unchanged() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 4.0);
        let region = FlexureRegion {
            x_max: Some(2.0),
            ..Default::default()
        };

        let report = apply_lattice_flexures(&kernel, base.clone(), &[region], "low", FlexureSettings::default());

        assert_eq!(report.solid, base);
        assert_eq!(
            report.regions,
            vec![RegionStatus::Skipped(RegionSkip::InvalidRegion)]
        );
        assert!(kernel.calls().splits.is_empty());
    }

    #[test]
    fn test_region_is_split_filled_and_joined() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 2.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(0.0, 1.0)],
            "low",
            FlexureSettings::default(),
        );

        assert_eq!(report.regions, vec![RegionStatus::Applied]);
        let calls = kernel.calls();
        assert_eq!(calls.splits.len(), 1);
        // Region fragment 0..1 x 0..2 x 0..2 at step 1.0 holds four cells
        assert_eq!(calls.cylinders().count(), 4);
        // Three strut joins plus the join into the base
        assert_eq!(calls.joins.len(), 4);
        let last = calls.joins.last().unwrap();
        assert_eq!(last.inputs[0], base.bounds);
        assert_eq!(InMemoryKernel::part_count(&report.solid), Some(5));
    }

    #[test]
    fn test_later_regions_see_updated_bounds() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 2.0);
        let regions = [
            FlexureRegion::x_band(1.0, 2.0),
            FlexureRegion::x_band(0.0, 1.0),
        ];

        let report =
            apply_lattice_flexures(&kernel, base.clone(), &regions, "low", FlexureSettings::default());
        assert_eq!(report.applied(), 2);

        // Struts overhang the block, so region 1 grows the base bounds
        let after_first = kernel.calls().joins[3].clone();
        assert_eq!(after_first.inputs[0], base.bounds);

        let splits = kernel.calls().splits;
        assert_eq!(splits.len(), 2);
        let second_cutter = splits[1].1;
        assert!(second_cutter.max.y > base.bounds.max.y);
        assert!(second_cutter.min.z < base.bounds.min.z);
        assert_eq!(second_cutter.min.x, 0.0);
        assert_eq!(second_cutter.max.x, 1.0);
    }

    #[test]
    fn test_split_error_skips_region() {
        let kernel = InMemoryKernel::with_faults(Faults {
            split_errors: true,
            ..Default::default()
        });
        let base = block(&kernel, 2.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(0.0, 1.0), FlexureRegion::x_band(1.0, 2.0)],
            "high",
            FlexureSettings::default(),
        );

        assert_eq!(report.solid, base);
        assert_eq!(report.applied(), 0);
        assert!(report
            .regions
            .iter()
            .all(|s| matches!(s, RegionStatus::Skipped(RegionSkip::SplitFailed(_)))));
    }

    #[test]
    fn test_region_outside_solid_skips() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 2.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(5.0, 6.0)],
            "medium",
            FlexureSettings::default(),
        );

        assert_eq!(report.solid, base);
        assert!(matches!(
            report.regions[0],
            RegionStatus::Skipped(RegionSkip::SplitFailed(_))
        ));
    }

    #[test]
    fn test_lattice_failure_skips_region() {
        let kernel = InMemoryKernel::with_faults(Faults {
            invalid_cylinders: true,
            ..Default::default()
        });
        let base = block(&kernel, 2.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(0.0, 1.0)],
            "low",
            FlexureSettings::default(),
        );

        assert_eq!(report.solid, base);
        assert_eq!(
            report.regions,
            vec![RegionStatus::Skipped(RegionSkip::LatticeFailed(
                LatticeError::NoStruts { attempted: 4 }
            ))]
        );
    }

    #[test]
    fn test_empty_join_skips_region() {
        let kernel = InMemoryKernel::with_faults(Faults {
            empty_joins: true,
            ..Default::default()
        });
        let base = block(&kernel, 2.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(0.0, 1.0)],
            "low",
            FlexureSettings::default(),
        );

        assert_eq!(report.solid, base);
        assert!(matches!(
            report.regions[0],
            RegionStatus::Skipped(RegionSkip::JoinFailed(_))
        ));
    }

    #[test]
    fn test_oversized_region_skipped_before_struts() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 100.0);

        let report = apply_lattice_flexures(
            &kernel,
            base.clone(),
            &[FlexureRegion::x_band(0.0, 1.0)],
            "high",
            FlexureSettings::default(),
        );

        assert_eq!(report.solid, base);
        assert_eq!(
            report.regions,
            vec![RegionStatus::Skipped(RegionSkip::TooManyStruts {
                struts: 4 * 400 * 400,
                limit: DEFAULT_MAX_STRUTS,
            })]
        );
        let calls = kernel.calls();
        assert_eq!(calls.cylinders().count(), 0);
        assert!(calls.joins.is_empty());
        // base, cutter and split
        assert_eq!(calls.round_trips(), 3);
    }

    #[test]
    fn test_strut_limit_is_inclusive() {
        let kernel = InMemoryKernel::new();
        let base = block(&kernel, 2.0);
        let region = [FlexureRegion::x_band(0.0, 1.0)];

        let at_limit = FlexureSettings::default().with_max_struts(4);
        let report = apply_lattice_flexures(&kernel, base.clone(), &region, "low", at_limit);
        assert_eq!(report.applied(), 1);

        let below = FlexureSettings::default().with_max_struts(3);
        let report = apply_lattice_flexures(&kernel, base, &region, "low", below);
        assert!(matches!(
            report.regions[0],
            RegionStatus::Skipped(RegionSkip::TooManyStruts { struts: 4, limit: 3 })
        ));
    }

    #[test]
    fn test_fragment_policies() {
        let outside = Solid::new(
            "outside",
            BoundingBox::new(Point3::new(2.0, 0.0, 0.0), Point3::new(10.0, 10.0, 10.0)),
            true,
        );
        let inside = Solid::new(
            "inside",
            BoundingBox::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 10.0, 10.0)),
            true,
        );
        let region_box =
            BoundingBox::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 10.0, 10.0));
        let fragments = vec![outside.clone(), inside.clone()];

        assert_eq!(
            select_fragment(fragments.clone(), &region_box, FragmentPolicy::First),
            Some(outside.clone())
        );
        assert_eq!(
            select_fragment(fragments, &region_box, FragmentPolicy::ContainedInRegion),
            Some(inside)
        );
        assert_eq!(
            select_fragment(vec![outside.clone()], &region_box, FragmentPolicy::ContainedInRegion),
            Some(outside)
        );
        assert_eq!(
            select_fragment(Vec::new(), &region_box, FragmentPolicy::First),
            None
        );
    }
}
