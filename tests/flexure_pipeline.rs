// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end flexure box requests against the in-memory kernel

use anyhow::Result;
use approx::assert_relative_eq;
use nalgebra::Point3;
use polyframe_compute::compute::{Faults, GeometryClient, InMemoryKernel};
use polyframe_compute::config::ComputeConfig;
use polyframe_compute::geometry::{BoundingBox, Primitive};
use polyframe_compute::io;
use polyframe_compute::lattice::{
    apply_lattice_flexures, FlexureRegion, FlexureSettings, RegionSkip, RegionStatus,
};
use polyframe_compute::service::{MeshParams, MeshService};
use tempfile::TempDir;

fn flexure_request(density: &str, regions: Vec<FlexureRegion>) -> MeshParams {
    MeshParams {
        name: "hinge".into(),
        kind: "flexure_box".into(),
        length: 10.0,
        width: 10.0,
        height: 10.0,
        flexure_density: Some(density.into()),
        flexure_regions: Some(regions),
        ..Default::default()
    }
}

#[test]
fn test_flexure_box_high_density_band() -> Result<()> {
    let dir = TempDir::new()?;
    let kernel = InMemoryKernel::new();
    let service = MeshService::new(&kernel).with_output_dir(dir.path());

    let params = flexure_request("high", vec![FlexureRegion::x_band(1.0, 2.0)]);
    let artifacts = service.create_mesh(&params)?;

    let calls = kernel.calls();
    assert_eq!(calls.splits.len(), 1);

    // 4 x 40 x 40 cells at 0.25 inside the band
    let struts: Vec<_> = calls.cylinders().collect();
    assert_eq!(struts.len(), 6400);
    for strut in &struts {
        if let Primitive::Cylinder { height, radius, .. } = strut {
            assert_relative_eq!(*height, 0.25 * 3f64.sqrt(), epsilon = 1e-9);
            assert_relative_eq!(*radius, 0.1);
        }
    }

    // 6399 strut joins, then the lattice joined into the base
    assert_eq!(calls.joins.len(), 6400);
    let last = calls.joins.last().unwrap();
    assert_eq!(
        last.inputs[0],
        BoundingBox::new(Point3::origin(), Point3::new(10.0, 10.0, 10.0))
    );
    assert_relative_eq!(last.tolerance, 0.01);

    assert!(artifacts.obj_file_path.exists());
    assert!(artifacts.rhino_file_path.exists());
    assert_eq!(artifacts.obj_file_path, dir.path().join("hinge_mesh.obj"));
    assert_eq!(artifacts.rhino_file_path, dir.path().join("hinge_geometry.3dm"));
    assert_eq!(artifacts.message, "Hinge mesh created successfully");

    let objects = io::read_scene(&artifacts.rhino_file_path)?;
    assert_eq!(objects.len(), 2);
    let brep = objects[0].clone().into_brep().unwrap();
    assert_eq!(InMemoryKernel::part_count(&brep), Some(6401));

    Ok(())
}

#[test]
fn test_split_cutter_spans_base_in_y_and_z() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let service = MeshService::new(&kernel);

    let params = flexure_request("low", vec![FlexureRegion::x_band(2.0, 4.0)]);
    service.build_solid(&params)?;

    let calls = kernel.calls();
    let (base, cutter) = calls.splits[0];
    assert_eq!(base, BoundingBox::new(Point3::origin(), Point3::new(10.0, 10.0, 10.0)));
    assert_eq!(
        cutter,
        BoundingBox::new(Point3::new(2.0, 0.0, 0.0), Point3::new(4.0, 10.0, 10.0))
    );
    // 2 cells per axis span at 1.0 in x, 10 in y and z
    assert_eq!(calls.cylinders().count(), 200);
    Ok(())
}

#[test]
fn test_second_region_sees_grown_solid() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let base = kernel.build_primitive(&Primitive::origin_box(4.0, 4.0, 4.0))?;

    let regions = [FlexureRegion::x_band(1.0, 2.0), FlexureRegion::x_band(2.0, 3.0)];
    let report = apply_lattice_flexures(&kernel, base, &regions, "low", FlexureSettings::default());
    assert_eq!(report.applied(), 2);

    let calls = kernel.calls();
    assert_eq!(calls.splits.len(), 2);

    // The first lattice pads the solid by the strut radius in y and z
    let (second_base, second_cutter) = calls.splits[1];
    assert_relative_eq!(second_base.min.y, -0.1, epsilon = 1e-9);
    assert_relative_eq!(second_cutter.min.y, -0.1, epsilon = 1e-9);
    assert_relative_eq!(second_cutter.max.z, 4.1, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_oversized_region_is_capped_by_config() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let config = ComputeConfig::default();
    let service = MeshService::from_config(&kernel, &config);

    let mut params = flexure_request("high", vec![FlexureRegion::x_band(0.0, 1.0)]);
    params.length = 100.0;
    params.width = 100.0;
    params.height = 100.0;
    let solid = service.build_solid(&params)?;

    // 4 x 400 x 400 cells is far above the default cap
    let calls = kernel.calls();
    assert_eq!(calls.cylinders().count(), 0);
    assert_eq!(calls.round_trips(), 3);
    assert_eq!(
        solid.bounds,
        BoundingBox::new(Point3::origin(), Point3::new(100.0, 100.0, 100.0))
    );
    Ok(())
}

#[test]
fn test_raised_cap_admits_region() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let config = ComputeConfig {
        max_struts_per_region: 200,
        ..Default::default()
    };
    let service = MeshService::from_config(&kernel, &config);

    service.build_solid(&flexure_request("low", vec![FlexureRegion::x_band(2.0, 4.0)]))?;
    assert_eq!(kernel.calls().cylinders().count(), 200);

    let strict = InMemoryKernel::new();
    let config = ComputeConfig {
        max_struts_per_region: 199,
        ..Default::default()
    };
    MeshService::from_config(&strict, &config)
        .build_solid(&flexure_request("low", vec![FlexureRegion::x_band(2.0, 4.0)]))?;
    assert_eq!(strict.calls().cylinders().count(), 0);
    Ok(())
}

#[test]
fn test_failing_splits_keep_base_and_still_mesh() -> Result<()> {
    let dir = TempDir::new()?;
    let kernel = InMemoryKernel::with_faults(Faults {
        split_errors: true,
        ..Default::default()
    });
    let service = MeshService::new(&kernel).with_output_dir(dir.path());

    let params = flexure_request(
        "medium",
        vec![FlexureRegion::x_band(1.0, 2.0), FlexureRegion::x_band(5.0, 6.0)],
    );
    let artifacts = service.create_mesh(&params)?;

    let calls = kernel.calls();
    assert_eq!(calls.splits.len(), 2);
    assert_eq!(calls.cylinders().count(), 0);
    assert!(calls.joins.is_empty());
    assert!(artifacts.obj_file_path.exists());
    Ok(())
}

#[test]
fn test_invalid_struts_skip_region() -> Result<()> {
    let kernel = InMemoryKernel::with_faults(Faults {
        invalid_cylinders: true,
        ..Default::default()
    });
    let base = kernel.build_primitive(&Primitive::origin_box(2.0, 2.0, 2.0))?;

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
        RegionStatus::Skipped(RegionSkip::LatticeFailed(_))
    ));
    assert!(kernel.calls().joins.is_empty());
    Ok(())
}

#[test]
fn test_plain_box_ignores_flexure_fields() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let service = MeshService::new(&kernel);

    let mut params = flexure_request("high", vec![FlexureRegion::x_band(1.0, 2.0)]);
    params.kind = "box".into();
    service.build_solid(&params)?;

    let calls = kernel.calls();
    assert_eq!(calls.primitives.len(), 1);
    assert!(calls.splits.is_empty());
    Ok(())
}

#[test]
fn test_flexure_box_without_density_is_plain_box() -> Result<()> {
    let kernel = InMemoryKernel::new();
    let service = MeshService::new(&kernel);

    let mut params = flexure_request("", vec![FlexureRegion::x_band(1.0, 2.0)]);
    service.build_solid(&params)?;
    params.flexure_density = Some("high".into());
    params.flexure_regions = Some(Vec::new());
    service.build_solid(&params)?;

    assert_eq!(kernel.calls().round_trips(), 2);
    Ok(())
}
