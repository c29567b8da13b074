// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh/export orchestration over a geometry client

use super::params::*;
use super::ServiceError;
use crate::compute::{GeometryClient, GeometryObject};
use crate::config::ComputeConfig;
use crate::geometry::{Mesh, Primitive, Solid};
use crate::io;
use crate::lattice::{apply_lattice_flexures, FlexureSettings, FragmentPolicy};
use nalgebra::{Matrix4, Point3, Vector3};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, ServiceError>;

/// Builds primitives, applies flexures and writes mesh/scene files.
///
/// The service owns its client; pass `&client` to share one.
pub struct MeshService<C> {
    client: C,
    output_dir: PathBuf,
    flexure: FlexureSettings,
}

impl<C: GeometryClient> MeshService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            output_dir: PathBuf::from("."),
            flexure: FlexureSettings::default(),
        }
    }

    /// Take output directory and flexure settings from configuration
    pub fn from_config(client: C, config: &ComputeConfig) -> Self {
        Self::new(client)
            .with_output_dir(&config.output_dir)
            .with_flexure_settings(config.flexure_settings())
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_fragment_policy(mut self, policy: FragmentPolicy) -> Self {
        self.flexure.fragment_policy = policy;
        self
    }

    pub fn with_flexure_settings(mut self, settings: FlexureSettings) -> Self {
        self.flexure = settings;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the requested primitive and, for `flexure_box`, carve its flexures
    pub fn build_solid(&self, params: &MeshParams) -> Result<Solid> {
        let primitive = primitive_for(params)?;
        debug!(kind = %params.kind, primitive = primitive.name(), "building base solid");
        let solid = self.client.build_primitive(&primitive)?;

        if params.kind != "flexure_box" {
            return Ok(solid);
        }

        match (&params.flexure_density, &params.flexure_regions) {
            (Some(density), Some(regions)) if !density.is_empty() && !regions.is_empty() => {
                let report = apply_lattice_flexures(
                    &self.client,
                    solid,
                    regions,
                    density,
                    self.flexure,
                );
                Ok(report.solid)
            }
            _ => Ok(solid),
        }
    }

    /// Mesh the Brep and return the first mesh
    fn first_mesh(&self, solid: &Solid) -> Result<Mesh> {
        self.client
            .mesh_from_brep(solid)?
            .into_iter()
            .next()
            .ok_or(ServiceError::NoMesh)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(io::ExportError::from)?;
        Ok(())
    }

    /// Build, mesh and persist a mesh request as `<name>_mesh.obj` and `<name>_geometry.3dm`
    pub fn create_mesh(&self, params: &MeshParams) -> Result<MeshArtifacts> {
        info!(name = %params.name, kind = %params.kind, "creating mesh");
        check_file_stem(&params.name)?;

        let solid = self.build_solid(params)?;
        let mesh = self.first_mesh(&solid)?;

        self.prepare_output_dir()?;
        let obj_file_path = self.output_dir.join(format!("{}_mesh.obj", params.name));
        io::export_obj(&mesh, &obj_file_path)?;

        let rhino_file_path = self.output_dir.join(format!("{}_geometry.3dm", params.name));
        io::export_scene(Some(&solid), Some(&mesh), &rhino_file_path)?;

        info!(obj = %obj_file_path.display(), scene = %rhino_file_path.display(), "mesh written");
        Ok(MeshArtifacts {
            message: format!("{} mesh created successfully", capitalize(&params.name)),
            obj_file_path,
            rhino_file_path,
        })
    }

    /// Build a sphere Brep and return it encoded
    pub fn create_sphere(&self, params: &SphereParams) -> Result<SphereResponse> {
        let center = Point3::new(params.center_x, params.center_y, params.center_z);
        let solid = self
            .client
            .build_primitive(&Primitive::sphere(center, params.radius))?;

        Ok(SphereResponse {
            radius: params.radius,
            center: Center {
                x: center.x,
                y: center.y,
                z: center.z,
            },
            brep: self.client.encode(&GeometryObject::Brep(solid))?,
        })
    }

    fn decode_brep(&self, encoded: &str) -> Result<Solid> {
        self.client
            .decode(encoded)?
            .into_brep()
            .ok_or_else(|| ServiceError::InvalidInput("Invalid Brep string provided".to_string()))
    }

    /// Scale about the origin, then rotate about +Z, through the kernel
    pub fn transform_geometry(&self, params: &TransformParams) -> Result<TransformResponse> {
        let solid = self.decode_brep(&params.brep_str)?;

        let matrix = transform_matrix(params.scale, params.rotation_degrees);
        let solid = match matrix {
            Some(matrix) => self.client.transform(&solid, &matrix)?,
            None => solid,
        };

        Ok(TransformResponse {
            message: "Transformation successful".to_string(),
            brep: self.client.encode(&GeometryObject::Brep(solid))?,
        })
    }

    /// Mesh an encoded Brep and return the first mesh encoded
    pub fn convert_to_mesh(&self, params: &BrepToMeshParams) -> Result<ConvertResponse> {
        let solid = self.decode_brep(&params.brep_str)?;
        let mesh = self.first_mesh(&solid)?;

        Ok(ConvertResponse {
            message: "Mesh conversion successful".to_string(),
            mesh: self.client.encode(&GeometryObject::Mesh(mesh))?,
        })
    }

    /// Write an encoded Brep as `geometry.obj` (meshed) or `geometry.3dm`
    pub fn export_geometry(&self, params: &ExportParams) -> Result<ExportResponse> {
        let solid = self.decode_brep(&params.brep_str)?;
        let file_path = self.output_dir.join(format!("geometry.{}", params.format));

        match params.format.as_str() {
            "obj" => {
                let mesh = self.first_mesh(&solid)?;
                self.prepare_output_dir()?;
                io::export_obj(&mesh, &file_path)?;
            }
            "3dm" => {
                self.prepare_output_dir()?;
                io::export_scene(Some(&solid), None, &file_path)?;
            }
            other => return Err(ServiceError::UnsupportedFormat(other.to_string())),
        }

        Ok(ExportResponse {
            message: "Export successful".to_string(),
            file_path,
        })
    }
}

/// Primitive for a mesh request's type tag
pub fn primitive_for(params: &MeshParams) -> Result<Primitive> {
    let anchor = Point3::new(params.length, params.width, params.height);
    match params.kind.as_str() {
        "box" | "flexure_box" => Ok(Primitive::origin_box(
            params.length,
            params.width,
            params.height,
        )),
        "sphere" => Ok(Primitive::sphere(anchor, params.radius)),
        "cylinder" => Ok(Primitive::upright_cylinder(
            anchor,
            params.radius,
            params.height,
        )),
        other => Err(ServiceError::UnsupportedType(other.to_string())),
    }
}

/// Reject names that would place output files outside the output directory
fn check_file_stem(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = match (components.next(), components.next()) {
        (None, _) => true,
        (Some(Component::Normal(_)), None) => !name.contains(['/', '\\']),
        _ => false,
    };

    if plain {
        Ok(())
    } else {
        Err(ServiceError::InvalidInput(format!(
            "name must be a plain file name, got '{}'",
            name
        )))
    }
}

/// Combined scale-then-rotate matrix, `None` when both are identity
fn transform_matrix(scale: f64, rotation_degrees: f64) -> Option<Matrix4<f64>> {
    let mut matrix = None;
    if scale != 1.0 {
        matrix = Some(Matrix4::new_scaling(scale));
    }
    if rotation_degrees != 0.0 {
        let rotation = Matrix4::from_axis_angle(&Vector3::z_axis(), rotation_degrees.to_radians());
        matrix = Some(rotation * matrix.unwrap_or_else(Matrix4::identity));
    }
    matrix
}

/// First character upper-cased, the rest lower-cased
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hinge"), "Hinge");
        assert_eq!(capitalize("bRACKET"), "Bracket");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_file_stem_rejects_paths() {
        assert!(check_file_stem("hinge").is_ok());
        assert!(check_file_stem("hinge..v2").is_ok());
        assert!(check_file_stem("").is_ok());

        for name in ["../hinge", "..", ".", "/tmp/pwn", "a/b", "a\\b", "out/../../x"] {
            assert!(
                matches!(check_file_stem(name), Err(ServiceError::InvalidInput(_))),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_primitive_for_type_tags() {
        let params = MeshParams {
            kind: "cylinder".into(),
            length: 1.0,
            width: 2.0,
            height: 3.0,
            radius: 0.5,
            ..Default::default()
        };
        assert_eq!(
            primitive_for(&params).unwrap(),
            Primitive::upright_cylinder(Point3::new(1.0, 2.0, 3.0), 0.5, 3.0)
        );

        let unknown = MeshParams {
            kind: "torus".into(),
            ..Default::default()
        };
        assert!(matches!(
            primitive_for(&unknown),
            Err(ServiceError::UnsupportedType(t)) if t == "torus"
        ));
    }

    #[test]
    fn test_transform_matrix() {
        assert!(transform_matrix(1.0, 0.0).is_none());

        let m = transform_matrix(2.0, 90.0).unwrap();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }
}
