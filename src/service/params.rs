// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Request and response payloads

use crate::lattice::FlexureRegion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_mesh_type() -> String {
    "flexure_box".to_string()
}

fn default_dimension() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_export_format() -> String {
    "obj".to_string()
}

/// Mesh generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    #[serde(default)]
    pub name: String,
    /// `box`, `sphere`, `cylinder` or `flexure_box`
    #[serde(rename = "type", default = "default_mesh_type")]
    pub kind: String,
    #[serde(default = "default_dimension")]
    pub length: f64,
    #[serde(default = "default_dimension")]
    pub width: f64,
    #[serde(default = "default_dimension")]
    pub height: f64,
    #[serde(default = "default_dimension")]
    pub radius: f64,
    /// `low`, `medium` or `high`
    #[serde(default)]
    pub flexure_density: Option<String>,
    #[serde(default)]
    pub flexure_regions: Option<Vec<FlexureRegion>>,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: default_mesh_type(),
            length: 1.0,
            width: 1.0,
            height: 1.0,
            radius: 1.0,
            flexure_density: None,
            flexure_regions: None,
        }
    }
}

/// Files written for a mesh request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshArtifacts {
    pub message: String,
    pub obj_file_path: PathBuf,
    pub rhino_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    pub radius: f64,
    #[serde(default)]
    pub center_x: f64,
    #[serde(default)]
    pub center_y: f64,
    #[serde(default)]
    pub center_z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereResponse {
    pub radius: f64,
    pub center: Center,
    /// Encoded Brep
    pub brep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    pub brep_str: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub message: String,
    pub brep: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrepToMeshParams {
    pub brep_str: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub message: String,
    /// Encoded mesh
    pub mesh: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportParams {
    pub brep_str: String,
    /// `obj` or `3dm`
    #[serde(default = "default_export_format")]
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub message: String,
    pub file_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_params_defaults() {
        let params: MeshParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, MeshParams::default());
        assert_eq!(params.kind, "flexure_box");
    }

    #[test]
    fn test_mesh_params_with_regions() {
        let params: MeshParams = serde_json::from_str(
            r#"{
                "name": "hinge",
                "type": "flexure_box",
                "length": 10, "width": 10, "height": 10,
                "flexure_density": "high",
                "flexure_regions": [{"x_min": 1, "x_max": 2}, {"x_min": 8, "x_max": 9, "z_max": 5}]
            }"#,
        )
        .unwrap();

        let regions = params.flexure_regions.unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], FlexureRegion::x_band(1.0, 2.0));
        assert_eq!(regions[1].z_max, Some(5.0));
        assert_eq!(params.flexure_density.as_deref(), Some("high"));
    }

    #[test]
    fn test_artifacts_payload_keys() {
        let artifacts = MeshArtifacts {
            message: "Hinge mesh created successfully".into(),
            obj_file_path: "hinge_mesh.obj".into(),
            rhino_file_path: "hinge_geometry.3dm".into(),
        };
        let json = serde_json::to_value(&artifacts).unwrap();
        assert_eq!(json["obj_file_path"], "hinge_mesh.obj");
        assert_eq!(json["rhino_file_path"], "hinge_geometry.3dm");
    }
}
