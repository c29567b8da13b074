// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Transport-string encoding of solids and meshes

use super::{ComputeError, Result};
use crate::geometry::{Mesh, Solid};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Any object that can travel as an encoded string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GeometryObject {
    Brep(Solid),
    Mesh(Mesh),
}

impl GeometryObject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Brep(_) => "brep",
            Self::Mesh(_) => "mesh",
        }
    }

    pub fn into_brep(self) -> Option<Solid> {
        match self {
            Self::Brep(solid) => Some(solid),
            Self::Mesh(_) => None,
        }
    }

    pub fn into_mesh(self) -> Option<Mesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            Self::Brep(_) => None,
        }
    }
}

impl From<Solid> for GeometryObject {
    fn from(solid: Solid) -> Self {
        Self::Brep(solid)
    }
}

impl From<Mesh> for GeometryObject {
    fn from(mesh: Mesh) -> Self {
        Self::Mesh(mesh)
    }
}

/// Encode an object as base64 of its JSON form
pub fn encode(object: &GeometryObject) -> Result<String> {
    let json = serde_json::to_vec(object).map_err(|e| ComputeError::Codec(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Inverse of [`encode`]
pub fn decode(encoded: &str) -> Result<GeometryObject> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ComputeError::Codec(format!("not base64: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| ComputeError::Codec(e.to_string()))
}
