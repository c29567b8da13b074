// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene container holding a Brep and its mesh.
//!
//! The file is a zip archive: `scene.json` lists the objects and every
//! object is stored as its encoded transport string under `objects/`.

use super::{write_atomic, ExportError};
use crate::compute::codec::{self, GeometryObject};
use crate::geometry::{Mesh, Solid};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::{ExtendedFileOptions, FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

const MANIFEST_ENTRY: &str = "scene.json";
const SCENE_FORMAT: &str = "polyframe-scene";
const SCENE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SceneManifest {
    format: String,
    version: u32,
    created_at: String,
    objects: Vec<SceneEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SceneEntry {
    kind: String,
    path: String,
}

/// Write the valid objects among `solid` and `mesh` to a scene file.
///
/// Returns the number of objects stored.
pub fn export(
    solid: Option<&Solid>,
    mesh: Option<&Mesh>,
    path: impl AsRef<Path>,
) -> Result<usize, ExportError> {
    let mut objects: Vec<GeometryObject> = Vec::new();
    if let Some(solid) = solid.filter(|s| s.is_valid()) {
        objects.push(solid.clone().into());
    }
    if let Some(mesh) = mesh.filter(|m| m.is_valid()) {
        objects.push(mesh.clone().into());
    }

    let encoded = objects
        .iter()
        .map(|object| {
            codec::encode(object)
                .map(|text| (object.kind(), text))
                .map_err(|e| ExportError::Encode(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let manifest = SceneManifest {
        format: SCENE_FORMAT.to_string(),
        version: SCENE_VERSION,
        created_at: chrono::Utc::now().to_rfc3339(),
        objects: encoded
            .iter()
            .enumerate()
            .map(|(i, (kind, _))| SceneEntry {
                kind: kind.to_string(),
                path: format!("objects/{}.{}", i, kind),
            })
            .collect(),
    };

    write_atomic(path.as_ref(), |file| {
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<ExtendedFileOptions> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file(MANIFEST_ENTRY, options.clone())?;
        zip.write_all(&serde_json::to_vec_pretty(&manifest)?)?;

        for (entry, (_, text)) in manifest.objects.iter().zip(&encoded) {
            zip.start_file(entry.path.as_str(), options.clone())?;
            zip.write_all(text.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    })?;

    Ok(encoded.len())
}

/// Read every object stored in a scene file
pub fn read(path: impl AsRef<Path>) -> Result<Vec<GeometryObject>, ExportError> {
    let mut archive = ZipArchive::new(File::open(path.as_ref())?)?;

    let manifest: SceneManifest = {
        let mut entry = archive.by_name(MANIFEST_ENTRY)?;
        let mut text = String::new();
        entry.read_to_string(&mut text)?;
        serde_json::from_str(&text)?
    };
    if manifest.format != SCENE_FORMAT {
        return Err(ExportError::InvalidScene(manifest.format));
    }

    manifest
        .objects
        .iter()
        .map(|entry| {
            let mut text = String::new();
            archive.by_name(&entry.path)?.read_to_string(&mut text)?;
            codec::decode(&text).map_err(|e| ExportError::InvalidScene(e.to_string()))
        })
        .collect()
}
