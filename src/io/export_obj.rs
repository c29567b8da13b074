// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ exporter

use super::{write_atomic, ExportError};
use crate::geometry::Mesh;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export mesh to OBJ format
pub fn export(mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), ExportError> {
    // Reject malformed faces before anything touches the disk
    validate_faces(mesh)?;
    write_atomic(path.as_ref(), |file| {
        let mut out = BufWriter::new(file);
        write_obj(mesh, &mut out)?;
        out.flush()?;
        Ok(())
    })
}

fn validate_faces(mesh: &Mesh) -> Result<(), ExportError> {
    match mesh
        .faces
        .iter()
        .enumerate()
        .find(|(_, f)| !matches!(f.len(), 3 | 4))
    {
        Some((face, f)) => Err(ExportError::UnsupportedFace { face, len: f.len() }),
        None => Ok(()),
    }
}

/// Write `v`, `vn` and `f` records; face indices become 1-based
pub fn write_obj<W: Write>(mesh: &Mesh, out: &mut W) -> Result<(), ExportError> {
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }

    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for (index, face) in mesh.faces.iter().enumerate() {
        match face.indices.as_slice() {
            [a, b, c] => writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?,
            [a, b, c, d] => writeln!(out, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1)?,
            other => {
                return Err(ExportError::UnsupportedFace {
                    face: index,
                    len: other.len(),
                })
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use nalgebra::{Point3, Vector3};
    use tempfile::tempdir;

    fn mixed_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ] {
            mesh.add_vertex(p);
            mesh.add_normal(Vector3::z());
        }
        mesh.add_face(Face::quad(0, 1, 2, 3));
        mesh.add_face(Face::triangle(0, 1, 4));
        mesh
    }

    #[test]
    fn test_quad_and_triangle_faces() -> Result<(), ExportError> {
        let mut out = Vec::new();
        write_obj(&mixed_mesh(), &mut out)?;
        let text = String::from_utf8(out).unwrap();

        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 2 3 4", "f 1 2 5"]);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 5);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 5);
        assert!(text.starts_with("v 0 0 0\n"));
        Ok(())
    }

    #[test]
    fn test_bad_face_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad_mesh.obj");

        let mut mesh = mixed_mesh();
        mesh.add_face(Face::new(vec![0, 1]));

        let err = export(&mesh, &path).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFace { face: 2, len: 2 }));
        assert!(err.is_client_error());
        assert!(!path.exists());
    }

    #[test]
    fn test_export_to_file() -> Result<(), ExportError> {
        let dir = tempdir()?;
        let path = dir.path().join("part_mesh.obj");

        export(&mixed_mesh(), &path)?;

        let text = std::fs::read_to_string(&path)?;
        assert_eq!(text.lines().count(), 12);
        Ok(())
    }
}
