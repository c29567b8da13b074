// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - OBJ and scene file output

mod error;
mod export_obj;
mod scene;

pub use error::ExportError;
pub use export_obj::{export as export_obj, write_obj};
pub use scene::{export as export_scene, read as read_scene};

use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write through a temporary file next to `path`, then rename it into place.
///
/// A failure at any point leaves `path` untouched.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut File) -> Result<(), ExportError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}
