//! Export: Wavefront OBJ geometry plus a two-material MTL file.
//!
//! # Invariants
//! - The material file is written before the geometry file.
//! - Export never mutates the mesh.
//! - Vertex and face order match the mesh's row-major point order.

mod format;
mod obj;

use std::path::{Path, PathBuf};

pub use format::general;
pub use obj::{export, material_path, write_material, write_obj};

/// Errors from writing export files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("export path has no file name: {0}")]
    InvalidPath(PathBuf),
}

impl ExportError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Paths written by a successful [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub obj: PathBuf,
    pub mtl: PathBuf,
}
