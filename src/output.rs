// src/output.rs

//! Materialize Lingquan resource directories
//!
//! Each resource lives at `resources/<ContentId>/` and holds the original file
//! under its original name plus the `__info.json` sidecar. A directory is
//! assembled under a hidden staging name and renamed into place, so a
//! resource directory never exists without both files.

use crate::asset::AssetInfo;
use crate::error::Result;
use crate::hash::ContentId;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the metadata sidecar
pub const SIDECAR_NAME: &str = "__info.json";

/// Whether a file of this name cannot share a resource directory with its sidecar
pub fn is_reserved_name(file_name: &str) -> bool {
    file_name == SIDECAR_NAME
}

/// Writer for the `resources/` directory of a package
#[derive(Debug, Clone)]
pub struct OutputWriter {
    resources_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
        }
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    /// Directory of the resource with the given id
    pub fn resource_dir(&self, id: &ContentId) -> PathBuf {
        self.resources_dir.join(id.as_str())
    }

    /// Whether a resource with this id was already written
    pub fn contains(&self, id: &ContentId) -> bool {
        self.resource_dir(id).exists()
    }

    /// Write one resource: the source file copied as `file_name` and its sidecar
    ///
    /// The caller checks [`contains`](Self::contains) first; an existing
    /// resource directory is never replaced. A file named like the sidecar
    /// cannot be stored.
    pub fn write(&self, source: &Path, file_name: &str, info: &AssetInfo) -> Result<PathBuf> {
        if is_reserved_name(file_name) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{file_name} would collide with the resource sidecar"),
            )
            .into());
        }

        let target = self.resource_dir(&info.id);
        let staging = self.resources_dir.join(format!(".{}.partial", info.id));

        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir(&staging)?;

        let copied = fs::copy(source, staging.join(file_name))?;
        fs::write(staging.join(SIDECAR_NAME), info.to_json()?)?;

        fs::rename(&staging, &target)?;

        debug!(
            "Wrote resource {} ({} bytes) from {}",
            info.id,
            copied,
            source.display()
        );
        Ok(target)
    }
}
