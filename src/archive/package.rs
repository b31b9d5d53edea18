// src/archive/package.rs

//! Write a `.lqpack` (a gzip-compressed tar)

use crate::error::{Error, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io;
use std::path::Path;
use tar::Builder;
use tracing::{debug, warn};

/// Compress the content of `work_dir` into `output`
///
/// Entries are stored relative to `work_dir`, rooted at `.`. On failure the
/// partially written archive is removed and `work_dir` is left untouched.
pub fn package_tree(work_dir: &Path, output: &Path) -> Result<()> {
    match write_archive(work_dir, output) {
        Ok(()) => {
            debug!("Packaged {} into {}", work_dir.display(), output.display());
            Ok(())
        }
        Err(source) => {
            if output.exists() {
                if let Err(e) = fs::remove_file(output) {
                    warn!(
                        "Failed to remove incomplete archive {}: {}",
                        output.display(),
                        e
                    );
                }
            }
            Err(Error::Packaging {
                output: output.to_path_buf(),
                source,
            })
        }
    }
}

fn write_archive(work_dir: &Path, output: &Path) -> io::Result<()> {
    if !work_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("work directory {} does not exist", work_dir.display()),
        ));
    }

    let output_file = fs::File::create(output)?;
    let encoder = GzEncoder::new(output_file, Compression::default());
    let mut archive = Builder::new(encoder);

    archive.append_dir_all(".", work_dir)?;

    let encoder = archive.into_inner()?;
    encoder.finish()?.sync_all()?;
    Ok(())
}
