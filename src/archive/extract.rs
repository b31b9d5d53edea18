// src/archive/extract.rs

//! Unpack a `.BillfishPack` (a plain zip archive)

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Counts from an extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Regular files written
    pub files: usize,
    /// Entries dropped because their path escapes the destination
    pub skipped: usize,
}

/// Extract every entry of `archive` below `dest`
///
/// Existing files are overwritten. Entries with absolute paths or `..`
/// components are skipped.
pub fn extract_pack(archive: &Path, dest: &Path) -> Result<ExtractionSummary> {
    let extraction_error = |reason: String| Error::Extraction {
        archive: archive.to_path_buf(),
        reason,
    };

    let file = fs::File::open(archive)
        .map_err(|e| extraction_error(format!("cannot open archive: {e}")))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| extraction_error(format!("invalid or corrupt zip: {e}")))?;

    fs::create_dir_all(dest)?;
    let mut summary = ExtractionSummary::default();

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| extraction_error(format!("failed to read entry {i}: {e}")))?;

        let Some(entry_path) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            warn!("Skipping unsafe archive entry: {}", entry.name());
            summary.skipped += 1;
            continue;
        };

        let output_path = dest.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = fs::File::create(&output_path)?;
        io::copy(&mut entry, &mut outfile).map_err(|e| {
            extraction_error(format!("failed to extract {}: {e}", entry_path.display()))
        })?;
        summary.files += 1;
    }

    debug!(
        "Extracted {} files from {} ({} skipped)",
        summary.files,
        archive.display(),
        summary.skipped
    );
    Ok(summary)
}
