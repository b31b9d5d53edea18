// src/mapper.rs

//! Map Billfish library entries to Lingquan resources
//!
//! For every `bf_file` row, in storage order:
//!
//! 1. Find the file in the extracted pack. A miss is logged and skipped, as
//!    is a name that would collide with the resource sidecar.
//! 2. Compute its [`ContentId`]. If that resource was already written (the
//!    same bytes appeared earlier under another row) the row is skipped.
//! 3. Gather the row's metadata from the library and write the resource.
//!
//! Skipped rows never affect the rows after them. Any library or filesystem
//! error aborts the whole loop.

use crate::asset::AssetInfo;
use crate::error::Result;
use crate::hash::ContentId;
use crate::library::{Dimensions, Library, SourceFile, UserData};
use crate::locator::{FileLocator, Located};
use crate::output::{OutputWriter, is_reserved_name};
use crate::progress::ProgressTracker;
use std::path::Path;
use tracing::{info, warn};

/// Metadata of one library entry, collected before its record is built
///
/// The lookups are independent of each other; all of them complete before
/// the record exists. Missing rows become `None` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub ext: Option<String>,
    pub dimensions: Dimensions,
    pub user_data: UserData,
    /// Tag names in assignment order
    pub tags: Vec<String>,
}

impl AssetMetadata {
    pub fn gather(library: &Library, file: &SourceFile) -> Result<Self> {
        let ext = match file.type_id {
            Some(type_id) => library.extension_name(type_id)?,
            None => None,
        };
        let dimensions = library.dimensions(file.id)?.unwrap_or_default();
        let user_data = library.user_data(file.id)?.unwrap_or_default();
        let tags = tag_names(library, file)?;

        Ok(Self {
            ext,
            dimensions,
            user_data,
            tags,
        })
    }

    /// Build the sidecar record for `file`
    pub fn into_asset_info(self, id: ContentId, file: &SourceFile) -> AssetInfo {
        let mut info = AssetInfo::new(id, &file.name);
        info.ext = self.ext;
        info.width = self.dimensions.width;
        info.height = self.dimensions.height;
        info.score = self.user_data.score;
        info.time = file.created_at;
        info.revision_time = file.modified_at;
        info.tags = self.tags;
        info.note = self.user_data.note;
        info.url = self.user_data.origin;
        info
    }
}

/// Resolve a file's tag assignments to tag names
fn tag_names(library: &Library, file: &SourceFile) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for tag_id in library.tag_ids_for_file(file.id)? {
        match library.tag_name(tag_id)? {
            Some(name) => names.push(name),
            None => warn!(
                "\"{}\" is assigned tag {} which does not exist, ignoring",
                file.name, tag_id
            ),
        }
    }
    Ok(names)
}

/// What happened to a single library entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new resource was written
    Converted(ContentId),
    /// A resource with the same content already exists
    Duplicate(ContentId),
    /// No file with this name exists in the pack
    Missing,
    /// Several files share this name and the policy rejects guessing
    Ambiguous(usize),
    /// The name is reserved inside a resource directory
    Reserved,
}

/// Summary of a mapping run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Library entries processed
    pub total: usize,
    /// Resources written
    pub converted: usize,
    /// Entries whose content was already written
    pub duplicates: usize,
    /// Names of entries not found in the pack
    pub missing: Vec<String>,
    /// Names of entries matching more than one file
    pub ambiguous: Vec<String>,
    /// Names of entries that cannot be stored under their own name
    pub reserved: Vec<String>,
}

impl ConversionReport {
    fn record(&mut self, file: &SourceFile, outcome: &RecordOutcome) {
        self.total += 1;
        match outcome {
            RecordOutcome::Converted(_) => self.converted += 1,
            RecordOutcome::Duplicate(_) => self.duplicates += 1,
            RecordOutcome::Missing => self.missing.push(file.name.clone()),
            RecordOutcome::Ambiguous(_) => self.ambiguous.push(file.name.clone()),
            RecordOutcome::Reserved => self.reserved.push(file.name.clone()),
        }
    }

    /// Entries that produced no resource of their own
    pub fn skipped(&self) -> usize {
        self.total - self.converted
    }
}

/// Joins the locator, the library and the writer for each entry
pub struct RecordMapper<'a> {
    library: &'a Library,
    locator: &'a FileLocator,
    writer: &'a OutputWriter,
}

impl<'a> RecordMapper<'a> {
    pub fn new(library: &'a Library, locator: &'a FileLocator, writer: &'a OutputWriter) -> Self {
        Self {
            library,
            locator,
            writer,
        }
    }

    /// Map every entry in order
    pub fn run(
        &self,
        files: &[SourceFile],
        progress: &dyn ProgressTracker,
    ) -> Result<ConversionReport> {
        let mut report = ConversionReport::default();
        progress.set_length(files.len() as u64);

        for file in files {
            let outcome = self.map_record(file)?;
            report.record(file, &outcome);
            progress.increment(1);
        }

        Ok(report)
    }

    /// Map a single entry
    pub fn map_record(&self, file: &SourceFile) -> Result<RecordOutcome> {
        if is_reserved_name(&file.name) {
            warn!("\"{}\" is a reserved resource file name, skipped", file.name);
            return Ok(RecordOutcome::Reserved);
        }

        let path = match self.locator.locate(&file.name) {
            Located::Found(path) => path,
            Located::NotFound => {
                warn!("Could not find \"{}\" in the pack, skipped", file.name);
                return Ok(RecordOutcome::Missing);
            }
            Located::Ambiguous(candidates) => {
                warn!(
                    "\"{}\" matches {} files in the pack, skipped",
                    file.name,
                    candidates.len()
                );
                return Ok(RecordOutcome::Ambiguous(candidates.len()));
            }
        };

        let id = ContentId::from_file(&path)?;
        if self.writer.contains(&id) {
            info!("Skipped \"{}\", already converted as {}", file.name, id);
            return Ok(RecordOutcome::Duplicate(id));
        }

        self.convert(file, &path, id)
    }

    fn convert(&self, file: &SourceFile, path: &Path, id: ContentId) -> Result<RecordOutcome> {
        let info = AssetMetadata::gather(self.library, file)?.into_asset_info(id.clone(), file);
        self.writer.write(path, &file.name, &info)?;

        info!("Converted \"{}\"", file.name);
        Ok(RecordOutcome::Converted(id))
    }
}
