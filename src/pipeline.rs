// src/pipeline.rs

//! The conversion pipeline
//!
//! A run goes through fixed phases:
//!
//! 1. Check preconditions (input present, no leftover temp dir or output)
//! 2. Extract the pack into `temp/unzip`
//! 3. Open the library and map every entry into `temp/work`
//! 4. Close the library
//! 5. Package `temp/work` into the output archive
//! 6. Remove `temp`
//!
//! A failure in any phase ends the run. The temp directory is then left in
//! place for inspection, and the next run refuses to start until it has been
//! removed by hand.

use crate::archive::{extract_pack, package_tree};
use crate::config::{self, ConvertConfig};
use crate::error::{Precondition, Result};
use crate::library::Library;
use crate::locator::FileLocator;
use crate::mapper::{ConversionReport, RecordMapper};
use crate::output::OutputWriter;
use crate::progress::{LogProgress, ProgressTracker};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Pipeline phases, reported through the progress tracker in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Extracting,
    Converting,
    ClosingLibrary,
    Packaging,
    CleaningUp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Extracting => "Extracting pack",
            Self::Converting => "Converting library",
            Self::ClosingLibrary => "Closing library",
            Self::Packaging => "Packaging archive",
            Self::CleaningUp => "Removing temporary files",
        };
        f.write_str(text)
    }
}

/// Verify that a run may start
///
/// Nothing on disk is modified.
pub fn check_preconditions(config: &ConvertConfig) -> Result<()> {
    if !config.input.exists() {
        return Err(Precondition::MissingInput(config.input.clone()).into());
    }
    if config.temp_dir.exists() {
        return Err(Precondition::StaleWorkDir(config.temp_dir.clone()).into());
    }
    if config.output.exists() {
        return Err(Precondition::StaleOutput(config.output.clone()).into());
    }
    Ok(())
}

/// Runs one conversion
pub struct Converter {
    config: ConvertConfig,
    progress: Box<dyn ProgressTracker>,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            progress: Box::new(LogProgress::new("bf2lq")),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressTracker>) -> Self {
        self.progress = progress;
        self
    }

    /// Run the whole pipeline
    pub fn run(&self) -> Result<ConversionReport> {
        match self.run_phases() {
            Ok(report) => {
                self.progress.finish_with_message(&format!(
                    "Conversion complete: {} resources written to {}",
                    report.converted,
                    self.config.output.display()
                ));
                Ok(report)
            }
            Err(e) => {
                self.progress.finish_with_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn run_phases(&self) -> Result<ConversionReport> {
        check_preconditions(&self.config)?;

        let temp_dir = &self.config.temp_dir;
        let unzip_dir = config::unzip_dir(temp_dir);
        fs::create_dir_all(&unzip_dir)?;
        fs::create_dir_all(config::package_root(temp_dir))?;

        self.enter(Phase::Extracting);
        let summary = extract_pack(&self.config.input, &unzip_dir)?;
        info!("Extracted {} files", summary.files);

        // Dropping the library on an error below also releases the connection
        let library = Library::open(&config::library_db(&unzip_dir))?;
        let report = self.convert(&library, &unzip_dir)?;

        self.enter(Phase::ClosingLibrary);
        library.close()?;

        self.enter(Phase::Packaging);
        package_tree(&config::work_dir(temp_dir), &self.config.output)?;

        self.enter(Phase::CleaningUp);
        fs::remove_dir_all(temp_dir)?;

        info!(
            "{} of {} library entries converted ({} duplicates, {} missing, {} ambiguous)",
            report.converted,
            report.total,
            report.duplicates,
            report.missing.len(),
            report.ambiguous.len()
        );
        Ok(report)
    }

    fn convert(&self, library: &Library, unzip_dir: &Path) -> Result<ConversionReport> {
        let temp_dir = &self.config.temp_dir;
        let resources_dir = config::resources_dir(temp_dir);
        fs::create_dir(&resources_dir)?;
        fs::create_dir(config::material_package_dir(temp_dir))?;

        self.enter(Phase::Converting);
        let files = library.list_files()?;
        info!("Library lists {} files", files.len());

        let locator = FileLocator::with_policy(unzip_dir, self.config.match_policy)?;
        let writer = OutputWriter::new(resources_dir);

        RecordMapper::new(library, &locator, &writer).run(&files, self.progress.as_ref())
    }

    fn enter(&self, phase: Phase) {
        self.progress.set_message(&phase.to_string());
    }
}
