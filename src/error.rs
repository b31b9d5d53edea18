// src/error.rs

//! Error types for the conversion pipeline
//!
//! Every variant is fatal to a run. Recoverable conditions (a library row whose
//! file is missing from the pack) are modelled as results, not errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// A startup condition that must hold before anything is touched on disk
#[derive(Error, Debug)]
pub enum Precondition {
    #[error(
        "input pack not found at {0}; export your library as `<name>.BillfishPack` and place it there"
    )]
    MissingInput(PathBuf),

    #[error("temporary directory {0} already exists; remove it and re-run")]
    StaleWorkDir(PathBuf),

    #[error("output archive {0} already exists; remove it and re-run")]
    StaleOutput(PathBuf),
}

/// Errors that abort a conversion run
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] Precondition),

    /// The input pack is not a readable zip archive
    #[error("failed to extract {}: {reason}", archive.display())]
    Extraction { archive: PathBuf, reason: String },

    /// The library store could not be opened
    #[error("failed to open library database {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// A library query failed, usually because the schema does not match
    #[error("library query `{query}` failed: {source}")]
    Query {
        query: &'static str,
        source: rusqlite::Error,
    },

    /// Writing the output archive failed
    #[error("failed to package {}: {source}", output.display())]
    Packaging { output: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a mapper from a rusqlite error to a query error
    pub(crate) fn query(query: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { query, source }
    }
}
