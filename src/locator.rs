// src/locator.rs

//! Resolve library file names to files in an extracted pack
//!
//! Billfish stores only a file's base name; the file itself can sit in any
//! folder of the pack. The locator walks the extracted tree once, depth-first
//! with entries sorted by name, and indexes every regular file by base name in
//! traversal order. The reserved `.bf` metadata directory is never entered.
//!
//! When two folders hold files with the same name the library row cannot tell
//! them apart. [`MatchPolicy`] makes the choice explicit.

use crate::config::LIBRARY_DIR;
use crate::error::Result;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// How to resolve a name that matches more than one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Take the first match in traversal order
    #[default]
    FirstMatch,
    /// Report the name as ambiguous and let the caller skip it
    RejectAmbiguous,
}

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found(PathBuf),
    NotFound,
    /// All candidates in traversal order (only with [`MatchPolicy::RejectAmbiguous`])
    Ambiguous(Vec<PathBuf>),
}

/// Name index over an extracted pack
#[derive(Debug)]
pub struct FileLocator {
    policy: MatchPolicy,
    by_name: HashMap<OsString, Vec<PathBuf>>,
}

impl FileLocator {
    /// Index every file under `root` with the default policy
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_policy(root, MatchPolicy::default())
    }

    /// Index every file under `root`
    pub fn with_policy(root: &Path, policy: MatchPolicy) -> Result<Self> {
        let mut by_name: HashMap<OsString, Vec<PathBuf>> = HashMap::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || e.file_name() != OsStr::new(LIBRARY_DIR));

        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                by_name
                    .entry(entry.file_name().to_os_string())
                    .or_default()
                    .push(entry.into_path());
            }
        }

        debug!(
            "Indexed {} distinct file names under {}",
            by_name.len(),
            root.display()
        );

        Ok(Self { policy, by_name })
    }

    /// Look up a file by its exact base name
    pub fn locate(&self, name: &str) -> Located {
        let Some(candidates) = self.by_name.get(OsStr::new(name)) else {
            return Located::NotFound;
        };

        match (self.policy, candidates.as_slice()) {
            (_, []) => Located::NotFound,
            (MatchPolicy::RejectAmbiguous, [_, _, ..]) => Located::Ambiguous(candidates.clone()),
            (_, [first, ..]) => Located::Found(first.clone()),
        }
    }
}
