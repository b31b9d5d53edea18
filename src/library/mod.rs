// src/library/mod.rs

//! Read-only access to a Billfish library store
//!
//! The store is the SQLite database Billfish keeps in `.bf/billfish.db`. Only
//! six tables are consulted:
//!
//! - `bf_file`: one row per asset
//! - `bf_type`: extension names
//! - `bf_material_userdata`: score, note and origin URL
//! - `bf_tag_v2` / `bf_tag_join_file`: tags and their assignments
//! - `bf_material_v2`: pixel dimensions
//!
//! A [`Library`] owns the connection for the whole run. It is closed
//! explicitly with [`Library::close`]; dropping it on an error path releases
//! the connection as well.

pub mod models;

pub use models::{Dimensions, SourceFile, UserData};

use crate::error::{Error, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open library store
#[derive(Debug)]
pub struct Library {
    conn: Connection,
    path: PathBuf,
}

impl Library {
    /// Open a library store read-only
    ///
    /// The store is probed immediately so that a missing or non-SQLite file is
    /// reported as a connection failure rather than on the first query.
    pub fn open(path: &Path) -> Result<Self> {
        let connection_error = |source| Error::Connection {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connection_error)?;

        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;

        debug!("Opened library store: {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// All library entries in storage order
    pub fn list_files(&self) -> Result<Vec<SourceFile>> {
        const QUERY: &str = "list_files";

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, tid, ctime, mtime FROM bf_file ORDER BY rowid")
            .map_err(Error::query(QUERY))?;

        let files = stmt
            .query_map([], SourceFile::from_row)
            .map_err(Error::query(QUERY))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::query(QUERY))?;

        Ok(files)
    }

    /// Extension name (e.g. `png`) of a file type
    pub fn extension_name(&self, type_id: i64) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM bf_type WHERE tid = ?1", [type_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Error::query("extension_name"))
    }

    /// User annotations of a file, if it has any
    pub fn user_data(&self, file_id: i64) -> Result<Option<UserData>> {
        self.conn
            .query_row(
                "SELECT score, note, origin FROM bf_material_userdata WHERE file_id = ?1",
                [file_id],
                UserData::from_row,
            )
            .optional()
            .map_err(Error::query("user_data"))
    }

    /// Ids of the tags assigned to a file, in assignment order
    pub fn tag_ids_for_file(&self, file_id: i64) -> Result<Vec<i64>> {
        const QUERY: &str = "tag_ids_for_file";

        let mut stmt = self
            .conn
            .prepare("SELECT tag_id FROM bf_tag_join_file WHERE file_id = ?1 ORDER BY rowid")
            .map_err(Error::query(QUERY))?;

        let ids = stmt
            .query_map([file_id], |row| row.get(0))
            .map_err(Error::query(QUERY))?
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(Error::query(QUERY))?;

        Ok(ids)
    }

    /// Display name of a tag
    pub fn tag_name(&self, tag_id: i64) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT name FROM bf_tag_v2 WHERE id = ?1", [tag_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Error::query("tag_name"))
    }

    /// Pixel dimensions of a file, if recorded
    pub fn dimensions(&self, file_id: i64) -> Result<Option<Dimensions>> {
        self.conn
            .query_row(
                "SELECT w, h FROM bf_material_v2 WHERE file_id = ?1",
                [file_id],
                Dimensions::from_row,
            )
            .optional()
            .map_err(Error::query("dimensions"))
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, source)| Error::Connection {
                path: path.clone(),
                source,
            })?;

        debug!("Closed library store: {}", path.display());
        Ok(())
    }
}
