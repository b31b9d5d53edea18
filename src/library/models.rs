// src/library/models.rs

//! Rows read from a Billfish library store

use rusqlite::Row;

/// A library entry from `bf_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: i64,
    /// Base name of the file, including its extension
    pub name: String,
    /// Key into `bf_type`
    pub type_id: Option<i64>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
}

impl SourceFile {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            type_id: row.get("tid")?,
            created_at: row.get("ctime")?,
            modified_at: row.get("mtime")?,
        })
    }
}

/// User annotations from `bf_material_userdata`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserData {
    pub score: Option<i64>,
    pub note: Option<String>,
    /// Source URL the asset was collected from
    pub origin: Option<String>,
}

impl UserData {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            score: row.get("score")?,
            note: row.get("note")?,
            origin: row.get("origin")?,
        })
    }
}

/// Pixel size from `bf_material_v2`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Dimensions {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            width: row.get("w")?,
            height: row.get("h")?,
        })
    }
}
