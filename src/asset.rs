// src/asset.rs

//! The `__info.json` sidecar of a Lingquan resource
//!
//! Lingquan validates sidecars against a fixed key set, so keys the Billfish
//! library has no data for are still written, as `null`.

use crate::hash::ContentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata record stored next to every resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub id: ContentId,
    /// Always empty; Lingquan fills it on import
    pub hash_id: String,
    /// File name without its last extension
    pub name: String,
    pub ext: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub size: Option<u64>,
    pub score: Option<i64>,
    /// Creation time as stored by Billfish
    pub time: Option<i64>,
    pub revision_time: Option<i64>,
    pub tags: Vec<String>,
    pub folders: Option<Vec<String>>,
    pub note: Option<String>,
    pub url: Option<String>,
    pub palettes: Option<Value>,
    #[serde(rename = "delete")]
    pub delete_flag: Option<bool>,
    pub usn_index: Option<i64>,
    pub comments: Option<Value>,
    pub author: Option<String>,
    pub prompt: Option<String>,
}

impl AssetInfo {
    /// Create a record with every optional key set to `null`
    pub fn new(id: ContentId, file_name: &str) -> Self {
        Self {
            id,
            hash_id: String::new(),
            name: strip_extension(file_name).to_string(),
            ext: None,
            width: None,
            height: None,
            size: None,
            score: None,
            time: None,
            revision_time: None,
            tags: Vec::new(),
            folders: None,
            note: None,
            url: None,
            palettes: None,
            delete_flag: None,
            usn_index: None,
            comments: None,
            author: None,
            prompt: None,
        }
    }

    /// Compact JSON, the form Lingquan writes itself
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Remove the last `.ext` segment of a file name
///
/// `archive.final.png` becomes `archive.final`; a name without a dot is
/// returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}
