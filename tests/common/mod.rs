// tests/common/mod.rs

//! Shared test utilities: build Billfish packs and read Lingquan archives.

#![allow(dead_code)]

use flate2::read::GzDecoder;
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const SCHEMA: &str = "
    CREATE TABLE bf_file (id INTEGER PRIMARY KEY, name TEXT NOT NULL, tid INTEGER, ctime INTEGER, mtime INTEGER);
    CREATE TABLE bf_type (tid INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE bf_material_userdata (file_id INTEGER PRIMARY KEY, score INTEGER, note TEXT, origin TEXT);
    CREATE TABLE bf_tag_v2 (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE bf_tag_join_file (file_id INTEGER NOT NULL, tag_id INTEGER NOT NULL);
    CREATE TABLE bf_material_v2 (file_id INTEGER PRIMARY KEY, w INTEGER, h INTEGER);
    INSERT INTO bf_type (tid, name) VALUES (1, 'png'), (2, 'jpg');
";

/// Builder for a `.BillfishPack` test fixture
pub struct PackBuilder {
    db_dir: TempDir,
    conn: Connection,
    files: Vec<(String, Vec<u8>)>,
    with_library: bool,
}

impl PackBuilder {
    pub fn new() -> Self {
        let db_dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(db_dir.path().join("billfish.db")).unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        Self {
            db_dir,
            conn,
            files: Vec::new(),
            with_library: true,
        }
    }

    /// Add a `bf_file` row
    pub fn entry(self, id: i64, name: &str, tid: i64) -> Self {
        self.conn
            .execute(
                "INSERT INTO bf_file (id, name, tid, ctime, mtime) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, name, tid, 1_650_000_000_i64, 1_660_000_000_i64],
            )
            .unwrap();
        self
    }

    pub fn tag(self, id: i64, name: &str) -> Self {
        self.conn
            .execute("INSERT INTO bf_tag_v2 (id, name) VALUES (?1, ?2)", params![id, name])
            .unwrap();
        self
    }

    pub fn assign_tag(self, file_id: i64, tag_id: i64) -> Self {
        self.conn
            .execute(
                "INSERT INTO bf_tag_join_file (file_id, tag_id) VALUES (?1, ?2)",
                params![file_id, tag_id],
            )
            .unwrap();
        self
    }

    pub fn user_data(self, file_id: i64, score: Option<i64>, note: &str, origin: Option<&str>) -> Self {
        self.conn
            .execute(
                "INSERT INTO bf_material_userdata (file_id, score, note, origin) VALUES (?1, ?2, ?3, ?4)",
                params![file_id, score, note, origin],
            )
            .unwrap();
        self
    }

    pub fn dimensions(self, file_id: i64, w: i64, h: i64) -> Self {
        self.conn
            .execute(
                "INSERT INTO bf_material_v2 (file_id, w, h) VALUES (?1, ?2, ?3)",
                params![file_id, w, h],
            )
            .unwrap();
        self
    }

    /// Add a file to the pack at `path` (relative, `/`-separated)
    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.push((path.to_string(), content.to_vec()));
        self
    }

    /// Leave `.bf/billfish.db` out of the pack
    pub fn without_library(mut self) -> Self {
        self.with_library = false;
        self
    }

    /// Write the pack as a zip archive
    pub fn write(self, dest: &Path) {
        let db_path = self.db_dir.path().join("billfish.db");
        self.conn.close().unwrap();

        let mut zip = zip::ZipWriter::new(fs::File::create(dest).unwrap());
        let options = SimpleFileOptions::default();

        if self.with_library {
            zip.add_directory(".bf/", options).unwrap();
            zip.start_file(".bf/billfish.db", options).unwrap();
            zip.write_all(&fs::read(&db_path).unwrap()).unwrap();
        }

        for (path, content) in &self.files {
            zip.start_file(path.as_str(), options).unwrap();
            zip.write_all(content).unwrap();
        }

        zip.finish().unwrap();
    }
}

/// An entry of a `.lqpack`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackEntry {
    Dir,
    File(Vec<u8>),
}

/// Read a `.lqpack` into normalized path -> entry
pub fn read_lqpack(path: &Path) -> BTreeMap<String, PackEntry> {
    let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(path).unwrap()));
    let mut entries = BTreeMap::new();

    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let raw = entry.path().unwrap().to_string_lossy().to_string();
        let name = raw
            .trim_start_matches("./")
            .trim_end_matches('/')
            .to_string();
        if name.is_empty() || name == "." {
            continue;
        }

        if entry.header().entry_type().is_dir() {
            entries.insert(name, PackEntry::Dir);
        } else {
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            entries.insert(name, PackEntry::File(content));
        }
    }

    entries
}

/// Resource directory names found in a `.lqpack`
pub fn resource_ids(entries: &BTreeMap<String, PackEntry>) -> Vec<String> {
    let prefix = "output.lingquan/resources/";
    let mut ids: Vec<String> = entries
        .keys()
        .filter_map(|k| k.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
        .map(str::to_string)
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
