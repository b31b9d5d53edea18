// src/lib.rs

//! bf2lq: Billfish to Lingquan library converter
//!
//! Converts a Billfish export pack (`.BillfishPack`, a zip holding the
//! `.bf/billfish.db` SQLite library plus the asset files) into a Lingquan
//! archive (`.lqpack`, a gzip-compressed tar of content-addressed resource
//! directories).
//!
//! # Architecture
//!
//! - Content addressing: every resource is keyed by a [`ContentId`] derived
//!   from its bytes, which doubles as the duplicate check
//! - Library access: a single read-only SQLite connection owned by the
//!   pipeline and closed before packaging
//! - Atomic resources: a resource directory is renamed into place only once
//!   both the file and its `__info.json` sidecar exist

pub mod archive;
pub mod asset;
pub mod config;
mod error;
pub mod hash;
pub mod library;
pub mod locator;
pub mod mapper;
pub mod output;
pub mod pipeline;
pub mod progress;

pub use asset::AssetInfo;
pub use config::ConvertConfig;
pub use error::{Error, Precondition, Result};
pub use hash::ContentId;
pub use library::Library;
pub use locator::{FileLocator, Located, MatchPolicy};
pub use mapper::{ConversionReport, RecordMapper};
pub use output::OutputWriter;
pub use pipeline::{Converter, Phase, check_preconditions};
pub use progress::{CallbackProgress, LogProgress, ProgressEvent, ProgressTracker, SilentProgress};
