// src/config.rs

//! Run configuration and the on-disk layout of a conversion
//!
//! A run touches three top-level paths: the input pack, the output archive and
//! a temporary directory. Everything else is derived from those:
//!
//! ```text
//! temp/
//!   unzip/                      extracted pack
//!     .bf/billfish.db           library store
//!   work/                       packaged as the output archive
//!     output.lingquan/
//!       resources/<ContentId>/
//!       materialPackage/
//! ```

use crate::locator::MatchPolicy;
use std::path::{Path, PathBuf};

/// Default input pack name
pub const INPUT_PACK: &str = "input.BillfishPack";

/// Default output archive name
pub const OUTPUT_PACK: &str = "output.lqpack";

/// Default temporary directory name
pub const TEMP_DIR: &str = "temp";

/// Reserved metadata directory at the root of a pack
pub const LIBRARY_DIR: &str = ".bf";

/// Library store inside [`LIBRARY_DIR`]
pub const LIBRARY_DB: &str = "billfish.db";

/// Root directory of the output archive; Lingquan does not recognise the
/// archive without it
pub const PACKAGE_ROOT: &str = "output.lingquan";

/// Resource directory inside [`PACKAGE_ROOT`]
pub const RESOURCES_DIR: &str = "resources";

/// Empty directory the Lingquan format detector requires
pub const MATERIAL_PACKAGE_DIR: &str = "materialPackage";

/// Configuration of one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Billfish export pack to convert
    pub input: PathBuf,
    /// Lingquan archive to produce
    pub output: PathBuf,
    /// Staging directory, must not exist when the run starts
    pub temp_dir: PathBuf,
    /// How to resolve file names that occur more than once in the pack
    pub match_policy: MatchPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(INPUT_PACK),
            output: PathBuf::from(OUTPUT_PACK),
            temp_dir: PathBuf::from(TEMP_DIR),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl ConvertConfig {
    /// The default layout rooted at `base` instead of the working directory
    pub fn in_dir(base: &Path) -> Self {
        Self {
            input: base.join(INPUT_PACK),
            output: base.join(OUTPUT_PACK),
            temp_dir: base.join(TEMP_DIR),
            match_policy: MatchPolicy::default(),
        }
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }
}

/// Directory the input pack is extracted into
pub fn unzip_dir(temp_dir: &Path) -> PathBuf {
    temp_dir.join("unzip")
}

/// Directory whose content becomes the output archive
pub fn work_dir(temp_dir: &Path) -> PathBuf {
    temp_dir.join("work")
}

/// Root of the Lingquan package inside the work directory
pub fn package_root(temp_dir: &Path) -> PathBuf {
    work_dir(temp_dir).join(PACKAGE_ROOT)
}

/// Resource directory of the package
pub fn resources_dir(temp_dir: &Path) -> PathBuf {
    package_root(temp_dir).join(RESOURCES_DIR)
}

/// Material package directory of the package
pub fn material_package_dir(temp_dir: &Path) -> PathBuf {
    package_root(temp_dir).join(MATERIAL_PACKAGE_DIR)
}

/// Library store inside an extracted pack
pub fn library_db(unzip_dir: &Path) -> PathBuf {
    unzip_dir.join(LIBRARY_DIR).join(LIBRARY_DB)
}
