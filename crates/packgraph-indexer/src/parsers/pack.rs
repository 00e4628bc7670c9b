//! `pack_metadata.json`

use crate::document::{self, lenient};
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = "pack_metadata.json";

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
    #[serde(default, rename = "currentVersion", deserialize_with = "lenient::opt_string")]
    current_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackMetadata {
    /// Display name, used as the pack node id.
    pub name: String,
    pub current_version: Option<String>,
}

pub struct PackParser;

impl PackParser {
    pub fn metadata_path(pack_dir: &Path) -> PathBuf {
        pack_dir.join(METADATA_FILE)
    }

    /// Reads the pack metadata. A pack without a metadata file yields
    /// `Ok(None)`; every other failure is an error.
    pub fn parse(pack_dir: &Path) -> Result<Option<PackMetadata>> {
        let path = Self::metadata_path(pack_dir);
        if !path.is_file() {
            return Ok(None);
        }
        let raw: RawMetadata = document::load_json(&path)?;
        Ok(Some(PackMetadata {
            name: document::required(raw.name, &path, "name")?,
            current_version: raw.current_version,
        }))
    }
}
