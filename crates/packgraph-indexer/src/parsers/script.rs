//! Script documents (`Scripts/**/*.yml`)

use super::integration::CommonFields;
use super::ContentParser;
use crate::document::{self, lenient};
use crate::error::{ContentError, Result};
use crate::extractor::CallExtraction;
use crate::languages;
use packgraph_core::{NodeKind, Reference};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `script` value meaning "the code lives in the sibling source file".
const EXTERNAL_SOURCE_SENTINEL: &str = "-";

const TEST_DATA_DIR: &str = "test_data";

#[derive(Debug, Deserialize)]
struct RawScript {
    #[serde(default)]
    commonfields: CommonFields,
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    script_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    script: Option<String>,
}

#[derive(Debug)]
pub struct ScriptParser {
    id: String,
    path: PathBuf,
    script_type: Option<String>,
    inline_source: Option<String>,
}

impl ScriptParser {
    /// Test playbooks, unit test fixtures and `test_data` files live next to
    /// real scripts but are not dependencies. `path` is taken relative to
    /// the pack's `Scripts/` directory.
    pub fn is_excluded_path(path: &Path) -> bool {
        let stem_is_test = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase().contains("test"))
            .unwrap_or(false);
        stem_is_test || path.components().any(|c| c.as_os_str() == TEST_DATA_DIR)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let raw: RawScript = document::load_yaml(path)?;
        Ok(ScriptParser {
            id: document::required(raw.commonfields.id, path, "commonfields.id")?,
            path: path.to_path_buf(),
            script_type: raw.script_type,
            inline_source: raw.script.filter(|s| s != EXTERNAL_SOURCE_SENTINEL),
        })
    }

    pub fn script_type(&self) -> Option<&str> {
        self.script_type.as_deref()
    }

    /// `<stem>.py` next to the yaml file.
    pub fn sibling_source_path(&self) -> PathBuf {
        self.path.with_extension("py")
    }

    fn source(&self) -> Result<String> {
        if let Some(inline) = &self.inline_source {
            return Ok(inline.clone());
        }
        let sibling = self.sibling_source_path();
        if !sibling.is_file() {
            return Err(ContentError::MissingSource { path: sibling });
        }
        document::read_text(&sibling)
    }
}

impl ContentParser for ScriptParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Result<Vec<Reference>> {
        let Some(extractor) = self.script_type().and_then(languages::extractor_for) else {
            return Ok(Vec::new());
        };
        let source = self.source()?;
        let names = match extractor.extract(&source)? {
            CallExtraction::SyntaxError => {
                tracing::debug!(
                    "Skipping {} source of {}: syntax error",
                    extractor.language(),
                    self.path.display()
                );
                Vec::new()
            }
            calls => calls.into_names(),
        };
        Ok(names
            .into_iter()
            .map(|name| Reference::new(&self.id, name, NodeKind::Script))
            .collect())
    }
}
