//! Layout documents (`Layouts/*.json`)

use super::ContentParser;
use crate::document::{self, lenient};
use crate::error::Result;
use packgraph_core::{NodeKind, Reference};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const LAYOUT_PREFIX: &str = "Layout-";

/// Namespaced node id of a layout.
pub fn layout_node_id(id: &str) -> String {
    format!("{LAYOUT_PREFIX}{id}")
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, rename = "detailsV2")]
    details_v2: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsV2 {
    #[serde(default)]
    tabs: Option<Vec<Tab>>,
}

#[derive(Debug, Default, Deserialize)]
struct Tab {
    #[serde(default)]
    sections: Option<Vec<Section>>,
}

#[derive(Debug, Default, Deserialize)]
struct Section {
    #[serde(default, rename = "queryType")]
    query_type: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    query: Option<String>,
    #[serde(default)]
    items: Option<Vec<SectionItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct SectionItem {
    #[serde(default, rename = "scriptId", deserialize_with = "lenient::opt_string")]
    script_id: Option<String>,
}

impl Section {
    fn script_targets(&self) -> Vec<String> {
        if let Some(query_type) = &self.query_type {
            return match (query_type.as_str(), &self.query) {
                (Some("script"), Some(query)) => vec![query.clone()],
                _ => Vec::new(),
            };
        }
        self.items
            .iter()
            .flatten()
            .filter_map(|item| item.script_id.clone())
            .collect()
    }
}

#[derive(Debug)]
pub struct LayoutParser {
    id: String,
    path: PathBuf,
    details: Option<serde_json::Value>,
}

impl LayoutParser {
    pub fn open(path: &Path) -> Result<Self> {
        let raw: RawLayout = document::load_json(path)?;
        let id = document::required(raw.id, path, "id")?;
        Ok(LayoutParser {
            id: layout_node_id(&id),
            path: path.to_path_buf(),
            details: raw.details_v2,
        })
    }

    /// The `detailsV2` tree; an unexpected shape counts as "no sections".
    fn details(&self) -> DetailsV2 {
        match &self.details {
            None | Some(serde_json::Value::Null) => DetailsV2::default(),
            Some(value) => DetailsV2::deserialize(value).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed detailsV2 in {}: {}", self.path.display(), e);
                DetailsV2::default()
            }),
        }
    }
}

impl ContentParser for LayoutParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Result<Vec<Reference>> {
        let details = self.details();
        let refs = details
            .tabs
            .iter()
            .flatten()
            .flat_map(|tab| tab.sections.iter().flatten())
            .flat_map(Section::script_targets)
            .map(|script| Reference::new(&self.id, script, NodeKind::Script))
            .collect();
        Ok(refs)
    }
}
