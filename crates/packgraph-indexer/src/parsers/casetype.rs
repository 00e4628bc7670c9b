//! Case type documents (`IncidentTypes/*.json`)

use super::layout::layout_node_id;
use super::ContentParser;
use crate::document::{self, lenient};
use crate::error::Result;
use packgraph_core::{NodeKind, Reference};
use serde::Deserialize;
use std::path::Path;

pub const CASETYPE_PREFIX: &str = "CaseType-";

#[derive(Debug, Deserialize)]
struct RawCaseType {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, rename = "closureScript", deserialize_with = "lenient::opt_string")]
    closure_script: Option<String>,
    #[serde(default, rename = "playbookId", deserialize_with = "lenient::opt_string")]
    playbook_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    layout: Option<String>,
}

#[derive(Debug)]
pub struct CaseTypeParser {
    id: String,
    closure_script: Option<String>,
    playbook_id: Option<String>,
    layout: Option<String>,
}

impl CaseTypeParser {
    pub fn open(path: &Path) -> Result<Self> {
        let raw: RawCaseType = document::load_json(path)?;
        let id = document::required(raw.id, path, "id")?;
        Ok(CaseTypeParser {
            id: format!("{CASETYPE_PREFIX}{id}"),
            closure_script: raw.closure_script,
            playbook_id: raw.playbook_id,
            layout: raw.layout,
        })
    }
}

impl ContentParser for CaseTypeParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Result<Vec<Reference>> {
        let mut refs = Vec::new();
        if let Some(script) = &self.closure_script {
            refs.push(Reference::new(&self.id, script, NodeKind::Script));
        }
        if let Some(playbook) = &self.playbook_id {
            refs.push(Reference::new(&self.id, playbook, NodeKind::Playbook));
        }
        // Layout references carry the Playbook label.
        if let Some(layout) = &self.layout {
            refs.push(Reference::new(&self.id, layout_node_id(layout), NodeKind::Playbook));
        }
        Ok(refs)
    }
}
