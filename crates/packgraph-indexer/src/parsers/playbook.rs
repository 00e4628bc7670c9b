//! Playbook documents (`Playbooks/*.yml`)

use super::ContentParser;
use crate::document::{self, lenient};
use crate::error::Result;
use packgraph_core::{NodeKind, Reference};
use serde::Deserialize;
use std::path::Path;

/// Marker carried by built-in script references, which are not content.
const BUILTIN_MARKER: &str = "Builtin";
/// Separator of `<brand>|||<command>` style script references.
const COMPOUND_SEPARATOR: &str = "|||";

#[derive(Debug, Deserialize)]
struct RawPlaybook {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::map_values")]
    tasks: Vec<RawTask>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTask {
    #[serde(default)]
    task: Option<TaskDefinition>,
}

#[derive(Debug, Default, Deserialize)]
struct TaskDefinition {
    #[serde(default, rename = "playbookId", deserialize_with = "lenient::opt_string")]
    playbook_id: Option<String>,
    #[serde(default, rename = "playbookName", deserialize_with = "lenient::opt_string")]
    playbook_name: Option<String>,
    #[serde(default, rename = "scriptName", deserialize_with = "lenient::opt_string")]
    script_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    script: Option<String>,
}

impl TaskDefinition {
    /// First matching field wins: sub-playbook id, sub-playbook name,
    /// script name, script.
    fn target(&self) -> Option<(String, NodeKind)> {
        if let Some(id) = self.playbook_id.as_ref().or(self.playbook_name.as_ref()) {
            return Some((id.clone(), NodeKind::Playbook));
        }
        [&self.script_name, &self.script]
            .into_iter()
            .flatten()
            .find(|s| !s.contains(BUILTIN_MARKER))
            .and_then(|s| s.rsplit(COMPOUND_SEPARATOR).next())
            .filter(|s| !s.is_empty())
            .map(|s| (s.to_string(), NodeKind::Script))
    }
}

#[derive(Debug)]
pub struct PlaybookParser {
    id: String,
    tasks: Vec<TaskDefinition>,
}

impl PlaybookParser {
    pub fn open(path: &Path) -> Result<Self> {
        let raw: RawPlaybook = document::load_yaml(path)?;
        Ok(PlaybookParser {
            id: document::required(raw.id, path, "id")?,
            tasks: raw.tasks.into_iter().filter_map(|t| t.task).collect(),
        })
    }
}

impl ContentParser for PlaybookParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Result<Vec<Reference>> {
        Ok(self
            .tasks
            .iter()
            .filter_map(TaskDefinition::target)
            .map(|(target, kind)| Reference::new(&self.id, target, kind))
            .collect())
    }
}
