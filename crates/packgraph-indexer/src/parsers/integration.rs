//! Integration documents (`Integrations/**/*.yml`)

use super::ContentParser;
use crate::document::{self, lenient};
use crate::error::Result;
use packgraph_core::{NodeKind, Reference};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommonFields {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIntegration {
    #[serde(default)]
    commonfields: CommonFields,
    #[serde(default)]
    script: Option<IntegrationScript>,
}

#[derive(Debug, Default, Deserialize)]
struct IntegrationScript {
    #[serde(default)]
    commands: Option<Vec<RawCommand>>,
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    name: Option<String>,
}

#[derive(Debug)]
pub struct IntegrationParser {
    id: String,
    commands: Vec<String>,
}

impl IntegrationParser {
    pub fn open(path: &Path) -> Result<Self> {
        let raw: RawIntegration = document::load_yaml(path)?;
        let commands = raw
            .script
            .and_then(|s| s.commands)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.name)
            .collect();
        Ok(IntegrationParser {
            id: document::required(raw.commonfields.id, path, "commonfields.id")?,
            commands,
        })
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl ContentParser for IntegrationParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Result<Vec<Reference>> {
        Ok(self
            .commands
            .iter()
            .map(|command| Reference::new(&self.id, command, NodeKind::IntegrationCommand))
            .collect())
    }
}
