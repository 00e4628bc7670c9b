//! Export format selection. Writing the interchange files is left to
//! downstream tooling; this module only validates the request.

use crate::graph::ContentGraph;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GraphMl,
    Gml,
}

impl ExportFormat {
    pub const SUPPORTED: [&str; 2] = ["GraphML", "GML"];
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::GraphMl => f.write_str("GraphML"),
            ExportFormat::Gml => f.write_str("GML"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ExportError {
    #[error("Output format {0} not one of GraphML,GML")]
    UnsupportedFormat(String),

    #[error("Export to {0} is not implemented")]
    Unimplemented(ExportFormat),
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GraphML" => Ok(ExportFormat::GraphMl),
            "GML" => Ok(ExportFormat::Gml),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Validates `format` before touching `output`; the writers themselves are
/// not part of this crate.
pub fn export_graph(graph: &ContentGraph, output: &Path, format: &str) -> Result<(), ExportError> {
    let format: ExportFormat = format.parse()?;
    tracing::debug!(
        "Export of {} ({} nodes) to {} requested as {}",
        graph.name(),
        graph.node_count(),
        output.display(),
        format
    );
    Err(ExportError::Unimplemented(format))
}
