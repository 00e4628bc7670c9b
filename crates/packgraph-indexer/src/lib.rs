//! Content loading, dependency extraction and graph building

pub mod builder;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod extractor;
pub mod languages;
pub mod parsers;
pub mod repository;

#[cfg(test)]
mod test_utils;

pub use builder::{GraphBuilder, PackOutcome};
pub use config::{load_inventory, ConfigOverrides, PackgraphConfig, CONFIG_FILE_NAME};
pub use discovery::ContentStep;
pub use error::{BuildError, ConfigError, ContentError};
pub use extractor::{CallExtraction, CommandCallExtractor, CommandReference};
pub use parsers::{ContentParser, PackMetadata};
pub use repository::{RepositoryGraph, RepositoryGraphs, UPSTREAM_PACK_DIRS};
