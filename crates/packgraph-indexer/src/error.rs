//! Error types for content loading and graph building

use std::path::PathBuf;

/// Failure while loading or interpreting one content document.
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse yaml file {path}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse json file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid content pattern {pattern}")]
    Pattern {
        pattern: &'static str,
        #[source]
        source: globset::Error,
    },

    #[error("{path} has no `{field}` field")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("script source {path} not found")]
    MissingSource { path: PathBuf },

    #[error("failed to set up the {language} grammar: {message}")]
    Grammar { language: &'static str, message: String },

    #[error("{language} parser produced no syntax tree")]
    ParseAborted { language: &'static str },
}

/// Failure that aborts a whole build run.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("Exception occurred when parsing pack {path}")]
    Pack {
        path: PathBuf,
        #[source]
        source: ContentError,
    },

    #[error("failed to list packs under {path}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid or unreadable configuration, raised before any content is read.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid inventory {path}")]
    Inventory {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("content repository {0} has no Packs directory")]
    MissingPacksDir(PathBuf),
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
